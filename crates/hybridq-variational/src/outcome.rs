//! Post-processing of a finished run.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use hybridq_hal::{Counts, ExpectationOracle, bounded};

use crate::ansatz::Ansatz;
use crate::error::VariationalResult;
use crate::run::{RunRecord, RunState};

/// Everything reported back after an optimization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariationalOutcome {
    /// Id of the run that produced the optimum.
    pub run_id: String,
    /// Terminal state of that run.
    pub status: RunState,
    /// Lowest observed energy.
    pub optimal_energy: Option<f64>,
    /// Parameters at the lowest energy.
    pub optimal_params: Vec<f64>,
    /// QAOA cost angles, when applicable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gammas: Option<Vec<f64>>,
    /// QAOA mixer angles, when applicable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub betas: Option<Vec<f64>>,
    /// Energy per oracle evaluation.
    pub history: Vec<f64>,
    /// Minimizer iterations.
    pub iterations: usize,
    /// Oracle evaluations.
    pub evaluations: usize,
    /// Human-readable outcome.
    pub message: String,
    /// Oracle error of a failed run.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Sampled distribution of the optimal circuit.
    pub counts: Counts,
    /// Exact basis-state probabilities of the optimal circuit.
    pub probabilities: Vec<f64>,
    /// Most frequently sampled bitstring.
    pub most_likely: Option<String>,
    /// Register width.
    pub num_qubits: usize,
}

impl VariationalOutcome {
    /// Split `optimal_params` into QAOA `gammas` and `betas` halves.
    pub fn with_qaoa_split(mut self) -> Self {
        let p = self.optimal_params.len() / 2;
        self.gammas = Some(self.optimal_params[..p].to_vec());
        self.betas = Some(self.optimal_params[p..].to_vec());
        self
    }
}

/// Bind the best parameters, then sample and read out the final state.
///
/// Each of the two oracle calls is bounded by `timeout`. A failed run is
/// reported without touching the oracle again.
pub async fn finalize(
    oracle: &dyn ExpectationOracle,
    ansatz: &Ansatz,
    record: &RunRecord,
    shots: u32,
    timeout: Duration,
) -> VariationalResult<VariationalOutcome> {
    let (counts, probabilities) = if record.state() == RunState::Failed {
        (Counts::new(), Vec::new())
    } else {
        let circuit = ansatz.bind(record.best_params())?;
        let counts = bounded(timeout, oracle.sample(&circuit, shots)).await?;
        let probabilities = bounded(timeout, oracle.statevector(&circuit))
            .await?
            .iter()
            .map(|a| a.norm_sqr())
            .collect();
        (counts, probabilities)
    };
    let most_likely = counts.most_frequent().map(|(k, _)| k.to_string());
    debug!(shots, most_likely = ?most_likely, "finalized run");

    Ok(VariationalOutcome {
        run_id: record.id().to_string(),
        status: record.state(),
        optimal_energy: record.best_energy(),
        optimal_params: record.best_params().to_vec(),
        gammas: None,
        betas: None,
        history: record.history().to_vec(),
        iterations: record.iterations(),
        evaluations: record.evaluations(),
        message: record.message().to_string(),
        error: record.error().map(ToString::to_string),
        counts,
        probabilities,
        most_likely,
        num_qubits: ansatz.num_qubits(),
    })
}
