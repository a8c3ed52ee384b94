//! The hybrid optimization loop.
//!
//! ```text
//!   Initialized ──→ Running ──┬──→ Converged
//!                             ├──→ MaxIterExceeded
//!                             └──→ Failed
//! ```
//!
//! Each step binds the ansatz, asks the oracle for an expectation value,
//! appends it to the history and lets the [`Minimizer`] propose the next
//! point. A run never retries: the first oracle error ends it.

use std::fmt;
use std::time::Duration;

use futures::future::join_all;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use hybridq_hal::{ExpectationOracle, OracleError, bounded};
use hybridq_problems::WeightedOperator;

use crate::ansatz::Ansatz;
use crate::error::{VariationalError, VariationalResult};
use crate::optimizer::{Minimizer, NelderMead};

/// Message reported when the ansatz has nothing to train.
pub const NO_PARAMETERS_MESSAGE: &str = "No parameters to optimize.";

/// Optimizer settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizerConfig {
    /// Maximum number of oracle evaluations.
    pub max_iterations: usize,
    /// Convergence tolerance on cost spread and simplex size.
    pub tolerance: f64,
    /// Bound on each oracle call.
    pub timeout: Duration,
    /// Initial simplex edge length.
    pub initial_step: f64,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            tolerance: 1e-6,
            timeout: Duration::from_secs(30),
            initial_step: 0.5,
        }
    }
}

impl OptimizerConfig {
    /// Reject settings the loop cannot honour.
    pub fn validate(&self) -> VariationalResult<()> {
        if self.max_iterations == 0 {
            return Err(VariationalError::Config(
                "max_iterations must be at least 1".into(),
            ));
        }
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(VariationalError::Config(format!(
                "tolerance must be positive, got {}",
                self.tolerance
            )));
        }
        if self.timeout.is_zero() {
            return Err(VariationalError::Config("timeout must be non-zero".into()));
        }
        if !(self.initial_step.is_finite() && self.initial_step > 0.0) {
            return Err(VariationalError::Config(format!(
                "initial_step must be positive, got {}",
                self.initial_step
            )));
        }
        Ok(())
    }
}

/// Lifecycle of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    /// Configured, no oracle call yet.
    Initialized,
    /// Evaluating.
    Running,
    /// Minimizer reported convergence.
    Converged,
    /// Evaluation cap reached first.
    MaxIterExceeded,
    /// An oracle call failed.
    Failed,
}

impl RunState {
    /// Whether no further transition is possible.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            RunState::Converged | RunState::MaxIterExceeded | RunState::Failed
        )
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RunState::Initialized => "initialized",
            RunState::Running => "running",
            RunState::Converged => "converged",
            RunState::MaxIterExceeded => "max_iter_exceeded",
            RunState::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// The finished, immutable result of one run.
#[derive(Debug)]
pub struct RunRecord {
    id: Uuid,
    state: RunState,
    initial_params: Vec<f64>,
    best_params: Vec<f64>,
    best_energy: Option<f64>,
    history: Vec<f64>,
    iterations: usize,
    message: String,
    error: Option<OracleError>,
}

impl RunRecord {
    /// Unique id of the run.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Terminal state.
    pub fn state(&self) -> RunState {
        self.state
    }

    /// Starting point.
    pub fn initial_params(&self) -> &[f64] {
        &self.initial_params
    }

    /// Parameters with the lowest observed energy (the start if none).
    pub fn best_params(&self) -> &[f64] {
        &self.best_params
    }

    /// Lowest observed energy; `None` when no call succeeded.
    pub fn best_energy(&self) -> Option<f64> {
        self.best_energy
    }

    /// One energy per successful oracle call, in call order.
    pub fn history(&self) -> &[f64] {
        &self.history
    }

    /// Completed minimizer iterations.
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Number of successful oracle evaluations.
    pub fn evaluations(&self) -> usize {
        self.history.len()
    }

    /// Human-readable outcome.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The oracle error that ended a failed run.
    pub fn error(&self) -> Option<&OracleError> {
        self.error.as_ref()
    }

    fn energy_key(&self) -> f64 {
        self.best_energy.unwrap_or(f64::INFINITY)
    }
}

/// Mutable state owned by a single run.
struct OptimizationRun {
    id: Uuid,
    state: RunState,
    initial_params: Vec<f64>,
    history: Vec<f64>,
    error: Option<OracleError>,
}

impl OptimizationRun {
    fn new(initial_params: Vec<f64>) -> Self {
        Self {
            id: Uuid::new_v4(),
            state: RunState::Initialized,
            initial_params,
            history: Vec::new(),
            error: None,
        }
    }

    fn finish(self, minimizer: &dyn Minimizer, message: Option<&str>) -> RunRecord {
        let best_params = minimizer
            .best_params()
            .map_or_else(|| self.initial_params.clone(), <[f64]>::to_vec);
        let best_energy = (!self.history.is_empty()).then(|| minimizer.best_cost());
        let message = match (message, &self.error) {
            (Some(m), _) => m.to_string(),
            (None, Some(e)) => format!("Oracle call failed: {e}"),
            (None, None) => match self.state {
                RunState::Converged => "Optimization terminated successfully.".to_string(),
                _ => "Maximum number of evaluations has been exceeded.".to_string(),
            },
        };
        RunRecord {
            id: self.id,
            state: self.state,
            initial_params: self.initial_params,
            best_params,
            best_energy,
            history: self.history,
            iterations: minimizer.iterations(),
            message,
            error: self.error,
        }
    }
}

/// Drives the bind → evaluate → update loop against an oracle.
#[derive(Debug, Clone, Default)]
pub struct VariationalOptimizer {
    config: OptimizerConfig,
}

impl VariationalOptimizer {
    /// Create an optimizer with `config`.
    pub fn new(config: OptimizerConfig) -> Self {
        Self { config }
    }

    /// The settings in use.
    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    /// Checks performed before any oracle call.
    fn validate(
        &self,
        ansatz: &Ansatz,
        operator: &WeightedOperator,
        initial_params: Option<&[f64]>,
    ) -> VariationalResult<()> {
        self.config.validate()?;
        if ansatz.num_qubits() == 0 {
            return Err(VariationalError::Config("ansatz has no qubits".into()));
        }
        if operator.num_qubits() != ansatz.num_qubits() {
            return Err(VariationalError::Config(format!(
                "operator acts on {} qubits, ansatz on {}",
                operator.num_qubits(),
                ansatz.num_qubits()
            )));
        }
        if let Some(params) = initial_params {
            if params.len() != ansatz.num_parameters() {
                return Err(VariationalError::ParameterCount {
                    expected: ansatz.num_parameters(),
                    got: params.len(),
                });
            }
        }
        Ok(())
    }

    /// One bounded oracle call.
    async fn evaluate(
        &self,
        oracle: &dyn ExpectationOracle,
        ansatz: &Ansatz,
        operator: &WeightedOperator,
        params: &[f64],
    ) -> Result<f64, OracleError> {
        let circuit = ansatz.template().bind(params)?;
        let energy = bounded(self.config.timeout, oracle.expectation(&circuit, operator)).await?;
        if !energy.is_finite() {
            return Err(OracleError::NonFinite(energy));
        }
        Ok(energy)
    }

    /// Minimize ⟨H⟩ over the ansatz parameters.
    ///
    /// Missing `initial_params` are drawn from the handle ranges with `rng`.
    /// Configuration problems are returned as errors; oracle failures end
    /// the run in [`RunState::Failed`] and are reported in the record.
    #[instrument(skip_all, fields(ansatz = ansatz.name(), oracle = oracle.name()))]
    pub async fn run(
        &self,
        oracle: &dyn ExpectationOracle,
        ansatz: &Ansatz,
        operator: &WeightedOperator,
        initial_params: Option<Vec<f64>>,
        rng: &mut StdRng,
    ) -> VariationalResult<RunRecord> {
        self.validate(ansatz, operator, initial_params.as_deref())?;

        let start = initial_params.unwrap_or_else(|| ansatz.sample_initial(rng));
        let mut run = OptimizationRun::new(start.clone());
        let mut minimizer = NelderMead::new(ansatz.num_parameters())
            .with_tolerance(self.config.tolerance)
            .with_initial_step(self.config.initial_step);

        info!(
            run = %run.id,
            parameters = ansatz.num_parameters(),
            terms = operator.num_terms(),
            "starting optimization"
        );
        run.state = RunState::Running;

        let mut params = start;
        let mut message = None;
        loop {
            let energy = match self.evaluate(oracle, ansatz, operator, &params).await {
                Ok(energy) => energy,
                Err(e) => {
                    warn!(run = %run.id, error = %e, evaluations = run.history.len(), "oracle call failed");
                    run.error = Some(e);
                    run.state = RunState::Failed;
                    break;
                }
            };
            run.history.push(energy);
            debug!(evaluation = run.history.len(), energy, "evaluated");

            if ansatz.num_parameters() == 0 {
                minimizer.step(&params, energy);
                run.state = RunState::Converged;
                message = Some(NO_PARAMETERS_MESSAGE);
                break;
            }

            params = minimizer.step(&params, energy);
            if minimizer.converged() {
                run.state = RunState::Converged;
                break;
            }
            if run.history.len() >= self.config.max_iterations {
                run.state = RunState::MaxIterExceeded;
                break;
            }
        }

        let record = run.finish(&minimizer, message);
        info!(
            run = %record.id,
            state = %record.state,
            best_energy = ?record.best_energy,
            evaluations = record.evaluations(),
            "optimization finished"
        );
        Ok(record)
    }

    /// `restarts` independent runs from seeds `seed, seed+1, ...`, executed
    /// concurrently; the record with the lowest best energy wins.
    pub async fn multi_start(
        &self,
        oracle: &dyn ExpectationOracle,
        ansatz: &Ansatz,
        operator: &WeightedOperator,
        restarts: usize,
        seed: u64,
    ) -> VariationalResult<RunRecord> {
        if restarts == 0 {
            return Err(VariationalError::Config("restarts must be at least 1".into()));
        }
        self.validate(ansatz, operator, None)?;

        let runs = (0..restarts as u64).map(|k| async move {
            let mut rng = StdRng::seed_from_u64(seed.wrapping_add(k));
            self.run(oracle, ansatz, operator, None, &mut rng).await
        });
        let records = join_all(runs)
            .await
            .into_iter()
            .collect::<VariationalResult<Vec<_>>>()?;

        debug!(restarts, "multi-start finished");
        records
            .into_iter()
            .min_by(|a, b| a.energy_key().total_cmp(&b.energy_key()))
            .ok_or_else(|| VariationalError::Config("no runs executed".into()))
    }
}
