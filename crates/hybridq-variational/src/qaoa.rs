//! Quantum approximate optimization.

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::info;

use hybridq_hal::ExpectationOracle;
use hybridq_problems::IsingProblem;

use crate::ansatz::build_qaoa;
use crate::error::{VariationalError, VariationalResult};
use crate::outcome::{VariationalOutcome, finalize};
use crate::run::{OptimizerConfig, VariationalOptimizer};

/// Minimizes an Ising cost with `p` alternating cost/mixer layers.
#[derive(Debug, Clone)]
pub struct QaoaSolver {
    layers: usize,
    config: OptimizerConfig,
    shots: u32,
    seed: Option<u64>,
    restarts: usize,
    initial_params: Option<Vec<f64>>,
}

impl Default for QaoaSolver {
    fn default() -> Self {
        Self::new(1)
    }
}

impl QaoaSolver {
    /// Solver with `layers` QAOA rounds.
    pub fn new(layers: usize) -> Self {
        Self {
            layers,
            config: OptimizerConfig::default(),
            shots: 1024,
            seed: None,
            restarts: 1,
            initial_params: None,
        }
    }

    /// Optimizer settings.
    pub fn with_config(mut self, config: OptimizerConfig) -> Self {
        self.config = config;
        self
    }

    /// Evaluation cap.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.config.max_iterations = max_iterations;
        self
    }

    /// Shots for the final sampling.
    pub fn with_shots(mut self, shots: u32) -> Self {
        self.shots = shots;
        self
    }

    /// Seed for the initial angles.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Number of concurrent random restarts.
    pub fn with_restarts(mut self, restarts: usize) -> Self {
        self.restarts = restarts;
        self
    }

    /// Start from explicit `[γ..., β...]` instead of random angles.
    pub fn with_initial_params(mut self, params: Vec<f64>) -> Self {
        self.initial_params = Some(params);
        self
    }

    /// Optimize the angles for `problem`, then sample the optimal circuit.
    ///
    /// The outcome carries the optimal angles split into `gammas` and `betas`.
    pub async fn solve(
        &self,
        oracle: &dyn ExpectationOracle,
        problem: &IsingProblem,
    ) -> VariationalResult<VariationalOutcome> {
        let ansatz = build_qaoa(problem, self.layers)?;
        let operator = problem.to_operator();
        let optimizer = VariationalOptimizer::new(self.config.clone());
        let seed = self.seed.unwrap_or_else(rand::random);
        info!(
            num_qubits = problem.num_qubits(),
            p = self.layers,
            terms = operator.num_terms(),
            seed,
            "solving with QAOA"
        );

        let record = match (&self.initial_params, self.restarts) {
            (Some(params), _) => {
                let mut rng = StdRng::seed_from_u64(seed);
                optimizer
                    .run(oracle, &ansatz, &operator, Some(params.clone()), &mut rng)
                    .await?
            }
            (None, 0) => {
                return Err(VariationalError::Config(
                    "restarts must be at least 1".into(),
                ));
            }
            (None, restarts) => {
                optimizer
                    .multi_start(oracle, &ansatz, &operator, restarts, seed)
                    .await?
            }
        };

        Ok(finalize(oracle, &ansatz, &record, self.shots, self.config.timeout)
            .await?
            .with_qaoa_split())
    }
}
