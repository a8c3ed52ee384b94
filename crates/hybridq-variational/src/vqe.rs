//! Variational quantum eigensolver.

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::info;

use hybridq_hal::ExpectationOracle;
use hybridq_problems::WeightedOperator;

use crate::ansatz::build_vqe;
use crate::error::{VariationalError, VariationalResult};
use crate::outcome::{VariationalOutcome, finalize};
use crate::run::{OptimizerConfig, VariationalOptimizer};

/// Finds low-energy states of an operator with the RY/CX ansatz.
///
/// # Example
///
/// ```ignore
/// let solver = VqeSolver::new(2).with_depth(2).with_seed(7);
/// let outcome = solver.solve(&backend, &operator).await?;
/// println!("E = {:?}", outcome.optimal_energy);
/// ```
#[derive(Debug, Clone)]
pub struct VqeSolver {
    num_qubits: usize,
    depth: usize,
    config: OptimizerConfig,
    shots: u32,
    seed: Option<u64>,
    restarts: usize,
    initial_params: Option<Vec<f64>>,
}

impl VqeSolver {
    /// Solver for a `num_qubits` register, depth 1.
    pub fn new(num_qubits: usize) -> Self {
        Self {
            num_qubits,
            depth: 1,
            config: OptimizerConfig::default(),
            shots: 1024,
            seed: None,
            restarts: 1,
            initial_params: None,
        }
    }

    /// Number of rotation/entangler repetitions.
    pub fn with_depth(mut self, depth: usize) -> Self {
        self.depth = depth;
        self
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

    /// Seed for the initial parameters.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Number of concurrent random restarts.
    pub fn with_restarts(mut self, restarts: usize) -> Self {
        self.restarts = restarts;
        self
    }

    /// Start from explicit parameters instead of random ones.
    pub fn with_initial_params(mut self, params: Vec<f64>) -> Self {
        self.initial_params = Some(params);
        self
    }

    /// Run the optimization and the final readout.
    pub async fn solve(
        &self,
        oracle: &dyn ExpectationOracle,
        operator: &WeightedOperator,
    ) -> VariationalResult<VariationalOutcome> {
        let ansatz = build_vqe(self.num_qubits, self.depth)?;
        let optimizer = VariationalOptimizer::new(self.config.clone());
        let seed = self.seed.unwrap_or_else(rand::random);
        info!(
            num_qubits = self.num_qubits,
            depth = self.depth,
            restarts = self.restarts,
            seed,
            "solving with VQE"
        );

        let record = match (&self.initial_params, self.restarts) {
            (Some(params), _) => {
                let mut rng = StdRng::seed_from_u64(seed);
                optimizer
                    .run(oracle, &ansatz, operator, Some(params.clone()), &mut rng)
                    .await?
            }
            (None, 0) => {
                return Err(VariationalError::Config(
                    "restarts must be at least 1".into(),
                ));
            }
            (None, restarts) => {
                optimizer
                    .multi_start(oracle, &ansatz, operator, restarts, seed)
                    .await?
            }
        };

        finalize(oracle, &ansatz, &record, self.shots, self.config.timeout).await
    }
}
