//! hybridq variational algorithms
//!
//! Builds VQE and QAOA ansätze and drives the hybrid loop: a classical
//! Nelder-Mead minimizer proposes parameters, an
//! [`ExpectationOracle`](hybridq_hal::ExpectationOracle) returns ⟨H⟩, and
//! every energy is appended to the run history.
//!
//! # Example: QAOA for MaxCut
//!
//! ```ignore
//! use hybridq_adapter_sim::SimulatorBackend;
//! use hybridq_problems::{IsingProblem, Topology};
//! use hybridq_variational::QaoaSolver;
//!
//! let graph = Topology::Cycle.generate(4);
//! let problem = IsingProblem::for_weighted_maxcut(&graph);
//! let backend = SimulatorBackend::with_seed(1);
//!
//! let outcome = QaoaSolver::new(2).with_seed(1).solve(&backend, &problem).await?;
//! println!("{:?} -> {:?}", outcome.gammas, outcome.most_likely);
//! ```

pub mod ansatz;
pub mod error;
pub mod optimizer;
pub mod outcome;
pub mod qaoa;
pub mod run;
pub mod vqe;

pub use ansatz::{
    Ansatz, Layer, LayerKind, ParameterHandle, bind_qaoa, build_qaoa, build_vqe,
};
pub use error::{VariationalError, VariationalResult};
pub use optimizer::{Minimizer, NelderMead};
pub use outcome::{VariationalOutcome, finalize};
pub use qaoa::QaoaSolver;
pub use run::{
    NO_PARAMETERS_MESSAGE, OptimizerConfig, RunRecord, RunState, VariationalOptimizer,
};
pub use vqe::VqeSolver;
