//! Error types for the variational layer.

use hybridq_hal::OracleError;
use hybridq_ir::IrError;
use hybridq_problems::ProblemError;
use thiserror::Error;

/// Errors raised before or outside the optimization loop.
///
/// Oracle failures during a run do not surface here; they end the run in
/// [`RunState::Failed`](crate::RunState::Failed) with the history kept.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum VariationalError {
    /// Invalid optimizer or ansatz configuration.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Wrong number of parameter values.
    #[error("Expected {expected} parameters, got {got}")]
    ParameterCount {
        /// Parameters the ansatz declares.
        expected: usize,
        /// Values supplied.
        got: usize,
    },

    /// Circuit construction error.
    #[error("Circuit error: {0}")]
    Ir(#[from] IrError),

    /// Problem construction error.
    #[error("Problem error: {0}")]
    Problem(#[from] ProblemError),

    /// Oracle error outside a run (final sampling).
    #[error("Oracle error: {0}")]
    Oracle(#[from] OracleError),
}

/// Result type for variational operations.
pub type VariationalResult<T> = Result<T, VariationalError>;
