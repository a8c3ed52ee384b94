//! Error types for expectation oracles.

use std::time::Duration;

use hybridq_ir::IrError;
use thiserror::Error;

/// Errors raised while evaluating a circuit.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum OracleError {
    /// Generic backend failure.
    #[error("Backend error: {0}")]
    Backend(String),

    /// The oracle returned NaN or an infinity.
    #[error("Oracle returned a non-finite value: {0}")]
    NonFinite(f64),

    /// The call did not finish within the allotted time.
    #[error("Oracle call timed out after {0:?}")]
    Timeout(Duration),

    /// Circuit wider than the backend supports.
    #[error("Circuit has {num_qubits} qubits, backend supports at most {max_qubits}")]
    CircuitTooLarge {
        /// Qubits requested.
        num_qubits: usize,
        /// Backend limit.
        max_qubits: usize,
    },

    /// Operator and circuit disagree on the register width.
    #[error("Operator acts on {operator} qubits but circuit has {circuit}")]
    WidthMismatch {
        /// Circuit width.
        circuit: usize,
        /// Operator width.
        operator: usize,
    },

    /// Circuit still references trainable parameters.
    #[error("Circuit has unbound parameters")]
    Unbound,

    /// Invalid number of shots.
    #[error("Invalid shots: {0}")]
    InvalidShots(u32),

    /// Circuit construction error.
    #[error(transparent)]
    Ir(#[from] IrError),
}

/// Result type for oracle operations.
pub type OracleResult<T> = Result<T, OracleError>;
