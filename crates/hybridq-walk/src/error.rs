//! Error types for quantum walks.

use hybridq_hal::OracleError;
use hybridq_ir::IrError;
use thiserror::Error;

/// Errors raised by the walk engine.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum WalkError {
    /// Start vertex outside the graph.
    #[error("Vertex {vertex} out of range for graph with {num_vertices} vertices")]
    InvalidVertex {
        /// Requested vertex.
        vertex: usize,
        /// Graph size.
        num_vertices: usize,
    },

    /// NaN or infinite time or step.
    #[error("Invalid {what}: {value}")]
    InvalidTime {
        /// Which quantity.
        what: &'static str,
        /// Offending value.
        value: f64,
    },

    /// Circuit construction error.
    #[error("Circuit error: {0}")]
    Ir(#[from] IrError),

    /// Oracle failure during final sampling.
    #[error("Oracle error: {0}")]
    Oracle(#[from] OracleError),

    /// A snapshot task panicked or was cancelled.
    #[error("Snapshot task failed: {0}")]
    Join(String),
}

/// Result type for walk operations.
pub type WalkResult<T> = Result<T, WalkError>;
