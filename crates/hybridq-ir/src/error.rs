//! Error types for the IR crate.

use crate::qubit::QubitId;
use thiserror::Error;

/// Errors that can occur in IR operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IrError {
    /// Qubit index outside the circuit register.
    #[error("Qubit {qubit} out of range for {num_qubits}-qubit circuit (gate: {gate_name})")]
    QubitOutOfRange {
        /// The offending qubit.
        qubit: QubitId,
        /// Register width.
        num_qubits: u32,
        /// Gate being applied.
        gate_name: String,
    },

    /// Duplicate qubit in operation.
    #[error("Duplicate qubit {qubit} in operation (gate: {gate_name})")]
    DuplicateQubit {
        /// The duplicate qubit.
        qubit: QubitId,
        /// Gate being applied.
        gate_name: String,
    },

    /// Gate requires a different number of qubits.
    #[error("Gate '{gate_name}' requires {expected} qubits, got {got}")]
    QubitCountMismatch {
        /// Name of the gate.
        gate_name: String,
        /// Expected number of qubits.
        expected: usize,
        /// Actual number of qubits provided.
        got: usize,
    },

    /// Parameter reference with no value supplied.
    #[error("Parameter {index} is unbound ({available} values supplied)")]
    UnboundParameter {
        /// Referenced parameter index.
        index: usize,
        /// Length of the supplied parameter vector.
        available: usize,
    },

    /// A unitary matrix with an unusable shape.
    #[error("Unitary '{label}' has shape {rows}x{cols}, expected a square power-of-two matrix")]
    UnitaryShape {
        /// Gate label.
        label: String,
        /// Row count.
        rows: usize,
        /// Column count.
        cols: usize,
    },
}

/// Result type for IR operations.
pub type IrResult<T> = Result<T, IrError>;
