//! Error types for problem construction.

use thiserror::Error;

/// Structural errors in strict problem input.
///
/// Free-text expressions never produce these; see
/// [`parse_expression`](crate::parse_expression).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProblemError {
    /// Matrix is not square.
    #[error("Matrix must be square: row {row} has {len} entries, expected {expected}")]
    NotSquare {
        /// Offending row.
        row: usize,
        /// Entries in that row.
        len: usize,
        /// Expected row length.
        expected: usize,
    },

    /// Adjacency matrix is not symmetric.
    #[error("Adjacency matrix is not symmetric at ({i}, {j}): {a} != {b}")]
    NotSymmetric {
        /// Row index.
        i: usize,
        /// Column index.
        j: usize,
        /// Value at (i, j).
        a: f64,
        /// Value at (j, i).
        b: f64,
    },

    /// Declared qubit count disagrees with the data.
    #[error("{what} has size {got}, expected {expected}")]
    DimensionMismatch {
        /// Which input was wrong.
        what: &'static str,
        /// Expected size.
        expected: usize,
        /// Actual size.
        got: usize,
    },

    /// Basis-string contains a symbol outside {I, X, Y, Z}.
    #[error("Invalid Pauli symbol '{symbol}' in basis string '{label}'")]
    InvalidPauli {
        /// The offending character.
        symbol: char,
        /// The full label.
        label: String,
    },

    /// Coefficient is NaN or infinite.
    #[error("Coefficient {value} for term {term} is not finite")]
    NonFiniteCoefficient {
        /// Term position.
        term: usize,
        /// The value.
        value: f64,
    },

    /// Basis strings wider than the supported register.
    #[error("Operator has {num_qubits} qubits, at most {max} are supported")]
    TooManyQubits {
        /// Requested width.
        num_qubits: usize,
        /// Supported width.
        max: usize,
    },

    /// Problem needs at least one qubit.
    #[error("Problem must have at least one qubit")]
    Empty,

    /// Vertex index outside the graph.
    #[error("Vertex {vertex} out of range for graph with {num_vertices} vertices")]
    VertexOutOfRange {
        /// Requested vertex.
        vertex: usize,
        /// Graph size.
        num_vertices: usize,
    },
}

/// Result type for problem construction.
pub type ProblemResult<T> = Result<T, ProblemError>;
