//! Problem encodings for hybridq.
//!
//! Turns combinatorial problems into weighted Pauli operators:
//!
//! - [`WeightedOperator`]: ordered `(basis-string, coefficient)` terms over a
//!   fixed qubit count. Qubit 0 is the rightmost basis character.
//! - [`IsingProblem`]: upper-triangular couplings `J` plus optional fields `h`,
//!   with builders for vertex cover and weighted MaxCut.
//! - [`parse_expression`]: best-effort parsing of free text such as
//!   `"Z0 Z1 + 0.5 * X0"`; malformed input degrades to the zero operator.
//! - [`graph`]: adjacency matrices for standard topologies.
//!
//! # Example
//!
//! ```rust
//! use hybridq_problems::{Adjacency, IsingProblem};
//!
//! let adjacency = Adjacency::from_rows(vec![vec![0.0, 2.0], vec![2.0, 0.0]]).unwrap();
//! let problem = IsingProblem::for_weighted_maxcut(&adjacency);
//! assert_eq!(problem.coupling(0, 1), -2.0);
//!
//! let op = problem.to_operator();
//! assert_eq!(op.labels(), vec!["ZZ".to_string()]);
//! ```

pub mod error;
pub mod expression;
pub mod graph;
pub mod ising;
pub mod operator;
pub mod pauli;

pub use error::{ProblemError, ProblemResult};
pub use expression::parse_expression;
pub use graph::{Adjacency, Topology};
pub use ising::{IsingProblem, ProblemKind, distance_operator};
pub use operator::WeightedOperator;
pub use pauli::{MAX_QUBITS, Pauli, PauliString};
