//! hybridq circuit representation
//!
//! A flat, ordered instruction list over a fixed qubit register. Rotation
//! angles are either fixed numbers or references into a trainable parameter
//! vector, so the same [`Circuit`] can serve as an ansatz template and, after
//! [`Circuit::bind`], as a concrete circuit handed to an expectation oracle.
//!
//! Qubit 0 is the least-significant bit of a basis-state index.
//!
//! # Example
//!
//! ```rust
//! use hybridq_ir::{Angle, Circuit, QubitId};
//!
//! let mut circuit = Circuit::with_size("ry_chain", 2);
//! circuit.ry(Angle::param(0), QubitId(0)).unwrap();
//! circuit.ry(Angle::param(1), QubitId(1)).unwrap();
//! circuit.cx(QubitId(0), QubitId(1)).unwrap();
//!
//! assert_eq!(circuit.num_parameters(), 2);
//! let bound = circuit.bind(&[0.1, 0.2]).unwrap();
//! assert!(bound.is_bound());
//! ```
//!
//! # Supported Gates
//!
//! | Gate | Qubits | Description |
//! |------|--------|-------------|
//! | `H` | 1 | Hadamard gate |
//! | `X` | 1 | Pauli-X, used for basis-state preparation |
//! | `Rx`, `Ry`, `Rz` | 1 | Rotation gates |
//! | `CX` | 2 | Controlled-NOT |
//! | `Unitary` | k | Dense 2^k x 2^k matrix with a label |

pub mod angle;
pub mod circuit;
pub mod error;
pub mod gate;
pub mod instruction;
pub mod qubit;

pub use angle::Angle;
pub use circuit::Circuit;
pub use error::{IrError, IrResult};
pub use gate::{Gate, UnitaryGate};
pub use instruction::Instruction;
pub use qubit::QubitId;
