//! hybridq local statevector oracle
//!
//! An exact [`ExpectationOracle`](hybridq_hal::ExpectationOracle) for small
//! registers. Expectation values are computed directly from the amplitudes,
//! so the only randomness is in [`sample`](hybridq_hal::ExpectationOracle::sample).
//!
//! # Performance
//!
//! | Qubits | Memory |
//! |--------|--------|
//! | 10 | ~16 KB |
//! | 15 | ~512 KB |
//! | 20 | ~16 MB |
//!
//! # Example
//!
//! ```ignore
//! use hybridq_adapter_sim::SimulatorBackend;
//! use hybridq_hal::ExpectationOracle;
//! use hybridq_ir::{Circuit, QubitId};
//! use hybridq_problems::WeightedOperator;
//!
//! let backend = SimulatorBackend::with_seed(7);
//! let mut circuit = Circuit::with_size("bell", 2);
//! circuit.h(QubitId(0))?.cx(QubitId(0), QubitId(1))?;
//!
//! let zz = WeightedOperator::from_labels(&["ZZ"], &[1.0])?;
//! assert_eq!(backend.expectation(&circuit, &zz).await?, 1.0);
//! ```

mod simulator;
mod statevector;

pub use simulator::{DEFAULT_MAX_QUBITS, SimulatorBackend};
pub use statevector::Statevector;
