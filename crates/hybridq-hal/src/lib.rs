//! hybridq oracle abstraction
//!
//! The variational optimizer and the quantum walk never simulate anything
//! themselves. They hand bound circuits to an [`ExpectationOracle`], which
//! returns expectation values, sampled [`Counts`] or raw amplitudes.
//!
//! # Implementing an oracle
//!
//! ```ignore
//! use async_trait::async_trait;
//! use hybridq_hal::{Counts, ExpectationOracle, OracleResult};
//! use hybridq_ir::Circuit;
//! use hybridq_problems::WeightedOperator;
//! use num_complex::Complex64;
//!
//! struct MyOracle;
//!
//! #[async_trait]
//! impl ExpectationOracle for MyOracle {
//!     fn name(&self) -> &str { "mine" }
//!     fn max_qubits(&self) -> usize { 8 }
//!
//!     async fn expectation(&self, c: &Circuit, op: &WeightedOperator) -> OracleResult<f64> {
//!         # todo!()
//!     }
//!     async fn sample(&self, c: &Circuit, shots: u32) -> OracleResult<Counts> {
//!         # todo!()
//!     }
//!     async fn statevector(&self, c: &Circuit) -> OracleResult<Vec<Complex64>> {
//!         # todo!()
//!     }
//! }
//! ```

pub mod counts;
pub mod error;
pub mod oracle;

pub use counts::{Counts, bitstring};
pub use error::{OracleError, OracleResult};
pub use oracle::{ExpectationOracle, bounded, check_circuit, check_expectation};
