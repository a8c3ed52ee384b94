//! The expectation oracle trait.
//!
//! An oracle evaluates bound circuits. Three calls are needed by the
//! variational loop and the quantum walk:
//!
//! | Method | Returns | Used for |
//! |--------|---------|----------|
//! | `expectation()` | `f64` | cost function of the minimizer |
//! | `sample()` | [`Counts`] | final distribution, walk sampling |
//! | `statevector()` | amplitudes | exact probabilities |

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use hybridq_ir::Circuit;
use hybridq_problems::WeightedOperator;
use num_complex::Complex64;

use crate::counts::Counts;
use crate::error::{OracleError, OracleResult};

/// A black-box evaluator of bound circuits.
///
/// Implementations must accept only bound circuits and must be shareable
/// across tasks.
#[async_trait]
pub trait ExpectationOracle: Send + Sync {
    /// Name of this oracle.
    fn name(&self) -> &str;

    /// Widest circuit this oracle accepts.
    fn max_qubits(&self) -> usize;

    /// ⟨ψ(circuit)| operator |ψ(circuit)⟩.
    async fn expectation(
        &self,
        circuit: &Circuit,
        operator: &WeightedOperator,
    ) -> OracleResult<f64>;

    /// Measure every qubit `shots` times.
    async fn sample(&self, circuit: &Circuit, shots: u32) -> OracleResult<Counts>;

    /// Final amplitudes, indexed little-endian.
    async fn statevector(&self, circuit: &Circuit) -> OracleResult<Vec<Complex64>>;
}

/// Reject circuits an oracle limited to `max_qubits` cannot run.
pub fn check_circuit(circuit: &Circuit, max_qubits: usize) -> OracleResult<()> {
    if circuit.num_qubits() > max_qubits {
        return Err(OracleError::CircuitTooLarge {
            num_qubits: circuit.num_qubits(),
            max_qubits,
        });
    }
    if !circuit.is_bound() {
        return Err(OracleError::Unbound);
    }
    Ok(())
}

/// [`check_circuit`] plus a width check against `operator`.
pub fn check_expectation(
    circuit: &Circuit,
    operator: &WeightedOperator,
    max_qubits: usize,
) -> OracleResult<()> {
    check_circuit(circuit, max_qubits)?;
    if operator.num_qubits() != circuit.num_qubits() {
        return Err(OracleError::WidthMismatch {
            circuit: circuit.num_qubits(),
            operator: operator.num_qubits(),
        });
    }
    Ok(())
}

/// Await an oracle call for at most `limit`.
///
/// Expiry is reported as [`OracleError::Timeout`]; the call is dropped.
pub async fn bounded<T>(
    limit: Duration,
    call: impl Future<Output = OracleResult<T>>,
) -> OracleResult<T> {
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => {
            tracing::warn!(?limit, "oracle call timed out");
            Err(OracleError::Timeout(limit))
        }
    }
}
