//! Simulator oracle implementation.

use std::sync::{Mutex, PoisonError};
use std::time::Instant;

use async_trait::async_trait;
use num_complex::Complex64;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, instrument};

use hybridq_hal::{
    Counts, ExpectationOracle, OracleError, OracleResult, check_circuit, check_expectation,
};
use hybridq_ir::Circuit;
use hybridq_problems::WeightedOperator;

use crate::statevector::Statevector;

/// Default register limit (~16 MB of amplitudes).
pub const DEFAULT_MAX_QUBITS: usize = 20;

/// Local exact statevector oracle.
///
/// Expectation values are exact; only [`sample`](ExpectationOracle::sample)
/// draws from the shared, optionally seeded random source.
pub struct SimulatorBackend {
    name: String,
    /// Maximum number of qubits supported.
    max_qubits: usize,
    rng: Mutex<StdRng>,
}

impl SimulatorBackend {
    /// Create a new simulator with entropy-seeded sampling.
    pub fn new() -> Self {
        Self {
            name: "statevector".into(),
            max_qubits: DEFAULT_MAX_QUBITS,
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Create a simulator whose sampling is reproducible.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
            ..Self::new()
        }
    }

    /// Override the register limit.
    pub fn with_max_qubits(mut self, max_qubits: usize) -> Self {
        self.max_qubits = max_qubits;
        self
    }

    /// Simulate `circuit` from |0...0⟩.
    #[instrument(skip(self, circuit), fields(circuit = circuit.name()))]
    pub fn run(&self, circuit: &Circuit) -> OracleResult<Statevector> {
        check_circuit(circuit, self.max_qubits)?;
        let start = Instant::now();

        let mut sv = Statevector::new(circuit.num_qubits());
        for inst in circuit.instructions() {
            sv.apply(inst)?;
        }

        debug!(
            num_qubits = circuit.num_qubits(),
            gates = circuit.len(),
            elapsed = ?start.elapsed(),
            "simulation finished"
        );
        Ok(sv)
    }
}

impl Default for SimulatorBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ExpectationOracle for SimulatorBackend {
    fn name(&self) -> &str {
        &self.name
    }

    fn max_qubits(&self) -> usize {
        self.max_qubits
    }

    #[instrument(skip(self, circuit, operator))]
    async fn expectation(
        &self,
        circuit: &Circuit,
        operator: &WeightedOperator,
    ) -> OracleResult<f64> {
        check_expectation(circuit, operator, self.max_qubits)?;
        let energy = self.run(circuit)?.expectation(operator);
        debug!(energy, terms = operator.num_terms(), "expectation");
        Ok(energy)
    }

    #[instrument(skip(self, circuit))]
    async fn sample(&self, circuit: &Circuit, shots: u32) -> OracleResult<Counts> {
        if shots == 0 {
            return Err(OracleError::InvalidShots(shots));
        }
        let sv = self.run(circuit)?;
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(sv.sample(shots, &mut *rng))
    }

    async fn statevector(&self, circuit: &Circuit) -> OracleResult<Vec<Complex64>> {
        Ok(self.run(circuit)?.into_amplitudes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hybridq_ir::{Angle, QubitId};

    fn bell() -> Circuit {
        let mut circuit = Circuit::with_size("bell", 2);
        circuit.h(QubitId(0)).unwrap();
        circuit.cx(QubitId(0), QubitId(1)).unwrap();
        circuit
    }

    #[tokio::test]
    async fn test_simulator_bell_state() {
        let backend = SimulatorBackend::with_seed(1);
        let counts = backend.sample(&bell(), 1000).await.unwrap();

        assert_eq!(counts.get("00") + counts.get("11"), 1000);
        assert_eq!(counts.get("01") + counts.get("10"), 0);
    }

    #[tokio::test]
    async fn test_simulator_expectation() {
        let backend = SimulatorBackend::new();
        let op = WeightedOperator::from_labels(&["ZZ", "IZ"], &[2.0, 1.0]).unwrap();
        let energy = backend.expectation(&bell(), &op).await.unwrap();
        assert!((energy - 2.0).abs() < 1e-12);
    }

    #[tokio::test]
    async fn test_simulator_statevector() {
        let backend = SimulatorBackend::new();
        let mut circuit = Circuit::with_size("x1", 2);
        circuit.x(QubitId(1)).unwrap();
        let state = backend.statevector(&circuit).await.unwrap();
        assert!((state[2].re - 1.0).abs() < 1e-12);
    }

    #[tokio::test]
    async fn test_simulator_seeded_sampling_reproducible() {
        let mut circuit = Circuit::with_size("plus", 3);
        for q in 0..3 {
            circuit.h(QubitId(q)).unwrap();
        }
        let a = SimulatorBackend::with_seed(9).sample(&circuit, 256).await.unwrap();
        let b = SimulatorBackend::with_seed(9).sample(&circuit, 256).await.unwrap();
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn test_simulator_too_many_qubits() {
        let backend = SimulatorBackend::new().with_max_qubits(5);
        let circuit = Circuit::with_size("test", 10);
        let result = backend.sample(&circuit, 100).await;
        assert!(matches!(result, Err(OracleError::CircuitTooLarge { .. })));
    }

    #[tokio::test]
    async fn test_simulator_rejects_unbound_and_zero_shots() {
        let backend = SimulatorBackend::new();
        let mut circuit = Circuit::with_size("p", 1);
        circuit.rx(Angle::param(0), QubitId(0)).unwrap();
        assert!(matches!(
            backend.statevector(&circuit).await,
            Err(OracleError::Unbound)
        ));
        assert!(matches!(
            backend.sample(&bell(), 0).await,
            Err(OracleError::InvalidShots(0))
        ));
    }
}
