//! A minimal oracle used through `Arc<dyn ExpectationOracle>`.

use std::sync::Arc;

use async_trait::async_trait;
use hybridq_hal::{
    Counts, ExpectationOracle, OracleError, OracleResult, bitstring, check_circuit,
    check_expectation,
};
use hybridq_ir::{Circuit, QubitId};
use hybridq_problems::WeightedOperator;
use num_complex::Complex64;

/// Reports the all-zero state regardless of the circuit.
struct ZeroStateOracle;

#[async_trait]
impl ExpectationOracle for ZeroStateOracle {
    fn name(&self) -> &str {
        "zero-state"
    }

    fn max_qubits(&self) -> usize {
        4
    }

    async fn expectation(
        &self,
        circuit: &Circuit,
        operator: &WeightedOperator,
    ) -> OracleResult<f64> {
        check_expectation(circuit, operator, self.max_qubits())?;
        operator
            .diagonal_energy(0)
            .ok_or_else(|| OracleError::Backend("off-diagonal operator".into()))
    }

    async fn sample(&self, circuit: &Circuit, shots: u32) -> OracleResult<Counts> {
        check_circuit(circuit, self.max_qubits())?;
        if shots == 0 {
            return Err(OracleError::InvalidShots(shots));
        }
        let mut counts = Counts::new();
        counts.insert(bitstring(0, circuit.num_qubits()), u64::from(shots));
        Ok(counts)
    }

    async fn statevector(&self, circuit: &Circuit) -> OracleResult<Vec<Complex64>> {
        check_circuit(circuit, self.max_qubits())?;
        let mut state = vec![Complex64::new(0.0, 0.0); 1 << circuit.num_qubits()];
        state[0] = Complex64::new(1.0, 0.0);
        Ok(state)
    }
}

// ----------------------------------------------------------------------------
// Trait object usage
// ----------------------------------------------------------------------------

#[tokio::test]
async fn oracle_is_usable_behind_arc() {
    let oracle: Arc<dyn ExpectationOracle> = Arc::new(ZeroStateOracle);
    let circuit = Circuit::with_size("empty", 2);
    let op = WeightedOperator::from_labels(&["ZZ", "IZ"], &[1.0, -0.5]).unwrap();

    assert_eq!(oracle.name(), "zero-state");
    assert!((oracle.expectation(&circuit, &op).await.unwrap() - 0.5).abs() < 1e-12);

    let counts = oracle.sample(&circuit, 16).await.unwrap();
    assert_eq!(counts.most_frequent(), Some(("00", 16)));

    let state = oracle.statevector(&circuit).await.unwrap();
    assert_eq!(state.len(), 4);
}

#[tokio::test]
async fn oracle_errors_propagate() {
    let oracle: Arc<dyn ExpectationOracle> = Arc::new(ZeroStateOracle);

    let wide = Circuit::with_size("wide", 6);
    assert!(matches!(
        oracle.sample(&wide, 10).await,
        Err(OracleError::CircuitTooLarge { num_qubits: 6, .. })
    ));

    let mut circuit = Circuit::with_size("x", 1);
    circuit.h(QubitId(0)).unwrap();
    assert!(matches!(
        oracle.sample(&circuit, 0).await,
        Err(OracleError::InvalidShots(0))
    ));
}
