//! Walk behavior against the statevector simulator and a scripted oracle.

use std::time::Duration;

use async_trait::async_trait;
use hybridq_adapter_sim::SimulatorBackend;
use hybridq_hal::{Counts, ExpectationOracle, OracleError, OracleResult};
use hybridq_ir::Circuit;
use hybridq_problems::{Topology, WeightedOperator};
use hybridq_walk::{QuantumWalk, WalkConfig, WalkError};
use num_complex::Complex64;
use proptest::prelude::*;

/// Returns fixed counts, padding outcomes included.
struct ScriptedOracle(Vec<(&'static str, u64)>);

#[async_trait]
impl ExpectationOracle for ScriptedOracle {
    fn name(&self) -> &str {
        "scripted"
    }

    fn max_qubits(&self) -> usize {
        8
    }

    async fn expectation(&self, _: &Circuit, _: &WeightedOperator) -> OracleResult<f64> {
        Err(OracleError::Backend("not supported".into()))
    }

    async fn sample(&self, _: &Circuit, _: u32) -> OracleResult<Counts> {
        Ok(self.0.iter().map(|&(k, v)| (k.to_string(), v)).collect())
    }

    async fn statevector(&self, _: &Circuit) -> OracleResult<Vec<Complex64>> {
        Err(OracleError::Backend("not supported".into()))
    }
}

/// Accepts circuits and never answers.
struct StalledOracle;

#[async_trait]
impl ExpectationOracle for StalledOracle {
    fn name(&self) -> &str {
        "stalled"
    }

    fn max_qubits(&self) -> usize {
        8
    }

    async fn expectation(&self, _: &Circuit, _: &WeightedOperator) -> OracleResult<f64> {
        Err(OracleError::Backend("not supported".into()))
    }

    async fn sample(&self, _: &Circuit, _: u32) -> OracleResult<Counts> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Ok(Counts::new())
    }

    async fn statevector(&self, _: &Circuit) -> OracleResult<Vec<Complex64>> {
        Err(OracleError::Backend("not supported".into()))
    }
}

const LIMIT: Duration = Duration::from_secs(30);

fn topology() -> impl Strategy<Value = Topology> {
    prop_oneof![
        Just(Topology::Cycle),
        Just(Topology::Path),
        Just(Topology::Complete),
        Just(Topology::Star),
        Just(Topology::Grid),
    ]
}

// ----------------------------------------------------------------------------
// Exact evolution
// ----------------------------------------------------------------------------

proptest! {
    #[test]
    fn probabilities_are_normalized(
        topo in topology(),
        v in 2_usize..9,
        start in 0_usize..9,
        t in 0.0_f64..6.0,
    ) {
        let start = start % v;
        let walk = QuantumWalk::new(topo.generate(v), start).unwrap();
        let full = walk.register_probabilities(t).unwrap();
        prop_assert_eq!(full.len(), walk.dimension());

        let total: f64 = full.iter().sum();
        prop_assert!((total - 1.0).abs() < 1e-9, "total = {}", total);
        prop_assert!(full[v..].iter().all(|&p| p == 0.0));
    }

    #[test]
    fn time_zero_is_localized(topo in topology(), v in 1_usize..9, start in 0_usize..9) {
        let start = start % v;
        let walk = QuantumWalk::new(topo.generate(v), start).unwrap();
        let p = walk.probability_at(0.0).unwrap();
        for (i, &pi) in p.iter().enumerate() {
            prop_assert_eq!(pi, if i == start { 1.0 } else { 0.0 });
        }
    }

    #[test]
    fn trace_has_one_snapshot_per_step(steps in 0_usize..12, dt in 0.01_f64..1.0) {
        let walk = QuantumWalk::new(Topology::Cycle.generate(5), 0).unwrap();
        let trace: Vec<_> = walk
            .evolution_trace(steps, dt)
            .collect::<Result<_, _>>()
            .unwrap();
        prop_assert_eq!(trace.len(), steps + 1);
        for s in &trace {
            prop_assert_eq!(s.probabilities.len(), 5);
        }
    }
}

#[test]
fn symmetric_graph_spreads_symmetrically() {
    // On a cycle the two neighbours of the start vertex stay equally likely.
    let walk = QuantumWalk::new(Topology::Cycle.generate(6), 0).unwrap();
    for t in [0.4, 1.3, 2.2] {
        let p = walk.probability_at(t).unwrap();
        assert!((p[1] - p[5]).abs() < 1e-10);
        assert!((p[2] - p[4]).abs() < 1e-10);
    }
}

#[tokio::test]
async fn parallel_trace_matches_sequential() {
    let walk = QuantumWalk::new(Topology::Star.generate(7), 3).unwrap();
    let sequential: Vec<_> = walk
        .evolution_trace(8, 0.3)
        .collect::<Result<_, _>>()
        .unwrap();
    let parallel = walk.evolution_trace_parallel(8, 0.3).await.unwrap();
    assert_eq!(sequential, parallel);
    assert_eq!(parallel[8].time, 2.4);
}

// ----------------------------------------------------------------------------
// Final sampling
// ----------------------------------------------------------------------------

#[tokio::test]
async fn sampling_at_time_zero_hits_start_vertex() {
    let backend = SimulatorBackend::with_seed(3);
    let walk = QuantumWalk::new(Topology::Path.generate(6), 5).unwrap();
    let sample = walk.final_state_sampling(&backend, 0.0, 200, LIMIT).await.unwrap();

    assert_eq!(sample.counts.get("101"), 200);
    assert_eq!(sample.counts.len(), 1);
    assert_eq!(sample.most_likely_state, "101");
    assert_eq!(sample.most_likely_vertex, 5);
}

#[tokio::test]
async fn sampling_never_reports_padding() {
    let backend = SimulatorBackend::with_seed(11);
    let walk = QuantumWalk::new(Topology::Cycle.generate(5), 2).unwrap();
    let sample = walk.final_state_sampling(&backend, 1.7, 2000, LIMIT).await.unwrap();

    assert_eq!(sample.counts.total_shots(), 2000);
    for (state, _) in sample.counts.iter() {
        assert!(usize::from_str_radix(state, 2).unwrap() < 5, "{state}");
    }
}

#[tokio::test]
async fn padding_outcomes_are_dropped_not_renormalized() {
    let oracle = ScriptedOracle(vec![("00", 10), ("10", 30), ("11", 60)]);
    let walk = QuantumWalk::new(Topology::Path.generate(3), 0).unwrap();
    let sample = walk.final_state_sampling(&oracle, 1.0, 100, LIMIT).await.unwrap();

    assert_eq!(sample.counts.total_shots(), 40);
    assert_eq!(sample.counts.get("11"), 0);
    assert_eq!(sample.most_likely_state, "10");
    assert_eq!(sample.most_likely_vertex, 2);
}

#[tokio::test]
async fn all_padding_defaults_to_zero_state() {
    let oracle = ScriptedOracle(vec![("11", 5)]);
    let walk = QuantumWalk::new(Topology::Path.generate(3), 1).unwrap();
    let sample = walk.final_state_sampling(&oracle, 1.0, 5, LIMIT).await.unwrap();

    assert!(sample.counts.is_empty());
    assert_eq!(sample.most_likely_state, "00");
    assert_eq!(sample.most_likely_vertex, 0);
}

#[tokio::test]
async fn oracle_errors_are_wrapped() {
    let backend = SimulatorBackend::with_seed(1).with_max_qubits(2);
    let walk = QuantumWalk::new(Topology::Cycle.generate(8), 0).unwrap();
    let err = walk.final_state_sampling(&backend, 1.0, 10, LIMIT).await.unwrap_err();
    assert!(matches!(
        err,
        WalkError::Oracle(OracleError::CircuitTooLarge { .. })
    ));
}

#[tokio::test]
async fn run_reports_full_outcome() {
    let backend = SimulatorBackend::with_seed(5);
    let walk = QuantumWalk::new(Topology::Complete.generate(4), 1).unwrap();
    let config = WalkConfig {
        num_steps: 4,
        dt: 0.25,
        shots: 512,
        ..WalkConfig::default()
    };
    let outcome = walk.run(&backend, config).await.unwrap();

    assert_eq!(outcome.probability_evolution.len(), 5);
    assert_eq!(outcome.probability_evolution[4].time, 1.0);
    assert_eq!(outcome.final_counts.total_shots(), 512);
    assert_eq!(outcome.num_qubits, 2);
    assert_eq!(outcome.num_vertices, 4);
    assert_eq!(outcome.initial_vertex, 1);
    assert_eq!(
        outcome.most_likely_state,
        hybridq_hal::bitstring(outcome.most_likely_vertex, 2)
    );
}

#[tokio::test(start_paused = true)]
async fn stalled_sampling_times_out() {
    let walk = QuantumWalk::new(Topology::Cycle.generate(4), 0).unwrap();
    let config = WalkConfig {
        num_steps: 2,
        dt: 0.5,
        shots: 10,
        timeout: Duration::from_millis(50),
    };
    let err = walk.run(&StalledOracle, config).await.unwrap_err();
    assert!(matches!(
        err,
        WalkError::Oracle(OracleError::Timeout(limit)) if limit == Duration::from_millis(50)
    ));

    let err = walk
        .final_state_sampling(&StalledOracle, 1.0, 10, Duration::from_secs(1))
        .await
        .unwrap_err();
    assert!(matches!(err, WalkError::Oracle(OracleError::Timeout(_))));
}
