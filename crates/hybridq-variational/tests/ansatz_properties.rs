//! Property tests for ansatz construction and the minimizer.

use hybridq_problems::{IsingProblem, Topology};
use hybridq_variational::{LayerKind, Minimizer, NelderMead, build_qaoa, build_vqe};
use proptest::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

proptest! {
    #[test]
    fn vqe_parameter_count(n in 1_usize..6, depth in 0_usize..4, seed in any::<u64>()) {
        let ansatz = build_vqe(n, depth).unwrap();
        prop_assert_eq!(ansatz.num_parameters(), n * depth);

        let params = ansatz.sample_initial(&mut StdRng::seed_from_u64(seed));
        let circuit = ansatz.bind(&params).unwrap();
        prop_assert!(circuit.is_bound());
        prop_assert_eq!(circuit.len(), depth * (2 * n - 1));
    }

    #[test]
    fn qaoa_layers_alternate(n in 2_usize..6, p in 0_usize..4) {
        let problem = IsingProblem::for_weighted_maxcut(&Topology::Cycle.generate(n));
        let ansatz = build_qaoa(&problem, p).unwrap();
        prop_assert_eq!(ansatz.num_parameters(), 2 * p);

        let kinds: Vec<_> = ansatz.layers().iter().map(|l| l.kind).collect();
        prop_assert_eq!(kinds[0], LayerKind::Superposition);
        for (l, pair) in kinds[1..].chunks(2).enumerate() {
            prop_assert_eq!(pair, &[LayerKind::Cost, LayerKind::Mixer][..], "round {}", l);
        }
    }

    #[test]
    fn best_cost_is_minimum_reported(costs in prop::collection::vec(-10.0_f64..10.0, 1..40)) {
        let mut nm = NelderMead::new(2);
        let mut x = vec![0.1, 0.2];
        for &c in &costs {
            x = nm.step(&x, c);
        }
        let min = costs.iter().copied().fold(f64::INFINITY, f64::min);
        prop_assert_eq!(nm.best_cost(), min);
    }
}
