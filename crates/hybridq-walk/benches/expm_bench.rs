//! Benchmarks for walk propagation
//!
//! Run with: cargo bench -p hybridq-walk

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use hybridq_problems::Topology;
use hybridq_walk::{QuantumWalk, evolution_operator};

fn bench_evolution_operator(c: &mut Criterion) {
    let mut group = c.benchmark_group("evolution_operator");

    for v in [4_usize, 16, 64] {
        let adjacency = Topology::Complete.generate(v);
        group.bench_with_input(BenchmarkId::new("complete", v), &v, |b, _| {
            b.iter(|| evolution_operator(black_box(adjacency.matrix()), black_box(2.5)));
        });
    }

    group.finish();
}

fn bench_trace(c: &mut Criterion) {
    let mut group = c.benchmark_group("evolution_trace");

    for v in [8_usize, 32] {
        let walk = QuantumWalk::new(Topology::Cycle.generate(v), 0).unwrap();
        group.bench_with_input(BenchmarkId::new("cycle", v), &v, |b, _| {
            b.iter(|| {
                walk.evolution_trace(black_box(20), 0.25)
                    .collect::<Result<Vec<_>, _>>()
                    .unwrap()
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_evolution_operator, bench_trace);
criterion_main!(benches);
