use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use footprint_tracker::models::{EmissionFactors, ProjectStats, TransportMode};
use std::hint::black_box;

/// A project's worth of legs spread over every mode.
fn legs(count: usize) -> Vec<(TransportMode, f64)> {
    (0..count)
        .map(|i| {
            let mode = TransportMode::ALL[i % TransportMode::ALL.len()];
            (mode, 0.1 * (1 + i % 5000) as f64)
        })
        .collect()
}

fn benchmark_aggregate(c: &mut Criterion) {
    let factors = EmissionFactors::default();
    let mut group = c.benchmark_group("aggregate");

    for size in [20, 500, 10_000] {
        let input = legs(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &input, |b, input| {
            b.iter(|| ProjectStats::aggregate(black_box(input), &factors))
        });
    }

    group.finish();
}

fn benchmark_merge(c: &mut Criterion) {
    let factors = EmissionFactors::default();
    let baseline = ProjectStats::aggregate(&legs(50), &factors);
    let participants = ProjectStats::aggregate(&legs(2_000), &factors);

    c.bench_function("merge_baseline_participants", |b| {
        b.iter(|| black_box(&baseline).merge(black_box(&participants)))
    });
}

criterion_group!(benches, benchmark_aggregate, benchmark_merge);
criterion_main!(benches);
