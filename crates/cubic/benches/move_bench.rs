//! Criterion benches for the moving engine on noisy plane samples.
//!
//! - `initialize`: removal costs plus every cell, with and without constraints.
//! - `greedy_move`: the full driver, incremental vs. brute force.
//!
//! Results live under `target/criterion`.

use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use cubic::moving::{greedy_move, GreedyMoving};
use cubic::naive::naive_greedy_move;
use cubic::planes::{sample_planes, PlaneCost, PlaneSample, ReplayToken, SampleCfg, Vec3};
use cubic::Constraints;

fn sample(per_plane: usize, stddev: f64) -> PlaneSample {
    let mut rng = ReplayToken { seed: 7, index: 3 }.to_std_rng();
    let axes = [Vec3::x(), Vec3::y(), Vec3::z()];
    let cfg = SampleCfg {
        points_per_plane: per_plane,
        stddev,
    };
    sample_planes(&axes, cfg, &mut rng).unwrap()
}

/// Forbid every pair drawn from different planes whose indices differ by one.
fn neighbour_cuts(truth: &[usize]) -> Constraints {
    Constraints::from_predicate(truth.len(), |i, j| j == i + 1 && truth[i] != truth[j])
}

fn bench_initialize(c: &mut Criterion) {
    let mut group = c.benchmark_group("move_init");
    let cost = PlaneCost::for_noise(0.01);
    for per_plane in [5usize, 10, 20] {
        let s = sample(per_plane, 0.01);
        let cuts = neighbour_cuts(&s.truth);
        group.bench_with_input(BenchmarkId::new("initialize", s.points.len()), &s, |b, s| {
            b.iter_batched(
                || GreedyMoving::new(&s.points, &cost, None),
                |mut engine| {
                    let _ = engine.initialize();
                },
                BatchSize::SmallInput,
            )
        });
        group.bench_with_input(
            BenchmarkId::new("initialize_constrained", s.points.len()),
            &s,
            |b, s| {
                b.iter_batched(
                    || GreedyMoving::new(&s.points, &cost, Some(&cuts)),
                    |mut engine| {
                        let _ = engine.initialize();
                    },
                    BatchSize::SmallInput,
                )
            },
        );
    }
    group.finish();
}

fn bench_driver(c: &mut Criterion) {
    let mut group = c.benchmark_group("move_driver");
    group.sample_size(10);
    let cost = PlaneCost::for_noise(0.01);
    for per_plane in [4usize, 6] {
        let s = sample(per_plane, 0.01);
        group.bench_with_input(BenchmarkId::new("greedy_move", s.points.len()), &s, |b, s| {
            b.iter(|| greedy_move(&s.points, &cost, None))
        });
        group.bench_with_input(
            BenchmarkId::new("naive_greedy_move", s.points.len()),
            &s,
            |b, s| b.iter(|| naive_greedy_move(&s.points, &cost, None)),
        );
    }
    group.finish();
}

criterion_group!(benches, bench_initialize, bench_driver);
criterion_main!(benches);
