//! # View Benchmark
//!
//! Cost of multi-component views as pool sizes diverge. Iteration should
//! scale with the smallest pool, not with the entity count.
//!
//! Run with: `cargo bench --package bismuth_core --bench view_benchmark`

// Benchmarks don't need docs and may have intentionally unused code
#![allow(missing_docs)]
#![allow(dead_code)]

use bismuth_core::Registry;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

const ENTITY_COUNT: usize = 100_000;

#[derive(Clone, Copy, Debug, Default)]
struct Position {
    x: f32,
    y: f32,
}

#[derive(Clone, Copy, Debug, Default)]
struct Velocity {
    x: f32,
    y: f32,
}

#[derive(Clone, Copy, Debug, Default)]
struct Frozen;

/// Every entity has a position; one in `stride` also has a velocity.
fn sparse_world(stride: usize) -> Registry {
    let mut registry = Registry::new();
    for i in 0..ENTITY_COUNT {
        let entity = registry.create_entity();
        let f = i as f32;
        registry.emplace_component(entity, Position { x: f, y: f }).expect("emplace component");
        if i % stride == 0 {
            registry.emplace_component(entity, Velocity { x: 0.1, y: 0.2 }).expect("emplace component");
        }
        if i % 1_000 == 0 {
            registry.emplace_component(entity, Frozen).expect("emplace component");
        }
    }
    registry
}

/// Benchmark: Integrate velocity into position, at varying overlap.
fn bench_integrate(c: &mut Criterion) {
    let mut group = c.benchmark_group("integrate_positions");

    for stride in [1, 10, 100] {
        let mut registry = sparse_world(stride);
        group.bench_with_input(BenchmarkId::from_parameter(stride), &stride, |b, _| {
            b.iter(|| {
                registry
                    .view::<(Position, Velocity)>()
                    .expect("build view")
                    .for_each_mut(|_, (position, velocity)| {
                        position.x += velocity.x * 0.016;
                        position.y += velocity.y * 0.016;
                    });
            });
        });
    }

    group.finish();
}

/// Benchmark: Read-only view iteration.
fn bench_view_iter(c: &mut Criterion) {
    let mut registry = sparse_world(10);

    c.bench_function("view_iter_stride_10", |b| {
        b.iter(|| {
            let mut sum = 0.0_f32;
            let view = registry.view::<(Position, Velocity)>().expect("build view");
            for (_, (position, velocity)) in &view {
                sum += position.x * velocity.x + position.y * velocity.y;
            }
            black_box(sum)
        });
    });
}

/// Benchmark: A tiny pool drives a three-type view over large pools.
fn bench_small_driver(c: &mut Criterion) {
    let mut registry = sparse_world(1);

    c.bench_function("view_small_driver", |b| {
        b.iter(|| {
            registry
                .view::<(Position, Velocity, Frozen)>()
                .expect("build view")
                .count()
        });
    });
}

criterion_group!(benches, bench_integrate, bench_view_iter, bench_small_driver);

criterion_main!(benches);
