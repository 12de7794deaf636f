//! # Tick Benchmarks
//!
//! Performance benchmarks for odometer-core tick propagation.
//!
//! Run with: `cargo bench -p odometer-core`

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use odometer_core::{Chain, ChainBuilder, Layout, OverflowPolicy, Readout};
use std::hint::black_box;

/// Create a carrying chain of `depth` stages with modulus 2, the worst case
/// for ripple length.
fn create_binary_chain(depth: usize) -> Chain {
    (0..depth)
        .fold(ChainBuilder::new(), |b, i| b.stage(format!("bit{}", i), 2))
        .unbounded("overflow")
        .build()
        .expect("build")
}

// =============================================================================
// BENCHMARKS
// =============================================================================

fn bench_hours_meter_ticks(c: &mut Criterion) {
    let mut group = c.benchmark_group("hours_meter_ticks");

    for ticks in [1_000u64, 100_000, 1_000_000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(ticks), ticks, |b, &ticks| {
            b.iter(|| {
                let mut chain = Chain::from_layout(&Layout::hours_meter()).expect("build");
                black_box(chain.advance(ticks))
            });
        });
    }

    group.finish();
}

fn bench_full_ripple(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_ripple");

    for depth in [4usize, 16, 48].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(depth), depth, |b, &depth| {
            let mut chain = create_binary_chain(depth);
            b.iter(|| black_box(chain.tick()));
        });
    }

    group.finish();
}

fn bench_saturated_chain(c: &mut Criterion) {
    let mut chain = ChainBuilder::new()
        .stage("low", 10)
        .stage("high", 10)
        .policy(OverflowPolicy::Sticky)
        .build()
        .expect("build");
    chain.advance(1_000);

    c.bench_function("saturated_tick", |b| b.iter(|| black_box(chain.tick())));
}

fn bench_render(c: &mut Criterion) {
    let mut chain = Chain::from_layout(&Layout::hours_meter()).expect("build");
    chain.advance(2_222_222);
    let readout = Readout::hours_meter();

    c.bench_function("render_hours_meter", |b| {
        b.iter(|| black_box(readout.render(&chain.readings())))
    });
}

criterion_group!(
    benches,
    bench_hours_meter_ticks,
    bench_full_ripple,
    bench_saturated_chain,
    bench_render
);
criterion_main!(benches);
