//! Criterion benchmarks for tick evaluation.

use std::hint::black_box;
use std::sync::Arc;

use criterion::{criterion_group, criterion_main, Criterion};
use gridlogic_bench::{build_lattice, input_pattern, reference_profile};
use gridlogic_engine::{Evaluator, NullSink};
use gridlogic_test_utils::fixtures::random_netlist;

fn lattice_evaluator(width: i32, height: i32) -> Evaluator {
    let ev = Evaluator::new(reference_profile(), Arc::new(NullSink)).unwrap();
    ev.edit(|s| build_lattice(s, width, height)).unwrap();
    let (addresses, values) = input_pattern(height, 42);
    ev.set_bulk_states(&addresses, &values).unwrap();
    // Warm up: first tick builds the job round.
    ev.step(1).unwrap();
    ev
}

fn bench_tick_10k(c: &mut Criterion) {
    let ev = lattice_evaluator(100, 100);
    c.bench_function("tick_10k", |b| {
        b.iter(|| ev.step(1).unwrap());
    });
}

fn bench_tick_100k(c: &mut Criterion) {
    let ev = lattice_evaluator(316, 316);
    c.bench_function("tick_100k", |b| {
        b.iter(|| ev.step(1).unwrap());
    });
}

fn bench_tick_100k_single_worker(c: &mut Criterion) {
    let ev = lattice_evaluator(316, 316);
    ev.set_worker_count(1).unwrap();
    c.bench_function("tick_100k_single_worker", |b| {
        b.iter(|| ev.step(1).unwrap());
    });
}

fn bench_netlist_tick_random_10k(c: &mut Criterion) {
    let netlist = random_netlist(42, 10_000, 30_000);
    netlist.tick();
    c.bench_function("netlist_tick_random_10k", |b| {
        b.iter(|| black_box(netlist.tick()));
    });
}

fn bench_bulk_read_10k(c: &mut Criterion) {
    let ev = lattice_evaluator(100, 100);
    let cells: Vec<_> = (0..100)
        .flat_map(|y| (0..100).map(move |x| gridlogic_bench::cell_address(x, y)))
        .collect();
    c.bench_function("bulk_read_10k", |b| {
        b.iter(|| black_box(ev.get_bulk_states(&cells)));
    });
}

criterion_group!(
    benches,
    bench_tick_10k,
    bench_tick_100k,
    bench_tick_100k_single_worker,
    bench_netlist_tick_random_10k,
    bench_bulk_read_10k
);
criterion_main!(benches);
