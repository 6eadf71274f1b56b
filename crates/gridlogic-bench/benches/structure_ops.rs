//! Criterion micro-benchmarks for structural edits and compaction.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use gridlogic_address::AddressTree;
use gridlogic_core::{Address, CircuitId, GateId, GateKind, Position};
use gridlogic_netlist::NetList;
use gridlogic_test_utils::fixtures::{junction_chain, random_netlist};

fn bench_build_chain_10k(c: &mut Criterion) {
    c.bench_function("build_chain_10k", |b| {
        b.iter(|| {
            let mut n = NetList::with_capacity(10_001);
            black_box(junction_chain(&mut n, 10_000).unwrap());
        });
    });
}

fn bench_compress_10k_with_holes(c: &mut Criterion) {
    c.bench_function("compress_10k_with_holes", |b| {
        b.iter_batched(
            || random_netlist(7, 10_000, 20_000),
            |mut n| black_box(n.compress_gates()),
            BatchSize::LargeInput,
        );
    });
}

fn bench_tree_remap_10k(c: &mut Criterion) {
    let setup = || {
        let mut n = NetList::new();
        let mut tree = AddressTree::new(CircuitId(0));
        for i in 0..10_000 {
            let id = n.add_gate(GateKind::Or, false);
            let addr = Address::leaf(Position::new(i % 100, i / 100));
            tree.insert(&addr, id).unwrap();
        }
        for i in (0..10_000).step_by(3) {
            let addr = Address::leaf(Position::new(i % 100, i / 100));
            let id = tree.remove(&addr).unwrap();
            n.decommission_gate(id).unwrap();
        }
        (n, tree)
    };
    c.bench_function("tree_remap_10k", |b| {
        b.iter_batched(
            setup,
            |(mut n, mut tree)| {
                let remap = n.compress_gates();
                tree.on_compress(&remap);
                black_box(tree.resolve(&Address::leaf(Position::new(1, 0))))
            },
            BatchSize::LargeInput,
        );
    });
}

fn bench_decommission_reuse(c: &mut Criterion) {
    let mut n = random_netlist(3, 10_000, 30_000);
    c.bench_function("decommission_reuse", |b| {
        let mut i = 0u32;
        b.iter(|| {
            let id = GateId(i % 10_000);
            i = i.wrapping_add(1);
            if n.decommission_gate(id).is_ok() {
                black_box(n.add_gate(GateKind::And, true));
            }
        });
    });
}

criterion_group!(
    benches,
    bench_build_chain_10k,
    bench_compress_10k_with_holes,
    bench_tree_remap_10k,
    bench_decommission_reuse
);
criterion_main!(benches);
