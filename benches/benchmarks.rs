//! Benchmarks for graph-vsa operations.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use graph_vsa::vocabulary::random_symbol;
use graph_vsa::{Attribute, AttributedGraph, EncoderConfig, GraphEncoder, Operator, VsaMethod};

const METHODS: [VsaMethod; 3] = [VsaMethod::Hrr, VsaMethod::Map, VsaMethod::Vtb];

fn benchmark_bind(c: &mut Criterion) {
    let mut group = c.benchmark_group("bind_1024");
    let a = random_symbol(0, "bench", "A", 1024);
    let b = random_symbol(0, "bench", "B", 1024);

    for method in METHODS {
        let op = Operator::new(method, 1024).unwrap();
        group.bench_function(BenchmarkId::from_parameter(method), |bench| {
            bench.iter(|| op.bind(black_box(&a), black_box(&b)))
        });
    }

    group.finish();
}

fn benchmark_bundle(c: &mut Criterion) {
    let op = Operator::new(VsaMethod::Map, 1024).unwrap();
    let a = random_symbol(0, "bench", "A", 1024);
    let b = random_symbol(0, "bench", "B", 1024);

    c.bench_function("bundle_1024", |bench| {
        bench.iter(|| op.bundle(black_box(&a), black_box(&b)))
    });
}

/// A ring of `n` residues with alternating types.
fn ring(n: usize) -> AttributedGraph {
    let edges: Vec<(usize, usize)> = (0..n).map(|i| (i, (i + 1) % n)).collect();
    let mut g = AttributedGraph::from_edges(n, &edges).unwrap();
    for i in 0..n {
        g.set_node_attribute("type", i, if i % 2 == 0 { "C" } else { "N" })
            .unwrap();
    }
    g
}

fn benchmark_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode_ring_32");
    let graph = ring(32);

    for method in METHODS {
        let encoder = GraphEncoder::new(
            vec![
                Attribute::node_ids(64),
                Attribute::categorical("type", ["C", "N"]),
            ],
            EncoderConfig::default()
                .with_method(method)
                .with_dim(1024)
                .with_levels(2),
        )
        .unwrap();

        group.bench_function(BenchmarkId::from_parameter(method), |bench| {
            bench.iter(|| encoder.encode(black_box(&graph)).unwrap())
        });
    }

    group.finish();
}

fn benchmark_encoder_construction(c: &mut Criterion) {
    c.bench_function("build_encoder_512_nodes", |bench| {
        bench.iter(|| {
            GraphEncoder::new(
                vec![Attribute::node_ids(black_box(512))],
                EncoderConfig::default().with_dim(1024),
            )
            .unwrap()
        })
    });
}

criterion_group!(
    benches,
    benchmark_bind,
    benchmark_bundle,
    benchmark_encode,
    benchmark_encoder_construction,
);

criterion_main!(benches);
