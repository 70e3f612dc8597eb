//! Benchmarks for graph construction and reference evaluation.
//!
//! Run with:
//! ```bash
//! cargo bench --bench graph_build
//! ```

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use scirs2_core::ndarray_ext::{ArrayD, IxDyn};
use std::hint::black_box;
use tenrso_graph::{const_shape, ComputeGraph, Evaluator, GraphBuilder};

/// Register a chain of elementwise nodes
fn bench_chain_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("chain_build");

    for depth in [10usize, 100, 1000] {
        group.throughput(Throughput::Elements(depth as u64));
        group.bench_with_input(BenchmarkId::from_parameter(depth), &depth, |b, &depth| {
            b.iter(|| {
                let graph = ComputeGraph::new();
                let mut last = graph.placeholder(&const_shape(&[16, 16]), "x").unwrap();
                for _ in 0..depth {
                    let prev = last.clone();
                    last = graph
                        .compute(&const_shape(&[16, 16]), Some("step"), None, &|idx| {
                            prev.at(idx) + 1
                        })
                        .unwrap();
                }
                black_box(graph.len());
            });
        });
    }

    group.finish();
}

/// Materialize a transposed view through the interpreter
fn bench_materialize(c: &mut Criterion) {
    let mut group = c.benchmark_group("materialize");

    for n in [8usize, 32, 64] {
        let graph = ComputeGraph::new();
        let a = graph.placeholder(&const_shape(&[n, n]), "a").unwrap();
        let t = graph
            .compute(&const_shape(&[n, n]), Some("t"), None, &|idx| {
                a.at(&[idx[1].clone(), idx[0].clone()])
            })
            .unwrap();
        let data =
            ArrayD::from_shape_vec(IxDyn(&[n, n]), (0..n * n).map(|v| v as f64).collect())
                .unwrap();
        let mut eval = Evaluator::new(&graph);
        eval.bind(&a, data).unwrap();

        group.throughput(Throughput::Elements((n * n) as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &t, |b, t| {
            b.iter(|| black_box(eval.materialize(black_box(t)).unwrap()));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_chain_build, bench_materialize);
criterion_main!(benches);
