//! Shape Pipeline Example
//!
//! Builds a small chain of lazy shape transforms, prints the index
//! expressions each node reads through, and evaluates the result with the
//! reference evaluator.
//!
//! Run with `RUST_LOG=tenrso_transform=debug` and `--features tracing` to
//! see one event per built node.

use anyhow::Result;
use scirs2_core::ndarray_ext::{ArrayD, IxDyn};
use tenrso_lazy::prelude::*;
use tenrso_lazy::tracing_support::{init_tracing, record_graph, TracingConfig};

fn main() -> Result<()> {
    init_tracing(TracingConfig::default())?;

    println!("=== Lazy Shape Transforms ===\n");

    println!("Example 1: Split, Reorder, Rejoin");
    split_and_rejoin()?;

    println!("\nExample 2: Symbolic Shapes");
    symbolic_shapes()?;

    Ok(())
}

fn ramp(shape: &[usize]) -> Result<ArrayD<f64>> {
    let n: usize = shape.iter().product();
    Ok(ArrayD::from_shape_vec(
        IxDyn(shape),
        (0..n).map(|v| v as f64).collect(),
    )?)
}

/// Swap the two halves of each row, then flatten
fn split_and_rejoin() -> Result<()> {
    let graph = ComputeGraph::new();
    let x = graph.placeholder(&const_shape(&[2, 6]), "x")?;
    let mapper = CoordinateMapper::new(&graph);

    let halves = mapper.split(&x, 2usize, 1)?;
    let swapped = mapper.concatenate(&[halves[1].clone(), halves[0].clone()], 1)?;
    let flat = mapper.reshape(&swapped, &const_shape(&[12]))?;

    for node in graph.topo_order(&[flat.clone()])? {
        match node.body() {
            Some(body) => println!("  {} = {}", node, body),
            None => println!("  {} (placeholder)", node),
        }
    }

    let mut eval = Evaluator::new(&graph);
    eval.bind(&x, ramp(&[2, 6])?)?;
    println!("  x    = {:?}", eval.materialize(&x)?.as_slice());
    println!("  flat = {:?}", eval.materialize(&flat)?.as_slice());

    record_graph(&graph);
    Ok(())
}

/// Flatten a tensor whose leading dimension is only known at evaluation
fn symbolic_shapes() -> Result<()> {
    let graph = ComputeGraph::new();
    let n = Var::new("n");
    let x = graph.placeholder(&[Expr::var(&n), Expr::int(3)], "x")?;
    let mapper = CoordinateMapper::new(&graph);

    let t = mapper.transpose(&x, None)?;
    let e = mapper.expand_dims(&t, 0, 1)?;
    println!("  transpose: {}", t);
    println!("  expand_dims: {}", e);
    if let Some(body) = e.body() {
        println!("  body: {}", body);
    }

    let mut eval = Evaluator::new(&graph);
    eval.bind_dim(&n, 2);
    eval.bind(&x, ramp(&[2, 3])?)?;
    let out = eval.materialize(&e)?;
    println!("  n = 2 -> shape {:?}, values {:?}", out.shape(), out.as_slice());

    record_graph(&graph);
    Ok(())
}
