//! Shared fixtures for unit tests

use scirs2_core::ndarray_ext::{ArrayD, IxDyn};
use tenrso_graph::{const_shape, ComputeGraph, GraphBuilder, TensorHandle};

/// Row-major ramp `0, 1, 2, ...` of the given shape
pub(crate) fn ramp(shape: &[usize]) -> ArrayD<f64> {
    let n: usize = shape.iter().product();
    ArrayD::from_shape_vec(IxDyn(shape), (0..n).map(|v| v as f64).collect())
        .expect("ramp shape matches its length")
}

/// Constant-shaped placeholder plus ramp data to bind to it
pub(crate) fn ramp_input(
    graph: &ComputeGraph,
    name: &str,
    shape: &[usize],
) -> (TensorHandle, ArrayD<f64>) {
    let handle = graph
        .placeholder(&const_shape(shape), name)
        .expect("placeholder");
    (handle, ramp(shape))
}

/// Constant shape of a handle
pub(crate) fn shape_of(t: &TensorHandle) -> Vec<usize> {
    t.const_shape().expect("constant shape")
}
