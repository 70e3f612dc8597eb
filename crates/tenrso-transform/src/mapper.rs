//! Builder-bound facade over the operators

use crate::error::TransformResult;
use crate::hints::TransformHints;
use crate::ops::{self, SplitSpec};
use tenrso_expr::Expr;
use tenrso_graph::{GraphBuilder, TensorHandle};

/// The coordinate mapper: the five shape transforms bound to one graph
/// builder and one set of hints.
///
/// # Examples
///
/// ```
/// use tenrso_graph::{const_shape, ComputeGraph, GraphBuilder};
/// use tenrso_transform::CoordinateMapper;
///
/// let graph = ComputeGraph::new();
/// let a = graph.placeholder(&const_shape(&[2, 3]), "a").unwrap();
///
/// let mapper = CoordinateMapper::new(&graph);
/// let t = mapper.transpose(&a, None).unwrap();
/// let e = mapper.expand_dims(&t, 0, 1).unwrap();
/// assert_eq!(e.const_shape(), Some(vec![1, 3, 2]));
/// ```
pub struct CoordinateMapper<'g, G: GraphBuilder + ?Sized> {
    graph: &'g G,
    hints: TransformHints,
}

impl<'g, G: GraphBuilder + ?Sized> CoordinateMapper<'g, G> {
    /// Mapper with default hints
    pub fn new(graph: &'g G) -> Self {
        Self::with_hints(graph, TransformHints::default())
    }

    /// Mapper with explicit hints
    pub fn with_hints(graph: &'g G, hints: TransformHints) -> Self {
        Self { graph, hints }
    }

    /// Hints applied to every call
    pub fn hints(&self) -> &TransformHints {
        &self.hints
    }

    /// Underlying builder
    pub fn graph(&self) -> &'g G {
        self.graph
    }

    /// See [`ops::expand_dims`]
    pub fn expand_dims(
        &self,
        a: &TensorHandle,
        axis: isize,
        num_newaxis: usize,
    ) -> TransformResult<TensorHandle> {
        ops::expand_dims(self.graph, &self.hints, a, axis, num_newaxis)
    }

    /// See [`ops::transpose`]
    pub fn transpose(
        &self,
        a: &TensorHandle,
        axes: Option<&[usize]>,
    ) -> TransformResult<TensorHandle> {
        ops::transpose(self.graph, &self.hints, a, axes)
    }

    /// See [`ops::reshape`]
    pub fn reshape(&self, a: &TensorHandle, newshape: &[Expr]) -> TransformResult<TensorHandle> {
        ops::reshape(self.graph, &self.hints, a, newshape)
    }

    /// See [`ops::concatenate`]
    pub fn concatenate(
        &self,
        inputs: &[TensorHandle],
        axis: isize,
    ) -> TransformResult<TensorHandle> {
        ops::concatenate(self.graph, &self.hints, inputs, axis)
    }

    /// See [`ops::split`]
    pub fn split(
        &self,
        ary: &TensorHandle,
        spec: impl Into<SplitSpec>,
        axis: isize,
    ) -> TransformResult<Vec<TensorHandle>> {
        ops::split(self.graph, &self.hints, ary, &spec.into(), axis)
    }
}
