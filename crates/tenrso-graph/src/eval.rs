//! Reference evaluator.
//!
//! Interprets coordinate functions element by element. It exists to verify
//! graphs (tests, debugging), not to execute them efficiently: every read is
//! rank- and bounds-checked against the resolved shape of its source.

use crate::builder::ComputeGraph;
use crate::error::{GraphError, GraphResult};
use crate::tensor::{Operation, TensorHandle};
use scirs2_core::ndarray_ext::{ArrayD, IxDyn};
use std::collections::HashMap;
use tenrso_expr::{Bindings, TensorId, TensorReader, TensorRef, Var};

/// Evaluates tensors of one [`ComputeGraph`] against bound inputs.
///
/// # Examples
///
/// ```
/// use scirs2_core::ndarray_ext::{ArrayD, IxDyn};
/// use tenrso_graph::{const_shape, ComputeGraph, Evaluator, GraphBuilder};
///
/// let graph = ComputeGraph::new();
/// let a = graph.placeholder(&const_shape(&[2, 3]), "a").unwrap();
/// let t = graph
///     .compute(&const_shape(&[3, 2]), Some("t"), None, &|idx| {
///         a.at(&[idx[1].clone(), idx[0].clone()])
///     })
///     .unwrap();
///
/// let data = ArrayD::from_shape_vec(IxDyn(&[2, 3]), (0..6).map(f64::from).collect()).unwrap();
/// let mut eval = Evaluator::new(&graph);
/// eval.bind(&a, data).unwrap();
///
/// assert_eq!(eval.value_at(&t, &[2, 1]).unwrap(), 5.0);
/// ```
pub struct Evaluator<'g> {
    graph: &'g ComputeGraph,
    dims: Bindings,
    data: HashMap<TensorId, ArrayD<f64>>,
}

impl<'g> Evaluator<'g> {
    /// Evaluator with no bound inputs
    pub fn new(graph: &'g ComputeGraph) -> Self {
        Self {
            graph,
            dims: Bindings::new(),
            data: HashMap::new(),
        }
    }

    /// Assign a value to a symbolic dimension
    pub fn bind_dim(&mut self, var: &Var, value: i64) -> &mut Self {
        self.dims.bind(var, value);
        self
    }

    /// Bind data to a placeholder. The array shape must match the resolved
    /// placeholder shape, so symbolic dimensions are bound first.
    pub fn bind(&mut self, tensor: &TensorHandle, data: ArrayD<f64>) -> GraphResult<()> {
        if !self.graph.contains(tensor) {
            return Err(GraphError::UnknownTensor {
                tensor: tensor.name().to_string(),
            });
        }
        if !tensor.is_placeholder() {
            return Err(GraphError::NotAPlaceholder {
                tensor: tensor.name().to_string(),
            });
        }
        let expected = self.resolve_shape(tensor)?;
        if data.shape() != expected.as_slice() {
            return Err(GraphError::ShapeMismatch {
                tensor: tensor.name().to_string(),
                expected,
                actual: data.shape().to_vec(),
            });
        }
        self.data.insert(tensor.id(), data);
        Ok(())
    }

    /// Shape of `tensor` with symbolic dimensions substituted
    pub fn resolve_shape(&self, tensor: &TensorHandle) -> GraphResult<Vec<usize>> {
        tensor
            .shape()
            .iter()
            .enumerate()
            .map(|(axis, dim)| {
                let value = dim.eval_int(&self.dims)?;
                usize::try_from(value).map_err(|_| GraphError::NegativeDimension {
                    tensor: tensor.name().to_string(),
                    axis,
                    value,
                })
            })
            .collect()
    }

    /// Value of `tensor` at an integer coordinate
    pub fn value_at(&self, tensor: &TensorHandle, coord: &[i64]) -> GraphResult<f64> {
        self.read(tensor.tensor_ref(), coord)
    }

    /// Evaluate every element of `tensor` into a dense array
    pub fn materialize(&self, tensor: &TensorHandle) -> GraphResult<ArrayD<f64>> {
        let shape = self.resolve_shape(tensor)?;
        let total: usize = shape.iter().product();
        let mut values = Vec::with_capacity(total);

        let mut coord = vec![0i64; shape.len()];
        for _ in 0..total {
            values.push(self.value_at(tensor, &coord)?);
            // Row-major increment
            for axis in (0..shape.len()).rev() {
                coord[axis] += 1;
                if (coord[axis] as usize) < shape[axis] {
                    break;
                }
                coord[axis] = 0;
            }
        }

        ArrayD::from_shape_vec(IxDyn(&shape), values)
            .map_err(|e| GraphError::Evaluation(e.to_string()))
    }

    fn lookup(&self, tensor: &TensorRef) -> GraphResult<TensorHandle> {
        self.graph
            .get(tensor.id())
            .ok_or_else(|| GraphError::UnknownTensor {
                tensor: tensor.name().to_string(),
            })
    }

    fn check_bounds(&self, handle: &TensorHandle, coord: &[i64]) -> GraphResult<Vec<usize>> {
        if coord.len() != handle.rank() {
            return Err(GraphError::RankMismatch {
                tensor: handle.name().to_string(),
                expected: handle.rank(),
                actual: coord.len(),
            });
        }
        let shape = self.resolve_shape(handle)?;
        let in_bounds = coord
            .iter()
            .zip(&shape)
            .all(|(&c, &d)| c >= 0 && (c as usize) < d);
        if !in_bounds {
            return Err(GraphError::OutOfBounds {
                tensor: handle.name().to_string(),
                coord: coord.to_vec(),
                shape,
            });
        }
        Ok(coord.iter().map(|&c| c as usize).collect())
    }
}

impl TensorReader for Evaluator<'_> {
    type Error = GraphError;

    fn read(&self, tensor: &TensorRef, indices: &[i64]) -> GraphResult<f64> {
        let handle = self.lookup(tensor)?;
        let index = self.check_bounds(&handle, indices)?;

        match handle.operation() {
            Operation::Placeholder => {
                let data = self
                    .data
                    .get(&handle.id())
                    .ok_or_else(|| GraphError::UnboundPlaceholder {
                        tensor: handle.name().to_string(),
                    })?;
                data.get(index.as_slice())
                    .copied()
                    .ok_or_else(|| GraphError::OutOfBounds {
                        tensor: handle.name().to_string(),
                        coord: indices.to_vec(),
                        shape: data.shape().to_vec(),
                    })
            }
            Operation::Compute { axes, body } => {
                let mut env = self.dims.clone();
                for (axis, &value) in axes.iter().zip(indices) {
                    env.bind(axis, value);
                }
                body.eval_value(&env, self)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::GraphBuilder;
    use crate::tensor::const_shape;
    use tenrso_expr::Expr;

    fn ramp(shape: &[usize]) -> ArrayD<f64> {
        let n: usize = shape.iter().product();
        ArrayD::from_shape_vec(IxDyn(shape), (0..n).map(|v| v as f64).collect()).unwrap()
    }

    #[test]
    fn test_placeholder_roundtrip() {
        let graph = ComputeGraph::new();
        let a = graph.placeholder(&const_shape(&[2, 3]), "a").unwrap();
        let mut eval = Evaluator::new(&graph);
        eval.bind(&a, ramp(&[2, 3])).unwrap();
        assert_eq!(eval.materialize(&a).unwrap(), ramp(&[2, 3]));
    }

    #[test]
    fn test_bind_shape_mismatch() {
        let graph = ComputeGraph::new();
        let a = graph.placeholder(&const_shape(&[2, 3]), "a").unwrap();
        let mut eval = Evaluator::new(&graph);
        let err = eval.bind(&a, ramp(&[3, 2])).unwrap_err();
        assert_eq!(
            err,
            GraphError::ShapeMismatch {
                tensor: "a".to_string(),
                expected: vec![2, 3],
                actual: vec![3, 2]
            }
        );
    }

    #[test]
    fn test_bind_compute_rejected() {
        let graph = ComputeGraph::new();
        let a = graph.placeholder(&const_shape(&[2]), "a").unwrap();
        let b = graph
            .compute(&const_shape(&[2]), Some("b"), None, &|idx| a.at(idx))
            .unwrap();
        let mut eval = Evaluator::new(&graph);
        assert!(matches!(
            eval.bind(&b, ramp(&[2])),
            Err(GraphError::NotAPlaceholder { .. })
        ));
    }

    #[test]
    fn test_unbound_placeholder() {
        let graph = ComputeGraph::new();
        let a = graph.placeholder(&const_shape(&[2]), "a").unwrap();
        let eval = Evaluator::new(&graph);
        assert!(matches!(
            eval.value_at(&a, &[0]),
            Err(GraphError::UnboundPlaceholder { .. })
        ));
    }

    #[test]
    fn test_out_of_bounds_read_detected() {
        let graph = ComputeGraph::new();
        let a = graph.placeholder(&const_shape(&[4]), "a").unwrap();
        // Shifted read walks off the end at the last coordinate
        let b = graph
            .compute(&const_shape(&[4]), Some("b"), None, &|idx| {
                a.at(&[idx[0].clone() + 1])
            })
            .unwrap();
        let mut eval = Evaluator::new(&graph);
        eval.bind(&a, ramp(&[4])).unwrap();

        assert_eq!(eval.value_at(&b, &[2]).unwrap(), 3.0);
        let err = eval.materialize(&b).unwrap_err();
        assert_eq!(
            err,
            GraphError::OutOfBounds {
                tensor: "a".to_string(),
                coord: vec![4],
                shape: vec![4]
            }
        );
    }

    #[test]
    fn test_symbolic_dims() {
        let graph = ComputeGraph::new();
        let n = Var::new("n");
        let a = graph
            .placeholder(&[Expr::var(&n), Expr::int(2)], "a")
            .unwrap();
        let mut eval = Evaluator::new(&graph);

        assert!(matches!(
            eval.resolve_shape(&a),
            Err(GraphError::Expr(_))
        ));

        eval.bind_dim(&n, 3);
        assert_eq!(eval.resolve_shape(&a).unwrap(), vec![3, 2]);
        eval.bind(&a, ramp(&[3, 2])).unwrap();
        assert_eq!(eval.value_at(&a, &[2, 1]).unwrap(), 5.0);
    }

    #[test]
    fn test_scalar_materialize() {
        let graph = ComputeGraph::new();
        let a = graph.placeholder(&const_shape(&[3]), "a").unwrap();
        let s = graph
            .compute(&[], Some("s"), None, &|_| a.at(&[Expr::int(2)]) * 2)
            .unwrap();
        let mut eval = Evaluator::new(&graph);
        eval.bind(&a, ramp(&[3])).unwrap();

        let out = eval.materialize(&s).unwrap();
        assert_eq!(out.ndim(), 0);
        assert_eq!(out[IxDyn(&[])], 4.0);
    }
}
