//! Tensor handles of the deferred compute graph.
//!
//! A [`TensorHandle`] is the tensor descriptor: a shape plus either a
//! placeholder marker or a coordinate function (`axes -> body`). Handles are
//! immutable and cheap to clone.

use crate::error::{GraphError, GraphResult};
use crate::tag::Tag;
use smallvec::SmallVec;
use std::fmt;
use std::sync::Arc;
use tenrso_expr::{Expr, TensorId, TensorRef, Var};

/// Shape of a lazy tensor. Inline for up to six axes.
pub type Shape = SmallVec<[Expr; 6]>;

/// Build a constant shape from `usize` dimensions.
///
/// # Examples
///
/// ```
/// use tenrso_graph::const_shape;
///
/// let shape = const_shape(&[2, 3]);
/// assert_eq!(shape.len(), 2);
/// assert_eq!(shape[1].as_const(), Some(3));
/// ```
pub fn const_shape(dims: &[usize]) -> Shape {
    dims.iter().map(|&d| Expr::dim(d)).collect()
}

/// Render a shape as `(d0, d1, ...)`
pub fn format_shape(shape: &[Expr]) -> String {
    let dims: Vec<String> = shape.iter().map(|d| d.to_string()).collect();
    format!("({})", dims.join(", "))
}

/// How a tensor's values are defined
#[derive(Debug, Clone)]
pub enum Operation {
    /// External input; values are supplied later
    Placeholder,
    /// Value at coordinate `axes` is `body`
    Compute { axes: Vec<Var>, body: Expr },
}

#[derive(Debug)]
struct Node {
    tensor: TensorRef,
    shape: Shape,
    operation: Operation,
    tag: Option<Tag>,
    inputs: Vec<TensorRef>,
}

/// Handle to a node of the compute graph
#[derive(Debug, Clone)]
pub struct TensorHandle(Arc<Node>);

impl TensorHandle {
    pub(crate) fn new(
        tensor: TensorRef,
        shape: Shape,
        operation: Operation,
        tag: Option<Tag>,
    ) -> Self {
        let inputs = match &operation {
            Operation::Placeholder => Vec::new(),
            Operation::Compute { body, .. } => body.tensor_refs(),
        };
        TensorHandle(Arc::new(Node {
            tensor,
            shape,
            operation,
            tag,
            inputs,
        }))
    }

    /// Node id
    pub fn id(&self) -> TensorId {
        self.0.tensor.id()
    }

    /// Unique name within the graph
    pub fn name(&self) -> &str {
        self.0.tensor.name()
    }

    /// Reference used inside expressions
    pub fn tensor_ref(&self) -> &TensorRef {
        &self.0.tensor
    }

    /// Declared shape
    pub fn shape(&self) -> &[Expr] {
        &self.0.shape
    }

    /// Number of axes
    pub fn rank(&self) -> usize {
        self.0.shape.len()
    }

    /// Size along `axis`
    pub fn dim(&self, axis: usize) -> Option<&Expr> {
        self.0.shape.get(axis)
    }

    /// Shape as `usize` if every dimension is a non-negative constant
    pub fn const_shape(&self) -> Option<Vec<usize>> {
        self.0
            .shape
            .iter()
            .map(|d| d.as_const().and_then(|v| usize::try_from(v).ok()))
            .collect()
    }

    /// Scheduling hint
    pub fn tag(&self) -> Option<Tag> {
        self.0.tag
    }

    /// Definition of this tensor
    pub fn operation(&self) -> &Operation {
        &self.0.operation
    }

    /// Whether this is an external input
    pub fn is_placeholder(&self) -> bool {
        matches!(self.0.operation, Operation::Placeholder)
    }

    /// Compute body, if any
    pub fn body(&self) -> Option<&Expr> {
        match &self.0.operation {
            Operation::Compute { body, .. } => Some(body),
            Operation::Placeholder => None,
        }
    }

    /// Axis variables of the compute body, if any
    pub fn axes(&self) -> Option<&[Var]> {
        match &self.0.operation {
            Operation::Compute { axes, .. } => Some(axes),
            Operation::Placeholder => None,
        }
    }

    /// Tensors read by the compute body
    pub fn inputs(&self) -> &[TensorRef] {
        &self.0.inputs
    }

    /// Symbolic read of this tensor at `indices`.
    ///
    /// The index count is the caller's responsibility (checked in debug
    /// builds); use [`try_at`](Self::try_at) when it is not known statically.
    pub fn at(&self, indices: &[Expr]) -> Expr {
        debug_assert_eq!(
            indices.len(),
            self.rank(),
            "read of '{}' with wrong index count",
            self.name()
        );
        Expr::read(self.0.tensor.clone(), indices.iter().cloned())
    }

    /// Symbolic read with a rank check
    pub fn try_at(&self, indices: &[Expr]) -> GraphResult<Expr> {
        if indices.len() != self.rank() {
            return Err(GraphError::RankMismatch {
                tensor: self.name().to_string(),
                expected: self.rank(),
                actual: indices.len(),
            });
        }
        Ok(self.at(indices))
    }
}

impl PartialEq for TensorHandle {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

impl Eq for TensorHandle {}

impl fmt::Display for TensorHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.name(), format_shape(self.shape()))?;
        if let Some(tag) = self.tag() {
            write!(f, " [{}]", tag)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn placeholder(name: &str, dims: &[usize]) -> TensorHandle {
        TensorHandle::new(
            TensorRef::new(TensorId::fresh(), name),
            const_shape(dims),
            Operation::Placeholder,
            None,
        )
    }

    #[test]
    fn test_handle_accessors() {
        let a = placeholder("a", &[2, 3]);
        assert_eq!(a.rank(), 2);
        assert_eq!(a.const_shape(), Some(vec![2, 3]));
        assert!(a.is_placeholder());
        assert!(a.body().is_none());
        assert!(a.inputs().is_empty());
        assert_eq!(a.to_string(), "a(2, 3)");
    }

    #[test]
    fn test_symbolic_shape_is_not_const() {
        let n = Var::new("n");
        let t = TensorHandle::new(
            TensorRef::new(TensorId::fresh(), "t"),
            [Expr::var(&n), Expr::int(4)].into_iter().collect(),
            Operation::Placeholder,
            None,
        );
        assert_eq!(t.const_shape(), None);
        assert_eq!(format_shape(t.shape()), "(n, 4)");
    }

    #[test]
    fn test_try_at_checks_rank() {
        let a = placeholder("a", &[2, 3]);
        let err = a.try_at(&[Expr::int(0)]).unwrap_err();
        assert_eq!(
            err,
            GraphError::RankMismatch {
                tensor: "a".to_string(),
                expected: 2,
                actual: 1
            }
        );
        let read = a.try_at(&[Expr::int(1), Expr::int(2)]).unwrap();
        assert_eq!(read.to_string(), "a[1, 2]");
    }

    #[test]
    fn test_compute_inputs_from_body() {
        let a = placeholder("a", &[4]);
        let i = Var::new("i");
        let body = a.at(&[Expr::var(&i)]);
        let c = TensorHandle::new(
            TensorRef::new(TensorId::fresh(), "c"),
            const_shape(&[4]),
            Operation::Compute {
                axes: vec![i],
                body,
            },
            Some(Tag::Injective),
        );
        assert_eq!(c.inputs(), &[a.tensor_ref().clone()]);
        assert_eq!(c.to_string(), "c(4) [injective]");
    }
}
