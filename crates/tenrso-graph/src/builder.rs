//! Graph construction.
//!
//! [`GraphBuilder`] is the seam operators build through: one call per
//! produced tensor. [`ComputeGraph`] is the in-memory implementation; it
//! assigns unique names and keeps every node reachable by id.

use crate::error::{GraphError, GraphResult};
use crate::tag::Tag;
use crate::tensor::{Operation, Shape, TensorHandle};
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use tenrso_expr::{Expr, ExprKind, TensorId, TensorRef, Var};

/// Builder of deferred tensors.
///
/// `compute` creates one axis variable per output dimension, calls
/// `fcompute` once with those variables and records the returned body as the
/// value at that coordinate.
pub trait GraphBuilder {
    /// Declare an external input of the given shape
    fn placeholder(&self, shape: &[Expr], name: &str) -> GraphResult<TensorHandle>;

    /// Declare a tensor whose value at `idx` is `fcompute(idx)`
    fn compute(
        &self,
        shape: &[Expr],
        name: Option<&str>,
        tag: Option<Tag>,
        fcompute: &dyn Fn(&[Expr]) -> Expr,
    ) -> GraphResult<TensorHandle>;
}

#[derive(Debug, Default)]
struct GraphState {
    nodes: Vec<TensorHandle>,
    by_id: HashMap<TensorId, usize>,
    by_name: HashMap<String, usize>,
    name_counters: HashMap<String, usize>,
}

impl GraphState {
    fn unique_name(&mut self, base: &str) -> String {
        if !self.by_name.contains_key(base) {
            return base.to_string();
        }
        let counter = self.name_counters.entry(base.to_string()).or_insert(0);
        loop {
            *counter += 1;
            let candidate = format!("{}_{}", base, counter);
            if !self.by_name.contains_key(&candidate) {
                return candidate;
            }
        }
    }

    fn insert(&mut self, handle: TensorHandle) {
        let slot = self.nodes.len();
        self.by_id.insert(handle.id(), slot);
        self.by_name.insert(handle.name().to_string(), slot);
        self.nodes.push(handle);
    }
}

/// In-memory compute graph.
///
/// Safe to share across threads; naming and registration are serialised by
/// an internal lock.
///
/// # Examples
///
/// ```
/// use tenrso_expr::Expr;
/// use tenrso_graph::{const_shape, ComputeGraph, GraphBuilder, Tag};
///
/// let graph = ComputeGraph::new();
/// let a = graph.placeholder(&const_shape(&[2, 3]), "a").unwrap();
/// let b = graph
///     .compute(&const_shape(&[3, 2]), Some("b"), Some(Tag::Injective), &|idx| {
///         a.at(&[idx[1].clone(), idx[0].clone()])
///     })
///     .unwrap();
///
/// assert_eq!(graph.len(), 2);
/// assert_eq!(b.inputs(), &[a.tensor_ref().clone()]);
/// ```
#[derive(Debug, Default)]
pub struct ComputeGraph {
    state: Mutex<GraphState>,
}

impl ComputeGraph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered tensors
    pub fn len(&self) -> usize {
        self.state.lock().nodes.len()
    }

    /// Whether the graph has no tensors
    pub fn is_empty(&self) -> bool {
        self.state.lock().nodes.is_empty()
    }

    /// Look up a tensor by id
    pub fn get(&self, id: TensorId) -> Option<TensorHandle> {
        let state = self.state.lock();
        state.by_id.get(&id).map(|&slot| state.nodes[slot].clone())
    }

    /// Look up a tensor by its unique name
    pub fn by_name(&self, name: &str) -> Option<TensorHandle> {
        let state = self.state.lock();
        state.by_name.get(name).map(|&slot| state.nodes[slot].clone())
    }

    /// All tensors in registration order
    pub fn nodes(&self) -> Vec<TensorHandle> {
        self.state.lock().nodes.clone()
    }

    /// Whether `handle` was registered in this graph
    pub fn contains(&self, handle: &TensorHandle) -> bool {
        self.state.lock().by_id.contains_key(&handle.id())
    }

    /// Tensors needed to compute `outputs`, inputs before their consumers.
    pub fn topo_order(&self, outputs: &[TensorHandle]) -> GraphResult<Vec<TensorHandle>> {
        let state = self.state.lock();
        let mut order = Vec::new();
        let mut visited = HashSet::new();

        // Explicit stack: (slot, children pushed)
        let mut stack = Vec::new();
        for out in outputs {
            let slot = *state
                .by_id
                .get(&out.id())
                .ok_or_else(|| GraphError::UnknownTensor {
                    tensor: out.name().to_string(),
                })?;
            stack.push((slot, false));
        }
        // Roots are popped last-first; reverse so the first output comes first
        stack.reverse();

        while let Some((slot, expanded)) = stack.pop() {
            let node = &state.nodes[slot];
            if expanded {
                if visited.insert(node.id()) {
                    order.push(node.clone());
                }
                continue;
            }
            if visited.contains(&node.id()) {
                continue;
            }
            stack.push((slot, true));
            for input in node.inputs().iter().rev() {
                let child = *state
                    .by_id
                    .get(&input.id())
                    .ok_or_else(|| GraphError::UnknownTensor {
                        tensor: input.name().to_string(),
                    })?;
                if !visited.contains(&state.nodes[child].id()) {
                    stack.push((child, false));
                }
            }
        }
        Ok(order)
    }

    fn validate_shape(name: &str, shape: &[Expr]) -> GraphResult<Shape> {
        for (axis, dim) in shape.iter().enumerate() {
            if let Some(value) = dim.as_const() {
                if value < 0 {
                    return Err(GraphError::NegativeDimension {
                        tensor: name.to_string(),
                        axis,
                        value,
                    });
                }
                continue;
            }
            if !is_index_expr(dim) {
                return Err(GraphError::InvalidDimension {
                    tensor: name.to_string(),
                    axis,
                    dim: dim.to_string(),
                });
            }
        }
        Ok(shape.iter().cloned().collect())
    }

    fn register(
        &self,
        base: &str,
        shape: Shape,
        operation: Operation,
        tag: Option<Tag>,
    ) -> GraphResult<TensorHandle> {
        let mut state = self.state.lock();

        if let Operation::Compute { body, .. } = &operation {
            for input in body.tensor_refs() {
                if !state.by_id.contains_key(&input.id()) {
                    return Err(GraphError::UnknownTensor {
                        tensor: input.name().to_string(),
                    });
                }
            }
        }

        let name = state.unique_name(base);
        let handle = TensorHandle::new(
            TensorRef::new(TensorId::fresh(), name),
            shape,
            operation,
            tag,
        );
        tracing::trace!(
            tensor = %handle,
            inputs = handle.inputs().len(),
            "registered tensor"
        );
        state.insert(handle.clone());
        Ok(handle)
    }
}

impl GraphBuilder for ComputeGraph {
    fn placeholder(&self, shape: &[Expr], name: &str) -> GraphResult<TensorHandle> {
        let shape = Self::validate_shape(name, shape)?;
        self.register(name, shape, Operation::Placeholder, None)
    }

    fn compute(
        &self,
        shape: &[Expr],
        name: Option<&str>,
        tag: Option<Tag>,
        fcompute: &dyn Fn(&[Expr]) -> Expr,
    ) -> GraphResult<TensorHandle> {
        let base = name.unwrap_or("compute");
        let shape = Self::validate_shape(base, shape)?;

        let axes: Vec<Var> = (0..shape.len()).map(|k| Var::new(format!("i{}", k))).collect();
        let idx: Vec<Expr> = axes.iter().map(Expr::var).collect();
        let body = fcompute(&idx);
        if !is_value_expr(&body) {
            return Err(GraphError::InvalidBody {
                tensor: base.to_string(),
                body: body.to_string(),
            });
        }

        self.register(base, shape, Operation::Compute { axes, body }, tag)
    }
}

/// Integer arithmetic without reads or predicates
fn is_index_expr(expr: &Expr) -> bool {
    let mut ok = true;
    expr.walk(&mut |e| match e.kind() {
        ExprKind::Int(_) | ExprKind::Var(_) | ExprKind::Binary { .. } => {}
        _ => ok = false,
    });
    ok
}

/// Integer-valued expression (reads allowed); predicates are not values
fn is_value_expr(expr: &Expr) -> bool {
    match expr.kind() {
        ExprKind::Bool(_) | ExprKind::Cmp { .. } | ExprKind::And(..) => false,
        ExprKind::Select {
            then, otherwise, ..
        } => is_value_expr(then) && is_value_expr(otherwise),
        _ => true,
    }
}
