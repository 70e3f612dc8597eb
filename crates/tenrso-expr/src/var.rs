//! Symbolic variables and tensor references.
//!
//! Both carry a process-unique id; equality and hashing use the id only, so
//! two variables that happen to share a name stay distinct.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

static NEXT_VAR_ID: AtomicU64 = AtomicU64::new(0);
static NEXT_TENSOR_ID: AtomicU64 = AtomicU64::new(0);

/// A named symbolic integer.
///
/// Used both for loop/axis variables created by the graph builder and for
/// symbolic shape dimensions (e.g. a batch size `n`).
///
/// # Examples
///
/// ```
/// use tenrso_expr::Var;
///
/// let n = Var::new("n");
/// let m = Var::new("n");
/// assert_eq!(n.name(), "n");
/// assert_ne!(n, m);
/// ```
#[derive(Debug, Clone)]
pub struct Var {
    id: u64,
    name: Arc<str>,
}

impl Var {
    /// Create a fresh variable.
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self {
            id: NEXT_VAR_ID.fetch_add(1, Ordering::Relaxed),
            name: name.into(),
        }
    }

    /// Unique id of this variable
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Display name
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl PartialEq for Var {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Var {}

impl Hash for Var {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Identifier of a tensor node in a compute graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TensorId(pub u64);

impl TensorId {
    /// Allocate a process-unique id
    pub fn fresh() -> Self {
        TensorId(NEXT_TENSOR_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for TensorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tensor({})", self.0)
    }
}

/// Reference to a tensor from inside an expression (the target of a read).
#[derive(Debug, Clone)]
pub struct TensorRef {
    id: TensorId,
    name: Arc<str>,
}

impl TensorRef {
    /// Create a reference to tensor `id` displayed as `name`
    pub fn new(id: TensorId, name: impl Into<Arc<str>>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    /// Id of the referenced tensor
    pub fn id(&self) -> TensorId {
        self.id
    }

    /// Name of the referenced tensor
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl PartialEq for TensorRef {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TensorRef {}

impl Hash for TensorRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
