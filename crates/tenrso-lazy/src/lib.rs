//! # TenRSo Lazy - Deferred Shape Transforms
//!
//! **Meta crate** re-exporting the lazy shape-transform stack:
//!
//! - [`expr`]: symbolic integer/boolean index expressions
//! - [`graph`]: the deferred tensor graph and its reference evaluator
//! - [`transform`]: `expand_dims`, `transpose`, `reshape`, `concatenate`, `split`
//!
//! Transforms never touch data. Each one records a node whose value at a
//! coordinate is a read of its inputs at a mapped coordinate; values appear
//! only when an evaluator (or a downstream lowering) walks the graph.
//!
//! ## Quick Start
//!
//! ```
//! use tenrso_lazy::prelude::*;
//! use scirs2_core::ndarray_ext::{ArrayD, IxDyn};
//!
//! let graph = ComputeGraph::new();
//! let x = graph.placeholder(&const_shape(&[2, 3]), "x")?;
//!
//! let mapper = CoordinateMapper::new(&graph);
//! let y = mapper.transpose(&x, None)?;
//! let z = mapper.reshape(&y, &const_shape(&[6]))?;
//!
//! let mut eval = Evaluator::new(&graph);
//! eval.bind(&x, ArrayD::from_shape_vec(IxDyn(&[2, 3]), vec![0., 1., 2., 3., 4., 5.])?)?;
//! let out = eval.materialize(&z)?;
//! assert_eq!(out.as_slice().unwrap(), &[0., 3., 1., 4., 2., 5.]);
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! ## Features
//!
//! - `tracing`: install a `tracing-subscriber` via [`tracing_support::init_tracing`]
//! - `serde`: (de)serialize [`TransformHints`](transform::TransformHints), split specs and tags
//! - `full`: all of the above

pub use tenrso_expr as expr;
pub use tenrso_graph as graph;
pub use tenrso_transform as transform;

pub mod tracing_support;

pub mod prelude {
    //! Prelude module for convenient imports
    //!
    //! ```
    //! use tenrso_lazy::prelude::*;
    //!
    //! let graph = ComputeGraph::new();
    //! let n = Var::new("n");
    //! let x = graph.placeholder(&[Expr::var(&n), Expr::int(4)], "x").unwrap();
    //! let parts = split(&graph, &TransformHints::default(), &x, &SplitSpec::Sections(2), 1).unwrap();
    //! assert_eq!(parts.len(), 2);
    //! ```

    // Index algebra
    pub use crate::expr::{Bindings, Expr, Var};

    // Graph
    pub use crate::graph::{
        const_shape, ComputeGraph, Evaluator, GraphBuilder, Shape, Tag, TensorHandle,
    };

    // Transforms
    pub use crate::transform::{
        concatenate, expand_dims, ravel_index, reshape, split, transpose, unravel_index,
        CoordinateMapper, SplitSpec, TransformError, TransformHints,
    };
}
