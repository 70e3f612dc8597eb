//! # tenrso-graph
//!
//! Deferred compute graph for lazily evaluated TenRSo tensors.
//!
//! A tensor in this crate is a description, not a buffer: a shape of
//! [`Expr`](tenrso_expr::Expr) dimensions plus either a placeholder marker
//! or a coordinate function giving the value at every output index.
//!
//! - **Handles** ([`TensorHandle`]) are immutable and `Arc`-shared
//! - **Builders** ([`GraphBuilder`]) create nodes; [`ComputeGraph`] is the
//!   in-memory implementation with unique naming
//! - **Tags** ([`Tag`]) carry scheduling hints opaquely to a backend
//! - **Evaluation** ([`Evaluator`]) interprets a graph over `scirs2-core`
//!   arrays for verification
//!
//! ## Quick Start
//!
//! ```
//! use scirs2_core::ndarray_ext::{ArrayD, IxDyn};
//! use tenrso_expr::Expr;
//! use tenrso_graph::{const_shape, ComputeGraph, Evaluator, GraphBuilder, Tag};
//!
//! let graph = ComputeGraph::new();
//! let x = graph.placeholder(&const_shape(&[4]), "x").unwrap();
//!
//! // Reverse along the only axis
//! let rev = graph
//!     .compute(&const_shape(&[4]), Some("rev"), Some(Tag::Injective), &|idx| {
//!         x.at(&[Expr::int(3) - &idx[0]])
//!     })
//!     .unwrap();
//!
//! let mut eval = Evaluator::new(&graph);
//! eval.bind(&x, ArrayD::from_shape_vec(IxDyn(&[4]), vec![1.0, 2.0, 3.0, 4.0]).unwrap())
//!     .unwrap();
//! let out = eval.materialize(&rev).unwrap();
//! assert_eq!(out.as_slice().unwrap(), &[4.0, 3.0, 2.0, 1.0]);
//! ```

pub mod builder;
pub mod error;
pub mod eval;
pub mod tag;
pub mod tensor;


pub use builder::{ComputeGraph, GraphBuilder};
pub use error::{GraphError, GraphResult};
pub use eval::Evaluator;
pub use tag::{ParseTagError, Tag};
pub use tensor::{const_shape, format_shape, Operation, Shape, TensorHandle};
