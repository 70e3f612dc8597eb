//! # tenrso-transform
//!
//! Injective shape transforms over lazy TenRSo tensors.
//!
//! Every operator takes tensor handles of known (possibly symbolic) shape and
//! builds one deferred node per output whose value at each coordinate is a
//! read of its inputs at a mapped coordinate. No data is touched.
//!
//! | operator | output shape | coordinate map | default tag |
//! |----------|--------------|----------------|-------------|
//! | [`expand_dims`] | unit axes inserted | drop inserted coordinates | `Broadcast` |
//! | [`transpose`] | permuted | `idx[axes[i]] = out[i]` | `Injective` |
//! | [`reshape`] | `newshape` | `unravel(ravel(out))` | `Injective` |
//! | [`concatenate`] | axis sizes summed | guarded select cascade | `Injective` |
//! | [`split`] | one per segment | axis offset by segment begin | `Injective` |
//!
//! Index arithmetic stays symbolic: with constant shapes it folds to
//! constants, otherwise it is left for the lowering stage.
//!
//! ## Quick Start
//!
//! ```
//! use tenrso_graph::{const_shape, ComputeGraph, GraphBuilder};
//! use tenrso_transform::{CoordinateMapper, SplitSpec};
//!
//! let graph = ComputeGraph::new();
//! let x = graph.placeholder(&const_shape(&[3, 12]), "x").unwrap();
//! let mapper = CoordinateMapper::new(&graph);
//!
//! let parts = mapper.split(&x, SplitSpec::Sections(3), 1).unwrap();
//! let joined = mapper.concatenate(&parts, 1).unwrap();
//! assert_eq!(joined.const_shape(), Some(vec![3, 12]));
//! ```
//!
//! ## Failure
//!
//! All arguments are validated before the builder is called; an error
//! ([`TransformError`]) means no node was added to the graph.

pub mod error;
pub mod hints;
pub mod index;
pub mod mapper;
pub mod ops;
mod shape;

#[cfg(test)]
mod test_util;

pub use error::{TransformError, TransformResult};
pub use hints::TransformHints;
pub use index::{ravel_index, unravel_index};
pub use mapper::CoordinateMapper;
pub use ops::{concatenate, expand_dims, reshape, split, transpose, SplitSpec};
pub use shape::element_count_eq;
