//! Error types for shape transforms
//!
//! Every failure is detected while validating arguments, before the graph
//! builder is called, so a failed transform never leaves nodes behind.

use tenrso_graph::GraphError;
use thiserror::Error;

/// Errors raised by the coordinate mapper
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransformError {
    /// Shapes are provably incompatible (or unprovable under strict checking)
    #[error("{operation}: shape mismatch - expected {expected}, got {actual}. {context}")]
    ShapeMismatch {
        operation: String,
        expected: String,
        actual: String,
        context: String,
    },

    /// Axis outside the valid range after normalisation
    #[error("{operation}: axis {axis} out of range for rank {rank}")]
    InvalidAxis {
        operation: String,
        axis: i64,
        rank: usize,
    },

    /// Uniform split with a section count that does not divide the axis
    #[error("split: axis of size {size} cannot be divided into {sections} equal sections")]
    IndivisibleSplit { size: i64, sections: usize },

    /// Split boundaries not strictly increasing
    #[error("split: boundaries {boundaries:?} are not strictly increasing")]
    UnsortedBoundaries { boundaries: Vec<i64> },

    /// Split specification that is neither a count nor a boundary list
    #[error("split: unsupported specification '{spec}'")]
    UnsupportedSpec { spec: String },

    /// Transpose axes that are not a permutation of `0..rank`
    #[error("transpose: axes {axes:?} are not a permutation of 0..{rank}")]
    InvalidPermutation { axes: Vec<usize>, rank: usize },

    /// Argument outside its domain
    #[error("{operation}: invalid argument: {message}")]
    InvalidArgument { operation: String, message: String },

    /// Empty input list
    #[error("{operation}: empty input not allowed for parameter '{parameter}'")]
    EmptyInput {
        operation: String,
        parameter: String,
    },

    /// Split boundary outside `[0, size]`
    #[error("split: boundary {boundary} outside [0, {size}]")]
    BoundaryOutOfRange { boundary: i64, size: i64 },

    /// A dimension must be a compile-time constant but is symbolic
    #[error("{operation}: dimension {axis} must be constant, got {dim}")]
    NonConstantDim {
        operation: String,
        axis: usize,
        dim: String,
    },

    /// The graph builder rejected a node
    #[error(transparent)]
    Graph(#[from] GraphError),
}

/// Result type for transforms
pub type TransformResult<T> = Result<T, TransformError>;

impl TransformError {
    /// Create a shape mismatch error
    pub fn shape_mismatch(
        operation: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
        context: impl Into<String>,
    ) -> Self {
        TransformError::ShapeMismatch {
            operation: operation.into(),
            expected: expected.into(),
            actual: actual.into(),
            context: context.into(),
        }
    }

    /// Create an invalid axis error
    pub fn invalid_axis(operation: impl Into<String>, axis: i64, rank: usize) -> Self {
        TransformError::InvalidAxis {
            operation: operation.into(),
            axis,
            rank,
        }
    }

    /// Create an invalid argument error
    pub fn invalid_argument(operation: impl Into<String>, message: impl Into<String>) -> Self {
        TransformError::InvalidArgument {
            operation: operation.into(),
            message: message.into(),
        }
    }

    /// Create an empty input error
    pub fn empty_input(operation: impl Into<String>, parameter: impl Into<String>) -> Self {
        TransformError::EmptyInput {
            operation: operation.into(),
            parameter: parameter.into(),
        }
    }

    /// Create a non-constant dimension error
    pub fn non_constant_dim(
        operation: impl Into<String>,
        axis: usize,
        dim: impl Into<String>,
    ) -> Self {
        TransformError::NonConstantDim {
            operation: operation.into(),
            axis,
            dim: dim.into(),
        }
    }
}
