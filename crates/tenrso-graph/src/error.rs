//! Error types for graph construction and reference evaluation

use tenrso_expr::ExprError;
use thiserror::Error;

/// Errors raised by the compute graph and its evaluator
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    /// A constant dimension was negative
    #[error("tensor '{tensor}': dimension {axis} is negative ({value})")]
    NegativeDimension {
        tensor: String,
        axis: usize,
        value: i64,
    },

    /// A dimension was not an integer expression (predicate or tensor read)
    #[error("tensor '{tensor}': dimension {axis} is not an integer expression: {dim}")]
    InvalidDimension {
        tensor: String,
        axis: usize,
        dim: String,
    },

    /// A compute body evaluated to a predicate instead of a value
    #[error("tensor '{tensor}': compute body is not a value expression: {body}")]
    InvalidBody { tensor: String, body: String },

    /// A tensor is not registered in this graph
    #[error("tensor '{tensor}' is not part of this graph")]
    UnknownTensor { tensor: String },

    /// Data can only be bound to placeholders
    #[error("tensor '{tensor}' is not a placeholder")]
    NotAPlaceholder { tensor: String },

    /// A placeholder was read without bound data
    #[error("placeholder '{tensor}' has no bound data")]
    UnboundPlaceholder { tensor: String },

    /// Bound data does not match the declared shape
    #[error("tensor '{tensor}': expected shape {expected:?}, got {actual:?}")]
    ShapeMismatch {
        tensor: String,
        expected: Vec<usize>,
        actual: Vec<usize>,
    },

    /// A read used the wrong number of indices
    #[error("tensor '{tensor}': expected {expected} indices, got {actual}")]
    RankMismatch {
        tensor: String,
        expected: usize,
        actual: usize,
    },

    /// A read fell outside the declared shape
    #[error("tensor '{tensor}': coordinate {coord:?} out of bounds for shape {shape:?}")]
    OutOfBounds {
        tensor: String,
        coord: Vec<i64>,
        shape: Vec<usize>,
    },

    /// Index or shape arithmetic failed
    #[error("expression error: {0}")]
    Expr(#[from] ExprError),

    /// Result array could not be assembled
    #[error("evaluation failed: {0}")]
    Evaluation(String),
}

/// Result type for graph operations
pub type GraphResult<T> = Result<T, GraphError>;
