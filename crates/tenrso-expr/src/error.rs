//! Error types for symbolic expression evaluation

use thiserror::Error;

/// Errors raised while evaluating an [`Expr`](crate::Expr) against bindings.
///
/// Construction of expressions never fails; only evaluation does.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExprError {
    /// A variable had no value in the bindings
    #[error("unbound variable '{name}'")]
    UnboundVariable { name: String },

    /// Integer division or remainder by zero
    #[error("division by zero in '{expr}'")]
    DivisionByZero { expr: String },

    /// Integer arithmetic left the i64 range
    #[error("integer overflow in '{expr}'")]
    Overflow { expr: String },

    /// A node of the wrong kind was found (e.g. a predicate used as an index)
    #[error("expected {expected} expression, found '{found}'")]
    KindMismatch {
        expected: &'static str,
        found: String,
    },

    /// A tensor read appeared where only index arithmetic is allowed
    #[error("tensor read '{tensor}' cannot be evaluated as an index")]
    ReadInIndexContext { tensor: String },
}

/// Result type for expression evaluation
pub type ExprResult<T> = Result<T, ExprError>;
