//! # tenrso-expr
//!
//! Symbolic index-expression algebra for lazily evaluated TenRSo tensors.
//!
//! Shapes, coordinates, and the bodies of deferred tensors are all [`Expr`]
//! trees. The algebra covers what coordinate mapping needs:
//!
//! - **Integer arithmetic**: `+`, `-`, `*`, floor division and floor remainder
//! - **Predicates**: comparisons and conjunction
//! - **Selection**: `select(cond, then, otherwise)`, lowered later by a backend
//! - **Reads**: `tensor[indices]` referencing another node of the graph
//!
//! Constructors fold constants, so fully known shapes collapse to integers
//! while symbolic ones stay symbolic.
//!
//! ## Quick Start
//!
//! ```
//! use tenrso_expr::{Bindings, Expr, Var};
//!
//! let n = Var::new("n");
//! let i = Var::new("i");
//!
//! // Flat index of (i, 2) in a shape (n, 4)
//! let flat = Expr::var(&i) * 4 + 2;
//! assert_eq!(flat.to_string(), "((i * 4) + 2)");
//!
//! let env = Bindings::new().with(&n, 8).with(&i, 3);
//! assert_eq!(flat.eval_int(&env).unwrap(), 14);
//! ```

pub mod error;
pub mod eval;
pub mod expr;
pub mod var;


pub use error::{ExprError, ExprResult};
pub use eval::{Bindings, TensorReader};
pub use expr::{floor_div, floor_mod, BinaryOp, CmpOp, Expr, ExprKind, Indices};
pub use var::{TensorId, TensorRef, Var};
