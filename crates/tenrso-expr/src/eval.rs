//! Evaluation of expressions against variable bindings.
//!
//! Evaluation is only ever needed by verification tooling and by consumers
//! that resolve symbolic shapes; the transforms themselves never evaluate.

use crate::error::{ExprError, ExprResult};
use crate::expr::{BinaryOp, Expr, ExprKind};
use crate::var::{TensorRef, Var};
use std::collections::HashMap;

/// Values assigned to symbolic variables
#[derive(Debug, Clone, Default)]
pub struct Bindings {
    values: HashMap<u64, i64>,
}

impl Bindings {
    /// Empty bindings
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign `value` to `var`, replacing any previous value
    pub fn bind(&mut self, var: &Var, value: i64) {
        self.values.insert(var.id(), value);
    }

    /// Builder-style [`bind`](Self::bind)
    pub fn with(mut self, var: &Var, value: i64) -> Self {
        self.bind(var, value);
        self
    }

    /// Value bound to `var`
    pub fn get(&self, var: &Var) -> Option<i64> {
        self.values.get(&var.id()).copied()
    }

    /// Number of bound variables
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether nothing is bound
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Source of element values for [`Expr::eval_value`].
pub trait TensorReader {
    /// Error type; must absorb index-evaluation errors
    type Error: From<ExprError>;

    /// Value of `tensor` at the given integer coordinate
    fn read(&self, tensor: &TensorRef, indices: &[i64]) -> Result<f64, Self::Error>;
}

impl Expr {
    /// Evaluate as an integer (index arithmetic).
    ///
    /// Tensor reads are rejected; `select` evaluates only the taken branch.
    ///
    /// # Examples
    ///
    /// ```
    /// use tenrso_expr::{Bindings, Expr, Var};
    ///
    /// let i = Var::new("i");
    /// let e = (Expr::var(&i) * 3).floor_mod(4);
    /// let env = Bindings::new().with(&i, 5);
    /// assert_eq!(e.eval_int(&env).unwrap(), 3);
    /// ```
    pub fn eval_int(&self, env: &Bindings) -> ExprResult<i64> {
        match self.kind() {
            ExprKind::Int(v) => Ok(*v),
            ExprKind::Var(var) => env.get(var).ok_or_else(|| ExprError::UnboundVariable {
                name: var.name().to_string(),
            }),
            ExprKind::Binary { op, lhs, rhs } => {
                let a = lhs.eval_int(env)?;
                let b = rhs.eval_int(env)?;
                op.apply(a, b).ok_or_else(|| match op {
                    BinaryOp::FloorDiv | BinaryOp::FloorMod if b == 0 => {
                        ExprError::DivisionByZero {
                            expr: self.to_string(),
                        }
                    }
                    _ => ExprError::Overflow {
                        expr: self.to_string(),
                    },
                })
            }
            ExprKind::Select {
                cond,
                then,
                otherwise,
            } => {
                if cond.eval_bool(env)? {
                    then.eval_int(env)
                } else {
                    otherwise.eval_int(env)
                }
            }
            ExprKind::Read { tensor, .. } => Err(ExprError::ReadInIndexContext {
                tensor: tensor.name().to_string(),
            }),
            ExprKind::Bool(_) | ExprKind::Cmp { .. } | ExprKind::And(..) => {
                Err(ExprError::KindMismatch {
                    expected: "integer",
                    found: self.to_string(),
                })
            }
        }
    }

    /// Evaluate as a predicate
    pub fn eval_bool(&self, env: &Bindings) -> ExprResult<bool> {
        match self.kind() {
            ExprKind::Bool(v) => Ok(*v),
            ExprKind::Cmp { op, lhs, rhs } => Ok(op.apply(lhs.eval_int(env)?, rhs.eval_int(env)?)),
            ExprKind::And(a, b) => Ok(a.eval_bool(env)? && b.eval_bool(env)?),
            ExprKind::Select {
                cond,
                then,
                otherwise,
            } => {
                if cond.eval_bool(env)? {
                    then.eval_bool(env)
                } else {
                    otherwise.eval_bool(env)
                }
            }
            _ => Err(ExprError::KindMismatch {
                expected: "boolean",
                found: self.to_string(),
            }),
        }
    }

    /// Evaluate as an element value, resolving reads through `reader`.
    ///
    /// Read indices are evaluated as integers. Arithmetic over values is
    /// carried out in `f64`.
    pub fn eval_value<R: TensorReader>(&self, env: &Bindings, reader: &R) -> Result<f64, R::Error> {
        match self.kind() {
            ExprKind::Read { tensor, indices } => {
                let coord = indices
                    .iter()
                    .map(|index| index.eval_int(env))
                    .collect::<ExprResult<Vec<i64>>>()?;
                reader.read(tensor, &coord)
            }
            ExprKind::Select {
                cond,
                then,
                otherwise,
            } => {
                if cond.eval_bool(env)? {
                    then.eval_value(env, reader)
                } else {
                    otherwise.eval_value(env, reader)
                }
            }
            ExprKind::Binary { op, lhs, rhs } if self.contains_read() => {
                let a = lhs.eval_value(env, reader)?;
                let b = rhs.eval_value(env, reader)?;
                let value = match op {
                    BinaryOp::Add => a + b,
                    BinaryOp::Sub => a - b,
                    BinaryOp::Mul => a * b,
                    BinaryOp::FloorDiv | BinaryOp::FloorMod if b == 0.0 => {
                        return Err(ExprError::DivisionByZero {
                            expr: self.to_string(),
                        }
                        .into())
                    }
                    BinaryOp::FloorDiv => (a / b).floor(),
                    BinaryOp::FloorMod => a - b * (a / b).floor(),
                };
                Ok(value)
            }
            _ => Ok(self.eval_int(env)? as f64),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::var::TensorId;

    struct Ramp {
        width: i64,
    }

    impl TensorReader for Ramp {
        type Error = ExprError;

        fn read(&self, _tensor: &TensorRef, indices: &[i64]) -> Result<f64, ExprError> {
            Ok((indices[0] * self.width + indices[1]) as f64)
        }
    }

    #[test]
    fn test_eval_int_arithmetic() {
        let i = Var::new("i");
        let j = Var::new("j");
        let e = Expr::var(&i) * 5 + Expr::var(&j);
        let env = Bindings::new().with(&i, 2).with(&j, 3);
        assert_eq!(e.eval_int(&env).unwrap(), 13);
    }

    #[test]
    fn test_eval_unbound() {
        let i = Var::new("i");
        let err = Expr::var(&i).eval_int(&Bindings::new()).unwrap_err();
        assert_eq!(err, ExprError::UnboundVariable { name: "i".into() });
    }

    #[test]
    fn test_eval_division_by_zero() {
        let n = Var::new("n");
        let e = Expr::int(8).floor_div(Expr::var(&n));
        let env = Bindings::new().with(&n, 0);
        assert!(matches!(
            e.eval_int(&env),
            Err(ExprError::DivisionByZero { .. })
        ));
    }

    #[test]
    fn test_eval_select_is_lazy() {
        let i = Var::new("i");
        let idx = Expr::var(&i);
        // The untaken branch would divide by zero.
        let e = Expr::select(idx.ge(0), idx.clone(), idx.floor_div(0));
        let env = Bindings::new().with(&i, 4);
        assert_eq!(e.eval_int(&env).unwrap(), 4);
    }

    #[test]
    fn test_eval_kind_mismatch() {
        let i = Var::new("i");
        let pred = Expr::var(&i).ge(0);
        let env = Bindings::new().with(&i, 1);
        assert!(pred.eval_bool(&env).unwrap());
        assert!(matches!(
            pred.eval_int(&env),
            Err(ExprError::KindMismatch { expected: "integer", .. })
        ));
        assert!(matches!(
            Expr::var(&i).eval_bool(&env),
            Err(ExprError::KindMismatch { expected: "boolean", .. })
        ));
    }

    #[test]
    fn test_eval_value_reads() {
        let t = TensorRef::new(TensorId::fresh(), "t");
        let i = Var::new("i");
        let j = Var::new("j");
        let read = Expr::read(t.clone(), [Expr::var(&i), Expr::var(&j) + 1]);
        let env = Bindings::new().with(&i, 1).with(&j, 2);
        let reader = Ramp { width: 10 };

        assert_eq!(read.eval_value(&env, &reader).unwrap(), 13.0);
        assert_eq!((read.clone() * 2).eval_value(&env, &reader).unwrap(), 26.0);

        assert!(matches!(
            read.eval_int(&env),
            Err(ExprError::ReadInIndexContext { .. })
        ));
    }
}
