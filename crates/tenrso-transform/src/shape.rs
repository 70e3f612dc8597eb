//! Axis normalisation and symbolic shape checks shared by the operators

use crate::error::{TransformError, TransformResult};
use tenrso_expr::{BinaryOp, Expr, ExprKind};

/// Normalise `axis` against `rank`: negative values count from the end.
/// The result must lie in `[0, rank)`.
pub(crate) fn normalize_axis(operation: &str, axis: isize, rank: usize) -> TransformResult<usize> {
    let resolved = if axis < 0 {
        axis + rank as isize
    } else {
        axis
    };
    if resolved < 0 || resolved as usize >= rank {
        return Err(TransformError::invalid_axis(operation, axis as i64, rank));
    }
    Ok(resolved as usize)
}

/// Insertion point for `expand_dims`: negative values count from the end of
/// the extended shape (`rank + axis + 1`). The result lies in `[0, rank]`.
pub(crate) fn normalize_insert_axis(axis: isize, rank: usize) -> TransformResult<usize> {
    let resolved = if axis < 0 {
        rank as isize + axis + 1
    } else {
        axis
    };
    if resolved < 0 || resolved as usize > rank {
        return Err(TransformError::invalid_axis("expand_dims", axis as i64, rank));
    }
    Ok(resolved as usize)
}

/// Product of dimensions as `coefficient * factors`, with multiplication
/// nodes flattened and constants pulled into the coefficient.
#[derive(Debug)]
struct Monomial {
    coeff: i64,
    factors: Vec<Expr>,
}

impl Monomial {
    fn of(dims: &[Expr]) -> Option<Self> {
        let mut m = Monomial {
            coeff: 1,
            factors: Vec::new(),
        };
        for dim in dims {
            m.absorb(dim)?;
        }
        Some(m)
    }

    fn absorb(&mut self, e: &Expr) -> Option<()> {
        match e.kind() {
            ExprKind::Int(v) => self.coeff = self.coeff.checked_mul(*v)?,
            ExprKind::Binary {
                op: BinaryOp::Mul,
                lhs,
                rhs,
            } => {
                self.absorb(lhs)?;
                self.absorb(rhs)?;
            }
            _ => self.factors.push(e.clone()),
        }
        Some(())
    }

    /// Same factors up to order
    fn same_factors(&self, other: &Monomial) -> bool {
        if self.factors.len() != other.factors.len() {
            return false;
        }
        let mut remaining = other.factors.clone();
        for f in &self.factors {
            match remaining.iter().position(|g| g == f) {
                Some(pos) => {
                    remaining.swap_remove(pos);
                }
                None => return false,
            }
        }
        true
    }
}

/// Decide whether two shapes hold the same number of elements.
///
/// `None` when the answer depends on the value of a symbolic dimension.
pub fn element_count_eq(a: &[Expr], b: &[Expr]) -> Option<bool> {
    let (ma, mb) = (Monomial::of(a)?, Monomial::of(b)?);
    if ma.coeff == 0 || mb.coeff == 0 {
        if ma.coeff == mb.coeff {
            return Some(true);
        }
        let nonzero = if ma.coeff == 0 { &mb } else { &ma };
        if nonzero.factors.is_empty() {
            return Some(false);
        }
        return None;
    }
    if ma.same_factors(&mb) {
        return Some(ma.coeff == mb.coeff);
    }
    None
}

/// Apply the shape-check policy to a symbolic verdict.
///
/// Provable mismatches always fail. Undecidable comparisons fail only under
/// strict checking and are otherwise deferred to lowering with a warning.
pub(crate) fn enforce(
    verdict: Option<bool>,
    strict: bool,
    operation: &str,
    expected: String,
    actual: String,
    context: &str,
) -> TransformResult<()> {
    match verdict {
        Some(true) => Ok(()),
        Some(false) => Err(TransformError::shape_mismatch(
            operation, expected, actual, context,
        )),
        None if strict => Err(TransformError::shape_mismatch(
            operation,
            expected,
            actual,
            format!("{} (not provable symbolically)", context),
        )),
        None => {
            tracing::warn!(
                operation,
                %expected,
                %actual,
                "shape check deferred: not decidable symbolically"
            );
            Ok(())
        }
    }
}
