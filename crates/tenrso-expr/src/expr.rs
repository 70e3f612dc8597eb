//! Symbolic integer expressions with constant folding.
//!
//! An [`Expr`] is an immutable, `Arc`-shared tree. Building an expression
//! never evaluates anything that depends on a variable; constructors only fold
//! what is already constant (`2 * 3`, `x + 0`, `x * 1`, `select(true, a, b)`).
//! Downstream lowering stages receive the tree unchanged otherwise.

use crate::var::{TensorRef, Var};
use smallvec::SmallVec;
use std::fmt;
use std::ops::{Add, Mul, Sub};
use std::sync::Arc;

/// Index list of a tensor read. Inline for up to six axes.
pub type Indices = SmallVec<[Expr; 6]>;

/// Integer binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    /// `a + b`
    Add,
    /// `a - b`
    Sub,
    /// `a * b`
    Mul,
    /// Division rounding toward negative infinity
    FloorDiv,
    /// Remainder with the sign of the divisor
    FloorMod,
}

impl BinaryOp {
    /// Apply to constants. `None` on overflow or division by zero.
    pub fn apply(self, lhs: i64, rhs: i64) -> Option<i64> {
        match self {
            BinaryOp::Add => lhs.checked_add(rhs),
            BinaryOp::Sub => lhs.checked_sub(rhs),
            BinaryOp::Mul => lhs.checked_mul(rhs),
            BinaryOp::FloorDiv => floor_div(lhs, rhs),
            BinaryOp::FloorMod => floor_mod(lhs, rhs),
        }
    }

    fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::FloorDiv => "floordiv",
            BinaryOp::FloorMod => "floormod",
        }
    }
}

/// Comparison operators producing predicates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CmpOp {
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
    /// `==`
    Eq,
    /// `!=`
    Ne,
}

impl CmpOp {
    /// Apply to constants
    pub fn apply(self, lhs: i64, rhs: i64) -> bool {
        match self {
            CmpOp::Lt => lhs < rhs,
            CmpOp::Le => lhs <= rhs,
            CmpOp::Gt => lhs > rhs,
            CmpOp::Ge => lhs >= rhs,
            CmpOp::Eq => lhs == rhs,
            CmpOp::Ne => lhs != rhs,
        }
    }

    fn symbol(self) -> &'static str {
        match self {
            CmpOp::Lt => "<",
            CmpOp::Le => "<=",
            CmpOp::Gt => ">",
            CmpOp::Ge => ">=",
            CmpOp::Eq => "==",
            CmpOp::Ne => "!=",
        }
    }

    /// Result when both sides are the same expression
    fn reflexive(self) -> bool {
        matches!(self, CmpOp::Le | CmpOp::Ge | CmpOp::Eq)
    }
}

/// Floor division on constants (`None` for a zero divisor or overflow)
pub fn floor_div(a: i64, b: i64) -> Option<i64> {
    if b == 0 {
        return None;
    }
    let q = a.checked_div(b)?;
    if a % b != 0 && ((a < 0) != (b < 0)) {
        Some(q - 1)
    } else {
        Some(q)
    }
}

/// Floor remainder on constants (`None` for a zero divisor or overflow)
pub fn floor_mod(a: i64, b: i64) -> Option<i64> {
    if b == 0 {
        return None;
    }
    let r = a.checked_rem(b)?;
    if r != 0 && ((r < 0) != (b < 0)) {
        Some(r + b)
    } else {
        Some(r)
    }
}

/// Node kinds of an expression tree
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ExprKind {
    /// Integer constant
    Int(i64),
    /// Boolean constant (folded predicate)
    Bool(bool),
    /// Symbolic variable
    Var(Var),
    /// Integer arithmetic
    Binary {
        op: BinaryOp,
        lhs: Expr,
        rhs: Expr,
    },
    /// Integer comparison
    Cmp { op: CmpOp, lhs: Expr, rhs: Expr },
    /// Logical conjunction of two predicates
    And(Expr, Expr),
    /// Conditional select; only the taken branch is evaluated
    Select {
        cond: Expr,
        then: Expr,
        otherwise: Expr,
    },
    /// Element read of another tensor
    Read { tensor: TensorRef, indices: Indices },
}

/// Symbolic expression handle.
///
/// Cloning is cheap (reference counted). Equality is structural.
///
/// # Examples
///
/// ```
/// use tenrso_expr::{Expr, Var};
///
/// let i = Var::new("i");
/// let e = Expr::var(&i) * 4 + 2;
/// assert_eq!(e.to_string(), "((i * 4) + 2)");
///
/// // Constants fold eagerly
/// assert_eq!((Expr::int(6) * 7).as_const(), Some(42));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Expr(Arc<ExprKind>);

impl Expr {
    /// Wrap a node without any folding
    pub fn new(kind: ExprKind) -> Self {
        Expr(Arc::new(kind))
    }

    /// Node kind
    pub fn kind(&self) -> &ExprKind {
        &self.0
    }

    /// Integer constant
    pub fn int(value: i64) -> Self {
        Self::new(ExprKind::Int(value))
    }

    /// Constant dimension or coordinate given as `usize`
    pub fn dim(value: usize) -> Self {
        Self::int(value as i64)
    }

    /// Boolean constant
    pub fn from_bool(value: bool) -> Self {
        Self::new(ExprKind::Bool(value))
    }

    /// Reference a variable
    pub fn var(var: &Var) -> Self {
        Self::new(ExprKind::Var(var.clone()))
    }

    /// Integer value if this expression is a constant
    pub fn as_const(&self) -> Option<i64> {
        match self.kind() {
            ExprKind::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Boolean value if this expression is a folded predicate
    pub fn as_bool(&self) -> Option<bool> {
        match self.kind() {
            ExprKind::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Whether this expression is an integer constant
    pub fn is_const(&self) -> bool {
        self.as_const().is_some()
    }

    /// Build `lhs op rhs`, folding constants and identities.
    pub fn binary(op: BinaryOp, lhs: Expr, rhs: Expr) -> Expr {
        let (a, b) = (lhs.as_const(), rhs.as_const());
        if let (Some(a), Some(b)) = (a, b) {
            if let Some(v) = op.apply(a, b) {
                return Expr::int(v);
            }
            return Self::new(ExprKind::Binary { op, lhs, rhs });
        }

        match op {
            BinaryOp::Add => match (a, b) {
                (Some(0), _) => return rhs,
                (_, Some(0)) => return lhs,
                (_, Some(c)) => return lhs.offset(c),
                (Some(c), _) => return rhs.offset(c),
                _ => {}
            },
            BinaryOp::Sub => {
                if b == Some(0) {
                    return lhs;
                }
                if lhs == rhs {
                    return Expr::int(0);
                }
                if let Some(neg) = b.and_then(i64::checked_neg) {
                    return lhs.offset(neg);
                }
            }
            BinaryOp::Mul => match (a, b) {
                (Some(0), _) | (_, Some(0)) => return Expr::int(0),
                (Some(1), _) => return rhs,
                (_, Some(1)) => return lhs,
                _ => {}
            },
            BinaryOp::FloorDiv => {
                if b == Some(1) {
                    return lhs;
                }
            }
            BinaryOp::FloorMod => {
                if b == Some(1) {
                    return Expr::int(0);
                }
            }
        }
        Self::new(ExprKind::Binary { op, lhs, rhs })
    }

    /// Split `base + c` / `base - c` into `(base, ±c)`.
    fn split_offset(&self) -> (Expr, i64) {
        if let ExprKind::Binary { op, lhs, rhs } = self.kind() {
            match (op, rhs.as_const()) {
                (BinaryOp::Add, Some(c)) => return (lhs.clone(), c),
                (BinaryOp::Sub, Some(c)) => {
                    if let Some(neg) = c.checked_neg() {
                        return (lhs.clone(), neg);
                    }
                }
                _ => {}
            }
        }
        (self.clone(), 0)
    }

    /// `self + c`, merged into an existing constant offset.
    fn offset(&self, c: i64) -> Expr {
        let (base, c0) = self.split_offset();
        match c0.checked_add(c) {
            Some(0) => base,
            Some(total) if total > 0 => Self::new(ExprKind::Binary {
                op: BinaryOp::Add,
                lhs: base,
                rhs: Expr::int(total),
            }),
            Some(total) => match total.checked_neg() {
                Some(neg) => Self::new(ExprKind::Binary {
                    op: BinaryOp::Sub,
                    lhs: base,
                    rhs: Expr::int(neg),
                }),
                None => Self::new(ExprKind::Binary {
                    op: BinaryOp::Add,
                    lhs: base,
                    rhs: Expr::int(total),
                }),
            },
            None => Self::new(ExprKind::Binary {
                op: BinaryOp::Add,
                lhs: self.clone(),
                rhs: Expr::int(c),
            }),
        }
    }

    /// Floor division `self // rhs`
    pub fn floor_div(&self, rhs: impl Into<Expr>) -> Expr {
        Self::binary(BinaryOp::FloorDiv, self.clone(), rhs.into())
    }

    /// Floor remainder `self % rhs`
    pub fn floor_mod(&self, rhs: impl Into<Expr>) -> Expr {
        Self::binary(BinaryOp::FloorMod, self.clone(), rhs.into())
    }

    /// Build the predicate `lhs op rhs`
    pub fn compare(op: CmpOp, lhs: Expr, rhs: Expr) -> Expr {
        if let (Some(a), Some(b)) = (lhs.as_const(), rhs.as_const()) {
            return Expr::from_bool(op.apply(a, b));
        }
        if lhs == rhs {
            return Expr::from_bool(op.reflexive());
        }
        Self::new(ExprKind::Cmp { op, lhs, rhs })
    }

    /// `self < rhs`
    pub fn lt(&self, rhs: impl Into<Expr>) -> Expr {
        Self::compare(CmpOp::Lt, self.clone(), rhs.into())
    }

    /// `self <= rhs`
    pub fn le(&self, rhs: impl Into<Expr>) -> Expr {
        Self::compare(CmpOp::Le, self.clone(), rhs.into())
    }

    /// `self > rhs`
    pub fn gt(&self, rhs: impl Into<Expr>) -> Expr {
        Self::compare(CmpOp::Gt, self.clone(), rhs.into())
    }

    /// `self >= rhs`
    pub fn ge(&self, rhs: impl Into<Expr>) -> Expr {
        Self::compare(CmpOp::Ge, self.clone(), rhs.into())
    }

    /// `self == rhs` as a predicate (not structural equality)
    pub fn eq_to(&self, rhs: impl Into<Expr>) -> Expr {
        Self::compare(CmpOp::Eq, self.clone(), rhs.into())
    }

    /// Conjunction of two predicates
    pub fn and(&self, rhs: &Expr) -> Expr {
        match (self.as_bool(), rhs.as_bool()) {
            (Some(false), _) | (_, Some(false)) => Expr::from_bool(false),
            (Some(true), _) => rhs.clone(),
            (_, Some(true)) => self.clone(),
            _ => Self::new(ExprKind::And(self.clone(), rhs.clone())),
        }
    }

    /// `cond ? then : otherwise`
    ///
    /// Folds when the condition is constant or both branches are identical.
    pub fn select(cond: Expr, then: Expr, otherwise: Expr) -> Expr {
        match cond.as_bool() {
            Some(true) => then,
            Some(false) => otherwise,
            None if then == otherwise => then,
            None => Self::new(ExprKind::Select {
                cond,
                then,
                otherwise,
            }),
        }
    }

    /// Read `tensor[indices]`
    pub fn read(tensor: TensorRef, indices: impl IntoIterator<Item = Expr>) -> Expr {
        Self::new(ExprKind::Read {
            tensor,
            indices: indices.into_iter().collect(),
        })
    }

    /// Sum of terms (`0` when empty)
    pub fn sum<I>(terms: I) -> Expr
    where
        I: IntoIterator,
        I::Item: Into<Expr>,
    {
        terms
            .into_iter()
            .fold(Expr::int(0), |acc, term| acc + term.into())
    }

    /// Product of factors (`1` when empty)
    pub fn product<I>(factors: I) -> Expr
    where
        I: IntoIterator,
        I::Item: Into<Expr>,
    {
        factors
            .into_iter()
            .fold(Expr::int(1), |acc, factor| acc * factor.into())
    }

    /// Decide equality without evaluating.
    ///
    /// `Some(true)` if structurally equal, `Some(false)` if both are constants
    /// that differ, `None` when it cannot be decided symbolically.
    pub fn provably_eq(&self, other: &Expr) -> Option<bool> {
        if self == other {
            return Some(true);
        }
        match (self.as_const(), other.as_const()) {
            (Some(a), Some(b)) => Some(a == b),
            _ => None,
        }
    }

    /// Pre-order traversal
    pub fn walk(&self, f: &mut impl FnMut(&Expr)) {
        f(self);
        match self.kind() {
            ExprKind::Int(_) | ExprKind::Bool(_) | ExprKind::Var(_) => {}
            ExprKind::Binary { lhs, rhs, .. } | ExprKind::Cmp { lhs, rhs, .. } => {
                lhs.walk(f);
                rhs.walk(f);
            }
            ExprKind::And(a, b) => {
                a.walk(f);
                b.walk(f);
            }
            ExprKind::Select {
                cond,
                then,
                otherwise,
            } => {
                cond.walk(f);
                then.walk(f);
                otherwise.walk(f);
            }
            ExprKind::Read { indices, .. } => {
                for index in indices {
                    index.walk(f);
                }
            }
        }
    }

    /// Tensors read by this expression, first occurrence order, deduplicated
    pub fn tensor_refs(&self) -> Vec<TensorRef> {
        let mut refs: Vec<TensorRef> = Vec::new();
        self.walk(&mut |e| {
            if let ExprKind::Read { tensor, .. } = e.kind() {
                if !refs.contains(tensor) {
                    refs.push(tensor.clone());
                }
            }
        });
        refs
    }

    /// Whether any tensor read occurs in this expression
    pub fn contains_read(&self) -> bool {
        let mut found = false;
        self.walk(&mut |e| {
            if matches!(e.kind(), ExprKind::Read { .. }) {
                found = true;
            }
        });
        found
    }

    /// Number of nodes in the tree (shared subtrees counted per use)
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        self.walk(&mut |_| count += 1);
        count
    }
}

impl From<i64> for Expr {
    fn from(value: i64) -> Self {
        Expr::int(value)
    }
}

impl From<bool> for Expr {
    fn from(value: bool) -> Self {
        Expr::from_bool(value)
    }
}

impl From<&Var> for Expr {
    fn from(var: &Var) -> Self {
        Expr::var(var)
    }
}

impl From<Var> for Expr {
    fn from(var: Var) -> Self {
        Expr::new(ExprKind::Var(var))
    }
}

impl From<&Expr> for Expr {
    fn from(expr: &Expr) -> Self {
        expr.clone()
    }
}

macro_rules! impl_arith {
    ($trait:ident, $method:ident, $op:expr) => {
        impl $trait<Expr> for Expr {
            type Output = Expr;
            fn $method(self, rhs: Expr) -> Expr {
                Expr::binary($op, self, rhs)
            }
        }

        impl $trait<&Expr> for Expr {
            type Output = Expr;
            fn $method(self, rhs: &Expr) -> Expr {
                Expr::binary($op, self, rhs.clone())
            }
        }

        impl $trait<Expr> for &Expr {
            type Output = Expr;
            fn $method(self, rhs: Expr) -> Expr {
                Expr::binary($op, self.clone(), rhs)
            }
        }

        impl $trait<&Expr> for &Expr {
            type Output = Expr;
            fn $method(self, rhs: &Expr) -> Expr {
                Expr::binary($op, self.clone(), rhs.clone())
            }
        }

        impl $trait<i64> for Expr {
            type Output = Expr;
            fn $method(self, rhs: i64) -> Expr {
                Expr::binary($op, self, Expr::int(rhs))
            }
        }

        impl $trait<i64> for &Expr {
            type Output = Expr;
            fn $method(self, rhs: i64) -> Expr {
                Expr::binary($op, self.clone(), Expr::int(rhs))
            }
        }

        impl $trait<Expr> for i64 {
            type Output = Expr;
            fn $method(self, rhs: Expr) -> Expr {
                Expr::binary($op, Expr::int(self), rhs)
            }
        }
    };
}

impl_arith!(Add, add, BinaryOp::Add);
impl_arith!(Sub, sub, BinaryOp::Sub);
impl_arith!(Mul, mul, BinaryOp::Mul);

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind() {
            ExprKind::Int(v) => write!(f, "{}", v),
            ExprKind::Bool(v) => write!(f, "{}", v),
            ExprKind::Var(v) => write!(f, "{}", v),
            ExprKind::Binary { op, lhs, rhs } => match op {
                BinaryOp::FloorDiv | BinaryOp::FloorMod => {
                    write!(f, "{}({}, {})", op.symbol(), lhs, rhs)
                }
                _ => write!(f, "({} {} {})", lhs, op.symbol(), rhs),
            },
            ExprKind::Cmp { op, lhs, rhs } => write!(f, "({} {} {})", lhs, op.symbol(), rhs),
            ExprKind::And(a, b) => write!(f, "({} && {})", a, b),
            ExprKind::Select {
                cond,
                then,
                otherwise,
            } => write!(f, "select({}, {}, {})", cond, then, otherwise),
            ExprKind::Read { tensor, indices } => {
                write!(f, "{}[", tensor.name())?;
                for (i, index) in indices.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", index)?;
                }
                f.write_str("]")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::var::TensorId;

    #[test]
    fn test_constant_folding() {
        assert_eq!((Expr::int(2) + Expr::int(3)).as_const(), Some(5));
        assert_eq!((Expr::int(2) - 5).as_const(), Some(-3));
        assert_eq!((Expr::int(4) * 6).as_const(), Some(24));
        assert_eq!(Expr::int(-7).floor_div(2).as_const(), Some(-4));
        assert_eq!(Expr::int(-7).floor_mod(2).as_const(), Some(1));
    }

    #[test]
    fn test_identities() {
        let i = Expr::var(&Var::new("i"));
        assert_eq!(&i + 0, i);
        assert_eq!(0 + i.clone(), i);
        assert_eq!(&i * 1, i);
        assert_eq!((&i * 0).as_const(), Some(0));
        assert_eq!(i.floor_div(1), i);
        assert_eq!(i.floor_mod(1).as_const(), Some(0));
        assert_eq!((&i - &i).as_const(), Some(0));
    }

    #[test]
    fn test_offsets_merge() {
        let j = Expr::var(&Var::new("j"));
        let e = (&j - 4) - 6;
        assert_eq!(e.to_string(), "(j - 10)");

        let back = e + 10;
        assert_eq!(back, j);

        let up = (&j + 3) - 1;
        assert_eq!(up.to_string(), "(j + 2)");
    }

    #[test]
    fn test_division_by_zero_not_folded() {
        let e = Expr::int(4).floor_div(0);
        assert!(!e.is_const());
        assert_eq!(e.to_string(), "floordiv(4, 0)");
    }

    #[test]
    fn test_compare_folding() {
        assert_eq!(Expr::int(3).ge(0).as_bool(), Some(true));
        assert_eq!(Expr::int(-1).ge(0).as_bool(), Some(false));

        let i = Expr::var(&Var::new("i"));
        assert_eq!(i.ge(i.clone()).as_bool(), Some(true));
        assert_eq!(i.lt(i.clone()).as_bool(), Some(false));
        assert!(i.ge(0).as_bool().is_none());
    }

    #[test]
    fn test_select_folding() {
        let a = Expr::var(&Var::new("a"));
        let b = Expr::var(&Var::new("b"));
        let c = Expr::var(&Var::new("c")).ge(0);

        assert_eq!(Expr::select(Expr::from_bool(true), a.clone(), b.clone()), a);
        assert_eq!(Expr::select(Expr::from_bool(false), a.clone(), b.clone()), b);
        assert_eq!(Expr::select(c.clone(), a.clone(), a.clone()), a);
        assert!(matches!(
            Expr::select(c, a, b).kind(),
            ExprKind::Select { .. }
        ));
    }

    #[test]
    fn test_and_folding() {
        let p = Expr::var(&Var::new("p")).ge(0);
        assert_eq!(p.and(&Expr::from_bool(true)), p);
        assert_eq!(p.and(&Expr::from_bool(false)).as_bool(), Some(false));
    }

    #[test]
    fn test_sum_and_product() {
        let n = Expr::var(&Var::new("n"));
        assert_eq!(Expr::product([2i64, 3, 4]).as_const(), Some(24));
        assert_eq!(Expr::sum(Vec::<i64>::new()).as_const(), Some(0));
        assert_eq!(Expr::product([Expr::int(1), n.clone()]), n);
        assert_eq!(Expr::product([n.clone(), Expr::int(4)]).to_string(), "(n * 4)");
    }

    #[test]
    fn test_provably_eq() {
        let n = Expr::var(&Var::new("n"));
        let m = Expr::var(&Var::new("m"));
        assert_eq!(Expr::int(3).provably_eq(&Expr::int(3)), Some(true));
        assert_eq!(Expr::int(3).provably_eq(&Expr::int(4)), Some(false));
        assert_eq!(n.provably_eq(&n.clone()), Some(true));
        assert_eq!(n.provably_eq(&m), None);
        assert_eq!(n.provably_eq(&Expr::int(3)), None);
    }

    #[test]
    fn test_read_display_and_refs() {
        let a = TensorRef::new(TensorId::fresh(), "a");
        let b = TensorRef::new(TensorId::fresh(), "b");
        let i = Expr::var(&Var::new("i"));
        let j = Expr::var(&Var::new("j"));

        let ind = &j - 4;
        let e = Expr::select(
            ind.ge(0),
            Expr::read(b.clone(), [i.clone(), ind.clone()]),
            Expr::read(a.clone(), [i.clone(), j.clone()]),
        );

        assert_eq!(
            e.to_string(),
            "select(((j - 4) >= 0), b[i, (j - 4)], a[i, j])"
        );
        assert_eq!(e.tensor_refs(), vec![b, a]);
        assert!(e.contains_read());
        assert!(!ind.contains_read());
    }

    #[test]
    fn test_floor_helpers() {
        assert_eq!(floor_div(7, 2), Some(3));
        assert_eq!(floor_div(-7, 2), Some(-4));
        assert_eq!(floor_div(7, -2), Some(-4));
        assert_eq!(floor_div(1, 0), None);
        assert_eq!(floor_div(i64::MIN, -1), None);
        assert_eq!(floor_mod(7, -2), Some(-1));
        assert_eq!(floor_mod(-7, 2), Some(1));
        assert_eq!(floor_mod(6, 3), Some(0));
    }
}
