//! Row-major linearisation of coordinates.
//!
//! [`ravel_index`] and [`unravel_index`] are the only arithmetic shared
//! between transforms. Both build expressions; with constant shapes and
//! coordinates they fold to constants.

use crate::error::{TransformError, TransformResult};
use tenrso_expr::Expr;
use tenrso_graph::format_shape;

/// Flat row-major index of `coord` within `shape`.
///
/// Computes `sum_i coord[i] * stride[i]` with `stride[i] = product(shape[i+1..])`,
/// in Horner form `((c0 * s1 + c1) * s2 + c2) ...`.
///
/// # Examples
///
/// ```
/// use tenrso_expr::Expr;
/// use tenrso_graph::const_shape;
/// use tenrso_transform::ravel_index;
///
/// let flat = ravel_index(&[Expr::int(1), Expr::int(2)], &const_shape(&[2, 3])).unwrap();
/// assert_eq!(flat.as_const(), Some(5));
/// ```
pub fn ravel_index(coord: &[Expr], shape: &[Expr]) -> TransformResult<Expr> {
    if coord.len() != shape.len() {
        return Err(TransformError::shape_mismatch(
            "ravel_index",
            format!("{} coordinates", shape.len()),
            format!("{} coordinates", coord.len()),
            format!("Shape is {}", format_shape(shape)),
        ));
    }

    Ok(ravel_horner(coord, shape))
}

/// Horner evaluation of the flat index; lengths already agree
pub(crate) fn ravel_horner(coord: &[Expr], shape: &[Expr]) -> Expr {
    let mut parts = coord.iter().zip(shape);
    let Some((first, _)) = parts.next() else {
        return Expr::int(0);
    };
    parts.fold(first.clone(), |flat, (c, dim)| flat * dim + c)
}

/// Coordinate of flat row-major index `flat` within `shape`.
///
/// Exact inverse of [`ravel_index`] for `flat` in `[0, product(shape))`.
/// Axes are peeled off from the last one by floor remainder and floor
/// division; the leading axis receives the remaining quotient.
///
/// # Examples
///
/// ```
/// use tenrso_expr::Expr;
/// use tenrso_graph::const_shape;
/// use tenrso_transform::unravel_index;
///
/// let coord = unravel_index(&Expr::int(5), &const_shape(&[3, 2]));
/// let values: Vec<_> = coord.iter().map(|c| c.as_const().unwrap()).collect();
/// assert_eq!(values, vec![2, 1]);
/// ```
pub fn unravel_index(flat: &Expr, shape: &[Expr]) -> Vec<Expr> {
    if shape.is_empty() {
        return Vec::new();
    }

    let mut coord = vec![Expr::int(0); shape.len()];
    let mut rest = flat.clone();
    for axis in (1..shape.len()).rev() {
        coord[axis] = rest.floor_mod(&shape[axis]);
        rest = rest.floor_div(&shape[axis]);
    }
    coord[0] = rest;
    coord
}
