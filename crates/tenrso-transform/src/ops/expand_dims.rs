//! Insertion of unit axes

use super::record_transform;
use crate::error::{TransformError, TransformResult};
use crate::hints::TransformHints;
use crate::shape::normalize_insert_axis;
use tenrso_expr::Expr;
use tenrso_graph::{GraphBuilder, Shape, Tag, TensorHandle};

/// Insert `num_newaxis` axes of size 1 at position `axis`.
///
/// A negative `axis` counts from the end of the *extended* shape
/// (`rank + axis + 1`), so `-1` appends after the last existing axis.
/// The coordinate map drops the inserted coordinates, which are always 0.
///
/// Default tag: [`Tag::Broadcast`].
///
/// # Errors
///
/// - [`TransformError::InvalidAxis`] if the normalised axis is outside `[0, rank]`
/// - [`TransformError::InvalidArgument`] if `num_newaxis` is 0 or overflows the output rank
pub fn expand_dims<G: GraphBuilder + ?Sized>(
    graph: &G,
    hints: &TransformHints,
    a: &TensorHandle,
    axis: isize,
    num_newaxis: usize,
) -> TransformResult<TensorHandle> {
    if num_newaxis == 0 {
        return Err(TransformError::invalid_argument(
            "expand_dims",
            "num_newaxis must be at least 1",
        ));
    }
    let axis = normalize_insert_axis(axis, a.rank())?;

    let src = a.shape();
    let out_rank = src.len().checked_add(num_newaxis).ok_or_else(|| {
        TransformError::invalid_argument(
            "expand_dims",
            format!("num_newaxis {} overflows the output rank", num_newaxis),
        )
    })?;
    let mut out_shape = Shape::with_capacity(out_rank);
    out_shape.extend(src[..axis].iter().cloned());
    out_shape.extend(std::iter::repeat(Expr::int(1)).take(num_newaxis));
    out_shape.extend(src[axis..].iter().cloned());

    let tag = hints.tag_or(Tag::Broadcast);
    let out = graph.compute(
        &out_shape,
        Some(hints.name_or("T_expand_dims")),
        Some(tag),
        &|idx: &[Expr]| {
            let kept: Vec<Expr> = idx[..axis]
                .iter()
                .chain(&idx[axis + num_newaxis..])
                .cloned()
                .collect();
            a.at(&kept)
        },
    )?;

    record_transform("expand_dims", std::slice::from_ref(a), &out, tag);
    Ok(out)
}
