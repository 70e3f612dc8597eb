//! Concatenation along an existing axis

use super::record_transform;
use crate::error::{TransformError, TransformResult};
use crate::hints::TransformHints;
use crate::shape::{enforce, normalize_axis};
use tenrso_expr::Expr;
use tenrso_graph::{format_shape, GraphBuilder, Shape, Tag, TensorHandle};

/// Join `inputs` along `axis`.
///
/// All inputs share rank and every dimension except `axis`, which sums in
/// the output. The value is a cascade of guarded selects built as a left
/// fold: starting from `inputs[0](out)` with `ind = out[axis]`, each further
/// input `i` subtracts `size[i - 1]` from `ind` and replaces the running
/// result with `inputs[i](.., ind, ..)` where `ind >= 0`. Later inputs win,
/// so each coordinate resolves to exactly one segment.
///
/// Default tag: [`Tag::Injective`].
///
/// # Errors
///
/// - [`TransformError::EmptyInput`] for an empty list
/// - [`TransformError::InvalidAxis`] if `axis` is outside the first input's rank
/// - [`TransformError::ShapeMismatch`] on rank or non-axis dimension disagreement
pub fn concatenate<G: GraphBuilder + ?Sized>(
    graph: &G,
    hints: &TransformHints,
    inputs: &[TensorHandle],
    axis: isize,
) -> TransformResult<TensorHandle> {
    let first = inputs
        .first()
        .ok_or_else(|| TransformError::empty_input("concatenate", "inputs"))?;
    let rank = first.rank();
    let axis = normalize_axis("concatenate", axis, rank)?;

    for (pos, t) in inputs.iter().enumerate().skip(1) {
        if t.rank() != rank {
            return Err(TransformError::shape_mismatch(
                "concatenate",
                format!("rank {}", rank),
                format!("rank {}", t.rank()),
                format!("Input {} ('{}') has shape {}", pos, t.name(), format_shape(t.shape())),
            ));
        }
        for k in (0..rank).filter(|&k| k != axis) {
            enforce(
                first.shape()[k].provably_eq(&t.shape()[k]),
                hints.strict_shapes,
                "concatenate",
                format_shape(first.shape()),
                format_shape(t.shape()),
                &format!("Input {} ('{}') differs on axis {}", pos, t.name(), k),
            )?;
        }
    }

    let sizes: Vec<Expr> = inputs.iter().map(|t| t.shape()[axis].clone()).collect();
    let mut out_shape: Shape = first.shape().iter().cloned().collect();
    out_shape[axis] = Expr::sum(sizes.iter());

    let tag = hints.tag_or(Tag::Injective);
    let out = graph.compute(
        &out_shape,
        Some(hints.name_or("T_concat")),
        Some(tag),
        &|idx: &[Expr]| {
            let mut ind = idx[axis].clone();
            let mut coord = idx.to_vec();
            inputs
                .iter()
                .skip(1)
                .enumerate()
                .fold(first.at(idx), |acc, (i, t)| {
                    ind = &ind - &sizes[i];
                    coord[axis] = ind.clone();
                    Expr::select(ind.ge(0), t.at(&coord), acc)
                })
        },
    )?;

    record_transform("concatenate", inputs, &out, tag);
    Ok(out)
}
