//! Axis permutation

use super::record_transform;
use crate::error::{TransformError, TransformResult};
use crate::hints::TransformHints;
use tenrso_expr::Expr;
use tenrso_graph::{GraphBuilder, Shape, Tag, TensorHandle};

/// Permute the axes of `a`.
///
/// Output axis `i` is input axis `axes[i]`; `None` or an empty list reverses
/// all axes.
/// Default tag: [`Tag::Injective`].
///
/// # Errors
///
/// [`TransformError::InvalidPermutation`] if `axes` is not a permutation of
/// `0..rank`.
pub fn transpose<G: GraphBuilder + ?Sized>(
    graph: &G,
    hints: &TransformHints,
    a: &TensorHandle,
    axes: Option<&[usize]>,
) -> TransformResult<TensorHandle> {
    let rank = a.rank();
    let axes: Vec<usize> = match axes {
        Some(axes) if !axes.is_empty() => {
            check_permutation(axes, rank)?;
            axes.to_vec()
        }
        _ => (0..rank).rev().collect(),
    };

    let out_shape: Shape = axes.iter().map(|&k| a.shape()[k].clone()).collect();

    let tag = hints.tag_or(Tag::Injective);
    let out = graph.compute(
        &out_shape,
        Some(hints.name_or("T_transpose")),
        Some(tag),
        &|idx: &[Expr]| {
            let mut src = vec![Expr::int(0); rank];
            for (i, &k) in axes.iter().enumerate() {
                src[k] = idx[i].clone();
            }
            a.at(&src)
        },
    )?;

    record_transform("transpose", std::slice::from_ref(a), &out, tag);
    Ok(out)
}

fn check_permutation(axes: &[usize], rank: usize) -> TransformResult<()> {
    let mut seen = vec![false; rank];
    let valid = axes.len() == rank
        && axes.iter().all(|&k| {
            if k >= rank || seen[k] {
                return false;
            }
            seen[k] = true;
            true
        });
    if !valid {
        return Err(TransformError::InvalidPermutation {
            axes: axes.to_vec(),
            rank,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::{ramp_input, shape_of};
    use tenrso_graph::{ComputeGraph, Evaluator};

    #[test]
    fn test_default_reverses_axes() {
        let graph = ComputeGraph::new();
        let (a, data) = ramp_input(&graph, "a", &[2, 3, 4]);
        let t = transpose(&graph, &TransformHints::default(), &a, None).unwrap();
        assert_eq!(shape_of(&t), vec![4, 3, 2]);
        assert_eq!(t.tag(), Some(Tag::Injective));

        let mut eval = Evaluator::new(&graph);
        eval.bind(&a, data).unwrap();
        assert_eq!(
            eval.value_at(&t, &[3, 1, 0]).unwrap(),
            eval.value_at(&a, &[0, 1, 3]).unwrap()
        );
    }

    #[test]
    fn test_explicit_permutation() {
        let graph = ComputeGraph::new();
        let (a, data) = ramp_input(&graph, "a", &[2, 3, 4]);
        let t = transpose(&graph, &TransformHints::default(), &a, Some(&[1, 2, 0][..])).unwrap();
        assert_eq!(shape_of(&t), vec![3, 4, 2]);

        let mut eval = Evaluator::new(&graph);
        eval.bind(&a, data).unwrap();
        for i in 0..3 {
            for j in 0..4 {
                for k in 0..2 {
                    assert_eq!(
                        eval.value_at(&t, &[i, j, k]).unwrap(),
                        eval.value_at(&a, &[k, i, j]).unwrap()
                    );
                }
            }
        }
    }

    #[test]
    fn test_body_is_pure_permutation() {
        let graph = ComputeGraph::new();
        let (a, _) = ramp_input(&graph, "a", &[2, 3]);
        let t = transpose(&graph, &TransformHints::default(), &a, None).unwrap();
        assert_eq!(t.body().unwrap().to_string(), "a[i1, i0]");
    }

    #[test]
    fn test_invalid_permutations() {
        let graph = ComputeGraph::new();
        let (a, _) = ramp_input(&graph, "a", &[2, 3, 4]);
        let hints = TransformHints::default();

        for bad in [&[0, 1][..], &[0, 1, 1], &[0, 1, 3], &[2, 1, 0, 3]] {
            let err = transpose(&graph, &hints, &a, Some(bad)).unwrap_err();
            assert_eq!(
                err,
                TransformError::InvalidPermutation {
                    axes: bad.to_vec(),
                    rank: 3
                }
            );
        }
        assert_eq!(graph.len(), 1);
    }

    #[test]
    fn test_empty_axes_reverse() {
        let graph = ComputeGraph::new();
        let (a, data) = ramp_input(&graph, "a", &[2, 3, 4]);
        let hints = TransformHints::default();
        let t = transpose(&graph, &hints, &a, Some(&[][..])).unwrap();
        assert_eq!(shape_of(&t), vec![4, 3, 2]);
        assert_eq!(t.body().unwrap().to_string(), "a[i2, i1, i0]");

        let mut eval = Evaluator::new(&graph);
        eval.bind(&a, data).unwrap();
        assert_eq!(
            eval.value_at(&t, &[3, 2, 1]).unwrap(),
            eval.value_at(&a, &[1, 2, 3]).unwrap()
        );
    }

    #[test]
    fn test_scalar_transpose() {
        let graph = ComputeGraph::new();
        let (a, _) = ramp_input(&graph, "a", &[]);
        let t = transpose(&graph, &TransformHints::default(), &a, None).unwrap();
        assert_eq!(t.rank(), 0);
        let t = transpose(&graph, &TransformHints::default(), &a, Some(&[][..])).unwrap();
        assert_eq!(t.rank(), 0);
    }
}
