//! Row-major reshape

use super::record_transform;
use crate::error::TransformResult;
use crate::hints::TransformHints;
use crate::index::{ravel_horner, unravel_index};
use crate::shape::{element_count_eq, enforce};
use tenrso_expr::Expr;
use tenrso_graph::{format_shape, GraphBuilder, Tag, TensorHandle};

/// View `a` with shape `newshape`, keeping row-major element order.
///
/// Output coordinate `out` reads `a(unravel(ravel(out, newshape), shape(a)))`.
/// Default tag: [`Tag::Injective`].
///
/// # Errors
///
/// [`TransformError::ShapeMismatch`](crate::TransformError::ShapeMismatch)
/// when the element counts provably differ, or cannot be shown equal and
/// `hints.strict_shapes` is set.
///
/// # Examples
///
/// ```
/// use tenrso_graph::{const_shape, ComputeGraph, GraphBuilder};
/// use tenrso_transform::{reshape, TransformHints};
///
/// let graph = ComputeGraph::new();
/// let a = graph.placeholder(&const_shape(&[2, 3]), "a").unwrap();
/// let r = reshape(&graph, &TransformHints::default(), &a, &const_shape(&[3, 2])).unwrap();
/// assert_eq!(r.const_shape(), Some(vec![3, 2]));
/// ```
pub fn reshape<G: GraphBuilder + ?Sized>(
    graph: &G,
    hints: &TransformHints,
    a: &TensorHandle,
    newshape: &[Expr],
) -> TransformResult<TensorHandle> {
    enforce(
        element_count_eq(a.shape(), newshape),
        hints.strict_shapes,
        "reshape",
        format_shape(a.shape()),
        format_shape(newshape),
        "Element counts must match",
    )?;

    let tag = hints.tag_or(Tag::Injective);
    let src_shape = a.shape();
    let out = graph.compute(
        newshape,
        Some(hints.name_or("T_reshape")),
        Some(tag),
        &|idx: &[Expr]| {
            // The builder passes one index per output axis
            let flat = ravel_horner(idx, newshape);
            a.at(&unravel_index(&flat, src_shape))
        },
    )?;

    record_transform("reshape", std::slice::from_ref(a), &out, tag);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransformError;
    use crate::test_util::{ramp_input, shape_of};
    use tenrso_expr::Var;
    use tenrso_graph::{ComputeGraph, Evaluator};

    #[test]
    fn test_reshape_2x3_to_3x2() {
        let graph = ComputeGraph::new();
        let (a, data) = ramp_input(&graph, "a", &[2, 3]);
        let r = reshape(&graph, &TransformHints::default(), &a, &tenrso_graph::const_shape(&[3, 2]))
            .unwrap();
        assert_eq!(shape_of(&r), vec![3, 2]);

        let mut eval = Evaluator::new(&graph);
        eval.bind(&a, data).unwrap();
        // Flat index 5: (1, 2) in the source, (2, 1) in the result
        assert_eq!(
            eval.value_at(&r, &[2, 1]).unwrap(),
            eval.value_at(&a, &[1, 2]).unwrap()
        );
    }

    #[test]
    fn test_reshape_to_flat_and_scalar() {
        let graph = ComputeGraph::new();
        let (a, data) = ramp_input(&graph, "a", &[2, 2, 3]);
        let (s, sdata) = ramp_input(&graph, "s", &[1, 1]);
        let hints = TransformHints::default();

        let flat = reshape(&graph, &hints, &a, &tenrso_graph::const_shape(&[12])).unwrap();
        let scalar = reshape(&graph, &hints, &s, &[]).unwrap();

        let mut eval = Evaluator::new(&graph);
        eval.bind(&a, data.clone()).unwrap();
        eval.bind(&s, sdata).unwrap();

        let out = eval.materialize(&flat).unwrap();
        assert_eq!(out.as_slice().unwrap(), data.as_slice().unwrap());
        assert_eq!(eval.value_at(&scalar, &[]).unwrap(), 0.0);
    }

    #[test]
    fn test_reshape_count_mismatch() {
        let graph = ComputeGraph::new();
        let (a, _) = ramp_input(&graph, "a", &[2, 3]);
        let err = reshape(&graph, &TransformHints::default(), &a, &tenrso_graph::const_shape(&[4, 2]))
            .unwrap_err();
        match err {
            TransformError::ShapeMismatch {
                operation,
                expected,
                actual,
                ..
            } => {
                assert_eq!(operation, "reshape");
                assert_eq!(expected, "(2, 3)");
                assert_eq!(actual, "(4, 2)");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(graph.len(), 1);
    }

    #[test]
    fn test_reshape_symbolic() {
        let graph = ComputeGraph::new();
        let n = Var::new("n");
        let a = graph
            .placeholder(&[Expr::var(&n), Expr::int(6)], "a")
            .unwrap();
        let newshape = [Expr::var(&n) * 2, Expr::int(3)];
        let r = reshape(&graph, &TransformHints::default().with_strict_shapes(true), &a, &newshape)
            .unwrap();

        let mut eval = Evaluator::new(&graph);
        eval.bind_dim(&n, 2);
        let data = crate::test_util::ramp(&[2, 6]);
        eval.bind(&a, data.clone()).unwrap();

        let out = eval.materialize(&r).unwrap();
        assert_eq!(out.shape(), &[4, 3]);
        assert_eq!(out.as_slice().unwrap(), data.as_slice().unwrap());
    }

    #[test]
    fn test_reshape_undecidable_policy() {
        let graph = ComputeGraph::new();
        let n = Var::new("n");
        let m = Var::new("m");
        let a = graph.placeholder(&[Expr::var(&n)], "a").unwrap();
        let target = [Expr::var(&m)];

        let lenient = reshape(&graph, &TransformHints::default(), &a, &target);
        assert!(lenient.is_ok());

        let strict = reshape(
            &graph,
            &TransformHints::default().with_strict_shapes(true),
            &a,
            &target,
        );
        assert!(matches!(strict, Err(TransformError::ShapeMismatch { .. })));
    }
}
