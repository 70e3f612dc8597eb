//! Splitting along an axis into contiguous segments

use super::record_transform;
use crate::error::{TransformError, TransformResult};
use crate::hints::TransformHints;
use crate::shape::normalize_axis;
use std::fmt;
use std::str::FromStr;
use tenrso_expr::Expr;
use tenrso_graph::{GraphBuilder, Shape, Tag, TensorHandle};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How to cut the split axis
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum SplitSpec {
    /// `n` equal segments
    Sections(usize),
    /// Begin offsets of every segment after the first
    Indices(Vec<i64>),
}

impl From<usize> for SplitSpec {
    fn from(n: usize) -> Self {
        SplitSpec::Sections(n)
    }
}

impl From<Vec<i64>> for SplitSpec {
    fn from(boundaries: Vec<i64>) -> Self {
        SplitSpec::Indices(boundaries)
    }
}

impl From<&[i64]> for SplitSpec {
    fn from(boundaries: &[i64]) -> Self {
        SplitSpec::Indices(boundaries.to_vec())
    }
}

impl fmt::Display for SplitSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SplitSpec::Sections(n) => write!(f, "{}", n),
            SplitSpec::Indices(b) => {
                let parts: Vec<String> = b.iter().map(|v| v.to_string()).collect();
                write!(f, "[{}]", parts.join(", "))
            }
        }
    }
}

/// Parses a section count (`"3"`) or a boundary list (`"[2, 5]"`, `"(2, 5)"`).
impl FromStr for SplitSpec {
    type Err = TransformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unsupported = || TransformError::UnsupportedSpec {
            spec: s.to_string(),
        };
        let text = s.trim();

        let inner = text
            .strip_prefix('[')
            .and_then(|t| t.strip_suffix(']'))
            .or_else(|| text.strip_prefix('(').and_then(|t| t.strip_suffix(')')));

        match inner {
            Some(list) => {
                let list = list.trim().trim_end_matches(',');
                if list.trim().is_empty() {
                    return Ok(SplitSpec::Indices(Vec::new()));
                }
                list.split(',')
                    .map(|part| part.trim().parse::<i64>().map_err(|_| unsupported()))
                    .collect::<Result<Vec<_>, _>>()
                    .map(SplitSpec::Indices)
            }
            None => text
                .parse::<usize>()
                .map(SplitSpec::Sections)
                .map_err(|_| unsupported()),
        }
    }
}

impl SplitSpec {
    /// Begin offset of every segment along an axis of `size` elements
    fn begins(&self, size: i64) -> TransformResult<Vec<i64>> {
        match self {
            SplitSpec::Sections(0) => Err(TransformError::invalid_argument(
                "split",
                "number of sections must be positive",
            )),
            SplitSpec::Sections(n) => {
                let indivisible = || TransformError::IndivisibleSplit { size, sections: *n };
                // More sections than elements can never divide a non-empty axis
                let n_i = i64::try_from(*n).map_err(|_| indivisible())?;
                if (size > 0 && n_i > size) || size % n_i != 0 {
                    return Err(indivisible());
                }
                let seg = size / n_i;
                Ok((0..n_i).map(|i| i * seg).collect())
            }
            SplitSpec::Indices(boundaries) => {
                if boundaries.windows(2).any(|w| w[0] >= w[1]) {
                    return Err(TransformError::UnsortedBoundaries {
                        boundaries: boundaries.clone(),
                    });
                }
                if let Some(&b) = boundaries.iter().find(|&&b| b < 0 || b > size) {
                    return Err(TransformError::BoundaryOutOfRange { boundary: b, size });
                }
                let mut begins = Vec::with_capacity(boundaries.len() + 1);
                begins.push(0);
                begins.extend_from_slice(boundaries);
                Ok(begins)
            }
        }
    }
}

/// Split `ary` along `axis` into contiguous segments.
///
/// Output `i` has the shape of `ary` with the split axis replaced by the
/// segment length, and reads `ary` with `begin[i]` added to the split-axis
/// coordinate. The axis size must be a constant.
///
/// Outputs are named `s0, s1, ...`, prefixed by `hints.name` when set.
/// Default tag: [`Tag::Injective`].
///
/// # Errors
///
/// - [`TransformError::InvalidAxis`] if `axis` is out of range
/// - [`TransformError::NonConstantDim`] if the axis size is symbolic
/// - [`TransformError::InvalidArgument`] for zero sections
/// - [`TransformError::IndivisibleSplit`] if the sections do not divide the axis
/// - [`TransformError::UnsortedBoundaries`] if boundaries are not strictly increasing
/// - [`TransformError::BoundaryOutOfRange`] if a boundary lies outside `[0, size]`
///
/// # Examples
///
/// ```
/// use tenrso_graph::{const_shape, ComputeGraph, GraphBuilder};
/// use tenrso_transform::{split, SplitSpec, TransformHints};
///
/// let graph = ComputeGraph::new();
/// let a = graph.placeholder(&const_shape(&[3, 12]), "a").unwrap();
/// let parts = split(&graph, &TransformHints::default(), &a, &SplitSpec::Sections(3), 1).unwrap();
/// assert_eq!(parts.len(), 3);
/// assert_eq!(parts[2].const_shape(), Some(vec![3, 4]));
/// ```
pub fn split<G: GraphBuilder + ?Sized>(
    graph: &G,
    hints: &TransformHints,
    ary: &TensorHandle,
    spec: &SplitSpec,
    axis: isize,
) -> TransformResult<Vec<TensorHandle>> {
    let axis = normalize_axis("split", axis, ary.rank())?;
    let size = ary.shape()[axis]
        .as_const()
        .ok_or_else(|| TransformError::non_constant_dim("split", axis, ary.shape()[axis].to_string()))?;
    let begins = spec.begins(size)?;

    let tag = hints.tag_or(Tag::Injective);
    let mut outputs = Vec::with_capacity(begins.len());
    for (i, &begin) in begins.iter().enumerate() {
        let end = begins.get(i + 1).copied().unwrap_or(size);
        let mut out_shape: Shape = ary.shape().iter().cloned().collect();
        out_shape[axis] = Expr::int(end - begin);

        let name = match &hints.name {
            Some(prefix) => format!("{}_s{}", prefix, i),
            None => format!("s{}", i),
        };
        let out = graph.compute(&out_shape, Some(&name), Some(tag), &|idx: &[Expr]| {
            let mut src = idx.to_vec();
            src[axis] = &idx[axis] + begin;
            ary.at(&src)
        })?;
        record_transform("split", std::slice::from_ref(ary), &out, tag);
        outputs.push(out);
    }
    Ok(outputs)
}
