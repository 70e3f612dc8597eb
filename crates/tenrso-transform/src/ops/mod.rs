//! The five coordinate-mapping operators.
//!
//! Each operator validates its arguments completely, then calls the graph
//! builder once per produced tensor. Nothing is built when validation fails.

pub mod concatenate;
pub mod expand_dims;
pub mod reshape;
pub mod split;
pub mod transpose;

pub use concatenate::concatenate;
pub use expand_dims::expand_dims;
pub use reshape::reshape;
pub use split::{split, SplitSpec};
pub use transpose::transpose;

use tenrso_graph::{format_shape, Tag, TensorHandle};

/// Emit the per-operator debug event
pub(crate) fn record_transform(
    operation: &str,
    inputs: &[TensorHandle],
    output: &TensorHandle,
    tag: Tag,
) {
    let input_shapes: Vec<String> = inputs.iter().map(|t| format_shape(t.shape())).collect();
    tracing::debug!(
        operation = operation,
        inputs = %input_shapes.join(" "),
        output = %output,
        tag = %tag,
        "transform_built"
    );
}
