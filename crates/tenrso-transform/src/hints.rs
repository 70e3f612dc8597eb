//! Per-call configuration of the coordinate mapper

use tenrso_graph::Tag;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Hints applied to every node a transform builds
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TransformHints {
    /// Base name of the produced tensor (split outputs append `s{i}`)
    pub name: Option<String>,
    /// Scheduling tag overriding the operator's default
    pub tag: Option<Tag>,
    /// Reject shape checks that cannot be decided symbolically
    pub strict_shapes: bool,
}

impl TransformHints {
    /// Create hints with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the output name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Override the scheduling tag
    pub fn with_tag(mut self, tag: Tag) -> Self {
        self.tag = Some(tag);
        self
    }

    /// Set strict shape checking
    pub fn with_strict_shapes(mut self, strict: bool) -> Self {
        self.strict_shapes = strict;
        self
    }

    /// Tag to attach, falling back to the operator default
    pub fn tag_or(&self, default: Tag) -> Tag {
        self.tag.unwrap_or(default)
    }

    /// Name to request from the builder
    pub(crate) fn name_or<'a>(&'a self, default: &'a str) -> &'a str {
        self.name.as_deref().unwrap_or(default)
    }
}
