//! Scheduling-hint tags attached to compute nodes.
//!
//! Tags are opaque to the operators that produce them; a scheduler uses them
//! to pick a lowering strategy (e.g. fusing injective chains).

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Pattern class of a compute node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Tag {
    /// One-to-one elementwise map
    Elemwise,
    /// Reads inputs with some axes broadcast (size-1 or inserted)
    Broadcast,
    /// Each output reads a distinct input element (reshape, transpose, ...)
    Injective,
    /// Commutative reduction
    CommReduce,
    /// Commutative reduction returning an index
    CommReduceIdx,
    /// No pattern information
    Opaque,
}

impl Tag {
    /// Canonical string name
    pub fn as_str(self) -> &'static str {
        match self {
            Tag::Elemwise => "elemwise",
            Tag::Broadcast => "broadcast",
            Tag::Injective => "injective",
            Tag::CommReduce => "comm_reduce",
            Tag::CommReduceIdx => "comm_reduce_idx",
            Tag::Opaque => "opaque",
        }
    }

    /// Elementwise and broadcast patterns are special cases of injective
    pub fn is_injective(self) -> bool {
        matches!(self, Tag::Elemwise | Tag::Broadcast | Tag::Injective)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown tag name
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown tag '{0}'")]
pub struct ParseTagError(pub String);

impl FromStr for Tag {
    type Err = ParseTagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "elemwise" => Ok(Tag::Elemwise),
            "broadcast" => Ok(Tag::Broadcast),
            "injective" => Ok(Tag::Injective),
            "comm_reduce" => Ok(Tag::CommReduce),
            "comm_reduce_idx" => Ok(Tag::CommReduceIdx),
            "opaque" => Ok(Tag::Opaque),
            other => Err(ParseTagError(other.to_string())),
        }
    }
}
