//! Canonical undirected edge.

use crate::coagulate_error::{CoagulateError, Result};
use crate::graph::NodeId;

/// An unordered pair of distinct nodes, stored smaller id first so that
/// `(a, b)` and `(b, a)` compare and hash identically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Edge {
    lo: NodeId,
    hi: NodeId,
}

impl Edge {
    /// Canonical edge between `a` and `b`.
    ///
    /// # Errors
    /// [`CoagulateError::SelfLoop`] when `a == b`.
    #[inline]
    pub fn new(a: NodeId, b: NodeId) -> Result<Self> {
        match a.cmp(&b) {
            std::cmp::Ordering::Less => Ok(Edge { lo: a, hi: b }),
            std::cmp::Ordering::Greater => Ok(Edge { lo: b, hi: a }),
            std::cmp::Ordering::Equal => Err(CoagulateError::SelfLoop(a)),
        }
    }

    /// Endpoints, smaller first.
    #[inline]
    pub fn endpoints(&self) -> (NodeId, NodeId) {
        (self.lo, self.hi)
    }
}
