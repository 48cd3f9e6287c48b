//! Partition invariant errors

use thiserror::Error;

/// Errors reported by [`Partition::validate`](super::Partition::validate).
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PartitionError {
    /// A graph node is not a member of any community.
    #[error("node {0} is not covered by any community")]
    MissingNode(u32),
    /// A node appears in more than one community (or twice in one).
    #[error("node {0} appears in more than one community")]
    DuplicateNode(u32),
    /// A community holds a node the graph does not contain.
    #[error("community member {0} is not a graph node")]
    ForeignNode(u32),
    /// A community slot index was out of range.
    #[error("community index {index} out of range (count = {count})")]
    IndexOutOfRange { index: usize, count: usize },
    /// Parallel scoring returned fewer results than candidates were dispatched.
    #[error("candidate scoring returned {received} of {expected} results")]
    IncompleteScoring { expected: usize, received: usize },
    /// The running modularity total disagrees with the per-community sum.
    #[error("modularity aggregate drifted: running {running}, recomputed {recomputed}")]
    AggregateDrift { running: f64, recomputed: f64 },
}
