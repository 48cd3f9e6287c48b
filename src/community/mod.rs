//! Community detection by greedy merging with split-based escapes.
//!
//! A [`Partition`] starts as one singleton [`Community`] per node. [`coagulate`] merges the
//! best-scoring community into a chosen one whenever that raises
//! `modularity + regularization`; [`Partition::split`] dissolves a community again when the
//! search stalls. See [`objective`] for the formulas.

pub mod cluster;
pub mod greedy;
pub mod counters;
pub mod error;
pub mod objective;
pub mod partition;
pub mod split;

pub use cluster::Community;
pub use greedy::{CoagulateOptions, CoagulateOutcome, best_candidate, coagulate};
pub use error::PartitionError;
pub use partition::Partition;
pub use split::{pick_split_target, split_score};

#[cfg(test)]
mod tests;
