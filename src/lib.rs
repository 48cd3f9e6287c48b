#![cfg_attr(docsrs, feature(doc_cfg))]
//! # coagulate
//!
//! coagulate detects communities in large static undirected graphs by greedily maximizing
//! modularity plus a density regularization term. It grows communities by repeated
//! best-merge steps, dissolves weak communities when the search stalls, and checkpoints the
//! partition to disk so long runs can be resumed.
//!
//! ## Features
//! - Incremental boundary bookkeeping: merges cost time proportional to the two
//!   communities' boundaries, not to the graph
//! - Parallel candidate scoring with rayon; all mutation stays on the owning thread
//! - Resumable plain-text checkpoints
//! - A control loop with stall detection, periodic writes and graceful shutdown
//!
//! ## Determinism
//!
//! Split sampling and index jumps draw from a `SmallRng` seeded from
//! [`CoagulateConfig::rng_seed`](config::CoagulateConfig::rng_seed) when set. Candidate
//! scoring breaks ties by slot, so parallel and sequential scoring choose the same merge.
//!
//! ## Usage
//!
//! ```no_run
//! use coagulate::prelude::*;
//! use std::sync::Arc;
//! use std::sync::atomic::AtomicBool;
//!
//! # fn main() -> coagulate::coagulate_error::Result<()> {
//! let graph = AdjacencyGraph::read_edge_list("edges.txt")?;
//! let partition = load_or_initialize("communities.txt", &graph)?;
//! let config = CoagulateConfig { max_steps: Some(10_000), ..Default::default() };
//! let shutdown = Arc::new(AtomicBool::new(false));
//! let summary = ControlLoop::new(&graph, partition, config, "communities.txt", shutdown)?.run()?;
//! println!("{} communities, Q = {}", summary.communities, summary.objective);
//! # Ok(())
//! # }
//! ```

pub mod checkpoint;
pub mod coagulate_error;
pub mod community;
pub mod config;
pub mod control;
pub mod graph;

/// A convenient prelude to import the most-used traits & types:
pub mod prelude {
    pub use crate::checkpoint::{Checkpoint, load_or_initialize, read_checkpoint, write_checkpoint};
    pub use crate::coagulate_error::{CoagulateError, Result};
    pub use crate::community::{
        CoagulateOptions, CoagulateOutcome, Community, Partition, PartitionError, coagulate,
        pick_split_target,
    };
    pub use crate::config::CoagulateConfig;
    pub use crate::control::{ControlLoop, RunSummary, StopReason};
    pub use crate::graph::{AdjacencyGraph, Edge, GraphStore, NodeId};
}
