//! Greedy merge step.
//!
//! [`coagulate`] scores every other live community against one target, picks the best
//! positive objective change and applies it. Scoring is a read-only burst: below
//! [`CoagulateOptions::parallel_min_candidates`] it runs on the calling thread, above it the
//! candidates are chunked across a rayon scope and each worker pushes `(slot, gain)` results
//! into a channel sized to the candidate count, so no producer ever blocks. The caller drains
//! exactly one result per candidate before the single mutation happens on its own thread.

use crate::community::error::PartitionError;
use crate::community::objective::{ScoreContext, merge_gain};
use crate::community::partition::Partition;
use std::sync::mpsc;

/// Tunables for one [`coagulate`] call.
#[derive(Debug, Clone, Copy)]
pub struct CoagulateOptions {
    /// Only score candidates that share at least one edge with the target.
    pub require_adjacency: bool,
    /// Candidate count at which scoring fans out to rayon workers.
    pub parallel_min_candidates: usize,
}

impl Default for CoagulateOptions {
    fn default() -> Self {
        Self {
            require_adjacency: true,
            parallel_min_candidates: 256,
        }
    }
}

/// Result of one greedy step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CoagulateOutcome {
    /// A candidate was merged into the target.
    Merged {
        /// Slot of the merged community after the swap-remove.
        slot: usize,
        /// Objective change that was applied.
        gain: f64,
    },
    /// No candidate improves the objective; the partition is untouched.
    NoGain,
}

impl CoagulateOutcome {
    pub fn merged(&self) -> bool {
        matches!(self, CoagulateOutcome::Merged { .. })
    }
}

/// Best `(slot, gain)` for merging into the community at `target`, positive gains only.
///
/// Ties resolve to the lowest slot so the choice does not depend on worker scheduling.
pub fn best_candidate(
    partition: &Partition,
    target: usize,
    opts: &CoagulateOptions,
) -> Result<Option<(usize, f64)>, PartitionError> {
    let count = partition.count();
    if target >= count {
        return Err(PartitionError::IndexOutOfRange {
            index: target,
            count,
        });
    }
    let candidates = count - 1;
    if candidates == 0 {
        return Ok(None);
    }

    let ctx = ScoreContext {
        total_edges: partition.total_edges(),
        total_nodes: partition.total_nodes(),
        communities: count,
        regularization: partition.regularization(),
        require_adjacency: opts.require_adjacency,
    };
    let communities = partition.communities();
    let anchor = &communities[target];
    let mut best: Option<(usize, f64)> = None;
    let mut keep = |slot: usize, gain: Option<f64>| {
        let Some(gain) = gain else { return };
        if gain <= 0.0 {
            return;
        }
        if best.is_none_or(|(best_slot, best_gain)| {
            gain > best_gain || (gain == best_gain && slot < best_slot)
        }) {
            best = Some((slot, gain));
        }
    };

    if candidates < opts.parallel_min_candidates {
        for (slot, other) in communities.iter().enumerate() {
            if slot != target {
                keep(slot, merge_gain(anchor, other, &ctx));
            }
        }
        return Ok(best);
    }

    let slots: Vec<usize> = (0..count).filter(|&slot| slot != target).collect();
    let chunk = (candidates / (rayon::current_num_threads() * 4)).max(1);
    let (tx, rx) = mpsc::sync_channel::<(usize, Option<f64>)>(candidates);
    rayon::scope(|s| {
        for block in slots.chunks(chunk) {
            let tx = tx.clone();
            let ctx = &ctx;
            s.spawn(move |_| {
                for &slot in block {
                    // receiver outlives the scope
                    let _ = tx.send((slot, merge_gain(anchor, &communities[slot], ctx)));
                }
            });
        }
    });
    drop(tx);

    let mut received = 0usize;
    for (slot, gain) in rx.iter() {
        received += 1;
        keep(slot, gain);
    }
    if received != candidates {
        return Err(PartitionError::IncompleteScoring {
            expected: candidates,
            received,
        });
    }
    Ok(best)
}

/// One greedy step on the community at `target`.
///
/// Merges the best-scoring candidate into it when that raises
/// `modularity + regularization`; otherwise leaves the partition untouched.
pub fn coagulate(
    partition: &mut Partition,
    target: usize,
    opts: &CoagulateOptions,
) -> Result<CoagulateOutcome, PartitionError> {
    let Some((source, gain)) = best_candidate(partition, target, opts)? else {
        return Ok(CoagulateOutcome::NoGain);
    };
    let slot = partition.merge(target, source)?;
    log::trace!("merged slot {source} into {target} (gain {gain:.3e}), {} left", partition.count());
    Ok(CoagulateOutcome::Merged { slot, gain })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::AdjacencyGraph;

    fn run_to_fixpoint(p: &mut Partition, opts: &CoagulateOptions) {
        loop {
            let mut merged = false;
            let mut i = 0;
            while i < p.count() {
                if coagulate(p, i, opts).unwrap().merged() {
                    merged = true;
                }
                i += 1;
            }
            if !merged {
                break;
            }
        }
    }

    #[test]
    fn path_reaches_local_optimum() {
        let g = AdjacencyGraph::from_edges(&[(1, 2), (2, 3), (3, 4)]);
        let mut p = Partition::initialize(&g).unwrap();
        let opts = CoagulateOptions::default();
        let start = p.objective();
        run_to_fixpoint(&mut p, &opts);
        assert!(p.count() <= 4);
        assert!(p.objective() >= start);
        for i in 0..p.count() {
            assert_eq!(best_candidate(&p, i, &opts).unwrap(), None);
        }
        p.validate(&g).unwrap();
    }

    #[test]
    fn two_triangles_split_at_bridge() {
        let g = AdjacencyGraph::from_edges(&[
            (0, 1),
            (1, 2),
            (0, 2),
            (3, 4),
            (4, 5),
            (3, 5),
            (2, 3),
        ]);
        let mut p = Partition::initialize(&g).unwrap();
        run_to_fixpoint(&mut p, &CoagulateOptions::default());
        let a = p.assignment();
        assert_eq!(a[&0], a[&1]);
        assert_eq!(a[&1], a[&2]);
        assert_eq!(a[&3], a[&4]);
        assert_eq!(a[&4], a[&5]);
        assert_ne!(a[&0], a[&5]);
    }

    #[test]
    fn parallel_and_sequential_agree() {
        let mut edges = Vec::new();
        for u in 0..40u32 {
            edges.push((u, (u + 1) % 40));
            edges.push((u, (u * 7 + 3) % 40));
        }
        edges.retain(|(a, b)| a != b);
        let g = AdjacencyGraph::from_edges(&edges);
        let p = Partition::initialize(&g).unwrap();
        let seq = CoagulateOptions {
            parallel_min_candidates: usize::MAX,
            ..Default::default()
        };
        let par = CoagulateOptions {
            parallel_min_candidates: 1,
            ..Default::default()
        };
        for i in 0..p.count() {
            assert_eq!(
                best_candidate(&p, i, &seq).unwrap(),
                best_candidate(&p, i, &par).unwrap()
            );
        }
    }

    #[test]
    fn no_op_leaves_partition_unchanged() {
        // two components: the groups share no edge
        let g = AdjacencyGraph::from_edges(&[(1, 2), (3, 4)]);
        let mut p = Partition::from_groups(&g, &[vec![1, 2], vec![3, 4]]).unwrap();
        let before: Vec<Vec<u32>> = p.communities().iter().map(|c| c.nodes().to_vec()).collect();
        let outcome = coagulate(&mut p, 0, &CoagulateOptions::default()).unwrap();
        assert_eq!(outcome, CoagulateOutcome::NoGain);
        let after: Vec<Vec<u32>> = p.communities().iter().map(|c| c.nodes().to_vec()).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn single_community_is_no_op() {
        let g = AdjacencyGraph::from_edges(&[(1, 2)]);
        let mut p = Partition::from_groups(&g, &[vec![1, 2]]).unwrap();
        assert_eq!(
            coagulate(&mut p, 0, &CoagulateOptions::default()).unwrap(),
            CoagulateOutcome::NoGain
        );
    }

    #[test]
    fn out_of_range_target() {
        let g = AdjacencyGraph::from_edges(&[(1, 2)]);
        let mut p = Partition::initialize(&g).unwrap();
        assert!(coagulate(&mut p, 5, &CoagulateOptions::default()).is_err());
    }
}
