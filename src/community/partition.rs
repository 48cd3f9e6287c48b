//! The live set of communities and the running objective.
//!
//! Communities are addressed by a dense slot index. Removing a community swaps the last
//! live community into its slot, so an index is only meaningful until the next removal;
//! callers should re-derive indices through the partition instead of holding them.

use crate::coagulate_error::Result;
use crate::community::cluster::Community;
use crate::community::error::PartitionError;
use crate::community::objective;
use crate::graph::{GraphStore, NodeId};
use hashbrown::{HashMap, HashSet};
use static_assertions::assert_impl_all;

assert_impl_all!(Community: Send, Sync);
assert_impl_all!(Partition: Send, Sync);

/// Tolerance used by [`Partition::validate`] for the modularity aggregate.
pub const AGGREGATE_TOLERANCE: f64 = 1e-9;

/// All current communities of one run plus the running objective terms.
#[derive(Debug, Clone)]
pub struct Partition {
    pub(crate) communities: Vec<Community>,
    pub(crate) modularity: f64,
    pub(crate) regularization: f64,
    total_nodes: u32,
    total_edges: u32,
}

impl Partition {
    /// One singleton community per graph node, in ascending node order.
    pub fn initialize<G: GraphStore>(graph: &G) -> Result<Self> {
        let communities = graph
            .nodes()
            .map(|node| Community::singleton(node, graph))
            .collect::<Result<Vec<_>>>()?;
        let mut partition = Partition {
            communities,
            modularity: 0.0,
            regularization: 0.0,
            total_nodes: graph.total_nodes(),
            total_edges: graph.total_edges(),
        };
        partition.recompute_aggregates();
        Ok(partition)
    }

    /// Start from singletons and merge each group into its first node.
    ///
    /// Nodes absent from every group stay singletons. Groups naming nodes outside the graph
    /// or naming a node twice are rejected.
    pub fn from_groups<G: GraphStore>(graph: &G, groups: &[Vec<NodeId>]) -> Result<Self> {
        let mut partition = Self::initialize(graph)?;
        let slot_of: HashMap<NodeId, usize> = partition
            .communities
            .iter()
            .enumerate()
            .map(|(slot, c)| (c.nodes()[0], slot))
            .collect();

        let mut seen: HashSet<NodeId> = HashSet::new();
        let mut absorbed = vec![false; partition.communities.len()];
        let mut live = partition.communities.len();
        for group in groups {
            for &node in group {
                if !slot_of.contains_key(&node) {
                    return Err(PartitionError::ForeignNode(node).into());
                }
                if !seen.insert(node) {
                    return Err(PartitionError::DuplicateNode(node).into());
                }
            }
            let Some((target, rest)) = group.split_first() else {
                continue;
            };
            let target = slot_of[target];
            for node in rest {
                let slot = slot_of[node];
                let source = std::mem::take(&mut partition.communities[slot]);
                partition.merge_detached(target, source, live);
                absorbed[slot] = true;
                live -= 1;
            }
        }

        let mut slot = 0;
        partition.communities.retain(|_| {
            let keep = !absorbed[slot];
            slot += 1;
            keep
        });
        partition.recompute_aggregates();
        Ok(partition)
    }

    /// Number of live communities.
    pub fn count(&self) -> usize {
        self.communities.len()
    }

    pub fn communities(&self) -> &[Community] {
        &self.communities
    }

    pub fn community(&self, index: usize) -> Option<&Community> {
        self.communities.get(index)
    }

    /// Sum of all communities' modularity terms.
    pub fn modularity(&self) -> f64 {
        self.modularity
    }

    pub fn regularization(&self) -> f64 {
        self.regularization
    }

    /// `modularity + regularization`, the value the control loop tracks.
    pub fn objective(&self) -> f64 {
        self.modularity + self.regularization
    }

    pub fn total_nodes(&self) -> u32 {
        self.total_nodes
    }

    pub fn total_edges(&self) -> u32 {
        self.total_edges
    }

    /// Merge the community at `source` into the one at `target`.
    ///
    /// Returns the slot the merged community occupies afterwards (it moves when `target`
    /// was the last slot).
    pub fn merge(&mut self, target: usize, source: usize) -> std::result::Result<usize, PartitionError> {
        let count = self.count();
        for index in [target, source] {
            if index >= count {
                return Err(PartitionError::IndexOutOfRange { index, count });
            }
        }
        if target == source {
            return Ok(target);
        }
        let absorbed = self.communities.swap_remove(source);
        let target = if target == self.communities.len() {
            source
        } else {
            target
        };
        self.merge_detached(target, absorbed, count);
        Ok(target)
    }

    /// Fold a community that is no longer in `communities` into `target`, updating both
    /// aggregates. `live` is the community count before the merge.
    pub(crate) fn merge_detached(&mut self, target: usize, source: Community, live: usize) {
        let into = &self.communities[target];
        let shared = into.shared_boundary_edges(&source).unwrap_or(0);
        self.regularization = objective::projected_regularization(
            into,
            &source,
            shared,
            self.regularization,
            live,
            self.total_nodes,
        );
        self.modularity -= into.modularity() + source.modularity();

        let into = &mut self.communities[target];
        into.absorb(source, self.total_edges);
        self.modularity += into.modularity();
    }

    /// Recompute both aggregates from the communities, returning the absolute change in the
    /// objective that the recomputation corrected.
    pub fn recompute_aggregates(&mut self) -> f64 {
        let before = self.objective();
        self.modularity = self.communities.iter().map(Community::modularity).sum();
        let density_sum: f64 = self.communities.iter().map(Community::density).sum();
        self.regularization = objective::regularization(density_sum, self.count(), self.total_nodes);
        (self.objective() - before).abs()
    }

    /// Map every node to the slot of the community holding it.
    pub fn assignment(&self) -> HashMap<NodeId, usize> {
        let mut map = HashMap::with_capacity(self.total_nodes as usize);
        for (slot, c) in self.communities.iter().enumerate() {
            for &node in c.nodes() {
                map.insert(node, slot);
            }
        }
        map
    }

    /// Check that communities partition the graph's node set exactly and that the running
    /// modularity matches the per-community sum.
    pub fn validate<G: GraphStore>(&self, graph: &G) -> std::result::Result<(), PartitionError> {
        let mut seen: HashSet<NodeId> = HashSet::with_capacity(graph.total_nodes() as usize);
        for c in &self.communities {
            for &node in c.nodes() {
                if !graph.contains(node) {
                    return Err(PartitionError::ForeignNode(node));
                }
                if !seen.insert(node) {
                    return Err(PartitionError::DuplicateNode(node));
                }
            }
        }
        if let Some(missing) = graph.nodes().find(|n| !seen.contains(n)) {
            return Err(PartitionError::MissingNode(missing));
        }
        let recomputed: f64 = self.communities.iter().map(Community::modularity).sum();
        if (recomputed - self.modularity).abs() > AGGREGATE_TOLERANCE {
            return Err(PartitionError::AggregateDrift {
                running: self.modularity,
                recomputed,
            });
        }
        Ok(())
    }
}
