//! In-memory adjacency structure.

use crate::graph::{GraphStore, NodeId};
use hashbrown::HashMap;

/// Immutable undirected graph built once from an edge list.
///
/// Neighbor lists are sorted and deduplicated, so re-inserting an edge is a no-op for the
/// adjacency. `total_edges` counts every inserted pair, duplicates included.
#[derive(Debug, Clone, Default)]
pub struct AdjacencyGraph {
    ids: Vec<NodeId>,
    adj: HashMap<NodeId, Vec<NodeId>>,
    total_edges: u32,
}

impl AdjacencyGraph {
    /// Build from `(from, to)` pairs; each pair is inserted in both directions.
    pub fn from_edges(pairs: &[(NodeId, NodeId)]) -> Self {
        let mut builder = AdjacencyBuilder::default();
        for &(from, to) in pairs {
            builder.add_edge(from, to);
        }
        builder.build()
    }
}

/// Incremental builder used by the edge-list reader.
#[derive(Debug, Default)]
pub(crate) struct AdjacencyBuilder {
    adj: HashMap<NodeId, Vec<NodeId>>,
    pairs: u32,
}

impl AdjacencyBuilder {
    pub(crate) fn add_edge(&mut self, from: NodeId, to: NodeId) {
        self.adj.entry(to).or_default().push(from);
        self.adj.entry(from).or_default().push(to);
        self.pairs = self.pairs.saturating_add(1);
    }

    pub(crate) fn build(self) -> AdjacencyGraph {
        let mut adj = self.adj;
        for ns in adj.values_mut() {
            ns.sort_unstable();
            ns.dedup();
        }
        let mut ids: Vec<NodeId> = adj.keys().copied().collect();
        ids.sort_unstable();
        AdjacencyGraph {
            ids,
            adj,
            total_edges: self.pairs,
        }
    }
}

impl GraphStore for AdjacencyGraph {
    type NodeIter<'a> = std::iter::Copied<std::slice::Iter<'a, NodeId>>;
    type NeighIter<'a> = std::iter::Copied<std::slice::Iter<'a, NodeId>>;

    fn total_nodes(&self) -> u32 {
        self.ids.len() as u32
    }

    fn total_edges(&self) -> u32 {
        self.total_edges
    }

    fn nodes(&self) -> Self::NodeIter<'_> {
        self.ids.iter().copied()
    }

    fn neighbors_of(&self, v: NodeId) -> Self::NeighIter<'_> {
        self.adj
            .get(&v)
            .map(|ns| ns.as_slice())
            .unwrap_or(&[])
            .iter()
            .copied()
    }

    fn contains(&self, v: NodeId) -> bool {
        self.adj.contains_key(&v)
    }

    fn degree(&self, v: NodeId) -> usize {
        self.adj.get(&v).map_or(0, |ns| ns.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_directions_and_dedup() {
        let g = AdjacencyGraph::from_edges(&[(1, 2), (2, 1), (2, 3)]);
        assert_eq!(g.total_nodes(), 3);
        // pairs are counted as read
        assert_eq!(g.total_edges(), 3);
        assert_eq!(g.neighbors_of(2).collect::<Vec<_>>(), vec![1, 3]);
        assert_eq!(g.neighbors_of(1).collect::<Vec<_>>(), vec![2]);
        assert!(g.contains(3));
        assert!(!g.contains(4));
    }

    #[test]
    fn nodes_ascending() {
        let g = AdjacencyGraph::from_edges(&[(10, 4), (7, 1)]);
        assert_eq!(g.nodes().collect::<Vec<_>>(), vec![1, 4, 7, 10]);
    }
}
