//! Graph Store: the immutable undirected adjacency structure the optimizer reads.
//!
//! The optimizer only ever talks to a [`GraphStore`]; [`AdjacencyGraph`] is the in-memory
//! implementation built from an edge list (see [`edge_list`]).

pub mod adjacency;
pub mod edge;
pub mod edge_list;

pub use adjacency::AdjacencyGraph;
pub use edge::Edge;

/// Node identifier. Identity is exactly the id.
pub type NodeId = u32;

/// Read-only view of an undirected graph.
///
/// All methods are read-only and thread-safe; candidate scoring reads the graph from
/// several rayon workers at once.
pub trait GraphStore: Sync {
    /// Iterator over node ids.
    type NodeIter<'a>: Iterator<Item = NodeId> + 'a
    where
        Self: 'a;
    /// Iterator over the neighbors of one node.
    type NeighIter<'a>: Iterator<Item = NodeId> + 'a
    where
        Self: 'a;

    /// Number of distinct nodes.
    fn total_nodes(&self) -> u32;

    /// Number of edges as read from the input (not doubled).
    fn total_edges(&self) -> u32;

    /// All node ids in ascending order.
    fn nodes(&self) -> Self::NodeIter<'_>;

    /// Neighbors of `v`; empty for unknown nodes.
    fn neighbors_of(&self, v: NodeId) -> Self::NeighIter<'_>;

    /// Whether `v` is a node of this graph.
    fn contains(&self, v: NodeId) -> bool;

    /// Number of distinct neighbors of `v`.
    fn degree(&self, v: NodeId) -> usize {
        self.neighbors_of(v).count()
    }

    /// All distinct undirected edges `(u, v)` with `u < v`.
    fn edges(&self) -> impl Iterator<Item = (NodeId, NodeId)> + '_ {
        self.nodes().flat_map(move |u| {
            self.neighbors_of(u)
                .filter(move |&v| u < v)
                .map(move |v| (u, v))
        })
    }
}
