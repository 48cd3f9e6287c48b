//! A single community and its cached boundary state.
//!
//! Boundary nodes and edges are kept incrementally so that merging two communities costs
//! time proportional to their boundaries rather than to the graph.

use crate::coagulate_error::Result;
use crate::community::objective;
use crate::graph::{Edge, GraphStore, NodeId};
use hashbrown::HashSet;

/// A mutable cluster of nodes owned by exactly one [`Partition`](super::Partition).
#[derive(Debug, Clone, Default)]
pub struct Community {
    /// Member node ids in insertion order.
    nodes: Vec<NodeId>,
    /// Nodes adjacent to this community but not members of it.
    boundary_nodes: HashSet<NodeId>,
    /// Edges with exactly one endpoint inside.
    boundary_edges: HashSet<Edge>,
    /// Edges with both endpoints inside.
    internal_edges: u64,
    /// `internal_edges` plus boundary edges, as used by the modularity formula.
    total_incident: u64,
    density: f64,
    modularity: f64,
}

impl Community {
    /// Build a one-node community for `node`.
    ///
    /// Its boundary is exactly the node's neighborhood. This is the only way communities
    /// are (re)seeded, both at initialization and when a split dissolves a community.
    ///
    /// # Errors
    /// [`CoagulateError::SelfLoop`](crate::coagulate_error::CoagulateError::SelfLoop) if the
    /// graph lists `node` as its own neighbor.
    pub fn singleton<G: GraphStore>(node: NodeId, graph: &G) -> Result<Self> {
        let mut boundary_nodes = HashSet::new();
        let mut boundary_edges = HashSet::new();
        for to in graph.neighbors_of(node) {
            boundary_edges.insert(Edge::new(to, node)?);
            boundary_nodes.insert(to);
        }
        let total_incident = boundary_edges.len() as u64;
        Ok(Community {
            nodes: vec![node],
            boundary_nodes,
            boundary_edges,
            internal_edges: 0,
            total_incident,
            density: objective::density(1, 0),
            modularity: objective::modularity(0, total_incident, graph.total_edges()),
        })
    }

    /// Member node ids; the first one is the community's representative.
    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn boundary_nodes(&self) -> &HashSet<NodeId> {
        &self.boundary_nodes
    }

    pub fn boundary_edges(&self) -> &HashSet<Edge> {
        &self.boundary_edges
    }

    pub fn internal_edges(&self) -> u64 {
        self.internal_edges
    }

    pub fn total_incident(&self) -> u64 {
        self.total_incident
    }

    pub fn density(&self) -> f64 {
        self.density
    }

    pub fn modularity(&self) -> f64 {
        self.modularity
    }

    /// Number of edges that are boundary to both `self` and `other`.
    ///
    /// Returns `None` when the two communities are not adjacent (no member of `other` lies
    /// on `self`'s boundary), which is the zero-gain fast path for scoring.
    pub fn shared_boundary_edges(&self, other: &Community) -> Option<u64> {
        if !other.nodes.iter().any(|n| self.boundary_nodes.contains(n)) {
            return None;
        }
        let (small, large) = if self.boundary_edges.len() <= other.boundary_edges.len() {
            (&self.boundary_edges, &other.boundary_edges)
        } else {
            (&other.boundary_edges, &self.boundary_edges)
        };
        Some(small.iter().filter(|e| large.contains(*e)).count() as u64)
    }

    /// Absorb `source` into `self`.
    ///
    /// Returns the number of edges that moved from the two boundaries to the interior.
    pub fn absorb(&mut self, mut source: Community, total_edges: u32) -> u64 {
        for node in &source.nodes {
            self.boundary_nodes.remove(node);
        }
        for node in &self.nodes {
            source.boundary_nodes.remove(node);
        }
        self.nodes.append(&mut source.nodes);
        self.boundary_nodes.extend(source.boundary_nodes);

        let mut shared = 0u64;
        for edge in source.boundary_edges {
            if self.boundary_edges.remove(&edge) {
                shared += 1;
            } else {
                self.boundary_edges.insert(edge);
            }
        }

        self.internal_edges += source.internal_edges + shared;
        self.total_incident = (self.total_incident + source.total_incident).saturating_sub(shared);
        self.refresh(total_edges);
        shared
    }

    fn refresh(&mut self, total_edges: u32) {
        self.density = objective::density(self.nodes.len(), self.internal_edges);
        self.modularity = objective::modularity(self.internal_edges, self.total_incident, total_edges);
    }
}
