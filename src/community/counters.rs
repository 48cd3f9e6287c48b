use crate::community::objective;
use crate::graph::{GraphStore, NodeId};
use hashbrown::HashMap;

/// Brute-force community counters for objective verification.
#[derive(Debug, Clone)]
pub struct CommunityCounters {
    pub m_edges: u32,
    pub size: Vec<usize>,
    pub vol: Vec<u64>,
    pub e_cc: Vec<u64>,
}

/// Compute counters for a graph and a node → community assignment, straight from the
/// raw adjacency.
pub fn compute_counters<G>(g: &G, assignment: &HashMap<NodeId, usize>) -> CommunityCounters
where
    G: GraphStore,
{
    let n_communities = assignment.values().max().map(|c| c + 1).unwrap_or(0);
    let mut size = vec![0usize; n_communities];
    let mut vol = vec![0u64; n_communities];
    let mut e_cc = vec![0u64; n_communities];

    for (&v, &cid) in assignment {
        size[cid] += 1;
        vol[cid] += g.degree(v) as u64;
    }
    for (u, v) in g.edges() {
        let cu = assignment[&u];
        if cu == assignment[&v] {
            e_cc[cu] += 1;
        }
    }

    CommunityCounters {
        m_edges: g.total_edges(),
        size,
        vol,
        e_cc,
    }
}

impl CommunityCounters {
    /// `Σ_c e_c/M - (vol_c / 2M)^2`.
    pub fn modularity(&self) -> f64 {
        self.e_cc
            .iter()
            .zip(&self.vol)
            .map(|(&e, &vol)| objective::modularity(e, vol - e, self.m_edges))
            .sum()
    }

    /// `R(n)` from densities computed on the raw graph.
    pub fn regularization(&self, total_nodes: u32) -> f64 {
        let sum: f64 = self
            .size
            .iter()
            .zip(&self.e_cc)
            .map(|(&k, &e)| objective::density(k, e))
            .sum();
        objective::regularization(sum, self.size.len(), total_nodes)
    }
}
