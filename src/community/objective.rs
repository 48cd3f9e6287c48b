//! Objective terms: per-community modularity, density and the density regularizer.
//!
//! ## Modularity
//!
//! Let `M` be the number of edges in the graph, `e_c` the number of edges with both
//! endpoints in community `c`, and `t_c` its incident-edge total (`e_c` plus the number of
//! boundary edges). Then `e_c + t_c` is the degree volume of `c` and the per-community term
//! of the standard decomposition is
//!
//! ```text
//! Q_c = e_c / M - 0.25 * ((e_c + t_c) / M)^2
//! ```
//!
//! ## Density and regularization
//!
//! `density_c = e_c / (k (k - 1) / 2)` for `k = |c| > 1`, and `1` for a singleton.
//! For a partition of `n` communities over `V` nodes the regularizer is
//!
//! ```text
//! R(n) = 0.5 * (Σ density / n - n / V)
//! ```
//!
//! It is maintained incrementally: `R` is inverted to recover `Σ density`, the two merging
//! densities are swapped for the merged one, and `R` is re-evaluated at `n - 1`.

use crate::community::cluster::Community;

/// Inputs that are fixed for the duration of one scoring burst.
#[derive(Debug, Clone, Copy)]
pub struct ScoreContext {
    /// Edge count `M` of the whole graph.
    pub total_edges: u32,
    /// Node count `V` of the whole graph.
    pub total_nodes: u32,
    /// Live community count `n` before the merge.
    pub communities: usize,
    /// Current regularization value.
    pub regularization: f64,
    /// Skip candidates that share no edge with the target.
    pub require_adjacency: bool,
}

/// Density of a community with `num_nodes` members and `internal_edges` internal edges.
#[inline]
pub fn density(num_nodes: usize, internal_edges: u64) -> f64 {
    if num_nodes <= 1 {
        return 1.0;
    }
    let k = num_nodes as f64;
    internal_edges as f64 / (0.5 * k * (k - 1.0))
}

/// Per-community modularity term.
#[inline]
pub fn modularity(internal_edges: u64, total_incident: u64, total_edges: u32) -> f64 {
    if total_edges == 0 {
        return 0.0;
    }
    let m = total_edges as f64;
    let volume = (internal_edges + total_incident) as f64 / m;
    internal_edges as f64 / m - 0.25 * volume * volume
}

/// `R(n)` from a density sum.
#[inline]
pub fn regularization(density_sum: f64, communities: usize, total_nodes: u32) -> f64 {
    if communities == 0 || total_nodes == 0 {
        return 0.0;
    }
    let n = communities as f64;
    0.5 * (density_sum / n - n / total_nodes as f64)
}

/// Inverse of [`regularization`]: recover `Σ density` for `n` communities.
#[inline]
pub fn density_sum(regularization: f64, communities: usize, total_nodes: u32) -> f64 {
    if communities == 0 || total_nodes == 0 {
        return 0.0;
    }
    let n = communities as f64;
    (2.0 * regularization + n / total_nodes as f64) * n
}

/// Modularity the union of `c1` and `c2` would have, given their shared boundary edges.
#[inline]
pub fn projected_modularity(c1: &Community, c2: &Community, shared: u64, total_edges: u32) -> f64 {
    let internal = c1.internal_edges() + c2.internal_edges() + shared;
    let incident = (c1.total_incident() + c2.total_incident()).saturating_sub(shared);
    modularity(internal, incident, total_edges)
}

/// Regularization after merging `c1` and `c2`, derived incrementally from `old`.
///
/// `communities` is the count before the merge. A merge that would leave no communities
/// yields `0`.
pub fn projected_regularization(
    c1: &Community,
    c2: &Community,
    shared: u64,
    old: f64,
    communities: usize,
    total_nodes: u32,
) -> f64 {
    if communities <= 1 {
        return 0.0;
    }
    let merged = density(
        c1.len() + c2.len(),
        c1.internal_edges() + c2.internal_edges() + shared,
    );
    let sum = density_sum(old, communities, total_nodes) - (c1.density() + c2.density()) + merged;
    regularization(sum, communities - 1, total_nodes)
}

/// Objective change from merging `c2` into `c1`.
///
/// Returns `None` for non-adjacent pairs when `ctx.require_adjacency` is set; such pairs
/// are never merge candidates.
pub fn merge_gain(c1: &Community, c2: &Community, ctx: &ScoreContext) -> Option<f64> {
    let shared = match c1.shared_boundary_edges(c2) {
        Some(shared) => shared,
        None if ctx.require_adjacency => return None,
        None => 0,
    };
    let modularity_gain = projected_modularity(c1, c2, shared, ctx.total_edges)
        - (c1.modularity() + c2.modularity());
    let regularization_gain = projected_regularization(
        c1,
        c2,
        shared,
        ctx.regularization,
        ctx.communities,
        ctx.total_nodes,
    ) - ctx.regularization;
    Some(modularity_gain + regularization_gain)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn density_boundaries() {
        assert_eq!(density(1, 0), 1.0);
        assert_eq!(density(0, 0), 1.0);
        // k = 4, complete: 6 edges
        assert!((density(4, 6) - 1.0).abs() < 1e-12);
        assert_eq!(density(5, 0), 0.0);
    }

    #[test]
    fn modularity_empty_graph_is_zero() {
        assert_eq!(modularity(0, 0, 0), 0.0);
    }

    #[test]
    fn modularity_singleton_on_path() {
        // Node of degree 2 on a 3-edge path: -(2/6)^2
        let q = modularity(0, 2, 3);
        assert!((q + 1.0 / 9.0).abs() < 1e-12);
    }

    #[test]
    fn regularization_inverts() {
        let r = regularization(7.25, 10, 40);
        let back = density_sum(r, 10, 40);
        assert!((back - 7.25).abs() < 1e-12);
    }

    #[test]
    fn regularization_degenerate_counts() {
        assert_eq!(regularization(3.0, 0, 10), 0.0);
        assert_eq!(regularization(3.0, 2, 0), 0.0);
        assert!(regularization(1.0, 1, 1).is_finite());
        assert_eq!(density_sum(0.3, 0, 10), 0.0);
    }
}
