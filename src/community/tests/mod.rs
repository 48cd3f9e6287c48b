use super::*;
use crate::graph::{AdjacencyGraph, GraphStore};

/// Path 1-2-3-4 with `M = 3`.
fn path4() -> AdjacencyGraph {
    AdjacencyGraph::from_edges(&[(1, 2), (2, 3), (3, 4)])
}

#[test]
fn path_singleton_modularity_uses_edge_count() {
    let g = path4();
    let p = Partition::initialize(&g).unwrap();
    let m = g.total_edges() as f64;
    assert_eq!(m, 3.0);
    let expected: f64 = g
        .nodes()
        .map(|v| {
            let d = g.degree(v) as f64;
            -0.25 * (d / m).powi(2)
        })
        .sum();
    assert!((p.modularity() - expected).abs() < 1e-12);
}

#[test]
fn path_converges_without_positive_merges() {
    let g = path4();
    let mut p = Partition::initialize(&g).unwrap();
    let opts = CoagulateOptions::default();
    let mut idle = 0;
    let mut i = 0;
    while idle < p.count() {
        let target = i % p.count();
        if coagulate(&mut p, target, &opts).unwrap().merged() {
            idle = 0;
        } else {
            idle += 1;
        }
        i += 1;
    }
    assert!(p.count() <= 4);
    for slot in 0..p.count() {
        assert!(best_candidate(&p, slot, &opts).unwrap().is_none());
    }
    p.validate(&g).unwrap();
}
