use coagulate::checkpoint::{load_or_initialize, read_checkpoint, write_checkpoint};
use coagulate::community::{CoagulateOptions, Partition, coagulate};
use coagulate::graph::{AdjacencyGraph, GraphStore};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeSet;
use std::io::Write;

fn random_graph(n: u32, p: f64, seed: u64) -> AdjacencyGraph {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut edges = Vec::new();
    for u in 0..n {
        edges.push((u, (u + 1) % n));
        for v in (u + 2)..n {
            // (0, n - 1) is already a ring edge
            if (u, v) != (0, n - 1) && rng.r#gen::<f64>() < p {
                edges.push((u, v));
            }
        }
    }
    AdjacencyGraph::from_edges(&edges)
}

/// Communities as sets of nodes, independent of slot order.
fn grouping(p: &Partition) -> BTreeSet<BTreeSet<u32>> {
    p.communities()
        .iter()
        .map(|c| c.nodes().iter().copied().collect())
        .collect()
}

#[test]
fn write_then_read_reproduces_assignment() {
    let g = random_graph(60, 0.08, 17);
    let mut p = Partition::initialize(&g).unwrap();
    let opts = CoagulateOptions::default();
    for step in 0..200 {
        let target = step % p.count();
        coagulate(&mut p, target, &opts).unwrap();
    }
    assert!(p.count() < 60);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("communities.txt");
    write_checkpoint(&path, &p).unwrap();

    let cp = read_checkpoint(&path, &g).unwrap().expect("checkpoint exists");
    assert!((cp.objective.unwrap() - p.objective()).abs() < 1e-9);
    let restored = cp.into_partition(&g).unwrap();
    restored.validate(&g).unwrap();
    assert_eq!(grouping(&restored), grouping(&p));
    assert!((restored.modularity() - p.modularity()).abs() < 1e-9);
    assert!((restored.objective() - p.objective()).abs() < 1e-9);
}

#[test]
fn missing_checkpoint_starts_from_singletons() {
    let g = random_graph(10, 0.2, 3);
    let dir = tempfile::tempdir().unwrap();
    let p = load_or_initialize(dir.path().join("absent.txt"), &g).unwrap();
    assert_eq!(p.count() as u32, g.total_nodes());
}

#[test]
fn partial_checkpoint_leaves_rest_as_singletons() {
    let g = random_graph(10, 0.2, 5);
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("partial.txt");
    let mut f = std::fs::File::create(&path).unwrap();
    writeln!(f, "0 1 2 ").unwrap();
    writeln!(f, "5 6").unwrap();
    drop(f);

    let p = load_or_initialize(&path, &g).unwrap();
    assert_eq!(p.count(), 10 - 2 - 1);
    let a = p.assignment();
    assert_eq!(a[&0], a[&2]);
    assert_eq!(a[&5], a[&6]);
    assert_ne!(a[&0], a[&5]);
    p.validate(&g).unwrap();
}

#[test]
fn overwrite_replaces_previous_checkpoint() {
    let g = random_graph(8, 0.3, 9);
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.txt");
    let singletons = Partition::initialize(&g).unwrap();
    write_checkpoint(&path, &singletons).unwrap();

    let merged = Partition::from_groups(&g, &[vec![0, 1, 2, 3]]).unwrap();
    write_checkpoint(&path, &merged).unwrap();
    let back = load_or_initialize(&path, &g).unwrap();
    assert_eq!(grouping(&back), grouping(&merged));
    assert!(!dir.path().join("out.txt.tmp").exists());
}
