use coagulate::coagulate_error::CoagulateError;
use coagulate::community::Partition;
use coagulate::graph::{AdjacencyGraph, GraphStore};
use std::io::Write;

#[test]
fn reads_file_and_seeds_partition() {
    let mut f = tempfile::NamedTempFile::new().unwrap();
    write!(f, "1 2\n2 3\n3 4\n1 2\n").unwrap();
    let g = AdjacencyGraph::read_edge_list(f.path()).unwrap();
    assert_eq!(g.total_nodes(), 4);
    // pairs as read, duplicates included
    assert_eq!(g.total_edges(), 4);
    assert_eq!(g.degree(2), 2);
    let p = Partition::initialize(&g).unwrap();
    assert_eq!(p.count(), 4);
}

#[test]
fn self_loop_fails_at_partition_initialization() {
    let mut f = tempfile::NamedTempFile::new().unwrap();
    writeln!(f, "1 2 3 3").unwrap();
    let g = AdjacencyGraph::read_edge_list(f.path()).unwrap();
    assert!(g.contains(3));
    assert!(matches!(
        Partition::initialize(&g),
        Err(CoagulateError::SelfLoop(3))
    ));
}

#[test]
fn malformed_file_is_fatal() {
    let mut f = tempfile::NamedTempFile::new().unwrap();
    writeln!(f, "1 2\n3 4.5").unwrap();
    assert!(matches!(
        AdjacencyGraph::read_edge_list(f.path()),
        Err(CoagulateError::MalformedToken { line: 2, .. })
    ));
}
