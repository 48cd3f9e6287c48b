//! Whitespace-separated edge-list reader.
//!
//! # Supported format
//! - Pairs of unsigned 32-bit integers `from to`, separated by any whitespace. Pairs may
//!   span lines; line breaks carry no meaning beyond separating tokens.
//! - A trailing token without a partner is ignored.
//!
//! # Limitations
//! - No comments, weights or headers. A non-integer token is a fatal parse error.
//! - Self-loops are stored as read; they are rejected later when the optimizer builds
//!   canonical [`Edge`](super::Edge)s.

use crate::coagulate_error::{CoagulateError, Result};
use crate::graph::adjacency::{AdjacencyBuilder, AdjacencyGraph};
use crate::graph::NodeId;
use std::fs::File;
use std::io::Read;
use std::path::Path;

impl AdjacencyGraph {
    /// Read an edge list from `path`.
    pub fn read_edge_list(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| CoagulateError::io(path, e))?;
        let graph = Self::read_from(file).map_err(|e| match e {
            CoagulateError::Stream(source) => CoagulateError::io(path, source),
            other => other,
        })?;
        log::info!(
            "loaded {}: {} nodes, {} edges",
            path.display(),
            crate::graph::GraphStore::total_nodes(&graph),
            crate::graph::GraphStore::total_edges(&graph)
        );
        Ok(graph)
    }

    /// Read an edge list from any reader.
    pub fn read_from<R: Read>(mut reader: R) -> Result<Self> {
        let mut contents = String::new();
        reader.read_to_string(&mut contents)?;

        let mut builder = AdjacencyBuilder::default();
        let mut pending: Option<NodeId> = None;
        for (lineno, line) in contents.lines().enumerate() {
            for token in line.split_whitespace() {
                let id = parse_node_id(token, lineno + 1)?;
                match pending.take() {
                    Some(from) => builder.add_edge(from, id),
                    None => pending = Some(id),
                }
            }
        }
        if let Some(dangling) = pending {
            log::warn!("ignoring unpaired trailing node id {dangling}");
        }
        Ok(builder.build())
    }
}

/// Parse one node id token, reporting the 1-based line on failure.
pub(crate) fn parse_node_id(token: &str, line: usize) -> Result<NodeId> {
    token
        .parse::<NodeId>()
        .map_err(|_| CoagulateError::MalformedToken {
            line,
            token: token.to_string(),
        })
}
