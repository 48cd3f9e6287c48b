//! Partition checkpoints.
//!
//! # Format
//! ```text
//! Q = 0.4127
//! 1 2 3
//! 4 5
//! ```
//! - An optional header line `Q = <float>` records the objective at write time. The writer
//!   always emits it; the reader accepts files without it.
//! - Every following line is one community: member ids separated by spaces, trailing space
//!   tolerated. The first id is the merge target when the file is read back.
//! - Blank lines are skipped. Graph nodes that appear on no line stay singletons.
//!
//! Files are always a full partition, never a list of merge instructions layered on top of
//! another checkpoint.

use crate::coagulate_error::{CoagulateError, Result};
use crate::community::Partition;
use crate::graph::edge_list::parse_node_id;
use crate::graph::{GraphStore, NodeId};
use hashbrown::HashSet;
use itertools::Itertools;
use std::fs::{self, File};
use std::io::{BufWriter, ErrorKind, Read, Write};
use std::path::{Path, PathBuf};

const HEADER_PREFIX: &str = "Q =";

/// A parsed checkpoint file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Checkpoint {
    /// Objective recorded in the header, when present.
    pub objective: Option<f64>,
    /// One entry per community line.
    pub groups: Vec<Vec<NodeId>>,
}

impl Checkpoint {
    /// Rebuild a partition of `graph` from the groups.
    pub fn into_partition<G: GraphStore>(self, graph: &G) -> Result<Partition> {
        Partition::from_groups(graph, &self.groups)
    }
}

/// Serialize `partition` in checkpoint format.
pub fn write_to<W: Write>(mut writer: W, partition: &Partition) -> Result<()> {
    writeln!(writer, "{HEADER_PREFIX} {}", partition.objective())?;
    for community in partition.communities() {
        writeln!(writer, "{}", community.nodes().iter().join(" "))?;
    }
    writer.flush()?;
    Ok(())
}

/// Write `partition` to `path`, replacing any previous checkpoint atomically.
pub fn write_checkpoint(path: impl AsRef<Path>, partition: &Partition) -> Result<()> {
    let path = path.as_ref();
    let tmp = staging_path(path);
    let file = File::create(&tmp).map_err(|e| CoagulateError::io(&tmp, e))?;
    write_to(BufWriter::new(file), partition).map_err(|e| match e {
        CoagulateError::Stream(source) => CoagulateError::io(&tmp, source),
        other => other,
    })?;
    fs::rename(&tmp, path).map_err(|e| CoagulateError::io(path, e))?;
    log::info!(
        "checkpoint written to {} ({} communities, Q = {:.6})",
        path.display(),
        partition.count(),
        partition.objective()
    );
    Ok(())
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Parse a checkpoint, checking every id against `graph`.
pub fn read_from<R: Read, G: GraphStore>(mut reader: R, graph: &G) -> Result<Checkpoint> {
    let mut contents = String::new();
    reader.read_to_string(&mut contents)?;

    let mut checkpoint = Checkpoint::default();
    let mut seen: HashSet<NodeId> = HashSet::new();
    for (lineno, line) in contents.lines().enumerate() {
        let line_no = lineno + 1;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if lineno == 0 {
            if let Some(raw) = trimmed.strip_prefix(HEADER_PREFIX) {
                let q = raw
                    .trim()
                    .parse::<f64>()
                    .map_err(|_| CoagulateError::MalformedHeader(trimmed.to_string()))?;
                checkpoint.objective = Some(q);
                continue;
            }
        }
        let mut group = Vec::new();
        for token in trimmed.split_whitespace() {
            let node = parse_node_id(token, line_no)?;
            if !graph.contains(node) {
                return Err(CoagulateError::UnknownNode {
                    node,
                    line: line_no,
                });
            }
            if !seen.insert(node) {
                return Err(CoagulateError::DuplicateNode {
                    node,
                    line: line_no,
                });
            }
            group.push(node);
        }
        checkpoint.groups.push(group);
    }
    Ok(checkpoint)
}

/// Read the checkpoint at `path`. A missing file is not an error: it yields `Ok(None)`.
pub fn read_checkpoint<G: GraphStore>(path: impl AsRef<Path>, graph: &G) -> Result<Option<Checkpoint>> {
    let path = path.as_ref();
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            log::info!("no checkpoint at {}, starting from singletons", path.display());
            return Ok(None);
        }
        Err(e) => return Err(CoagulateError::io(path, e)),
    };
    read_from(file, graph)
        .map(Some)
        .map_err(|e| match e {
            CoagulateError::Stream(source) => CoagulateError::io(path, source),
            other => other,
        })
}

/// Warm-start from `path` when it exists, otherwise start from all singletons.
pub fn load_or_initialize<G: GraphStore>(path: impl AsRef<Path>, graph: &G) -> Result<Partition> {
    match read_checkpoint(path.as_ref(), graph)? {
        Some(checkpoint) => {
            let recorded = checkpoint.objective;
            let partition = checkpoint.into_partition(graph)?;
            log::info!(
                "resumed {} communities from {} (recorded Q = {:?}, recomputed Q = {:.6})",
                partition.count(),
                path.as_ref().display(),
                recorded,
                partition.objective()
            );
            Ok(partition)
        }
        None => Partition::initialize(graph),
    }
}
