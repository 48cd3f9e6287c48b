//! CoagulateError: Unified error type for coagulate public APIs
//!
//! Construction-time and I/O failures surface here. Arithmetic edge cases in the
//! objective are handled locally and never produce an error.

use crate::community::error::PartitionError;
use std::path::PathBuf;
use thiserror::Error;

/// Result alias for coagulate operations.
pub type Result<T> = std::result::Result<T, CoagulateError>;

/// Unified error type for coagulate operations.
#[derive(Debug, Error)]
pub enum CoagulateError {
    /// Reading or writing a file failed.
    #[error("I/O error on `{path}`: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// I/O failure on an anonymous reader or writer.
    #[error("I/O error: {0}")]
    Stream(#[from] std::io::Error),
    /// A token that should have been an unsigned 32-bit integer was not.
    #[error("malformed token `{token}` on line {line}")]
    MalformedToken { line: usize, token: String },
    /// An edge from a node to itself was constructed.
    #[error("self-loop on node {0} cannot be represented as an edge")]
    SelfLoop(u32),
    /// A checkpoint referenced a node the graph does not contain.
    #[error("checkpoint line {line} references unknown node {node}")]
    UnknownNode { node: u32, line: usize },
    /// A checkpoint listed the same node twice.
    #[error("checkpoint line {line} repeats node {node}")]
    DuplicateNode { node: u32, line: usize },
    /// The checkpoint header was present but unreadable.
    #[error("malformed checkpoint header: {0}")]
    MalformedHeader(String),
    /// A configuration value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// The configuration file is not valid TOML for [`CoagulateConfig`](crate::config::CoagulateConfig).
    #[error("cannot parse configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),
    /// The input graph has no nodes.
    #[error("graph has no nodes")]
    EmptyGraph,
    /// The partition failed an invariant check.
    #[error(transparent)]
    Partition(#[from] PartitionError),
}

impl CoagulateError {
    /// Attach a path to an I/O error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CoagulateError::Io {
            path: path.into(),
            source,
        }
    }
}
