//! Core error types for gfd-core.
//!
//! Uses `thiserror` for structured, matchable error variants covering the
//! failure modes of graph construction, GFD validation at load time, and the
//! text formats.

use std::path::PathBuf;

use crate::id::VertexId;
use thiserror::Error;

/// Core errors produced by the gfd-core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A vertex id does not exist in the graph.
    #[error("vertex not found: VertexId({id})", id = id.0)]
    VertexNotFound { id: VertexId },

    /// The graph already has an edge between these endpoints.
    #[error("duplicate edge between {a} and {b}")]
    DuplicateEdge { a: VertexId, b: VertexId },

    /// Edges must connect two distinct vertices.
    #[error("self-loop on vertex {id}")]
    SelfLoop { id: VertexId },

    /// A GFD violates a load-time invariant (token index out of range,
    /// disconnected pattern).
    #[error("malformed GFD: {reason}")]
    MalformedGfd { reason: String },

    /// The graph or GFD text could not be parsed.
    #[error("parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    /// A graph or GFD file could not be read.
    #[error("failed to read '{path}': {source}", path = path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
