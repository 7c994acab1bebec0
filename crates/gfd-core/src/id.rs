//! Positional vertex identifiers.
//!
//! A [`VertexId`] is the index of a vertex in its graph's vertex store. The
//! same newtype is used for pattern vertices and data vertices; which graph an
//! id belongs to is always clear from context (`u` for pattern, `v` for data).

use std::fmt;

use petgraph::graph::NodeIndex;
use serde::{Deserialize, Serialize};

/// Positional vertex identifier. Maps to a petgraph `NodeIndex<u32>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct VertexId(pub u32);

impl VertexId {
    /// Returns the id as a `usize`, suitable for indexing per-vertex tables.
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Builds an id from a table index.
    pub fn from_index(index: usize) -> Self {
        VertexId(index as u32)
    }
}

impl fmt::Display for VertexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// Bridge between VertexId and petgraph's NodeIndex<u32>.

impl From<NodeIndex<u32>> for VertexId {
    fn from(idx: NodeIndex<u32>) -> Self {
        VertexId(idx.index() as u32)
    }
}

impl From<VertexId> for NodeIndex<u32> {
    fn from(id: VertexId) -> Self {
        NodeIndex::new(id.0 as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_id_to_node_index_roundtrip() {
        let idx = NodeIndex::<u32>::new(42);
        let id = VertexId::from(idx);
        assert_eq!(id.0, 42);

        let back: NodeIndex<u32> = id.into();
        assert_eq!(back.index(), 42);
    }

    #[test]
    fn vertex_id_display() {
        assert_eq!(format!("{}", VertexId(7)), "7");
    }

    #[test]
    fn index_roundtrip() {
        assert_eq!(VertexId::from_index(13).index(), 13);
    }

    #[test]
    fn ordering_follows_position() {
        let mut ids = vec![VertexId(3), VertexId(0), VertexId(2)];
        ids.sort();
        assert_eq!(ids, vec![VertexId(0), VertexId(2), VertexId(3)]);
    }

    #[test]
    fn serde_roundtrip() {
        let id = VertexId(42);
        let json = serde_json::to_string(&id).unwrap();
        let back: VertexId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, back);
    }
}
