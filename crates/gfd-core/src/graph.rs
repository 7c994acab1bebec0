//! AttributedGraph: the undirected, labeled, attributed graph shared by data
//! graphs and GFD patterns.
//!
//! [`AttributedGraph`] wraps a petgraph `Graph<Vertex, Edge, Undirected>` and
//! keeps two derived tables in sync with it:
//! - a label index (label -> vertices carrying it, in id order), used by every
//!   validator for candidate discovery and label feasibility checks;
//! - a degree table, so degree filters are O(1) inside the matching loops.
//!
//! The graph is simple: self-loops and parallel edges are rejected by
//! [`AttributedGraph::add_edge`]. Vertex identity is positional, so ids are
//! dense in `0..vertex_count()`.

use std::collections::BTreeMap;

use indexmap::IndexMap;
use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::id::VertexId;

/// Attribute name under which a vertex's label is readable.
pub const LABEL_ATTRIBUTE: &str = "label";

/// A graph vertex: a label plus free-form string attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vertex {
    /// Vertex label, compared by every embedding.
    pub label: String,
    /// Attribute name -> value, in insertion order.
    pub attributes: IndexMap<String, String>,
}

impl Vertex {
    /// Creates a vertex with no attributes.
    pub fn new(label: impl Into<String>) -> Self {
        Vertex {
            label: label.into(),
            attributes: IndexMap::new(),
        }
    }

    /// Adds an attribute, builder style. Setting `"label"` replaces the
    /// vertex label.
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        if name == LABEL_ATTRIBUTE {
            self.label = value.into();
        } else {
            self.attributes.insert(name, value.into());
        }
        self
    }

    /// Looks up an attribute value. `"label"` always reads the vertex label.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        if name == LABEL_ATTRIBUTE {
            return Some(self.label.as_str());
        }
        self.attributes.get(name).map(String::as_str)
    }
}

/// A graph edge. Edges are undirected and carry a single label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub label: String,
}

impl Edge {
    pub fn new(label: impl Into<String>) -> Self {
        Edge {
            label: label.into(),
        }
    }
}

/// Undirected simple graph with labeled, attributed vertices and labeled edges.
///
/// Only the petgraph graph is serialized. Deserializing replays it through
/// [`AttributedGraph::add_vertex`] and [`AttributedGraph::add_edge`], so the
/// derived tables are rebuilt and self-loops or parallel edges are rejected.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(try_from = "GraphRepr")]
pub struct AttributedGraph {
    inner: UnGraph<Vertex, Edge, u32>,
    /// Label -> vertices with that label, ascending.
    #[serde(skip_serializing)]
    by_label: BTreeMap<String, Vec<VertexId>>,
    /// Degree per vertex.
    #[serde(skip_serializing)]
    degrees: Vec<usize>,
}

#[derive(Deserialize)]
struct GraphRepr {
    inner: UnGraph<Vertex, Edge, u32>,
}

impl TryFrom<GraphRepr> for AttributedGraph {
    type Error = CoreError;

    fn try_from(repr: GraphRepr) -> Result<Self, Self::Error> {
        let (nodes, edges) = repr.inner.into_nodes_edges();
        let mut graph = AttributedGraph::new();
        for node in nodes {
            graph.add_vertex(node.weight);
        }
        for edge in edges {
            let (a, b) = (VertexId::from(edge.source()), VertexId::from(edge.target()));
            graph.add_edge(a, b, edge.weight)?;
        }
        Ok(graph)
    }
}

impl AttributedGraph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        AttributedGraph::default()
    }

    // -----------------------------------------------------------------------
    // Mutation
    // -----------------------------------------------------------------------

    /// Appends a vertex and returns its positional id.
    pub fn add_vertex(&mut self, vertex: Vertex) -> VertexId {
        let label = vertex.label.clone();
        let id = VertexId::from(self.inner.add_node(vertex));
        self.by_label.entry(label).or_default().push(id);
        self.degrees.push(0);
        id
    }

    /// Connects two existing, distinct, not yet adjacent vertices.
    pub fn add_edge(&mut self, a: VertexId, b: VertexId, edge: Edge) -> Result<(), CoreError> {
        self.check_vertex(a)?;
        self.check_vertex(b)?;
        if a == b {
            return Err(CoreError::SelfLoop { id: a });
        }
        if self.inner.find_edge(a.into(), b.into()).is_some() {
            return Err(CoreError::DuplicateEdge { a, b });
        }
        self.inner.add_edge(a.into(), b.into(), edge);
        self.degrees[a.index()] += 1;
        self.degrees[b.index()] += 1;
        Ok(())
    }

    fn check_vertex(&self, id: VertexId) -> Result<(), CoreError> {
        if id.index() < self.vertex_count() {
            Ok(())
        } else {
            Err(CoreError::VertexNotFound { id })
        }
    }

    // -----------------------------------------------------------------------
    // Read-only queries
    // -----------------------------------------------------------------------

    pub fn vertex_count(&self) -> usize {
        self.inner.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.inner.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.vertex_count() == 0
    }

    /// Returns the vertex with the given id, if it exists.
    pub fn vertex(&self, id: VertexId) -> Option<&Vertex> {
        self.inner.node_weight(id.into())
    }

    /// Returns the label of `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` is not a vertex of this graph.
    pub fn label(&self, id: VertexId) -> &str {
        &self.inner[NodeIndex::<u32>::from(id)].label
    }

    /// Returns the degree of `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` is not a vertex of this graph.
    pub fn degree(&self, id: VertexId) -> usize {
        self.degrees[id.index()]
    }

    /// Iterates over all vertex ids in ascending order.
    pub fn vertices(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.inner.node_indices().map(VertexId::from)
    }

    /// Iterates over the neighbors of `id`.
    pub fn neighbors(&self, id: VertexId) -> impl Iterator<Item = VertexId> + '_ {
        self.inner.neighbors(id.into()).map(VertexId::from)
    }

    /// Iterates over `(neighbor, edge label)` pairs of `id`.
    pub fn incident(&self, id: VertexId) -> impl Iterator<Item = (VertexId, &str)> + '_ {
        let source: NodeIndex<u32> = id.into();
        self.inner.edges(source).map(move |edge| {
            let other = if edge.source() == source {
                edge.target()
            } else {
                edge.source()
            };
            (VertexId::from(other), edge.weight().label.as_str())
        })
    }

    /// Iterates over all edges as `(a, b, edge)`.
    pub fn edges(&self) -> impl Iterator<Item = (VertexId, VertexId, &Edge)> + '_ {
        self.inner
            .edge_references()
            .map(|edge| {
                (
                    VertexId::from(edge.source()),
                    VertexId::from(edge.target()),
                    edge.weight(),
                )
            })
    }

    /// Returns the label of the edge between `a` and `b`, if they are adjacent.
    pub fn edge_label(&self, a: VertexId, b: VertexId) -> Option<&str> {
        self.inner
            .find_edge(a.into(), b.into())
            .map(|e| self.inner[e].label.as_str())
    }

    /// Returns `true` if `a` and `b` are adjacent.
    pub fn adjacent(&self, a: VertexId, b: VertexId) -> bool {
        self.inner.find_edge(a.into(), b.into()).is_some()
    }

    /// Returns every vertex carrying `label`, ascending.
    pub fn vertices_with_label(&self, label: &str) -> &[VertexId] {
        self.by_label.get(label).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Returns `true` if at least one vertex carries `label`.
    pub fn has_label(&self, label: &str) -> bool {
        self.by_label.contains_key(label)
    }

    /// Iterates over the distinct vertex labels, sorted.
    pub fn labels(&self) -> impl Iterator<Item = &str> + '_ {
        self.by_label.keys().map(String::as_str)
    }

    /// Returns `true` if every vertex is reachable from every other one.
    /// The empty graph counts as connected.
    pub fn is_connected(&self) -> bool {
        self.is_empty() || petgraph::algo::connected_components(&self.inner) == 1
    }

    /// Read-only access to the underlying petgraph graph, for petgraph
    /// algorithms.
    pub fn inner(&self) -> &UnGraph<Vertex, Edge, u32> {
        &self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle_with_tail() -> AttributedGraph {
        let mut g = AttributedGraph::new();
        let a = g.add_vertex(Vertex::new("A").with_attribute("name", "a"));
        let b = g.add_vertex(Vertex::new("B"));
        let c = g.add_vertex(Vertex::new("A"));
        let d = g.add_vertex(Vertex::new("C"));
        g.add_edge(a, b, Edge::new("x")).unwrap();
        g.add_edge(b, c, Edge::new("y")).unwrap();
        g.add_edge(c, a, Edge::new("x")).unwrap();
        g.add_edge(c, d, Edge::new("z")).unwrap();
        g
    }

    #[test]
    fn counts_and_degrees() {
        let g = triangle_with_tail();
        assert_eq!(g.vertex_count(), 4);
        assert_eq!(g.edge_count(), 4);
        assert_eq!(g.degree(VertexId(0)), 2);
        assert_eq!(g.degree(VertexId(2)), 3);
        assert_eq!(g.degree(VertexId(3)), 1);
    }

    #[test]
    fn label_index_is_sorted_by_id() {
        let g = triangle_with_tail();
        assert_eq!(g.vertices_with_label("A"), &[VertexId(0), VertexId(2)]);
        assert_eq!(g.vertices_with_label("missing"), &[] as &[VertexId]);
        assert!(g.has_label("C"));
        assert_eq!(g.labels().collect::<Vec<_>>(), vec!["A", "B", "C"]);
    }

    #[test]
    fn edge_labels_are_symmetric() {
        let g = triangle_with_tail();
        assert_eq!(g.edge_label(VertexId(1), VertexId(2)), Some("y"));
        assert_eq!(g.edge_label(VertexId(2), VertexId(1)), Some("y"));
        assert_eq!(g.edge_label(VertexId(0), VertexId(3)), None);
    }

    #[test]
    fn incident_reports_other_endpoint() {
        let g = triangle_with_tail();
        let mut incident: Vec<_> = g.incident(VertexId(2)).collect();
        incident.sort();
        assert_eq!(
            incident,
            vec![(VertexId(0), "x"), (VertexId(1), "y"), (VertexId(3), "z")]
        );
    }

    #[test]
    fn rejects_self_loops_and_parallel_edges() {
        let mut g = triangle_with_tail();
        assert!(matches!(
            g.add_edge(VertexId(1), VertexId(1), Edge::new("x")),
            Err(CoreError::SelfLoop { .. })
        ));
        assert!(matches!(
            g.add_edge(VertexId(1), VertexId(0), Edge::new("w")),
            Err(CoreError::DuplicateEdge { .. })
        ));
        assert!(matches!(
            g.add_edge(VertexId(1), VertexId(9), Edge::new("w")),
            Err(CoreError::VertexNotFound { .. })
        ));
        assert_eq!(g.edge_count(), 4);
    }

    #[test]
    fn label_readable_as_attribute() {
        let g = triangle_with_tail();
        let v = g.vertex(VertexId(0)).unwrap();
        assert_eq!(v.attribute("label"), Some("A"));
        assert_eq!(v.attribute("name"), Some("a"));
        assert_eq!(v.attribute("age"), None);

        let relabeled = Vertex::new("A").with_attribute("label", "other");
        assert_eq!(relabeled.label, "other");
        assert_eq!(relabeled.attribute("label"), Some("other"));
        assert!(relabeled.attributes.is_empty());
    }

    #[test]
    fn connectivity() {
        let mut g = triangle_with_tail();
        assert!(g.is_connected());
        g.add_vertex(Vertex::new("D"));
        assert!(!g.is_connected());
        assert!(AttributedGraph::new().is_connected());
    }

    #[test]
    fn serde_roundtrip_keeps_indexes() {
        let g = triangle_with_tail();
        let json = serde_json::to_string(&g).unwrap();
        let back: AttributedGraph = serde_json::from_str(&json).unwrap();
        assert_eq!(back.vertex_count(), 4);
        assert_eq!(back.degree(VertexId(2)), 3);
        assert_eq!(back.vertices_with_label("A"), &[VertexId(0), VertexId(2)]);
        assert_eq!(back.edge_label(VertexId(2), VertexId(3)), Some("z"));
    }

    #[test]
    fn deserialize_ignores_stale_tables() {
        let mut json = serde_json::to_value(triangle_with_tail()).unwrap();
        json["degrees"] = serde_json::json!([]);
        json["by_label"] = serde_json::json!({ "Z": [7] });
        let back: AttributedGraph = serde_json::from_value(json).unwrap();
        assert_eq!(back.degree(VertexId(3)), 1);
        assert!(!back.has_label("Z"));
        assert_eq!(back.vertices_with_label("B"), &[VertexId(1)]);
    }

    #[test]
    fn deserialize_rejects_self_loops() {
        let mut inner = UnGraph::<Vertex, Edge, u32>::default();
        let a = inner.add_node(Vertex::new("A"));
        inner.add_edge(a, a, Edge::new("x"));
        let json = serde_json::json!({ "inner": inner });
        assert!(serde_json::from_value::<AttributedGraph>(json).is_err());
    }
}
