use proptest::prelude::*;

use gfd_core::{read_gfd, read_graph, write_gfd, write_graph, AttributedGraph, Edge, Gfd, Literal, Token, Vertex, VertexId};

fn text() -> impl Strategy<Value = String> {
    "[ -~]{0,8}"
}

fn attribute_name() -> impl Strategy<Value = String> {
    "[a-z_][a-z0-9_]{0,5}".prop_filter("reserved attribute", |s| s != "label" && s != "node_id")
}

fn vertex() -> impl Strategy<Value = Vertex> {
    (text(), prop::collection::vec((attribute_name(), text()), 0..3)).prop_map(|(label, attrs)| {
        attrs
            .into_iter()
            .fold(Vertex::new(label), |v, (k, value)| v.with_attribute(k, value))
    })
}

fn graph() -> impl Strategy<Value = AttributedGraph> {
    (
        prop::collection::vec(vertex(), 1..8),
        prop::collection::vec((0usize..8, 0usize..8, text()), 0..12),
    )
        .prop_map(|(vertices, edges)| {
            let mut g = AttributedGraph::new();
            let n = vertices.len();
            for v in vertices {
                g.add_vertex(v);
            }
            for (a, b, label) in edges {
                // duplicates and self-loops are rejected; skip them
                let _ = g.add_edge(VertexId::from_index(a % n), VertexId::from_index(b % n), Edge::new(label));
            }
            g
        })
}

fn edge_list(g: &AttributedGraph) -> Vec<(VertexId, VertexId, String)> {
    let mut edges: Vec<_> = g
        .edges()
        .map(|(a, b, e)| (a.min(b), a.max(b), e.label.clone()))
        .collect();
    edges.sort();
    edges
}

proptest! {
    #[test]
    fn written_graphs_read_back(g in graph()) {
        let text = write_graph(&g);
        let back = read_graph(&text).unwrap();
        prop_assert_eq!(back.vertex_count(), g.vertex_count());
        for v in g.vertices() {
            prop_assert_eq!(back.vertex(v), g.vertex(v));
        }
        prop_assert_eq!(edge_list(&back), edge_list(&g));
    }
}

#[test]
fn gfd_text_survives_writing() {
    let mut p = AttributedGraph::new();
    let a = p.add_vertex(Vertex::new("person"));
    let b = p.add_vertex(Vertex::new("film"));
    p.add_edge(a, b, Edge::new("directed")).unwrap();
    let gfd = Gfd::new(
        p,
        vec![Literal::new(Token::vertex(1, "title"), Token::constant("Fargo"))],
        vec![
            Literal::new(Token::vertex(0, "name"), Token::constant("Joel")),
            Literal::new(Token::vertex(0, "label"), Token::constant("person")),
        ],
    )
    .unwrap();
    let back = read_gfd(&write_gfd(&gfd)).unwrap();
    assert_eq!(back.premises(), gfd.premises());
    assert_eq!(back.conclusion(), gfd.conclusion());
    assert_eq!(back.pattern().vertex_count(), 2);
    assert_eq!(back.pattern().edge_label(VertexId(0), VertexId(1)), Some("directed"));
}
