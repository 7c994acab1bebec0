//! Local candidate filters and root selection.

use std::collections::HashMap;

use gfd_core::{AttributedGraph, VertexId};

/// Largest degree among the neighbors of `v` (0 for an isolated vertex).
pub fn max_neighbor_degree(g: &AttributedGraph, v: VertexId) -> usize {
    g.neighbors(v).map(|w| g.degree(w)).max().unwrap_or(0)
}

/// Neighbor count per label.
pub fn neighbor_labels(g: &AttributedGraph, v: VertexId) -> HashMap<&str, usize> {
    let mut counts = HashMap::new();
    for w in g.neighbors(v) {
        *counts.entry(g.label(w)).or_insert(0) += 1;
    }
    counts
}

/// Necessary conditions for data vertex `v` to host pattern vertex `u`:
/// equal labels, a neighbor at least as connected as `u`'s best-connected
/// neighbor, and at least as many neighbors of every label as `u` has.
///
/// The degree bound `deg(v) >= deg(u)` is checked by callers, which usually
/// have it already.
pub fn cand_verify(
    data: &AttributedGraph,
    v: VertexId,
    pattern: &AttributedGraph,
    u: VertexId,
) -> bool {
    if data.label(v) != pattern.label(u) {
        return false;
    }
    if max_neighbor_degree(data, v) < max_neighbor_degree(pattern, u) {
        return false;
    }
    let have = neighbor_labels(data, v);
    neighbor_labels(pattern, u)
        .into_iter()
        .all(|(label, need)| have.get(label).copied().unwrap_or(0) >= need)
}

/// Same label and degree at least the pattern vertex's.
pub fn label_degree_ok(
    data: &AttributedGraph,
    v: VertexId,
    pattern: &AttributedGraph,
    u: VertexId,
) -> bool {
    data.label(v) == pattern.label(u) && data.degree(v) >= pattern.degree(u)
}

/// Picks the CPI root among `core`.
///
/// Ranks by `|label-and-degree candidates| / deg(u)`, then re-ranks the top
/// three by the same ratio over candidates that also pass [`cand_verify`].
/// Ties keep the earlier vertex. `core` must be non-empty.
pub fn select_root(pattern: &AttributedGraph, data: &AttributedGraph, core: &[VertexId]) -> VertexId {
    let ratio = |u: VertexId, count: usize| count as f64 / pattern.degree(u).max(1) as f64;

    let mut ranked: Vec<(VertexId, f64)> = core
        .iter()
        .map(|&u| {
            let count = data
                .vertices_with_label(pattern.label(u))
                .iter()
                .filter(|&&v| data.degree(v) >= pattern.degree(u))
                .count();
            (u, ratio(u, count))
        })
        .collect();
    ranked.sort_by(|a, b| a.1.total_cmp(&b.1));

    let mut top: Vec<(VertexId, f64)> = ranked
        .iter()
        .take(3)
        .map(|&(u, _)| {
            let count = data
                .vertices_with_label(pattern.label(u))
                .iter()
                .filter(|&&v| cand_verify(data, v, pattern, u))
                .count();
            (u, ratio(u, count))
        })
        .collect();
    top.sort_by(|a, b| a.1.total_cmp(&b.1));

    top.first().map(|&(u, _)| u).unwrap_or(core[0])
}

#[cfg(test)]
mod tests {
    use super::*;
    use gfd_core::{Edge, Vertex};

    fn graph(labels: &[&str], edges: &[(u32, u32)]) -> AttributedGraph {
        let mut g = AttributedGraph::new();
        for label in labels {
            g.add_vertex(Vertex::new(*label));
        }
        for &(a, b) in edges {
            g.add_edge(VertexId(a), VertexId(b), Edge::new("e")).unwrap();
        }
        g
    }

    #[test]
    fn neighbor_statistics() {
        let g = graph(&["a", "b", "b", "c"], &[(0, 1), (0, 2), (1, 3), (2, 3), (1, 2)]);
        assert_eq!(max_neighbor_degree(&g, VertexId(0)), 3);
        let labels = neighbor_labels(&g, VertexId(1));
        assert_eq!(labels.get("a"), Some(&1));
        assert_eq!(labels.get("b"), Some(&1));
        assert_eq!(labels.get("c"), Some(&1));
    }

    #[test]
    fn cand_verify_checks_label_histogram() {
        // pattern: a with two b neighbors
        let pattern = graph(&["a", "b", "b"], &[(0, 1), (0, 2)]);
        // data: a0 has b,b ; a3 has b,c
        let data = graph(
            &["a", "b", "b", "a", "b", "c"],
            &[(0, 1), (0, 2), (3, 4), (3, 5)],
        );
        assert!(cand_verify(&data, VertexId(0), &pattern, VertexId(0)));
        assert!(!cand_verify(&data, VertexId(3), &pattern, VertexId(0)));
        assert!(!cand_verify(&data, VertexId(1), &pattern, VertexId(0)));
    }

    #[test]
    fn root_prefers_rare_labels() {
        // triangle a-b-c; data has many a's and b's but one c
        let pattern = graph(&["a", "b", "c"], &[(0, 1), (1, 2), (2, 0)]);
        let data = graph(
            &["a", "b", "c", "a", "b", "a", "b"],
            &[(0, 1), (1, 2), (2, 0), (3, 4), (4, 0), (3, 1), (5, 6), (6, 3), (5, 4)],
        );
        let root = select_root(&pattern, &data, &[VertexId(0), VertexId(1), VertexId(2)]);
        assert_eq!(root, VertexId(2));
    }
}
