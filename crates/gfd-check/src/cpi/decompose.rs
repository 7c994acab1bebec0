//! Core/forest decomposition of a pattern.
//!
//! Repeatedly peeling degree-1 vertices leaves the *core*: the part of the
//! pattern that lies on or between cycles. The peeled vertices form trees,
//! each hanging off exactly one core vertex; all trees at the same core
//! vertex are grouped into one forest entry that also lists that vertex.
//! A pattern that is itself a tree (`|V| = |E| + 1`) is all core.

use fixedbitset::FixedBitSet;

use gfd_core::{AttributedGraph, VertexId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decomposition {
    /// Core vertices, ascending.
    pub core: Vec<VertexId>,
    /// Peeled trees grouped by attachment vertex. Each entry is sorted and
    /// contains its attachment (core) vertex.
    pub forest: Vec<Vec<VertexId>>,
    in_core: FixedBitSet,
}

impl Decomposition {
    pub fn in_core(&self, u: VertexId) -> bool {
        self.in_core.contains(u.index())
    }
}

pub fn decompose(pattern: &AttributedGraph) -> Decomposition {
    let n = pattern.vertex_count();
    let mut in_core = FixedBitSet::with_capacity(n);

    if n == pattern.edge_count() + 1 {
        in_core.insert_range(..);
        return Decomposition {
            core: pattern.vertices().collect(),
            forest: Vec::new(),
            in_core,
        };
    }

    let mut degree: Vec<usize> = pattern.vertices().map(|u| pattern.degree(u)).collect();
    let mut peeled = FixedBitSet::with_capacity(n);
    let mut queue: Vec<VertexId> = pattern.vertices().filter(|&u| degree[u.index()] == 1).collect();
    while let Some(u) = queue.pop() {
        if peeled.contains(u.index()) || degree[u.index()] != 1 {
            continue;
        }
        peeled.insert(u.index());
        for w in pattern.neighbors(u) {
            if !peeled.contains(w.index()) {
                degree[w.index()] -= 1;
                if degree[w.index()] == 1 {
                    queue.push(w);
                }
            }
        }
    }

    let core: Vec<VertexId> = pattern
        .vertices()
        .filter(|u| !peeled.contains(u.index()))
        .collect();
    for u in &core {
        in_core.insert(u.index());
    }

    let mut forest = Vec::new();
    for &attach in &core {
        let mut tree = vec![attach];
        let mut stack: Vec<VertexId> = pattern
            .neighbors(attach)
            .filter(|w| peeled.contains(w.index()))
            .collect();
        while let Some(u) = stack.pop() {
            if tree.contains(&u) {
                continue;
            }
            tree.push(u);
            stack.extend(
                pattern
                    .neighbors(u)
                    .filter(|w| peeled.contains(w.index()) && !tree.contains(w)),
            );
        }
        if tree.len() > 1 {
            tree.sort();
            forest.push(tree);
        }
    }

    Decomposition {
        core,
        forest,
        in_core,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gfd_core::{Edge, Vertex};

    fn graph(n: usize, edges: &[(u32, u32)]) -> AttributedGraph {
        let mut g = AttributedGraph::new();
        for _ in 0..n {
            g.add_vertex(Vertex::new("x"));
        }
        for &(a, b) in edges {
            g.add_edge(VertexId(a), VertexId(b), Edge::new("e")).unwrap();
        }
        g
    }

    fn ids(raw: &[u32]) -> Vec<VertexId> {
        raw.iter().map(|&i| VertexId(i)).collect()
    }

    #[test]
    fn tree_is_all_core() {
        let d = decompose(&graph(4, &[(0, 1), (1, 2), (1, 3)]));
        assert_eq!(d.core, ids(&[0, 1, 2, 3]));
        assert!(d.forest.is_empty());
        assert!(d.in_core(VertexId(3)));
    }

    #[test]
    fn single_vertex_is_core() {
        let d = decompose(&graph(1, &[]));
        assert_eq!(d.core, ids(&[0]));
    }

    #[test]
    fn cycle_with_dangling_trees() {
        // triangle 0-1-2; path 2-3-4; leaf 5 on 2; leaf 6 on 0
        let d = decompose(&graph(
            7,
            &[(0, 1), (1, 2), (2, 0), (2, 3), (3, 4), (2, 5), (0, 6)],
        ));
        assert_eq!(d.core, ids(&[0, 1, 2]));
        assert_eq!(d.forest, vec![ids(&[0, 6]), ids(&[2, 3, 4, 5])]);
        assert!(!d.in_core(VertexId(4)));
    }

    #[test]
    fn two_cycles_joined_by_a_path_stay_core() {
        // squares 0-1-2-3 and 5-6-7-8 joined through 4; leaf 9 on 4
        let d = decompose(&graph(
            10,
            &[
                (0, 1),
                (1, 2),
                (2, 3),
                (3, 0),
                (3, 4),
                (4, 5),
                (5, 6),
                (6, 7),
                (7, 8),
                (8, 5),
                (4, 9),
            ],
        ));
        assert_eq!(d.core, ids(&[0, 1, 2, 3, 4, 5, 6, 7, 8]));
        assert_eq!(d.forest, vec![ids(&[4, 9])]);
    }
}
