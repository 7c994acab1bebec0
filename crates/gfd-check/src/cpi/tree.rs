//! Breadth-first spanning tree of a pattern.

use fixedbitset::FixedBitSet;

use gfd_core::{AttributedGraph, VertexId};

/// BFS tree rooted at the chosen root, with the pattern edges it leaves out.
///
/// A non-tree edge (NTE) is any pattern edge that is not a parent link. A
/// same-level NTE (SNTE) joins two vertices at the same BFS depth.
#[derive(Debug, Clone)]
pub struct BfsTree {
    root: VertexId,
    levels: Vec<Vec<VertexId>>,
    parent: Vec<Option<VertexId>>,
    level_of: Vec<usize>,
    children: Vec<Vec<VertexId>>,
    non_tree: Vec<(VertexId, VertexId)>,
}

impl BfsTree {
    /// Builds the tree. Vertices within a level are sorted; a vertex's parent
    /// is its first discoverer in that order.
    pub fn build(pattern: &AttributedGraph, root: VertexId) -> Self {
        let n = pattern.vertex_count();
        let mut parent = vec![None; n];
        let mut level_of = vec![0; n];
        let mut children = vec![Vec::new(); n];
        let mut seen = FixedBitSet::with_capacity(n);
        seen.insert(root.index());

        let mut levels = vec![vec![root]];
        loop {
            let mut next = Vec::new();
            let depth = levels.len();
            for &u in &levels[depth - 1] {
                for w in pattern.neighbors(u) {
                    if !seen.contains(w.index()) {
                        seen.insert(w.index());
                        parent[w.index()] = Some(u);
                        level_of[w.index()] = depth;
                        children[u.index()].push(w);
                        next.push(w);
                    }
                }
            }
            if next.is_empty() {
                break;
            }
            next.sort();
            levels.push(next);
        }
        for list in &mut children {
            list.sort();
        }

        let non_tree = pattern
            .edges()
            .filter(|&(a, b, _)| parent[a.index()] != Some(b) && parent[b.index()] != Some(a))
            .map(|(a, b, _)| (a, b))
            .collect();

        BfsTree {
            root,
            levels,
            parent,
            level_of,
            children,
            non_tree,
        }
    }

    pub fn root(&self) -> VertexId {
        self.root
    }

    pub fn levels(&self) -> &[Vec<VertexId>] {
        &self.levels
    }

    pub fn parent(&self, u: VertexId) -> Option<VertexId> {
        self.parent[u.index()]
    }

    pub fn level_of(&self, u: VertexId) -> usize {
        self.level_of[u.index()]
    }

    pub fn children(&self, u: VertexId) -> &[VertexId] {
        &self.children[u.index()]
    }

    pub fn non_tree_edges(&self) -> &[(VertexId, VertexId)] {
        &self.non_tree
    }

    pub fn is_tree_edge(&self, a: VertexId, b: VertexId) -> bool {
        self.parent(a) == Some(b) || self.parent(b) == Some(a)
    }

    /// True if `a` and `b` are adjacent in `pattern` through a same-level
    /// non-tree edge.
    pub fn is_same_level_non_tree(&self, pattern: &AttributedGraph, a: VertexId, b: VertexId) -> bool {
        self.level_of(a) == self.level_of(b) && pattern.adjacent(a, b) && !self.is_tree_edge(a, b)
    }

    /// Number of non-tree edges with at least one endpoint in `path`.
    pub fn non_tree_count(&self, path: &[VertexId]) -> usize {
        self.non_tree
            .iter()
            .filter(|(a, b)| path.contains(a) || path.contains(b))
            .count()
    }
}
