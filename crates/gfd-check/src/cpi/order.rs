//! Matching order over the candidate path index.
//!
//! The order is assembled path by path: root-to-leaf paths of the core tree
//! first, then the paths of every forest tree from its attachment vertex.
//! Each path contributes the vertices it adds beyond the part already placed,
//! so a vertex's tree parent always precedes it.

use std::collections::BTreeMap;

use fixedbitset::FixedBitSet;

use gfd_core::VertexId;

use super::decompose::Decomposition;
use super::index::CandidateIndex;
use super::tree::BfsTree;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchingOrder {
    /// Pattern vertices in assignment order; `seq[0]` is the root.
    pub seq: Vec<VertexId>,
    /// The first `core_len` entries are the core vertices.
    pub core_len: usize,
}

/// Root-to-leaf paths of the tree restricted to `members`, starting at `top`.
fn tree_paths(tree: &BfsTree, members: &FixedBitSet, top: VertexId) -> Vec<Vec<VertexId>> {
    let mut paths = Vec::new();
    for leaf in members.ones().map(VertexId::from_index) {
        if leaf == top || tree.children(leaf).iter().any(|c| members.contains(c.index())) {
            continue;
        }
        let mut path = vec![leaf];
        let mut cur = leaf;
        while cur != top {
            match tree.parent(cur) {
                Some(p) => {
                    path.push(p);
                    cur = p;
                }
                None => break,
            }
        }
        path.reverse();
        paths.push(path);
    }
    paths
}

/// Number of index paths covering `path[from..]`, saturating.
pub fn path_embeddings(index: &CandidateIndex, path: &[VertexId], from: usize) -> u64 {
    let Some(&last) = path.last() else { return 0 };
    let mut weight: BTreeMap<VertexId, u64> =
        index.candidates(last).iter().map(|&y| (y, 1)).collect();
    for i in (from + 1..path.len()).rev() {
        let mut next = BTreeMap::new();
        for (&x, linked) in index.links(path[i]) {
            let w = linked
                .iter()
                .map(|y| weight.get(y).copied().unwrap_or(0))
                .fold(0u64, u64::saturating_add);
            if w > 0 {
                next.insert(x, w);
            }
        }
        weight = next;
    }
    weight.values().copied().fold(0u64, u64::saturating_add)
}

fn place(path: &[VertexId], seq: &mut Vec<VertexId>, placed: &mut FixedBitSet) {
    for &u in path {
        if !placed.contains(u.index()) {
            placed.insert(u.index());
            seq.push(u);
        }
    }
}

/// Greedily appends `paths` to `seq`.
///
/// With nothing placed yet, the first path minimizes embeddings per incident
/// non-tree edge (paths without non-tree edges rank last). Every later path
/// minimizes the embeddings of its unplaced suffix per candidate of its
/// junction vertex.
fn extend_with_paths(
    index: &CandidateIndex,
    tree: &BfsTree,
    mut paths: Vec<Vec<VertexId>>,
    seq: &mut Vec<VertexId>,
    placed: &mut FixedBitSet,
) {
    if seq.is_empty() && !paths.is_empty() {
        let score = |path: &Vec<VertexId>| match tree.non_tree_count(path) {
            0 => f64::INFINITY,
            nt => path_embeddings(index, path, 0) as f64 / nt as f64,
        };
        let first = paths
            .iter()
            .enumerate()
            .min_by(|a, b| score(a.1).total_cmp(&score(b.1)))
            .map(|(i, _)| i)
            .unwrap_or(0);
        let path = paths.remove(first);
        place(&path, seq, placed);
    }

    while !paths.is_empty() {
        let junction = |path: &Vec<VertexId>| {
            path.iter()
                .rposition(|u| placed.contains(u.index()))
                .unwrap_or(0)
        };
        let score = |path: &Vec<VertexId>| {
            let j = junction(path);
            let origin = index.candidates(path[j]).len().max(1);
            path_embeddings(index, path, j) as f64 / origin as f64
        };
        let next = paths
            .iter()
            .enumerate()
            .min_by(|a, b| score(a.1).total_cmp(&score(b.1)))
            .map(|(i, _)| i)
            .unwrap_or(0);
        let path = paths.remove(next);
        place(&path, seq, placed);
    }
}

pub fn matching_order(
    pattern_size: usize,
    tree: &BfsTree,
    decomposition: &Decomposition,
    index: &CandidateIndex,
) -> MatchingOrder {
    let root = tree.root();
    let mut seq = Vec::with_capacity(pattern_size);
    let mut placed = FixedBitSet::with_capacity(pattern_size);

    let mut core = FixedBitSet::with_capacity(pattern_size);
    for u in &decomposition.core {
        core.insert(u.index());
    }
    let core_paths = tree_paths(tree, &core, root);
    if core_paths.is_empty() {
        seq.push(root);
        placed.insert(root.index());
    } else {
        extend_with_paths(index, tree, core_paths, &mut seq, &mut placed);
    }
    let core_len = seq.len();

    for members in &decomposition.forest {
        let mut set = FixedBitSet::with_capacity(pattern_size);
        for u in members {
            set.insert(u.index());
        }
        let Some(&top) = members.iter().find(|u| decomposition.in_core(**u)) else {
            continue;
        };
        let paths = tree_paths(tree, &set, top);
        extend_with_paths(index, tree, paths, &mut seq, &mut placed);
    }

    MatchingOrder { seq, core_len }
}
