//! Candidate path index construction and refinement.
//!
//! For every pattern vertex `u` the index keeps a candidate set `C(u)` of data
//! vertices. For every non-root `u` with tree parent `p`, it keeps links
//! `N(p, u)`: for each `x` in `C(p)`, the candidates of `u` adjacent to `x`
//! through an edge with the pattern edge's label.
//!
//! Construction runs top-down over the BFS levels; refinement runs bottom-up
//! and then sweeps top-down once more so that, afterwards:
//! - every link key of `u` is a candidate of `parent(u)`;
//! - every link target of `u` is a candidate of `u`;
//! - every candidate of a non-root `u` is a link target from some parent candidate;
//! - every candidate has a non-empty link set toward each tree child.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use fixedbitset::FixedBitSet;

use gfd_core::{AttributedGraph, VertexId};

use super::filter::{cand_verify, label_degree_ok};
use super::tree::BfsTree;

pub type Links = BTreeMap<VertexId, BTreeSet<VertexId>>;

#[derive(Debug, Clone, Default)]
pub struct CandidateIndex {
    candidates: Vec<BTreeSet<VertexId>>,
    links: Vec<Links>,
}

/// Counts, over several rounds, the data vertices reachable from every
/// round's source set. A vertex survives only if it was hit in each round.
struct RoundCounter {
    counts: HashMap<VertexId, usize>,
    rounds: usize,
}

impl RoundCounter {
    fn new() -> Self {
        RoundCounter {
            counts: HashMap::new(),
            rounds: 0,
        }
    }

    /// One round: every data neighbor of `sources` that can host `u`.
    fn round<'a>(
        &mut self,
        data: &AttributedGraph,
        pattern: &AttributedGraph,
        u: VertexId,
        sources: impl IntoIterator<Item = &'a VertexId>,
    ) {
        let k = self.rounds;
        for &x in sources {
            for y in data.neighbors(x) {
                if !label_degree_ok(data, y, pattern, u) {
                    continue;
                }
                let seen = self.counts.get(&y).copied().unwrap_or(0);
                if seen == k {
                    self.counts.insert(y, k + 1);
                }
            }
        }
        self.rounds += 1;
    }

    fn hit_every_round(&self, y: VertexId) -> bool {
        self.counts.get(&y).copied().unwrap_or(0) == self.rounds
    }
}

impl CandidateIndex {
    /// Top-down construction over the tree levels.
    pub fn build(pattern: &AttributedGraph, data: &AttributedGraph, tree: &BfsTree) -> Self {
        let n = pattern.vertex_count();
        let mut index = CandidateIndex {
            candidates: vec![BTreeSet::new(); n],
            links: vec![Links::new(); n],
        };

        let root = tree.root();
        index.candidates[root.index()] = data
            .vertices_with_label(pattern.label(root))
            .iter()
            .copied()
            .filter(|&v| label_degree_ok(data, v, pattern, root) && cand_verify(data, v, pattern, root))
            .collect();

        let mut visited = FixedBitSet::with_capacity(n);
        visited.insert(root.index());
        let mut pending_same_level: Vec<Vec<VertexId>> = vec![Vec::new(); n];

        for level in tree.levels().iter().skip(1) {
            for &u in level {
                let mut counter = RoundCounter::new();
                for w in pattern.neighbors(u) {
                    if visited.contains(w.index()) {
                        counter.round(data, pattern, u, &index.candidates[w.index()]);
                    } else if tree.is_same_level_non_tree(pattern, u, w) {
                        pending_same_level[u.index()].push(w);
                    }
                }
                let found: BTreeSet<VertexId> = counter
                    .counts
                    .keys()
                    .copied()
                    .filter(|&y| counter.hit_every_round(y) && cand_verify(data, y, pattern, u))
                    .collect();
                index.candidates[u.index()] = found;
                visited.insert(u.index());
            }

            for &u in level.iter().rev() {
                let pending = &pending_same_level[u.index()];
                if pending.is_empty() {
                    continue;
                }
                let mut counter = RoundCounter::new();
                for &w in pending {
                    counter.round(data, pattern, u, &index.candidates[w.index()]);
                }
                index.candidates[u.index()].retain(|&y| counter.hit_every_round(y));
            }

            for &u in level {
                let Some(p) = tree.parent(u) else { continue };
                let Some(edge_label) = pattern.edge_label(p, u) else { continue };
                let targets = &index.candidates[u.index()];
                let mut links = Links::new();
                for &x in &index.candidates[p.index()] {
                    let linked: BTreeSet<VertexId> = data
                        .incident(x)
                        .filter(|&(y, label)| label == edge_label && targets.contains(&y))
                        .map(|(y, _)| y)
                        .collect();
                    if !linked.is_empty() {
                        links.insert(x, linked);
                    }
                }
                index.links[u.index()] = links;
            }
        }

        index
    }

    /// Bottom-up refinement followed by a top-down sweep of unreachable
    /// candidates.
    pub fn refine(&mut self, pattern: &AttributedGraph, data: &AttributedGraph, tree: &BfsTree) {
        for level in tree.levels().iter().rev() {
            for &u in level {
                let children = tree.children(u);
                if children.is_empty() {
                    continue;
                }

                let mut counter = RoundCounter::new();
                for &c in children {
                    counter.round(data, pattern, u, &self.candidates[c.index()]);
                }

                for &c in children {
                    let targets = &self.candidates[c.index()];
                    self.links[c.index()].retain(|_, linked| {
                        linked.retain(|y| targets.contains(y));
                        !linked.is_empty()
                    });
                }

                let links = &self.links;
                let removed: Vec<VertexId> = self.candidates[u.index()]
                    .iter()
                    .copied()
                    .filter(|x| {
                        !counter.hit_every_round(*x)
                            || children
                                .iter()
                                .any(|c| !links[c.index()].contains_key(x))
                    })
                    .collect();
                for x in removed {
                    self.candidates[u.index()].remove(&x);
                    for &c in children {
                        self.links[c.index()].remove(&x);
                    }
                }
            }
        }

        for level in tree.levels().iter().skip(1) {
            for &u in level {
                let Some(p) = tree.parent(u) else { continue };
                let parents = &self.candidates[p.index()];
                let mut reachable = BTreeSet::new();
                self.links[u.index()].retain(|x, linked| {
                    if parents.contains(x) {
                        reachable.extend(linked.iter().copied());
                        true
                    } else {
                        false
                    }
                });
                self.candidates[u.index()].retain(|y| reachable.contains(y));
            }
        }
    }

    pub fn candidates(&self, u: VertexId) -> &BTreeSet<VertexId> {
        &self.candidates[u.index()]
    }

    /// Links from parent candidates to candidates of `u`.
    pub fn links(&self, u: VertexId) -> &Links {
        &self.links[u.index()]
    }

    /// Candidates of `u` linked from `parent_candidate`, if any.
    pub fn linked(&self, u: VertexId, parent_candidate: VertexId) -> Option<&BTreeSet<VertexId>> {
        self.links[u.index()].get(&parent_candidate)
    }

    pub fn total_candidates(&self) -> usize {
        self.candidates.iter().map(BTreeSet::len).sum()
    }

    #[cfg(test)]
    pub(crate) fn entry_count(&self, u: VertexId) -> usize {
        self.links[u.index()].len()
    }
}
