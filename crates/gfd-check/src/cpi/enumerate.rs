//! Backtracking enumeration over the candidate path index.
//!
//! Each position of the matching order owns a slot iterating the candidates
//! it may take: the root's candidate set, or the link set of the vertex's
//! parent assignment. A candidate is accepted when it is unused and every
//! non-tree edge to an already assigned neighbor exists in the data graph
//! with the same label. Slots are advanced within a half-open range of
//! positions so the core and the forest can be driven separately.

use std::collections::btree_set;
use std::collections::BTreeSet;

use fixedbitset::FixedBitSet;

use gfd_core::{AttributedGraph, VertexId};

use super::index::CandidateIndex;
use super::order::MatchingOrder;
use super::tree::BfsTree;

static NO_CANDIDATES: BTreeSet<VertexId> = BTreeSet::new();

struct Slot<'a> {
    iter: btree_set::Iter<'a, VertexId>,
    current: Option<VertexId>,
}

pub struct Enumerator<'a> {
    data: &'a AttributedGraph,
    index: &'a CandidateIndex,
    seq: &'a [VertexId],
    parent: Vec<Option<VertexId>>,
    /// Per position: earlier non-parent pattern neighbors and the edge label
    /// each must share with the candidate.
    checks: Vec<Vec<(VertexId, &'a str)>>,
    slots: Vec<Slot<'a>>,
    mapping: Vec<VertexId>,
    used: FixedBitSet,
}

impl<'a> Enumerator<'a> {
    pub fn new(
        pattern: &'a AttributedGraph,
        data: &'a AttributedGraph,
        tree: &BfsTree,
        index: &'a CandidateIndex,
        order: &'a MatchingOrder,
    ) -> Self {
        let seq = order.seq.as_slice();
        let parent: Vec<Option<VertexId>> = seq.iter().map(|&u| tree.parent(u)).collect();
        let checks = seq
            .iter()
            .enumerate()
            .map(|(i, &u)| {
                seq[..i]
                    .iter()
                    .filter(|&&w| Some(w) != parent[i])
                    .filter_map(|&w| pattern.edge_label(w, u).map(|label| (w, label)))
                    .collect()
            })
            .collect();
        let slots = seq
            .iter()
            .map(|_| Slot {
                iter: NO_CANDIDATES.iter(),
                current: None,
            })
            .collect();

        Enumerator {
            data,
            index,
            seq,
            parent,
            checks,
            slots,
            mapping: vec![VertexId(0); pattern.vertex_count()],
            used: FixedBitSet::with_capacity(data.vertex_count()),
        }
    }

    /// Current assignment indexed by pattern vertex. Only positions assigned
    /// so far hold meaningful values.
    pub fn mapping(&self) -> &[VertexId] {
        &self.mapping
    }

    fn release(&mut self, pos: usize) {
        if let Some(v) = self.slots[pos].current.take() {
            self.used.set(v.index(), false);
        }
    }

    fn reset(&mut self, pos: usize) {
        self.release(pos);
        let index = self.index;
        let u = self.seq[pos];
        let source = match self.parent[pos] {
            None => index.candidates(u),
            Some(p) => index
                .linked(u, self.mapping[p.index()])
                .unwrap_or(&NO_CANDIDATES),
        };
        self.slots[pos].iter = source.iter();
    }

    fn acceptable(&self, pos: usize, v: VertexId) -> bool {
        !self.used.contains(v.index())
            && self.checks[pos].iter().all(|&(w, label)| {
                self.data.edge_label(self.mapping[w.index()], v) == Some(label)
            })
    }

    /// Moves slot `pos` to its next acceptable candidate.
    fn advance(&mut self, pos: usize) -> bool {
        self.release(pos);
        while let Some(&v) = self.slots[pos].iter.next() {
            if self.acceptable(pos, v) {
                self.slots[pos].current = Some(v);
                self.used.insert(v.index());
                self.mapping[self.seq[pos].index()] = v;
                return true;
            }
        }
        false
    }

    /// Produces the next complete assignment of positions `lo..hi`, keeping
    /// earlier positions fixed.
    ///
    /// With `resume == false` the range is searched from the start;
    /// otherwise the search continues after the previous assignment. An
    /// empty range yields exactly one (empty) assignment.
    pub fn next_in_range(&mut self, lo: usize, hi: usize, resume: bool) -> bool {
        if lo == hi {
            return !resume;
        }
        let mut pos = if resume {
            hi - 1
        } else {
            self.reset(lo);
            lo
        };
        loop {
            if self.advance(pos) {
                if pos + 1 == hi {
                    return true;
                }
                pos += 1;
                self.reset(pos);
            } else if pos == lo {
                return false;
            } else {
                pos -= 1;
            }
        }
    }

    /// Frees the data vertices held by positions `lo..hi`.
    pub fn release_range(&mut self, lo: usize, hi: usize) {
        for pos in lo..hi {
            self.release(pos);
        }
    }
}
