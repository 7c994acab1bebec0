//! Labeled subgraph matching with pluggable compatibility predicates.
//!
//! [`for_each_embedding`] enumerates every embedding (label- and
//! edge-preserving injective mapping, non-induced) of a pattern into a data
//! graph, depth-first, one pattern vertex at a time. The search always prunes
//! by vertex label, degree and injectivity; the caller's vertex and edge
//! predicates narrow it further. Each completed mapping is handed to a
//! callback that decides whether the search continues.
//!
//! Pattern vertices are visited in a connected order: after the root, the next
//! vertex is the unvisited one with the most already-visited neighbors, so
//! every candidate list after the first is drawn from the neighborhood of an
//! already-mapped vertex. The recursion is an explicit stack of per-depth
//! candidate lists.

use std::ops::ControlFlow;

use fixedbitset::FixedBitSet;

use gfd_core::{AttributedGraph, VertexId};

/// Summary of one matcher invocation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchRun {
    /// Number of complete embeddings handed to the callback.
    pub embeddings: u64,
    /// `true` if the callback stopped the search.
    pub stopped: bool,
}

/// Per-depth plan entry: the pattern vertex placed at this depth, the mapped
/// neighbor its candidates are drawn from, and every earlier neighbor with the
/// pattern edge label that must be matched.
struct Step<'p> {
    vertex: VertexId,
    pivot: Option<VertexId>,
    back: Vec<(VertexId, &'p str)>,
}

/// Computes a connected matching order starting at `root`.
fn plan(pattern: &AttributedGraph, root: VertexId) -> Vec<Step<'_>> {
    let n = pattern.vertex_count();
    let mut placed = FixedBitSet::with_capacity(n);
    let mut placed_neighbors = vec![0usize; n];
    let mut steps = Vec::with_capacity(n);

    let mut next = Some(root);
    while let Some(u) = next {
        let mut pivot = None;
        let mut back = Vec::new();
        for (w, label) in pattern.incident(u) {
            if placed.contains(w.index()) {
                pivot.get_or_insert(w);
                back.push((w, label));
            }
        }
        placed.insert(u.index());
        for w in pattern.neighbors(u) {
            placed_neighbors[w.index()] += 1;
        }
        steps.push(Step {
            vertex: u,
            pivot,
            back,
        });

        // most placed neighbors, then highest degree, then lowest id
        next = pattern
            .vertices()
            .filter(|w| !placed.contains(w.index()))
            .max_by(|a, b| {
                placed_neighbors[a.index()]
                    .cmp(&placed_neighbors[b.index()])
                    .then(pattern.degree(*a).cmp(&pattern.degree(*b)))
                    .then(b.cmp(a))
            });
    }
    steps
}

/// Default root: first vertex of maximum degree.
fn default_root(pattern: &AttributedGraph) -> Option<VertexId> {
    pattern
        .vertices()
        .max_by(|a, b| pattern.degree(*a).cmp(&pattern.degree(*b)).then(b.cmp(a)))
}

/// Enumerates embeddings of `pattern` into `data`.
///
/// `root` fixes the first pattern vertex of the matching order (the
/// distributed validator passes its center). `vertex_compat(u, v)` and
/// `edge_compat(pattern_label, data_label)` are checked in addition to label
/// equality. The callback receives the mapping indexed by pattern vertex.
///
/// An empty pattern has no embeddings.
pub fn for_each_embedding<VC, EC, F>(
    pattern: &AttributedGraph,
    data: &AttributedGraph,
    root: Option<VertexId>,
    vertex_compat: VC,
    edge_compat: EC,
    mut on_embedding: F,
) -> MatchRun
where
    VC: Fn(VertexId, VertexId) -> bool,
    EC: Fn(&str, &str) -> bool,
    F: FnMut(&[VertexId]) -> ControlFlow<()>,
{
    let mut run = MatchRun::default();
    let Some(root) = root.or_else(|| default_root(pattern)) else {
        return run;
    };
    let n = pattern.vertex_count();
    if root.index() >= n || n > data.vertex_count() {
        return run;
    }
    let steps = plan(pattern, root);

    let mut mapping = vec![VertexId(0); n];
    let mut used = FixedBitSet::with_capacity(data.vertex_count());
    let mut candidates: Vec<Vec<VertexId>> = vec![Vec::new(); n];
    let mut cursor = vec![0usize; n];

    let generate = |step: &Step<'_>, mapping: &[VertexId], used: &FixedBitSet| {
        let u = step.vertex;
        let label = pattern.label(u);
        let degree = pattern.degree(u);
        let feasible = |v: VertexId| {
            !used.contains(v.index())
                && data.label(v) == label
                && data.degree(v) >= degree
                && vertex_compat(u, v)
                && step.back.iter().all(|&(w, pattern_label)| {
                    data.edge_label(v, mapping[w.index()])
                        .is_some_and(|data_label| edge_compat(pattern_label, data_label))
                })
        };
        match step.pivot {
            Some(p) => data
                .neighbors(mapping[p.index()])
                .filter(|&v| feasible(v))
                .collect::<Vec<_>>(),
            None => data
                .vertices_with_label(label)
                .iter()
                .copied()
                .filter(|&v| feasible(v))
                .collect::<Vec<_>>(),
        }
    };

    candidates[0] = generate(&steps[0], &mapping, &used);
    let mut depth = 0;
    loop {
        if cursor[depth] < candidates[depth].len() {
            let v = candidates[depth][cursor[depth]];
            cursor[depth] += 1;
            let u = steps[depth].vertex;
            mapping[u.index()] = v;

            if depth + 1 == n {
                run.embeddings += 1;
                if on_embedding(&mapping).is_break() {
                    run.stopped = true;
                    return run;
                }
                continue;
            }
            used.insert(v.index());
            depth += 1;
            candidates[depth] = generate(&steps[depth], &mapping, &used);
            cursor[depth] = 0;
        } else {
            if depth == 0 {
                break;
            }
            depth -= 1;
            let u = steps[depth].vertex;
            used.set(mapping[u.index()].index(), false);
        }
    }
    run
}

/// Vertex predicate accepting every pair; label equality is enforced by the
/// matcher itself.
pub fn any_vertex(_: VertexId, _: VertexId) -> bool {
    true
}

/// Edge predicate requiring equal labels.
pub fn labels_equal(pattern_label: &str, data_label: &str) -> bool {
    pattern_label == data_label
}

/// Vertex predicate forcing `center -> candidate`. Other pattern vertices are
/// unconstrained beyond the matcher's own label check; injectivity keeps them
/// off `candidate`.
pub fn pinned(center: VertexId, candidate: VertexId) -> impl Fn(VertexId, VertexId) -> bool {
    move |u, v| u != center || v == candidate
}
