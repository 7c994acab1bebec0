//! Center-based parallel validator.
//!
//! Each GFD's pattern is anchored at a *center*, a vertex of minimum
//! eccentricity. Every data vertex carrying the center's label is a candidate,
//! and each candidate becomes one unit of work ("message") that runs the
//! matcher with the center pinned to it.
//!
//! Work runs in two phases on `P` scoped threads:
//! 1. message generation: candidates are split into `P` contiguous chunks;
//!    each worker weighs its candidates by the size of the radius-`r` ball
//!    around them (vertices plus internal edges);
//! 2. matching: the weights are balanced across `P` bins and each worker runs
//!    pinned matching over its messages, recording violated GFDs.
//!
//! The violated sets are merged after the final join.

use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::ops::{ControlFlow, Range};

use petgraph::algo::dijkstra;

use gfd_core::{AttributedGraph, Gfd, VertexId};

use crate::balancer::balance;
use crate::error::ValidationError;
use crate::matcher::{for_each_embedding, labels_equal, pinned};
use crate::pool::run_phase;
use crate::report::{trivially_holds, Outcome, ValidationStats};

/// Candidates of one GFD assigned to one worker.
struct Request<'a> {
    gfd: usize,
    center: VertexId,
    radius: usize,
    candidates: &'a [VertexId],
}

/// One pinned matching task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Message {
    gfd: usize,
    center: VertexId,
    candidate: VertexId,
}

/// Returns `(center, radius)` of a connected pattern: the first vertex (in id
/// order) whose eccentricity equals the minimum eccentricity.
pub fn pattern_center(pattern: &AttributedGraph) -> Option<(VertexId, usize)> {
    let mut best: Option<(VertexId, usize)> = None;
    for u in pattern.vertices() {
        let distances = dijkstra(pattern.inner(), u.into(), None, |_| 1usize);
        let eccentricity = distances.values().copied().max().unwrap_or(0);
        if best.map_or(true, |(_, radius)| eccentricity < radius) {
            best = Some((u, eccentricity));
        }
    }
    best
}

/// Splits `0..len` into `parts` contiguous ranges whose sizes differ by at
/// most one; the first `len % parts` ranges are the longer ones.
fn chunk_ranges(len: usize, parts: usize) -> impl Iterator<Item = Range<usize>> {
    let base = len / parts;
    let extra = len % parts;
    (0..parts).scan(0, move |start, i| {
        let size = base + usize::from(i < extra);
        let range = *start..*start + size;
        *start += size;
        Some(range)
    })
}

/// Ball weight around `candidate`: vertices within `radius` hops plus the
/// edges among them, each counted once.
///
/// `stamp` is scratch space of length `data.vertex_count()`, reused across
/// calls with increasing `epoch`.
fn ball_weight(
    data: &AttributedGraph,
    candidate: VertexId,
    radius: usize,
    stamp: &mut [u32],
    epoch: u32,
) -> usize {
    let mut ball = vec![candidate];
    stamp[candidate.index()] = epoch;
    let mut frontier = 0;
    for _ in 0..radius {
        let level_end = ball.len();
        if frontier == level_end {
            break;
        }
        for i in frontier..level_end {
            let v = ball[i];
            for w in data.neighbors(v) {
                if stamp[w.index()] != epoch {
                    stamp[w.index()] = epoch;
                    ball.push(w);
                }
            }
        }
        frontier = level_end;
    }
    let internal_edges = ball
        .iter()
        .map(|&v| {
            data.neighbors(v)
                .filter(|&w| w > v && stamp[w.index()] == epoch)
                .count()
        })
        .sum::<usize>();
    ball.len() + internal_edges
}

/// Phase 1 worker: weighs every candidate of every request.
fn generate_messages(
    data: &AttributedGraph,
    requests: Vec<Request<'_>>,
) -> BTreeMap<usize, Vec<Message>> {
    let mut stamp = vec![0u32; data.vertex_count()];
    let mut epoch = 0u32;
    let mut by_weight: BTreeMap<usize, Vec<Message>> = BTreeMap::new();
    for request in requests {
        for &candidate in request.candidates {
            epoch = epoch.wrapping_add(1);
            if epoch == 0 {
                stamp.iter_mut().for_each(|s| *s = 0);
                epoch = 1;
            }
            let weight = ball_weight(data, candidate, request.radius, &mut stamp, epoch);
            by_weight.entry(weight).or_default().push(Message {
                gfd: request.gfd,
                center: request.center,
                candidate,
            });
        }
    }
    by_weight
}

/// Phase 2 worker: pinned matching over a balanced message list.
fn match_messages(
    data: &AttributedGraph,
    gfds: &[Gfd],
    messages: Vec<Message>,
) -> (BTreeSet<usize>, ValidationStats) {
    let mut unsatisfied = BTreeSet::new();
    let mut stats = ValidationStats::default();
    for message in messages {
        if unsatisfied.contains(&message.gfd) {
            continue;
        }
        let gfd = &gfds[message.gfd];
        let run = for_each_embedding(
            gfd.pattern(),
            data,
            Some(message.center),
            pinned(message.center, message.candidate),
            labels_equal,
            |embedding| {
                if gfd.satisfied_by(data, embedding) {
                    ControlFlow::Continue(())
                } else {
                    ControlFlow::Break(())
                }
            },
        );
        stats.matcher_runs += 1;
        stats.embeddings_checked += run.embeddings;
        if run.stopped {
            unsatisfied.insert(message.gfd);
        }
    }
    (unsatisfied, stats)
}

/// Validates `gfds` on `threads` workers.
pub fn validate_distributed(
    data: &AttributedGraph,
    gfds: &[Gfd],
    threads: usize,
) -> Result<(Vec<Outcome>, ValidationStats), ValidationError> {
    if threads == 0 {
        return Err(ValidationError::InvalidThreadCount { got: threads });
    }

    // Requests: per GFD, the center's candidates split across workers.
    let mut requests: Vec<Vec<Request<'_>>> = (0..threads).map(|_| Vec::new()).collect();
    for (index, gfd) in gfds.iter().enumerate() {
        if trivially_holds(gfd, data) {
            continue;
        }
        let Some((center, radius)) = pattern_center(gfd.pattern()) else {
            continue;
        };
        let candidates = data.vertices_with_label(gfd.pattern().label(center));
        tracing::debug!(
            "GFD {}: center {} radius {} candidates {}",
            index,
            center,
            radius,
            candidates.len()
        );
        for (worker, range) in chunk_ranges(candidates.len(), threads).enumerate() {
            if !range.is_empty() {
                requests[worker].push(Request {
                    gfd: index,
                    center,
                    radius,
                    candidates: &candidates[range],
                });
            }
        }
    }

    let generated = run_phase("message generation", requests, |reqs| {
        Ok(generate_messages(data, reqs))
    })?;

    // Merge in worker order; equal weights keep queue order.
    let mut merged: BTreeMap<usize, VecDeque<Message>> = BTreeMap::new();
    for by_weight in generated {
        for (weight, messages) in by_weight {
            merged.entry(weight).or_default().extend(messages);
        }
    }
    let weights: Vec<usize> = merged
        .iter()
        .flat_map(|(&weight, queue)| std::iter::repeat(weight).take(queue.len()))
        .collect();
    let bins = balance(&weights, threads);
    let assigned: Vec<Vec<Message>> = bins
        .into_iter()
        .map(|bin| {
            bin.into_iter()
                .filter_map(|weight| merged.get_mut(&weight).and_then(VecDeque::pop_front))
                .collect()
        })
        .collect();
    tracing::debug!(
        "Balanced {} messages (total weight {}) over {} threads: loads {:?}",
        weights.len(),
        weights.iter().sum::<usize>(),
        threads,
        assigned.iter().map(Vec::len).collect::<Vec<_>>()
    );

    let matched = run_phase("matching", assigned, |messages| {
        Ok(match_messages(data, gfds, messages))
    })?;

    let mut unsatisfied = BTreeSet::new();
    let mut stats = ValidationStats::default();
    for (violated, worker_stats) in matched {
        unsatisfied.extend(violated);
        stats += worker_stats;
    }
    tracing::debug!("Checked embeddings: {}", stats.embeddings_checked);

    let outcomes = (0..gfds.len())
        .map(|i| {
            if unsatisfied.contains(&i) {
                Outcome::Violated
            } else {
                Outcome::Holds
            }
        })
        .collect();
    Ok((outcomes, stats))
}
