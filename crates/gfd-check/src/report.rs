//! Validation outcomes and run statistics.

use std::ops::AddAssign;

use serde::{Deserialize, Serialize};

use gfd_core::{AttributedGraph, Gfd};

use crate::config::Strategy;

/// Terminal outcome of checking one GFD.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// No embedding satisfies the premises while violating the conclusion.
    Holds,
    /// A counterexample embedding was found.
    Violated,
}

impl Outcome {
    pub fn holds(self) -> bool {
        self == Outcome::Holds
    }
}

/// Work counters accumulated over a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationStats {
    /// Invocations of the matching primitive or the CPI enumerator.
    pub matcher_runs: u64,
    /// Complete embeddings evaluated against premises and conclusion.
    pub embeddings_checked: u64,
}

impl AddAssign for ValidationStats {
    fn add_assign(&mut self, other: Self) {
        self.matcher_runs += other.matcher_runs;
        self.embeddings_checked += other.embeddings_checked;
    }
}

/// Result of validating a GFD set with one strategy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationReport {
    pub strategy: Strategy,
    pub threads: usize,
    /// One outcome per input GFD, in input order.
    pub outcomes: Vec<Outcome>,
    pub stats: ValidationStats,
}

impl ValidationReport {
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    pub fn satisfied_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.holds()).count()
    }

    /// Input positions of the satisfied GFDs, ascending.
    pub fn satisfied_indices(&self) -> Vec<usize> {
        self.outcomes
            .iter()
            .enumerate()
            .filter(|(_, o)| o.holds())
            .map(|(i, _)| i)
            .collect()
    }
}

/// A GFD whose pattern is empty or uses a label absent from `data` has no
/// embedding and holds without searching.
pub(crate) fn trivially_holds(gfd: &Gfd, data: &AttributedGraph) -> bool {
    gfd.pattern().is_empty() || gfd.labels_absent_from(data)
}
