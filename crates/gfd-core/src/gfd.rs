//! The GFD container: a pattern graph plus premise and conclusion literals.
//!
//! A [`Gfd`] holds on a data graph when every embedding of its pattern that
//! satisfies all premises also satisfies all conclusion literals. Construction
//! goes through [`Gfd::new`], which enforces the load-time invariants so the
//! validators never see a token pointing outside the pattern.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::graph::AttributedGraph;
use crate::id::VertexId;
use crate::literal::{literals_satisfied, Literal};

/// A graph functional dependency.
///
/// Deserialization goes through [`Gfd::new`] as well.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "GfdRepr")]
pub struct Gfd {
    pattern: AttributedGraph,
    premises: Vec<Literal>,
    conclusion: Vec<Literal>,
}

#[derive(Deserialize)]
struct GfdRepr {
    pattern: AttributedGraph,
    premises: Vec<Literal>,
    conclusion: Vec<Literal>,
}

impl TryFrom<GfdRepr> for Gfd {
    type Error = CoreError;

    fn try_from(repr: GfdRepr) -> Result<Self, Self::Error> {
        Gfd::new(repr.pattern, repr.premises, repr.conclusion)
    }
}

impl Gfd {
    /// Builds a GFD, checking that
    /// - every vertex token references a vertex of `pattern`,
    /// - `pattern` is connected (the empty pattern is accepted).
    pub fn new(
        pattern: AttributedGraph,
        premises: Vec<Literal>,
        conclusion: Vec<Literal>,
    ) -> Result<Self, CoreError> {
        let size = pattern.vertex_count();
        for literal in premises.iter().chain(conclusion.iter()) {
            if let Some(index) = literal.vertex_indices().find(|&i| i >= size) {
                return Err(CoreError::MalformedGfd {
                    reason: format!(
                        "literal '{}' references vertex {} but the pattern has {} vertices",
                        literal, index, size
                    ),
                });
            }
        }
        if !pattern.is_connected() {
            return Err(CoreError::MalformedGfd {
                reason: "pattern graph is not connected".to_string(),
            });
        }
        Ok(Gfd {
            pattern,
            premises,
            conclusion,
        })
    }

    pub fn pattern(&self) -> &AttributedGraph {
        &self.pattern
    }

    pub fn premises(&self) -> &[Literal] {
        &self.premises
    }

    pub fn conclusion(&self) -> &[Literal] {
        &self.conclusion
    }

    /// Evaluates the dependency on one embedding.
    ///
    /// Returns `false` only for a counterexample: premises hold and the
    /// conclusion does not.
    pub fn satisfied_by(&self, data: &AttributedGraph, embedding: &[VertexId]) -> bool {
        !literals_satisfied(&self.premises, data, embedding)
            || literals_satisfied(&self.conclusion, data, embedding)
    }

    /// Returns `true` if some pattern label does not occur in `data`, in which
    /// case no embedding exists and the GFD holds trivially.
    pub fn labels_absent_from(&self, data: &AttributedGraph) -> bool {
        self.pattern.labels().any(|label| !data.has_label(label))
    }
}
