//! Tokens and literals: the attribute-equality constraints of a GFD.
//!
//! A [`Token`] names either an attribute of a pattern vertex (resolved through
//! an embedding into the data graph) or a constant string. A [`Literal`] holds
//! when both of its tokens resolve to equal strings.
//!
//! Resolution is open-world: a missing attribute resolves to `None`, which
//! makes the literal (and any literal list containing it) unsatisfied rather
//! than raising an error.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::graph::AttributedGraph;
use crate::id::VertexId;

/// One side of a literal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Token {
    /// Attribute `attribute` of pattern vertex `index`.
    Vertex { index: usize, attribute: String },
    /// A constant value.
    Constant(String),
}

impl Token {
    pub fn vertex(index: usize, attribute: impl Into<String>) -> Self {
        Token::Vertex {
            index,
            attribute: attribute.into(),
        }
    }

    pub fn constant(value: impl Into<String>) -> Self {
        Token::Constant(value.into())
    }

    /// Pattern vertex referenced by this token, if any.
    pub fn vertex_index(&self) -> Option<usize> {
        match self {
            Token::Vertex { index, .. } => Some(*index),
            Token::Constant(_) => None,
        }
    }

    /// Resolves the token under `embedding` (pattern vertex index -> data
    /// vertex).
    ///
    /// Returns `None` when the mapped data vertex lacks the attribute, or when
    /// the index is outside the embedding.
    pub fn resolve<'a>(
        &'a self,
        data: &'a AttributedGraph,
        embedding: &[VertexId],
    ) -> Option<&'a str> {
        match self {
            Token::Constant(value) => Some(value.as_str()),
            Token::Vertex { index, attribute } => {
                let v = *embedding.get(*index)?;
                data.vertex(v)?.attribute(attribute)
            }
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Vertex { index, attribute } => write!(f, "{}.{}", index, attribute),
            Token::Constant(value) => write!(f, "{}", value),
        }
    }
}

/// An equality constraint `lhs = rhs`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Literal {
    pub lhs: Token,
    pub rhs: Token,
}

impl Literal {
    pub fn new(lhs: Token, rhs: Token) -> Self {
        Literal { lhs, rhs }
    }

    /// Returns `true` if both sides resolve and are equal.
    pub fn holds(&self, data: &AttributedGraph, embedding: &[VertexId]) -> bool {
        match (
            self.lhs.resolve(data, embedding),
            self.rhs.resolve(data, embedding),
        ) {
            (Some(lhs), Some(rhs)) => lhs == rhs,
            _ => false,
        }
    }

    /// Pattern vertices referenced by either side.
    pub fn vertex_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.lhs
            .vertex_index()
            .into_iter()
            .chain(self.rhs.vertex_index())
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.lhs, self.rhs)
    }
}

/// Resolves `token` under `embedding`; `None` if the attribute is absent.
pub fn literal_value<'a>(
    token: &'a Token,
    data: &'a AttributedGraph,
    embedding: &[VertexId],
) -> Option<&'a str> {
    token.resolve(data, embedding)
}

/// Returns `true` if every literal holds under `embedding`.
///
/// An empty list is vacuously satisfied.
pub fn literals_satisfied(
    literals: &[Literal],
    data: &AttributedGraph,
    embedding: &[VertexId],
) -> bool {
    literals.iter().all(|l| l.holds(data, embedding))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Edge, Vertex};

    fn data() -> AttributedGraph {
        let mut g = AttributedGraph::new();
        let a = g.add_vertex(Vertex::new("person").with_attribute("name", "Ann"));
        let b = g.add_vertex(
            Vertex::new("blog")
                .with_attribute("author", "Ann")
                .with_attribute("topic", "rust"),
        );
        let c = g.add_vertex(Vertex::new("person"));
        g.add_edge(a, b, Edge::new("post")).unwrap();
        g.add_edge(c, b, Edge::new("like")).unwrap();
        g
    }

    #[test]
    fn constant_resolves_to_itself() {
        let g = data();
        let t = Token::constant("rust");
        assert_eq!(literal_value(&t, &g, &[]), Some("rust"));
    }

    #[test]
    fn vertex_token_follows_embedding() {
        let g = data();
        let t = Token::vertex(1, "author");
        // pattern vertex 1 -> data vertex 1
        assert_eq!(t.resolve(&g, &[VertexId(0), VertexId(1)]), Some("Ann"));
        // pattern vertex 1 -> data vertex 0 has no author
        assert_eq!(t.resolve(&g, &[VertexId(1), VertexId(0)]), None);
    }

    #[test]
    fn missing_attribute_fails_literal() {
        let g = data();
        let literal = Literal::new(Token::vertex(0, "name"), Token::vertex(1, "author"));
        assert!(literal.holds(&g, &[VertexId(0), VertexId(1)]));
        // data vertex 2 has no name: unsatisfied, not an error
        assert!(!literal.holds(&g, &[VertexId(2), VertexId(1)]));
    }

    #[test]
    fn empty_literal_list_is_vacuously_true() {
        let g = data();
        assert!(literals_satisfied(&[], &g, &[]));
    }

    #[test]
    fn all_literals_must_hold() {
        let g = data();
        let embedding = [VertexId(0), VertexId(1)];
        let ok = Literal::new(Token::vertex(0, "name"), Token::vertex(1, "author"));
        let topic = Literal::new(Token::vertex(1, "topic"), Token::constant("rust"));
        let wrong = Literal::new(Token::vertex(1, "topic"), Token::constant("go"));
        assert!(literals_satisfied(&[ok.clone(), topic.clone()], &g, &embedding));
        assert!(!literals_satisfied(&[ok, topic, wrong], &g, &embedding));
    }

    #[test]
    fn label_is_a_readable_attribute() {
        let g = data();
        let literal = Literal::new(Token::vertex(0, "label"), Token::constant("person"));
        assert!(literal.holds(&g, &[VertexId(2)]));
    }

    #[test]
    fn display_matches_text_format() {
        let literal = Literal::new(Token::vertex(0, "name"), Token::constant("Ann"));
        assert_eq!(literal.to_string(), "0.name=Ann");
    }

    #[test]
    fn vertex_indices_lists_both_sides() {
        let literal = Literal::new(Token::vertex(2, "a"), Token::vertex(0, "b"));
        assert_eq!(literal.vertex_indices().collect::<Vec<_>>(), vec![2, 0]);
        let constant = Literal::new(Token::constant("x"), Token::constant("x"));
        assert_eq!(constant.vertex_indices().count(), 0);
    }
}
