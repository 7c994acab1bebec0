//! Naive validator: one unrestricted matcher run per GFD.
//!
//! Every embedding of the pattern in the whole data graph is checked; the
//! search stops at the first counterexample. This is the ground truth the
//! other validators are tested against.

use std::ops::ControlFlow;

use gfd_core::{AttributedGraph, Gfd};

use crate::matcher::{any_vertex, for_each_embedding, labels_equal};
use crate::report::{trivially_holds, Outcome, ValidationStats};

/// Checks a single GFD against `data`.
pub fn check_gfd(data: &AttributedGraph, gfd: &Gfd) -> (Outcome, ValidationStats) {
    let mut stats = ValidationStats::default();
    if trivially_holds(gfd, data) {
        return (Outcome::Holds, stats);
    }

    let run = for_each_embedding(
        gfd.pattern(),
        data,
        None,
        any_vertex,
        labels_equal,
        |embedding| {
            if gfd.satisfied_by(data, embedding) {
                ControlFlow::Continue(())
            } else {
                ControlFlow::Break(())
            }
        },
    );
    stats.matcher_runs = 1;
    stats.embeddings_checked = run.embeddings;
    tracing::debug!("Checked embeddings: {}", run.embeddings);

    let outcome = if run.stopped {
        Outcome::Violated
    } else {
        Outcome::Holds
    };
    (outcome, stats)
}

/// Checks every GFD sequentially.
pub fn validate_naive(data: &AttributedGraph, gfds: &[Gfd]) -> (Vec<Outcome>, ValidationStats) {
    let mut stats = ValidationStats::default();
    let outcomes = gfds
        .iter()
        .map(|gfd| {
            let (outcome, gfd_stats) = check_gfd(data, gfd);
            stats += gfd_stats;
            outcome
        })
        .collect();
    (outcomes, stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gfd_core::{Edge, Literal, Token, Vertex};

    /// Two `person -- city` pairs; the second person lives in a city whose
    /// country disagrees with the person's nationality.
    fn residents() -> AttributedGraph {
        let mut g = AttributedGraph::new();
        let ann = g.add_vertex(Vertex::new("person").with_attribute("nationality", "FR"));
        let paris = g.add_vertex(Vertex::new("city").with_attribute("country", "FR"));
        let bob = g.add_vertex(Vertex::new("person").with_attribute("nationality", "DE"));
        let lyon = g.add_vertex(Vertex::new("city").with_attribute("country", "FR"));
        g.add_edge(ann, paris, Edge::new("lives_in")).unwrap();
        g.add_edge(bob, lyon, Edge::new("lives_in")).unwrap();
        g
    }

    fn lives_in(premises: Vec<Literal>, conclusion: Vec<Literal>) -> Gfd {
        let mut p = AttributedGraph::new();
        let person = p.add_vertex(Vertex::new("person"));
        let city = p.add_vertex(Vertex::new("city"));
        p.add_edge(person, city, Edge::new("lives_in")).unwrap();
        Gfd::new(p, premises, conclusion).unwrap()
    }

    fn same_country() -> Literal {
        Literal::new(Token::vertex(0, "nationality"), Token::vertex(1, "country"))
    }

    #[test]
    fn finds_counterexample() {
        let (outcome, stats) = check_gfd(&residents(), &lives_in(vec![], vec![same_country()]));
        assert_eq!(outcome, Outcome::Violated);
        assert_eq!(stats.matcher_runs, 1);
    }

    #[test]
    fn premises_filter_embeddings() {
        let premise = Literal::new(Token::vertex(0, "nationality"), Token::constant("FR"));
        let (outcome, stats) = check_gfd(&residents(), &lives_in(vec![premise], vec![same_country()]));
        assert_eq!(outcome, Outcome::Holds);
        assert_eq!(stats.embeddings_checked, 2);
    }

    #[test]
    fn missing_attribute_skips_embedding() {
        let premise = Literal::new(Token::vertex(0, "age"), Token::constant("30"));
        let (outcome, _) = check_gfd(&residents(), &lives_in(vec![premise], vec![same_country()]));
        assert_eq!(outcome, Outcome::Holds);
    }

    #[test]
    fn absent_label_holds_without_search() {
        let mut p = AttributedGraph::new();
        p.add_vertex(Vertex::new("planet"));
        let gfd = Gfd::new(
            p,
            vec![],
            vec![Literal::new(Token::constant("a"), Token::constant("b"))],
        )
        .unwrap();
        let (outcome, stats) = check_gfd(&residents(), &gfd);
        assert_eq!(outcome, Outcome::Holds);
        assert_eq!(stats, ValidationStats::default());
    }

    #[test]
    fn validates_in_input_order() {
        let gfds = vec![
            lives_in(vec![], vec![same_country()]),
            lives_in(vec![], vec![]),
        ];
        let (outcomes, stats) = validate_naive(&residents(), &gfds);
        assert_eq!(outcomes, vec![Outcome::Violated, Outcome::Holds]);
        assert_eq!(stats.matcher_runs, 2);
    }
}
