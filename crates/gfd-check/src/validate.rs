//! Engine entry point: strategy dispatch and reporting.

use std::time::Instant;

use gfd_core::{AttributedGraph, Gfd};

use crate::config::{Strategy, ValidatorConfig};
use crate::cpi::validate_index;
use crate::distributed::validate_distributed;
use crate::error::ValidationError;
use crate::naive::validate_naive;
use crate::report::ValidationReport;

/// Validates `gfds` against `data` and returns per-GFD outcomes and stats.
///
/// `config.threads` must be at least 1 for every strategy; only the
/// distributed strategy uses more than one thread.
pub fn validate_report(
    data: &AttributedGraph,
    gfds: &[Gfd],
    config: &ValidatorConfig,
) -> Result<ValidationReport, ValidationError> {
    config.validate()?;
    let started = Instant::now();

    let (outcomes, stats) = match config.strategy {
        Strategy::Naive => validate_naive(data, gfds),
        Strategy::Distributed => validate_distributed(data, gfds, config.threads)?,
        Strategy::Index => validate_index(data, gfds),
    };

    let report = ValidationReport {
        strategy: config.strategy,
        threads: config.threads,
        outcomes,
        stats,
    };
    tracing::info!(
        "{} validator: {}/{} GFDs satisfied in {} ms ({} matcher runs, {} embeddings)",
        report.strategy,
        report.satisfied_count(),
        report.total(),
        started.elapsed().as_millis(),
        report.stats.matcher_runs,
        report.stats.embeddings_checked
    );
    Ok(report)
}

/// Returns the satisfied subset of `gfds`, in input order.
pub fn validate(
    data: &AttributedGraph,
    gfds: &[Gfd],
    strategy: Strategy,
    thread_count: usize,
) -> Result<Vec<Gfd>, ValidationError> {
    let report = validate_report(data, gfds, &ValidatorConfig::new(strategy, thread_count))?;
    Ok(report
        .satisfied_indices()
        .into_iter()
        .map(|i| gfds[i].clone())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use gfd_core::{Edge, Literal, Token, Vertex};

    fn data() -> AttributedGraph {
        let mut g = AttributedGraph::new();
        let a = g.add_vertex(Vertex::new("film").with_attribute("year", "1999"));
        let b = g.add_vertex(Vertex::new("director").with_attribute("name", "W"));
        g.add_edge(a, b, Edge::new("directed_by")).unwrap();
        g
    }

    fn gfd(year: &str) -> Gfd {
        constraint(0, "year", year)
    }

    fn constraint(vertex: usize, attribute: &str, value: &str) -> Gfd {
        let mut p = AttributedGraph::new();
        let f = p.add_vertex(Vertex::new("film"));
        let d = p.add_vertex(Vertex::new("director"));
        p.add_edge(f, d, Edge::new("directed_by")).unwrap();
        Gfd::new(
            p,
            vec![],
            vec![Literal::new(
                Token::vertex(vertex, attribute),
                Token::constant(value),
            )],
        )
        .unwrap()
    }

    #[test]
    fn satisfied_subset_keeps_order() {
        let gfds = vec![gfd("1999"), gfd("2001"), constraint(1, "name", "W")];
        for strategy in Strategy::ALL {
            let satisfied = validate(&data(), &gfds, strategy, 2).unwrap();
            let years: Vec<String> = satisfied
                .iter()
                .map(|gfd| gfd.conclusion()[0].to_string())
                .collect();
            assert_eq!(years, vec!["0.year=1999", "1.name=W"], "{strategy}");
        }
    }

    #[test]
    fn zero_threads_rejected_for_every_strategy() {
        for strategy in Strategy::ALL {
            assert!(matches!(
                validate(&data(), &[gfd("1999")], strategy, 0),
                Err(ValidationError::InvalidThreadCount { got: 0 })
            ));
        }
    }

    #[test]
    fn report_counts() {
        let gfds = vec![gfd("1999"), gfd("2001")];
        let report =
            validate_report(&data(), &gfds, &ValidatorConfig::new(Strategy::Index, 1)).unwrap();
        assert_eq!(report.total(), 2);
        assert_eq!(report.satisfied_count(), 1);
        assert_eq!(report.stats.matcher_runs, 2);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["outcomes"], serde_json::json!(["holds", "violated"]));
        assert_eq!(json["strategy"], "index");
    }
}
