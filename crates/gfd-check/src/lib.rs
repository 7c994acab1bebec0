//! Validation of graph functional dependencies against a data graph.
//!
//! Three interchangeable validators sit behind one entry point,
//! [`validate`], which returns the satisfied subset of a GFD set;
//! [`validate_report`] also returns per-GFD outcomes and work counters.
//!
//! # Modules
//!
//! - [`matcher`]: subgraph matching primitive (non-induced embeddings)
//! - [`naive`]: one exhaustive matcher run per GFD
//! - [`distributed`]: center-pinned matching balanced over worker threads
//! - [`cpi`]: candidate path index construction and ordered enumeration
//! - [`balancer`]: bin packing of weighted work items
//! - [`pool`]: scoped worker phases with panic capture
//! - [`config`]: strategy and thread count, from the environment
//! - [`synthetic`]: seeded random workloads

pub mod balancer;
pub mod config;
pub mod cpi;
pub mod distributed;
pub mod error;
pub mod matcher;
pub mod naive;
pub mod pool;
pub mod report;
pub mod synthetic;
pub mod validate;

pub use config::{Strategy, ValidatorConfig};
pub use error::ValidationError;
pub use report::{Outcome, ValidationReport, ValidationStats};
pub use validate::{validate, validate_report};
