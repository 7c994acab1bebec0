//! Validation error types.
//!
//! Model-level failures (parse errors, malformed GFDs) come from gfd-core and
//! are wrapped unchanged. The remaining variants cover run configuration and
//! worker failures in the parallel validator.

use gfd_core::CoreError;

/// Errors produced while validating a GFD set.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("thread count must be at least 1, got {got}")]
    InvalidThreadCount { got: usize },

    #[error("invalid value for {key}: {message}")]
    InvalidConfig { key: String, message: String },

    /// A worker thread panicked. The phase was still fully joined.
    #[error("worker panicked during {phase}: {message}")]
    WorkerPanicked { phase: String, message: String },

    #[error(transparent)]
    Core(#[from] CoreError),
}
