//! Barrier-synchronized worker phases on scoped OS threads.
//!
//! [`run_phase`] spawns one thread per input, joins every thread before
//! returning, and reports worker panics as [`ValidationError::WorkerPanicked`]
//! instead of unwinding into the caller. Workers only read shared data and
//! return their private output; merging happens on the calling thread.

use std::any::Any;

use crate::error::ValidationError;

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

/// Runs `f` once per input on its own thread.
///
/// Outputs are returned in input order. If any worker fails or panics, the
/// failure of the lowest-indexed worker is returned, after all threads have
/// been joined.
pub fn run_phase<I, O, F>(phase: &str, inputs: Vec<I>, f: F) -> Result<Vec<O>, ValidationError>
where
    I: Send,
    O: Send,
    F: Fn(I) -> Result<O, ValidationError> + Sync,
{
    let f = &f;
    let joined: Vec<Result<O, ValidationError>> = std::thread::scope(|s| {
        let handles: Vec<_> = inputs
            .into_iter()
            .map(|input| s.spawn(move || f(input)))
            .collect();

        handles
            .into_iter()
            .map(|h| match h.join() {
                Ok(result) => result,
                Err(payload) => Err(ValidationError::WorkerPanicked {
                    phase: phase.to_string(),
                    message: panic_message(payload.as_ref()),
                }),
            })
            .collect()
    });
    joined.into_iter().collect()
}
