//! Unified error type for Retakes.

use retakes_queue::QueueError;

/// Top-level error that wraps the crate-specific errors.
///
/// The `#[from]` attribute on each variant generates a `From` impl, so
/// `?` converts sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum RetakesError {
    /// The queue rejected its configuration.
    #[error(transparent)]
    Queue(#[from] QueueError),

    /// The tracing subscriber could not be installed.
    #[error("logging init failed: {0}")]
    Logging(String),
}
