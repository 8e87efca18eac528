//! Error types for the queue layer.
//!
//! Queue operations themselves are total: unknown players are no-ops,
//! not errors. The only failure is building a scheduler from a config
//! that breaks its documented ranges.

/// Errors that can occur when constructing a queue scheduler.
#[derive(Debug, thiserror::Error)]
pub enum QueueError {
    /// A configuration value is outside its documented range.
    #[error("invalid queue config: {0}")]
    InvalidConfig(String),
}
