//! Tracing subscriber setup for hosts and demos.

use tracing_subscriber::EnvFilter;

use crate::RetakesError;

/// Installs a global fmt subscriber.
///
/// `RUST_LOG` wins when set; otherwise `default_filter` (e.g. `"info"`
/// or `"retakes_queue=debug"`) is used.
///
/// # Errors
/// Returns [`RetakesError::Logging`] if the filter does not parse or a
/// global subscriber is already installed.
pub fn init(default_filter: &str) -> Result<(), RetakesError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(default_filter)
            .map_err(|e| RetakesError::Logging(e.to_string()))?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .map_err(|e| RetakesError::Logging(e.to_string()))
}
