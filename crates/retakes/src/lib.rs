//! # Retakes
//!
//! Queue-based player allocation for round-based retake servers.
//!
//! The host (a game-engine plugin) implements a single [`Host`] trait
//! and forwards its engine callbacks to a [`RetakesAdapter`]. The adapter
//! runs the queue and carries out the resulting commands through the
//! host: team assignments, slays, notices, and round-completion checks.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use retakes::prelude::*;
//!
//! retakes::logging::init("info")?;
//! let mut adapter = RetakesAdapter::new(QueueConfig::default(), my_host)?;
//!
//! // from the engine's team-change hook:
//! let verdict = adapter.player_team_change(player, from, to, warmup);
//! ```

mod adapter;
mod error;
pub mod logging;

pub use adapter::{Host, RetakesAdapter};
pub use error::RetakesError;

pub mod prelude {
    pub use crate::{Host, RetakesAdapter, RetakesError};
    pub use retakes_protocol::{Notice, PlayerId, Team};
    pub use retakes_queue::{
        Command, PlayerOracle, PlayerState, PriorityClassifier, QueueConfig,
        QueueStatus, RoundPhase, Verdict,
    };
}
