//! Traits the host implements so the queue can ask about players.
//!
//! The queue never holds engine objects. Whenever it needs to know
//! something about a [`PlayerId`] it asks the host through these
//! traits; the host answers from its own player table.

use retakes_protocol::{PlayerId, Team};

/// Answers questions about a player's connection and in-game state.
///
/// Implementations must be cheap and side-effect free: the queue may
/// call them many times during a single update.
pub trait PlayerOracle {
    /// Returns `true` if the handle still refers to a player object the
    /// engine knows about.
    fn is_valid(&self, player: PlayerId) -> bool;

    /// Returns `true` if the player is still connected.
    fn is_connected(&self, player: PlayerId) -> bool;

    /// Returns `true` if the player is currently alive in the round.
    fn is_alive(&self, player: PlayerId) -> bool;

    /// The side the engine currently has the player on.
    fn team(&self, player: PlayerId) -> Team;

    /// Shorthand for [`Self::is_valid`] and [`Self::is_connected`].
    fn is_present(&self, player: PlayerId) -> bool {
        self.is_valid(player) && self.is_connected(player)
    }
}

/// Decides whether a player holds queue priority.
pub trait PriorityClassifier {
    /// Returns `true` if the player holds any of `tags`.
    fn has_priority(&self, player: PlayerId, tags: &[String]) -> bool;
}
