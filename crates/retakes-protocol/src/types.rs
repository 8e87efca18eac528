//! Core types shared by the queue and the host adapter.
//!
//! None of these types own any game-engine resources. A [`PlayerId`] is
//! only a handle: the engine decides what it refers to, and the queue
//! asks the engine (through traits) whether it is still valid.

use serde::{Deserialize, Serialize};

use std::fmt;

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

/// A unique identifier for a player.
///
/// Newtype over the engine's numeric handle (a slot or user id). Two
/// handles are the same player exactly when the inner values match.
///
/// `#[serde(transparent)]` serializes a `PlayerId(42)` as plain `42`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct PlayerId(pub u64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P-{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Team
// ---------------------------------------------------------------------------

/// The side a player sits on, as the game engine reports it.
///
/// `None` is the state of a freshly connected player who has not yet
/// picked anything. `Spectator` is an explicit choice to watch.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "PascalCase")]
pub enum Team {
    #[default]
    None,
    Spectator,
    Terrorist,
    CounterTerrorist,
}

impl Team {
    /// Returns `true` for the two playing sides.
    pub fn is_playing(&self) -> bool {
        matches!(self, Self::Terrorist | Self::CounterTerrorist)
    }

    /// The opposing playing side. `None` and `Spectator` have no
    /// opponent.
    pub fn opponent(&self) -> Option<Self> {
        match self {
            Self::Terrorist => Some(Self::CounterTerrorist),
            Self::CounterTerrorist => Some(Self::Terrorist),
            Self::None | Self::Spectator => None,
        }
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "None"),
            Self::Spectator => write!(f, "Spectator"),
            Self::Terrorist => write!(f, "Terrorist"),
            Self::CounterTerrorist => write!(f, "CounterTerrorist"),
        }
    }
}

// ---------------------------------------------------------------------------
// Notice
// ---------------------------------------------------------------------------

/// A player-facing notification produced by the queue.
///
/// The queue never formats text itself. Each notice maps to a stable
/// translation key (see [`Notice::translation_key`]) and carries the
/// arguments the host needs to fill in the localized string.
///
/// Internally tagged so a bridge can forward it as
/// `{ "type": "JoinedQueue", "position": 3 }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Notice {
    /// The player was added to the waiting queue. `position` is 1-based.
    JoinedQueue { position: usize },

    /// The active roster is full; the player keeps waiting.
    QueueFull { active: usize, max: usize },

    /// The player holds queue priority and was moved ahead of
    /// non-priority players.
    Prioritized,

    /// A mid-round side switch was refused; the player was sent back to
    /// the queue.
    SwitchBlocked,
}

impl Notice {
    /// The translation key the host looks up for this notice.
    pub fn translation_key(&self) -> &'static str {
        match self {
            Self::JoinedQueue { .. } => "queue.joined",
            Self::QueueFull { .. } => "queue.waiting",
            Self::Prioritized => "queue.prioritized",
            Self::SwitchBlocked => "queue.switch_blocked",
        }
    }
}
