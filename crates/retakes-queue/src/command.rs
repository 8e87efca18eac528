//! Inputs and outputs of the queue's transition functions.
//!
//! Every entry point on the scheduler returns plain data describing what
//! the host should do. Nothing here holds a reference back into the
//! scheduler, so carrying out a command can never mutate the roster.

use retakes_protocol::{Notice, PlayerId, Team};
use serde::{Deserialize, Serialize};

/// A side effect the host must carry out, in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Command {
    /// Show a notice to one player. Fire-and-forget.
    Notify { player: PlayerId, notice: Notice },

    /// Move a player onto a playing side.
    AssignTeam { player: PlayerId, team: Team },

    /// Kill the player in the current round.
    Slay { player: PlayerId },

    /// Force the player onto the spectator team.
    MoveToSpectator { player: PlayerId },

    /// Membership changed; the host should check whether the round can
    /// now proceed (enough players on both sides, etc.).
    CheckRoundCompletion,
}

/// A player's team-change attempt, as reported by the engine hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TeamChange {
    pub player: PlayerId,
    pub from: Team,
    pub to: Team,
    /// Whether the server is in its warmup period.
    pub warmup: bool,
}

/// Whether the engine should let the team change go through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    /// Let the engine apply the change.
    Allow,
    /// Suppress the engine-level change.
    Block,
}

/// Where a player sits from the queue's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerState {
    /// Not tracked at all.
    Unseen,
    /// In the active set.
    Active,
    /// In the waiting queue.
    Waiting,
    /// Left the active set for the spectator team; no longer tracked.
    Spectating,
}

/// The result of resolving a team-change attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub verdict: Verdict,
    pub state: PlayerState,
    pub commands: Vec<Command>,
}

impl Outcome {
    pub(crate) fn new(verdict: Verdict, state: PlayerState) -> Self {
        Self {
            verdict,
            state,
            commands: Vec::new(),
        }
    }

    pub(crate) fn with(mut self, command: Command) -> Self {
        self.commands.push(command);
        self
    }

    /// Returns `true` if the engine should apply the change.
    pub fn is_allowed(&self) -> bool {
        self.verdict == Verdict::Allow
    }
}
