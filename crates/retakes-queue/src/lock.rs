//! Per-round snapshot of which active players are on which side.

use std::collections::HashSet;

use retakes_protocol::{PlayerId, Team};
use tracing::debug;

use crate::{PlayerOracle, RosterState};

/// The two captured sides of a locked round.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LockedSides {
    pub terrorists: HashSet<PlayerId>,
    pub counter_terrorists: HashSet<PlayerId>,
}

impl LockedSides {
    /// The locked members of `side`. `None` for non-playing teams.
    pub fn side(&self, side: Team) -> Option<&HashSet<PlayerId>> {
        match side {
            Team::Terrorist => Some(&self.terrorists),
            Team::CounterTerrorist => Some(&self.counter_terrorists),
            Team::None | Team::Spectator => None,
        }
    }
}

/// Frozen side assignments for the duration of a round.
///
/// Either unlocked or holding both captured sides; there is no
/// half-captured state.
#[derive(Debug, Clone, Default)]
pub struct RoundTeamLock {
    sides: Option<LockedSides>,
}

impl RoundTeamLock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshots the side of every active player.
    ///
    /// No-op when `enabled` is false. Active players the engine has on
    /// neither playing side end up in neither set.
    pub fn capture(
        &mut self,
        roster: &RosterState,
        oracle: &impl PlayerOracle,
        enabled: bool,
    ) {
        if !enabled {
            return;
        }

        let mut sides = LockedSides::default();
        for player in roster.active().copied() {
            match oracle.team(player) {
                Team::Terrorist => {
                    sides.terrorists.insert(player);
                }
                Team::CounterTerrorist => {
                    sides.counter_terrorists.insert(player);
                }
                Team::None | Team::Spectator => {}
            }
        }

        debug!(
            terrorists = sides.terrorists.len(),
            counter_terrorists = sides.counter_terrorists.len(),
            "round teams locked"
        );
        self.sides = Some(sides);
    }

    pub fn clear(&mut self) {
        self.sides = None;
    }

    /// Returns `true` once both sides have been captured with at least
    /// one player each. An empty capture does not restrict anyone.
    pub fn is_populated(&self) -> bool {
        self.sides.as_ref().is_some_and(|s| {
            !s.terrorists.is_empty() && !s.counter_terrorists.is_empty()
        })
    }

    pub fn sides(&self) -> Option<&LockedSides> {
        self.sides.as_ref()
    }

    /// Whether `player` may sit on `side` this round.
    ///
    /// Always `true` while the lock is not populated. Once populated, a
    /// player may only take the side they were captured on.
    pub fn permits(&self, player: &PlayerId, side: Team) -> bool {
        if !self.is_populated() {
            return true;
        }
        self.sides
            .as_ref()
            .and_then(|s| s.side(side))
            .is_some_and(|members| members.contains(player))
    }

    /// Drops the player from both sides. Returns `true` if they were
    /// locked on either.
    pub fn forget(&mut self, player: &PlayerId) -> bool {
        match &mut self.sides {
            Some(sides) => {
                let t = sides.terrorists.remove(player);
                let ct = sides.counter_terrorists.remove(player);
                t || ct
            }
            None => false,
        }
    }
}
