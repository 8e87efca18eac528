//! Resolves team-change attempts against the roster and the round lock.
//!
//! Each call is one transition: it takes the current roster by
//! exclusive reference plus the event, mutates the roster, and returns
//! an [`Outcome`] listing what the host should do.

use retakes_protocol::{Notice, PlayerId, Team};
use tracing::{debug, info, warn};

use crate::{
    Command, Outcome, PlayerOracle, PlayerState, QueueConfig, RosterState,
    RoundTeamLock, TeamChange, Verdict,
};

/// The event-facing state machine for a single player.
///
/// | Current   | Condition                                  | Result                      |
/// |-----------|--------------------------------------------|-----------------------------|
/// | untracked | first contact (`None → Spectator`)         | allow, stays untracked      |
/// | Active    | `→ Spectator`                              | allow, leaves the roster    |
/// | Active    | lock toggle off                            | allow                       |
/// | Active    | lock populated, target side not theirs     | block, re-queued, spectator |
/// | Active    | otherwise                                  | block, stays active         |
/// | Waiting   | anything                                   | block                       |
/// | untracked | warmup and a free slot                     | allow, active               |
/// | untracked | otherwise                                  | block, queued               |
#[derive(Debug, Clone, Copy)]
pub struct MembershipController<'a> {
    config: &'a QueueConfig,
}

impl<'a> MembershipController<'a> {
    pub fn new(config: &'a QueueConfig) -> Self {
        Self { config }
    }

    /// Resolves one team-change attempt.
    pub fn handle_team_change(
        &self,
        roster: &mut RosterState,
        lock: &RoundTeamLock,
        change: TeamChange,
        oracle: &impl PlayerOracle,
    ) -> Outcome {
        let TeamChange {
            player,
            from,
            to,
            warmup,
        } = change;

        if roster.is_active(&player) {
            return self.handle_active(roster, lock, player, to, oracle);
        }

        if roster.is_waiting(&player) {
            debug!(%player, %to, "team change from queued player ignored");
            return Outcome::new(Verdict::Block, PlayerState::Waiting);
        }

        if from == Team::None && to == Team::Spectator {
            return Outcome::new(Verdict::Allow, PlayerState::Unseen);
        }

        if warmup && roster.active_count() < self.config.max_active_players {
            roster.activate(player);
            info!(
                %player,
                active = roster.active_count(),
                "joined active roster during warmup"
            );
            return Outcome::new(Verdict::Allow, PlayerState::Active)
                .with(Command::CheckRoundCompletion);
        }

        roster.enqueue(player);
        let position = roster.waiting_count();
        info!(%player, position, "joined queue");
        Outcome::new(Verdict::Block, PlayerState::Waiting)
            .with(Command::Notify {
                player,
                notice: Notice::JoinedQueue { position },
            })
            .with(Command::CheckRoundCompletion)
    }

    fn handle_active(
        &self,
        roster: &mut RosterState,
        lock: &RoundTeamLock,
        player: PlayerId,
        to: Team,
        oracle: &impl PlayerOracle,
    ) -> Outcome {
        if to == Team::Spectator {
            roster.deactivate(&player);
            info!(
                %player,
                active = roster.active_count(),
                "active player moved to spectator"
            );
            return Outcome::new(Verdict::Allow, PlayerState::Spectating)
                .with(Command::CheckRoundCompletion);
        }

        if !self.config.prevent_mid_round_team_changes {
            return Outcome::new(Verdict::Allow, PlayerState::Active);
        }

        if to.is_playing() && !lock.permits(&player, to) {
            roster.deactivate(&player);
            roster.enqueue(player);
            warn!(%player, %to, "mid-round side switch refused, player re-queued");

            let mut outcome = Outcome::new(Verdict::Block, PlayerState::Waiting);
            if oracle.is_alive(player) {
                outcome = outcome.with(Command::Slay { player });
            }
            return outcome
                .with(Command::MoveToSpectator { player })
                .with(Command::Notify {
                    player,
                    notice: Notice::SwitchBlocked,
                })
                .with(Command::CheckRoundCompletion);
        }

        Outcome::new(Verdict::Block, PlayerState::Active)
    }

    /// Removes a player from the roster and both locked sides.
    ///
    /// Emits [`Command::CheckRoundCompletion`] only when the player was
    /// tracked somewhere; an unknown handle is a silent no-op.
    pub fn remove_from_all(
        &self,
        roster: &mut RosterState,
        lock: &mut RoundTeamLock,
        player: PlayerId,
    ) -> Vec<Command> {
        let in_roster = roster.remove(&player);
        let in_lock = lock.forget(&player);
        if !(in_roster || in_lock) {
            return Vec::new();
        }
        info!(
            %player,
            active = roster.active_count(),
            waiting = roster.waiting_count(),
            "player removed from queue"
        );
        vec![Command::CheckRoundCompletion]
    }
}
