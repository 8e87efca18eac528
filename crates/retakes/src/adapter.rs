//! Host adapter: turns engine callbacks into scheduler calls.
//!
//! The flow for every callback is the same:
//!   1. Run the scheduler to completion against the host's answers
//!   2. Dispatch the returned commands to the host, in order
//!
//! The host only ever sees commands after the scheduler has returned,
//! so nothing it does while handling one can reenter the queue.

use retakes_protocol::{Notice, PlayerId, Team};
use retakes_queue::{
    Command, PlayerOracle, PriorityClassifier, QueueConfig, QueueScheduler,
    QueueStatus, TeamChange, Verdict,
};
use tracing::{debug, trace};

use crate::RetakesError;

/// Everything the queue needs from the game engine.
///
/// The query half comes from [`PlayerOracle`] and
/// [`PriorityClassifier`]; the methods below are the side-effect sinks.
/// All of them are fire-and-forget.
pub trait Host: PlayerOracle + PriorityClassifier {
    /// Show a notice to a player (chat, HUD, ...).
    fn notify(&mut self, player: PlayerId, notice: &Notice);

    /// Move a player onto a playing side.
    fn assign_team(&mut self, player: PlayerId, team: Team);

    /// Kill a player in the current round.
    fn slay(&mut self, player: PlayerId);

    /// Force a player onto the spectator team.
    fn move_to_spectator(&mut self, player: PlayerId);

    /// Membership changed; check whether the round can proceed.
    fn check_round_completion(&mut self) {}
}

/// Owns a [`QueueScheduler`] and the [`Host`] it drives.
///
/// Rebalancing (`update`) runs on every membership event while no round
/// is live, at both round boundaries, and on [`Self::tick`]. While a
/// round is live, membership events only touch the roster; queued
/// players wait for the next boundary.
pub struct RetakesAdapter<H: Host> {
    scheduler: QueueScheduler,
    host: H,
}

impl<H: Host> RetakesAdapter<H> {
    /// Creates an adapter with a fresh scheduler.
    ///
    /// # Errors
    /// Returns [`RetakesError::Queue`] if the config is out of range.
    pub fn new(config: QueueConfig, host: H) -> Result<Self, RetakesError> {
        Ok(Self {
            scheduler: QueueScheduler::new(config)?,
            host,
        })
    }

    pub fn scheduler(&self) -> &QueueScheduler {
        &self.scheduler
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn status(&self) -> QueueStatus {
        self.scheduler.status()
    }

    /// Engine hook: a player tries to change team. The returned verdict
    /// tells the engine whether to apply the change.
    pub fn player_team_change(
        &mut self,
        player: PlayerId,
        from: Team,
        to: Team,
        warmup: bool,
    ) -> Verdict {
        let change = TeamChange {
            player,
            from,
            to,
            warmup,
        };
        let outcome = self.scheduler.on_team_change(change, &self.host);
        debug!(
            %player,
            %from,
            %to,
            verdict = ?outcome.verdict,
            state = ?outcome.state,
            "team change resolved"
        );
        self.dispatch(outcome.commands);
        self.rebalance_between_rounds();
        outcome.verdict
    }

    /// Engine hook: a player disconnected.
    pub fn player_disconnected(&mut self, player: PlayerId) {
        let commands = self.scheduler.on_player_disconnect(player);
        self.dispatch(commands);
        self.rebalance_between_rounds();
    }

    /// Administrative removal (kick, ban, manual unqueue).
    pub fn remove_player(&mut self, player: PlayerId) {
        let commands = self.scheduler.remove_player(player);
        self.dispatch(commands);
        self.rebalance_between_rounds();
    }

    /// Engine hook: a new round is about to start.
    ///
    /// Promotes first so newcomers have their side before the lock is
    /// captured.
    pub fn round_start(&mut self) {
        self.tick();
        self.scheduler.on_round_start(&self.host);
    }

    /// Engine hook: the round ended.
    pub fn round_end(&mut self) {
        self.scheduler.on_round_end();
        self.tick();
    }

    /// Runs a full rebalance and dispatches the result.
    pub fn tick(&mut self) {
        let commands = self.scheduler.update(&self.host, &self.host);
        self.dispatch(commands);
    }

    fn rebalance_between_rounds(&mut self) {
        if !self.scheduler.phase().is_live() {
            self.tick();
        }
    }

    /// Hands every command to the host, in order.
    fn dispatch(&mut self, commands: Vec<Command>) {
        for command in commands {
            trace!(?command, "dispatching");
            match command {
                Command::Notify { player, notice } => {
                    self.host.notify(player, &notice);
                }
                Command::AssignTeam { player, team } => {
                    self.host.assign_team(player, team);
                }
                Command::Slay { player } => {
                    self.host.slay(player);
                }
                Command::MoveToSpectator { player } => {
                    self.host.move_to_spectator(player);
                }
                Command::CheckRoundCompletion => {
                    self.host.check_round_completion();
                }
            }
        }
    }
}
