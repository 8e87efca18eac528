//! The single owner of all queue state.

use retakes_protocol::PlayerId;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::{
    AllocationEngine, Command, MembershipController, Outcome, PlayerOracle,
    PlayerState, PriorityClassifier, QueueConfig, QueueError, RosterState,
    RoundPhase, RoundTeamLock, TeamChange,
};

/// A snapshot of queue metadata for status displays and logging.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueueStatus {
    pub phase: RoundPhase,
    pub active: usize,
    pub waiting: usize,
    pub max_active: usize,
    pub target_terrorists: usize,
    pub target_counter_terrorists: usize,
    pub locked: bool,
}

/// Owns the roster, the round lock and the config.
///
/// Every entry point runs to completion and returns the commands the
/// host must carry out. The scheduler is not reentrant: the host must
/// finish dispatching one call's commands before making the next call.
///
/// ## Lifecycle
///
/// ```text
/// on_team_change / on_player_disconnect / update   (any time)
/// on_round_start ──→ [Live, lock captured] ──→ on_round_end ──→ [Pending]
/// ```
#[derive(Debug)]
pub struct QueueScheduler {
    config: QueueConfig,
    roster: RosterState,
    lock: RoundTeamLock,
    phase: RoundPhase,
}

impl QueueScheduler {
    /// Creates a scheduler after checking the config.
    ///
    /// # Errors
    /// Returns [`QueueError::InvalidConfig`] if any value is outside its
    /// documented range. Use [`QueueConfig::validated`] first to clamp
    /// instead of rejecting.
    pub fn new(config: QueueConfig) -> Result<Self, QueueError> {
        config.validate()?;
        info!(
            max_active = config.max_active_players,
            ratio = config.terrorist_ratio,
            lock = config.prevent_mid_round_team_changes,
            "queue scheduler created"
        );
        Ok(Self {
            config,
            roster: RosterState::new(),
            lock: RoundTeamLock::new(),
            phase: RoundPhase::Pending,
        })
    }

    pub fn config(&self) -> &QueueConfig {
        &self.config
    }

    pub fn roster(&self) -> &RosterState {
        &self.roster
    }

    pub fn lock(&self) -> &RoundTeamLock {
        &self.lock
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    fn engine(&self) -> AllocationEngine<'_> {
        AllocationEngine::new(&self.config)
    }

    // -----------------------------------------------------------------------
    // Membership events
    // -----------------------------------------------------------------------

    /// Resolves a team-change attempt from the engine hook.
    pub fn on_team_change(
        &mut self,
        change: TeamChange,
        oracle: &impl PlayerOracle,
    ) -> Outcome {
        MembershipController::new(&self.config).handle_team_change(
            &mut self.roster,
            &self.lock,
            change,
            oracle,
        )
    }

    /// Forgets a player who disconnected.
    pub fn on_player_disconnect(&mut self, player: PlayerId) -> Vec<Command> {
        debug!(%player, "player disconnected");
        self.remove_player(player)
    }

    /// Removes a player from the roster and the round lock.
    pub fn remove_player(&mut self, player: PlayerId) -> Vec<Command> {
        MembershipController::new(&self.config).remove_from_all(
            &mut self.roster,
            &mut self.lock,
            player,
        )
    }

    /// Prunes, promotes and reorders. See [`AllocationEngine::update`].
    pub fn update(
        &mut self,
        oracle: &impl PlayerOracle,
        classifier: &impl PriorityClassifier,
    ) -> Vec<Command> {
        let engine = AllocationEngine::new(&self.config);
        let (pruned, commands) = engine.update(&mut self.roster, oracle, classifier);
        for player in &pruned {
            self.lock.forget(player);
        }
        commands
    }

    // -----------------------------------------------------------------------
    // Round lifecycle
    // -----------------------------------------------------------------------

    /// Locks the current side assignments for the round.
    ///
    /// A start without a matching end replaces the stale lock.
    pub fn on_round_start(&mut self, oracle: &impl PlayerOracle) {
        if !self.phase.can_transition_to(RoundPhase::Live) {
            warn!("round started while previous round still live, relocking");
            self.lock.clear();
        }
        self.lock.capture(
            &self.roster,
            oracle,
            self.config.prevent_mid_round_team_changes,
        );
        self.phase = RoundPhase::Live;
        info!(
            active = self.roster.active_count(),
            waiting = self.roster.waiting_count(),
            "round started"
        );
    }

    /// Releases the round lock.
    pub fn on_round_end(&mut self) {
        if !self.phase.can_transition_to(RoundPhase::Pending) {
            debug!("round end without a live round, ignoring");
            return;
        }
        self.lock.clear();
        self.phase = RoundPhase::Pending;
        info!("round ended");
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    pub fn target_terrorist_count(&self) -> usize {
        self.engine().target_terrorist_count(&self.roster)
    }

    pub fn target_counter_terrorist_count(&self) -> usize {
        self.engine().target_counter_terrorist_count(&self.roster)
    }

    pub fn state_of(&self, player: &PlayerId) -> PlayerState {
        self.roster.state_of(player)
    }

    pub fn queue_position(&self, player: &PlayerId) -> Option<usize> {
        self.roster.queue_position(player)
    }

    /// Active players, sorted by id.
    pub fn active_players(&self) -> Vec<PlayerId> {
        let mut players: Vec<PlayerId> = self.roster.active().copied().collect();
        players.sort();
        players
    }

    /// Waiting players, front of the queue first.
    pub fn waiting_players(&self) -> Vec<PlayerId> {
        self.roster.waiting_snapshot()
    }

    pub fn status(&self) -> QueueStatus {
        QueueStatus {
            phase: self.phase,
            active: self.roster.active_count(),
            waiting: self.roster.waiting_count(),
            max_active: self.config.max_active_players,
            target_terrorists: self.target_terrorist_count(),
            target_counter_terrorists: self.target_counter_terrorist_count(),
            locked: self.lock.is_populated(),
        }
    }
}
