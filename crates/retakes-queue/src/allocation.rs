//! Team-size targets, queue promotion, and priority ordering.
//!
//! The engine is a borrowed view over the config: it holds no state of
//! its own and operates on a [`RosterState`] passed in by exclusive
//! reference. Side effects are appended to a command list; nothing is
//! delivered from in here.

use std::collections::VecDeque;

use retakes_protocol::{Notice, PlayerId, Team};
use tracing::{debug, info, trace};

use crate::{Command, PlayerOracle, PriorityClassifier, QueueConfig, RosterState};

/// The side newly promoted players are placed on.
const PROMOTION_SIDE: Team = Team::CounterTerrorist;

/// Computes targets and moves players between the queue and the active
/// set according to a [`QueueConfig`].
#[derive(Debug, Clone, Copy)]
pub struct AllocationEngine<'a> {
    config: &'a QueueConfig,
}

impl<'a> AllocationEngine<'a> {
    pub fn new(config: &'a QueueConfig) -> Self {
        Self { config }
    }

    // -----------------------------------------------------------------------
    // Targets
    // -----------------------------------------------------------------------

    /// Number of Terrorists a roster of `active` players should have.
    ///
    /// `round(ratio × active)` with halves rounded up, where the ratio
    /// is 0.5 on multiples of ten when even teams are forced. Never 0
    /// once anyone is active.
    pub fn terrorists_for(&self, active: usize) -> usize {
        if active == 0 {
            return 0;
        }
        let ratio = if self.config.force_even_teams_on_multiple_of_ten && active % 10 == 0 {
            0.5
        } else {
            self.config.terrorist_ratio
        };
        // f64::round rounds halves away from zero; inputs are non-negative.
        let target = (ratio * active as f64).round() as usize;
        let target = target.clamp(1, active);
        trace!(active, ratio, target, "terrorist target computed");
        target
    }

    pub fn counter_terrorists_for(&self, active: usize) -> usize {
        active - self.terrorists_for(active)
    }

    pub fn target_terrorist_count(&self, roster: &RosterState) -> usize {
        self.terrorists_for(roster.active_count())
    }

    pub fn target_counter_terrorist_count(&self, roster: &RosterState) -> usize {
        self.counter_terrorists_for(roster.active_count())
    }

    // -----------------------------------------------------------------------
    // Mutations
    // -----------------------------------------------------------------------

    /// Drops every player the oracle no longer reports as valid and
    /// connected. Returns the removed players.
    pub fn prune_disconnected(
        &self,
        roster: &mut RosterState,
        oracle: &impl PlayerOracle,
    ) -> Vec<PlayerId> {
        let removed = roster.retain(|player| oracle.is_present(player));
        for player_id in &removed {
            info!(%player_id, "pruned disconnected player");
        }
        removed
    }

    /// Fills free active slots from the queue, priority holders first.
    ///
    /// Candidates keep their queue order within each priority group.
    /// Candidates that are no longer present are skipped without using
    /// a slot and stay queued until the next prune. Each promoted
    /// player gets an [`Command::AssignTeam`]. Returns the promoted
    /// players in selection order.
    pub fn promote_from_queue(
        &self,
        roster: &mut RosterState,
        oracle: &impl PlayerOracle,
        classifier: &impl PriorityClassifier,
        commands: &mut Vec<Command>,
    ) -> Vec<PlayerId> {
        let slots = self
            .config
            .max_active_players
            .saturating_sub(roster.active_count());
        if slots == 0 || roster.waiting_count() == 0 {
            return Vec::new();
        }

        let (priority, regular): (Vec<PlayerId>, Vec<PlayerId>) = roster
            .waiting()
            .copied()
            .filter(|p| oracle.is_present(*p))
            .partition(|p| self.has_priority(classifier, *p));

        let selected: Vec<PlayerId> =
            priority.into_iter().chain(regular).take(slots).collect();

        for player_id in &selected {
            roster.dequeue(player_id);
            roster.activate(*player_id);
            commands.push(Command::AssignTeam {
                player: *player_id,
                team: PROMOTION_SIDE,
            });
            info!(
                %player_id,
                active = roster.active_count(),
                waiting = roster.waiting_count(),
                "promoted from queue"
            );
        }
        selected
    }

    /// Moves priority holders to the front of a blocked queue.
    ///
    /// Only runs while the active set is full and someone is waiting.
    /// Each priority holder still in the queue is told they are
    /// prioritized. Returns `true` if it ran.
    pub fn reorder_queue_by_priority(
        &self,
        roster: &mut RosterState,
        classifier: &impl PriorityClassifier,
        commands: &mut Vec<Command>,
    ) -> bool {
        if roster.active_count() < self.config.max_active_players
            || roster.waiting_count() == 0
        {
            return false;
        }

        let (priority, regular): (VecDeque<PlayerId>, VecDeque<PlayerId>) = roster
            .waiting()
            .copied()
            .partition(|p| self.has_priority(classifier, *p));

        for player in &priority {
            commands.push(Command::Notify {
                player: *player,
                notice: Notice::Prioritized,
            });
        }
        if !priority.is_empty() {
            debug!(prioritized = priority.len(), "queue reordered by priority");
        }

        let mut order = priority;
        order.extend(regular);
        roster.reorder_waiting(order);
        true
    }

    /// Rebalances the roster: prune, promote, reorder, then tell every
    /// waiting player the queue is full if it is.
    ///
    /// The order matters. Pruning first keeps invalid handles from being
    /// promoted; reordering only makes sense once promotion can no
    /// longer drain the queue; the waiting notice reflects the final
    /// state. Emits a single [`Command::CheckRoundCompletion`] if
    /// membership changed.
    pub fn update(
        &self,
        roster: &mut RosterState,
        oracle: &impl PlayerOracle,
        classifier: &impl PriorityClassifier,
    ) -> (Vec<PlayerId>, Vec<Command>) {
        let mut commands = Vec::new();

        let pruned = self.prune_disconnected(roster, oracle);
        let promoted = self.promote_from_queue(roster, oracle, classifier, &mut commands);
        self.reorder_queue_by_priority(roster, classifier, &mut commands);

        let active = roster.active_count();
        let max = self.config.max_active_players;
        if active >= max && roster.waiting_count() > 0 {
            for player in roster.waiting() {
                commands.push(Command::Notify {
                    player: *player,
                    notice: Notice::QueueFull { active, max },
                });
            }
        }

        if !pruned.is_empty() || !promoted.is_empty() {
            commands.push(Command::CheckRoundCompletion);
        }
        (pruned, commands)
    }

    fn has_priority(&self, classifier: &impl PriorityClassifier, player: PlayerId) -> bool {
        !self.config.priority_tags.is_empty()
            && classifier.has_priority(player, &self.config.priority_tags)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[derive(Default)]
    struct World {
        gone: HashSet<PlayerId>,
        vips: HashSet<PlayerId>,
    }

    impl PlayerOracle for World {
        fn is_valid(&self, _: PlayerId) -> bool {
            true
        }
        fn is_connected(&self, player: PlayerId) -> bool {
            !self.gone.contains(&player)
        }
        fn is_alive(&self, _: PlayerId) -> bool {
            true
        }
        fn team(&self, _: PlayerId) -> Team {
            Team::None
        }
    }

    impl PriorityClassifier for World {
        fn has_priority(&self, player: PlayerId, _tags: &[String]) -> bool {
            self.vips.contains(&player)
        }
    }

    fn pid(id: u64) -> PlayerId {
        PlayerId(id)
    }

    fn config(max: usize) -> QueueConfig {
        QueueConfig {
            max_active_players: max,
            ..QueueConfig::default()
        }
    }

    #[test]
    fn test_terrorist_target_default_ratio() {
        let config = QueueConfig::default();
        let engine = AllocationEngine::new(&config);
        // 0.45 × n, halves up, clamped to at least 1
        let expected = [
            (0, 0),
            (1, 1),
            (2, 1),
            (3, 1),
            (4, 2),
            (5, 2),
            (6, 3),
            (7, 3),
            (8, 4),
            (9, 4),
        ];
        for (n, t) in expected {
            assert_eq!(engine.terrorists_for(n), t, "n = {n}");
            assert_eq!(engine.counter_terrorists_for(n), n - t, "n = {n}");
        }
    }

    #[test]
    fn test_terrorist_target_even_on_multiples_of_ten() {
        let config = QueueConfig::default();
        let engine = AllocationEngine::new(&config);
        for n in [10, 20, 30] {
            assert_eq!(engine.terrorists_for(n), n / 2);
        }
    }

    #[test]
    fn test_terrorist_target_without_forced_even() {
        let config = QueueConfig {
            force_even_teams_on_multiple_of_ten: false,
            terrorist_ratio: 0.3,
            ..QueueConfig::default()
        };
        let engine = AllocationEngine::new(&config);
        assert_eq!(engine.terrorists_for(10), 3);
    }

    #[test]
    fn test_terrorist_target_rounds_half_up() {
        let config = QueueConfig {
            terrorist_ratio: 0.5,
            ..QueueConfig::default()
        };
        let engine = AllocationEngine::new(&config);
        assert_eq!(engine.terrorists_for(3), 2); // 1.5
        assert_eq!(engine.terrorists_for(5), 3); // 2.5
        assert_eq!(engine.terrorists_for(1), 1); // 0.5
    }

    #[test]
    fn test_terrorist_target_bounds_hold_for_all_sizes() {
        let config = QueueConfig {
            terrorist_ratio: 0.05,
            ..QueueConfig::default()
        };
        let engine = AllocationEngine::new(&config);
        for n in 1..=64 {
            let t = engine.terrorists_for(n);
            assert!((1..=n).contains(&t), "n = {n}, t = {t}");
        }
    }

    #[test]
    fn test_prune_is_idempotent_and_keeps_order() {
        let config = config(2);
        let engine = AllocationEngine::new(&config);
        let mut roster = RosterState::new();
        roster.activate(pid(9));
        for id in 1..=4 {
            roster.enqueue(pid(id));
        }
        let world = World {
            gone: HashSet::from([pid(9), pid(2)]),
            ..World::default()
        };

        let removed = engine.prune_disconnected(&mut roster, &world);
        assert_eq!(removed, vec![pid(9), pid(2)]);
        let after_once = roster.waiting_snapshot();

        assert!(engine.prune_disconnected(&mut roster, &world).is_empty());
        assert_eq!(roster.waiting_snapshot(), after_once);
        assert_eq!(after_once, vec![pid(1), pid(3), pid(4)]);
    }

    #[test]
    fn test_promote_priority_first_then_queue_order() {
        let config = config(2);
        let engine = AllocationEngine::new(&config);
        let mut roster = RosterState::new();
        for id in 1..=3 {
            roster.enqueue(pid(id));
        }
        let world = World {
            vips: HashSet::from([pid(2)]),
            ..World::default()
        };

        let mut commands = Vec::new();
        let promoted = engine.promote_from_queue(&mut roster, &world, &world, &mut commands);

        assert_eq!(promoted, vec![pid(2), pid(1)]);
        assert!(roster.is_active(&pid(1)) && roster.is_active(&pid(2)));
        assert_eq!(roster.waiting_snapshot(), vec![pid(3)]);
        assert_eq!(
            commands,
            vec![
                Command::AssignTeam {
                    player: pid(2),
                    team: Team::CounterTerrorist,
                },
                Command::AssignTeam {
                    player: pid(1),
                    team: Team::CounterTerrorist,
                },
            ]
        );
    }

    #[test]
    fn test_promote_skips_absent_candidates_without_using_slots() {
        let config = config(1);
        let engine = AllocationEngine::new(&config);
        let mut roster = RosterState::new();
        roster.enqueue(pid(1));
        roster.enqueue(pid(2));
        let world = World {
            gone: HashSet::from([pid(1)]),
            ..World::default()
        };

        let mut commands = Vec::new();
        let promoted = engine.promote_from_queue(&mut roster, &world, &world, &mut commands);
        assert_eq!(promoted, vec![pid(2)]);
        assert_eq!(roster.waiting_snapshot(), vec![pid(1)]);
    }

    #[test]
    fn test_promote_noop_when_full() {
        let config = config(1);
        let engine = AllocationEngine::new(&config);
        let mut roster = RosterState::new();
        roster.activate(pid(1));
        roster.enqueue(pid(2));

        let mut commands = Vec::new();
        let world = World::default();
        assert!(engine.promote_from_queue(&mut roster, &world, &world, &mut commands).is_empty());
        assert!(commands.is_empty());
        assert_eq!(roster.active_count(), 1);
    }

    #[test]
    fn test_reorder_is_stable_and_preserves_members() {
        let config = config(1);
        let engine = AllocationEngine::new(&config);
        let mut roster = RosterState::new();
        roster.activate(pid(100));
        for id in 1..=6 {
            roster.enqueue(pid(id));
        }
        let world = World {
            vips: HashSet::from([pid(5), pid(2)]),
            ..World::default()
        };

        let mut commands = Vec::new();
        assert!(engine.reorder_queue_by_priority(&mut roster, &world, &mut commands));
        assert_eq!(
            roster.waiting_snapshot(),
            vec![pid(2), pid(5), pid(1), pid(3), pid(4), pid(6)]
        );
        assert_eq!(
            commands,
            vec![
                Command::Notify {
                    player: pid(2),
                    notice: Notice::Prioritized,
                },
                Command::Notify {
                    player: pid(5),
                    notice: Notice::Prioritized,
                },
            ]
        );
        assert!(roster.is_active(&pid(100)));
    }

    #[test]
    fn test_reorder_skipped_while_slots_free() {
        let config = config(3);
        let engine = AllocationEngine::new(&config);
        let mut roster = RosterState::new();
        roster.enqueue(pid(1));
        roster.enqueue(pid(2));
        let world = World {
            vips: HashSet::from([pid(2)]),
            ..World::default()
        };

        let mut commands = Vec::new();
        assert!(!engine.reorder_queue_by_priority(&mut roster, &world, &mut commands));
        assert_eq!(roster.waiting_snapshot(), vec![pid(1), pid(2)]);
        assert!(commands.is_empty());
    }

    #[test]
    fn test_priority_ignored_without_tags() {
        let config = QueueConfig {
            max_active_players: 1,
            priority_tags: Vec::new(),
            ..QueueConfig::default()
        };
        let engine = AllocationEngine::new(&config);
        let mut roster = RosterState::new();
        roster.enqueue(pid(1));
        roster.enqueue(pid(2));
        let world = World {
            vips: HashSet::from([pid(2)]),
            ..World::default()
        };

        let mut commands = Vec::new();
        let promoted = engine.promote_from_queue(&mut roster, &world, &world, &mut commands);
        assert_eq!(promoted, vec![pid(1)]);
    }

    #[test]
    fn test_update_notifies_waiting_when_full() {
        let config = config(2);
        let engine = AllocationEngine::new(&config);
        let mut roster = RosterState::new();
        for id in 1..=4 {
            roster.enqueue(pid(id));
        }
        let world = World::default();

        let (pruned, commands) = engine.update(&mut roster, &world, &world);
        assert!(pruned.is_empty());
        assert_eq!(roster.active_count(), 2);
        assert_eq!(
            commands,
            vec![
                Command::AssignTeam {
                    player: pid(1),
                    team: Team::CounterTerrorist,
                },
                Command::AssignTeam {
                    player: pid(2),
                    team: Team::CounterTerrorist,
                },
                Command::Notify {
                    player: pid(3),
                    notice: Notice::QueueFull { active: 2, max: 2 },
                },
                Command::Notify {
                    player: pid(4),
                    notice: Notice::QueueFull { active: 2, max: 2 },
                },
                Command::CheckRoundCompletion,
            ]
        );
    }

    #[test]
    fn test_update_quiet_when_nothing_changes() {
        let config = config(4);
        let engine = AllocationEngine::new(&config);
        let mut roster = RosterState::new();
        roster.activate(pid(1));
        let world = World::default();

        let (_, commands) = engine.update(&mut roster, &world, &world);
        assert!(commands.is_empty());
    }
}
