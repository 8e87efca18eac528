//! The data model: who is playing and who is waiting.

use std::collections::{HashSet, VecDeque};

use retakes_protocol::PlayerId;

use crate::PlayerState;

/// The active set and the waiting queue.
///
/// A player is in at most one of the two (key invariant). All mutators
/// uphold it: inserting into one side is refused while the player sits
/// in the other.
#[derive(Debug, Clone, Default)]
pub struct RosterState {
    /// Players currently assigned to a playing side.
    active: HashSet<PlayerId>,

    /// Players waiting for a slot, front first.
    waiting: VecDeque<PlayerId>,
}

impl RosterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    pub fn waiting_count(&self) -> usize {
        self.waiting.len()
    }

    pub fn is_active(&self, player: &PlayerId) -> bool {
        self.active.contains(player)
    }

    pub fn is_waiting(&self, player: &PlayerId) -> bool {
        self.waiting.contains(player)
    }

    /// Where the player sits. Never returns [`PlayerState::Spectating`]:
    /// spectators are not tracked.
    pub fn state_of(&self, player: &PlayerId) -> PlayerState {
        if self.is_active(player) {
            PlayerState::Active
        } else if self.is_waiting(player) {
            PlayerState::Waiting
        } else {
            PlayerState::Unseen
        }
    }

    /// 1-based position in the waiting queue.
    pub fn queue_position(&self, player: &PlayerId) -> Option<usize> {
        self.waiting.iter().position(|p| p == player).map(|i| i + 1)
    }

    pub fn active(&self) -> impl Iterator<Item = &PlayerId> {
        self.active.iter()
    }

    pub fn waiting(&self) -> impl Iterator<Item = &PlayerId> {
        self.waiting.iter()
    }

    /// Adds a player to the active set. Returns `false` if they were
    /// already active or are currently waiting.
    pub fn activate(&mut self, player: PlayerId) -> bool {
        if self.is_waiting(&player) {
            return false;
        }
        self.active.insert(player)
    }

    pub fn deactivate(&mut self, player: &PlayerId) -> bool {
        self.active.remove(player)
    }

    /// Appends a player to the back of the queue. Returns `false` if
    /// they were already waiting or are currently active.
    pub fn enqueue(&mut self, player: PlayerId) -> bool {
        if self.is_active(&player) || self.is_waiting(&player) {
            return false;
        }
        self.waiting.push_back(player);
        true
    }

    pub fn dequeue(&mut self, player: &PlayerId) -> bool {
        let before = self.waiting.len();
        self.waiting.retain(|p| p != player);
        self.waiting.len() != before
    }

    /// Removes the player from both collections. Returns `true` if
    /// anything changed.
    pub fn remove(&mut self, player: &PlayerId) -> bool {
        let was_active = self.deactivate(player);
        let was_waiting = self.dequeue(player);
        was_active || was_waiting
    }

    /// Keeps only the players for which `keep` returns `true`, in both
    /// collections. Queue order of survivors is preserved. Returns the
    /// removed players, active ones first.
    pub(crate) fn retain(&mut self, mut keep: impl FnMut(PlayerId) -> bool) -> Vec<PlayerId> {
        let mut removed: Vec<PlayerId> =
            self.active.iter().copied().filter(|p| !keep(*p)).collect();
        removed.sort();
        for player in &removed {
            self.active.remove(player);
        }

        let mut survivors = VecDeque::with_capacity(self.waiting.len());
        for player in self.waiting.drain(..) {
            if keep(player) {
                survivors.push_back(player);
            } else {
                removed.push(player);
            }
        }
        self.waiting = survivors;
        removed
    }

    /// Replaces the queue order. The caller guarantees `order` is a
    /// permutation of the current queue.
    pub(crate) fn reorder_waiting(&mut self, order: VecDeque<PlayerId>) {
        debug_assert_eq!(order.len(), self.waiting.len());
        self.waiting = order;
    }

    pub(crate) fn waiting_snapshot(&self) -> Vec<PlayerId> {
        self.waiting.iter().copied().collect()
    }
}
