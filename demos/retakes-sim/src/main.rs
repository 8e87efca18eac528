use std::collections::{HashMap, HashSet};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use retakes::prelude::*;

// ---------------------------------------------------------------------------
// Simulated server
// ---------------------------------------------------------------------------

#[derive(Clone, Copy)]
struct Slot {
    team: Team,
    alive: bool,
    vip: bool,
}

/// A stand-in for the game engine's player table.
#[derive(Default)]
struct SimServer {
    players: HashMap<PlayerId, Slot>,
    notices: usize,
    slays: usize,
}

impl PlayerOracle for SimServer {
    fn is_valid(&self, player: PlayerId) -> bool {
        self.players.contains_key(&player)
    }

    fn is_connected(&self, player: PlayerId) -> bool {
        self.players.contains_key(&player)
    }

    fn is_alive(&self, player: PlayerId) -> bool {
        self.players.get(&player).is_some_and(|s| s.alive)
    }

    fn team(&self, player: PlayerId) -> Team {
        self.players.get(&player).map(|s| s.team).unwrap_or_default()
    }
}

impl PriorityClassifier for SimServer {
    fn has_priority(&self, player: PlayerId, _tags: &[String]) -> bool {
        self.players.get(&player).is_some_and(|s| s.vip)
    }
}

impl Host for SimServer {
    fn notify(&mut self, player: PlayerId, notice: &Notice) {
        self.notices += 1;
        tracing::debug!(%player, key = notice.translation_key(), ?notice, "notice");
    }

    fn assign_team(&mut self, player: PlayerId, team: Team) {
        if let Some(slot) = self.players.get_mut(&player) {
            slot.team = team;
            slot.alive = true;
        }
    }

    fn slay(&mut self, player: PlayerId) {
        if let Some(slot) = self.players.get_mut(&player) {
            slot.alive = false;
            self.slays += 1;
        }
    }

    fn move_to_spectator(&mut self, player: PlayerId) {
        if let Some(slot) = self.players.get_mut(&player) {
            slot.team = Team::Spectator;
        }
    }
}

// ---------------------------------------------------------------------------
// Driver
// ---------------------------------------------------------------------------

const ROUNDS: u32 = 30;
const SEED: u64 = 0x5245_5441_4b45;

fn main() -> Result<(), RetakesError> {
    retakes::logging::init("info,retakes_queue=info")?;

    let mut rng = StdRng::seed_from_u64(SEED);
    let mut adapter = RetakesAdapter::new(QueueConfig::default(), SimServer::default())?;
    let mut next_id = 1u64;

    for round in 1..=ROUNDS {
        // Between rounds: a few players connect, a few leave.
        for _ in 0..rng.random_range(0..4) {
            let player = PlayerId(next_id);
            next_id += 1;
            adapter.host_mut().players.insert(
                player,
                Slot {
                    team: Team::None,
                    alive: false,
                    vip: rng.random_bool(0.15),
                },
            );
            adapter.player_team_change(player, Team::None, Team::Spectator, false);
            let side = if rng.random_bool(0.5) {
                Team::Terrorist
            } else {
                Team::CounterTerrorist
            };
            adapter.player_team_change(player, Team::Spectator, side, round == 1);
        }

        let connected: Vec<PlayerId> = adapter.host().players.keys().copied().collect();
        for player in connected {
            if rng.random_bool(0.05) {
                adapter.host_mut().players.remove(&player);
                adapter.player_disconnected(player);
            }
        }

        balance_sides(&mut adapter);
        adapter.round_start();

        // Mid-round: somebody occasionally tries to swap sides.
        let active = adapter.scheduler().active_players();
        if !active.is_empty() && rng.random_bool(0.3) {
            let player = active[rng.random_range(0..active.len())];
            let from = adapter.host().team(player);
            if let Some(to) = from.opponent() {
                let verdict = adapter.player_team_change(player, from, to, false);
                tracing::info!(round, %player, %from, %to, ?verdict, "side swap attempt");
            }
        }

        let status = adapter.status();
        tracing::info!(
            round,
            active = status.active,
            waiting = status.waiting,
            t = status.target_terrorists,
            ct = status.target_counter_terrorists,
            "round live"
        );
        adapter.round_end();
    }

    let status = adapter.status();
    let summary = serde_json::json!({
        "rounds": ROUNDS,
        "connected": adapter.host().players.len(),
        "notices": adapter.host().notices,
        "slays": adapter.host().slays,
        "status": status,
    });
    println!("{summary:#}");
    Ok(())
}

/// Moves active players onto T until the target split is reached, the
/// way a retakes plugin balances before the round locks.
fn balance_sides(adapter: &mut RetakesAdapter<SimServer>) {
    let target = adapter.scheduler().target_terrorist_count();
    let active: HashSet<PlayerId> = adapter.scheduler().active_players().into_iter().collect();

    let mut terrorists: Vec<PlayerId> = active
        .iter()
        .copied()
        .filter(|p| adapter.host().team(*p) == Team::Terrorist)
        .collect();
    let mut others: Vec<PlayerId> = active
        .iter()
        .copied()
        .filter(|p| adapter.host().team(*p) != Team::Terrorist)
        .collect();
    terrorists.sort();
    others.sort();

    while terrorists.len() < target {
        let Some(player) = others.pop() else { break };
        adapter.host_mut().assign_team(player, Team::Terrorist);
        terrorists.push(player);
    }
    while terrorists.len() > target {
        let Some(player) = terrorists.pop() else { break };
        adapter.host_mut().assign_team(player, Team::CounterTerrorist);
    }
}
