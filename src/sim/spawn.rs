//! Time-driven entity spawner
//!
//! Two independent tick timers: enemies on a level-scaled cadence,
//! power-ups on a fixed one. Both re-arm on every entry to the Playing
//! phase, so a level-up immediately picks up the faster enemy cadence.

use serde::{Deserialize, Serialize};

use crate::sim::state::{Enemy, GameState, PowerUp};

/// Countdown timers for the two spawn streams
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Spawner {
    /// Ticks until the next enemy spawn
    pub enemy_timer: u32,
    /// Ticks until the next power-up spawn
    pub powerup_timer: u32,
}

impl Spawner {
    /// Re-arm both timers, re-reading the enemy period from the
    /// current level. Called on every transition into Playing.
    pub fn rearm(&mut self, tuning: &crate::tuning::Tuning, level: u32) {
        self.enemy_timer = tuning.enemy_spawn_period(level);
        self.powerup_timer = tuning.powerup_spawn_period();
    }
}

/// Advance both timers by one tick, spawning on expiry. Only called
/// while Playing, so neither timer moves during pause or menus.
pub(crate) fn run(state: &mut GameState) {
    state.spawner.enemy_timer = state.spawner.enemy_timer.saturating_sub(1);
    if state.spawner.enemy_timer == 0 {
        let camp = state.formation.enemy_camp();
        let enemy = Enemy::spawn(
            &mut state.rng,
            state.bounds,
            state.level,
            camp,
            &state.tuning,
        );
        log::debug!(
            "spawned {:?} enemy ({:?} camp) at x={:.0}, hp={}",
            enemy.kind,
            enemy.camp,
            enemy.pos.x,
            enemy.health
        );
        state.enemies.push(enemy);
        state.spawner.enemy_timer = state.tuning.enemy_spawn_period(state.level);
    }

    state.spawner.powerup_timer = state.spawner.powerup_timer.saturating_sub(1);
    if state.spawner.powerup_timer == 0 {
        let powerup = PowerUp::spawn(&mut state.rng, state.bounds, &state.tuning);
        log::debug!("spawned {:?} power-up at x={:.0}", powerup.kind, powerup.pos.x);
        state.powerups.push(powerup);
        state.spawner.powerup_timer = state.tuning.powerup_spawn_period();
    }
}
