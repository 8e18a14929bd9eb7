//! Data-driven game balance
//!
//! Every balance number lives here so a build can swap the whole table
//! (e.g. for a demo mode or a difficulty experiment) without touching
//! the sim. `Default` is the shipped balance. Durations are expressed
//! in milliseconds and converted to ticks at the point of use so the
//! table stays readable.

use serde::{Deserialize, Serialize};

use crate::consts::TICK_HZ;
use crate::ticks_from_ms;

/// Tunable balance constants, read once at `GameState` construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tuning {
    /// Base player speed (units per tick, before class multiplier)
    pub player_speed: f32,
    /// Player bullet speed (units per tick)
    pub bullet_speed: f32,

    /// Base enemy spawn period (ms, before level scaling)
    pub enemy_spawn_ms: u32,
    /// Per-level gain on the enemy spawn rate: period = base / (1 + level * gain)
    pub spawn_rate_level_gain: f32,
    /// Power-up spawn period (ms, level-independent)
    pub powerup_spawn_ms: u32,
    /// Enemy fire period (ms, shared by all subtypes)
    pub enemy_fire_ms: u32,

    /// Base enemy fall speed (units per tick, before subtype/level scaling)
    pub base_enemy_speed: f32,
    /// Power-up fall speed (units per tick)
    pub powerup_fall_speed: f32,

    /// Score threshold factor: level-up at score >= level * this
    pub level_up_score: u32,
    /// Score deducted when an enemy escapes off the bottom edge
    pub offscreen_penalty: u32,

    /// Bomb area-of-effect radius (units)
    pub bomb_blast_radius: f32,
    /// Flat damage applied to every enemy inside the blast
    pub bomb_blast_damage: i32,

    /// Resource meter decay per tick
    pub blood_sugar_decay: f32,
    /// Resource meter refill per power-up collected
    pub blood_sugar_refill: f32,

    /// Shots added by a triple-shot power-up
    pub triple_shot_charges: u32,

    /// Playing time required for the survivor achievement (ms)
    pub survivor_ms: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            player_speed: 8.0,
            bullet_speed: 12.0,
            enemy_spawn_ms: 1500,
            spawn_rate_level_gain: 0.45,
            powerup_spawn_ms: 10_000,
            enemy_fire_ms: 1000,
            base_enemy_speed: 2.0,
            powerup_fall_speed: 2.0,
            level_up_score: 500,
            offscreen_penalty: 50,
            bomb_blast_radius: 250.0,
            bomb_blast_damage: 5,
            blood_sugar_decay: 0.02,
            blood_sugar_refill: 20.0,
            triple_shot_charges: 30,
            survivor_ms: 60_000,
        }
    }
}

impl Tuning {
    /// Enemy spawn period in ticks at the given level. The rate climbs
    /// monotonically with level; the period never drops below one tick.
    pub fn enemy_spawn_period(&self, level: u32) -> u32 {
        let ms = self.enemy_spawn_ms as f32
            / (1.0 + level as f32 * self.spawn_rate_level_gain);
        ((ms / 1000.0 * TICK_HZ as f32).round() as u32).max(1)
    }

    /// Power-up spawn period in ticks (level-independent)
    pub fn powerup_spawn_period(&self) -> u32 {
        ticks_from_ms(self.powerup_spawn_ms).max(1)
    }

    /// Enemy fire period in ticks
    pub fn enemy_fire_period(&self) -> u32 {
        ticks_from_ms(self.enemy_fire_ms).max(1)
    }

    /// Survivor achievement threshold in ticks
    pub fn survivor_ticks(&self) -> u64 {
        ticks_from_ms(self.survivor_ms) as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enemy_spawn_period_scales_with_level() {
        let t = Tuning::default();
        // level 10: 1500ms / (1 + 10 * 0.45) = 272.7ms -> 16 ticks
        assert_eq!(t.enemy_spawn_period(10), 16);
        // level 1: 1500 / 1.45 = 1034.5ms -> 62 ticks
        assert_eq!(t.enemy_spawn_period(1), 62);
        // monotonically decreasing period
        for level in 1..30 {
            assert!(t.enemy_spawn_period(level + 1) <= t.enemy_spawn_period(level));
        }
        assert!(t.enemy_spawn_period(10_000) >= 1);
    }

    #[test]
    fn test_fixed_periods() {
        let t = Tuning::default();
        assert_eq!(t.powerup_spawn_period(), 600);
        assert_eq!(t.enemy_fire_period(), 60);
        assert_eq!(t.survivor_ticks(), 3600);
    }
}
