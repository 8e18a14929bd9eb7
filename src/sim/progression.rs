//! Progression engine
//!
//! Score, level, health, and the resource meter; level-up and
//! game-over transitions; the achievement registry. Everything here
//! mutates `GameState` and queues `GameEvent`s for the presentation
//! bridge. No entity geometry.

use serde::{Deserialize, Serialize};

use crate::sim::state::{GameEvent, GamePhase, GameState, Player, PlayerClass};

/// Achievement ids, fixed by the catalog
pub mod ids {
    pub const FIRST_BLOOD: &str = "first_blood";
    pub const SURVIVOR: &str = "survivor";
    pub const SHARPSHOOTER: &str = "sharpshooter";
    pub const LEVEL_MASTER: &str = "level_master";
    pub const SHIELD_MASTER: &str = "shield_master";
}

/// One achievement. The unlocked flag flips false->true exactly once
/// per session and never reverts; unlocking again is a no-op.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Achievement {
    pub id: String,
    pub name: String,
    pub description: String,
    pub unlocked: bool,
}

impl Achievement {
    fn new(id: &str, name: &str, description: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            unlocked: false,
        }
    }

    /// The full session catalog, all locked
    pub fn catalog() -> Vec<Achievement> {
        vec![
            Achievement::new(ids::FIRST_BLOOD, "First Blood", "Destroy your first enemy craft"),
            Achievement::new(ids::SURVIVOR, "Survivor", "Survive for 60 seconds in a single run"),
            Achievement::new(ids::SHARPSHOOTER, "Sharpshooter", "Reach a score of 1000"),
            Achievement::new(ids::LEVEL_MASTER, "Level Master", "Reach level 5"),
            Achievement::new(ids::SHIELD_MASTER, "Shield Master", "Take a hit with your shield up"),
        ]
    }
}

/// Idempotent unlock: flips the flag and notifies only on the
/// false->true transition.
pub(crate) fn unlock(state: &mut GameState, id: &'static str) {
    let Some(achievement) = state.achievements.iter_mut().find(|a| a.id == id) else {
        log::warn!("unknown achievement id {id:?}");
        return;
    };
    if achievement.unlocked {
        return;
    }
    achievement.unlocked = true;
    log::info!("achievement unlocked: {id}");
    state.push_event(GameEvent::AchievementUnlocked(id));
}

/// Score and bookkeeping for one destroyed enemy. Level-up is NOT
/// checked here; resolution passes check it once after compaction so
/// the wipe-and-increment stays atomic.
pub(crate) fn award_enemy_kill(state: &mut GameState, kind: crate::sim::state::EnemyKind) {
    state.score += kind.score_value();
    state.destroyed += 1;
    state.push_event(GameEvent::ScoreChanged(state.score));

    if state.destroyed == 1 {
        unlock(state, ids::FIRST_BLOOD);
    }
    if state.score >= 1000 {
        unlock(state, ids::SHARPSHOOTER);
    }
}

/// Score penalty for an enemy escaping off the bottom edge
pub(crate) fn penalize_escape(state: &mut GameState) {
    state.score = state.score.saturating_sub(state.tuning.offscreen_penalty);
    state.push_event(GameEvent::ScoreChanged(state.score));
}

/// Level-up check: fires iff score >= level * threshold at the moment
/// checked. Increments the level, wipes all live enemies atomically
/// with the increment, and drops back to class selection for the next
/// level (the player may re-choose the craft each level).
pub(crate) fn check_level_up(state: &mut GameState) {
    if state.score < state.level * state.tuning.level_up_score {
        return;
    }
    state.level += 1;
    state.enemies.clear();
    log::info!("level up -> {}", state.level);
    state.push_event(GameEvent::LevelChanged(state.level));
    if state.level == 5 {
        unlock(state, ids::LEVEL_MASTER);
    }
    state.phase = GamePhase::ClassSelect;
}

/// Consequences of one hit on the player (already past the
/// invincibility gate). `ram` distinguishes body contact from an
/// enemy bullet for the feedback countdowns. The colliding entity's
/// removal is the caller's job.
pub(crate) fn player_hit(state: &mut GameState, ram: bool) {
    if state.player.shield {
        // One absorbed hit consumes the shield; no damage
        state.player.shield = false;
        unlock(state, ids::SHIELD_MASTER);
    } else {
        state.player.damage_counter += 1;
        if state.player.damage_counter % state.class.hits_per_damage() == 0 {
            state.player.health -= 1;
            state.player.clamp_meters();
            state.push_event(GameEvent::HealthChanged(state.player.health));
        }
        state.effects.shake = if ram { 50 } else { 35 };
        state.effects.flash = if ram { 25 } else { 20 };
    }

    // Any hit, absorbed or not, restarts the invincibility window
    state.player.invincibility = state.class.invincibility_ticks();

    if state.player.health <= 0 {
        game_over(state);
    }
}

/// Freeze the run and report the final tallies, exactly once
pub(crate) fn game_over(state: &mut GameState) {
    if state.phase == GamePhase::GameOver {
        return;
    }
    state.phase = GamePhase::GameOver;
    log::info!(
        "game over: score={} level={} destroyed={}",
        state.score,
        state.level,
        state.destroyed
    );
    state.push_event(GameEvent::GameOver {
        score: state.score,
        level: state.level,
        destroyed: state.destroyed,
    });
}

/// Survivor achievement clock, counted in Playing ticks only
pub(crate) fn check_survivor(state: &mut GameState) {
    if state.survived_ticks >= state.tuning.survivor_ticks() {
        unlock(state, ids::SURVIVOR);
    }
}

/// ClassSelect -> Playing: apply the class table and re-arm spawners.
/// On a level-up re-entry the craft keeps its position and power-ups;
/// health and maxHealth always come from the table.
pub(crate) fn enter_playing(state: &mut GameState, class: PlayerClass) {
    state.class = class;
    state.player.max_health = class.max_health();
    state.player.health = class.max_health();
    state.player.invincibility = 0;
    state.spawner.rearm(&state.tuning, state.level);
    state.phase = GamePhase::Playing;
    log::info!("entering level {} as {}", state.level, class.as_str());
    state.push_event(GameEvent::HealthChanged(state.player.health));
}

/// GameOver -> FormationSelect: fresh run. Resets score, level, the
/// craft, and all collections, but never unlocked achievements.
pub(crate) fn restart(state: &mut GameState) {
    state.score = 0;
    state.level = 1;
    state.destroyed = 0;
    state.survived_ticks = 0;
    state.player = Player::new(state.class, state.bounds);
    state.bullets.clear();
    state.bombs.clear();
    state.enemy_bullets.clear();
    state.enemies.clear();
    state.powerups.clear();
    state.particles.clear();
    state.effects = Default::default();
    state.phase = GamePhase::FormationSelect;
    log::info!("run restarted");
    state.push_event(GameEvent::ScoreChanged(0));
    state.push_event(GameEvent::HealthChanged(state.player.health));
    state.push_event(GameEvent::LevelChanged(1));
    state.push_event(GameEvent::ResourceChanged(state.player.blood_sugar));
}
