//! Fixed-order simulation tick
//!
//! One call advances the game by exactly one frame: intents, then (in
//! Playing only) input sampling, movement, spawning, collision
//! resolution, progression, cleanup. The body runs to completion;
//! nothing suspends mid-step. Pause and game-over return before any
//! timer moves, so suspended time is unobservable.

use glam::Vec2;
use rand::Rng;

use crate::consts::*;
use crate::sim::state::{
    EnemyBullet, Bullet, Bomb, Formation, FxColor, GameEvent, GamePhase, GameState, PlayerClass,
};
use crate::sim::{collision, progression, spawn};

/// Input sample and action intents for a single tick. One-shot intents
/// (advance, selections, pause, restart) should be cleared by the
/// driver after each processed tick.
#[derive(Debug, Clone)]
pub struct TickInput {
    /// Pointer/touch target in play-field coordinates
    pub pointer: Option<Vec2>,
    /// Fire button held
    pub fire: bool,
    /// Current play-field bounds; may change between frames
    pub bounds: Vec2,
    /// Advance past the title screen
    pub advance: bool,
    pub select_formation: Option<Formation>,
    pub select_class: Option<PlayerClass>,
    /// Toggle Playing <-> Paused
    pub pause: bool,
    /// Leave GameOver for a fresh run
    pub restart: bool,
}

impl Default for TickInput {
    fn default() -> Self {
        Self {
            pointer: None,
            fire: false,
            bounds: Vec2::new(1280.0, 720.0),
            advance: false,
            select_formation: None,
            select_class: None,
            pause: false,
            restart: false,
        }
    }
}

/// Advance the game state by one frame
pub fn tick(state: &mut GameState, input: &TickInput) {
    // Bounds are live: entities clamp/cull against the current size,
    // not the size captured at their creation
    if input.bounds.x > 0.0 && input.bounds.y > 0.0 {
        state.bounds = input.bounds;
    }

    apply_intents(state, input);

    if state.phase != GamePhase::Playing {
        return;
    }

    state.survived_ticks += 1;
    progression::check_survivor(state);
    state.effects.decay();

    update_player(state, input);
    advance_entities(state);
    spawn::run(state);
    collision::resolve(state);
    cleanup(state);
}

/// Apply discrete action intents. Intents arriving in the wrong phase
/// are ignored (selection tables must never be applied mid-run).
fn apply_intents(state: &mut GameState, input: &TickInput) {
    if input.pause {
        match state.phase {
            GamePhase::Playing => {
                state.phase = GamePhase::Paused;
                log::info!("paused");
            }
            GamePhase::Paused => {
                state.phase = GamePhase::Playing;
                log::info!("resumed");
            }
            _ => {}
        }
    }

    if input.advance {
        if state.phase == GamePhase::Start {
            state.phase = GamePhase::FormationSelect;
        } else {
            log::warn!("advance intent ignored in {:?}", state.phase);
        }
    }

    if let Some(formation) = input.select_formation {
        if state.phase == GamePhase::FormationSelect {
            state.formation = formation;
            state.phase = GamePhase::ClassSelect;
            log::info!("formation selected: {}", formation.as_str());
        } else {
            log::warn!("formation intent ignored in {:?}", state.phase);
        }
    }

    if let Some(class) = input.select_class {
        if state.phase == GamePhase::ClassSelect {
            progression::enter_playing(state, class);
        } else {
            log::warn!("class intent ignored in {:?}", state.phase);
        }
    }

    if input.restart {
        if state.phase == GamePhase::GameOver {
            progression::restart(state);
        } else {
            log::warn!("restart intent ignored in {:?}", state.phase);
        }
    }
}

/// Resource decay, pointer-chasing movement, bounds clamp, trail
/// particles, and firing
fn update_player(state: &mut GameState, input: &TickInput) {
    state.player.blood_sugar =
        (state.player.blood_sugar - state.tuning.blood_sugar_decay).max(0.0);
    let mut speed_mult = state.class.speed_multiplier();
    if state.player.blood_sugar <= 0.0 {
        // Out of energy: throttle to half speed
        speed_mult *= 0.5;
    }
    state.push_event(GameEvent::ResourceChanged(state.player.blood_sugar));

    let mut moved = false;
    if let Some(target) = input.pointer {
        let delta = target - state.player.pos;
        let dist = delta.length();
        if dist > POINTER_DEADZONE {
            let step = state.tuning.player_speed * speed_mult;
            state.player.pos += delta / dist * step;
            moved = true;
        }
    }

    let half = state.player.size / 2.0;
    state.player.pos.x = state.player.pos.x.clamp(half, (state.bounds.x - half).max(half));
    state.player.pos.y = state.player.pos.y.clamp(half, (state.bounds.y - half).max(half));

    // Engine trail; brighter burst while the collect flash is live
    if moved || state.effects.collect_flash > 0 {
        let collecting = state.effects.collect_flash > 0;
        let color = if collecting {
            FxColor::Yellow
        } else {
            FxColor::for_camp(state.formation)
        };
        let count = if collecting { 3 } else { 1 };
        for _ in 0..count {
            let jitter = Vec2::new(
                state.rng.random_range(-5.0..5.0),
                state.rng.random_range(-5.0..5.0),
            );
            let pos = state.player.pos + jitter;
            state.spawn_particle(pos, color);
        }
    }

    state.player.fire_cooldown = state.player.fire_cooldown.saturating_sub(1);
    if input.fire && state.player.fire_cooldown == 0 {
        fire_volley(state);
        state.player.fire_cooldown = state.class.fire_cooldown();
    }
}

/// One volley from the muzzle: an occasional bomb, then either a
/// triple spread (consuming one charge) or a single bolt.
fn fire_volley(state: &mut GameState) {
    let muzzle = Vec2::new(
        state.player.pos.x,
        state.player.pos.y - state.player.size / 2.0,
    );
    let speed = state.tuning.bullet_speed;
    let up = -std::f32::consts::FRAC_PI_2;

    if state.rng.random_bool(state.class.bomb_chance()) {
        state.bombs.push(Bomb::new(muzzle, speed));
    }

    if state.player.triple_shot > 0 {
        state.bullets.push(Bullet::new(muzzle, up, speed));
        state.bullets.push(Bullet::new(muzzle, up - TRIPLE_SHOT_SPREAD, speed));
        state.bullets.push(Bullet::new(muzzle, up + TRIPLE_SHOT_SPREAD, speed));
        state.player.triple_shot -= 1;
    } else {
        state.bullets.push(Bullet::new(muzzle, up, speed));
    }
}

/// Advance every entity one frame's worth of motion/decay. Enemies
/// also fire on their own cadence.
fn advance_entities(state: &mut GameState) {
    for b in &mut state.bullets {
        b.advance();
    }
    for b in &mut state.bombs {
        b.advance();
    }
    for eb in &mut state.enemy_bullets {
        eb.advance();
    }

    let fire_period = state.tuning.enemy_fire_period();
    let mut shots: Vec<(Vec2, FxColor)> = Vec::new();
    for e in &mut state.enemies {
        e.advance();
        e.fire_cooldown = e.fire_cooldown.saturating_sub(1);
        if e.fire_cooldown == 0 {
            // Shots leave from the enemy's lower edge
            shots.push((
                Vec2::new(e.pos.x, e.pos.y + e.size / 2.0),
                FxColor::for_camp(e.camp),
            ));
            e.fire_cooldown = fire_period;
        }
    }
    let bullet_speed = state.tuning.bullet_speed;
    for (pos, color) in shots {
        state
            .enemy_bullets
            .push(EnemyBullet::new(pos, bullet_speed, color));
    }

    for p in &mut state.particles {
        p.advance();
    }
    for pw in &mut state.powerups {
        pw.advance();
    }
    let height = state.bounds.y;
    for s in &mut state.stars {
        s.advance(height);
    }
}

/// Compact every collection against its removal condition. Runs last,
/// so after a tick no spent or out-of-bounds entity survives.
fn cleanup(state: &mut GameState) {
    let bounds = state.bounds;

    state.bullets.retain(|b| b.pos.y > -CULL_MARGIN);
    state.bombs.retain(|b| b.pos.y > -CULL_MARGIN);
    state
        .enemy_bullets
        .retain(|eb| eb.pos.y < bounds.y + CULL_MARGIN);
    state.powerups.retain(|pw| pw.pos.y < bounds.y + CULL_MARGIN);
    state.particles.retain(|p| p.life > 0.0);

    // Escaped enemies cost score before they vanish
    let escaped = state
        .enemies
        .iter()
        .filter(|e| e.pos.y - e.size / 2.0 > bounds.y)
        .count();
    if escaped > 0 {
        state.enemies.retain(|e| e.pos.y - e.size / 2.0 <= bounds.y);
        for _ in 0..escaped {
            progression::penalize_escape(state);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Enemy, EnemyKind};
    use crate::tuning::Tuning;

    fn start_playing(state: &mut GameState, class: PlayerClass) {
        tick(state, &TickInput { advance: true, ..Default::default() });
        tick(
            state,
            &TickInput {
                select_formation: Some(Formation::Cyan),
                ..Default::default()
            },
        );
        tick(
            state,
            &TickInput {
                select_class: Some(class),
                ..Default::default()
            },
        );
        state.drain_events();
    }

    #[test]
    fn test_phase_walk_to_playing() {
        let mut state = GameState::new(1, Tuning::default());
        assert_eq!(state.phase, GamePhase::Start);
        start_playing(&mut state, PlayerClass::Heavy);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.class, PlayerClass::Heavy);
        assert_eq!(state.player.health, 5);
        assert_eq!(
            state.spawner.enemy_timer,
            state.tuning.enemy_spawn_period(1)
        );
    }

    #[test]
    fn test_intents_ignored_in_wrong_phase() {
        let mut state = GameState::new(1, Tuning::default());
        tick(
            &mut state,
            &TickInput {
                select_class: Some(PlayerClass::Heavy),
                restart: true,
                ..Default::default()
            },
        );
        assert_eq!(state.phase, GamePhase::Start);
        assert_eq!(state.class, PlayerClass::Basic);
    }

    #[test]
    fn test_pause_freezes_all_timers() {
        let mut state = GameState::new(2, Tuning::default());
        start_playing(&mut state, PlayerClass::Basic);
        tick(&mut state, &TickInput::default());
        let enemy_timer = state.spawner.enemy_timer;
        let survived = state.survived_ticks;
        let sugar = state.player.blood_sugar;

        tick(&mut state, &TickInput { pause: true, ..Default::default() });
        assert_eq!(state.phase, GamePhase::Paused);
        for _ in 0..100 {
            tick(&mut state, &TickInput::default());
        }
        assert_eq!(state.spawner.enemy_timer, enemy_timer);
        assert_eq!(state.survived_ticks, survived);
        assert_eq!(state.player.blood_sugar, sugar);

        tick(&mut state, &TickInput { pause: true, ..Default::default() });
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_firing_and_cooldown() {
        let mut state = GameState::new(3, Tuning::default());
        start_playing(&mut state, PlayerClass::Basic);
        tick(&mut state, &TickInput { fire: true, ..Default::default() });
        assert_eq!(state.bullets.len(), 1);
        assert_eq!(state.player.fire_cooldown, PlayerClass::Basic.fire_cooldown());
        // Held fire during cooldown adds nothing
        tick(&mut state, &TickInput { fire: true, ..Default::default() });
        assert_eq!(state.bullets.len(), 1);
    }

    #[test]
    fn test_triple_shot_volley_consumes_charge() {
        let mut state = GameState::new(4, Tuning::default());
        start_playing(&mut state, PlayerClass::Basic);
        state.player.triple_shot = 2;
        tick(&mut state, &TickInput { fire: true, ..Default::default() });
        assert_eq!(state.bullets.len(), 3);
        assert_eq!(state.player.triple_shot, 1);
        // Side bolts diverge horizontally
        let xs: Vec<f32> = state.bullets.iter().map(|b| b.vel.x).collect();
        assert!(xs.iter().any(|&x| x < -0.1));
        assert!(xs.iter().any(|&x| x > 0.1));
    }

    #[test]
    fn test_pointer_movement_and_deadzone() {
        let mut state = GameState::new(5, Tuning::default());
        start_playing(&mut state, PlayerClass::Basic);
        let start = state.player.pos;
        tick(
            &mut state,
            &TickInput {
                pointer: Some(start + Vec2::new(100.0, 0.0)),
                ..Default::default()
            },
        );
        let step = (state.player.pos - start).length();
        assert!((step - 8.0 * 2.5).abs() < 1e-3);

        // Inside the deadzone the craft holds position
        let here = state.player.pos;
        tick(
            &mut state,
            &TickInput {
                pointer: Some(here + Vec2::new(2.0, 0.0)),
                ..Default::default()
            },
        );
        assert_eq!(state.player.pos, here);
    }

    #[test]
    fn test_empty_meter_halves_speed() {
        let mut state = GameState::new(6, Tuning::default());
        start_playing(&mut state, PlayerClass::Basic);
        state.player.blood_sugar = 0.0;
        let start = state.player.pos;
        tick(
            &mut state,
            &TickInput {
                pointer: Some(start + Vec2::new(-200.0, 0.0)),
                ..Default::default()
            },
        );
        let step = (state.player.pos - start).length();
        assert!((step - 8.0 * 2.5 * 0.5).abs() < 1e-3);
    }

    #[test]
    fn test_resize_clamps_player_to_new_bounds() {
        let mut state = GameState::new(7, Tuning::default());
        start_playing(&mut state, PlayerClass::Basic);
        state.player.pos = Vec2::new(1200.0, 700.0);
        tick(
            &mut state,
            &TickInput {
                bounds: Vec2::new(640.0, 480.0),
                ..Default::default()
            },
        );
        assert!(state.player.pos.x <= 640.0 - state.player.size / 2.0);
        assert!(state.player.pos.y <= 480.0 - state.player.size / 2.0);
    }

    #[test]
    fn test_enemy_fires_on_cadence() {
        let mut state = GameState::new(8, Tuning::default());
        start_playing(&mut state, PlayerClass::Basic);
        state.spawner.enemy_timer = u32::MAX; // keep the field clear
        state.enemies.push(Enemy {
            pos: Vec2::new(300.0, 100.0),
            size: 40.0,
            kind: EnemyKind::Basic,
            camp: Formation::Orange,
            speed: 0.0,
            health: 5,
            fire_cooldown: 1,
        });
        tick(&mut state, &TickInput::default());
        assert_eq!(state.enemy_bullets.len(), 1);
        assert_eq!(
            state.enemies[0].fire_cooldown,
            state.tuning.enemy_fire_period()
        );
    }

    #[test]
    fn test_escaped_enemy_costs_score() {
        let mut state = GameState::new(9, Tuning::default());
        start_playing(&mut state, PlayerClass::Basic);
        state.score = 120;
        state.spawner.enemy_timer = u32::MAX;
        state.enemies.push(Enemy {
            pos: Vec2::new(300.0, state.bounds.y + 100.0),
            size: 40.0,
            kind: EnemyKind::Basic,
            camp: Formation::Orange,
            speed: 0.0,
            health: 5,
            fire_cooldown: 9999,
        });
        tick(&mut state, &TickInput::default());
        assert!(state.enemies.is_empty());
        assert_eq!(state.score, 70);

        // Penalty clamps at zero
        state.score = 30;
        state.enemies.push(Enemy {
            pos: Vec2::new(300.0, state.bounds.y + 100.0),
            size: 40.0,
            kind: EnemyKind::Basic,
            camp: Formation::Orange,
            speed: 0.0,
            health: 5,
            fire_cooldown: 9999,
        });
        tick(&mut state, &TickInput::default());
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_cleanup_culls_offscreen_projectiles() {
        let mut state = GameState::new(10, Tuning::default());
        start_playing(&mut state, PlayerClass::Basic);
        state.bullets.push(Bullet::new(
            Vec2::new(100.0, -200.0),
            -std::f32::consts::FRAC_PI_2,
            12.0,
        ));
        state.enemy_bullets.push(EnemyBullet::new(
            Vec2::new(100.0, state.bounds.y + 200.0),
            12.0,
            FxColor::Orange,
        ));
        tick(&mut state, &TickInput::default());
        assert!(state.bullets.is_empty());
        assert!(state.enemy_bullets.is_empty());
    }

    #[test]
    fn test_game_over_freezes_until_restart() {
        let mut state = GameState::new(12, Tuning::default());
        start_playing(&mut state, PlayerClass::Recon);
        state.enemies.push(Enemy {
            pos: state.player.pos,
            size: 40.0,
            kind: EnemyKind::Basic,
            camp: Formation::Orange,
            speed: 0.0,
            health: 5,
            fire_cooldown: 9999,
        });
        tick(&mut state, &TickInput::default());
        assert_eq!(state.phase, GamePhase::GameOver);
        let survived = state.survived_ticks;
        for _ in 0..10 {
            tick(&mut state, &TickInput { fire: true, ..Default::default() });
        }
        assert_eq!(state.survived_ticks, survived);

        tick(&mut state, &TickInput { restart: true, ..Default::default() });
        assert_eq!(state.phase, GamePhase::FormationSelect);
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_same_seed_same_run() {
        let script = |state: &mut GameState| {
            start_playing(state, PlayerClass::Fast);
            for i in 0..600 {
                let pointer = Some(Vec2::new(
                    640.0 + (i as f32 * 0.05).sin() * 400.0,
                    600.0,
                ));
                tick(state, &TickInput { pointer, fire: true, ..Default::default() });
                state.drain_events();
            }
        };
        let mut a = GameState::new(777, Tuning::default());
        let mut b = GameState::new(777, Tuning::default());
        script(&mut a);
        script(&mut b);
        let ja = serde_json::to_string(&a).unwrap();
        let jb = serde_json::to_string(&b).unwrap();
        assert_eq!(ja, jb);
    }
}
