//! Collision resolution
//!
//! Runs once per tick, after movement, as four passes in a fixed
//! order: bullets, bombs, player hits, power-ups. Every pass collects
//! its matches against a stable view before compacting, so removal
//! never skips or double-processes an entry, and all simultaneous
//! contacts within a tick are resolved.

use glam::Vec2;

use crate::circles_overlap;
use crate::sim::progression;
use crate::sim::state::{EnemyKind, Formation, FxColor, GamePhase, GameState, PowerUpKind};

/// All four passes. A pass that ends the Playing phase (level-up wipe
/// or game-over) short-circuits the rest of the frame.
pub(crate) fn resolve(state: &mut GameState) {
    resolve_bullet_hits(state);
    if state.phase != GamePhase::Playing {
        return;
    }
    resolve_bomb_hits(state);
    if state.phase != GamePhase::Playing {
        return;
    }
    resolve_player_hits(state);
    if state.phase != GamePhase::Playing {
        return;
    }
    resolve_powerup_pickups(state);
}

/// Pass 1: bullets vs enemies. Each bullet spends itself on the first
/// enemy it overlaps, decrementing that enemy's health by one.
fn resolve_bullet_hits(state: &mut GameState) {
    let enemies = &mut state.enemies;
    state.bullets.retain(|b| {
        for e in enemies.iter_mut() {
            if e.health > 0 && circles_overlap(b.pos, b.radius, e.pos, e.hit_radius()) {
                e.health -= 1;
                return false;
            }
        }
        true
    });
    harvest_destroyed(state);
    progression::check_level_up(state);
}

/// Pass 2: bombs vs enemies. First contact detonates the bomb, then a
/// flat blast damage hits every enemy within the blast radius of the
/// detonation point, all in one resolution pass.
fn resolve_bomb_hits(state: &mut GameState) {
    let mut detonations: Vec<Vec2> = Vec::new();
    {
        let enemies = &state.enemies;
        state.bombs.retain(|b| {
            let contact = enemies
                .iter()
                .any(|e| circles_overlap(b.pos, b.radius, e.pos, e.hit_radius()));
            if contact {
                detonations.push(b.pos);
                false
            } else {
                true
            }
        });
    }

    for pos in detonations {
        for _ in 0..30 {
            state.spawn_particle(pos, FxColor::Red);
            state.spawn_particle(pos, FxColor::Yellow);
        }
        let blast = state.tuning.bomb_blast_radius;
        let damage = state.tuning.bomb_blast_damage;
        for e in state.enemies.iter_mut() {
            if e.pos.distance(pos) < blast {
                e.health -= damage;
            }
        }
        harvest_destroyed(state);
    }
    progression::check_level_up(state);
}

/// Pass 3: player vs enemy bullets and enemy bodies. Skipped entirely
/// while the invincibility countdown runs (which also consumes one
/// tick of it). The gate is checked once at pass entry, so several
/// simultaneous contacts all register, shield rules applying in order.
fn resolve_player_hits(state: &mut GameState) {
    if state.player.invincibility > 0 {
        state.player.invincibility -= 1;
        return;
    }

    let mut bullet_hits = 0u32;
    {
        let player = &state.player;
        state.enemy_bullets.retain(|eb| {
            if circles_overlap(eb.pos, eb.radius, player.pos, player.hit_radius()) {
                bullet_hits += 1;
                false
            } else {
                true
            }
        });
    }

    let mut ram_hits = 0u32;
    {
        let player = &state.player;
        state.enemies.retain(|e| {
            // Body contact uses a tighter combined radius than the
            // projectile tests
            let contact_r = (player.size + e.size) / 2.5;
            if player.pos.distance(e.pos) < contact_r {
                ram_hits += 1;
                false
            } else {
                true
            }
        });
    }

    for _ in 0..bullet_hits {
        if state.phase != GamePhase::Playing {
            return;
        }
        progression::player_hit(state, false);
    }
    for _ in 0..ram_hits {
        if state.phase != GamePhase::Playing {
            return;
        }
        progression::player_hit(state, true);
    }
}

/// Pass 4: player vs power-ups. Applies the effect, refills the
/// resource meter (clamped), and flashes the collection aura.
fn resolve_powerup_pickups(state: &mut GameState) {
    let mut collected: Vec<(PowerUpKind, Vec2)> = Vec::new();
    {
        let player = &state.player;
        state.powerups.retain(|pw| {
            if circles_overlap(pw.pos, pw.radius, player.pos, player.hit_radius()) {
                collected.push((pw.kind, pw.pos));
                false
            } else {
                true
            }
        });
    }

    for (kind, pos) in collected {
        let color = match kind {
            PowerUpKind::Shield => {
                state.player.shield = true;
                FxColor::Green
            }
            PowerUpKind::TripleShot => {
                state.player.triple_shot += state.tuning.triple_shot_charges;
                FxColor::Yellow
            }
        };
        state.player.blood_sugar =
            (state.player.blood_sugar + state.tuning.blood_sugar_refill).min(100.0);
        state.push_event(crate::sim::state::GameEvent::ResourceChanged(
            state.player.blood_sugar,
        ));
        state.effects.collect_flash = 15;
        for _ in 0..15 {
            state.spawn_particle(pos, color);
        }
    }
}

/// Compact enemies at or below zero health, emitting destruction
/// particles and awarding score/destroyed-count for each.
fn harvest_destroyed(state: &mut GameState) {
    let dead: Vec<(Vec2, Formation, EnemyKind)> = state
        .enemies
        .iter()
        .filter(|e| e.health <= 0)
        .map(|e| (e.pos, e.camp, e.kind))
        .collect();
    if dead.is_empty() {
        return;
    }
    state.enemies.retain(|e| e.health > 0);
    for (pos, camp, kind) in dead {
        for _ in 0..10 {
            state.spawn_particle(pos, FxColor::for_camp(camp));
        }
        progression::award_enemy_kill(state, kind);
    }
}
