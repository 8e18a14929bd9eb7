//! Nova Strike headless demo
//!
//! Runs the simulation at full speed with an autopilot pilot, printing
//! gameplay events as they happen and a JSON snapshot of the final
//! state. Useful for balance tweaking and for eyeballing determinism:
//! the same seed always prints the same run.
//!
//! Usage: nova-strike [seed] [ticks]

use glam::Vec2;

use nova_strike::sim::{tick, Formation, GameEvent, GamePhase, GameState, PlayerClass, TickInput};
use nova_strike::tuning::Tuning;

fn arg_or(n: usize, default: u64) -> u64 {
    match std::env::args().nth(n) {
        Some(raw) => match raw.parse() {
            Ok(v) => v,
            Err(_) => {
                log::warn!("ignoring malformed argument {:?}, using {}", raw, default);
                default
            }
        },
        None => default,
    }
}

fn main() {
    env_logger::init();

    let seed = arg_or(1, 0x5EED);
    let ticks = arg_or(2, 3600);
    log::info!("nova-strike demo: seed={seed} ticks={ticks}");

    let mut state = GameState::new(seed, Tuning::default());

    // Walk the menus: title -> formation -> class -> playing
    tick(&mut state, &TickInput { advance: true, ..Default::default() });
    tick(
        &mut state,
        &TickInput { select_formation: Some(Formation::Cyan), ..Default::default() },
    );
    tick(
        &mut state,
        &TickInput { select_class: Some(PlayerClass::Fast), ..Default::default() },
    );
    state.drain_events();

    let mut input = TickInput { fire: true, ..Default::default() };
    for i in 0..ticks {
        // Sweep side to side near the bottom of the field
        let t = i as f32 / 60.0;
        input.pointer = Some(Vec2::new(
            state.bounds.x / 2.0 + (t * 1.7).sin() * state.bounds.x * 0.4,
            state.bounds.y - 120.0,
        ));
        tick(&mut state, &input);

        for event in state.drain_events() {
            match event {
                GameEvent::ResourceChanged(_) => {}
                other => println!("[{i:>5}] {other:?}"),
            }
        }

        // The autopilot always re-picks its class after a level-up
        input.select_class = if state.phase == GamePhase::ClassSelect {
            Some(PlayerClass::Fast)
        } else {
            None
        };
        if state.phase == GamePhase::GameOver {
            break;
        }
    }

    println!(
        "run finished: phase={:?} score={} level={} destroyed={}",
        state.phase, state.score, state.level, state.destroyed
    );
    match serde_json::to_string_pretty(&state) {
        Ok(json) => println!("{json}"),
        Err(err) => log::error!("snapshot serialization failed: {err}"),
    }
}
