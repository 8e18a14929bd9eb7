//! Deterministic game simulation
//!
//! All gameplay lives here, behind plain data types with no rendering
//! or platform dependencies. Drive it by calling [`tick`] once per
//! frame at 60 Hz with a [`TickInput`]; read back the [`GameState`]
//! fields for presentation and [`GameState::drain_events`] for
//! notifications.

pub mod state;
pub mod tick;

pub(crate) mod collision;
pub(crate) mod progression;
pub(crate) mod spawn;

pub use state::{
    Bomb, Bullet, Effects, Enemy, EnemyBullet, EnemyKind, Formation, FxColor, GameEvent,
    GamePhase, GameState, Particle, Player, PlayerClass, PowerUp, PowerUpKind, Star,
};
pub use tick::{tick, TickInput};

pub use progression::{ids as achievement_ids, Achievement};
pub use spawn::Spawner;
