//! Nova Strike - a vertical-scrolling arcade shooter simulation core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, collisions, progression)
//! - `tuning`: Data-driven game balance
//!
//! Rendering, audio, and menus are external collaborators: they feed a
//! [`sim::TickInput`] into [`sim::tick`] once per frame and drain the
//! [`sim::GameEvent`] queue afterwards. The simulation itself never
//! touches a platform API.

pub mod sim;
pub mod tuning;

pub use sim::{GameEvent, GamePhase, GameState, TickInput, tick};
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Simulation ticks per second
    pub const TICK_HZ: u32 = 60;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;

    /// Player craft bounding size (square, world units)
    pub const PLAYER_SIZE: f32 = 40.0;
    /// Pointer distance below which the craft holds position
    pub const POINTER_DEADZONE: f32 = 5.0;

    /// Projectile radii
    pub const BULLET_RADIUS: f32 = 3.0;
    pub const BOMB_RADIUS: f32 = 8.0;
    pub const ENEMY_BULLET_RADIUS: f32 = 3.0;
    /// Power-up collection radius
    pub const POWERUP_RADIUS: f32 = 15.0;

    /// Angular offset of the triple-shot side bolts (radians)
    pub const TRIPLE_SHOT_SPREAD: f32 = 0.2;

    /// Projectiles are culled this far past the play-field edge
    pub const CULL_MARGIN: f32 = 50.0;

    /// Background starfield size (cosmetic)
    pub const STAR_COUNT: usize = 100;
    /// Maximum cosmetic particles kept alive
    pub const MAX_PARTICLES: usize = 512;
}

/// Convert a wall-clock duration in milliseconds to whole simulation
/// ticks, rounding to nearest. Every cooldown in the sim counts ticks,
/// never wall time, so pausing is invisible to timers.
#[inline]
pub fn ticks_from_ms(ms: u32) -> u32 {
    (ms * consts::TICK_HZ + 500) / 1000
}

/// Squared-distance circle overlap test
#[inline]
pub fn circles_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    let r = ra + rb;
    a.distance_squared(b) < r * r
}
