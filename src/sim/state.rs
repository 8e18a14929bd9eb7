//! Game state and core simulation types
//!
//! All gameplay state lives here. Entity structs expose an
//! `advance`-style step with no side effects beyond their own fields;
//! cross-entity consequences are the collision/progression passes' job.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::progression::Achievement;
use crate::sim::spawn::Spawner;
use crate::tuning::Tuning;

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, waiting for an advance intent
    Start,
    /// Choosing a camp (Cyan / Orange / White scout)
    FormationSelect,
    /// Choosing a craft class; re-entered on every level-up
    ClassSelect,
    /// Active gameplay
    Playing,
    /// Simulation suspended; no timer advances
    Paused,
    /// Run ended; frozen until a restart intent
    GameOver,
}

/// Visual camp. The player picks one; spawned enemies always fly the
/// opposing camp, so enemy colors are derived, never chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Formation {
    #[default]
    Cyan,
    Orange,
    /// Non-combat scouting skin; enemies treat it like Orange
    White,
}

impl Formation {
    /// Camp assigned to enemies opposing this player formation
    pub fn enemy_camp(self) -> Formation {
        match self {
            Formation::Cyan => Formation::Orange,
            _ => Formation::Cyan,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Formation::Cyan => "Cyan",
            Formation::Orange => "Orange",
            Formation::White => "White",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "cyan" => Some(Formation::Cyan),
            "orange" => Some(Formation::Orange),
            "white" => Some(Formation::White),
            _ => None,
        }
    }
}

/// Player craft class. All class-conditional numbers live in the
/// lookup methods below; nothing branches on class anywhere else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum PlayerClass {
    #[default]
    Basic,
    Fast,
    Heavy,
    Recon,
    Bomber,
}

impl PlayerClass {
    pub fn max_health(self) -> i32 {
        match self {
            PlayerClass::Basic => 3,
            PlayerClass::Fast => 2,
            PlayerClass::Heavy => 5,
            PlayerClass::Recon => 1,
            PlayerClass::Bomber => 4,
        }
    }

    /// Multiplier on the base player speed
    pub fn speed_multiplier(self) -> f32 {
        match self {
            PlayerClass::Basic => 2.5,
            PlayerClass::Fast => 3.5,
            PlayerClass::Heavy => 1.8,
            PlayerClass::Recon => 3.0,
            PlayerClass::Bomber => 2.5,
        }
    }

    /// Ticks between shots while the fire button is held
    pub fn fire_cooldown(self) -> u32 {
        match self {
            PlayerClass::Fast => 4,
            PlayerClass::Heavy => 10,
            _ => 7,
        }
    }

    /// Chance that a shot also drops a bomb
    pub fn bomb_chance(self) -> f64 {
        match self {
            PlayerClass::Bomber => 0.10,
            _ => 0.05,
        }
    }

    /// Invincibility window after taking a hit, in ticks
    pub fn invincibility_ticks(self) -> u32 {
        match self {
            PlayerClass::Heavy => 180,
            _ => 120,
        }
    }

    /// Unabsorbed hits registered per point of health lost. Heavy
    /// armor meters damage: only every third hit lands.
    pub fn hits_per_damage(self) -> u32 {
        match self {
            PlayerClass::Heavy => 3,
            _ => 1,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PlayerClass::Basic => "Basic",
            PlayerClass::Fast => "Fast",
            PlayerClass::Heavy => "Heavy",
            PlayerClass::Recon => "Recon",
            PlayerClass::Bomber => "Bomber",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "basic" => Some(PlayerClass::Basic),
            "fast" => Some(PlayerClass::Fast),
            "heavy" => Some(PlayerClass::Heavy),
            "recon" => Some(PlayerClass::Recon),
            "bomber" => Some(PlayerClass::Bomber),
            _ => None,
        }
    }
}

/// Enemy subtype
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyKind {
    Basic,
    Fast,
    Heavy,
}

impl EnemyKind {
    /// Bounding size (square, world units)
    pub fn size(self) -> f32 {
        match self {
            EnemyKind::Basic => 40.0,
            EnemyKind::Fast => 35.0,
            EnemyKind::Heavy => 60.0,
        }
    }

    /// Fall speed in units per tick, scaled by subtype and level
    pub fn speed(self, base: f32, level: u32) -> f32 {
        let level = level as f32;
        match self {
            EnemyKind::Basic => (base + 1.0) * (1.0 + level * 0.2),
            EnemyKind::Fast => (base + 4.0) * (1.0 + level * 0.25),
            EnemyKind::Heavy => base * (1.0 + level * 0.15),
        }
    }

    /// Starting health, scaled by subtype and level
    pub fn health(self, level: u32) -> i32 {
        let level = level as f32;
        let h = match self {
            EnemyKind::Basic => 2.0 * (1.0 + level * 0.25),
            EnemyKind::Fast => 1.0 * (1.0 + level * 0.2),
            EnemyKind::Heavy => 10.0 * (1.0 + level * 0.4),
        };
        h.floor() as i32
    }

    /// Score awarded on destruction
    pub fn score_value(self) -> u32 {
        match self {
            EnemyKind::Basic => 100,
            EnemyKind::Fast => 150,
            EnemyKind::Heavy => 200,
        }
    }

    /// Stochastic subtype choice at spawn. Heavy and Fast odds climb
    /// with level up to hard caps; both are gated behind minimum
    /// levels, with the remaining mass landing on Basic.
    pub fn choose(rng: &mut Pcg32, level: u32) -> Self {
        let roll: f32 = rng.random();
        let heavy_prob = (0.05 * level as f32).min(0.4);
        let fast_prob = (0.1 * level as f32).min(0.5);

        if roll < heavy_prob && level >= 3 {
            EnemyKind::Heavy
        } else if roll < heavy_prob + fast_prob && level >= 2 {
            EnemyKind::Fast
        } else {
            EnemyKind::Basic
        }
    }
}

/// Palette index for cosmetic effects; the renderer maps these to
/// actual colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FxColor {
    Cyan,
    Orange,
    White,
    Yellow,
    Green,
    Red,
}

impl FxColor {
    /// Base trail/explosion color for a camp
    pub fn for_camp(camp: Formation) -> Self {
        match camp {
            Formation::Cyan => FxColor::Cyan,
            Formation::Orange => FxColor::Orange,
            Formation::White => FxColor::White,
        }
    }
}

/// A player bullet, moving at fixed speed along a fixed angle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
}

impl Bullet {
    /// Default angle is straight up; triple-shot side bolts offset it.
    pub fn new(pos: Vec2, angle: f32, speed: f32) -> Self {
        Self {
            pos,
            vel: Vec2::new(angle.cos(), angle.sin()) * speed,
            radius: BULLET_RADIUS,
        }
    }

    pub fn advance(&mut self) {
        self.pos += self.vel;
    }
}

/// A bomb: flies straight up at 60% bullet speed, detonates in an
/// area on first enemy contact
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bomb {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
}

impl Bomb {
    pub fn new(pos: Vec2, bullet_speed: f32) -> Self {
        Self {
            pos,
            vel: Vec2::new(0.0, -bullet_speed * 0.6),
            radius: BOMB_RADIUS,
        }
    }

    pub fn advance(&mut self) {
        self.pos += self.vel;
    }
}

/// An enemy shot, falling straight down at 50% bullet speed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyBullet {
    pub pos: Vec2,
    pub speed: f32,
    pub radius: f32,
    pub color: FxColor,
}

impl EnemyBullet {
    pub fn new(pos: Vec2, bullet_speed: f32, color: FxColor) -> Self {
        Self {
            pos,
            speed: bullet_speed * 0.5,
            radius: ENEMY_BULLET_RADIUS,
            color,
        }
    }

    pub fn advance(&mut self) {
        self.pos.y += self.speed;
    }
}

/// An enemy craft
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    /// Center position
    pub pos: Vec2,
    pub size: f32,
    pub kind: EnemyKind,
    /// Always the camp opposing the player's formation
    pub camp: Formation,
    pub speed: f32,
    pub health: i32,
    /// Ticks until the next shot
    pub fire_cooldown: u32,
}

impl Enemy {
    /// Spawn just above the top edge at a random x. Bounds are the
    /// play-field at spawn time; later resizes do not move the enemy.
    pub fn spawn(
        rng: &mut Pcg32,
        bounds: Vec2,
        level: u32,
        camp: Formation,
        tuning: &Tuning,
    ) -> Self {
        let kind = EnemyKind::choose(rng, level);
        let size = kind.size();
        let x = rng.random_range(size / 2.0..(bounds.x - size / 2.0).max(size / 2.0 + 1.0));
        Self {
            pos: Vec2::new(x, -size / 2.0),
            size,
            kind,
            camp,
            speed: kind.speed(tuning.base_enemy_speed, level),
            health: kind.health(level),
            fire_cooldown: tuning.enemy_fire_period(),
        }
    }

    pub fn advance(&mut self) {
        self.pos.y += self.speed;
    }

    /// Half-width, used as the effective collision radius
    #[inline]
    pub fn hit_radius(&self) -> f32 {
        self.size / 2.0
    }
}

/// Life lost per tick by a cosmetic particle
pub const PARTICLE_LIFE_DECAY: f32 = 0.02;

/// A cosmetic particle. Never gameplay-affecting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// 0-1, decays by a fixed step per tick
    pub life: f32,
    pub color: FxColor,
}

impl Particle {
    /// Radial burst: uniform angle, speed uniform in [1, 4)
    pub fn new(rng: &mut Pcg32, pos: Vec2, color: FxColor) -> Self {
        let angle = rng.random_range(0.0..std::f32::consts::TAU);
        let speed = rng.random_range(1.0..4.0);
        Self {
            pos,
            vel: Vec2::new(angle.cos(), angle.sin()) * speed,
            life: 1.0,
            color,
        }
    }

    pub fn advance(&mut self) {
        self.pos += self.vel;
        self.life -= PARTICLE_LIFE_DECAY;
    }
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerUpKind {
    TripleShot,
    Shield,
}

/// A falling power-up capsule
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUp {
    pub pos: Vec2,
    pub kind: PowerUpKind,
    pub speed: f32,
    pub radius: f32,
}

impl PowerUp {
    /// Spawn just above the top edge at a random x; 50/50 type split
    pub fn spawn(rng: &mut Pcg32, bounds: Vec2, tuning: &Tuning) -> Self {
        let x = rng.random_range(POWERUP_RADIUS..(bounds.x - POWERUP_RADIUS).max(POWERUP_RADIUS + 1.0));
        let kind = if rng.random_bool(0.5) {
            PowerUpKind::TripleShot
        } else {
            PowerUpKind::Shield
        };
        Self {
            pos: Vec2::new(x, -2.0 * POWERUP_RADIUS),
            kind,
            speed: tuning.powerup_fall_speed,
            radius: POWERUP_RADIUS,
        }
    }

    pub fn advance(&mut self) {
        self.pos.y += self.speed;
    }
}

/// A background star (cosmetic parallax layer)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Star {
    pub pos: Vec2,
    pub size: f32,
    pub speed: f32,
}

impl Star {
    pub fn new(rng: &mut Pcg32, bounds: Vec2) -> Self {
        Self {
            pos: Vec2::new(
                rng.random_range(0.0..bounds.x.max(1.0)),
                rng.random_range(0.0..bounds.y.max(1.0)),
            ),
            size: rng.random_range(0.0..2.0),
            speed: rng.random_range(0.5..2.5),
        }
    }

    /// Scroll down and wrap at the current bottom edge
    pub fn advance(&mut self, height: f32) {
        self.pos.y += self.speed;
        if self.pos.y > height {
            self.pos.y = -10.0;
        }
    }
}

/// The player craft
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Center position
    pub pos: Vec2,
    pub size: f32,
    pub health: i32,
    pub max_health: i32,
    /// Ticks of remaining invincibility after a hit
    pub invincibility: u32,
    /// Triple-shot charges remaining (one consumed per volley)
    pub triple_shot: u32,
    /// At most one absorbed hit
    pub shield: bool,
    /// Unabsorbed hits registered; Heavy armor meters damage off it
    pub damage_counter: u32,
    /// Ticks until the next shot is allowed
    pub fire_cooldown: u32,
    /// Resource meter, 0-100; decays over time and halves speed at 0
    pub blood_sugar: f32,
}

impl Player {
    pub fn new(class: PlayerClass, bounds: Vec2) -> Self {
        Self {
            pos: Vec2::new(bounds.x / 2.0, bounds.y - 100.0),
            size: PLAYER_SIZE,
            health: class.max_health(),
            max_health: class.max_health(),
            invincibility: 0,
            triple_shot: 0,
            shield: false,
            damage_counter: 0,
            fire_cooldown: 0,
            blood_sugar: 100.0,
        }
    }

    #[inline]
    pub fn hit_radius(&self) -> f32 {
        self.size / 2.0
    }

    /// Clamp every meter to its legal range. Out-of-range values are
    /// a logic error upstream; they are corrected, never propagated.
    pub fn clamp_meters(&mut self) {
        self.health = self.health.clamp(0, self.max_health);
        self.blood_sugar = self.blood_sugar.clamp(0.0, 100.0);
    }
}

/// Per-step visual-effect countdowns, decremented once per tick.
/// Explicit state instead of closure-captured counters so every
/// countdown has a single owner.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Effects {
    /// Screen shake intensity (ticks remaining)
    pub shake: u32,
    /// Red damage flash (ticks remaining)
    pub flash: u32,
    /// Power-up collection flash (ticks remaining)
    pub collect_flash: u32,
}

impl Effects {
    pub fn decay(&mut self) {
        self.shake = self.shake.saturating_sub(1);
        self.flash = self.flash.saturating_sub(1);
        self.collect_flash = self.collect_flash.saturating_sub(1);
    }
}

/// Notifications for the presentation bridge, drained after each tick.
/// Not part of the snapshot; the queue is transient by design.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum GameEvent {
    ScoreChanged(u32),
    HealthChanged(i32),
    LevelChanged(u32),
    /// Resource meter value in 0..=100
    ResourceChanged(f32),
    AchievementUnlocked(&'static str),
    GameOver {
        score: u32,
        level: u32,
        destroyed: u32,
    },
}

fn detached_rng() -> Pcg32 {
    Pcg32::seed_from_u64(0)
}

/// Complete simulation state
///
/// Owned exclusively by whoever drives [`crate::sim::tick`]; nothing
/// else mutates it. Snapshots serialize for inspection; the RNG
/// restarts from the recorded seed after a round trip (cross-session
/// persistence is out of scope).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    #[serde(skip, default = "detached_rng")]
    pub(crate) rng: Pcg32,
    pub tuning: Tuning,

    pub phase: GamePhase,
    pub formation: Formation,
    pub class: PlayerClass,

    pub player: Player,
    pub score: u32,
    pub level: u32,
    /// Enemies destroyed this run
    pub destroyed: u32,
    /// Ticks spent in the Playing phase this run
    pub survived_ticks: u64,

    pub bullets: Vec<Bullet>,
    pub bombs: Vec<Bomb>,
    pub enemy_bullets: Vec<EnemyBullet>,
    pub enemies: Vec<Enemy>,
    pub powerups: Vec<PowerUp>,
    #[serde(skip)]
    pub particles: Vec<Particle>,
    #[serde(skip)]
    pub stars: Vec<Star>,

    pub spawner: Spawner,
    pub effects: Effects,
    /// Unlock flags survive restarts within a session
    pub achievements: Vec<Achievement>,

    /// Current play-field bounds, refreshed from input every tick
    pub bounds: Vec2,

    #[serde(skip)]
    pub(crate) events: Vec<GameEvent>,
}

impl GameState {
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let bounds = Vec2::new(1280.0, 720.0);
        let stars = (0..STAR_COUNT).map(|_| Star::new(&mut rng, bounds)).collect();
        Self {
            seed,
            rng,
            tuning,
            phase: GamePhase::Start,
            formation: Formation::Cyan,
            class: PlayerClass::Basic,
            player: Player::new(PlayerClass::Basic, bounds),
            score: 0,
            level: 1,
            destroyed: 0,
            survived_ticks: 0,
            bullets: Vec::new(),
            bombs: Vec::new(),
            enemy_bullets: Vec::new(),
            enemies: Vec::new(),
            powerups: Vec::new(),
            particles: Vec::new(),
            stars,
            spawner: Spawner::default(),
            effects: Effects::default(),
            achievements: Achievement::catalog(),
            bounds,
            events: Vec::new(),
        }
    }

    /// Queue an event for the presentation bridge
    pub(crate) fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take all events queued since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Spawn a particle, dropping the oldest when at capacity
    pub(crate) fn spawn_particle(&mut self, pos: Vec2, color: FxColor) {
        if self.particles.len() >= MAX_PARTICLES {
            self.particles.remove(0);
        }
        let p = Particle::new(&mut self.rng, pos, color);
        self.particles.push(p);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_tables() {
        assert_eq!(PlayerClass::Basic.max_health(), 3);
        assert_eq!(PlayerClass::Fast.max_health(), 2);
        assert_eq!(PlayerClass::Heavy.max_health(), 5);
        assert_eq!(PlayerClass::Recon.max_health(), 1);
        assert_eq!(PlayerClass::Bomber.max_health(), 4);
        assert_eq!(PlayerClass::Heavy.invincibility_ticks(), 180);
        assert_eq!(PlayerClass::Basic.invincibility_ticks(), 120);
        assert_eq!(PlayerClass::Heavy.hits_per_damage(), 3);
    }

    #[test]
    fn test_enemy_scaling() {
        // Heavy at level 4: floor(10 * (1 + 4 * 0.4)) = 26
        assert_eq!(EnemyKind::Heavy.health(4), 26);
        // Fast at level 1: floor(1 * 1.2) = 1
        assert_eq!(EnemyKind::Fast.health(1), 1);
        // Basic speed at level 2: (2 + 1) * 1.4
        let s = EnemyKind::Basic.speed(2.0, 2);
        assert!((s - 4.2).abs() < 1e-5);
    }

    #[test]
    fn test_enemy_kind_gating() {
        // Below level 2 every roll lands on Basic
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..200 {
            assert_eq!(EnemyKind::choose(&mut rng, 1), EnemyKind::Basic);
        }
        // Below level 3 Heavy never appears
        for _ in 0..200 {
            assert_ne!(EnemyKind::choose(&mut rng, 2), EnemyKind::Heavy);
        }
    }

    #[test]
    fn test_enemy_camp_is_opposing() {
        assert_eq!(Formation::Cyan.enemy_camp(), Formation::Orange);
        assert_eq!(Formation::Orange.enemy_camp(), Formation::Cyan);
        assert_eq!(Formation::White.enemy_camp(), Formation::Cyan);
    }

    #[test]
    fn test_from_str_rejects_unknown() {
        assert_eq!(PlayerClass::from_str("laser"), None);
        assert_eq!(Formation::from_str(""), None);
        assert_eq!(PlayerClass::from_str("HEAVY"), Some(PlayerClass::Heavy));
    }

    #[test]
    fn test_clamp_meters() {
        let mut p = Player::new(PlayerClass::Basic, Vec2::new(800.0, 600.0));
        p.health = -3;
        p.blood_sugar = 140.0;
        p.clamp_meters();
        assert_eq!(p.health, 0);
        assert_eq!(p.blood_sugar, 100.0);

        p.health = 99;
        p.clamp_meters();
        assert_eq!(p.health, p.max_health);
    }
}
