//! Sling Arena - a physics-driven projectile arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (launch physics, collisions, enemies, levels)
//! - `tuning`: Data-driven game balance
//! - `error`: Configuration loading errors
//!
//! Drawing, audio playback and pointer capture live outside this crate; they
//! read [`sim::GameState`] and drain its event queue.

pub mod error;
pub mod sim;
pub mod tuning;

pub use error::ConfigError;
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
///
/// All rates are per tick; one tick is one rendered frame.
pub mod consts {
    /// Nominal ticks per second (used to express delays)
    pub const TICKS_PER_SECOND: u32 = 60;

    /// Default arena dimensions
    pub const ARENA_WIDTH: f32 = 1280.0;
    pub const ARENA_HEIGHT: f32 = 720.0;
    /// Height of the ground strip at the bottom of the arena
    pub const GROUND_HEIGHT: f32 = 40.0;
    /// Primary spawn point: x from the left wall, y above the arena bottom
    pub const SPAWN_X: f32 = 100.0;
    pub const SPAWN_HEIGHT: f32 = 80.0;

    /// Motion model
    pub const GRAVITY: f32 = 0.3;
    pub const EMPOWERED_GRAVITY: f32 = 0.15;
    pub const FRICTION: f32 = 0.995;
    pub const BOUNCE_REDUCTION: f32 = 0.6;
    /// Floor bounces faster than this request a dust explosion
    pub const HARD_BOUNCE_SPEED: f32 = 2.0;
    /// Rest detection only applies this close to the bottom of the arena
    pub const REST_ZONE_HEIGHT: f32 = 100.0;
    /// Bodies that fall this far below the arena are respawned
    pub const FALL_OUT_DISTANCE: f32 = 100.0;
    pub const STOP_THRESHOLD: f32 = 1.0;
    pub const EMPOWERED_STOP_THRESHOLD: f32 = 0.5;

    /// Launch mechanics
    pub const PRIMARY_RADIUS: f32 = 25.0;
    pub const PRIMARY_BASE_FORCE: f32 = 20.0;
    pub const PRIMARY_FORCE_CAP: f32 = 2.0;
    pub const EMPOWERED_BASE_FORCE: f32 = 40.0;
    pub const EMPOWERED_FORCE_CAP: f32 = 3.0;
    /// Drag distance that maps to one unit of force scale
    pub const FORCE_DISTANCE_UNIT: f32 = 50.0;
    /// Releases at or below this drag distance are ignored
    pub const LAUNCH_DEAD_ZONE: f32 = 5.0;
    /// How far the body can be pulled from its anchor while aiming
    pub const MAX_DRAG_DISTANCE: f32 = 150.0;
    /// Drag distance shown as a full power meter
    pub const POWER_METER_DISTANCE: f32 = 200.0;
    pub const TRAIL_LENGTH: usize = 20;
    /// Chance per tick that a launched body sheds a trail particle
    pub const TRAIL_PARTICLE_CHANCE: f32 = 0.3;

    /// Enemy contact
    pub const ENEMY_RADIUS: f32 = 30.0;
    pub const BOSS_RADIUS: f32 = 50.0;
    /// Minimum |vx| for a contact to count as a hit
    pub const HIT_SPEED_THRESHOLD: f32 = 0.5;
    pub const KNOCKBACK_SPEED: f32 = 6.0;
    pub const HIT_INVULNERABLE_TICKS: u32 = 10;
    pub const HIT_SHAKE_TICKS: u32 = 20;
    pub const POINTS_PER_HEALTH: u64 = 100;
    pub const BOSS_POINTS: u64 = 2500;

    /// Enemy projectiles
    pub const PROJECTILE_RADIUS: f32 = 6.0;
    pub const PROJECTILE_SPEED: f32 = 4.0;
    pub const PROJECTILE_LIFE: u32 = 180;

    /// Pickups
    pub const PICKUP_RADIUS: f32 = 20.0;
    pub const BONUS_RADIUS: f32 = 25.0;
    pub const BONUS_POINTS: u64 = 500;
    /// Bonus item spawns at least this far from every arena edge
    pub const BONUS_MARGIN: f32 = 100.0;
    pub const BUFF_DURATION_TICKS: u32 = 900;
    pub const SPEED_BUFF_MULTIPLIER: f32 = 1.5;
    pub const GIANT_RADIUS_MULTIPLIER: f32 = 1.5;
    /// Horizontal spacing between staggered helper spawns
    pub const HELPER_SPAWN_SPACING: f32 = 60.0;

    /// Progression
    pub const MAX_SHOTS: u32 = 3;
    pub const UNUSED_SHOT_BONUS: u64 = 50;
    /// Delay between a win/loss condition and its transition (1 second)
    pub const TRANSITION_DELAY_TICKS: u32 = 60;
    pub const MAX_STARS: u8 = 3;

    /// Wind
    pub const WIND_BASE: f32 = 0.01;
    pub const WIND_PER_LEVEL: f32 = 0.01;
    pub const MAX_WIND: f32 = 0.06;
}

/// Effect colors (0xRRGGBB), consumed by the renderer
pub mod colors {
    pub const LAUNCH_GLOW: u32 = 0xf8c927;
    pub const TRAIL: u32 = 0xf8c927;
    pub const DUST: u32 = 0x8b4513;
    pub const ENEMY_DESTROYED: u32 = 0xff0000;
    pub const ENEMY_DAMAGED: u32 = 0xffff00;
    pub const HEAL: u32 = 0x33ff66;
    pub const PROJECTILE_HIT: u32 = 0xff66ff;
    pub const POWERUP: u32 = 0x00ccff;
    pub const TRANSFORMATION: u32 = 0xffd700;
}

/// Circle-circle overlap: true iff the centers are closer than the sum of radii
#[inline]
pub fn circles_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    a.distance(b) < ra + rb
}

/// Unit vector for an angle in radians
#[inline]
pub fn direction_from_angle(theta: f32) -> Vec2 {
    Vec2::new(theta.cos(), theta.sin())
}
