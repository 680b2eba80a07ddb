//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One tick per frame, all rates per tick
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering, audio or platform dependencies

pub mod aim;
pub mod arena;
pub mod body;
pub mod collision;
pub mod enemy;
pub mod level;
pub mod particles;
pub mod powerup;
pub mod state;
pub mod tick;
pub mod wind;

pub use aim::{aim_cancel, aim_end, aim_move, aim_power, aim_start, predict_trajectory};
pub use arena::Arena;
pub use body::{AllyKind, CharacterKind, LaunchableBody, compute_launch_impulse};
pub use collision::{Contact, ContactRules, resolve_enemy_contact};
pub use enemy::{Enemy, EnemyProjectile, EnemyVariant};
pub use level::{
    EnemySpawn, LevelTemplate, PowerUpSpawn, advance, default_levels, levels_from_file,
    levels_from_json, load_level, reset_level, restart, star_rating,
};
pub use particles::{Particle, ParticleKind, ParticleSystem};
pub use powerup::{ActiveBuffs, BuffKind, Pickup, PickupKind, PowerUpKind, apply_power_up};
pub use state::{AudioCue, GameEvent, GamePhase, GameState, Hud, LevelProgress, Transition};
pub use tick::{InputEvent, TickInput, handle_input, tick};
pub use wind::Wind;
