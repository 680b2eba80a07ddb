//! Data-driven game balance
//!
//! Every value defaults to the matching constant in [`crate::consts`]. A
//! JSON document may override any subset of fields.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;
use crate::sim::body::CharacterKind;

/// Motion and launch profile for one kind of launchable body
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CharacterProfile {
    /// Collision radius at rest
    pub radius: f32,
    /// Force at a force scale of 1.0
    pub base_force: f32,
    /// Upper bound on `distance / FORCE_DISTANCE_UNIT`
    pub force_cap: f32,
    /// Downward acceleration per tick
    pub gravity: f32,
    /// Both velocity components below this (near the floor) means at rest
    pub stop_threshold: f32,
    /// Whether level wind pushes this body
    pub feels_wind: bool,
}

/// Profiles for every character kind, built once when a session starts
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CharacterProfiles {
    pub primary: CharacterProfile,
    /// Primary after the level's bonus item is collected
    pub primary_empowered: CharacterProfile,
    pub vanguard: CharacterProfile,
    pub ranger: CharacterProfile,
    pub guardian: CharacterProfile,
}

impl Default for CharacterProfiles {
    fn default() -> Self {
        let primary = CharacterProfile {
            radius: PRIMARY_RADIUS,
            base_force: PRIMARY_BASE_FORCE,
            force_cap: PRIMARY_FORCE_CAP,
            gravity: GRAVITY,
            stop_threshold: STOP_THRESHOLD,
            feels_wind: true,
        };
        Self {
            primary,
            primary_empowered: CharacterProfile {
                base_force: EMPOWERED_BASE_FORCE,
                force_cap: EMPOWERED_FORCE_CAP,
                gravity: EMPOWERED_GRAVITY,
                stop_threshold: EMPOWERED_STOP_THRESHOLD,
                ..primary
            },
            // Balanced all-rounder
            vanguard: CharacterProfile {
                radius: 22.0,
                base_force: 24.0,
                gravity: 0.3,
                feels_wind: false,
                ..primary
            },
            // Light and fast, floats further
            ranger: CharacterProfile {
                radius: 18.0,
                base_force: 28.0,
                gravity: 0.2,
                feels_wind: false,
                ..primary
            },
            // Heavy, short arcs
            guardian: CharacterProfile {
                radius: 30.0,
                base_force: 18.0,
                force_cap: 2.5,
                gravity: 0.4,
                feels_wind: false,
                ..primary
            },
        }
    }
}

impl CharacterProfiles {
    /// Profile lookup keyed by character kind
    pub fn get(&self, kind: CharacterKind, empowered: bool) -> &CharacterProfile {
        use crate::sim::body::AllyKind;
        match kind {
            CharacterKind::Primary if empowered => &self.primary_empowered,
            CharacterKind::Primary => &self.primary,
            CharacterKind::Ally(AllyKind::Vanguard) => &self.vanguard,
            CharacterKind::Ally(AllyKind::Ranger) => &self.ranger,
            CharacterKind::Ally(AllyKind::Guardian) => &self.guardian,
        }
    }
}

/// Game balance knobs
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub characters: CharacterProfiles,
    /// Velocity damping applied every tick
    pub friction: f32,
    /// Fraction of speed kept after a wall/floor bounce
    pub bounce_reduction: f32,
    pub launch_dead_zone: f32,
    pub max_drag_distance: f32,
    pub max_shots: u32,
    pub buff_duration_ticks: u32,
    pub transition_delay_ticks: u32,
    pub trail_length: usize,
    pub hit_invulnerable_ticks: u32,
    pub knockback_speed: f32,
    pub max_wind: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            characters: CharacterProfiles::default(),
            friction: FRICTION,
            bounce_reduction: BOUNCE_REDUCTION,
            launch_dead_zone: LAUNCH_DEAD_ZONE,
            max_drag_distance: MAX_DRAG_DISTANCE,
            max_shots: MAX_SHOTS,
            buff_duration_ticks: BUFF_DURATION_TICKS,
            transition_delay_ticks: TRANSITION_DELAY_TICKS,
            trail_length: TRAIL_LENGTH,
            hit_invulnerable_ticks: HIT_INVULNERABLE_TICKS,
            knockback_speed: KNOCKBACK_SPEED,
            max_wind: MAX_WIND,
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) tuning document and validate it
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Read and parse a tuning file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Parse a tuning document, falling back to defaults on any error
    pub fn load_or_default(json: &str) -> Self {
        match Self::from_json(json) {
            Ok(tuning) => {
                log::info!("Loaded tuning overrides");
                tuning
            }
            Err(err) => {
                log::warn!("Ignoring tuning file ({}), using defaults", err);
                Self::default()
            }
        }
    }

    /// Reject values that would break the motion model
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.friction) {
            return Err(ConfigError::OutOfRange {
                name: "friction",
                value: self.friction,
                expected: "[0, 1]",
            });
        }
        if !(0.0..1.0).contains(&self.bounce_reduction) {
            return Err(ConfigError::OutOfRange {
                name: "bounce_reduction",
                value: self.bounce_reduction,
                expected: "[0, 1)",
            });
        }
        if self.max_shots == 0 {
            return Err(ConfigError::OutOfRange {
                name: "max_shots",
                value: 0.0,
                expected: "at least 1",
            });
        }
        if self.trail_length == 0 {
            return Err(ConfigError::OutOfRange {
                name: "trail_length",
                value: 0.0,
                expected: "at least 1",
            });
        }
        Ok(())
    }
}
