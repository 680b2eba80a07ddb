//! Per-level ambient wind

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::{WIND_BASE, WIND_PER_LEVEL};

/// Lateral force applied each tick to bodies that feel wind
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Wind {
    /// Magnitude of the push (per tick, non-negative)
    pub strength: f32,
    /// +1.0 blows right, -1.0 blows left
    pub direction: f32,
}

impl Wind {
    pub const CALM: Wind = Wind {
        strength: 0.0,
        direction: 1.0,
    };

    /// Horizontal acceleration contributed this tick
    #[inline]
    pub fn push(&self) -> f32 {
        self.strength * self.direction
    }

    /// Roll new wind for a level. The first level is always calm and
    /// strength grows with the level index up to `max_strength`.
    pub fn refresh(level_index: usize, max_strength: f32, rng: &mut impl Rng) -> Wind {
        if level_index == 0 || max_strength <= 0.0 {
            return Wind::CALM;
        }
        let ceiling = (WIND_BASE + WIND_PER_LEVEL * level_index as f32).min(max_strength);
        let strength = rng.random_range(0.0..=ceiling);
        let direction = if rng.random_bool(0.5) { 1.0 } else { -1.0 };
        Wind {
            strength,
            direction,
        }
    }
}
