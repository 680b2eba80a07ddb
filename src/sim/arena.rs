//! Arena bounds

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Rectangular play field. Origin is the top-left corner, y grows downward.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arena {
    pub width: f32,
    pub height: f32,
    /// Thickness of the ground strip the floor sits on
    #[serde(default = "default_ground")]
    pub ground_height: f32,
}

fn default_ground() -> f32 {
    GROUND_HEIGHT
}

impl Default for Arena {
    fn default() -> Self {
        Self::new(ARENA_WIDTH, ARENA_HEIGHT)
    }
}

impl Arena {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            ground_height: GROUND_HEIGHT,
        }
    }

    /// y coordinate bodies bounce off
    #[inline]
    pub fn floor(&self) -> f32 {
        self.height - self.ground_height
    }

    /// Where the primary body waits between shots
    pub fn primary_spawn(&self) -> Vec2 {
        Vec2::new(SPAWN_X, self.height - SPAWN_HEIGHT)
    }

    /// True if a circle at `pos` lies at least partly inside the arena
    pub fn contains_circle(&self, pos: Vec2, radius: f32) -> bool {
        pos.x > -radius
            && pos.x < self.width + radius
            && pos.y > -radius
            && pos.y < self.height + radius
    }
}
