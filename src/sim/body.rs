//! Launchable bodies: the primary fighter and helper allies
//!
//! A body waits at its spawn point until the player drags and releases it.
//! Once launched it integrates gravity, wind and friction every tick,
//! bounces off the arena edges and returns to its spawn pose when it comes
//! to rest (or falls out of the arena).

use std::collections::VecDeque;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::arena::Arena;
use crate::consts::*;
use crate::tuning::CharacterProfile;

/// Helper characters granted by ally pickups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllyKind {
    Vanguard,
    Ranger,
    Guardian,
}

/// Which fighter a body represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CharacterKind {
    Primary,
    Ally(AllyKind),
}

/// A body the player can aim and launch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LaunchableBody {
    pub id: u32,
    pub kind: CharacterKind,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Rest pose the body returns to after each shot
    pub spawn: Vec2,
    pub launched: bool,
    /// Past positions, most recent last
    #[serde(skip)]
    pub trail: VecDeque<Vec2>,
    /// Enemies damaged during the overlap still in progress
    #[serde(skip)]
    pub struck: Vec<u32>,
}

impl LaunchableBody {
    pub fn new(id: u32, kind: CharacterKind, spawn: Vec2, radius: f32) -> Self {
        Self {
            id,
            kind,
            pos: spawn,
            vel: Vec2::ZERO,
            radius,
            spawn,
            launched: false,
            trail: VecDeque::with_capacity(TRAIL_LENGTH),
            struck: Vec::new(),
        }
    }

    #[inline]
    pub fn is_primary(&self) -> bool {
        self.kind == CharacterKind::Primary
    }

    /// True if a pointer at `point` grabs this body
    pub fn contains_point(&self, point: Vec2) -> bool {
        self.pos.distance(point) < self.radius
    }

    /// Start flight with the given velocity
    pub fn launch(&mut self, impulse: Vec2) {
        self.vel = impulse;
        self.launched = true;
        self.trail.clear();
        self.struck.clear();
    }

    /// Record current position to trail (call each tick while launched)
    pub fn record_trail(&mut self, cap: usize) {
        self.trail.push_back(self.pos);
        while self.trail.len() > cap {
            self.trail.pop_front();
        }
    }

    /// One tick of motion: gravity, wind, friction, then position
    pub fn integrate(&mut self, gravity: f32, wind_push: f32, friction: f32) {
        self.vel.y += gravity;
        self.vel.x += wind_push;
        self.vel *= friction;
        self.pos += self.vel;
    }

    /// Clamp to the arena and bounce off any edge crossed.
    ///
    /// Returns the contact point when the floor bounce was hard enough to
    /// kick up dust.
    pub fn apply_bounds(&mut self, arena: &Arena, bounce_reduction: f32) -> Option<Vec2> {
        let mut impact = None;

        let floor = arena.floor();
        if self.pos.y + self.radius > floor {
            self.pos.y = floor - self.radius;
            self.vel.y *= -bounce_reduction;
            if self.vel.y.abs() > HARD_BOUNCE_SPEED {
                impact = Some(self.pos);
            }
        }
        if self.pos.y - self.radius < 0.0 {
            self.pos.y = self.radius;
            self.vel.y *= -bounce_reduction;
        }
        if self.pos.x - self.radius < 0.0 {
            self.pos.x = self.radius;
            self.vel.x *= -bounce_reduction;
        }
        if self.pos.x + self.radius > arena.width {
            self.pos.x = arena.width - self.radius;
            self.vel.x *= -bounce_reduction;
        }

        impact
    }

    /// Settled near the floor, or fell out of the arena
    pub fn should_rest(&self, arena: &Arena, stop_threshold: f32) -> bool {
        let slow = self.vel.x.abs() < stop_threshold && self.vel.y.abs() < stop_threshold;
        let near_floor = self.pos.y > arena.height - REST_ZONE_HEIGHT;
        let fell_out = self.pos.y > arena.height + FALL_OUT_DISTANCE;
        (slow && near_floor) || fell_out
    }

    /// Back to the spawn pose, un-launched. The radius is left alone so
    /// size buffs survive between shots.
    pub fn reset_to_spawn(&mut self) {
        self.pos = self.spawn;
        self.vel = Vec2::ZERO;
        self.launched = false;
        self.trail.clear();
        self.struck.clear();
    }

    /// Already damaged `enemy_id` without separating since
    #[inline]
    pub fn has_struck(&self, enemy_id: u32) -> bool {
        self.struck.contains(&enemy_id)
    }
}

/// Velocity produced by releasing a drag.
///
/// `drag` points from the body's dragged position back to its anchor. The
/// force scale is `min(distance / 50, force_cap)`; releases inside the dead
/// zone produce no impulse at all.
pub fn compute_launch_impulse(
    drag: Vec2,
    profile: &CharacterProfile,
    multiplier: f32,
    dead_zone: f32,
) -> Vec2 {
    let distance = drag.length();
    if distance <= dead_zone {
        return Vec2::ZERO;
    }
    let force =
        (distance / FORCE_DISTANCE_UNIT).min(profile.force_cap) * profile.base_force * multiplier;
    drag / distance * force
}
