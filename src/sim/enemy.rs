//! Enemy behavior automaton
//!
//! Each [`EnemyVariant`] maps to a fixed [`VariantProfile`]: an optional
//! patrol, weapon, heal cycle and charge cycle. [`Enemy::update`] runs the
//! profile once per tick. Destroyed enemies (`hit == true`) are inert.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::arena::Arena;
use crate::consts::*;
use crate::direction_from_angle;

/// Enemy types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnemyVariant {
    /// Stands still
    #[default]
    Normal,
    /// Paces left and right
    Moving,
    /// Lobs a shot toward the lower left every couple of seconds
    Shooter,
    /// Paces and slowly regenerates
    Cell,
    /// Rapid three-way spread
    Cooler,
    /// Paces, then periodically charges across a wider range
    Broly,
    /// Big, tough, shoots like a shooter
    Boss,
}

/// Horizontal oscillation around the spawn x
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Patrol {
    pub range: f32,
    pub speed: f32,
}

/// How a volley is laid out
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FirePattern {
    Single,
    /// `count` shots fanned `spread` radians apart
    Spread { count: u8, spread: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Weapon {
    pub interval: u32,
    pub pattern: FirePattern,
}

/// Idle build-up followed by a fast, wide sweep
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChargeCycle {
    pub idle_ticks: u32,
    pub speed_multiplier: f32,
    pub range: f32,
}

/// Static behavior table entry for one variant
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VariantProfile {
    pub radius: f32,
    pub patrol: Option<Patrol>,
    pub weapon: Option<Weapon>,
    pub heal_interval: Option<u32>,
    pub charge: Option<ChargeCycle>,
}

const INERT: VariantProfile = VariantProfile {
    radius: ENEMY_RADIUS,
    patrol: None,
    weapon: None,
    heal_interval: None,
    charge: None,
};

const SHOOTER_WEAPON: Weapon = Weapon {
    interval: 120,
    pattern: FirePattern::Single,
};

/// Shots leave toward the lower left: (-1, 0.5) in screen space
const AIM_ANGLE: f32 = 2.677_945; // atan2(0.5, -1)

impl EnemyVariant {
    /// Behavior table
    pub const fn profile(self) -> VariantProfile {
        match self {
            EnemyVariant::Normal => INERT,
            EnemyVariant::Moving => VariantProfile {
                patrol: Some(Patrol {
                    range: 100.0,
                    speed: 2.0,
                }),
                ..INERT
            },
            EnemyVariant::Shooter => VariantProfile {
                weapon: Some(SHOOTER_WEAPON),
                ..INERT
            },
            EnemyVariant::Cell => VariantProfile {
                patrol: Some(Patrol {
                    range: 80.0,
                    speed: 1.5,
                }),
                heal_interval: Some(300),
                ..INERT
            },
            EnemyVariant::Cooler => VariantProfile {
                weapon: Some(Weapon {
                    interval: 60,
                    pattern: FirePattern::Spread {
                        count: 3,
                        spread: 0.3,
                    },
                }),
                ..INERT
            },
            EnemyVariant::Broly => VariantProfile {
                patrol: Some(Patrol {
                    range: 100.0,
                    speed: 1.5,
                }),
                charge: Some(ChargeCycle {
                    idle_ticks: 240,
                    speed_multiplier: 3.0,
                    range: 150.0,
                }),
                ..INERT
            },
            EnemyVariant::Boss => VariantProfile {
                radius: BOSS_RADIUS,
                weapon: Some(SHOOTER_WEAPON),
                ..INERT
            },
        }
    }
}

/// A shot fired by an enemy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyProjectile {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Ticks left before it fizzles
    pub life: u32,
    pub radius: f32,
}

impl EnemyProjectile {
    pub fn new(pos: Vec2, vel: Vec2) -> Self {
        Self {
            pos,
            vel,
            life: PROJECTILE_LIFE,
            radius: PROJECTILE_RADIUS,
        }
    }
}

/// What an enemy did this tick that other systems should react to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnemyActions {
    pub healed: bool,
    pub shots_fired: usize,
}

/// An enemy entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub variant: EnemyVariant,
    pub pos: Vec2,
    /// Patrol center
    pub spawn_x: f32,
    pub health: u32,
    pub max_health: u32,
    /// Destroyed; never cleared for the rest of the level
    pub hit: bool,
    /// +1.0 moving right, -1.0 moving left
    pub direction: f32,
    pub fire_timer: u32,
    pub heal_timer: u32,
    pub idle_timer: u32,
    pub charging: bool,
    /// Bounds touched during the current charge
    pub sweep_reversals: u8,
    /// Damage is ignored while non-zero
    pub invulnerable_ticks: u32,
    /// Cosmetic hit wobble for the renderer
    pub shake_ticks: u32,
    pub projectiles: Vec<EnemyProjectile>,
}

impl Enemy {
    pub fn new(id: u32, variant: EnemyVariant, pos: Vec2, health: u32) -> Self {
        Self {
            id,
            variant,
            pos,
            spawn_x: pos.x,
            health,
            max_health: health,
            hit: false,
            direction: 1.0,
            fire_timer: 0,
            heal_timer: 0,
            idle_timer: 0,
            charging: false,
            sweep_reversals: 0,
            invulnerable_ticks: 0,
            shake_ticks: 0,
            projectiles: Vec::new(),
        }
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.variant.profile().radius
    }

    /// Can take damage right now
    #[inline]
    pub fn is_vulnerable(&self) -> bool {
        !self.hit && self.invulnerable_ticks == 0
    }

    /// Points awarded when destroyed
    pub fn bounty(&self) -> u64 {
        match self.variant {
            EnemyVariant::Boss => BOSS_POINTS,
            _ => POINTS_PER_HEALTH * self.max_health as u64,
        }
    }

    /// Apply one point of damage. Returns true if this destroyed the enemy.
    pub fn take_hit(&mut self, invulnerable_ticks: u32) -> bool {
        if self.hit {
            return false;
        }
        self.health = self.health.saturating_sub(1);
        self.shake_ticks = HIT_SHAKE_TICKS;
        if self.health == 0 {
            self.hit = true;
            self.projectiles.clear();
            true
        } else {
            self.invulnerable_ticks = invulnerable_ticks;
            false
        }
    }

    /// Advance this enemy's behavior by one tick
    pub fn update(&mut self, arena: &Arena) -> EnemyActions {
        let mut actions = EnemyActions::default();
        if self.hit {
            return actions;
        }

        self.invulnerable_ticks = self.invulnerable_ticks.saturating_sub(1);
        self.shake_ticks = self.shake_ticks.saturating_sub(1);

        let profile = self.variant.profile();

        if let Some(patrol) = profile.patrol {
            self.patrol(patrol, profile.charge);
        }

        if let Some(interval) = profile.heal_interval {
            self.heal_timer += 1;
            if self.heal_timer >= interval {
                self.heal_timer = 0;
                if self.health < self.max_health {
                    self.health += 1;
                    actions.healed = true;
                }
            }
        }

        if let Some(weapon) = profile.weapon {
            self.fire_timer += 1;
            if self.fire_timer >= weapon.interval {
                self.fire_timer = 0;
                actions.shots_fired = self.fire(weapon.pattern);
            }
        }

        self.update_projectiles(arena);
        actions
    }

    fn patrol(&mut self, patrol: Patrol, charge: Option<ChargeCycle>) {
        let (mut range, mut speed) = (patrol.range, patrol.speed);

        if let Some(charge) = charge {
            if self.charging {
                range = charge.range;
                speed *= charge.speed_multiplier;
            } else {
                self.idle_timer += 1;
                if self.idle_timer >= charge.idle_ticks {
                    self.idle_timer = 0;
                    self.charging = true;
                    self.sweep_reversals = 0;
                    log::debug!("Enemy {} charging", self.id);
                }
            }
        }

        self.pos.x += speed * self.direction;

        // Reverse only when heading further out, so a shrinking range
        // pulls the enemy back instead of snapping it
        let offset = self.pos.x - self.spawn_x;
        let reversed = (offset >= range && self.direction > 0.0)
            || (offset <= -range && self.direction < 0.0);
        if reversed {
            self.direction = -self.direction;
            if self.charging {
                self.sweep_reversals += 1;
                // Out to one bound and across to the other
                if self.sweep_reversals >= 2 {
                    self.charging = false;
                    self.sweep_reversals = 0;
                }
            }
        }
    }

    fn fire(&mut self, pattern: FirePattern) -> usize {
        match pattern {
            FirePattern::Single => {
                let vel = direction_from_angle(AIM_ANGLE) * PROJECTILE_SPEED;
                self.projectiles.push(EnemyProjectile::new(self.pos, vel));
                1
            }
            FirePattern::Spread { count, spread } => {
                let half = (count as f32 - 1.0) / 2.0;
                for i in 0..count {
                    let theta = AIM_ANGLE + (i as f32 - half) * spread;
                    let vel = direction_from_angle(theta) * PROJECTILE_SPEED;
                    self.projectiles.push(EnemyProjectile::new(self.pos, vel));
                }
                count as usize
            }
        }
    }

    fn update_projectiles(&mut self, arena: &Arena) {
        for projectile in self.projectiles.iter_mut() {
            projectile.pos += projectile.vel;
            projectile.life = projectile.life.saturating_sub(1);
        }
        self.projectiles
            .retain(|p| p.life > 0 && arena.contains_circle(p.pos, p.radius));
    }
}
