//! Visual particle effects
//!
//! Particles never influence gameplay. Higher layers emit them to signal
//! events (launches, hits, heals, the bonus transformation) and the renderer
//! derives size and alpha from the remaining life.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::colors;

/// Particles per explosion burst
pub const EXPLOSION_PARTICLES: usize = 15;
/// Particles in the one-off transformation burst
pub const TRANSFORMATION_PARTICLES: usize = 50;
/// Velocity damping applied every tick
pub const PARTICLE_DAMPING: f32 = 0.98;

/// What emitted a particle; selects speed, lifetime and decay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParticleKind {
    Explosion,
    Trail,
    Transformation,
}

impl ParticleKind {
    /// Life lost per tick
    pub fn decay(self) -> f32 {
        match self {
            ParticleKind::Explosion => 0.02,
            ParticleKind::Trail => 0.05,
            ParticleKind::Transformation => 0.01,
        }
    }

    /// Starting life (transformation sparks outlast 1.0)
    fn initial_life(self) -> f32 {
        match self {
            ParticleKind::Explosion => 1.0,
            ParticleKind::Trail => 0.8,
            ParticleKind::Transformation => 1.5,
        }
    }

    /// Maximum absolute speed per axis at emission
    fn max_speed(self) -> f32 {
        match self {
            ParticleKind::Explosion => 5.0,
            ParticleKind::Trail => 1.0,
            ParticleKind::Transformation => 8.0,
        }
    }

    /// Base size range at emission
    fn size_range(self) -> (f32, f32) {
        match self {
            ParticleKind::Explosion => (2.0, 7.0),
            ParticleKind::Trail => (1.0, 4.0),
            ParticleKind::Transformation => (3.0, 9.0),
        }
    }
}

/// A particle for visual effects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub life: f32,
    pub decay: f32,
    /// 0xRRGGBB
    pub color: u32,
    pub size: f32,
    pub kind: ParticleKind,
}

impl Particle {
    /// Drawn radius shrinks with remaining life
    pub fn render_size(&self) -> f32 {
        self.size * self.life.max(0.0)
    }

    /// Drawn opacity in [0, 1]
    pub fn alpha(&self) -> f32 {
        self.life.clamp(0.0, 1.0)
    }
}

/// Owns every live particle
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParticleSystem {
    pub particles: Vec<Particle>,
}

impl ParticleSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }

    /// Standard burst of [`EXPLOSION_PARTICLES`] sparks
    pub fn emit_explosion(&mut self, rng: &mut impl Rng, pos: Vec2, color: u32) {
        self.emit_burst(rng, pos, color, EXPLOSION_PARTICLES);
    }

    /// Explosion-style burst with an explicit particle count
    pub fn emit_burst(&mut self, rng: &mut impl Rng, pos: Vec2, color: u32, count: usize) {
        for _ in 0..count {
            self.spawn(rng, ParticleKind::Explosion, pos, color);
        }
    }

    /// Single trail mote scattered around the body
    pub fn emit_trail(&mut self, rng: &mut impl Rng, pos: Vec2) {
        let jitter = Vec2::new(rng.random_range(-10.0..10.0), rng.random_range(-10.0..10.0));
        self.spawn(rng, ParticleKind::Trail, pos + jitter, colors::TRAIL);
    }

    /// Large long-lived burst for the bonus pickup
    pub fn emit_transformation(&mut self, rng: &mut impl Rng, pos: Vec2) {
        for _ in 0..TRANSFORMATION_PARTICLES {
            self.spawn(
                rng,
                ParticleKind::Transformation,
                pos,
                colors::TRANSFORMATION,
            );
        }
    }

    fn spawn(&mut self, rng: &mut impl Rng, kind: ParticleKind, pos: Vec2, color: u32) {
        let speed = kind.max_speed();
        let (min_size, max_size) = kind.size_range();
        self.particles.push(Particle {
            pos,
            vel: Vec2::new(
                rng.random_range(-speed..speed),
                rng.random_range(-speed..speed),
            ),
            life: kind.initial_life(),
            decay: kind.decay(),
            color,
            size: rng.random_range(min_size..max_size),
            kind,
        });
    }

    /// Move, damp and age every particle, dropping the dead ones
    pub fn tick(&mut self) {
        for particle in self.particles.iter_mut() {
            particle.pos += particle.vel;
            particle.vel *= PARTICLE_DAMPING;
            particle.life -= particle.decay;
        }
        self.particles.retain(|p| p.life > 0.0);
    }
}
