//! Power-ups, timed buffs and helper allies
//!
//! Ally pickups add a persistent helper body for the rest of the level.
//! Every other power-up grants (or refreshes) a timed buff.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::{AllyKind, CharacterKind, LaunchableBody};
use super::state::{AudioCue, GameEvent, GameState};
use crate::colors;
use crate::consts::*;

/// Timed modifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuffKind {
    /// Launch force multiplier
    Speed,
    /// Extra launch effects
    Multishot,
    /// No knockback off enemies; plough through several in one flight
    Pierce,
    /// Bigger primary body
    Giant,
}

/// What a power-up pickup grants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PowerUpKind {
    Buff(BuffKind),
    Ally(AllyKind),
}

/// Collectible item kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PickupKind {
    PowerUp(PowerUpKind),
    /// The level's unique bonus item; empowers the primary body
    Bonus,
}

/// A pickup entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pickup {
    pub id: u32,
    pub kind: PickupKind,
    pub pos: Vec2,
    pub radius: f32,
    /// One-shot; never cleared for the rest of the level
    pub collected: bool,
    /// Cosmetic spin (radians)
    pub rotation: f32,
    /// Cosmetic glow phase (radians)
    pub pulse: f32,
}

impl Pickup {
    pub fn new(id: u32, kind: PickupKind, pos: Vec2) -> Self {
        let radius = match kind {
            PickupKind::Bonus => BONUS_RADIUS,
            PickupKind::PowerUp(_) => PICKUP_RADIUS,
        };
        Self {
            id,
            kind,
            pos,
            radius,
            collected: false,
            rotation: 0.0,
            pulse: 0.0,
        }
    }

    /// Advance the idle animation
    pub fn animate(&mut self) {
        self.rotation += 0.02;
        self.pulse += 0.1;
    }
}

/// A running buff
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveBuff {
    pub kind: BuffKind,
    pub remaining_ticks: u32,
}

/// At most one entry per buff kind
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActiveBuffs {
    buffs: Vec<ActiveBuff>,
}

impl ActiveBuffs {
    /// Start a buff, or restart its timer if already running
    pub fn grant(&mut self, kind: BuffKind, duration: u32) {
        match self.buffs.iter_mut().find(|b| b.kind == kind) {
            Some(buff) => buff.remaining_ticks = duration,
            None => self.buffs.push(ActiveBuff {
                kind,
                remaining_ticks: duration,
            }),
        }
    }

    pub fn is_active(&self, kind: BuffKind) -> bool {
        self.buffs.iter().any(|b| b.kind == kind)
    }

    pub fn remaining(&self, kind: BuffKind) -> Option<u32> {
        self.buffs
            .iter()
            .find(|b| b.kind == kind)
            .map(|b| b.remaining_ticks)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ActiveBuff> {
        self.buffs.iter()
    }

    pub fn len(&self) -> usize {
        self.buffs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffs.is_empty()
    }

    pub fn clear(&mut self) {
        self.buffs.clear();
    }

    /// Count every buff down one tick; returns the kinds that expired
    pub fn tick(&mut self) -> Vec<BuffKind> {
        let mut expired = Vec::new();
        for buff in self.buffs.iter_mut() {
            buff.remaining_ticks = buff.remaining_ticks.saturating_sub(1);
            if buff.remaining_ticks == 0 {
                expired.push(buff.kind);
            }
        }
        self.buffs.retain(|b| b.remaining_ticks > 0);
        expired
    }

    /// Launch force multiplier from active buffs
    pub fn force_multiplier(&self) -> f32 {
        if self.is_active(BuffKind::Speed) {
            SPEED_BUFF_MULTIPLIER
        } else {
            1.0
        }
    }
}

/// Apply a collected power-up
pub fn apply_power_up(state: &mut GameState, kind: PowerUpKind, at: Vec2) {
    match kind {
        PowerUpKind::Ally(ally) => spawn_ally(state, ally),
        PowerUpKind::Buff(buff) => {
            state.buffs.grant(buff, state.tuning.buff_duration_ticks);
            if buff == BuffKind::Giant {
                let base = state.tuning.characters.primary.radius;
                if let Some(primary) = state.bodies.first_mut() {
                    primary.radius = base * GIANT_RADIUS_MULTIPLIER;
                }
            }
            log::info!("Buff {:?} active for {} ticks", buff, state.tuning.buff_duration_ticks);
        }
    }
    state.particles.emit_explosion(&mut state.rng, at, colors::POWERUP);
    state.push_event(GameEvent::Cue(AudioCue::PowerUp));
}

/// Add a helper body beside the existing ones
fn spawn_ally(state: &mut GameState, ally: AllyKind) {
    let kind = CharacterKind::Ally(ally);
    let radius = state.tuning.characters.get(kind, false).radius;
    let helpers = state.bodies.len().saturating_sub(1);
    let spawn = state.arena.primary_spawn()
        + Vec2::new(HELPER_SPAWN_SPACING * (helpers + 1) as f32, 0.0);
    let id = state.next_entity_id();
    state.bodies.push(LaunchableBody::new(id, kind, spawn, radius));
    log::info!("Ally {:?} joined at x={}", ally, spawn.x);
}
