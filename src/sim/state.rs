//! Simulation context and core session types
//!
//! Everything the tick loop mutates is owned by [`GameState`]; there is no
//! ambient mutable state anywhere else in the crate.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::arena::Arena;
use super::body::LaunchableBody;
use super::enemy::Enemy;
use super::level::{LevelTemplate, default_levels, load_level};
use super::particles::ParticleSystem;
use super::powerup::{ActiveBuffs, Pickup, PickupKind};
use super::wind::Wind;
use crate::tuning::{CharacterProfile, Tuning};

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Game is paused
    Paused,
    /// Level won; waiting for [`super::level::advance`]
    LevelComplete,
    /// Out of shots with enemies left
    GameOver,
    /// Ran past the last level
    AllLevelsComplete,
}

/// Named sound requests. Playback is the host's business.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AudioCue {
    Launch,
    Impact,
    PowerUp,
    Transformation,
}

/// Things that happened this tick, for audio/UI collaborators
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    Cue(AudioCue),
    Launched { body_id: u32 },
    EnemyDamaged { enemy_id: u32 },
    EnemyDestroyed { enemy_id: u32, points: u64 },
    PickupCollected { kind: PickupKind },
    /// An enemy shot reached the primary body
    BodyStruck { body_id: u32 },
    LevelComplete { level: usize, stars: u8, score: u64 },
    GameOver { level: usize, score: u64 },
    AllLevelsComplete { score: u64, total_stars: u32 },
}

/// Deferred phase changes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Transition {
    LevelComplete,
    GameOver,
}

/// Single-shot timers on the tick timeline
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Schedule {
    pending: Vec<(u64, Transition)>,
}

impl Schedule {
    pub fn schedule(&mut self, transition: Transition, fire_at: u64) {
        self.pending.push((fire_at, transition));
    }

    /// Drop every pending transition (level reload)
    pub fn cancel_all(&mut self) {
        self.pending.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Remove and return transitions due at or before `now`, in firing order
    pub fn take_due(&mut self, now: u64) -> Vec<Transition> {
        let mut due: Vec<(u64, Transition)> = Vec::new();
        self.pending.retain(|&(at, transition)| {
            if at <= now {
                due.push((at, transition));
                false
            } else {
                true
            }
        });
        due.sort_by_key(|&(at, _)| at);
        due.into_iter().map(|(_, t)| t).collect()
    }
}

/// An aim in progress
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aim {
    /// Index into [`GameState::bodies`]
    pub body_index: usize,
    /// Where the body sat when the drag began
    pub anchor: Vec2,
}

/// Per-level counters and one-shot guards, plus the run totals
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LevelProgress {
    pub level_index: usize,
    pub shots_used: u32,
    pub max_shots: u32,
    /// Cumulative over the run
    pub score: u64,
    pub total_stars: u32,
    /// Stars banked per finished level
    pub level_stars: Vec<u8>,
    pub bonus_collected: bool,
    /// Bonus item taken: stronger launch, lighter gravity
    pub empowered: bool,
    pub complete_scheduled: bool,
    pub game_over_scheduled: bool,
}

/// Read-only counters for the score display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hud {
    pub score: u64,
    pub level_index: usize,
    pub shots_used: u32,
    pub max_shots: u32,
    pub total_stars: u32,
    pub empowered: bool,
}

/// Complete simulation context (deterministic given the seed and inputs)
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub tuning: Tuning,
    pub levels: Vec<LevelTemplate>,
    pub arena: Arena,
    pub phase: GamePhase,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub progress: LevelProgress,
    pub wind: Wind,
    /// Primary body first, then helpers in spawn order
    pub bodies: Vec<LaunchableBody>,
    pub enemies: Vec<Enemy>,
    pub pickups: Vec<Pickup>,
    pub buffs: ActiveBuffs,
    /// Visual only; never read back by gameplay
    pub particles: ParticleSystem,
    pub aim: Option<Aim>,
    pub schedule: Schedule,
    pub(crate) events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// New run on the built-in campaign with default tuning
    pub fn new(seed: u64) -> Self {
        Self::with_config(seed, Tuning::default(), default_levels(Arena::default()))
    }

    /// New run with custom balance and levels. Starts on the first level.
    pub fn with_config(seed: u64, tuning: Tuning, levels: Vec<LevelTemplate>) -> Self {
        let arena = levels.first().map(|l| l.arena).unwrap_or_default();
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            tuning,
            levels,
            arena,
            phase: GamePhase::Playing,
            time_ticks: 0,
            progress: LevelProgress::default(),
            wind: Wind::CALM,
            bodies: Vec::new(),
            enemies: Vec::new(),
            pickups: Vec::new(),
            buffs: ActiveBuffs::default(),
            particles: ParticleSystem::new(),
            aim: None,
            schedule: Schedule::default(),
            events: Vec::new(),
            next_id: 1,
        };
        load_level(&mut state, 0);
        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take every event queued since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// The primary body (always present once a level is loaded)
    pub fn primary(&self) -> Option<&LaunchableBody> {
        self.bodies.first()
    }

    /// Motion profile currently in force for `body`
    pub fn profile_for(&self, body: &LaunchableBody) -> CharacterProfile {
        *self.tuning.characters.get(body.kind, self.progress.empowered)
    }

    pub fn hud(&self) -> Hud {
        Hud {
            score: self.progress.score,
            level_index: self.progress.level_index,
            shots_used: self.progress.shots_used,
            max_shots: self.progress.max_shots,
            total_stars: self.progress.total_stars,
            empowered: self.progress.empowered,
        }
    }

    pub fn all_enemies_destroyed(&self) -> bool {
        self.enemies.iter().all(|e| e.hit)
    }

    pub fn all_bodies_at_rest(&self) -> bool {
        self.bodies.iter().all(|b| !b.launched)
    }
}
