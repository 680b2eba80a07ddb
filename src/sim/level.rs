//! Level templates and progression
//!
//! A level template is opaque configuration: arena bounds, enemy spawns and
//! power-up placements. Loading a level throws away the previous level's
//! entities wholesale and rebuilds them from the template.

use std::path::Path;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::arena::Arena;
use super::body::{AllyKind, CharacterKind, LaunchableBody};
use super::enemy::{Enemy, EnemyVariant};
use super::powerup::{BuffKind, Pickup, PickupKind, PowerUpKind};
use super::state::{GameEvent, GamePhase, GameState};
use super::wind::Wind;
use crate::consts::*;
use crate::error::ConfigError;

/// One enemy in a level template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemySpawn {
    pub pos: Vec2,
    pub health: u32,
    #[serde(default)]
    pub variant: EnemyVariant,
}

/// One power-up placed in a level template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerUpSpawn {
    pub pos: Vec2,
    pub kind: PowerUpKind,
}

/// Everything needed to build a level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelTemplate {
    pub arena: Arena,
    pub enemies: Vec<EnemySpawn>,
    #[serde(default)]
    pub power_ups: Vec<PowerUpSpawn>,
    /// Overrides the tuning's shot limit for this level
    #[serde(default)]
    pub max_shots: Option<u32>,
}

impl LevelTemplate {
    fn new(arena: Arena, enemies: Vec<EnemySpawn>, power_ups: Vec<PowerUpSpawn>) -> Self {
        Self {
            arena,
            enemies,
            power_ups,
            max_shots: None,
        }
    }
}

/// Parse and validate a JSON array of level templates
pub fn levels_from_json(json: &str) -> Result<Vec<LevelTemplate>, ConfigError> {
    let levels: Vec<LevelTemplate> = serde_json::from_str(json)?;
    validate_levels(&levels)?;
    log::info!("Loaded level pack with {} levels", levels.len());
    Ok(levels)
}

/// Read a level pack from disk
pub fn levels_from_file(path: impl AsRef<Path>) -> Result<Vec<LevelTemplate>, ConfigError> {
    let json = std::fs::read_to_string(path)?;
    levels_from_json(&json)
}

/// Reject packs the state machine could never finish
pub fn validate_levels(levels: &[LevelTemplate]) -> Result<(), ConfigError> {
    if levels.is_empty() {
        return Err(ConfigError::EmptyLevelPack);
    }
    for (level, template) in levels.iter().enumerate() {
        if template.arena.width <= 0.0 || template.arena.height <= 0.0 {
            return Err(ConfigError::OutOfRange {
                name: "arena",
                value: template.arena.width.min(template.arena.height),
                expected: "positive width and height",
            });
        }
        if template.enemies.is_empty() {
            return Err(ConfigError::EmptyLevel { level });
        }
        for (index, spawn) in template.enemies.iter().enumerate() {
            if spawn.health == 0 {
                return Err(ConfigError::InvalidEnemy {
                    level,
                    index,
                    reason: "health must be at least 1",
                });
            }
            if !spawn.pos.is_finite() {
                return Err(ConfigError::InvalidEnemy {
                    level,
                    index,
                    reason: "position must be finite",
                });
            }
        }
        if template.max_shots == Some(0) {
            return Err(ConfigError::OutOfRange {
                name: "max_shots",
                value: 0.0,
                expected: "at least 1",
            });
        }
    }
    Ok(())
}

/// Built-in campaign, laid out relative to the arena's right wall and floor
pub fn default_levels(arena: Arena) -> Vec<LevelTemplate> {
    let w = arena.width;
    let h = arena.height;
    let enemy = |dx: f32, dy: f32, health: u32, variant: EnemyVariant| EnemySpawn {
        pos: Vec2::new(w - dx, h - dy),
        health,
        variant,
    };
    let power_up = |x: f32, dy: f32, kind: PowerUpKind| PowerUpSpawn {
        pos: Vec2::new(x, h - dy),
        kind,
    };
    use EnemyVariant::*;

    vec![
        LevelTemplate::new(arena, vec![enemy(150.0, 80.0, 1, Normal)], vec![]),
        LevelTemplate::new(
            arena,
            vec![enemy(200.0, 80.0, 1, Normal), enemy(120.0, 150.0, 1, Normal)],
            vec![],
        ),
        LevelTemplate::new(
            arena,
            vec![
                enemy(250.0, 80.0, 2, Normal),
                enemy(150.0, 120.0, 1, Moving),
                enemy(80.0, 180.0, 1, Normal),
            ],
            vec![power_up(w * 0.4, 260.0, PowerUpKind::Buff(BuffKind::Speed))],
        ),
        LevelTemplate::new(
            arena,
            vec![
                enemy(300.0, 80.0, 2, Moving),
                enemy(200.0, 140.0, 2, Normal),
                enemy(100.0, 200.0, 1, Shooter),
                enemy(150.0, 260.0, 1, Normal),
            ],
            vec![
                power_up(w * 0.35, 300.0, PowerUpKind::Buff(BuffKind::Pierce)),
                power_up(w * 0.5, 180.0, PowerUpKind::Ally(AllyKind::Vanguard)),
            ],
        ),
        LevelTemplate::new(
            arena,
            vec![
                enemy(350.0, 80.0, 3, Cell),
                enemy(250.0, 120.0, 2, Normal),
                enemy(150.0, 160.0, 2, Cooler),
                enemy(80.0, 220.0, 1, Shooter),
                enemy(200.0, 280.0, 1, Moving),
            ],
            vec![
                power_up(w * 0.3, 240.0, PowerUpKind::Buff(BuffKind::Multishot)),
                power_up(w * 0.45, 340.0, PowerUpKind::Ally(AllyKind::Ranger)),
            ],
        ),
        LevelTemplate::new(
            arena,
            vec![
                enemy(400.0, 80.0, 3, Broly),
                enemy(250.0, 150.0, 2, Cell),
                enemy(120.0, 220.0, 2, Cooler),
                enemy(200.0, 300.0, 1, Moving),
            ],
            vec![
                power_up(w * 0.3, 280.0, PowerUpKind::Buff(BuffKind::Giant)),
                power_up(w * 0.5, 200.0, PowerUpKind::Ally(AllyKind::Guardian)),
            ],
        ),
        LevelTemplate::new(
            arena,
            vec![
                enemy(250.0, 130.0, 8, Boss),
                enemy(420.0, 80.0, 2, Moving),
                enemy(100.0, 260.0, 2, Shooter),
            ],
            vec![
                power_up(w * 0.3, 260.0, PowerUpKind::Buff(BuffKind::Pierce)),
                power_up(w * 0.45, 360.0, PowerUpKind::Buff(BuffKind::Speed)),
                power_up(w * 0.55, 180.0, PowerUpKind::Ally(AllyKind::Vanguard)),
            ],
        ),
    ]
}

/// Stars for a finished level: 1, +1 for finishing in two shots or fewer,
/// +1 for collecting the bonus item
pub fn star_rating(shots_used: u32, bonus_collected: bool) -> u8 {
    let mut stars = 1;
    if shots_used <= 2 {
        stars += 1;
    }
    if bonus_collected {
        stars += 1;
    }
    stars.min(MAX_STARS)
}

/// Build level `index` from its template. An index past the end of the
/// campaign ends the game as won.
pub fn load_level(state: &mut GameState, index: usize) {
    state.schedule.cancel_all();
    state.aim = None;

    let Some(template) = state.levels.get(index).cloned() else {
        log::info!("All {} levels complete, final score {}", state.levels.len(), state.progress.score);
        state.phase = GamePhase::AllLevelsComplete;
        state.push_event(GameEvent::AllLevelsComplete {
            score: state.progress.score,
            total_stars: state.progress.total_stars,
        });
        return;
    };

    let progress = &mut state.progress;
    progress.level_index = index;
    progress.shots_used = 0;
    progress.max_shots = template.max_shots.unwrap_or(state.tuning.max_shots);
    progress.bonus_collected = false;
    progress.empowered = false;
    progress.complete_scheduled = false;
    progress.game_over_scheduled = false;

    state.arena = template.arena;
    state.wind = Wind::refresh(index, state.tuning.max_wind, &mut state.rng);
    state.buffs.clear();
    state.particles.clear();

    state.bodies.clear();
    let id = state.next_entity_id();
    let radius = state.tuning.characters.get(CharacterKind::Primary, false).radius;
    state.bodies.push(LaunchableBody::new(
        id,
        CharacterKind::Primary,
        state.arena.primary_spawn(),
        radius,
    ));

    state.enemies.clear();
    for spawn in &template.enemies {
        let id = state.next_entity_id();
        state
            .enemies
            .push(Enemy::new(id, spawn.variant, spawn.pos, spawn.health));
    }

    state.pickups.clear();
    for spawn in &template.power_ups {
        let id = state.next_entity_id();
        state
            .pickups
            .push(Pickup::new(id, PickupKind::PowerUp(spawn.kind), spawn.pos));
    }
    let bonus_pos = random_bonus_position(&state.arena, &mut state.rng);
    let id = state.next_entity_id();
    state.pickups.push(Pickup::new(id, PickupKind::Bonus, bonus_pos));

    state.phase = GamePhase::Playing;
    log::info!(
        "Level {}: {} enemies, {} power-ups, wind {:.3} x {}",
        index + 1,
        state.enemies.len(),
        template.power_ups.len(),
        state.wind.strength,
        state.wind.direction
    );
}

fn random_bonus_position(arena: &Arena, rng: &mut impl Rng) -> Vec2 {
    let mut span = |extent: f32| {
        if extent > 2.0 * BONUS_MARGIN {
            rng.random_range(BONUS_MARGIN..extent - BONUS_MARGIN)
        } else {
            extent / 2.0
        }
    };
    let x = span(arena.width);
    let y = span(arena.height);
    Vec2::new(x, y)
}

/// Move on from a completed level: bank its stars, then load the next one.
/// Score carries over.
pub fn advance(state: &mut GameState) {
    if state.phase != GamePhase::LevelComplete {
        log::warn!("advance() ignored in phase {:?}", state.phase);
        return;
    }
    let stars = star_rating(state.progress.shots_used, state.progress.bonus_collected);
    state.progress.level_stars.push(stars);
    state.progress.total_stars += stars as u32;
    log::info!(
        "Level {} banked {} stars ({} total)",
        state.progress.level_index + 1,
        stars,
        state.progress.total_stars
    );
    load_level(state, state.progress.level_index + 1);
}

/// Replay the current level from scratch; pending transitions are cancelled
/// and the score is kept
pub fn reset_level(state: &mut GameState) {
    log::info!("Resetting level {}", state.progress.level_index + 1);
    load_level(state, state.progress.level_index);
}

/// New run from the first level
pub fn restart(state: &mut GameState) {
    state.progress.score = 0;
    state.progress.total_stars = 0;
    state.progress.level_stars.clear();
    load_level(state, 0);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Transition;

    #[test]
    fn test_star_rating() {
        assert_eq!(star_rating(3, false), 1);
        assert_eq!(star_rating(2, false), 2);
        assert_eq!(star_rating(1, true), 3);
        assert_eq!(star_rating(3, true), 2);
        assert_eq!(star_rating(0, true), MAX_STARS);
    }

    #[test]
    fn test_default_levels_are_valid() {
        let levels = default_levels(Arena::default());
        assert_eq!(levels.len(), 7);
        assert!(validate_levels(&levels).is_ok());
        assert_eq!(levels[0].enemies.len(), 1);
        assert!(
            levels
                .last()
                .unwrap()
                .enemies
                .iter()
                .any(|e| e.variant == EnemyVariant::Boss)
        );
    }

    #[test]
    fn test_levels_from_json() {
        let json = r#"[
            {
                "arena": { "width": 800, "height": 600 },
                "enemies": [
                    { "pos": [600, 500], "health": 2 },
                    { "pos": [700, 400], "health": 1, "variant": "shooter" }
                ],
                "power_ups": [
                    { "pos": [300, 300], "kind": { "buff": "pierce" } },
                    { "pos": [350, 300], "kind": { "ally": "ranger" } }
                ],
                "max_shots": 4
            }
        ]"#;
        let levels = levels_from_json(json).unwrap();
        assert_eq!(levels[0].arena.ground_height, GROUND_HEIGHT);
        assert_eq!(levels[0].enemies[0].variant, EnemyVariant::Normal);
        assert_eq!(levels[0].enemies[1].variant, EnemyVariant::Shooter);
        assert_eq!(
            levels[0].power_ups[1].kind,
            PowerUpKind::Ally(AllyKind::Ranger)
        );
        assert_eq!(levels[0].max_shots, Some(4));
    }

    #[test]
    fn test_level_validation_errors() {
        assert!(matches!(
            levels_from_json("[]"),
            Err(ConfigError::EmptyLevelPack)
        ));
        let zero_health = r#"[{ "arena": { "width": 800, "height": 600 },
            "enemies": [{ "pos": [1, 1], "health": 0 }] }]"#;
        assert!(matches!(
            levels_from_json(zero_health),
            Err(ConfigError::InvalidEnemy { level: 0, index: 0, .. })
        ));
        let no_enemies = r#"[{ "arena": { "width": 800, "height": 600 }, "enemies": [] }]"#;
        assert!(matches!(
            levels_from_json(no_enemies),
            Err(ConfigError::EmptyLevel { level: 0 })
        ));
        assert!(matches!(levels_from_json("{"), Err(ConfigError::Parse(_))));
        assert!(matches!(
            levels_from_file("/nonexistent/sling-arena/levels.json"),
            Err(ConfigError::Io(_))
        ));
    }

    #[test]
    fn test_load_level_builds_entities() {
        let mut state = GameState::new(11);
        load_level(&mut state, 4);
        assert_eq!(state.progress.level_index, 4);
        assert_eq!(state.enemies.len(), 5);
        assert_eq!(state.bodies.len(), 1);
        assert!(state.bodies[0].is_primary());
        // Two power-ups plus the bonus item
        assert_eq!(state.pickups.len(), 3);
        let bonus = state
            .pickups
            .iter()
            .find(|p| p.kind == PickupKind::Bonus)
            .unwrap();
        assert!(bonus.pos.x >= BONUS_MARGIN && bonus.pos.x < state.arena.width - BONUS_MARGIN);
        assert!(bonus.pos.y >= BONUS_MARGIN && bonus.pos.y < state.arena.height - BONUS_MARGIN);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_advance_round_trip() {
        let mut state = GameState::new(3);
        state.progress.score = 1234;
        state.progress.shots_used = 2;
        state.progress.bonus_collected = true;
        state.progress.complete_scheduled = true;
        state.buffs.grant(BuffKind::Speed, 100);
        state.phase = GamePhase::LevelComplete;

        advance(&mut state);

        assert_eq!(state.progress.level_index, 1);
        assert_eq!(state.progress.shots_used, 0);
        assert!(!state.progress.bonus_collected);
        assert!(!state.progress.complete_scheduled);
        assert!(!state.progress.game_over_scheduled);
        assert!(state.buffs.is_empty());
        assert_eq!(state.progress.score, 1234);
        assert_eq!(state.progress.total_stars, 3);
        assert_eq!(state.progress.level_stars, vec![3]);

        // Reloading the new level changes neither total
        load_level(&mut state, 1);
        assert_eq!(state.progress.score, 1234);
        assert_eq!(state.progress.total_stars, 3);
        assert_eq!(state.progress.shots_used, 0);
    }

    #[test]
    fn test_advance_requires_completed_level() {
        let mut state = GameState::new(3);
        advance(&mut state);
        assert_eq!(state.progress.level_index, 0);
        assert!(state.progress.level_stars.is_empty());
    }

    #[test]
    fn test_past_last_level_is_victory() {
        let mut state = GameState::new(3);
        let last = state.levels.len() - 1;
        load_level(&mut state, last);
        state.phase = GamePhase::LevelComplete;
        advance(&mut state);
        assert_eq!(state.phase, GamePhase::AllLevelsComplete);
        assert!(state.drain_events().iter().any(|e| matches!(e, GameEvent::AllLevelsComplete { .. })));
    }

    #[test]
    fn test_reset_level_cancels_pending_transition() {
        let mut state = GameState::new(3);
        state.progress.score = 300;
        state.progress.complete_scheduled = true;
        state.schedule.schedule(Transition::LevelComplete, state.time_ticks + 60);

        reset_level(&mut state);

        assert!(state.schedule.is_empty());
        assert!(!state.progress.complete_scheduled);
        assert_eq!(state.progress.score, 300);
    }

    #[test]
    fn test_restart_clears_run() {
        let mut state = GameState::new(3);
        load_level(&mut state, 3);
        state.progress.score = 900;
        state.progress.total_stars = 5;
        state.progress.level_stars = vec![2, 3];

        restart(&mut state);

        assert_eq!(state.progress.level_index, 0);
        assert_eq!(state.progress.score, 0);
        assert_eq!(state.progress.total_stars, 0);
        assert!(state.progress.level_stars.is_empty());
    }
}
