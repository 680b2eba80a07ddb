//! Sling Arena headless driver
//!
//! Plays the campaign with a simple aiming bot and logs the event stream.
//! Run with `RUST_LOG=info` to watch a session.
//!
//! Usage: `sling-arena [seed] [tuning.json] [levels.json]`

use std::process::ExitCode;

use glam::Vec2;

use sling_arena::Tuning;
use sling_arena::consts::TICKS_PER_SECOND;
use sling_arena::sim::{
    Arena, GameEvent, GamePhase, GameState, InputEvent, TickInput, advance, default_levels,
    levels_from_file, reset_level, tick,
};

/// Hard stop for runaway sessions (ten minutes of play)
const MAX_TICKS: u64 = TICKS_PER_SECOND as u64 * 60 * 10;
/// Retries per level before the bot gives up
const MAX_RETRIES: u32 = 3;

fn main() -> ExitCode {
    env_logger::init();
    log::info!("Sling Arena (headless) starting...");

    let args: Vec<String> = std::env::args().skip(1).collect();
    let seed = args
        .first()
        .and_then(|s| s.parse().ok())
        .unwrap_or(0x5eed);

    let tuning = match args.get(1) {
        Some(path) => Tuning::from_file(path).unwrap_or_else(|err| {
            log::warn!("Ignoring tuning file {} ({}), using defaults", path, err);
            Tuning::default()
        }),
        None => Tuning::default(),
    };

    let levels = match args.get(2) {
        Some(path) => match levels_from_file(path) {
            Ok(levels) => levels,
            Err(err) => {
                log::error!("Bad level pack {}: {}", path, err);
                return ExitCode::FAILURE;
            }
        },
        None => default_levels(Arena::default()),
    };

    let mut state = GameState::with_config(seed, tuning, levels);
    log::info!("Game initialized with seed: {}", seed);

    let mut retries = 0;
    while state.time_ticks < MAX_TICKS {
        let input = bot_input(&state);
        tick(&mut state, &input);

        for event in state.drain_events() {
            report(&event);
        }

        match state.phase {
            GamePhase::LevelComplete => {
                retries = 0;
                advance(&mut state);
            }
            GamePhase::GameOver if retries < MAX_RETRIES => {
                retries += 1;
                reset_level(&mut state);
            }
            GamePhase::GameOver | GamePhase::AllLevelsComplete => break,
            GamePhase::Playing | GamePhase::Paused => {}
        }
    }

    let hud = state.hud();
    println!(
        "Finished in {:?} after {} ticks: level {}, score {}, stars {}",
        state.phase,
        state.time_ticks,
        hud.level_index + 1,
        hud.score,
        hud.total_stars
    );
    ExitCode::SUCCESS
}

/// Aim the primary at the nearest live enemy whenever everything is at rest
fn bot_input(state: &GameState) -> TickInput {
    if state.phase != GamePhase::Playing || state.aim.is_some() || !state.all_bodies_at_rest() {
        return TickInput::default();
    }
    let Some(body) = state.primary() else {
        return TickInput::default();
    };
    let Some(target) = state
        .enemies
        .iter()
        .filter(|e| !e.hit)
        .map(|e| e.pos)
        .min_by(|a, b| body.pos.distance(*a).total_cmp(&body.pos.distance(*b)))
    else {
        return TickInput::default();
    };

    // Lob: aim above the target, harder for farther enemies
    let to_target = target - body.pos;
    let lob = Vec2::new(to_target.x, to_target.y - to_target.x.abs() * 0.5);
    let pull = (to_target.length() / 8.0).clamp(40.0, state.tuning.max_drag_distance);
    let release = body.pos - lob.normalize_or_zero() * pull;

    TickInput {
        events: vec![
            InputEvent::AimStart(body.pos),
            InputEvent::AimMove(release),
            InputEvent::AimEnd,
        ],
        pause: false,
    }
}

fn report(event: &GameEvent) {
    match event {
        GameEvent::Cue(cue) => log::debug!("cue {:?}", cue),
        GameEvent::LevelComplete {
            level,
            stars,
            score,
        } => println!("Level {} complete: {} stars, score {}", level + 1, stars, score),
        GameEvent::GameOver { level, score } => {
            println!("Game over on level {}, score {}", level + 1, score)
        }
        GameEvent::AllLevelsComplete { score, total_stars } => {
            println!("All levels complete! score {}, {} stars", score, total_stars)
        }
        other => log::info!("{:?}", other),
    }
}
