//! Drag-to-aim and launch
//!
//! Aim input only moves the selected body around its anchor. The launch
//! itself is applied in [`aim_end`], before the next tick integrates.

use glam::Vec2;

use super::body::compute_launch_impulse;
use super::powerup::BuffKind;
use super::state::{Aim, AudioCue, GameEvent, GamePhase, GameState};
use crate::colors;
use crate::consts::*;

/// Where the extra multishot flashes go, relative to the launch point
const MULTISHOT_OFFSETS: [Vec2; 2] = [Vec2::new(0.0, -20.0), Vec2::new(0.0, 20.0)];

/// Grab the first resting body under the pointer. Returns true if an aim
/// started.
///
/// Once the level is cleared the shot count is final, so no new aim starts
/// during the completion delay.
pub fn aim_start(state: &mut GameState, pointer: Vec2) -> bool {
    if state.phase != GamePhase::Playing
        || state.aim.is_some()
        || state.progress.complete_scheduled
    {
        return false;
    }
    if state.progress.shots_used >= state.progress.max_shots {
        log::debug!("Aim refused: no shots left");
        return false;
    }
    let Some(body_index) = state
        .bodies
        .iter()
        .position(|b| !b.launched && b.contains_point(pointer))
    else {
        return false;
    };
    state.aim = Some(Aim {
        body_index,
        anchor: state.bodies[body_index].pos,
    });
    true
}

/// Follow the pointer, no further than the max drag distance from the anchor
pub fn aim_move(state: &mut GameState, pointer: Vec2) {
    let Some(aim) = state.aim else {
        return;
    };
    let max = state.tuning.max_drag_distance;
    if let Some(body) = state.bodies.get_mut(aim.body_index) {
        body.pos = aim.anchor + (pointer - aim.anchor).clamp_length_max(max);
    }
}

/// Release: launch the body, or put it back if the drag was inside the dead
/// zone. Returns true if a launch happened.
pub fn aim_end(state: &mut GameState) -> bool {
    let Some(aim) = state.aim.take() else {
        return false;
    };
    if state.progress.complete_scheduled {
        if let Some(body) = state.bodies.get_mut(aim.body_index) {
            body.pos = aim.anchor;
        }
        return false;
    }
    let Some(body) = state.bodies.get(aim.body_index) else {
        return false;
    };

    let profile = state.profile_for(body);
    let impulse = compute_launch_impulse(
        aim.anchor - body.pos,
        &profile,
        state.buffs.force_multiplier(),
        state.tuning.launch_dead_zone,
    );
    if impulse == Vec2::ZERO {
        state.bodies[aim.body_index].pos = aim.anchor;
        return false;
    }

    let body = &mut state.bodies[aim.body_index];
    body.launch(impulse);
    let (body_id, at) = (body.id, body.pos);
    state.progress.shots_used += 1;

    state
        .particles
        .emit_explosion(&mut state.rng, at, colors::LAUNCH_GLOW);
    if state.buffs.is_active(BuffKind::Multishot) {
        for offset in MULTISHOT_OFFSETS {
            state
                .particles
                .emit_explosion(&mut state.rng, at + offset, colors::LAUNCH_GLOW);
        }
    }
    state.push_event(GameEvent::Cue(AudioCue::Launch));
    state.push_event(GameEvent::Launched { body_id });
    log::info!(
        "Shot {}/{}: body {} launched at ({:.1}, {:.1})",
        state.progress.shots_used,
        state.progress.max_shots,
        body_id,
        impulse.x,
        impulse.y
    );
    true
}

/// Drop the aim and put the body back on its anchor
pub fn aim_cancel(state: &mut GameState) {
    if let Some(aim) = state.aim.take() {
        if let Some(body) = state.bodies.get_mut(aim.body_index) {
            body.pos = aim.anchor;
        }
    }
}

/// Power meter fill in [0, 1]
pub fn aim_power(state: &GameState) -> f32 {
    let Some(aim) = state.aim else {
        return 0.0;
    };
    state
        .bodies
        .get(aim.body_index)
        .map(|b| (aim.anchor.distance(b.pos) / POWER_METER_DISTANCE).min(1.0))
        .unwrap_or(0.0)
}

/// Points along the path the current aim would fly, one per tick, stopping
/// when the body would reach the floor. Empty when nothing would launch.
pub fn predict_trajectory(state: &GameState, steps: usize) -> Vec<Vec2> {
    let Some(aim) = state.aim else {
        return Vec::new();
    };
    let Some(body) = state.bodies.get(aim.body_index) else {
        return Vec::new();
    };

    let profile = state.profile_for(body);
    let mut vel = compute_launch_impulse(
        aim.anchor - body.pos,
        &profile,
        state.buffs.force_multiplier(),
        state.tuning.launch_dead_zone,
    );
    if vel == Vec2::ZERO {
        return Vec::new();
    }
    let wind = if profile.feels_wind {
        state.wind.push()
    } else {
        0.0
    };

    let floor = state.arena.floor();
    let mut pos = body.pos;
    let mut points = Vec::with_capacity(steps);
    for _ in 0..steps {
        vel.y += profile.gravity;
        vel.x += wind;
        vel *= state.tuning.friction;
        pos += vel;
        if pos.y + body.radius > floor {
            break;
        }
        points.push(pos);
    }
    points
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Level one with the primary parked at (100, 500)
    fn aiming_state() -> GameState {
        let mut state = GameState::new(7);
        state.bodies[0].pos = Vec2::new(100.0, 500.0);
        state.bodies[0].spawn = Vec2::new(100.0, 500.0);
        state.drain_events();
        state
    }

    #[test]
    fn test_drag_and_release_launches() {
        let mut state = aiming_state();
        let particles_before = state.particles.len();
        assert!(aim_start(&mut state, Vec2::new(100.0, 500.0)));
        aim_move(&mut state, Vec2::new(50.0, 550.0));
        assert!(aim_end(&mut state));

        let body = &state.bodies[0];
        let body_id = body.id;
        assert!(body.launched);
        assert!((body.vel - Vec2::new(20.0, -20.0)).length() < 1e-3);
        assert_eq!(state.progress.shots_used, 1);
        assert!(state.aim.is_none());
        assert!(state.particles.len() > particles_before);

        let events = state.drain_events();
        assert!(events.contains(&GameEvent::Cue(AudioCue::Launch)));
        assert!(events.contains(&GameEvent::Launched { body_id }));
    }

    #[test]
    fn test_release_inside_dead_zone_is_noop() {
        let mut state = aiming_state();
        aim_start(&mut state, Vec2::new(100.0, 500.0));
        aim_move(&mut state, Vec2::new(103.0, 504.0));
        assert!(!aim_end(&mut state));

        let body = &state.bodies[0];
        assert!(!body.launched);
        assert_eq!(body.vel, Vec2::ZERO);
        assert_eq!(body.pos, Vec2::new(100.0, 500.0));
        assert_eq!(state.progress.shots_used, 0);
        assert!(state.drain_events().is_empty());
    }

    #[test]
    fn test_drag_is_clamped() {
        let mut state = aiming_state();
        aim_start(&mut state, Vec2::new(100.0, 500.0));
        aim_move(&mut state, Vec2::new(100.0 - 400.0, 500.0));
        assert_eq!(state.bodies[0].pos, Vec2::new(100.0 - MAX_DRAG_DISTANCE, 500.0));
        assert!((aim_power(&state) - MAX_DRAG_DISTANCE / POWER_METER_DISTANCE).abs() < 1e-6);
    }

    #[test]
    fn test_aim_requires_pointer_on_a_resting_body() {
        let mut state = aiming_state();
        assert!(!aim_start(&mut state, Vec2::new(400.0, 300.0)));
        state.bodies[0].launched = true;
        assert!(!aim_start(&mut state, Vec2::new(100.0, 500.0)));
        assert!(state.aim.is_none());
    }

    #[test]
    fn test_aim_refused_without_shots() {
        let mut state = aiming_state();
        state.progress.shots_used = state.progress.max_shots;
        assert!(!aim_start(&mut state, Vec2::new(100.0, 500.0)));
    }

    #[test]
    fn test_no_launch_after_level_cleared() {
        let mut state = aiming_state();
        assert!(aim_start(&mut state, Vec2::new(100.0, 500.0)));
        aim_move(&mut state, Vec2::new(50.0, 550.0));

        // Cleared while the drag was held: the release puts the body back
        state.progress.complete_scheduled = true;
        assert!(!aim_end(&mut state));
        assert!(!state.bodies[0].launched);
        assert_eq!(state.bodies[0].pos, Vec2::new(100.0, 500.0));
        assert_eq!(state.progress.shots_used, 0);

        assert!(!aim_start(&mut state, Vec2::new(100.0, 500.0)));
        assert!(state.aim.is_none());
    }

    #[test]
    fn test_cancel_restores_anchor() {
        let mut state = aiming_state();
        aim_start(&mut state, Vec2::new(100.0, 500.0));
        aim_move(&mut state, Vec2::new(20.0, 560.0));
        aim_cancel(&mut state);
        assert_eq!(state.bodies[0].pos, Vec2::new(100.0, 500.0));
        assert!(state.aim.is_none());
        assert_eq!(aim_power(&state), 0.0);
        assert!(!aim_end(&mut state));
        assert_eq!(state.progress.shots_used, 0);
    }

    #[test]
    fn test_speed_buff_scales_launch() {
        let mut state = aiming_state();
        state.buffs.grant(BuffKind::Speed, 100);
        aim_start(&mut state, Vec2::new(100.0, 500.0));
        aim_move(&mut state, Vec2::new(50.0, 550.0));
        aim_end(&mut state);
        let expected = Vec2::new(20.0, -20.0) * SPEED_BUFF_MULTIPLIER;
        assert!((state.bodies[0].vel - expected).length() < 1e-3);
    }

    #[test]
    fn test_multishot_adds_launch_effects() {
        let mut plain = aiming_state();
        let mut boosted = aiming_state();
        boosted.buffs.grant(BuffKind::Multishot, 100);
        for state in [&mut plain, &mut boosted] {
            state.particles.clear();
            aim_start(state, Vec2::new(100.0, 500.0));
            aim_move(state, Vec2::new(50.0, 550.0));
            aim_end(state);
        }
        assert_eq!(boosted.particles.len(), plain.particles.len() * 3);
    }

    #[test]
    fn test_trajectory_preview() {
        let mut state = aiming_state();
        assert!(predict_trajectory(&state, 30).is_empty());

        aim_start(&mut state, Vec2::new(100.0, 500.0));
        aim_move(&mut state, Vec2::new(50.0, 550.0));
        let points = predict_trajectory(&state, 30);
        assert!(!points.is_empty() && points.len() <= 30);
        // Heads up and to the right
        assert!(points[0].x > 50.0 && points[0].y < 550.0);
        assert!(points.iter().all(|p| p.y + state.bodies[0].radius <= state.arena.floor()));
        // Preview does not move anything
        assert_eq!(state.bodies[0].pos, Vec2::new(50.0, 550.0));
        assert!(!state.bodies[0].launched);
    }
}
