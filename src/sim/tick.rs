//! Fixed-order simulation tick
//!
//! One call advances the game by one rendered frame. The order below is
//! fixed so the state seen by the renderer at frame end is consistent:
//! input, bodies, enemies, collisions, pickups, particles, buffs, win/loss
//! checks, then any transitions that have come due.

use glam::Vec2;
use rand::Rng;

use super::aim::{aim_cancel, aim_end, aim_move, aim_start};
use super::collision::{
    Contact, ContactRules, body_touches_pickup, projectile_hits_body, resolve_enemy_contact,
};
use super::level::star_rating;
use super::powerup::{BuffKind, PickupKind, apply_power_up};
use super::state::{AudioCue, GameEvent, GamePhase, GameState, Transition};
use crate::colors;
use crate::consts::*;

/// Sparks for a damaged (not destroyed) enemy
const DAMAGE_PARTICLES: usize = 8;
/// Sparks when a cell regenerates
const HEAL_PARTICLES: usize = 6;
/// Sparks when an enemy shot lands
const PROJECTILE_HIT_PARTICLES: usize = 10;

/// Pointer events, in arrival order
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    AimStart(Vec2),
    AimMove(Vec2),
    AimEnd,
    /// Pointer left the play area
    AimCancel,
}

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Applied before integration, so a release launches this tick
    pub events: Vec<InputEvent>,
    /// Pause toggle
    pub pause: bool,
}

/// Route one pointer event to the aim controller
pub fn handle_input(state: &mut GameState, event: InputEvent) {
    match event {
        InputEvent::AimStart(pos) => {
            aim_start(state, pos);
        }
        InputEvent::AimMove(pos) => aim_move(state, pos),
        InputEvent::AimEnd => {
            aim_end(state);
        }
        InputEvent::AimCancel => aim_cancel(state),
    }
}

/// Advance the game state by one tick
pub fn tick(state: &mut GameState, input: &TickInput) {
    if input.pause {
        match state.phase {
            GamePhase::Playing => {
                log::info!("Paused");
                state.phase = GamePhase::Paused;
                return;
            }
            GamePhase::Paused => {
                log::info!("Resumed");
                state.phase = GamePhase::Playing;
            }
            _ => {}
        }
    }

    if state.phase != GamePhase::Playing {
        return;
    }

    for &event in &input.events {
        handle_input(state, event);
    }

    state.time_ticks += 1;

    update_bodies(state);
    update_enemies(state);
    resolve_enemy_contacts(state);
    collect_pickups(state);
    resolve_projectile_hits(state);

    for pickup in state.pickups.iter_mut().filter(|p| !p.collected) {
        pickup.animate();
    }
    state.particles.tick();
    for kind in state.buffs.tick() {
        log::info!("Buff {:?} expired", kind);
    }

    check_level_end(state);
    fire_due_transitions(state);
}

/// Integrate every launched body, bounce it, and send it home at rest
fn update_bodies(state: &mut GameState) {
    for index in 0..state.bodies.len() {
        if !state.bodies[index].launched {
            continue;
        }
        let profile = state.profile_for(&state.bodies[index]);
        let wind = if profile.feels_wind {
            state.wind.push()
        } else {
            0.0
        };

        let body = &mut state.bodies[index];
        body.record_trail(state.tuning.trail_length);
        if state.rng.random::<f32>() < TRAIL_PARTICLE_CHANCE {
            state.particles.emit_trail(&mut state.rng, body.pos);
        }

        body.integrate(profile.gravity, wind, state.tuning.friction);
        if let Some(impact) = body.apply_bounds(&state.arena, state.tuning.bounce_reduction) {
            state
                .particles
                .emit_explosion(&mut state.rng, impact, colors::DUST);
        }

        if body.should_rest(&state.arena, profile.stop_threshold) {
            log::debug!("Body {} at rest", body.id);
            body.reset_to_spawn();
        }
    }
}

fn update_enemies(state: &mut GameState) {
    for enemy in state.enemies.iter_mut().filter(|e| !e.hit) {
        let actions = enemy.update(&state.arena);
        if actions.healed {
            log::debug!("Enemy {} healed to {}", enemy.id, enemy.health);
            state
                .particles
                .emit_burst(&mut state.rng, enemy.pos, colors::HEAL, HEAL_PARTICLES);
        }
    }
}

/// Every launched body against every live enemy
fn resolve_enemy_contacts(state: &mut GameState) {
    let rules = ContactRules {
        pierce: state.buffs.is_active(BuffKind::Pierce),
        knockback_speed: state.tuning.knockback_speed,
        invulnerable_ticks: state.tuning.hit_invulnerable_ticks,
    };

    for body_index in 0..state.bodies.len() {
        for enemy_index in 0..state.enemies.len() {
            let contact = resolve_enemy_contact(
                &mut state.bodies[body_index],
                &mut state.enemies[enemy_index],
                &rules,
            );
            let enemy = &state.enemies[enemy_index];
            let (enemy_id, at) = (enemy.id, enemy.pos);

            match contact {
                Contact::Miss => {}
                Contact::Damaged => {
                    log::debug!("Enemy {} damaged, {} hp left", enemy_id, enemy.health);
                    state.particles.emit_burst(
                        &mut state.rng,
                        at,
                        colors::ENEMY_DAMAGED,
                        DAMAGE_PARTICLES,
                    );
                    state.push_event(GameEvent::EnemyDamaged { enemy_id });
                }
                Contact::Destroyed { points } => {
                    state.progress.score += points;
                    log::info!(
                        "Enemy {} destroyed (+{}), score {}",
                        enemy_id,
                        points,
                        state.progress.score
                    );
                    state
                        .particles
                        .emit_explosion(&mut state.rng, at, colors::ENEMY_DESTROYED);
                    state.push_event(GameEvent::Cue(AudioCue::Impact));
                    state.push_event(GameEvent::EnemyDestroyed { enemy_id, points });
                }
            }
        }
    }
}

fn collect_pickups(state: &mut GameState) {
    for body_index in 0..state.bodies.len() {
        for pickup_index in 0..state.pickups.len() {
            if !body_touches_pickup(&state.bodies[body_index], &state.pickups[pickup_index]) {
                continue;
            }
            let pickup = &mut state.pickups[pickup_index];
            pickup.collected = true;
            let (kind, at) = (pickup.kind, pickup.pos);
            log::info!("Picked up {:?}", kind);
            state.push_event(GameEvent::PickupCollected { kind });

            match kind {
                PickupKind::Bonus => collect_bonus(state, at),
                PickupKind::PowerUp(power_up) => apply_power_up(state, power_up, at),
            }
        }
    }
}

/// Bonus item: points plus the empowered profile for the rest of the level
fn collect_bonus(state: &mut GameState, at: Vec2) {
    state.progress.score += BONUS_POINTS;
    state.progress.bonus_collected = true;
    state.progress.empowered = true;
    state.particles.emit_transformation(&mut state.rng, at);
    state.push_event(GameEvent::Cue(AudioCue::Transformation));
    log::info!("Bonus collected, primary empowered");
}

/// Enemy shots only ever hit the primary body
fn resolve_projectile_hits(state: &mut GameState) {
    let Some(primary) = state.bodies.first() else {
        return;
    };
    let mut hits = Vec::new();
    for enemy in state.enemies.iter_mut() {
        enemy.projectiles.retain(|projectile| {
            let hit = projectile_hits_body(projectile, primary);
            if hit {
                hits.push(projectile.pos);
            }
            !hit
        });
    }
    if hits.is_empty() {
        return;
    }

    let body_id = primary.id;
    for at in hits {
        state.particles.emit_burst(
            &mut state.rng,
            at,
            colors::PROJECTILE_HIT,
            PROJECTILE_HIT_PARTICLES,
        );
        state.push_event(GameEvent::BodyStruck { body_id });
    }
    log::debug!("Primary struck by enemy fire");
}

/// Win/loss checks, each guarded so it schedules at most once per level
fn check_level_end(state: &mut GameState) {
    let delay = state.tuning.transition_delay_ticks as u64;
    let progress = &state.progress;

    if !progress.complete_scheduled && state.all_enemies_destroyed() {
        state.progress.complete_scheduled = true;
        state
            .schedule
            .schedule(Transition::LevelComplete, state.time_ticks + delay);
        log::info!("Level {} cleared", state.progress.level_index + 1);
        return;
    }

    let out_of_shots = progress.shots_used >= progress.max_shots;
    if !progress.game_over_scheduled
        && !progress.complete_scheduled
        && out_of_shots
        && state.aim.is_none()
        && state.all_bodies_at_rest()
        && !state.all_enemies_destroyed()
    {
        state.progress.game_over_scheduled = true;
        state
            .schedule
            .schedule(Transition::GameOver, state.time_ticks + delay);
        log::info!("Out of shots on level {}", state.progress.level_index + 1);
    }
}

fn fire_due_transitions(state: &mut GameState) {
    for transition in state.schedule.take_due(state.time_ticks) {
        if state.phase != GamePhase::Playing {
            break;
        }
        let level = state.progress.level_index;
        match transition {
            Transition::LevelComplete => {
                let unused = state
                    .progress
                    .max_shots
                    .saturating_sub(state.progress.shots_used);
                state.progress.score += unused as u64 * UNUSED_SHOT_BONUS;
                let stars = star_rating(state.progress.shots_used, state.progress.bonus_collected);
                state.phase = GamePhase::LevelComplete;
                log::info!(
                    "Level {} complete: {} stars, score {}",
                    level + 1,
                    stars,
                    state.progress.score
                );
                state.push_event(GameEvent::LevelComplete {
                    level,
                    stars,
                    score: state.progress.score,
                });
            }
            Transition::GameOver => {
                state.phase = GamePhase::GameOver;
                log::info!("Game over on level {}, score {}", level + 1, state.progress.score);
                state.push_event(GameEvent::GameOver {
                    level,
                    score: state.progress.score,
                });
            }
        }
    }
}
