//! Collision detection and response
//!
//! Everything is a circle: launchable bodies, enemies, pickups and enemy
//! shots. These functions decide contacts and mutate only the two entities
//! involved; scoring, effects and cues are applied by the tick loop from the
//! returned [`Contact`].

use glam::Vec2;

use super::body::LaunchableBody;
use super::enemy::{Enemy, EnemyProjectile};
use super::powerup::Pickup;
use crate::circles_overlap;
use crate::consts::HIT_SPEED_THRESHOLD;

/// Result of a body/enemy contact check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    /// No qualifying collision
    Miss,
    /// Enemy lost health but survived
    Damaged,
    /// Enemy destroyed; award `points`
    Destroyed { points: u64 },
}

/// Knobs for [`resolve_enemy_contact`]
#[derive(Debug, Clone, Copy)]
pub struct ContactRules {
    /// Pierce buff active: no knockback
    pub pierce: bool,
    pub knockback_speed: f32,
    /// Post-hit grace period on a surviving enemy
    pub invulnerable_ticks: u32,
}

/// Whether a body is moving fast enough, and overlapping enough, to hurt
/// this enemy right now
pub fn body_strikes_enemy(body: &LaunchableBody, enemy: &Enemy) -> bool {
    body.launched
        && enemy.is_vulnerable()
        && body.vel.x.abs() > HIT_SPEED_THRESHOLD
        && circles_overlap(body.pos, body.radius, enemy.pos, enemy.radius())
}

/// Apply one body/enemy contact: damage, then knockback unless piercing.
///
/// A body damages a given enemy at most once per overlap; it has to
/// separate from that enemy before it can hurt it again.
pub fn resolve_enemy_contact(
    body: &mut LaunchableBody,
    enemy: &mut Enemy,
    rules: &ContactRules,
) -> Contact {
    if !circles_overlap(body.pos, body.radius, enemy.pos, enemy.radius()) {
        body.struck.retain(|&id| id != enemy.id);
        return Contact::Miss;
    }
    if body.has_struck(enemy.id) || !body_strikes_enemy(body, enemy) {
        return Contact::Miss;
    }

    let destroyed = enemy.take_hit(rules.invulnerable_ticks);
    body.struck.push(enemy.id);

    if !rules.pierce {
        body.vel = knockback_velocity(body.pos, enemy.pos, rules.knockback_speed);
    }

    if destroyed {
        Contact::Destroyed {
            points: enemy.bounty(),
        }
    } else {
        Contact::Damaged
    }
}

/// Fixed-speed velocity pointing from `from` through `pos`
pub fn knockback_velocity(pos: Vec2, from: Vec2, speed: f32) -> Vec2 {
    let away = pos - from;
    // Dead center: push straight up
    let dir = if away.length_squared() > 0.0 {
        away.normalize()
    } else {
        Vec2::NEG_Y
    };
    dir * speed
}

/// A launched body touching an uncollected pickup
pub fn body_touches_pickup(body: &LaunchableBody, pickup: &Pickup) -> bool {
    body.launched
        && !pickup.collected
        && circles_overlap(body.pos, body.radius, pickup.pos, pickup.radius)
}

/// An enemy shot touching a body
pub fn projectile_hits_body(projectile: &EnemyProjectile, body: &LaunchableBody) -> bool {
    circles_overlap(projectile.pos, projectile.radius, body.pos, body.radius)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::body::CharacterKind;
    use crate::sim::enemy::EnemyVariant;
    use crate::sim::powerup::PickupKind;

    fn rules(pierce: bool) -> ContactRules {
        ContactRules {
            pierce,
            knockback_speed: KNOCKBACK_SPEED,
            invulnerable_ticks: HIT_INVULNERABLE_TICKS,
        }
    }

    fn flying_body(pos: Vec2, vel: Vec2) -> LaunchableBody {
        let mut body = LaunchableBody::new(1, CharacterKind::Primary, pos, PRIMARY_RADIUS);
        body.launch(vel);
        body
    }

    #[test]
    fn test_circles_overlap_is_strict() {
        assert!(circles_overlap(Vec2::ZERO, 1.0, Vec2::new(1.9, 0.0), 1.0));
        assert!(!circles_overlap(Vec2::ZERO, 1.0, Vec2::new(2.0, 0.0), 1.0));
    }

    #[test]
    fn test_damage_then_destroy() {
        let mut enemy = Enemy::new(7, EnemyVariant::Normal, Vec2::new(500.0, 500.0), 2);
        let mut body = flying_body(Vec2::new(460.0, 500.0), Vec2::new(10.0, 0.0));

        assert_eq!(resolve_enemy_contact(&mut body, &mut enemy, &rules(false)), Contact::Damaged);
        assert_eq!(enemy.health, 1);
        assert!(!enemy.hit);
        // Knocked straight back out at fixed speed
        assert!((body.vel - Vec2::new(-KNOCKBACK_SPEED, 0.0)).length() < 1e-4);

        // Still overlapping next tick, but the enemy is in its grace period
        body.vel = Vec2::new(10.0, 0.0);
        assert_eq!(resolve_enemy_contact(&mut body, &mut enemy, &rules(false)), Contact::Miss);
        assert_eq!(enemy.health, 1);

        // Grace over, but this overlap already counted
        enemy.invulnerable_ticks = 0;
        assert_eq!(resolve_enemy_contact(&mut body, &mut enemy, &rules(false)), Contact::Miss);
        assert_eq!(enemy.health, 1);

        // Separate, then come back for a second pass
        body.pos = Vec2::new(400.0, 500.0);
        assert_eq!(resolve_enemy_contact(&mut body, &mut enemy, &rules(false)), Contact::Miss);
        assert!(!body.has_struck(enemy.id));
        body.pos = Vec2::new(460.0, 500.0);
        body.vel = Vec2::new(10.0, 0.0);
        assert_eq!(
            resolve_enemy_contact(&mut body, &mut enemy, &rules(false)),
            Contact::Destroyed { points: 200 }
        );
        assert!(enemy.hit);
        assert_eq!(enemy.health, 0);

        // Destroyed enemies are excluded from collision
        body.vel = Vec2::new(10.0, 0.0);
        assert_eq!(resolve_enemy_contact(&mut body, &mut enemy, &rules(false)), Contact::Miss);
        assert_eq!(body.vel, Vec2::new(10.0, 0.0));
    }

    #[test]
    fn test_pierce_keeps_velocity() {
        let mut enemy = Enemy::new(7, EnemyVariant::Normal, Vec2::new(500.0, 500.0), 1);
        let mut body = flying_body(Vec2::new(470.0, 500.0), Vec2::new(12.0, 1.0));
        assert_eq!(
            resolve_enemy_contact(&mut body, &mut enemy, &rules(true)),
            Contact::Destroyed { points: 100 }
        );
        assert_eq!(body.vel, Vec2::new(12.0, 1.0));
    }

    #[test]
    fn test_slow_pierce_pass_hits_once() {
        let mut enemy = Enemy::new(7, EnemyVariant::Normal, Vec2::new(600.0, 300.0), 5);
        let mut body = flying_body(Vec2::new(546.0, 300.0), Vec2::new(2.0, 0.0));

        let mut damaged = 0;
        for _ in 0..60 {
            body.pos += body.vel;
            // Let the grace period run out as often as it can
            enemy.invulnerable_ticks = enemy.invulnerable_ticks.saturating_sub(1);
            if resolve_enemy_contact(&mut body, &mut enemy, &rules(true)) != Contact::Miss {
                damaged += 1;
            }
        }
        assert_eq!(damaged, 1);
        assert_eq!(enemy.health, 4);
        // Out the far side and clear of the enemy again
        assert!(body.pos.x > 655.0);
        assert!(!body.has_struck(enemy.id));
    }

    #[test]
    fn test_pierce_still_hits_the_next_enemy() {
        let mut first = Enemy::new(7, EnemyVariant::Normal, Vec2::new(500.0, 300.0), 3);
        let mut second = Enemy::new(8, EnemyVariant::Normal, Vec2::new(530.0, 300.0), 3);
        let mut body = flying_body(Vec2::new(515.0, 300.0), Vec2::new(8.0, 0.0));
        assert_eq!(resolve_enemy_contact(&mut body, &mut first, &rules(true)), Contact::Damaged);
        assert_eq!(resolve_enemy_contact(&mut body, &mut second, &rules(true)), Contact::Damaged);
        assert!(body.has_struck(7) && body.has_struck(8));
    }

    #[test]
    fn test_launch_forgets_previous_strikes() {
        let mut body = flying_body(Vec2::ZERO, Vec2::X);
        body.struck.push(7);
        body.reset_to_spawn();
        assert!(!body.has_struck(7));
        body.struck.push(7);
        body.launch(Vec2::X);
        assert!(!body.has_struck(7));
    }

    #[test]
    fn test_slow_or_resting_bodies_do_not_hit() {
        let mut enemy = Enemy::new(7, EnemyVariant::Normal, Vec2::new(500.0, 500.0), 1);
        // Falling straight down onto the enemy
        let mut body = flying_body(Vec2::new(490.0, 470.0), Vec2::new(0.3, 8.0));
        assert_eq!(resolve_enemy_contact(&mut body, &mut enemy, &rules(false)), Contact::Miss);

        let mut resting = LaunchableBody::new(1, CharacterKind::Primary, Vec2::new(480.0, 500.0), 25.0);
        resting.vel = Vec2::new(5.0, 0.0);
        assert_eq!(resolve_enemy_contact(&mut resting, &mut enemy, &rules(false)), Contact::Miss);
        assert_eq!(enemy.health, 1);
    }

    #[test]
    fn test_boss_uses_larger_radius() {
        let mut boss = Enemy::new(9, EnemyVariant::Boss, Vec2::new(500.0, 400.0), 1);
        // 70 apart: outside 25 + 30, inside 25 + 50
        let mut body = flying_body(Vec2::new(430.0, 400.0), Vec2::new(5.0, 0.0));
        assert_eq!(
            resolve_enemy_contact(&mut body, &mut boss, &rules(false)),
            Contact::Destroyed { points: BOSS_POINTS }
        );
    }

    #[test]
    fn test_knockback_dead_center() {
        let v = knockback_velocity(Vec2::ONE, Vec2::ONE, 6.0);
        assert_eq!(v, Vec2::new(0.0, -6.0));
    }

    #[test]
    fn test_pickup_requires_launched_body() {
        let pickup = Pickup::new(3, PickupKind::Bonus, Vec2::new(300.0, 300.0));
        let mut body = LaunchableBody::new(1, CharacterKind::Primary, Vec2::new(310.0, 300.0), 25.0);
        assert!(!body_touches_pickup(&body, &pickup));
        body.launched = true;
        assert!(body_touches_pickup(&body, &pickup));

        let mut taken = pickup.clone();
        taken.collected = true;
        assert!(!body_touches_pickup(&body, &taken));
    }

    #[test]
    fn test_projectile_hits_body() {
        let body = LaunchableBody::new(1, CharacterKind::Primary, Vec2::new(100.0, 100.0), 25.0);
        let near = EnemyProjectile::new(Vec2::new(130.0, 100.0), Vec2::ZERO);
        let far = EnemyProjectile::new(Vec2::new(132.0, 100.0), Vec2::ZERO);
        assert!(projectile_hits_body(&near, &body));
        assert!(!projectile_hits_body(&far, &body));
    }
}
