//! Projectile lifecycle: advance, hit-test, prune
//!
//! Every shooter owns its projectile collection and runs it through these
//! helpers once per tick. Pruning uses `retain_mut`, so removal is safe
//! during iteration and each projectile is removed for exactly one cause per
//! tick: expiry first, then a qualifying hit.

use glam::Vec2;
use rand::Rng;

use super::combat::{apply_damage, roll_damage};
use super::state::{Enemy, GameEvent, Phase, Player};
use crate::consts::ENEMY_PROJECTILE_HIT_RADIUS;

/// A transient ranged attack owned by its shooter
#[derive(Debug, Clone)]
pub struct Projectile {
    /// Center position in world space
    pub pos: Vec2,
    pub vel: Vec2,
    /// Damage phase carried from the shooter at launch time
    pub phase: Phase,
    pub width: f32,
    pub height: f32,
    /// Scalar applied to velocity during integration
    pub speed: f32,
    /// Seconds of flight left; removed once this goes negative
    pub lifespan: f32,
}

impl Projectile {
    /// Advance one tick of flight
    pub fn integrate(&mut self, dt: f32) {
        self.pos += self.vel * self.speed * dt;
        self.lifespan -= dt;
    }
}

/// Advance the player's bullets: integrate, expire, hit-test against enemies.
///
/// A bullet hits the first enemy whose center is within the sum of half
/// widths; the damage roll is drawn fresh per hit. Damaged enemies are left
/// in place for the tick's death compaction.
pub(crate) fn update_player_bullets<R: Rng>(
    bullets: &mut Vec<Projectile>,
    dt: f32,
    enemies: &mut [Enemy],
    rng: &mut R,
    base: f32,
    plus: f32,
) {
    bullets.retain_mut(|bullet| {
        bullet.integrate(dt);
        if bullet.lifespan < 0.0 {
            return false;
        }
        let hit = enemies
            .iter_mut()
            .find(|e| bullet.pos.distance(e.body.pos) <= (bullet.width + e.body.width) / 2.0);
        match hit {
            Some(enemy) => {
                let dmg = roll_damage(rng, base, plus);
                apply_damage(&mut enemy.health, enemy.phase, dmg, bullet.phase);
                false
            }
            None => true,
        }
    });
}

/// Advance a hostile projectile collection against the player.
///
/// Expired projectiles explode (audio side effect); otherwise a projectile
/// within the fixed interaction radius damages the player with its own phase
/// and is removed. An immune player still consumes the projectile.
pub(crate) fn update_hostile_projectiles<R: Rng>(
    projectiles: &mut Vec<Projectile>,
    dt: f32,
    player: &mut Player,
    rng: &mut R,
    events: &mut Vec<GameEvent>,
    base: f32,
    plus: f32,
) {
    projectiles.retain_mut(|projectile| {
        projectile.integrate(dt);
        if projectile.lifespan < 0.0 {
            events.push(GameEvent::Explosion);
            return false;
        }
        if projectile.pos.distance(player.body.pos) <= ENEMY_PROJECTILE_HIT_RADIUS {
            let dmg = roll_damage(rng, base, plus);
            apply_damage(&mut player.health, player.phase, dmg, projectile.phase);
            events.push(GameEvent::Explosion);
            return false;
        }
        true
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn bullet_at(pos: Vec2, vel: Vec2, lifespan: f32, phase: Phase) -> Projectile {
        Projectile {
            pos,
            vel,
            phase,
            width: 5.0,
            height: 5.0,
            speed: 50.0,
            lifespan,
        }
    }

    #[test]
    fn test_lifespan_decreases_and_expires_once() {
        let mut p = bullet_at(Vec2::ZERO, Vec2::ZERO, 0.05, Phase::Normal);
        p.integrate(0.016);
        assert!((p.lifespan - 0.034).abs() < 1e-6);

        let mut bullets = vec![p];
        let mut rng = Pcg32::seed_from_u64(1);
        // Two more ticks: still alive at 0.018, gone once negative
        update_player_bullets(&mut bullets, 0.016, &mut [], &mut rng, 10.0, 10.0);
        assert_eq!(bullets.len(), 1);
        update_player_bullets(&mut bullets, 0.016, &mut [], &mut rng, 10.0, 10.0);
        update_player_bullets(&mut bullets, 0.016, &mut [], &mut rng, 10.0, 10.0);
        assert!(bullets.is_empty());
    }

    #[test]
    fn test_bullet_hits_first_enemy_only() {
        let mut rng = Pcg32::seed_from_u64(2);
        let mut enemies = vec![
            Enemy::melee(1, Vec2::new(10.0, 0.0), 30.0, Phase::Fire),
            Enemy::melee(2, Vec2::new(11.0, 0.0), 30.0, Phase::Fire),
        ];
        let mut bullets = vec![bullet_at(Vec2::new(10.0, 0.0), Vec2::ZERO, 1.0, Phase::Water)];

        update_player_bullets(&mut bullets, 0.016, &mut enemies, &mut rng, 10.0, 10.0);
        assert!(bullets.is_empty());
        assert!(enemies[0].health < 100.0);
        assert_eq!(enemies[1].health, 100.0);
    }

    #[test]
    fn test_expiry_takes_precedence_over_hit() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut enemies = vec![Enemy::melee(1, Vec2::ZERO, 30.0, Phase::Fire)];
        // Sitting on the enemy but out of time this very tick
        let mut bullets = vec![bullet_at(Vec2::ZERO, Vec2::ZERO, 0.01, Phase::Water)];

        update_player_bullets(&mut bullets, 0.016, &mut enemies, &mut rng, 10.0, 10.0);
        assert!(bullets.is_empty());
        assert_eq!(enemies[0].health, 100.0);
    }

    #[test]
    fn test_same_phase_bullet_consumed_without_damage() {
        let mut rng = Pcg32::seed_from_u64(4);
        let mut enemies = vec![Enemy::melee(1, Vec2::ZERO, 30.0, Phase::Fire)];
        let mut bullets = vec![bullet_at(Vec2::ZERO, Vec2::ZERO, 1.0, Phase::Fire)];

        update_player_bullets(&mut bullets, 0.016, &mut enemies, &mut rng, 10.0, 10.0);
        assert!(bullets.is_empty());
        assert_eq!(enemies[0].health, 100.0);
    }

    #[test]
    fn test_hostile_projectile_damages_player_within_radius() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut player = Player::new(Vec2::ZERO);
        let mut events = Vec::new();
        let mut projectiles = vec![bullet_at(Vec2::new(29.0, 0.0), Vec2::ZERO, 2.0, Phase::Fire)];

        update_hostile_projectiles(
            &mut projectiles,
            0.016,
            &mut player,
            &mut rng,
            &mut events,
            0.1,
            0.4,
        );
        assert!(projectiles.is_empty());
        assert!(player.health < 100.0);
        assert_eq!(events, vec![GameEvent::Explosion]);
    }

    #[test]
    fn test_hostile_projectile_misses_outside_radius() {
        let mut rng = Pcg32::seed_from_u64(6);
        let mut player = Player::new(Vec2::ZERO);
        let mut events = Vec::new();
        let mut projectiles = vec![bullet_at(Vec2::new(100.0, 0.0), Vec2::ZERO, 2.0, Phase::Fire)];

        update_hostile_projectiles(
            &mut projectiles,
            0.016,
            &mut player,
            &mut rng,
            &mut events,
            0.1,
            0.4,
        );
        assert_eq!(projectiles.len(), 1);
        assert_eq!(player.health, 100.0);
        assert!(events.is_empty());
    }

    #[test]
    fn test_expired_hostile_projectile_explodes() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut player = Player::new(Vec2::new(500.0, 500.0));
        let mut events = Vec::new();
        let mut projectiles = vec![bullet_at(Vec2::ZERO, Vec2::ZERO, 0.001, Phase::Fire)];

        update_hostile_projectiles(
            &mut projectiles,
            0.016,
            &mut player,
            &mut rng,
            &mut events,
            0.1,
            0.4,
        );
        assert!(projectiles.is_empty());
        assert_eq!(events, vec![GameEvent::Explosion]);
        assert_eq!(player.health, 100.0);
    }
}
