//! Phase Arena - a top-down elemental arena shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, combat, waves, game state)
//!
//! Rendering, audio playback and input capture are external collaborators:
//! they poll the world through [`sim::WorldState`], feed it a
//! [`sim::TickInput`] per frame, and drain [`sim::GameEvent`]s for sounds
//! and UI. Nothing in `sim` depends on a platform.

pub mod sim;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Health cap for every character (player and enemies)
    pub const MAX_HEALTH: f32 = 100.0;
    /// Shared velocity decay factor applied every tick
    pub const DECELERATION: f32 = 0.95;

    /// Player defaults
    pub const PLAYER_SPEED: f32 = 5.0;
    pub const PLAYER_SIZE: f32 = 40.0;
    pub const PLAYER_DAMAGE: f32 = 10.0;
    pub const PLAYER_DAMAGE_PLUS: f32 = 10.0;
    /// Seconds between allowed phase shifts
    pub const PHASE_SHIFT_COOLDOWN: f64 = 1.0;

    /// Distance at which a melee enemy lands contact damage
    pub const MELEE_RANGE: f32 = 50.0;
    /// Distance at which enemies notice the player and give chase
    pub const AGGRO_RANGE: f32 = 300.0;

    /// Enemy defaults
    pub const ENEMY_SIZE: f32 = 20.0;
    pub const ENEMY_DAMAGE: f32 = 0.1;
    pub const ENEMY_DAMAGE_PLUS: f32 = 0.4;
    /// Seconds between ranged-enemy shots
    pub const RANGED_SHOOT_INTERVAL: f32 = 3.0;

    /// Healer tuning
    pub const HEAL_RANGE: f32 = 200.0;
    pub const HEAL_AMOUNT: f32 = 5.0;
    /// Seconds between heal pulses
    pub const HEAL_COOLDOWN: f64 = 1.0;

    /// Projectile defaults
    pub const BULLET_SIZE: f32 = 5.0;
    pub const BULLET_SPEED: f32 = 50.0;
    pub const BULLET_LIFESPAN: f32 = 1.0;
    /// Launch velocity magnitude before the per-projectile speed scalar
    pub const PROJECTILE_LAUNCH: f32 = 10.0;
    pub const ENEMY_PROJECTILE_SPEED: f32 = 20.0;
    pub const ENEMY_PROJECTILE_LIFESPAN: f32 = 2.0;
    /// Hit radius of hostile projectiles against the player
    pub const ENEMY_PROJECTILE_HIT_RADIUS: f32 = 30.0;

    /// Items
    pub const ITEM_SIZE: f32 = 20.0;
    pub const ITEM_PICKUP_RADIUS: f32 = 30.0;
    /// Chance that a melee/ranged enemy drops loot on death
    pub const DROP_CHANCE: f64 = 0.5;

    /// Scoring
    pub const ENEMY_SCORE: u64 = 1;
    pub const BOSS_SCORE: u64 = 10;

    /// Seconds added in front of every randomized boss special-attack delay
    pub const BOSS_ATTACK_BASE_DELAY: f64 = 1.0;
}

/// Zero-safe unit vector from one point toward another.
///
/// Coincident points yield `Vec2::ZERO` rather than NaN, so an attacker
/// standing exactly on its target aims nowhere instead of poisoning the
/// tick with non-finite velocity.
#[inline]
pub fn direction_to(from: Vec2, to: Vec2) -> Vec2 {
    (to - from).normalize_or_zero()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_to_unit_length() {
        let d = direction_to(Vec2::new(0.0, 0.0), Vec2::new(3.0, 4.0));
        assert!((d.length() - 1.0).abs() < 1e-6);
        assert!((d.x - 0.6).abs() < 1e-6);
        assert!((d.y - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_direction_to_coincident_points() {
        let p = Vec2::new(42.0, 17.0);
        let d = direction_to(p, p);
        assert_eq!(d, Vec2::ZERO);
        assert!(d.is_finite());
    }
}
