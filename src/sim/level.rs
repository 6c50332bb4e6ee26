//! Randomized level generation
//!
//! Levels are generated once per run, up front, from the world's seeded RNG.
//! Generation is out of the hot loop; the descriptors are immutable
//! afterwards, so the same seed always yields the same campaign.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::projectile::Projectile;
use super::state::Phase;
use crate::consts::PROJECTILE_LAUNCH;

/// One timed batch of enemy spawns within a level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaveSpec {
    pub num_enemies: u32,
    /// Window over which the wave's spawns are randomly scattered
    pub wave_time_ms: u32,
    /// Pause before the next wave starts (the boss ignores it)
    pub break_time_ms: u32,
}

/// Boss special-attack flavor; each kind fires a distinct projectile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpecialAttack {
    Fireball,
    IceShard,
    LightningStrike,
    PoisonBlob,
    Earthquake,
    WindStorm,
}

impl SpecialAttack {
    pub const ALL: [SpecialAttack; 6] = [
        SpecialAttack::Fireball,
        SpecialAttack::IceShard,
        SpecialAttack::LightningStrike,
        SpecialAttack::PoisonBlob,
        SpecialAttack::Earthquake,
        SpecialAttack::WindStorm,
    ];

    /// Damage phase carried by this attack's projectile
    pub fn phase(self) -> Phase {
        match self {
            SpecialAttack::Fireball => Phase::Fire,
            SpecialAttack::IceShard => Phase::Water,
            SpecialAttack::LightningStrike => Phase::Air,
            SpecialAttack::PoisonBlob => Phase::Earth,
            SpecialAttack::Earthquake => Phase::Earth,
            SpecialAttack::WindStorm => Phase::Air,
        }
    }

    /// Build this attack's projectile from the boss center toward a fixed
    /// direction captured at fire time (not homing).
    pub fn projectile(self, origin: Vec2, dir: Vec2) -> Projectile {
        // (size, speed, lifespan) per flavor; fireball keeps the classic
        // slow heavy ball, lightning is a fast short-lived bolt
        let (size, speed, lifespan) = match self {
            SpecialAttack::Fireball => (30.0, 5.0, 10.0),
            SpecialAttack::IceShard => (10.0, 15.0, 4.0),
            SpecialAttack::LightningStrike => (8.0, 40.0, 1.5),
            SpecialAttack::PoisonBlob => (20.0, 8.0, 6.0),
            SpecialAttack::Earthquake => (40.0, 4.0, 3.0),
            SpecialAttack::WindStorm => (25.0, 10.0, 8.0),
        };
        Projectile {
            pos: origin,
            vel: dir * PROJECTILE_LAUNCH,
            phase: self.phase(),
            width: size,
            height: size,
            speed,
            lifespan,
        }
    }
}

/// Stats of a level's end boss
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BossSpec {
    pub name: String,
    pub health: f32,
    pub spawn: Vec2,
    pub speed: f32,
    pub width: f32,
    pub height: f32,
    pub phase: Phase,
    pub special: SpecialAttack,
    /// Base damage; the roll uses `[2*damage, 3*damage)`
    pub damage: f32,
    /// Upper bound on the randomized special-attack interval
    pub attack_interval_ms: u32,
}

/// Generated descriptor for one level; immutable once generated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelSpec {
    pub id: u32,
    pub waves: Vec<WaveSpec>,
    pub boss: BossSpec,
    pub width: f32,
    pub height: f32,
}

/// Generate a single level's descriptor.
pub fn generate_level<R: Rng>(rng: &mut R, id: u32) -> LevelSpec {
    let num_waves = rng.random_range(2..4);
    let waves = (0..num_waves)
        .map(|_| WaveSpec {
            num_enemies: rng.random_range(10..30),
            wave_time_ms: rng.random_range(10_000..30_000),
            break_time_ms: rng.random_range(5_000..10_000),
        })
        .collect();

    let boss = BossSpec {
        name: format!("Boss{id}"),
        health: rng.random_range(500..10_000) as f32,
        spawn: Vec2::new(640.0, 360.0),
        speed: rng.random_range(1..40) as f32,
        width: rng.random_range(30..100) as f32,
        height: rng.random_range(30..100) as f32,
        phase: Phase::ALL[rng.random_range(0..Phase::ALL.len())],
        special: SpecialAttack::ALL[rng.random_range(0..SpecialAttack::ALL.len())],
        damage: rng.random_range(1..6) as f32,
        attack_interval_ms: rng.random_range(500..2_000),
    };

    LevelSpec {
        id,
        waves,
        boss,
        width: rng.random_range(1280..2560) as f32,
        height: rng.random_range(720..1080) as f32,
    }
}

/// Generate the run's level plan. Always yields at least one level.
pub fn generate_levels<R: Rng>(rng: &mut R, num_levels: u32) -> Vec<LevelSpec> {
    (1..=num_levels.max(1)).map(|id| generate_level(rng, id)).collect()
}

/// Fixed-stat level for unit tests: waves given as
/// `(num_enemies, wave_time_ms, break_time_ms)` tuples.
#[cfg(test)]
pub(crate) fn test_level(id: u32, waves: &[(u32, u32, u32)]) -> LevelSpec {
    LevelSpec {
        id,
        waves: waves
            .iter()
            .map(|&(num_enemies, wave_time_ms, break_time_ms)| WaveSpec {
                num_enemies,
                wave_time_ms,
                break_time_ms,
            })
            .collect(),
        boss: BossSpec {
            name: format!("Boss{id}"),
            health: 100.0,
            spawn: Vec2::new(640.0, 360.0),
            speed: 2.0,
            width: 40.0,
            height: 40.0,
            phase: Phase::Fire,
            special: SpecialAttack::Fireball,
            damage: 2.0,
            attack_interval_ms: 1_000,
        },
        width: 1280.0,
        height: 720.0,
    }
}
