//! Game state and core simulation types
//!
//! The world owns every live collection (enemies, items, schedule, score).
//! Entities never hold references to each other; all cross-entity reads go
//! through [`WorldState`] queries inside the tick.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::level::{BossSpec, LevelSpec, generate_levels};
use super::projectile::Projectile;
use super::schedule::Schedule;
use super::{items::Item, waves};
use crate::consts::*;

/// Elemental phase tag governing damage immunity and render tint.
///
/// Not a capability hierarchy: two entities of the same phase simply cannot
/// hurt each other, and an entity is always immune to its own phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Phase {
    #[default]
    Normal,
    Fire,
    Water,
    Earth,
    Air,
}

impl Phase {
    pub const ALL: [Phase; 5] = [
        Phase::Normal,
        Phase::Fire,
        Phase::Water,
        Phase::Earth,
        Phase::Air,
    ];

    /// Next phase in the shift cycle (wraps back to Normal)
    pub fn next(self) -> Self {
        match self {
            Phase::Normal => Phase::Fire,
            Phase::Fire => Phase::Water,
            Phase::Water => Phase::Earth,
            Phase::Earth => Phase::Air,
            Phase::Air => Phase::Normal,
        }
    }

    /// Render tint for this phase (linear RGB). The sim never reads this.
    pub fn color(self) -> [f32; 3] {
        match self {
            Phase::Normal => [1.0, 1.0, 1.0],
            Phase::Fire => [1.0, 0.2, 0.1],
            Phase::Water => [0.2, 0.4, 1.0],
            Phase::Earth => [0.2, 0.8, 0.3],
            Phase::Air => [1.0, 0.9, 0.2],
        }
    }
}

/// Shared physics component: center position plus velocity integration state.
#[derive(Debug, Clone)]
pub struct Body {
    /// Center position in world space
    pub pos: Vec2,
    pub vel: Vec2,
    pub accel: Vec2,
    /// Per-tick velocity decay factor
    pub deceleration: f32,
    /// Scalar applied to acceleration before integration
    pub speed: f32,
    pub width: f32,
    pub height: f32,
}

impl Body {
    pub fn new(pos: Vec2, speed: f32, width: f32, height: f32) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            accel: Vec2::ZERO,
            deceleration: DECELERATION,
            speed,
            width,
            height,
        }
    }

    /// Advance one tick of velocity/position integration.
    pub fn integrate(&mut self, dt: f32) {
        self.vel += self.accel * self.speed;
        self.vel *= self.deceleration;
        self.pos += self.vel * dt;
    }

    /// Keep the body inside the world rectangle.
    pub fn clamp_to(&mut self, world_w: f32, world_h: f32) {
        let hw = self.width / 2.0;
        let hh = self.height / 2.0;
        self.pos.x = self.pos.x.clamp(hw, (world_w - hw).max(hw));
        self.pos.y = self.pos.y.clamp(hh, (world_h - hh).max(hh));
    }
}

/// The player character
#[derive(Debug, Clone)]
pub struct Player {
    pub body: Body,
    pub health: f32,
    pub phase: Phase,
    /// Uniform damage roll bounds: `[damage_plus, damage_plus + damage)`
    pub damage: f32,
    pub damage_plus: f32,
    /// Sim-clock timestamp of the last accepted phase shift
    pub last_phase_shift: f64,
    /// Bullets owned by the player; pruned by the player's own update
    pub bullets: Vec<Projectile>,
}

impl Player {
    pub fn new(pos: Vec2) -> Self {
        Self {
            body: Body::new(pos, PLAYER_SPEED, PLAYER_SIZE, PLAYER_SIZE),
            health: MAX_HEALTH,
            phase: Phase::Normal,
            damage: PLAYER_DAMAGE,
            damage_plus: PLAYER_DAMAGE_PLUS,
            last_phase_shift: f64::MIN,
            bullets: Vec::new(),
        }
    }

    /// Advance to the next phase in the cycle, gated by a 1-second cooldown.
    pub fn phase_shift(&mut self, now: f64) {
        if now - self.last_phase_shift >= PHASE_SHIFT_COOLDOWN {
            self.phase = self.phase.next();
            self.last_phase_shift = now;
        }
    }

    /// Fire a bullet from the player's center toward a world-space aim point.
    ///
    /// Aiming at the player's own center produces a zero direction (the
    /// bullet goes nowhere and expires); it never produces NaN.
    pub fn shoot(&mut self, aim: Vec2) {
        let dir = crate::direction_to(self.body.pos, aim);
        self.bullets.push(Projectile {
            pos: self.body.pos,
            vel: dir * PROJECTILE_LAUNCH,
            phase: self.phase,
            width: BULLET_SIZE,
            height: BULLET_SIZE,
            speed: BULLET_SPEED,
            lifespan: BULLET_LIFESPAN,
        });
    }
}

/// Behavior variant of an enemy, with the per-variant state it owns
#[derive(Debug, Clone)]
pub enum EnemyKind {
    /// Chases the player and deals contact damage in melee range
    Melee,
    /// Stationary turret: fires at the player on a fixed cadence
    Ranged {
        projectiles: Vec<Projectile>,
        shoot_timer: f32,
    },
    /// Non-combatant: pulses healing to same-phase enemies nearby
    Healer { last_heal: f64 },
    /// Melee behavior plus an independently scheduled special attack
    Boss {
        projectiles: Vec<Projectile>,
        special: super::level::SpecialAttack,
        attack_interval_ms: u32,
    },
}

/// A combat entity in the world's enemy collection
#[derive(Debug, Clone)]
pub struct Enemy {
    pub id: u32,
    pub body: Body,
    pub health: f32,
    pub phase: Phase,
    pub damage: f32,
    pub damage_plus: f32,
    pub kind: EnemyKind,
}

impl Enemy {
    pub fn melee(id: u32, pos: Vec2, speed: f32, phase: Phase) -> Self {
        Self {
            id,
            body: Body::new(pos, speed, ENEMY_SIZE, ENEMY_SIZE),
            health: MAX_HEALTH,
            phase,
            damage: ENEMY_DAMAGE,
            damage_plus: ENEMY_DAMAGE_PLUS,
            kind: EnemyKind::Melee,
        }
    }

    pub fn ranged(id: u32, pos: Vec2, speed: f32, phase: Phase) -> Self {
        Self {
            kind: EnemyKind::Ranged {
                projectiles: Vec::new(),
                shoot_timer: 0.0,
            },
            ..Self::melee(id, pos, speed, phase)
        }
    }

    pub fn healer(id: u32, pos: Vec2, speed: f32, phase: Phase) -> Self {
        Self {
            damage: 0.0,
            damage_plus: 0.0,
            kind: EnemyKind::Healer { last_heal: f64::MIN },
            ..Self::melee(id, pos, speed, phase)
        }
    }

    pub fn boss(id: u32, spec: &BossSpec) -> Self {
        Self {
            id,
            body: Body::new(spec.spawn, spec.speed, spec.width, spec.height),
            health: spec.health,
            phase: spec.phase,
            damage: spec.damage,
            damage_plus: spec.damage * 2.0,
            kind: EnemyKind::Boss {
                projectiles: Vec::new(),
                special: spec.special,
                attack_interval_ms: spec.attack_interval_ms,
            },
        }
    }

    pub fn is_boss(&self) -> bool {
        matches!(self.kind, EnemyKind::Boss { .. })
    }

    /// Whether this variant rolls a loot drop on death (bosses and healers
    /// never do)
    pub fn drops_loot(&self) -> bool {
        matches!(self.kind, EnemyKind::Melee | EnemyKind::Ranged { .. })
    }
}

/// Fire-and-forget notifications for the audio/UI shell.
///
/// Drained once per frame via [`WorldState::drain_events`]; the sim never
/// reads them back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    Shoot,
    Explosion,
    EnemyDeath,
    HealerDeath,
    PlayerDeath,
    ItemPickup,
    WaveStarted { index: usize },
    BossSpawned,
    LevelComplete { level: usize },
}

/// The shared mutable registry all subsystems read and mutate
#[derive(Debug)]
pub struct WorldState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    /// Monotonic sim clock in seconds; never rewound, not even on reset
    pub time: f64,
    pub player: Player,
    /// World-owned enemy collection; compacted once per tick after behavior
    pub enemies: Vec<Enemy>,
    pub items: Vec<Item>,
    /// Level plan generated once per run
    pub levels: Vec<LevelSpec>,
    pub current_level: usize,
    /// Index of the wave currently spawning/draining
    pub wave_index: usize,
    /// Scheduled-but-not-yet-fired spawns of the current wave
    pub pending_spawns: u32,
    pub boss_spawned: bool,
    pub score: u64,
    /// Best score across resets within this process
    pub high_score: u64,
    pub world_width: f32,
    pub world_height: f32,
    pub schedule: Schedule,
    events: Vec<GameEvent>,
    next_id: u32,
}

impl WorldState {
    /// Create a world with a freshly generated level plan and start the
    /// first wave.
    pub fn new(seed: u64, num_levels: u32) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let levels = generate_levels(&mut rng, num_levels);
        Self::from_parts(seed, rng, levels)
    }

    /// Create a world over a caller-supplied level plan (used by tests).
    pub fn with_levels(seed: u64, levels: Vec<LevelSpec>) -> Self {
        let rng = Pcg32::seed_from_u64(seed);
        Self::from_parts(seed, rng, levels)
    }

    fn from_parts(seed: u64, mut rng: Pcg32, mut levels: Vec<LevelSpec>) -> Self {
        if levels.is_empty() {
            levels = generate_levels(&mut rng, 1);
        }
        let (w, h) = (levels[0].width, levels[0].height);
        let mut world = Self {
            seed,
            rng,
            time: 0.0,
            player: Player::new(Vec2::new(w / 2.0, h / 2.0)),
            enemies: Vec::new(),
            items: Vec::new(),
            levels,
            current_level: 0,
            wave_index: 0,
            pending_spawns: 0,
            boss_spawned: false,
            score: 0,
            high_score: 0,
            world_width: w,
            world_height: h,
            schedule: Schedule::new(),
            events: Vec::new(),
            next_id: 1,
        };
        waves::start_wave(&mut world, 0);
        world
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Current level descriptor; an out-of-range index falls back to the
    /// first level instead of failing.
    pub fn current_level_spec(&self) -> &LevelSpec {
        self.levels.get(self.current_level).unwrap_or(&self.levels[0])
    }

    /// Push a notification for the shell
    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take this frame's notifications (audio/UI sink)
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// UI sink: (rounded-down health, high score, score)
    pub fn hud_state(&self) -> (i32, u64, u64) {
        (self.player.health.floor() as i32, self.high_score, self.score)
    }

    /// Roll a uniform phase for a spawned enemy
    pub fn random_phase(&mut self) -> Phase {
        Phase::ALL[self.rng.random_range(0..Phase::ALL.len())]
    }

    /// Split the world into disjoint mutable borrows for the tick's
    /// subsystem passes (enemy behavior, projectiles, items).
    pub(crate) fn tick_ctx(&mut self) -> TickCtx<'_> {
        TickCtx {
            player: &mut self.player,
            enemies: &mut self.enemies,
            items: &mut self.items,
            rng: &mut self.rng,
            events: &mut self.events,
            world_width: self.world_width,
            world_height: self.world_height,
            time: self.time,
        }
    }

    /// Full synchronous reset after a run ends.
    ///
    /// Cancels all pending deferred work (the schedule epoch advances, so a
    /// stale boss timer or spawn can never fire into the new run), folds the
    /// score into the high score, and restarts from the first level. The sim
    /// clock keeps running forward.
    pub fn reset_run(&mut self) {
        self.schedule.cancel_all();
        self.high_score = self.high_score.max(self.score);
        self.score = 0;
        self.enemies.clear();
        self.items.clear();
        self.current_level = 0;
        self.wave_index = 0;
        self.pending_spawns = 0;
        self.boss_spawned = false;
        let (w, h) = (self.levels[0].width, self.levels[0].height);
        self.world_width = w;
        self.world_height = h;
        self.player = Player::new(Vec2::new(w / 2.0, h / 2.0));
        waves::start_wave(self, 0);
    }
}

/// Disjoint mutable views over the world for one tick's subsystem passes
pub(crate) struct TickCtx<'a> {
    pub player: &'a mut Player,
    pub enemies: &'a mut Vec<Enemy>,
    pub items: &'a mut Vec<Item>,
    pub rng: &'a mut Pcg32,
    pub events: &'a mut Vec<GameEvent>,
    pub world_width: f32,
    pub world_height: f32,
    pub time: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::level::test_level;

    #[test]
    fn test_phase_cycle_wraps() {
        let mut p = Phase::Normal;
        for _ in 0..Phase::ALL.len() {
            p = p.next();
        }
        assert_eq!(p, Phase::Normal);
    }

    #[test]
    fn test_phase_shift_cooldown() {
        let mut player = Player::new(Vec2::ZERO);
        player.phase_shift(10.0);
        assert_eq!(player.phase, Phase::Fire);

        // Within the cooldown window the request is dropped
        player.phase_shift(10.5);
        assert_eq!(player.phase, Phase::Fire);

        player.phase_shift(11.0);
        assert_eq!(player.phase, Phase::Water);
    }

    #[test]
    fn test_body_integration_decays_velocity() {
        let mut body = Body::new(Vec2::ZERO, 2.0, 10.0, 10.0);
        body.accel = Vec2::new(1.0, 0.0);
        body.integrate(0.1);
        assert!((body.vel.x - 2.0 * DECELERATION).abs() < 1e-6);
        assert!(body.pos.x > 0.0);

        // No acceleration: velocity decays toward zero
        body.accel = Vec2::ZERO;
        let before = body.vel.x;
        body.integrate(0.1);
        assert!(body.vel.x < before);
    }

    #[test]
    fn test_body_clamped_to_world() {
        let mut body = Body::new(Vec2::new(-50.0, 900.0), 1.0, 20.0, 20.0);
        body.clamp_to(1280.0, 720.0);
        assert_eq!(body.pos, Vec2::new(10.0, 710.0));
    }

    #[test]
    fn test_reset_preserves_high_score() {
        let mut world = WorldState::with_levels(7, vec![test_level(1, &[(1, 0, 1000)])]);
        world.score = 42;
        world.reset_run();
        assert_eq!(world.score, 0);
        assert_eq!(world.high_score, 42);

        // A worse follow-up run must not lower it
        world.score = 10;
        world.reset_run();
        assert_eq!(world.high_score, 42);
    }

    #[test]
    fn test_reset_discards_pending_work() {
        let mut world = WorldState::with_levels(7, vec![test_level(1, &[(5, 20_000, 1000)])]);
        assert!(world.pending_spawns > 0);
        let epoch_before = world.schedule.epoch();
        world.reset_run();
        assert!(world.schedule.epoch() > epoch_before);
        // The restarted first wave re-schedules its own spawns
        assert_eq!(world.pending_spawns, 4);
        assert_eq!(world.enemies.len(), 1);
    }

    #[test]
    fn test_missing_level_falls_back_to_first() {
        let mut world = WorldState::with_levels(7, vec![test_level(1, &[(1, 0, 1000)])]);
        world.current_level = 99;
        assert_eq!(world.current_level_spec().id, 1);
    }
}
