//! Wave and level progression
//!
//! State machine per level: each wave scatters its spawns over a randomized
//! window, completion is detected reactively when the enemy collection
//! drains, and the final wave hands over to the boss with no break in
//! between. Boss death advances the level, wrapping endlessly.

use rand::Rng;

use super::schedule::Action;
use super::state::{Enemy, EnemyKind, GameEvent, WorldState};
use crate::consts::BOSS_ATTACK_BASE_DELAY;
use crate::direction_to;

/// Begin the given wave: one enemy spawns immediately, the remainder are
/// scheduled at independent random offsets inside the wave window. Spawns
/// cluster freely; even pacing is not a goal.
pub(crate) fn start_wave(world: &mut WorldState, index: usize) {
    let Some(wave) = world.current_level_spec().waves.get(index).copied() else {
        return;
    };
    world.wave_index = index;
    world.emit(GameEvent::WaveStarted { index });
    log::info!(
        "level {} wave {}: {} enemies over {}ms",
        world.current_level_spec().id,
        index,
        wave.num_enemies,
        wave.wave_time_ms
    );

    spawn_wave_enemy(world);
    world.pending_spawns = wave.num_enemies.saturating_sub(1);
    let window = wave.wave_time_ms as f64 / 1000.0;
    for _ in 0..world.pending_spawns {
        let delay = if window > 0.0 {
            world.rng.random_range(0.0..window)
        } else {
            0.0
        };
        world.schedule.after(world.time, delay, Action::SpawnWaveEnemy);
    }
}

/// Materialize one randomized enemy of the current wave.
pub(crate) fn spawn_wave_enemy(world: &mut WorldState) {
    let id = world.next_entity_id();
    let phase = world.random_phase();
    let speed = world.rng.random_range(20.0..50.0);
    let pos = glam::Vec2::new(
        world.rng.random_range(0.0..world.world_width),
        world.rng.random_range(0.0..world.world_height),
    );
    let roll = world.rng.random_range(0..100);
    let mut enemy = match roll {
        0..60 => Enemy::melee(id, pos, speed, phase),
        60..85 => Enemy::ranged(id, pos, speed, phase),
        _ => Enemy::healer(id, pos, speed, phase),
    };
    enemy.body.clamp_to(world.world_width, world.world_height);
    world.enemies.push(enemy);
}

/// Reactive wave-completion check, run after enemy removals only.
///
/// Fires iff the collection is empty and no spawns of the current wave are
/// still queued; eager evaluation against spawn counts would complete a wave
/// whose stragglers haven't materialized yet.
pub(crate) fn check_wave_complete(world: &mut WorldState) {
    if world.boss_spawned || !world.enemies.is_empty() || world.pending_spawns > 0 {
        return;
    }
    let level = world.current_level_spec();
    let last_wave = world.wave_index + 1 >= level.waves.len();
    let break_ms = level
        .waves
        .get(world.wave_index)
        .map(|w| w.break_time_ms)
        .unwrap_or(0);
    if last_wave {
        // The boss skips the break on purpose; see DESIGN.md
        spawn_boss(world);
    } else {
        let break_s = break_ms as f64 / 1000.0;
        let next = world.wave_index + 1;
        world.schedule.after(world.time, break_s, Action::StartWave { index: next });
        log::info!("wave {} drained, next wave in {:.1}s", world.wave_index, break_s);
    }
}

/// Put the level's boss into the world and arm its special attack.
pub(crate) fn spawn_boss(world: &mut WorldState) {
    let spec = world.current_level_spec().boss.clone();
    let id = world.next_entity_id();
    let mut boss = Enemy::boss(id, &spec);
    boss.body.clamp_to(world.world_width, world.world_height);
    world.enemies.push(boss);
    world.boss_spawned = true;
    world.emit(GameEvent::BossSpawned);
    log::info!("boss '{}' spawned ({} hp)", spec.name, spec.health);
    schedule_boss_attack(world, spec.attack_interval_ms);
}

fn schedule_boss_attack(world: &mut WorldState, interval_ms: u32) {
    let delay =
        BOSS_ATTACK_BASE_DELAY + world.rng.random::<f64>() * (interval_ms as f64 / 1000.0);
    world.schedule.after(world.time, delay, Action::BossAttack);
}

/// Fire the boss's special attack: one projectile aimed at the player's
/// position right now (direction fixed at launch, not homing), then
/// reschedule. With no live boss the event dies quietly and the chain stops.
pub(crate) fn boss_special_attack(world: &mut WorldState) {
    let Some(idx) = world.enemies.iter().position(Enemy::is_boss) else {
        return;
    };
    let origin = world.enemies[idx].body.pos;
    let dir = direction_to(origin, world.player.body.pos);
    let mut interval = None;
    if let EnemyKind::Boss {
        projectiles,
        special,
        attack_interval_ms,
    } = &mut world.enemies[idx].kind
    {
        projectiles.push(special.projectile(origin, dir));
        interval = Some(*attack_interval_ms);
    }
    if let Some(interval_ms) = interval {
        schedule_boss_attack(world, interval_ms);
    }
}

/// Advance to the next level after a boss death, wrapping endlessly.
pub(crate) fn complete_level(world: &mut WorldState) {
    world.emit(GameEvent::LevelComplete {
        level: world.current_level,
    });
    world.current_level = (world.current_level + 1) % world.levels.len();
    world.boss_spawned = false;
    world.pending_spawns = 0;
    let spec = world.current_level_spec();
    let (w, h) = (spec.width, spec.height);
    log::info!("level complete, advancing to level {} ({}x{})", spec.id, w, h);
    world.world_width = w;
    world.world_height = h;
    world.player.body.clamp_to(w, h);
    start_wave(world, 0);
}
