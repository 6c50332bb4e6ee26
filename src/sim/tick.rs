//! Per-frame simulation tick
//!
//! Advances the whole encounter by one delta-time step: drains deferred
//! work from the schedule, applies input intent, runs entity behavior,
//! compacts deaths once, and settles items. Side effects are observable only
//! through world mutation and the event outbox, never return values.

use glam::Vec2;
use rand::Rng;

use super::combat::{apply_damage, roll_damage};
use super::items;
use super::projectile::{self, Projectile};
use super::schedule::Action;
use super::state::{EnemyKind, GameEvent, TickCtx, WorldState};
use super::waves;
use crate::consts::*;
use crate::direction_to;

/// Input intent for a single tick, polled once per frame by the shell.
///
/// `fire` and `phase_shift` are one-shot requests; the shell clears them
/// after the tick that consumed them.
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    /// Advance the player's phase (gated by the shift cooldown)
    pub phase_shift: bool,
    /// Fire one bullet toward `aim`
    pub fire: bool,
    /// World-space point the player aims toward
    pub aim: Vec2,
}

/// Advance the game state by `dt` seconds.
pub fn tick(world: &mut WorldState, input: &TickInput, dt: f32) {
    world.time += dt as f64;

    // Deferred work due this tick: wave spawns, wave starts, boss attacks.
    // These only mutate world state; they never assume exclusivity with the
    // entity passes below, which all run afterwards.
    while let Some(action) = world.schedule.pop_due(world.time) {
        match action {
            Action::SpawnWaveEnemy => {
                world.pending_spawns = world.pending_spawns.saturating_sub(1);
                waves::spawn_wave_enemy(world);
            }
            Action::StartWave { index } => waves::start_wave(world, index),
            Action::BossAttack => waves::boss_special_attack(world),
        }
    }

    apply_input(world, input);

    {
        let mut ctx = world.tick_ctx();
        update_enemies(&mut ctx, dt);

        // Player physics, then the bullets the player owns
        ctx.player.body.integrate(dt);
        ctx.player.body.clamp_to(ctx.world_width, ctx.world_height);
        projectile::update_player_bullets(
            &mut ctx.player.bullets,
            dt,
            ctx.enemies.as_mut_slice(),
            ctx.rng,
            ctx.player.damage,
            ctx.player.damage_plus,
        );
    }

    compact_deaths(world);

    {
        let ctx = world.tick_ctx();
        items::update_items(ctx.items, ctx.player, ctx.rng, ctx.events);
    }

    // The only user-visible failure: the run ends and restarts synchronously
    if world.player.health <= 0.0 {
        world.emit(GameEvent::PlayerDeath);
        log::info!("player down at score {}, resetting run", world.score);
        world.reset_run();
    }
}

/// Translate polled input into player acceleration and one-shot actions.
fn apply_input(world: &mut WorldState, input: &TickInput) {
    let ax = if input.left {
        -1.0
    } else if input.right {
        1.0
    } else {
        0.0
    };
    let ay = if input.up {
        -1.0
    } else if input.down {
        1.0
    } else {
        0.0
    };
    let speed = world.player.body.speed;
    world.player.body.accel = Vec2::new(ax, ay) * speed;

    if input.phase_shift {
        let now = world.time;
        world.player.phase_shift(now);
    }
    if input.fire {
        world.player.shoot(input.aim);
        world.emit(GameEvent::Shoot);
    }
}

/// Run physics and behavior for every enemy.
///
/// Deaths are not handled here: entities whose health drops to zero stay in
/// place until [`compact_deaths`] runs, so each removal happens exactly once
/// no matter how many code paths dealt the killing blow.
fn update_enemies(ctx: &mut TickCtx, dt: f32) {
    let player_pos = ctx.player.body.pos;
    for i in 0..ctx.enemies.len() {
        {
            let body = &mut ctx.enemies[i].body;
            body.integrate(dt);
            body.clamp_to(ctx.world_width, ctx.world_height);
        }

        if matches!(ctx.enemies[i].kind, EnemyKind::Healer { .. }) {
            heal_pulse(ctx, i);
            continue;
        }

        let (epos, phase, damage, damage_plus, speed) = {
            let e = &ctx.enemies[i];
            (e.body.pos, e.phase, e.damage, e.damage_plus, e.body.speed)
        };
        let dist = epos.distance(player_pos);
        let mut seek = false;

        match &mut ctx.enemies[i].kind {
            EnemyKind::Melee => {
                if dist < MELEE_RANGE {
                    let dmg = roll_damage(ctx.rng, damage, damage_plus);
                    apply_damage(&mut ctx.player.health, ctx.player.phase, dmg, phase);
                }
                seek = dist < AGGRO_RANGE;
            }
            EnemyKind::Ranged {
                projectiles,
                shoot_timer,
            } => {
                *shoot_timer += dt;
                if dist < AGGRO_RANGE && *shoot_timer >= RANGED_SHOOT_INTERVAL {
                    let dir = direction_to(epos, player_pos);
                    projectiles.push(Projectile {
                        pos: epos,
                        vel: dir * PROJECTILE_LAUNCH,
                        phase,
                        width: BULLET_SIZE,
                        height: BULLET_SIZE,
                        speed: ENEMY_PROJECTILE_SPEED,
                        lifespan: ENEMY_PROJECTILE_LIFESPAN,
                    });
                    *shoot_timer = 0.0;
                }
                projectile::update_hostile_projectiles(
                    projectiles,
                    dt,
                    ctx.player,
                    ctx.rng,
                    ctx.events,
                    damage,
                    damage_plus,
                );
            }
            EnemyKind::Healer { .. } => {}
            EnemyKind::Boss { projectiles, .. } => {
                if dist < MELEE_RANGE {
                    let dmg = roll_damage(ctx.rng, damage, damage_plus);
                    apply_damage(&mut ctx.player.health, ctx.player.phase, dmg, phase);
                }
                seek = dist < AGGRO_RANGE;
                projectile::update_hostile_projectiles(
                    projectiles,
                    dt,
                    ctx.player,
                    ctx.rng,
                    ctx.events,
                    damage,
                    damage_plus,
                );
            }
        }

        if seek {
            let dir = direction_to(epos, player_pos);
            ctx.enemies[i].body.vel = dir * speed;
        }
    }
}

/// One heal pulse from the healer at `i`, if its cooldown allows.
///
/// Heals every same-phase enemy below full health within range; the cooldown
/// only resets when at least one heal landed.
fn heal_pulse(ctx: &mut TickCtx, i: usize) {
    let last = match &ctx.enemies[i].kind {
        EnemyKind::Healer { last_heal } => *last_heal,
        _ => return,
    };
    if ctx.time - last < HEAL_COOLDOWN {
        return;
    }
    let (pos, phase) = (ctx.enemies[i].body.pos, ctx.enemies[i].phase);
    let targets: Vec<usize> = ctx
        .enemies
        .iter()
        .enumerate()
        .filter(|&(j, other)| {
            j != i
                && other.phase == phase
                && other.health < MAX_HEALTH
                && other.body.pos.distance(pos) < HEAL_RANGE
        })
        .map(|(j, _)| j)
        .collect();
    if targets.is_empty() {
        return;
    }
    for j in targets {
        let health = &mut ctx.enemies[j].health;
        *health = (*health + HEAL_AMOUNT).min(MAX_HEALTH);
    }
    if let EnemyKind::Healer { last_heal } = &mut ctx.enemies[i].kind {
        *last_heal = ctx.time;
    }
}

/// Remove every dead enemy exactly once and apply death side effects:
/// score, loot drops, and the reactive wave/level completion checks.
fn compact_deaths(world: &mut WorldState) {
    let mut removed_regular = false;
    let mut boss_died = false;
    let mut i = 0;
    while i < world.enemies.len() {
        if world.enemies[i].health > 0.0 {
            i += 1;
            continue;
        }
        let dead = world.enemies.remove(i);
        if dead.is_boss() {
            world.score += BOSS_SCORE;
            world.emit(GameEvent::EnemyDeath);
            boss_died = true;
        } else {
            world.score += ENEMY_SCORE;
            if matches!(dead.kind, EnemyKind::Healer { .. }) {
                world.emit(GameEvent::HealerDeath);
            } else {
                world.emit(GameEvent::EnemyDeath);
            }
            if dead.drops_loot() && world.rng.random_bool(DROP_CHANCE) {
                items::drop_random_item(&mut world.items, &mut world.rng, dead.body.pos);
            }
            removed_regular = true;
        }
    }
    if boss_died {
        waves::complete_level(world);
    } else if removed_regular {
        waves::check_wave_complete(world);
    }
}
