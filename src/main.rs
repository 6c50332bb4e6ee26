//! Phase Arena entry point
//!
//! Headless demo run: a scripted bot plays the encounter loop so waves,
//! bosses, drops and resets can be observed from the logs. A renderer or
//! input frontend would drive [`phase_arena::sim::tick`] the same way.

use phase_arena::sim::{GameEvent, TickInput, WorldState, tick};

/// Demo frame step (the sim itself is delta-time driven)
const DT: f32 = 1.0 / 60.0;
/// Levels generated per run
const NUM_LEVELS: u32 = 5;
/// Demo duration in seconds
const DEMO_SECONDS: f32 = 120.0;

fn main() {
    env_logger::init();

    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or_else(rand::random);
    let mut world = WorldState::new(seed, NUM_LEVELS);
    log::info!("Phase Arena demo starting, seed {seed}");

    match serde_json::to_string_pretty(&world.levels) {
        Ok(json) => println!("{json}"),
        Err(err) => log::warn!("could not dump level plan: {err}"),
    }

    let frames = (DEMO_SECONDS / DT) as u32;
    for frame in 0..frames {
        let input = bot_input(&world, frame);
        tick(&mut world, &input, DT);

        for event in world.drain_events() {
            match event {
                GameEvent::BossSpawned => log::info!("boss incoming"),
                GameEvent::LevelComplete { level } => log::info!("level {level} cleared"),
                GameEvent::PlayerDeath => log::info!("run over, restarting"),
                _ => {}
            }
        }

        if frame % 60 == 0 {
            let (health, high_score, score) = world.hud_state();
            log::info!(
                "t={:>4.0}s health={health} score={score} high={high_score} enemies={} items={}",
                world.time,
                world.enemies.len(),
                world.items.len(),
            );
        }
    }

    let (_, high_score, score) = world.hud_state();
    log::info!("demo finished: score {score}, best {high_score}");
}

/// Scripted stand-in for a human player: kite the nearest enemy and shoot
/// at it, shifting phase whenever the target would be immune.
fn bot_input(world: &WorldState, frame: u32) -> TickInput {
    let mut input = TickInput::default();
    let player = world.player.body.pos;
    let Some(nearest) = world.enemies.iter().min_by(|a, b| {
        a.body
            .pos
            .distance(player)
            .total_cmp(&b.body.pos.distance(player))
    }) else {
        return input;
    };

    input.aim = nearest.body.pos;
    input.fire = frame % 6 == 0;
    input.phase_shift = nearest.phase == world.player.phase;

    let delta = nearest.body.pos - player;
    let retreat = delta.length() < 150.0;
    input.left = if retreat { delta.x > 0.0 } else { delta.x < 0.0 };
    input.right = if retreat { delta.x < 0.0 } else { delta.x > 0.0 };
    input.up = if retreat { delta.y > 0.0 } else { delta.y < 0.0 };
    input.down = if retreat { delta.y < 0.0 } else { delta.y > 0.0 };
    input
}
