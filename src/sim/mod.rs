//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Delta-time driven, single logical thread
//! - Seeded RNG only
//! - Deferred work drained from an epoch-gated schedule, never wall-clock timers
//! - No rendering or platform dependencies

pub mod combat;
pub mod items;
pub mod level;
pub mod projectile;
pub mod schedule;
pub mod state;
pub mod tick;
pub mod waves;

pub use combat::{apply_damage, roll_damage};
pub use items::{Item, ItemKind};
pub use level::{BossSpec, LevelSpec, SpecialAttack, WaveSpec, generate_levels};
pub use projectile::Projectile;
pub use schedule::{Action, Schedule};
pub use state::{Body, Enemy, EnemyKind, GameEvent, Phase, Player, WorldState};
pub use tick::{TickInput, tick};
