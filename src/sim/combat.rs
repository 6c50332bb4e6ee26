//! Damage computation and elemental-phase immunity
//!
//! Cross-cutting rules shared by melee contact, player bullets and hostile
//! projectiles. Damage is re-rolled per tick/hit, never fixed per entity.

use rand::Rng;

use super::state::Phase;

/// Roll a damage amount uniformly distributed in `[plus, plus + base)`.
pub fn roll_damage<R: Rng>(rng: &mut R, base: f32, plus: f32) -> f32 {
    rng.random::<f32>() * base + plus
}

/// Apply `amount` of `source`-phase damage to a health pool owned by an
/// entity of phase `own`.
///
/// A matching phase is a no-op (self-immunity included): the pool is left
/// untouched. Returns whether any damage landed. Health is deliberately not
/// floored at zero; death handling reads `<= 0`.
pub fn apply_damage(health: &mut f32, own: Phase, amount: f32, source: Phase) -> bool {
    if own == source {
        return false;
    }
    *health -= amount;
    true
}
