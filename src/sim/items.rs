//! Drop-on-death loot
//!
//! Items live in a single world-owned collection; the player collects them
//! by proximity and the effect applies the same tick the pickup happens.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::{GameEvent, Player};
use crate::consts::{ITEM_PICKUP_RADIUS, ITEM_SIZE, MAX_HEALTH};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemKind {
    Health,
}

/// A dropped pickup waiting on the ground
#[derive(Debug, Clone)]
pub struct Item {
    pub kind: ItemKind,
    /// Center position in world space
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
}

/// Drop a random item at a dead enemy's last position.
pub(crate) fn drop_random_item<R: Rng>(items: &mut Vec<Item>, rng: &mut R, pos: Vec2) {
    const TYPES: [ItemKind; 1] = [ItemKind::Health];
    let kind = TYPES[rng.random_range(0..TYPES.len())];
    items.push(Item {
        kind,
        pos,
        width: ITEM_SIZE,
        height: ITEM_SIZE,
    });
}

/// Collect items within pickup range of the player and apply their effects.
pub(crate) fn update_items<R: Rng>(
    items: &mut Vec<Item>,
    player: &mut Player,
    rng: &mut R,
    events: &mut Vec<GameEvent>,
) {
    items.retain(|item| {
        if item.pos.distance(player.body.pos) >= ITEM_PICKUP_RADIUS {
            return true;
        }
        match item.kind {
            ItemKind::Health => {
                let amount = rng.random::<f32>() * 5.0 + 7.0;
                player.health = (player.health + amount).min(MAX_HEALTH);
            }
        }
        events.push(GameEvent::ItemPickup);
        false
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Phase;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_pickup_heals_within_cap() {
        let mut rng = Pcg32::seed_from_u64(11);
        let mut player = Player::new(Vec2::ZERO);
        player.health = 50.0;
        let mut items = Vec::new();
        let mut events = Vec::new();
        drop_random_item(&mut items, &mut rng, Vec2::new(10.0, 0.0));

        update_items(&mut items, &mut player, &mut rng, &mut events);
        assert!(items.is_empty());
        // Heal roll is uniform in [7, 12)
        assert!(player.health > 56.9 && player.health < 62.0);
        assert_eq!(events, vec![GameEvent::ItemPickup]);
    }

    #[test]
    fn test_pickup_never_overheals() {
        let mut rng = Pcg32::seed_from_u64(12);
        let mut player = Player::new(Vec2::ZERO);
        player.health = 98.0;
        let mut items = Vec::new();
        let mut events = Vec::new();
        drop_random_item(&mut items, &mut rng, Vec2::ZERO);

        update_items(&mut items, &mut player, &mut rng, &mut events);
        assert_eq!(player.health, MAX_HEALTH);
    }

    #[test]
    fn test_item_out_of_range_stays() {
        let mut rng = Pcg32::seed_from_u64(13);
        let mut player = Player::new(Vec2::ZERO);
        player.phase = Phase::Fire;
        let mut items = Vec::new();
        let mut events = Vec::new();
        drop_random_item(&mut items, &mut rng, Vec2::new(100.0, 100.0));

        update_items(&mut items, &mut player, &mut rng, &mut events);
        assert_eq!(items.len(), 1);
        assert!(events.is_empty());
    }
}
