//! Deferred-action schedule for the simulation
//!
//! Wall-clock timers would keep firing into the next run after a reset, so
//! every deferred action (wave spawns, wave starts, boss attacks) is instead
//! a `(fire_at, seq, epoch, action)` entry in a priority queue drained
//! against the sim clock each tick. A reset advances the epoch and clears
//! the queue; anything stale that somehow survives is dropped on pop.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// A deferred mutation of the world
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Spawn one enemy of the current wave
    SpawnWaveEnemy,
    /// Begin the given wave after its break
    StartWave { index: usize },
    /// Fire the boss's special attack and reschedule it
    BossAttack,
}

#[derive(Debug, Clone, Copy)]
struct Pending {
    fire_at: f64,
    /// Tiebreak so same-instant entries drain in schedule order
    seq: u64,
    epoch: u64,
    action: Action,
}

impl PartialEq for Pending {
    fn eq(&self, other: &Self) -> bool {
        self.seq == other.seq
    }
}

impl Eq for Pending {}

impl Ord for Pending {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.fire_at
            .total_cmp(&other.fire_at)
            .then(self.seq.cmp(&other.seq))
    }
}

impl PartialOrd for Pending {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// Priority queue of deferred actions, epoch-gated against resets
#[derive(Debug, Default)]
pub struct Schedule {
    heap: BinaryHeap<Reverse<Pending>>,
    epoch: u64,
    seq: u64,
}

impl Schedule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current epoch; advanced by [`Schedule::cancel_all`]
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Number of queued entries (stale ones included until drained)
    pub fn pending(&self) -> usize {
        self.heap.len()
    }

    /// Queue `action` to fire `delay` seconds after `now`.
    ///
    /// Negative delays are treated as zero: the action fires on the next
    /// drain, never retroactively.
    pub fn after(&mut self, now: f64, delay: f64, action: Action) {
        self.seq += 1;
        self.heap.push(Reverse(Pending {
            fire_at: now + delay.max(0.0),
            seq: self.seq,
            epoch: self.epoch,
            action,
        }));
    }

    /// Discard every queued action and advance the epoch so that anything
    /// captured before this call can never fire.
    pub fn cancel_all(&mut self) {
        self.heap.clear();
        self.epoch += 1;
    }

    /// Pop the next action due at or before `now`, skipping stale epochs.
    /// Returns `None` once nothing else is due this tick.
    pub fn pop_due(&mut self, now: f64) -> Option<Action> {
        while let Some(Reverse(next)) = self.heap.peek() {
            if next.fire_at > now {
                return None;
            }
            let entry = self.heap.pop().map(|Reverse(p)| p)?;
            if entry.epoch == self.epoch {
                return Some(entry.action);
            }
            // Stale entry from before a reset: drop and keep draining
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pop_due_orders_by_fire_time() {
        let mut s = Schedule::new();
        s.after(0.0, 2.0, Action::BossAttack);
        s.after(0.0, 1.0, Action::SpawnWaveEnemy);
        s.after(0.0, 3.0, Action::StartWave { index: 1 });

        assert_eq!(s.pop_due(10.0), Some(Action::SpawnWaveEnemy));
        assert_eq!(s.pop_due(10.0), Some(Action::BossAttack));
        assert_eq!(s.pop_due(10.0), Some(Action::StartWave { index: 1 }));
        assert_eq!(s.pop_due(10.0), None);
    }

    #[test]
    fn test_pop_due_respects_clock() {
        let mut s = Schedule::new();
        s.after(0.0, 5.0, Action::SpawnWaveEnemy);
        assert_eq!(s.pop_due(4.999), None);
        assert_eq!(s.pop_due(5.0), Some(Action::SpawnWaveEnemy));
    }

    #[test]
    fn test_same_instant_entries_drain_in_schedule_order() {
        let mut s = Schedule::new();
        s.after(0.0, 1.0, Action::SpawnWaveEnemy);
        s.after(0.0, 1.0, Action::BossAttack);
        assert_eq!(s.pop_due(1.0), Some(Action::SpawnWaveEnemy));
        assert_eq!(s.pop_due(1.0), Some(Action::BossAttack));
    }

    #[test]
    fn test_cancel_all_discards_pending() {
        let mut s = Schedule::new();
        s.after(0.0, 1.0, Action::BossAttack);
        let epoch = s.epoch();
        s.cancel_all();
        assert_eq!(s.pending(), 0);
        assert_eq!(s.epoch(), epoch + 1);
        assert_eq!(s.pop_due(100.0), None);

        // New-epoch entries still fire
        s.after(0.0, 1.0, Action::SpawnWaveEnemy);
        assert_eq!(s.pop_due(100.0), Some(Action::SpawnWaveEnemy));
    }

    #[test]
    fn test_negative_delay_fires_next_drain() {
        let mut s = Schedule::new();
        s.after(10.0, -3.0, Action::SpawnWaveEnemy);
        assert_eq!(s.pop_due(10.0), Some(Action::SpawnWaveEnemy));
    }
}
