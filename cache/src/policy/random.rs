use super::{AccessInfo, EvictionPolicy};

use ahash::{HashMap, HashMapExt};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// An eviction policy that evicts a uniformly random entry.
///
/// Victims are drawn from a [`StdRng`]. Seeding it with [`with_seed`](Self::with_seed)
/// makes the eviction sequence reproducible: the victim is the id stored at
/// `rng.random_range(0..len)` in the slot vector, and removal swaps the last
/// slot into the freed position.
#[derive(Debug)]
pub struct RandomReplacement {
  slots: Vec<u64>,
  positions: HashMap<u64, usize>,
  rng: StdRng,
}

impl RandomReplacement {
  /// Creates a policy seeded from the operating system.
  pub fn new() -> Self {
    Self::with_rng(StdRng::from_os_rng())
  }

  /// Creates a policy with a deterministic victim sequence.
  pub fn with_seed(seed: u64) -> Self {
    Self::with_rng(StdRng::seed_from_u64(seed))
  }

  fn with_rng(rng: StdRng) -> Self {
    Self {
      slots: Vec::new(),
      positions: HashMap::new(),
      rng,
    }
  }

  /// Re-seeds the generator. Tracked entries are kept.
  pub fn set_seed(&mut self, seed: u64) {
    self.rng = StdRng::seed_from_u64(seed);
  }

  fn remove_slot(&mut self, slot: usize) -> u64 {
    let id = self.slots.swap_remove(slot);
    self.positions.remove(&id);
    if let Some(&moved) = self.slots.get(slot) {
      self.positions.insert(moved, slot);
    }
    id
  }
}

impl Default for RandomReplacement {
  fn default() -> Self {
    Self::new()
  }
}

impl EvictionPolicy for RandomReplacement {
  fn on_insert(&mut self, info: &AccessInfo) {
    if self.positions.contains_key(&info.id) {
      return;
    }
    self.positions.insert(info.id, self.slots.len());
    self.slots.push(info.id);
  }

  /// A random policy does not care about access patterns. This is a no-op.
  fn on_access(&mut self, _info: &AccessInfo) {}

  fn on_remove(&mut self, id: u64) {
    if let Some(&slot) = self.positions.get(&id) {
      self.remove_slot(slot);
    }
  }

  fn select_victim(&mut self) -> Option<u64> {
    if self.slots.is_empty() {
      return None;
    }
    let slot = self.rng.random_range(0..self.slots.len());
    Some(self.remove_slot(slot))
  }

  fn clear(&mut self) {
    self.slots.clear();
    self.positions.clear();
  }

  /// Slot order. Any of these may be picked next.
  fn eviction_order(&self) -> Vec<u64> {
    self.slots.clone()
  }

  fn name(&self) -> &'static str {
    "RR"
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::policy::info;

  #[test]
  fn test_seeded_policy_is_reproducible() {
    let run = |seed| {
      let mut policy = RandomReplacement::with_seed(seed);
      for id in 0..32 {
        policy.on_insert(&info(id));
      }
      (0..32)
        .map(|_| policy.select_victim())
        .collect::<Vec<_>>()
    };

    assert_eq!(run(7), run(7));
  }

  #[test]
  fn test_every_entry_is_evicted_exactly_once() {
    let mut policy = RandomReplacement::with_seed(42);
    for id in 0..16 {
      policy.on_insert(&info(id));
    }

    let mut victims: Vec<u64> = std::iter::from_fn(|| policy.select_victim()).collect();
    victims.sort_unstable();
    assert_eq!(victims, (0..16).collect::<Vec<_>>());
  }

  #[test]
  fn test_remove_keeps_positions_consistent() {
    let mut policy = RandomReplacement::with_seed(1);
    policy.on_insert(&info(1));
    policy.on_insert(&info(2));
    policy.on_insert(&info(3));

    policy.on_remove(1);
    assert_eq!(policy.eviction_order(), vec![3, 2]);

    policy.on_remove(2);
    assert_eq!(policy.eviction_order(), vec![3]);
    assert_eq!(policy.select_victim(), Some(3));
    assert_eq!(policy.select_victim(), None);
  }

  #[test]
  fn test_duplicate_insert_is_ignored() {
    let mut policy = RandomReplacement::with_seed(1);
    policy.on_insert(&info(5));
    policy.on_insert(&info(5));

    assert_eq!(policy.eviction_order(), vec![5]);
  }
}
