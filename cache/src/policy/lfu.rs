use super::{AccessInfo, EvictionPolicy};

use std::collections::BTreeMap;

use ahash::{HashMap, HashMapExt};

// Ordering key: use count first, then admission sequence so that ties go to
// the oldest inserted entry.
type Rank = (u64, u64);

/// An eviction policy that evicts the least frequently used entry.
#[derive(Debug)]
pub struct LeastFrequentlyUsed {
  ranked: BTreeMap<Rank, u64>,
  ranks: HashMap<u64, Rank>,
  next_sequence: u64,
}

impl LeastFrequentlyUsed {
  pub fn new() -> Self {
    Self {
      ranked: BTreeMap::new(),
      ranks: HashMap::new(),
      next_sequence: 0,
    }
  }
}

impl Default for LeastFrequentlyUsed {
  fn default() -> Self {
    Self::new()
  }
}

impl EvictionPolicy for LeastFrequentlyUsed {
  fn on_insert(&mut self, info: &AccessInfo) {
    if self.ranks.contains_key(&info.id) {
      return;
    }
    let rank = (info.use_count, self.next_sequence);
    self.next_sequence += 1;
    self.ranks.insert(info.id, rank);
    self.ranked.insert(rank, info.id);
  }

  /// Re-ranks the entry with its new use count, keeping its admission sequence.
  fn on_access(&mut self, info: &AccessInfo) {
    if let Some(rank) = self.ranks.get_mut(&info.id) {
      self.ranked.remove(&*rank);
      rank.0 = info.use_count;
      self.ranked.insert(*rank, info.id);
    }
  }

  fn on_remove(&mut self, id: u64) {
    if let Some(rank) = self.ranks.remove(&id) {
      self.ranked.remove(&rank);
    }
  }

  fn select_victim(&mut self) -> Option<u64> {
    let (_, id) = self.ranked.pop_first()?;
    self.ranks.remove(&id);
    Some(id)
  }

  fn clear(&mut self) {
    self.ranked.clear();
    self.ranks.clear();
  }

  fn eviction_order(&self) -> Vec<u64> {
    self.ranked.values().copied().collect()
  }

  fn name(&self) -> &'static str {
    "LFU"
  }
}
