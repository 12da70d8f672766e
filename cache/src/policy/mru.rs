use super::order_list::OrderList;
use super::{AccessInfo, EvictionPolicy};

/// An eviction policy that evicts the most recently used entry.
///
/// Useful for cyclic scans where the item just served is the one least likely
/// to be requested again soon.
#[derive(Debug)]
pub struct MostRecentlyUsed {
  // Tail is the most recently used id and the next victim.
  list: OrderList,
}

impl MostRecentlyUsed {
  pub fn new() -> Self {
    Self {
      list: OrderList::new(),
    }
  }
}

impl Default for MostRecentlyUsed {
  fn default() -> Self {
    Self::new()
  }
}

impl EvictionPolicy for MostRecentlyUsed {
  fn on_insert(&mut self, info: &AccessInfo) {
    self.list.push_back(info.id);
  }

  fn on_access(&mut self, info: &AccessInfo) {
    self.list.move_to_back(info.id);
  }

  fn on_remove(&mut self, id: u64) {
    self.list.remove(id);
  }

  fn select_victim(&mut self) -> Option<u64> {
    self.list.pop_back()
  }

  fn clear(&mut self) {
    self.list.clear();
  }

  fn eviction_order(&self) -> Vec<u64> {
    let mut ids = self.list.ids();
    ids.reverse();
    ids
  }

  fn name(&self) -> &'static str {
    "MRU"
  }
}
