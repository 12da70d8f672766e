use super::order_list::OrderList;
use super::{AccessInfo, EvictionPolicy};

/// An eviction policy that evicts the least recently used entries.
#[derive(Debug)]
pub struct LeastRecentlyUsed {
  // Head is the least recently used id, tail the most recent.
  list: OrderList,
}

impl LeastRecentlyUsed {
  pub fn new() -> Self {
    Self {
      list: OrderList::new(),
    }
  }
}

impl Default for LeastRecentlyUsed {
  fn default() -> Self {
    Self::new()
  }
}

impl EvictionPolicy for LeastRecentlyUsed {
  /// When an item is inserted, it is the most recently used.
  fn on_insert(&mut self, info: &AccessInfo) {
    self.list.push_back(info.id);
  }

  /// When an item is accessed, move it to the most recent position.
  fn on_access(&mut self, info: &AccessInfo) {
    self.list.move_to_back(info.id);
  }

  fn on_remove(&mut self, id: u64) {
    self.list.remove(id);
  }

  fn select_victim(&mut self) -> Option<u64> {
    self.list.pop_front()
  }

  fn clear(&mut self) {
    self.list.clear();
  }

  fn eviction_order(&self) -> Vec<u64> {
    self.list.ids()
  }

  fn name(&self) -> &'static str {
    "LRU"
  }
}
