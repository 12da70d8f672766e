use super::order_list::OrderList;
use super::{AccessInfo, EvictionPolicy};

/// An eviction policy that evicts the most recently inserted entry first.
#[derive(Debug)]
pub struct LastInFirstOut {
  list: OrderList,
}

impl LastInFirstOut {
  pub fn new() -> Self {
    Self {
      list: OrderList::new(),
    }
  }
}

impl Default for LastInFirstOut {
  fn default() -> Self {
    Self::new()
  }
}

impl EvictionPolicy for LastInFirstOut {
  fn on_insert(&mut self, info: &AccessInfo) {
    self.list.push_back(info.id);
  }

  fn on_access(&mut self, _info: &AccessInfo) {}

  fn on_remove(&mut self, id: u64) {
    self.list.remove(id);
  }

  /// The newest entry sits on top of the stack and leaves first.
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
    "LIFO"
  }
}
