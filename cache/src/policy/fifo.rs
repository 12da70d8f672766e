use super::order_list::OrderList;
use super::{AccessInfo, EvictionPolicy};

/// An eviction policy that evicts entries in a First-In, First-Out (FIFO) manner.
#[derive(Debug)]
pub struct FirstInFirstOut {
  list: OrderList,
}

impl FirstInFirstOut {
  pub fn new() -> Self {
    Self {
      list: OrderList::new(),
    }
  }
}

impl Default for FirstInFirstOut {
  fn default() -> Self {
    Self::new()
  }
}

impl EvictionPolicy for FirstInFirstOut {
  /// New entries join the back of the queue.
  fn on_insert(&mut self, info: &AccessInfo) {
    self.list.push_back(info.id);
  }

  /// A FIFO policy does not care about access patterns. This is a no-op.
  fn on_access(&mut self, _info: &AccessInfo) {}

  fn on_remove(&mut self, id: u64) {
    self.list.remove(id);
  }

  /// The oldest inserted entry leaves first.
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
    "FIFO"
  }
}
