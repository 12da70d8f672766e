pub mod fifo;
pub mod lfu;
pub mod lifo;
pub mod lru;
pub mod mru;
pub mod random;

mod order_list;

pub use fifo::FirstInFirstOut;
pub use lfu::LeastFrequentlyUsed;
pub use lifo::LastInFirstOut;
pub use lru::LeastRecentlyUsed;
pub use mru::MostRecentlyUsed;
pub use random::RandomReplacement;

/// Provides the eviction policy with the facts about an entry that is being
/// admitted or accessed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessInfo {
  pub id: u64,
  pub byte_size: u64,
  /// Number of recorded accesses, already including the current one.
  pub use_count: u64,
}

/// A trait for implementing cache eviction strategies.
///
/// The cache engine owns the entries and the byte accounting. A policy only
/// tracks ids and decides the eviction order. All hooks are called while the
/// cache holds its write lock, so implementations need no locking of their own.
pub trait EvictionPolicy: Send + Sync {
  /// Called when a new entry has been admitted. The id is not yet tracked.
  fn on_insert(&mut self, info: &AccessInfo);

  /// Called when a resident entry is served from the cache.
  fn on_access(&mut self, info: &AccessInfo);

  /// Called when an entry leaves the cache for a reason other than eviction
  /// by this policy. Unknown ids must be ignored.
  fn on_remove(&mut self, id: u64);

  /// Chooses exactly one victim, stops tracking it and returns its id.
  /// Returns `None` only when nothing is tracked. If it returns `None` while
  /// entries are still resident, the cache drops those entries in arbitrary
  /// order instead.
  fn select_victim(&mut self) -> Option<u64>;

  /// Clears all state from the policy.
  fn clear(&mut self);

  /// Tracked ids in the order they would be evicted, next victim first.
  fn eviction_order(&self) -> Vec<u64>;

  /// Short name of the strategy, used in logs.
  fn name(&self) -> &'static str;
}

impl EvictionPolicy for Box<dyn EvictionPolicy> {
  fn on_insert(&mut self, info: &AccessInfo) {
    (**self).on_insert(info)
  }

  fn on_access(&mut self, info: &AccessInfo) {
    (**self).on_access(info)
  }

  fn on_remove(&mut self, id: u64) {
    (**self).on_remove(id)
  }

  fn select_victim(&mut self) -> Option<u64> {
    (**self).select_victim()
  }

  fn clear(&mut self) {
    (**self).clear()
  }

  fn eviction_order(&self) -> Vec<u64> {
    (**self).eviction_order()
  }

  fn name(&self) -> &'static str {
    (**self).name()
  }
}

#[cfg(test)]
pub(crate) fn info(id: u64) -> AccessInfo {
  AccessInfo {
    id,
    byte_size: 1,
    use_count: 0,
  }
}
