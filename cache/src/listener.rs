use std::fmt;
use std::sync::Arc;

/// Describes the reason an entry left the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvictionReason {
  /// The eviction strategy removed the entry to make room, either for new
  /// data or after the budget was lowered.
  Capacity,
  /// The entry was removed with `uncache_data`.
  Uncached,
  /// The entry was removed because its data was deleted through the cache.
  Deleted,
  /// The cache was cleared.
  Cleared,
}

impl fmt::Display for EvictionReason {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      EvictionReason::Capacity => write!(f, "evicted due to capacity"),
      EvictionReason::Uncached => write!(f, "manually uncached"),
      EvictionReason::Deleted => write!(f, "deleted from the backing store"),
      EvictionReason::Cleared => write!(f, "cache cleared"),
    }
  }
}

/// A listener that can be registered with the cache to receive notifications
/// when entries leave it.
///
/// `on_evict` is called after the cache lock has been released, on the thread
/// that performed the operation.
pub trait EvictionListener<T>: Send + Sync {
  fn on_evict(&self, data: Arc<T>, reason: EvictionReason);
}

impl<T, F> EvictionListener<T> for F
where
  F: Fn(Arc<T>, EvictionReason) + Send + Sync,
{
  fn on_evict(&self, data: Arc<T>, reason: EvictionReason) {
    self(data, reason)
  }
}
