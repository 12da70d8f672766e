pub mod memory;

use std::sync::Arc;

/// The slower persistence layer a cache sits in front of.
///
/// Every operation reports its outcome as a plain `bool` or `Option`. A
/// refusal is a normal result, never an error, and the cache never retries a
/// failed call.
pub trait BackingStore<T>: Send + Sync {
  /// Checks whether data with the given id resides in the store.
  fn exists(&self, id: u64) -> bool;

  /// Returns the data with the given id, or `None` if the store does not hold it.
  fn load(&self, id: u64) -> Option<Arc<T>>;

  /// Persists the data. Returns `false` if the store rejected it, e.g. because
  /// the id is already stored or the storage rule denies it.
  fn save(&self, data: &Arc<T>) -> bool;

  /// Removes the data. Returns `false` if nothing was removed, so deleting an
  /// already deleted id reports `false`.
  fn delete(&self, data: &T) -> bool;

  /// Checks whether the storage rule allows persisting the data, independent
  /// of what the store currently holds.
  fn is_storable(&self, data: &T) -> bool;
}
