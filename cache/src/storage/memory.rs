use super::BackingStore;
use crate::entry::Cacheable;
use crate::rules::{self, StorageRule};

use std::fmt;
use std::sync::Arc;

use ahash::{HashMap, HashMapExt};
use parking_lot::RwLock;

/// A thread-safe, in-process backing store.
///
/// Payloads that fail the storage rule are refused, saving an id that is
/// already stored is refused, and deleting an absent id reports `false`.
pub struct MemoryStore<T> {
  items: RwLock<HashMap<u64, Arc<T>>>,
  storage_rule: StorageRule<T>,
}

impl<T> fmt::Debug for MemoryStore<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("MemoryStore")
      .field("len", &self.items.read().len())
      .finish_non_exhaustive()
  }
}

impl<T: Cacheable> MemoryStore<T> {
  /// Creates an empty store that persists everything.
  pub fn new() -> Self {
    Self::with_storage_rule(rules::store_all())
  }

  /// Creates an empty store that only persists data accepted by `storage_rule`.
  pub fn with_storage_rule(storage_rule: StorageRule<T>) -> Self {
    Self {
      items: RwLock::new(HashMap::new()),
      storage_rule,
    }
  }

  pub fn len(&self) -> usize {
    self.items.read().len()
  }

  pub fn is_empty(&self) -> bool {
    self.items.read().is_empty()
  }
}

impl<T: Cacheable> Default for MemoryStore<T> {
  fn default() -> Self {
    Self::new()
  }
}

impl<T: Cacheable> BackingStore<T> for MemoryStore<T> {
  fn exists(&self, id: u64) -> bool {
    self.items.read().contains_key(&id)
  }

  fn load(&self, id: u64) -> Option<Arc<T>> {
    self.items.read().get(&id).cloned()
  }

  fn save(&self, data: &Arc<T>) -> bool {
    if !self.is_storable(data) {
      tracing::debug!(id = data.id(), "storage rule refused data");
      return false;
    }

    let mut items = self.items.write();
    if items.contains_key(&data.id()) {
      return false;
    }
    items.insert(data.id(), data.clone());
    true
  }

  fn delete(&self, data: &T) -> bool {
    self.items.write().remove(&data.id()).is_some()
  }

  fn is_storable(&self, data: &T) -> bool {
    (self.storage_rule)(data)
  }
}
