use crate::builder::CacheBuilder;
use crate::entry::{CacheEntry, Cacheable};
use crate::error::BuildError;
use crate::listener::{EvictionListener, EvictionReason};
use crate::metrics::{bump, Metrics, MetricsSnapshot};
use crate::policy::{AccessInfo, EvictionPolicy, RandomReplacement};
use crate::rules::{self, CachingRule};
use crate::storage::BackingStore;

use std::fmt;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use ahash::{HashMap, HashMapExt};
use parking_lot::RwLock;

/// Standard cache size of 3 MiB.
pub const STD_MAX_CACHE_SIZE: u64 = 3 * 1024 * 1024;

/// Everything guarded by the cache lock.
struct CacheState<T, P> {
  entries: HashMap<u64, CacheEntry<T>>,
  policy: P,
  max_cache_size: u64,
  current_cache_size: u64,
  // Bumped by every delete that went through the cache. A save only caches its
  // data if no delete finished while the store write was in flight.
  delete_epoch: u64,
}

impl<T: Cacheable, P: EvictionPolicy> CacheState<T, P> {
  #[inline]
  fn free_space(&self) -> u64 {
    self.max_cache_size.saturating_sub(self.current_cache_size)
  }

  fn insert(&mut self, data: Arc<T>) {
    let entry = CacheEntry::new(data);
    let info = AccessInfo {
      id: entry.id(),
      byte_size: entry.byte_size(),
      use_count: entry.use_count(),
    };
    self.current_cache_size += entry.byte_size();
    self.policy.on_insert(&info);
    self.entries.insert(info.id, entry);
  }

  fn remove(&mut self, id: u64) -> Option<CacheEntry<T>> {
    let entry = self.entries.remove(&id)?;
    self.policy.on_remove(id);
    self.current_cache_size = self.current_cache_size.saturating_sub(entry.byte_size());
    Some(entry)
  }

  /// Asks the policy for one victim and drops it. If the policy runs dry
  /// while entries are still resident, those entries are untracked and one of
  /// them is dropped instead. Returns `None` only when the cache is empty.
  fn evict_one(&mut self) -> Option<CacheEntry<T>> {
    while let Some(id) = self.policy.select_victim() {
      if let Some(entry) = self.entries.remove(&id) {
        self.current_cache_size = self.current_cache_size.saturating_sub(entry.byte_size());
        tracing::debug!(
          id,
          byte_size = entry.byte_size(),
          policy = self.policy.name(),
          "evicted entry"
        );
        return Some(entry);
      }
      tracing::warn!(id, policy = self.policy.name(), "policy selected an id that is not resident");
    }

    let id = *self.entries.keys().next()?;
    tracing::warn!(id, policy = self.policy.name(), "policy lost track of a resident entry");
    self.remove(id)
  }

  /// Evicts until `required` bytes are free. `required` must not exceed the
  /// budget, so emptying the cache always suffices.
  fn make_room(&mut self, required: u64, evicted: &mut Vec<Arc<T>>) {
    while self.free_space() < required {
      match self.evict_one() {
        Some(entry) => evicted.push(entry.data()),
        None => break,
      }
    }
  }

  /// Evicts until the current size fits the budget again.
  fn shrink_to_budget(&mut self, evicted: &mut Vec<Arc<T>>) {
    while self.current_cache_size > self.max_cache_size {
      match self.evict_one() {
        Some(entry) => evicted.push(entry.data()),
        None => break,
      }
    }
  }
}

/// A byte-budgeted, thread-safe data cache in front of an optional backing
/// store.
///
/// The engine owns the entries, the byte accounting and the locking. The
/// eviction policy `P` only decides the order in which entries leave.
///
/// One read/write lock guards all state. Queries take the read lock; every
/// mutation, including the bookkeeping of a cache hit in
/// [`load_data`](Self::load_data), takes the write lock. Calls into the backing
/// store are made without holding the lock.
pub struct DataCache<T, P> {
  state: RwLock<CacheState<T, P>>,
  store: Option<Arc<dyn BackingStore<T>>>,
  caching_rule: CachingRule<T>,
  listener: Option<Arc<dyn EvictionListener<T>>>,
  metrics: Metrics,
}

impl<T, P> fmt::Debug for DataCache<T, P> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let state = self.state.read();
    f.debug_struct("DataCache")
      .field("entries", &state.entries.len())
      .field("max_cache_size", &state.max_cache_size)
      .field("current_cache_size", &state.current_cache_size)
      .field("has_store", &self.store.is_some())
      .field("has_listener", &self.listener.is_some())
      .finish_non_exhaustive()
  }
}

impl<T, P> DataCache<T, P>
where
  T: Cacheable,
  P: EvictionPolicy,
{
  /// Constructs a cache from already validated parts.
  pub(crate) fn assemble(
    policy: P,
    max_cache_size: u64,
    caching_rule: CachingRule<T>,
    store: Option<Arc<dyn BackingStore<T>>>,
    initial_entries: Vec<Arc<T>>,
    listener: Option<Arc<dyn EvictionListener<T>>>,
  ) -> Self {
    let mut state = CacheState {
      entries: HashMap::with_capacity(initial_entries.len()),
      policy,
      max_cache_size,
      current_cache_size: 0,
      delete_epoch: 0,
    };

    for data in initial_entries {
      if state.entries.contains_key(&data.id()) {
        tracing::debug!(id = data.id(), "skipping duplicate initial entry");
        continue;
      }
      state.insert(data);
    }

    let mut evicted = Vec::new();
    state.shrink_to_budget(&mut evicted);
    if !evicted.is_empty() {
      tracing::debug!(
        evicted = evicted.len(),
        max_cache_size,
        "initial entries exceeded the budget"
      );
    }

    let cache = Self {
      state: RwLock::new(state),
      store,
      caching_rule,
      listener,
      metrics: Metrics::new(),
    };
    cache.report_evictions(evicted);
    cache
  }

  /// Creates a cache around the given policy with a budget of
  /// [`STD_MAX_CACHE_SIZE`] that admits everything and has no backing store.
  pub fn with_policy(policy: P) -> Self {
    Self::assemble(
      policy,
      STD_MAX_CACHE_SIZE,
      rules::cache_all(),
      None,
      Vec::new(),
      None,
    )
  }

  /// Returns a builder for configuring a cache.
  pub fn builder() -> CacheBuilder<T> {
    CacheBuilder::new()
  }

  // --- Size accounting ---

  /// Returns the maximum cache size in bytes.
  pub fn max_cache_size(&self) -> u64 {
    self.state.read().max_cache_size
  }

  /// Returns the current size of the data in the cache in bytes.
  pub fn current_cache_size(&self) -> u64 {
    self.state.read().current_cache_size
  }

  /// Returns the remaining space for data in bytes.
  pub fn free_space(&self) -> u64 {
    self.state.read().free_space()
  }

  /// Checks if `size` bytes fit without evicting anything.
  pub fn has_storage_for(&self, size: u64) -> bool {
    size <= self.free_space()
  }

  /// Number of resident entries.
  pub fn len(&self) -> usize {
    self.state.read().entries.len()
  }

  /// Checks if no data is resident.
  pub fn is_empty(&self) -> bool {
    self.state.read().entries.is_empty()
  }

  /// Changes the maximum cache size.
  ///
  /// A size of zero is rejected and leaves the cache untouched. If the new
  /// budget is below the current size, entries are evicted in policy order
  /// until everything fits.
  pub fn set_max_cache_size(&self, max_cache_size: u64) -> bool {
    if max_cache_size == 0 {
      tracing::warn!("rejected cache size of zero, keeping the old value");
      return false;
    }

    let mut evicted = Vec::new();
    {
      let mut state = self.state.write();
      let old = state.max_cache_size;
      state.max_cache_size = max_cache_size;
      state.shrink_to_budget(&mut evicted);
      tracing::debug!(old, new = max_cache_size, evicted = evicted.len(), "resized cache");
    }
    self.report_evictions(evicted);
    true
  }

  // --- Predicates ---

  /// Checks whether the caching rule admits the data.
  pub fn data_is_cachable(&self, data: &T) -> bool {
    (self.caching_rule)(data)
  }

  /// Checks whether data with the given id resides in the cache.
  pub fn data_is_in_cache(&self, id: u64) -> bool {
    self.state.read().entries.contains_key(&id)
  }

  /// Checks whether the backing store would persist the data. Without a
  /// backing store there is nothing to refuse, so this is `true`.
  pub fn data_is_storable(&self, data: &T) -> bool {
    self.store.as_ref().map_or(true, |store| store.is_storable(data))
  }

  /// Checks the cache first and falls back to the backing store.
  pub fn data_exists(&self, id: u64) -> bool {
    if self.data_is_in_cache(id) {
      return true;
    }
    self.store.as_ref().map_or(false, |store| store.exists(id))
  }

  // --- Data access ---

  /// Returns the data with the given id.
  ///
  /// A resident entry is marked as used and the policy is told about the
  /// access. On a miss the backing store is asked; its answer is returned but
  /// not inserted into the cache.
  pub fn load_data(&self, id: u64) -> Option<Arc<T>> {
    {
      let mut guard = self.state.write();
      let state = &mut *guard;
      if let Some(entry) = state.entries.get_mut(&id) {
        entry.was_used();
        let info = AccessInfo {
          id,
          byte_size: entry.byte_size(),
          use_count: entry.use_count(),
        };
        let data = entry.data();
        state.policy.on_access(&info);
        bump(&self.metrics.hits);
        tracing::trace!(id, "cache hit");
        return Some(data);
      }
    }

    bump(&self.metrics.misses);
    tracing::trace!(id, "cache miss");
    let loaded = self.store.as_ref()?.load(id);
    if loaded.is_some() {
      bump(&self.metrics.store_loads);
    }
    loaded
  }

  /// Inserts data into the cache if the caching rule admits it, evicting one
  /// or more entries when space is short.
  ///
  /// Data larger than the whole budget is never cached and leaves existing
  /// entries untouched. Caching an id that is already resident is a no-op.
  pub fn cache_data(&self, data: Arc<T>) {
    self.admit(data, None);
  }

  /// Admission path shared by `cache_data` and `save_data`. With
  /// `since_epoch` set, the data is dropped if a delete completed after that
  /// epoch was read.
  fn admit(&self, data: Arc<T>, since_epoch: Option<u64>) {
    if !self.data_is_cachable(&data) {
      bump(&self.metrics.rejections);
      tracing::debug!(id = data.id(), "caching rule refused data");
      return;
    }

    let id = data.id();
    let byte_size = data.byte_size();
    let mut evicted = Vec::new();
    {
      let mut state = self.state.write();
      if byte_size > state.max_cache_size {
        bump(&self.metrics.rejections);
        tracing::debug!(
          id,
          byte_size,
          max_cache_size = state.max_cache_size,
          "data exceeds the cache budget"
        );
        return;
      }
      if state.entries.contains_key(&id) {
        return;
      }
      if since_epoch.is_some_and(|epoch| epoch != state.delete_epoch) {
        tracing::debug!(id, "delete raced with save, not caching");
        return;
      }
      state.make_room(byte_size, &mut evicted);
      state.insert(data);
      bump(&self.metrics.inserts);
      self
        .metrics
        .total_bytes_admitted
        .fetch_add(byte_size, Ordering::Relaxed);
    }
    self.report_evictions(evicted);
  }

  /// Removes the data from the cache only. The backing store is not touched.
  pub fn uncache_data(&self, data: &T) {
    self.remove_resident(data.id(), EvictionReason::Uncached);
  }

  /// Resets the cache and drops all entries.
  pub fn clear_cache(&self) {
    let removed: Vec<Arc<T>> = {
      let mut state = self.state.write();
      state.policy.clear();
      state.current_cache_size = 0;
      state.entries.drain().map(|(_, entry)| entry.data()).collect()
    };
    self
      .metrics
      .removals
      .fetch_add(removed.len() as u64, Ordering::Relaxed);
    tracing::debug!(removed = removed.len(), "cleared cache");
    self.notify(removed, EvictionReason::Cleared);
  }

  /// Writes the data to the backing store. On success the data is offered to
  /// [`cache_data`](Self::cache_data), which still applies the caching rule.
  /// If a [`delete_data`](Self::delete_data) completes while the store write
  /// is in flight, the data is not cached.
  ///
  /// Returns `false` without a backing store; a resident copy stays resident.
  pub fn save_data(&self, data: Arc<T>) -> bool {
    let Some(store) = self.store.as_ref() else {
      bump(&self.metrics.store_save_failures);
      return false;
    };

    let epoch = self.state.read().delete_epoch;
    if !store.save(&data) {
      bump(&self.metrics.store_save_failures);
      tracing::debug!(id = data.id(), "backing store refused save");
      return false;
    }
    bump(&self.metrics.store_saves);
    self.admit(data, Some(epoch));
    true
  }

  /// Deletes the data from the backing store and drops any resident copy,
  /// whatever the store reports. Returns the store's result, or `false`
  /// without a backing store.
  pub fn delete_data(&self, data: &T) -> bool {
    let Some(store) = self.store.as_ref() else {
      return false;
    };

    let deleted = store.delete(data);
    if deleted {
      bump(&self.metrics.store_deletes);
    }

    let id = data.id();
    let removed = {
      let mut state = self.state.write();
      state.delete_epoch = state.delete_epoch.wrapping_add(1);
      state.remove(id)
    };
    if let Some(entry) = removed {
      self.report_removal(entry, EvictionReason::Deleted);
    }
    deleted
  }

  // --- Introspection ---

  /// Resident ids in the order the policy would evict them, next victim first.
  pub fn snapshot_ids(&self) -> Vec<u64> {
    self.state.read().policy.eviction_order()
  }

  /// Number of recorded accesses of a resident entry.
  pub fn use_count(&self, id: u64) -> Option<u64> {
    self.state.read().entries.get(&id).map(CacheEntry::use_count)
  }

  /// Short name of the eviction strategy in use.
  pub fn policy_name(&self) -> &'static str {
    self.state.read().policy.name()
  }

  /// The store queried on misses, if any.
  pub fn backing_store(&self) -> Option<&Arc<dyn BackingStore<T>>> {
    self.store.as_ref()
  }

  /// Returns a point-in-time snapshot of the cache metrics.
  pub fn metrics(&self) -> MetricsSnapshot {
    let (current, max) = {
      let state = self.state.read();
      (state.current_cache_size, state.max_cache_size)
    };
    self.metrics.snapshot(current, max)
  }

  fn remove_resident(&self, id: u64, reason: EvictionReason) {
    let removed = self.state.write().remove(id);
    if let Some(entry) = removed {
      self.report_removal(entry, reason);
    }
  }

  fn report_removal(&self, entry: CacheEntry<T>, reason: EvictionReason) {
    bump(&self.metrics.removals);
    tracing::debug!(id = entry.id(), %reason, "removed entry");
    self.notify(vec![entry.data()], reason);
  }

  // Counts and announces entries evicted by the policy.
  fn report_evictions(&self, evicted: Vec<Arc<T>>) {
    if evicted.is_empty() {
      return;
    }
    self
      .metrics
      .evicted_by_capacity
      .fetch_add(evicted.len() as u64, Ordering::Relaxed);
    self.notify(evicted, EvictionReason::Capacity);
  }

  fn notify(&self, data: Vec<Arc<T>>, reason: EvictionReason) {
    if let Some(listener) = &self.listener {
      for item in data {
        listener.on_evict(item, reason);
      }
    }
  }
}

// --- Per-strategy constructors ---
impl<T, P> DataCache<T, P>
where
  T: Cacheable,
  P: EvictionPolicy + Default,
{
  /// Creates a cache with a budget of [`STD_MAX_CACHE_SIZE`] that admits all data.
  pub fn new() -> Self {
    Self::with_policy(P::default())
  }

  /// Creates a cache with the given budget that admits all data.
  pub fn with_max_size(max_cache_size: u64) -> Result<Self, BuildError> {
    CacheBuilder::new()
      .max_cache_size(max_cache_size)
      .build(P::default())
  }

  /// Creates a cache with the given budget that only admits data accepted by
  /// `caching_rule`.
  pub fn with_caching_rule(
    max_cache_size: u64,
    caching_rule: CachingRule<T>,
  ) -> Result<Self, BuildError> {
    CacheBuilder::new()
      .max_cache_size(max_cache_size)
      .shared_caching_rule(Some(caching_rule))
      .build(P::default())
  }

  /// Creates a cache in front of `store`. A `None` store means there is no
  /// backing store; a `None` rule is rejected.
  pub fn with_store(
    store: Option<Arc<dyn BackingStore<T>>>,
    max_cache_size: u64,
    caching_rule: Option<CachingRule<T>>,
  ) -> Result<Self, BuildError> {
    CacheBuilder::new()
      .maybe_backing_store(store)
      .max_cache_size(max_cache_size)
      .shared_caching_rule(caching_rule)
      .build(P::default())
  }
}

impl<T, P> Default for DataCache<T, P>
where
  T: Cacheable,
  P: EvictionPolicy + Default,
{
  fn default() -> Self {
    Self::new()
  }
}

impl<T: Cacheable> DataCache<T, RandomReplacement> {
  /// Creates a random replacement cache whose victim sequence is fixed by `seed`.
  pub fn with_seed(
    store: Option<Arc<dyn BackingStore<T>>>,
    max_cache_size: u64,
    caching_rule: Option<CachingRule<T>>,
    seed: u64,
  ) -> Result<Self, BuildError> {
    CacheBuilder::new()
      .maybe_backing_store(store)
      .max_cache_size(max_cache_size)
      .shared_caching_rule(caching_rule)
      .build(RandomReplacement::with_seed(seed))
  }

  /// Re-seeds the random number generator used to pick victims.
  pub fn set_seed(&self, seed: u64) {
    self.state.write().policy.set_seed(seed);
  }
}

/// A cache can stand in wherever a backing store is expected, so caches can be
/// stacked or handed to consumers that only know the store contract.
impl<T, P> BackingStore<T> for DataCache<T, P>
where
  T: Cacheable,
  P: EvictionPolicy,
{
  fn exists(&self, id: u64) -> bool {
    self.data_exists(id)
  }

  fn load(&self, id: u64) -> Option<Arc<T>> {
    self.load_data(id)
  }

  fn save(&self, data: &Arc<T>) -> bool {
    self.save_data(data.clone())
  }

  fn delete(&self, data: &T) -> bool {
    self.delete_data(data)
  }

  fn is_storable(&self, data: &T) -> bool {
    self.data_is_storable(data)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::policy::{FirstInFirstOut, LeastRecentlyUsed};

  #[derive(Debug)]
  struct Item {
    id: u64,
    size: u64,
  }

  impl Cacheable for Item {
    fn id(&self) -> u64 {
      self.id
    }

    fn byte_size(&self) -> u64 {
      self.size
    }
  }

  fn item(id: u64, size: u64) -> Arc<Item> {
    Arc::new(Item { id, size })
  }

  fn assert_accounting<P: EvictionPolicy>(cache: &DataCache<Item, P>) {
    let state = cache.state.read();
    let sum: u64 = state.entries.values().map(CacheEntry::byte_size).sum();
    assert_eq!(sum, state.current_cache_size);
    assert!(state.current_cache_size <= state.max_cache_size);

    let mut tracked = state.policy.eviction_order();
    tracked.sort_unstable();
    let mut resident: Vec<u64> = state.entries.keys().copied().collect();
    resident.sort_unstable();
    assert_eq!(tracked, resident, "policy and entries must track the same ids");
  }

  #[test]
  fn insert_and_evict_keep_policy_in_sync() {
    let cache = DataCache::<Item, FirstInFirstOut>::with_max_size(10).unwrap();
    for id in 0..20 {
      cache.cache_data(item(id, id % 4 + 1));
      assert_accounting(&cache);
    }

    cache.uncache_data(&item(19, 4));
    assert_accounting(&cache);

    cache.set_max_cache_size(3);
    assert_accounting(&cache);

    cache.clear_cache();
    assert_accounting(&cache);
    assert!(cache.is_empty());
  }

  #[test]
  fn initial_entries_are_trimmed_to_budget() {
    let cache = CacheBuilder::new()
      .max_cache_size(5)
      .entries(vec![item(1, 2), item(2, 2), item(1, 2), item(3, 2)])
      .build(LeastRecentlyUsed::new())
      .unwrap();

    assert_accounting(&cache);
    assert_eq!(cache.snapshot_ids(), vec![2, 3]);
    assert_eq!(cache.current_cache_size(), 4);
  }

  #[test]
  fn hits_record_use_counts() {
    let cache = DataCache::<Item, LeastRecentlyUsed>::new();
    cache.cache_data(item(1, 1));

    cache.load_data(1);
    cache.load_data(1);

    assert_eq!(cache.use_count(1), Some(2));
    assert_eq!(cache.use_count(2), None);
    let metrics = cache.metrics();
    assert_eq!(metrics.hits, 2);
    assert_eq!(metrics.misses, 0);
  }

  // Tracks nothing, so it never offers a victim.
  struct Forgetful;

  impl EvictionPolicy for Forgetful {
    fn on_insert(&mut self, _info: &AccessInfo) {}
    fn on_access(&mut self, _info: &AccessInfo) {}
    fn on_remove(&mut self, _id: u64) {}
    fn select_victim(&mut self) -> Option<u64> {
      None
    }
    fn clear(&mut self) {}
    fn eviction_order(&self) -> Vec<u64> {
      Vec::new()
    }
    fn name(&self) -> &'static str {
      "Forgetful"
    }
  }

  #[test]
  fn untracked_entries_are_still_evicted() {
    let cache = CacheBuilder::new()
      .max_cache_size(10)
      .build(Forgetful)
      .unwrap();
    cache.cache_data(item(1, 4));
    cache.cache_data(item(2, 4));

    // Needs 4 bytes with 2 free: one untracked entry goes, the new one is admitted.
    cache.cache_data(item(3, 4));
    assert!(cache.data_is_in_cache(3));
    assert_eq!(cache.len(), 2);
    assert_eq!(cache.current_cache_size(), 8);
    assert_eq!(cache.metrics().evicted_by_capacity, 1);

    assert!(cache.set_max_cache_size(3));
    assert!(cache.is_empty());
    assert_eq!(cache.current_cache_size(), 0);
    assert_eq!(cache.metrics().evicted_by_capacity, 3);
  }
}
