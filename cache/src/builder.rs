use crate::cache::{DataCache, STD_MAX_CACHE_SIZE};
use crate::entry::Cacheable;
use crate::error::BuildError;
use crate::listener::EvictionListener;
use crate::policy::EvictionPolicy;
use crate::rules::{self, CachingRule};
use crate::storage::BackingStore;

use core::fmt;
use std::sync::Arc;

/// A builder for creating [`DataCache`] instances.
///
/// Defaults: a budget of [`STD_MAX_CACHE_SIZE`], a caching rule that admits
/// everything, no backing store, no initial entries and no listener.
pub struct CacheBuilder<T> {
  max_cache_size: u64,
  caching_rule: Option<CachingRule<T>>,
  store: Option<Arc<dyn BackingStore<T>>>,
  entries: Option<Vec<Arc<T>>>,
  listener: Option<Arc<dyn EvictionListener<T>>>,
}

// Manual Debug implementation for CacheBuilder.
impl<T> fmt::Debug for CacheBuilder<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("CacheBuilder")
      .field("max_cache_size", &self.max_cache_size)
      .field("has_caching_rule", &self.caching_rule.is_some())
      .field("has_store", &self.store.is_some())
      .field("initial_entries", &self.entries.as_ref().map(Vec::len))
      .field("has_listener", &self.listener.is_some())
      .finish()
  }
}

impl<T: 'static> CacheBuilder<T> {
  /// Creates a new `CacheBuilder` with default settings.
  pub fn new() -> Self {
    Self {
      max_cache_size: STD_MAX_CACHE_SIZE,
      caching_rule: Some(rules::cache_all()),
      store: None,
      entries: Some(Vec::new()),
      listener: None,
    }
  }

  /// Sets the maximum total byte size of the cache.
  pub fn max_cache_size(mut self, max_cache_size: u64) -> Self {
    self.max_cache_size = max_cache_size;
    self
  }

  /// Sets the rule deciding which data may be cached.
  pub fn caching_rule<F>(mut self, rule: F) -> Self
  where
    F: Fn(&T) -> bool + Send + Sync + 'static,
  {
    self.caching_rule = Some(Arc::new(rule));
    self
  }

  /// Sets an already shared caching rule. `None` makes `build` fail.
  pub fn shared_caching_rule(mut self, rule: Option<CachingRule<T>>) -> Self {
    self.caching_rule = rule;
    self
  }

  /// Sets the store queried when data is not resident.
  pub fn backing_store(mut self, store: Arc<dyn BackingStore<T>>) -> Self {
    self.store = Some(store);
    self
  }

  /// Sets or clears the backing store.
  pub fn maybe_backing_store(mut self, store: Option<Arc<dyn BackingStore<T>>>) -> Self {
    self.store = store;
    self
  }

  /// Pre-populates the cache. Entries are admitted in iteration order without
  /// consulting the caching rule; duplicates are skipped and anything over the
  /// budget is evicted by the policy.
  pub fn entries<I>(mut self, entries: I) -> Self
  where
    I: IntoIterator<Item = Arc<T>>,
  {
    self.entries = Some(entries.into_iter().collect());
    self
  }

  /// Sets or clears the initial entry collection. `None` makes `build` fail.
  pub fn initial_entries(mut self, entries: Option<Vec<Arc<T>>>) -> Self {
    self.entries = entries;
    self
  }

  /// Sets the eviction listener for the cache.
  pub fn eviction_listener<Listener>(mut self, listener: Listener) -> Self
  where
    Listener: EvictionListener<T> + 'static,
  {
    self.listener = Some(Arc::new(listener));
    self
  }
}

impl<T: 'static> Default for CacheBuilder<T> {
  fn default() -> Self {
    Self::new()
  }
}

impl<T: Cacheable> CacheBuilder<T> {
  /// Builds a cache that evicts according to `policy`.
  pub fn build<P: EvictionPolicy>(self, policy: P) -> Result<DataCache<T, P>, BuildError> {
    self.validate()?;

    let (Some(caching_rule), Some(entries)) = (self.caching_rule, self.entries) else {
      // validate() has already rejected both cases.
      return Err(BuildError::MissingCachingRule);
    };

    if self.store.is_none() {
      tracing::info!("no backing store supplied, assuming no data is stored outside the cache");
    }

    Ok(DataCache::assemble(
      policy,
      self.max_cache_size,
      caching_rule,
      self.store,
      entries,
      self.listener,
    ))
  }

  /// Validates the builder configuration.
  pub(crate) fn validate(&self) -> Result<(), BuildError> {
    let result = if self.entries.is_none() {
      Err(BuildError::MissingEntries)
    } else if self.caching_rule.is_none() {
      Err(BuildError::MissingCachingRule)
    } else if self.max_cache_size == 0 {
      Err(BuildError::ZeroCapacity)
    } else {
      Ok(())
    };

    if let Err(err) = &result {
      tracing::error!(%err, "invalid cache configuration");
    }
    result
  }
}
