//! Admission and storage predicates.
//!
//! A caching rule decides whether a payload may enter the cache. A storage
//! rule decides whether a backing store will persist it at all. Both are pure
//! functions, evaluated fresh on every attempt.

use crate::entry::Cacheable;

use std::sync::Arc;

/// Decides whether a payload may be cached.
pub type CachingRule<T> = Arc<dyn Fn(&T) -> bool + Send + Sync>;

/// Decides whether a payload may be persisted by a backing store.
pub type StorageRule<T> = Arc<dyn Fn(&T) -> bool + Send + Sync>;

/// Admits every payload.
pub fn cache_all<T: 'static>() -> CachingRule<T> {
  Arc::new(|_: &T| true)
}

/// Persists every payload.
pub fn store_all<T: 'static>() -> StorageRule<T> {
  Arc::new(|_: &T| true)
}

/// Accepts payloads whose byte size does not exceed `limit`.
pub fn max_byte_size<T: Cacheable>(limit: u64) -> Arc<dyn Fn(&T) -> bool + Send + Sync> {
  Arc::new(move |data: &T| data.byte_size() <= limit)
}

/// Accepts payloads whose byte size is at least `threshold`.
///
/// Used to keep only large payloads (e.g. full-size images) on the slow store.
pub fn min_byte_size<T: Cacheable>(threshold: u64) -> Arc<dyn Fn(&T) -> bool + Send + Sync> {
  Arc::new(move |data: &T| data.byte_size() >= threshold)
}
