use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use crossbeam_utils::CachePadded;

/// A thread-safe, internal metrics collector for the cache.
/// All fields are atomic so they can be bumped outside the cache lock.
#[derive(Debug)]
pub(crate) struct Metrics {
  // --- Hit/Miss Ratios ---
  pub(crate) hits: CachePadded<AtomicU64>,
  pub(crate) misses: CachePadded<AtomicU64>,

  // --- Admission ---
  pub(crate) inserts: CachePadded<AtomicU64>,
  pub(crate) rejections: CachePadded<AtomicU64>,
  pub(crate) total_bytes_admitted: CachePadded<AtomicU64>,

  // --- Removal Stats ---
  pub(crate) evicted_by_capacity: CachePadded<AtomicU64>,
  pub(crate) removals: CachePadded<AtomicU64>,

  // --- Backing Store Traffic ---
  pub(crate) store_loads: CachePadded<AtomicU64>,
  pub(crate) store_saves: CachePadded<AtomicU64>,
  pub(crate) store_save_failures: CachePadded<AtomicU64>,
  pub(crate) store_deletes: CachePadded<AtomicU64>,

  created_at: Instant,
}

impl Default for Metrics {
  fn default() -> Self {
    Self {
      hits: CachePadded::new(AtomicU64::new(0)),
      misses: CachePadded::new(AtomicU64::new(0)),
      inserts: CachePadded::new(AtomicU64::new(0)),
      rejections: CachePadded::new(AtomicU64::new(0)),
      total_bytes_admitted: CachePadded::new(AtomicU64::new(0)),
      evicted_by_capacity: CachePadded::new(AtomicU64::new(0)),
      removals: CachePadded::new(AtomicU64::new(0)),
      store_loads: CachePadded::new(AtomicU64::new(0)),
      store_saves: CachePadded::new(AtomicU64::new(0)),
      store_save_failures: CachePadded::new(AtomicU64::new(0)),
      store_deletes: CachePadded::new(AtomicU64::new(0)),
      created_at: Instant::now(),
    }
  }
}

#[inline]
pub(crate) fn bump(counter: &AtomicU64) {
  counter.fetch_add(1, Ordering::Relaxed);
}

impl Metrics {
  pub(crate) fn new() -> Self {
    Self::default()
  }

  /// Creates a point-in-time snapshot of the current metrics.
  pub(crate) fn snapshot(&self, current_cache_size: u64, max_cache_size: u64) -> MetricsSnapshot {
    let hits = self.hits.load(Ordering::Relaxed);
    let misses = self.misses.load(Ordering::Relaxed);
    let total_lookups = hits + misses;

    MetricsSnapshot {
      hits,
      misses,
      hit_ratio: if total_lookups == 0 {
        0.0
      } else {
        hits as f64 / total_lookups as f64
      },
      inserts: self.inserts.load(Ordering::Relaxed),
      rejections: self.rejections.load(Ordering::Relaxed),
      total_bytes_admitted: self.total_bytes_admitted.load(Ordering::Relaxed),
      evicted_by_capacity: self.evicted_by_capacity.load(Ordering::Relaxed),
      removals: self.removals.load(Ordering::Relaxed),
      store_loads: self.store_loads.load(Ordering::Relaxed),
      store_saves: self.store_saves.load(Ordering::Relaxed),
      store_save_failures: self.store_save_failures.load(Ordering::Relaxed),
      store_deletes: self.store_deletes.load(Ordering::Relaxed),
      current_cache_size,
      max_cache_size,
      uptime_secs: self.created_at.elapsed().as_secs(),
    }
  }
}

/// A point-in-time, public-facing snapshot of the cache's metrics.
#[derive(Clone)]
pub struct MetricsSnapshot {
  /// Lookups served from the cache.
  pub hits: u64,
  /// Lookups that were not resident in the cache.
  pub misses: u64,
  /// The cache hit ratio (hits / (hits + misses)).
  pub hit_ratio: f64,
  /// Entries admitted into the cache.
  pub inserts: u64,
  /// Admission attempts refused by the caching rule or because the data was
  /// larger than the whole budget.
  pub rejections: u64,
  /// The cumulative byte size of all admitted entries.
  pub total_bytes_admitted: u64,
  /// Entries evicted by the eviction strategy.
  pub evicted_by_capacity: u64,
  /// Entries removed by `uncache_data`, `delete_data` or `clear_cache`.
  pub removals: u64,
  /// Misses that the backing store could answer.
  pub store_loads: u64,
  /// Saves accepted by the backing store.
  pub store_saves: u64,
  /// Saves refused by the backing store, or attempted without one.
  pub store_save_failures: u64,
  /// Deletes accepted by the backing store.
  pub store_deletes: u64,
  pub current_cache_size: u64,
  pub max_cache_size: u64,
  /// The number of seconds the cache has been running.
  pub uptime_secs: u64,
}

impl fmt::Debug for MetricsSnapshot {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("MetricsSnapshot")
      .field("hits", &self.hits)
      .field("misses", &self.misses)
      .field("hit_ratio", &format!("{:.2}%", self.hit_ratio * 100.0))
      .field("inserts", &self.inserts)
      .field("rejections", &self.rejections)
      .field("total_bytes_admitted", &self.total_bytes_admitted)
      .field("evicted_by_capacity", &self.evicted_by_capacity)
      .field("removals", &self.removals)
      .field("store_loads", &self.store_loads)
      .field("store_saves", &self.store_saves)
      .field("store_save_failures", &self.store_save_failures)
      .field("store_deletes", &self.store_deletes)
      .field("current_cache_size", &self.current_cache_size)
      .field("max_cache_size", &self.max_cache_size)
      .field("uptime_secs", &self.uptime_secs)
      .finish()
  }
}
