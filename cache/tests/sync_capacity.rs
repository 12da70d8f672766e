mod common;

use common::{data, fixtures, resident};
use fibre_datacache::{FifoCache, LfuCache, LruCache};

#[test]
fn test_sync_shrinking_evicts_in_policy_order() {
  let f = fixtures();
  let cache = LruCache::with_max_size(10_000).unwrap();
  cache.cache_data(f.c0.clone());
  cache.cache_data(f.c1.clone());
  cache.cache_data(f.c2.clone());
  cache.load_data(0);

  // 6000 bytes resident; shrinking to 4000 drops c1 (LRU), then fits.
  assert!(cache.set_max_cache_size(4000));
  assert_eq!(cache.max_cache_size(), 4000);
  assert_eq!(resident(&cache, &f), vec![0, 2]);
  assert_eq!(cache.current_cache_size(), 4000);
  assert_eq!(cache.free_space(), 0);
  assert_eq!(cache.metrics().evicted_by_capacity, 1);
}

#[test]
fn test_sync_shrinking_counts_every_eviction() {
  let cache = FifoCache::with_max_size(10).unwrap();
  for id in 0..5 {
    cache.cache_data(data(id, 2));
  }

  assert!(cache.set_max_cache_size(2));
  assert_eq!(cache.snapshot_ids(), vec![4]);
  assert_eq!(cache.metrics().evicted_by_capacity, 4);
  assert_eq!(cache.metrics().removals, 0);
}

#[test]
fn test_sync_zero_size_is_rejected() {
  let cache = FifoCache::with_max_size(100).unwrap();
  cache.cache_data(data(1, 60));

  assert!(!cache.set_max_cache_size(0));
  assert_eq!(cache.max_cache_size(), 100);
  assert!(cache.data_is_in_cache(1));
}

#[test]
fn test_sync_growing_keeps_everything() {
  let cache = FifoCache::with_max_size(100).unwrap();
  cache.cache_data(data(1, 60));
  cache.cache_data(data(2, 40));

  assert!(cache.set_max_cache_size(1000));
  assert_eq!(cache.len(), 2);
  assert_eq!(cache.free_space(), 900);

  cache.cache_data(data(3, 900));
  assert_eq!(cache.len(), 3);
}

#[test]
fn test_sync_shrinking_below_every_entry_empties_cache() {
  let cache = LfuCache::with_max_size(100).unwrap();
  cache.cache_data(data(1, 30));
  cache.cache_data(data(2, 30));

  assert!(cache.set_max_cache_size(20));
  assert!(cache.is_empty());
  assert_eq!(cache.current_cache_size(), 0);
  assert_eq!(cache.metrics().max_cache_size, 20);

  // Data larger than the new budget is refused.
  cache.cache_data(data(3, 30));
  assert!(cache.is_empty());
}
