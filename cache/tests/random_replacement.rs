mod common;

use common::{data, fixtures, resident, DummyData};
use fibre_datacache::{rules, RandomReplacementCache};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Replays the victim selection of a seeded random replacement cache.
struct Model {
  slots: Vec<u64>,
  rng: StdRng,
}

impl Model {
  fn new(seed: u64, ids: &[u64]) -> Self {
    Self {
      slots: ids.to_vec(),
      rng: StdRng::seed_from_u64(seed),
    }
  }

  fn next_victim(&mut self) -> u64 {
    let slot = self.rng.random_range(0..self.slots.len());
    self.slots.swap_remove(slot)
  }
}

fn seeded(seed: u64, max: u64) -> RandomReplacementCache<DummyData> {
  RandomReplacementCache::with_seed(None, max, Some(rules::cache_all()), seed).unwrap()
}

#[test]
fn test_random_victims_follow_the_seed() {
  for seed in [0, 1, 7, 42, 1234, u64::MAX] {
    let cache = seeded(seed, 10);
    for id in 0..10 {
      cache.cache_data(data(id, 1));
    }

    let mut model = Model::new(seed, &(0..10).collect::<Vec<_>>());
    for id in 10..30 {
      let expected = model.next_victim();
      cache.cache_data(data(id, 1));
      model.slots.push(id);
      assert!(
        !cache.data_is_in_cache(expected),
        "seed {seed}: expected {expected} to be evicted"
      );
      assert_eq!(cache.len(), 10);
    }
  }
}

#[test]
fn test_random_same_seed_same_sequence() {
  let f = fixtures();
  let run = |seed| {
    let cache = seeded(seed, 6500);
    cache.cache_data(f.c0.clone());
    cache.cache_data(f.c1.clone());
    cache.cache_data(f.c2.clone());
    cache.cache_data(f.c3.clone());
    resident(&cache, &f)
  };

  for seed in 0..16 {
    assert_eq!(run(seed), run(seed));
    assert!(run(seed).contains(&3));
  }
}

#[test]
fn test_random_fixture_scenario_matches_model() {
  let f = fixtures();
  let seed = 5;
  let cache = seeded(seed, 6500);
  cache.cache_data(f.c0.clone());
  cache.cache_data(f.c1.clone());
  cache.cache_data(f.c2.clone());

  // Evict until 4000 bytes are free, mirroring the cache.
  let mut model = Model::new(seed, &[0, 1, 2]);
  let sizes = [1000u64, 2000, 3000];
  let mut free = 500u64;
  let mut evicted = Vec::new();
  while free < 4000 {
    let id = model.next_victim();
    free += sizes[id as usize];
    evicted.push(id);
  }

  cache.cache_data(f.c3.clone());
  for id in 0..3u64 {
    assert_eq!(cache.data_is_in_cache(id), !evicted.contains(&id), "id {id}");
  }
  assert!(cache.data_is_in_cache(3));
}

#[test]
fn test_random_uncache_keeps_model_in_step() {
  let seed = 99;
  let cache = seeded(seed, 5);
  for id in 0..5 {
    cache.cache_data(data(id, 1));
  }

  // Removing id 1 moves the last slot (id 4) into its place.
  cache.uncache_data(&data(1, 1));
  let mut model = Model::new(seed, &[0, 4, 2, 3]);

  cache.cache_data(data(5, 1));
  model.slots.push(5);
  cache.cache_data(data(6, 1));
  let expected = model.next_victim();
  assert!(!cache.data_is_in_cache(expected));
  assert_eq!(cache.len(), 5);
}

#[test]
fn test_random_reseed_restarts_sequence() {
  let cache = seeded(1, 3);
  for id in 0..3 {
    cache.cache_data(data(id, 1));
  }

  cache.set_seed(77);
  let mut model = Model::new(77, &[0, 1, 2]);
  let expected = model.next_victim();
  cache.cache_data(data(3, 1));
  assert!(!cache.data_is_in_cache(expected));
}
