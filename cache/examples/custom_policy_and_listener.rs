use fibre_datacache::{
  policy::{AccessInfo, EvictionPolicy},
  CacheBuilder, Cacheable, EvictionListener, EvictionReason,
};
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

struct Document {
  id: u64,
  size: u64,
}

impl Cacheable for Document {
  fn id(&self) -> u64 {
    self.id
  }

  fn byte_size(&self) -> u64 {
    self.size
  }
}

/// Evicts the largest resident document first.
#[derive(Default)]
struct LargestFirst {
  by_size: BTreeSet<(u64, u64)>,
  sizes: HashMap<u64, u64>,
}

impl EvictionPolicy for LargestFirst {
  fn on_insert(&mut self, info: &AccessInfo) {
    self.by_size.insert((info.byte_size, info.id));
    self.sizes.insert(info.id, info.byte_size);
  }

  fn on_access(&mut self, _info: &AccessInfo) {}

  fn on_remove(&mut self, id: u64) {
    if let Some(size) = self.sizes.remove(&id) {
      self.by_size.remove(&(size, id));
    }
  }

  fn select_victim(&mut self) -> Option<u64> {
    let (_, id) = self.by_size.pop_last()?;
    self.sizes.remove(&id);
    Some(id)
  }

  fn clear(&mut self) {
    self.by_size.clear();
    self.sizes.clear();
  }

  fn eviction_order(&self) -> Vec<u64> {
    self.by_size.iter().rev().map(|&(_, id)| id).collect()
  }

  fn name(&self) -> &'static str {
    "LargestFirst"
  }
}

// A simple listener that just prints evicted entries.
struct MyListener;

impl EvictionListener<Document> for MyListener {
  fn on_evict(&self, data: Arc<Document>, reason: EvictionReason) {
    println!(
      "[Listener] Document evicted! Id: {}, Size: {}, Reason: {}",
      data.id, data.size, reason
    );
  }
}

fn main() {
  println!("--- Cache with Custom Policy (LargestFirst) and Eviction Listener ---");

  let cache = CacheBuilder::new()
    .max_cache_size(100)
    .eviction_listener(MyListener)
    .build(LargestFirst::default())
    .expect("Failed to build cache");

  cache.cache_data(Arc::new(Document { id: 1, size: 20 }));
  cache.cache_data(Arc::new(Document { id: 2, size: 50 }));
  cache.cache_data(Arc::new(Document { id: 3, size: 30 }));
  println!("\nCached documents 1, 2, 3. Cache is full.");
  println!("Current size: {}", cache.current_cache_size());

  // Needs 10 bytes: document 2 is the largest and goes first.
  println!("\nCaching document 4. This will trigger an eviction.");
  cache.cache_data(Arc::new(Document { id: 4, size: 10 }));

  println!("\n--- Final State ---");
  assert!(cache.data_is_in_cache(1));
  assert!(!cache.data_is_in_cache(2), "Document 2 should have been evicted");
  assert!(cache.data_is_in_cache(3));
  assert!(cache.data_is_in_cache(4));

  println!("Final size: {}", cache.current_cache_size());
  println!("\nCache metrics: {:#?}", cache.metrics());
}
