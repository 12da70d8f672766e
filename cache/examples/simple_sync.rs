use fibre_datacache::{rules, BackingStore, Cacheable, LfuCache, MemoryStore};
use std::sync::Arc;

#[derive(Debug)]
struct Image {
  id: u64,
  bytes: Vec<u8>,
}

impl Cacheable for Image {
  fn id(&self) -> u64 {
    self.id
  }

  fn byte_size(&self) -> u64 {
    self.bytes.len() as u64
  }
}

fn main() {
  // A 4 KiB LFU cache in front of an in-memory store. Images above 2 KiB are
  // only kept in the store.
  let store: Arc<dyn BackingStore<Image>> = Arc::new(MemoryStore::new());
  let cache = LfuCache::with_store(Some(store), 4096, Some(rules::max_byte_size(2048)))
    .expect("Failed to build cache");

  for (id, size) in [(1, 1024), (2, 1024), (3, 3000), (4, 2048)] {
    let saved = cache.save_data(Arc::new(Image {
      id,
      bytes: vec![0; size],
    }));
    println!(
      "Saved image {id} ({size} bytes): {saved}, cached: {}",
      cache.data_is_in_cache(id)
    );
  }

  // Image 1 becomes the most frequently used.
  cache.load_data(1);
  cache.load_data(1);

  // Image 3 is served by the store and does not enter the cache.
  match cache.load_data(3) {
    Some(image) => println!("\nLoaded image {} from the store", image.id),
    None => println!("\nImage 3 not found."),
  }

  println!("Eviction order: {:?}", cache.snapshot_ids());
  println!("Free space: {} bytes", cache.free_space());
  println!("\nCache metrics: {:#?}", cache.metrics());
}
