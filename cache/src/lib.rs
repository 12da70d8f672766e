//! A byte-budgeted data cache with pluggable eviction strategies, designed to
//! sit in front of a slower backing store.
//!
//! # Features
//! - **Byte Accounting**: Every payload reports its byte size; the cache never
//!   holds more than its configured budget.
//! - **Pluggable Eviction**: FIFO, LIFO, LRU, MRU, LFU and seeded Random
//!   Replacement, all behind the [`EvictionPolicy`] trait.
//! - **Admission Rules**: A caching rule decides what may enter the cache; the
//!   backing store applies its own storage rule.
//! - **Thread Safety**: One read/write lock per cache; backing store calls are
//!   made outside of it.
//! - **Observability**: Metrics snapshots and an optional eviction listener.
//!
//! ```
//! use std::sync::Arc;
//! use fibre_datacache::{Cacheable, LruCache};
//!
//! struct Image { id: u64, bytes: Vec<u8> }
//!
//! impl Cacheable for Image {
//!   fn id(&self) -> u64 { self.id }
//!   fn byte_size(&self) -> u64 { self.bytes.len() as u64 }
//! }
//!
//! let cache = LruCache::<Image>::with_max_size(1024).unwrap();
//! cache.cache_data(Arc::new(Image { id: 1, bytes: vec![0; 512] }));
//! assert!(cache.data_is_in_cache(1));
//! assert_eq!(cache.free_space(), 512);
//! ```

// Public modules that form the API
pub mod builder;
pub mod config;
pub mod error;
pub mod listener;
pub mod metrics;
pub mod policy;
pub mod rules;
pub mod storage;

// Internal, crate-only modules
mod cache;
mod entry;

// Re-export the primary user-facing types for convenience
pub use builder::CacheBuilder;
pub use cache::{DataCache, STD_MAX_CACHE_SIZE};
pub use config::{CacheConfig, CachingMode, DynDataCache};
pub use entry::{CacheEntry, Cacheable};
pub use error::BuildError;
pub use listener::{EvictionListener, EvictionReason};
pub use metrics::MetricsSnapshot;
pub use policy::EvictionPolicy;
pub use rules::{CachingRule, StorageRule};
pub use storage::memory::MemoryStore;
pub use storage::BackingStore;

/// First-In, First-Out cache.
pub type FifoCache<T> = DataCache<T, policy::FirstInFirstOut>;
/// Last-In, First-Out cache.
pub type LifoCache<T> = DataCache<T, policy::LastInFirstOut>;
/// Least recently used cache.
pub type LruCache<T> = DataCache<T, policy::LeastRecentlyUsed>;
/// Most recently used cache.
pub type MruCache<T> = DataCache<T, policy::MostRecentlyUsed>;
/// Least frequently used cache.
pub type LfuCache<T> = DataCache<T, policy::LeastFrequentlyUsed>;
/// Random replacement cache.
pub type RandomReplacementCache<T> = DataCache<T, policy::RandomReplacement>;
