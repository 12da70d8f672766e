use std::fmt;
use std::sync::Arc;

/// A payload that can be placed in a [`DataCache`](crate::DataCache).
///
/// The identifier must stay stable for the lifetime of the payload and is the
/// only thing used to decide whether two payloads are the same. The byte size
/// is what the cache charges against its budget.
pub trait Cacheable: Send + Sync + 'static {
  /// Stable unique identifier of the payload.
  fn id(&self) -> u64;

  /// Number of bytes this payload occupies in the cache.
  fn byte_size(&self) -> u64;
}

/// A resident value together with the usage metadata the cache keeps for it.
///
/// The entry shares ownership of the payload through an `Arc`, so handing the
/// data back to a caller never copies it.
pub struct CacheEntry<T> {
  data: Arc<T>,
  id: u64,
  byte_size: u64,
  use_count: u64,
}

impl<T: Cacheable> CacheEntry<T> {
  /// Wraps the payload, capturing its id and size at admission time.
  pub(crate) fn new(data: Arc<T>) -> Self {
    let id = data.id();
    let byte_size = data.byte_size();
    Self {
      data,
      id,
      byte_size,
      use_count: 0,
    }
  }
}

impl<T> CacheEntry<T> {
  /// Returns a clone of the `Arc` containing the payload.
  #[inline]
  pub fn data(&self) -> Arc<T> {
    self.data.clone()
  }

  #[inline]
  pub fn id(&self) -> u64 {
    self.id
  }

  #[inline]
  pub fn byte_size(&self) -> u64 {
    self.byte_size
  }

  /// How often this entry was served from the cache.
  #[inline]
  pub fn use_count(&self) -> u64 {
    self.use_count
  }

  /// Records one access to this entry.
  #[inline]
  pub fn was_used(&mut self) {
    self.use_count = self.use_count.saturating_add(1);
  }
}

impl<T> fmt::Debug for CacheEntry<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("CacheEntry")
      .field("id", &self.id)
      .field("byte_size", &self.byte_size)
      .field("use_count", &self.use_count)
      .finish_non_exhaustive()
  }
}
