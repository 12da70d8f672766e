use thiserror::Error;

/// Errors that can occur when building a cache.
///
/// Every variant is a contract violation by the caller. No cache instance is
/// produced when one of them is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
  /// The cache was configured with a maximum size of zero bytes.
  #[error("the maximum cache size must be positive")]
  ZeroCapacity,
  /// No caching rule was supplied.
  #[error("the provided caching rule is missing")]
  MissingCachingRule,
  /// No collection of initial entries was supplied.
  #[error("the provided initial entry collection is missing")]
  MissingEntries,
}

impl BuildError {
  /// All build errors are invalid-argument errors.
  pub fn is_invalid_argument(&self) -> bool {
    true
  }
}
