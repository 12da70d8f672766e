//! Startup configuration: which eviction strategy to run and with what budget.
//!
//! Loading the configuration is left to the host service. With the `serde`
//! feature, [`CacheConfig`] can be deserialized from any serde format.

use crate::cache::{DataCache, STD_MAX_CACHE_SIZE};
use crate::entry::Cacheable;
use crate::error::BuildError;
use crate::policy::{
  EvictionPolicy, FirstInFirstOut, LastInFirstOut, LeastFrequentlyUsed, LeastRecentlyUsed,
  MostRecentlyUsed, RandomReplacement,
};
use crate::rules::CachingRule;
use crate::storage::BackingStore;
use crate::CacheBuilder;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// The eviction strategy selected at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CachingMode {
  #[cfg_attr(feature = "serde", serde(rename = "FIFO"))]
  Fifo,
  #[cfg_attr(feature = "serde", serde(rename = "LIFO"))]
  Lifo,
  #[cfg_attr(feature = "serde", serde(rename = "RR"))]
  RandomReplacement,
  #[default]
  #[cfg_attr(feature = "serde", serde(rename = "LFU"))]
  Lfu,
  #[cfg_attr(feature = "serde", serde(rename = "LRU"))]
  Lru,
  #[cfg_attr(feature = "serde", serde(rename = "MRU"))]
  Mru,
  /// No cache; consumers talk to the backing store directly.
  #[cfg_attr(feature = "serde", serde(rename = "Disabled"))]
  Disabled,
}

impl CachingMode {
  pub const ALL: [CachingMode; 7] = [
    CachingMode::Fifo,
    CachingMode::Lifo,
    CachingMode::RandomReplacement,
    CachingMode::Lfu,
    CachingMode::Lru,
    CachingMode::Mru,
    CachingMode::Disabled,
  ];

  /// The string representation used in configuration.
  pub fn as_str(&self) -> &'static str {
    match self {
      CachingMode::Fifo => "FIFO",
      CachingMode::Lifo => "LIFO",
      CachingMode::RandomReplacement => "RR",
      CachingMode::Lfu => "LFU",
      CachingMode::Lru => "LRU",
      CachingMode::Mru => "MRU",
      CachingMode::Disabled => "Disabled",
    }
  }

  /// Parses the string representation, falling back to the default mode for
  /// unknown input.
  pub fn from_str_or_default(s: &str) -> Self {
    s.parse().unwrap_or_else(|_| {
      tracing::info!(mode = s, default = %CachingMode::default(), "unknown caching mode, using default");
      CachingMode::default()
    })
  }

  /// Creates the eviction policy for this mode, or `None` if caching is
  /// disabled. The seed only affects random replacement.
  pub fn policy(&self, seed: Option<u64>) -> Option<Box<dyn EvictionPolicy>> {
    let policy: Box<dyn EvictionPolicy> = match self {
      CachingMode::Fifo => Box::new(FirstInFirstOut::new()),
      CachingMode::Lifo => Box::new(LastInFirstOut::new()),
      CachingMode::RandomReplacement => Box::new(match seed {
        Some(seed) => RandomReplacement::with_seed(seed),
        None => RandomReplacement::new(),
      }),
      CachingMode::Lfu => Box::new(LeastFrequentlyUsed::new()),
      CachingMode::Lru => Box::new(LeastRecentlyUsed::new()),
      CachingMode::Mru => Box::new(MostRecentlyUsed::new()),
      CachingMode::Disabled => return None,
    };
    Some(policy)
  }
}

impl fmt::Display for CachingMode {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Returned by the strict [`FromStr`] implementation of [`CachingMode`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown caching mode: {0}")]
pub struct UnknownCachingMode(pub String);

impl FromStr for CachingMode {
  type Err = UnknownCachingMode;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    CachingMode::ALL
      .into_iter()
      .find(|mode| mode.as_str() == s)
      .ok_or_else(|| UnknownCachingMode(s.to_string()))
  }
}

/// A cache whose strategy was chosen at runtime.
pub type DynDataCache<T> = DataCache<T, Box<dyn EvictionPolicy>>;

/// Configuration of the cache in front of a backing store.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CacheConfig {
  pub caching_mode: CachingMode,
  /// Maximum cache size in bytes.
  pub max_cache_size: u64,
  /// Fixes the victim sequence of random replacement.
  pub seed: Option<u64>,
}

impl Default for CacheConfig {
  fn default() -> Self {
    Self {
      caching_mode: CachingMode::default(),
      max_cache_size: STD_MAX_CACHE_SIZE,
      seed: None,
    }
  }
}

impl CacheConfig {
  /// Builds the configured cache in front of `store`.
  ///
  /// Returns `Ok(None)` when caching is disabled.
  pub fn build_cache<T: Cacheable>(
    &self,
    store: Option<Arc<dyn BackingStore<T>>>,
    caching_rule: CachingRule<T>,
  ) -> Result<Option<DynDataCache<T>>, BuildError> {
    let Some(policy) = self.caching_mode.policy(self.seed) else {
      tracing::info!("caching disabled");
      return Ok(None);
    };

    let cache = CacheBuilder::new()
      .maybe_backing_store(store)
      .max_cache_size(self.max_cache_size)
      .shared_caching_rule(Some(caching_rule))
      .build(policy)?;
    tracing::info!(
      mode = %self.caching_mode,
      max_cache_size = self.max_cache_size,
      "cache configured"
    );
    Ok(Some(cache))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn string_representations_round_trip() {
    for mode in CachingMode::ALL {
      assert_eq!(mode.as_str().parse::<CachingMode>(), Ok(mode));
    }
  }

  #[test]
  fn unknown_mode_falls_back_to_lfu() {
    assert_eq!(CachingMode::from_str_or_default("bogus"), CachingMode::Lfu);
    assert_eq!(CachingMode::from_str_or_default("MRU"), CachingMode::Mru);
    assert!("lru".parse::<CachingMode>().is_err());
  }

  #[test]
  fn policies_match_modes() {
    for mode in CachingMode::ALL {
      match mode.policy(Some(1)) {
        Some(policy) => assert_eq!(policy.name(), mode.as_str()),
        None => assert_eq!(mode, CachingMode::Disabled),
      }
    }
  }

  #[cfg(feature = "serde")]
  #[test]
  fn config_deserializes_with_defaults() {
    let config: CacheConfig =
      serde_json::from_str(r#"{ "caching_mode": "LRU", "max_cache_size": 1024 }"#).unwrap();
    assert_eq!(config.caching_mode, CachingMode::Lru);
    assert_eq!(config.max_cache_size, 1024);
    assert_eq!(config.seed, None);

    let config: CacheConfig = serde_json::from_str("{}").unwrap();
    assert_eq!(config, CacheConfig::default());
  }
}
