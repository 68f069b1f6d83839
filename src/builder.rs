//! Cache Builder
//!
//! Fluent construction of a ready-to-use cache. The builder only collects
//! [`CacheOptions`]; validation happens once, when `build` is called.

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::cache::{LfuCache, LruCache, SharedCache};
use crate::config::{CacheOptions, EvictionPolicy};
use crate::error::Result;

// == Cache Builder ==
/// Collects cache options and builds the matching policy implementation.
///
/// # Example
/// ```
/// use std::time::Duration;
/// use mini_cache::CacheBuilder;
///
/// let cache = CacheBuilder::new(100)
///     .recency()
///     .default_expiration(Duration::from_secs(30))
///     .build::<String>()
///     .unwrap();
///
/// cache.set("user:1", "Dima".to_string());
/// assert_eq!(cache.get("user:1").unwrap(), "Dima");
/// ```
#[derive(Debug, Clone)]
pub struct CacheBuilder {
    options: CacheOptions,
}

impl CacheBuilder {
    /// Starts a frequency cache of `capacity` entries that never expire.
    pub fn new(capacity: usize) -> Self {
        Self::from_options(CacheOptions::new(capacity))
    }

    pub fn from_options(options: CacheOptions) -> Self {
        Self { options }
    }

    pub fn policy(mut self, policy: EvictionPolicy) -> Self {
        self.options.policy = policy;
        self
    }

    pub fn frequency(self) -> Self {
        self.policy(EvictionPolicy::Frequency)
    }

    pub fn recency(self) -> Self {
        self.policy(EvictionPolicy::Recency)
    }

    /// Expiration applied by `set` calls that don't pass their own TTL.
    pub fn default_expiration(mut self, ttl: Duration) -> Self {
        self.options.default_expiration = Some(ttl);
        self
    }

    pub fn options(&self) -> &CacheOptions {
        &self.options
    }

    /// Validates the collected options and builds the cache.
    pub fn build<V>(self) -> Result<SharedCache<V>>
    where
        V: Clone + Send + Sync + 'static,
    {
        build(&self.options)
    }
}

// == Build ==
/// Builds the cache described by `options`.
///
/// Fails with [`crate::CacheError::Configuration`] when the options are invalid.
pub fn build<V>(options: &CacheOptions) -> Result<SharedCache<V>>
where
    V: Clone + Send + Sync + 'static,
{
    let capacity = options.validate()?;

    let cache: SharedCache<V> = match options.policy {
        EvictionPolicy::Frequency => Arc::new(LfuCache::new(capacity, options.default_expiration)),
        EvictionPolicy::Recency => Arc::new(LruCache::new(capacity, options.default_expiration)),
    };

    info!(
        capacity = options.capacity,
        policy = %options.policy,
        default_expiration = ?options.default_expiration,
        "cache built"
    );
    Ok(cache)
}
