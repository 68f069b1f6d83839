//! Read-Through Source
//!
//! Puts a cache in front of a slower backing source: misses and expired
//! entries are loaded from the source and written back to the cache.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tracing::debug;

use crate::cache::SharedCache;
use crate::error::{CacheError, Result};

// == Datasource Trait ==
/// Backing source consulted on cache misses.
pub trait Datasource<V>: Send + Sync {
    /// Loads the authoritative value for `key`, or None if it doesn't exist.
    fn load(&self, key: &str) -> Option<V>;
}

// == Read Through ==
/// Cache-first reader that falls back to a [`Datasource`].
pub struct ReadThrough<V, D> {
    cache: SharedCache<V>,
    source: D,
    refill_ttl: Duration,
    source_loads: AtomicU64,
}

impl<V, D> ReadThrough<V, D>
where
    V: Clone + Send + Sync + 'static,
    D: Datasource<V>,
{
    /// Values loaded from `source` are cached for `refill_ttl`.
    pub fn new(cache: SharedCache<V>, source: D, refill_ttl: Duration) -> Self {
        Self {
            cache,
            source,
            refill_ttl,
            source_loads: AtomicU64::new(0),
        }
    }

    /// Returns the cached value, loading and caching it on a miss.
    pub fn get(&self, key: &str) -> Result<V> {
        match self.cache.get(key) {
            Ok(value) => Ok(value),
            Err(err) if err.is_miss() => {
                debug!(key = %key, reason = %err, "cache miss, loading from source");
                self.source_loads.fetch_add(1, Ordering::Relaxed);
                let value = self
                    .source
                    .load(key)
                    .ok_or_else(|| CacheError::NotFound(key.to_string()))?;
                self.cache
                    .set_with_expiration(key, value.clone(), self.refill_ttl);
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }

    /// Writes `value` to the cache with the cache's default expiration.
    pub fn set(&self, key: &str, value: V) {
        self.cache.set(key, value);
    }

    /// Number of times the backing source has been consulted.
    pub fn source_loads(&self) -> u64 {
        self.source_loads.load(Ordering::Relaxed)
    }

    pub fn cache(&self) -> &SharedCache<V> {
        &self.cache
    }
}
