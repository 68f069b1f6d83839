//! Cache Module
//!
//! Provides in-memory caching with TTL expiration and LFU or LRU eviction.

mod entry;
mod lfu;
mod lru;
mod stats;
mod store;


use std::sync::Arc;
use std::time::Duration;

use crate::config::EvictionPolicy;
use crate::error::Result;

// Re-export public types
pub use entry::CacheEntry;
pub use lfu::LfuCache;
pub use lru::LruCache;
pub use stats::CacheStats;
pub use store::{CacheStore, RankFn};

// == Cache Trait ==
/// Operations shared by every eviction policy.
///
/// All methods take `&self`; implementations synchronize internally and may
/// be called from any number of threads at once.
pub trait Cache<V>: Send + Sync {
    /// Stores `value` under `key` with the configured default expiration.
    fn set(&self, key: &str, value: V);

    /// Stores `value` under `key`, expiring `ttl` from now.
    fn set_with_expiration(&self, key: &str, value: V, ttl: Duration);

    /// Returns a copy of the value stored under `key`.
    ///
    /// Fails with `NotFound` for unknown keys and with `Expired` when the
    /// entry's TTL has elapsed; the expired entry is dropped as a side effect.
    fn get(&self, key: &str) -> Result<V>;

    /// Removes `key`, returning whether it was present.
    fn remove(&self, key: &str) -> bool;

    /// Number of stored entries, including expired ones not yet purged.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn capacity(&self) -> usize;

    fn policy(&self) -> EvictionPolicy;

    fn stats(&self) -> CacheStats;

    /// Drops every expired entry now and returns how many were removed.
    fn purge_expired(&self) -> usize;
}

/// Thread-safe handle to a cache built by [`crate::CacheBuilder`].
pub type SharedCache<V> = Arc<dyn Cache<V>>;
