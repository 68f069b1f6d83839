//! Cache Statistics Module
//!
//! Tracks cache performance metrics including hits, misses, evictions and expirations.

use serde::Serialize;

// == Cache Stats ==
/// Snapshot of cache performance counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Number of successful cache retrievals
    pub hits: u64,
    /// Number of failed cache retrievals (key not found or expired)
    pub misses: u64,
    /// Number of live entries removed to make room for new keys
    pub evictions: u64,
    /// Number of expired entries purged (on read, eviction scan or explicit purge)
    pub expirations: u64,
    /// Current number of entries in the cache
    pub total_entries: usize,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no reads have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    pub fn record_expirations(&mut self, count: usize) {
        self.expirations += count as u64;
    }

    pub fn set_total_entries(&mut self, count: usize) {
        self.total_entries = count;
    }
}
