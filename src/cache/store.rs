//! Cache Store Module
//!
//! Entry table shared by every eviction policy: HashMap storage, capacity
//! enforcement, lazy TTL expiration and the expired-first eviction scan.
//! The store itself is not synchronized; policy caches wrap it in a lock.

use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::time::{Duration, Instant};

use tracing::{debug, trace};

use crate::cache::{CacheEntry, CacheStats};
use crate::error::{CacheError, Result};

/// Ranking key used to pick an eviction victim; the smallest rank loses.
pub type RankFn<V> = fn(&CacheEntry<V>) -> (u64, u64);

// == Cache Store ==
/// Main cache storage with pluggable victim ranking and TTL support.
pub struct CacheStore<V> {
    /// Key-value storage
    entries: HashMap<String, CacheEntry<V>>,
    /// Performance statistics
    stats: CacheStats,
    /// Maximum number of entries allowed
    capacity: usize,
    /// TTL for entries set without an explicit one, None = never expires
    default_ttl: Option<Duration>,
    /// Logical clock for insertion order and recency
    clock: u64,
    /// Policy-specific victim ranking
    rank: RankFn<V>,
}

impl<V: Clone> CacheStore<V> {
    // == Constructor ==
    /// Creates a new CacheStore.
    ///
    /// # Arguments
    /// * `capacity` - Maximum number of entries the cache can hold
    /// * `default_ttl` - TTL for entries set without an explicit one
    /// * `rank` - Ranking key for eviction victims
    pub fn new(capacity: NonZeroUsize, default_ttl: Option<Duration>, rank: RankFn<V>) -> Self {
        Self {
            entries: HashMap::with_capacity(capacity.get().min(1024)),
            stats: CacheStats::new(),
            capacity: capacity.get(),
            default_ttl,
            clock: 0,
            rank,
        }
    }

    fn tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }

    // == Set ==
    /// Stores a key-value pair with the default TTL.
    pub fn set(&mut self, key: String, value: V) {
        let ttl = self.default_ttl;
        self.set_with_ttl(key, value, ttl);
    }

    // == Set With TTL ==
    /// Stores a key-value pair that expires after `ttl` (None = never).
    ///
    /// An existing key is overwritten in place and never triggers eviction.
    /// A new key at capacity evicts exactly one entry first. Either way the
    /// deadline is reset and the set counts as one use.
    pub fn set_with_ttl(&mut self, key: String, value: V, ttl: Option<Duration>) {
        let now = Instant::now();
        let tick = self.tick();

        if let Some(entry) = self.entries.get_mut(&key) {
            entry.value = value;
            entry.refresh(now, ttl, tick);
            trace!(key = %key, usage = entry.usage_count, "overwrote entry");
            return;
        }

        if self.entries.len() >= self.capacity {
            self.evict_one(now);
        }

        let mut entry = CacheEntry::new(value, tick);
        entry.refresh(now, ttl, tick);
        trace!(key = %key, "inserted entry");
        self.entries.insert(key, entry);
        self.stats.set_total_entries(self.entries.len());
    }

    // == Get ==
    /// Retrieves a clone of the value stored under `key`.
    ///
    /// Expired entries are removed and reported as `Expired`; a successful
    /// read counts as one use.
    pub fn get(&mut self, key: &str) -> Result<V> {
        let now = Instant::now();
        let tick = self.tick();

        let Some(entry) = self.entries.get_mut(key) else {
            self.stats.record_miss();
            return Err(CacheError::NotFound(key.to_string()));
        };

        if entry.is_expired_at(now) {
            self.entries.remove(key);
            self.stats.record_miss();
            self.stats.record_expirations(1);
            self.stats.set_total_entries(self.entries.len());
            trace!(key = %key, "purged expired entry on read");
            return Err(CacheError::Expired(key.to_string()));
        }

        entry.touch(tick);
        self.stats.record_hit();
        Ok(entry.value.clone())
    }

    // == Remove ==
    /// Removes an entry by key. Returns true if it was present.
    pub fn remove(&mut self, key: &str) -> bool {
        let removed = self.entries.remove(key).is_some();
        if removed {
            self.stats.set_total_entries(self.entries.len());
        }
        removed
    }

    // == Evict One ==
    /// Frees one slot. The first expired entry met during the scan is taken;
    /// otherwise the entry with the smallest rank is evicted.
    fn evict_one(&mut self, now: Instant) {
        let mut expired: Option<String> = None;
        let mut victim: Option<(&String, (u64, u64))> = None;

        for (key, entry) in &self.entries {
            if entry.is_expired_at(now) {
                expired = Some(key.clone());
                break;
            }
            let rank = (self.rank)(entry);
            if victim.map_or(true, |(_, best)| rank < best) {
                victim = Some((key, rank));
            }
        }

        if let Some(key) = expired {
            self.entries.remove(&key);
            self.stats.record_expirations(1);
            debug!(key = %key, "reclaimed expired entry for new key");
            return;
        }

        let victim = victim.map(|(key, rank)| (key.clone(), rank));
        if let Some((key, rank)) = victim {
            self.entries.remove(&key);
            self.stats.record_eviction();
            debug!(key = %key, rank = ?rank, "evicted entry");
        }
    }

    // == Purge Expired ==
    /// Removes all expired entries from the cache.
    ///
    /// Returns the number of entries removed.
    pub fn purge_expired(&mut self) -> usize {
        let now = Instant::now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired_at(now));
        let count = before - self.entries.len();

        if count > 0 {
            self.stats.record_expirations(count);
            self.stats.set_total_entries(self.entries.len());
            debug!(count, "purged expired entries");
        }
        count
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    /// Returns the stored entry for `key` without counting a use.
    pub fn entry(&self, key: &str) -> Option<&CacheEntry<V>> {
        self.entries.get(key)
    }

    /// Iterates over stored entries in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &CacheEntry<V>)> {
        self.entries.iter()
    }

    /// Returns the current number of entries, expired ones not yet purged included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
