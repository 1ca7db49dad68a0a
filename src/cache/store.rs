//! Cache Store Module
//!
//! Main cache engine combining HashMap storage with FIFO tracking and TTL expiration.

use std::collections::HashMap;
use std::time::Duration;

use serde_json::Value;
use tracing::debug;

use crate::cache::entry::current_timestamp_ms;
use crate::cache::stats::Counters;
use crate::cache::{CacheEntry, CacheStats, InsertionOrder};

// == Cache Store ==
/// Bounded cache with FIFO eviction and lazy TTL expiry.
///
/// Every operation is infallible. Expired entries are only removed when a
/// lookup touches them, by [`cleanup_expired`](Self::cleanup_expired), or
/// by eviction.
#[derive(Debug)]
pub struct CacheStore<V = Value> {
    /// Key-value storage
    entries: HashMap<String, CacheEntry<V>>,
    /// Insertion order used for eviction
    order: InsertionOrder,
    /// Hit/miss/eviction counters
    counters: Counters,
    /// Maximum number of entries allowed
    max_entries: usize,
    /// TTL applied when `set` is called without one
    default_ttl: Duration,
}

impl<V: Clone> CacheStore<V> {
    // == Constructor ==
    /// Creates a new CacheStore with specified capacity and default TTL.
    pub fn new(max_entries: usize, default_ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            order: InsertionOrder::new(),
            counters: Counters::default(),
            max_entries,
            default_ttl,
        }
    }

    // == Set ==
    /// Stores a value under `key`, expiring after `ttl` (or the default TTL).
    ///
    /// Overwriting an existing key replaces value and expiry and makes the key
    /// the newest for eviction purposes. Inserting a new key into a full cache
    /// evicts the oldest inserted key first.
    pub fn set(&mut self, key: impl Into<String>, value: V, ttl: Option<Duration>) {
        let key = key.into();

        if self.max_entries == 0 {
            debug!(key = %key, "cache has zero capacity, dropping value");
            return;
        }

        if !self.entries.contains_key(&key) && self.entries.len() >= self.max_entries {
            self.evict_oldest();
        }

        let entry = CacheEntry::new(value, ttl.unwrap_or(self.default_ttl));
        self.order.push(&key);
        self.entries.insert(key, entry);
    }

    // == Get ==
    /// Retrieves a live value by key.
    ///
    /// Returns `None` for absent or expired keys (both counted as misses);
    /// expired entries are removed on the way out.
    pub fn get(&mut self, key: &str) -> Option<V> {
        let now = current_timestamp_ms();
        let expired_age_ms = match self.entries.get(key) {
            None => {
                self.counters.record_miss();
                return None;
            }
            Some(entry) if entry.is_expired_at(now) => Some(now.saturating_sub(entry.created_at)),
            Some(_) => None,
        };

        if let Some(age_ms) = expired_age_ms {
            self.remove_entry(key);
            self.counters.record_miss();
            debug!(key, age_ms, "cache entry expired on read");
            return None;
        }

        self.counters.record_hit();
        self.entries.get(key).map(|entry| entry.value.clone())
    }

    // == Get Or Insert ==
    /// Returns the cached value for `key`, computing and storing it with `f`
    /// on a miss.
    pub fn get_or_insert_with<F>(&mut self, key: &str, ttl: Option<Duration>, f: F) -> V
    where
        F: FnOnce() -> V,
    {
        if let Some(value) = self.get(key) {
            return value;
        }

        let value = f();
        self.set(key, value.clone(), ttl);
        value
    }

    // == Delete ==
    /// Removes an entry by key. Returns whether it existed.
    pub fn delete(&mut self, key: &str) -> bool {
        self.remove_entry(key)
    }

    // == Clear ==
    /// Removes every entry and resets all counters.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
        self.counters.reset();
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        CacheStats::snapshot(self.counters, self.entries.len(), self.max_entries)
    }

    // == Cleanup Expired ==
    /// Removes all expired entries from the cache.
    ///
    /// Returns the number of entries removed.
    pub fn cleanup_expired(&mut self) -> usize {
        let now = current_timestamp_ms();
        let expired_keys: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired_at(now))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired_keys {
            self.remove_entry(key);
        }

        expired_keys.len()
    }

    /// Milliseconds until `key` expires, or `None` if it is absent or already
    /// expired. Does not touch counters.
    pub fn ttl_remaining_ms(&self, key: &str) -> Option<u64> {
        self.entries
            .get(key)
            .filter(|entry| !entry.is_expired())
            .map(CacheEntry::ttl_remaining_ms)
    }

    /// True if `key` is stored, expired or not. Does not touch counters.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    // == Length ==
    /// Returns the current number of entries in the cache.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    /// Returns true if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    fn evict_oldest(&mut self) {
        if let Some(evicted) = self.order.pop_oldest() {
            self.entries.remove(&evicted);
            self.counters.record_eviction();
            debug!(key = %evicted, "evicted oldest cache entry");
        }
    }

    fn remove_entry(&mut self, key: &str) -> bool {
        if self.entries.remove(key).is_some() {
            self.order.remove(key);
            true
        } else {
            false
        }
    }
}
