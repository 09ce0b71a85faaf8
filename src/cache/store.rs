//! Cache Store Module
//!
//! Response cache combining HashMap storage with TTL expiration.

use std::collections::HashMap;
use std::time::Duration;

use chrono::Utc;

use crate::cache::{CacheEntry, CacheStats};

// == Cache Store ==
/// Response body storage keyed by request key.
///
/// A store with no TTL is disabled: lookups always miss and inserts are
/// ignored, but existing entries are kept until cleared or swept.
#[derive(Debug, Default)]
pub struct CacheStore {
    /// Key-value storage
    entries: HashMap<String, CacheEntry>,
    /// Performance statistics
    stats: CacheStats,
    /// Lifetime of new entries, `None` when caching is disabled
    ttl: Option<Duration>,
}

impl CacheStore {
    // == Constructor ==
    /// Creates a new CacheStore with the given TTL (`None` = disabled).
    pub fn new(ttl: Option<Duration>) -> Self {
        Self {
            entries: HashMap::new(),
            stats: CacheStats::new(),
            ttl,
        }
    }

    // == TTL ==
    /// Returns the current TTL, `None` when caching is disabled.
    pub fn ttl(&self) -> Option<Duration> {
        self.ttl
    }

    /// Replaces the TTL. Existing entries keep their original expiry.
    pub fn set_ttl(&mut self, ttl: Option<Duration>) {
        self.ttl = ttl;
    }

    pub fn is_enabled(&self) -> bool {
        self.ttl.is_some()
    }

    // == Get ==
    /// Returns the raw body stored under `key` if caching is enabled and the
    /// entry has not expired.
    ///
    /// An expired entry found here is removed and counted as a miss.
    pub fn get(&mut self, key: &str) -> Option<String> {
        if !self.is_enabled() {
            return None;
        }

        let now = Utc::now();
        match self.entries.get(key) {
            Some(entry) if !entry.is_expired_at(now) => {
                let body = entry.raw_body.clone();
                self.stats.record_hit();
                Some(body)
            }
            Some(_) => {
                self.entries.remove(key);
                self.stats.set_total_entries(self.entries.len());
                self.stats.record_miss();
                None
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    // == Insert ==
    /// Stores `raw_body` under `key`, replacing any previous entry.
    ///
    /// Does nothing while caching is disabled. Returns whether the body was stored.
    pub fn insert(&mut self, key: String, raw_body: String) -> bool {
        let Some(ttl) = self.ttl else {
            return false;
        };

        self.entries.insert(key, CacheEntry::new(raw_body, ttl));
        self.stats.record_store();
        self.stats.set_total_entries(self.entries.len());
        true
    }

    // == Cleanup Expired ==
    /// Removes all expired entries from the cache.
    ///
    /// Returns the number of entries removed.
    pub fn cleanup_expired(&mut self) -> usize {
        let now = Utc::now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired_at(now));

        let removed = before - self.entries.len();
        self.stats.record_sweep(removed);
        self.stats.set_total_entries(self.entries.len());
        removed
    }

    // == Clear ==
    /// Removes every entry, leaving the TTL and statistics untouched.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.stats.set_total_entries(0);
    }

    /// Zeroes all statistics counters.
    pub fn reset_stats(&mut self) {
        self.stats = CacheStats::new();
        self.stats.set_total_entries(self.entries.len());
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    /// Returns true if an entry, expired or not, is stored under `key`.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[cfg(test)]
    pub(crate) fn entry_mut(&mut self, key: &str) -> Option<&mut CacheEntry> {
        self.entries.get_mut(key)
    }
}
