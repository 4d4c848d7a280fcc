//! Cache Statistics Module
//!
//! Tracks reads, background refreshes and upstream fetch outcomes.

use serde::Serialize;

// == Cache Stats ==
/// Tracks cache activity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Reads that found an entry
    pub hits: u64,
    /// Reads for gateways without an entry
    pub misses: u64,
    /// Background refreshes scheduled by reads of expired entries
    pub refreshes: u64,
    /// Upstream lookups that returned a record
    pub fetch_successes: u64,
    /// Upstream lookups that failed
    pub fetch_failures: u64,
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
    /// Returns hits / (hits + misses), or 0.0 if nothing was read.
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

    pub fn record_refresh(&mut self) {
        self.refreshes += 1;
    }

    /// Counts a completed upstream lookup.
    pub fn record_fetch(&mut self, success: bool) {
        if success {
            self.fetch_successes += 1;
        } else {
            self.fetch_failures += 1;
        }
    }

    pub fn set_total_entries(&mut self, count: usize) {
        self.total_entries = count;
    }
}
