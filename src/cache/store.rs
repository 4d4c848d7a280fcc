//! Cache Store Module
//!
//! Gateway-keyed storage of fetch outcomes with read-time staleness checks.
//! Every method is synchronous and free of I/O; callers serialize access
//! through a single mutex.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::cache::{CacheEntry, CacheStats};
use crate::error::LookupError;
use crate::models::GatewayRecord;

// == Cached Info ==
/// Result of a store read.
#[derive(Debug, Clone, Default)]
pub struct CachedInfo {
    /// Cached record, empty when the gateway is unknown or never fetched successfully
    pub record: GatewayRecord,
    /// Error of the most recent fetch attempt
    pub error: Option<LookupError>,
    /// Set when the entry was expired; the caller owns scheduling the refresh
    pub needs_refresh: bool,
}

// == Entry Store ==
/// Maps gateway identifiers to their latest fetch outcome.
#[derive(Debug, Default)]
pub struct EntryStore {
    entries: HashMap<String, CacheEntry>,
    stats: CacheStats,
    /// Age after which a read triggers a refresh, `None` disables refreshing
    expiry: Option<Duration>,
}

impl EntryStore {
    // == Constructor ==
    /// Creates an empty store. A zero expiry is treated as disabled.
    pub fn new(expiry: Option<Duration>) -> Self {
        Self {
            entries: HashMap::new(),
            stats: CacheStats::new(),
            expiry: expiry.filter(|d| !d.is_zero()),
        }
    }

    pub fn expiry(&self) -> Option<Duration> {
        self.expiry
    }

    /// Changes the expiry applied to every entry, existing ones included.
    pub fn set_expiry(&mut self, expiry: Option<Duration>) {
        self.expiry = expiry.filter(|d| !d.is_zero());
    }

    // == Set Success ==
    /// Replaces the entry for `gateway_id` with a freshly fetched record.
    pub fn set_success(&mut self, gateway_id: &str, record: GatewayRecord, now: Instant) {
        self.entries
            .insert(gateway_id.to_string(), CacheEntry::fetched(record, now));
        self.stats.record_fetch(true);
        self.stats.set_total_entries(self.entries.len());
    }

    // == Set Failure ==
    /// Records a failed fetch.
    ///
    /// An existing entry keeps its last good record and only has its error and
    /// timestamp replaced. A new entry is created with an empty record.
    pub fn set_failure(&mut self, gateway_id: &str, error: LookupError, now: Instant) {
        match self.entries.get_mut(gateway_id) {
            Some(entry) => entry.record_failure(error, now),
            None => {
                self.entries
                    .insert(gateway_id.to_string(), CacheEntry::failed(error, now));
            }
        }
        self.stats.record_fetch(false);
        self.stats.set_total_entries(self.entries.len());
    }

    // == Get ==
    /// Reads the cached outcome for `gateway_id`.
    ///
    /// Unknown gateways yield an empty record and no error. An expired entry
    /// has its timestamp bumped to `now` so concurrent readers do not request
    /// a second refresh, and the stale value is returned with `needs_refresh`.
    pub fn get(&mut self, gateway_id: &str, now: Instant) -> CachedInfo {
        let Some(entry) = self.entries.get_mut(gateway_id) else {
            self.stats.record_miss();
            return CachedInfo::default();
        };
        self.stats.record_hit();

        let needs_refresh = match self.expiry {
            Some(expiry) if entry.is_expired(expiry, now) => {
                entry.last_updated = now;
                self.stats.record_refresh();
                true
            }
            _ => false,
        };

        CachedInfo {
            record: entry.record.clone(),
            error: entry.error.clone(),
            needs_refresh,
        }
    }

    // == Remove ==
    /// Drops the entry for `gateway_id`. Returns whether one existed.
    pub fn remove(&mut self, gateway_id: &str) -> bool {
        let removed = self.entries.remove(gateway_id).is_some();
        self.stats.set_total_entries(self.entries.len());
        removed
    }

    pub fn contains(&self, gateway_id: &str) -> bool {
        self.entries.contains_key(gateway_id)
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
