//! Cache Entry Module
//!
//! Defines the per-gateway cache entry and its staleness check.

use std::time::{Duration, Instant};

use crate::error::LookupError;
use crate::models::GatewayRecord;

// == Cache Entry ==
/// Outcome of the latest fetch attempt for one gateway.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// Time of the most recent fetch attempt, bumped when a refresh is scheduled
    pub last_updated: Instant,
    /// Last known-good record, empty if no fetch has succeeded yet
    pub record: GatewayRecord,
    /// Error of the most recent fetch, `None` after a success
    pub error: Option<LookupError>,
}

impl CacheEntry {
    // == Constructors ==
    /// Creates an entry from a successful fetch.
    pub fn fetched(record: GatewayRecord, now: Instant) -> Self {
        Self {
            last_updated: now,
            record,
            error: None,
        }
    }

    /// Creates an entry for a gateway whose first fetch failed.
    pub fn failed(error: LookupError, now: Instant) -> Self {
        Self {
            last_updated: now,
            record: GatewayRecord::default(),
            error: Some(error),
        }
    }

    // == Record Failure ==
    /// Stores a refresh failure while keeping the last good record.
    pub fn record_failure(&mut self, error: LookupError, now: Instant) {
        self.last_updated = now;
        self.error = Some(error);
    }

    // == Is Expired ==
    /// Checks whether the entry is older than `expiry` at `now`.
    ///
    /// Strictly greater: an entry exactly `expiry` old is still fresh.
    pub fn is_expired(&self, expiry: Duration, now: Instant) -> bool {
        now.saturating_duration_since(self.last_updated) > expiry
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DirectoryError;

    fn record(id: &str) -> GatewayRecord {
        GatewayRecord {
            id: id.to_string(),
            frequency_plan: "EU_863_870".to_string(),
            ..GatewayRecord::default()
        }
    }

    #[test]
    fn test_entry_fetched() {
        let now = Instant::now();
        let entry = CacheEntry::fetched(record("gw1"), now);

        assert_eq!(entry.record.id, "gw1");
        assert!(entry.error.is_none());
        assert_eq!(entry.last_updated, now);
    }

    #[test]
    fn test_entry_failed_has_empty_record() {
        let now = Instant::now();
        let entry = CacheEntry::failed(LookupError::upstream("gw1", DirectoryError::NotFound), now);

        assert!(entry.record.is_empty());
        assert!(entry.error.is_some());
    }

    #[test]
    fn test_record_failure_keeps_record() {
        let start = Instant::now();
        let mut entry = CacheEntry::fetched(record("gw1"), start);

        let later = start + Duration::from_secs(5);
        entry.record_failure(LookupError::upstream("gw1", DirectoryError::Status(502)), later);

        assert_eq!(entry.record, record("gw1"));
        assert!(entry.error.is_some());
        assert_eq!(entry.last_updated, later);
    }

    #[test]
    fn test_expiration_boundary_condition() {
        let start = Instant::now();
        let entry = CacheEntry::fetched(record("gw1"), start);
        let expiry = Duration::from_secs(10);

        assert!(!entry.is_expired(expiry, start));
        assert!(!entry.is_expired(expiry, start + expiry));
        assert!(entry.is_expired(expiry, start + expiry + Duration::from_millis(1)));
    }

    #[test]
    fn test_is_expired_tolerates_earlier_now() {
        let start = Instant::now();
        let entry = CacheEntry::fetched(record("gw1"), start + Duration::from_secs(1));

        assert!(!entry.is_expired(Duration::ZERO, start));
    }
}
