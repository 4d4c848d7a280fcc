//! In-memory directory
//!
//! Serves gateway records from a map. Used for offline runs from a records
//! file and as the directory double in tests.

use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;

use super::GatewayDirectory;
use crate::error::DirectoryError;
use crate::models::GatewayRecord;

#[derive(Debug, Clone)]
enum Outcome {
    Found(GatewayRecord),
    Unavailable(String),
}

/// Directory backed by an in-process map.
///
/// Unknown gateways resolve to [`DirectoryError::NotFound`].
#[derive(Debug, Default)]
pub struct InMemoryDirectory {
    outcomes: Mutex<HashMap<String, Outcome>>,
    lookups: AtomicUsize,
    latency: Option<Duration>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a directory from records keyed by their `id`.
    pub fn from_records(records: impl IntoIterator<Item = GatewayRecord>) -> Self {
        let directory = Self::new();
        for record in records {
            directory.insert(record);
        }
        directory
    }

    /// Loads a JSON array of gateway records.
    pub fn from_json_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let records: Vec<GatewayRecord> = serde_json::from_str(&contents)?;
        Ok(Self::from_records(records))
    }

    /// Delays every lookup by `latency`.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Serves `record` for its gateway id, replacing any previous outcome.
    pub fn insert(&self, record: GatewayRecord) {
        self.outcomes()
            .insert(record.id.clone(), Outcome::Found(record));
    }

    /// Makes lookups of `gateway_id` fail with [`DirectoryError::Unavailable`].
    pub fn fail(&self, gateway_id: &str, reason: impl Into<String>) {
        self.outcomes()
            .insert(gateway_id.to_string(), Outcome::Unavailable(reason.into()));
    }

    pub fn remove(&self, gateway_id: &str) {
        self.outcomes().remove(gateway_id);
    }

    /// Number of lookups served so far.
    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    fn outcomes(&self) -> std::sync::MutexGuard<'_, HashMap<String, Outcome>> {
        self.outcomes.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl GatewayDirectory for InMemoryDirectory {
    async fn find_gateway(&self, gateway_id: &str) -> Result<GatewayRecord, DirectoryError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        let outcome = self.outcomes().get(gateway_id).cloned();
        match outcome {
            Some(Outcome::Found(record)) => Ok(record),
            Some(Outcome::Unavailable(reason)) => Err(DirectoryError::Unavailable(reason)),
            None => Err(DirectoryError::NotFound),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str) -> GatewayRecord {
        GatewayRecord {
            id: id.to_string(),
            ..GatewayRecord::default()
        }
    }

    #[tokio::test]
    async fn test_lookup_outcomes() {
        let directory = InMemoryDirectory::from_records([record("gw1")]);
        directory.fail("gw2", "maintenance");

        assert_eq!(directory.find_gateway("gw1").await.unwrap(), record("gw1"));
        assert!(matches!(
            directory.find_gateway("gw2").await,
            Err(DirectoryError::Unavailable(reason)) if reason == "maintenance"
        ));
        assert!(matches!(
            directory.find_gateway("gw3").await,
            Err(DirectoryError::NotFound)
        ));
        assert_eq!(directory.lookups(), 3);
    }

    #[tokio::test]
    async fn test_insert_replaces_failure() {
        let directory = InMemoryDirectory::new();
        directory.fail("gw1", "down");
        directory.insert(record("gw1"));

        assert!(directory.find_gateway("gw1").await.is_ok());
    }

    #[test]
    fn test_from_json_file() {
        let path = std::env::temp_dir().join(format!(
            "gateway-info-records-{}.json",
            std::process::id()
        ));
        std::fs::write(&path, r#"[{"id": "gw1", "frequency_plan": "EU_863_870"}]"#).unwrap();

        let directory = InMemoryDirectory::from_json_file(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        let outcomes = directory.outcomes();
        assert!(matches!(
            outcomes.get("gw1"),
            Some(Outcome::Found(r)) if r.frequency_plan == "EU_863_870"
        ));
    }
}
