//! Fetch Engine Module
//!
//! Owns the entry store and rate limiter, performs rate-limited upstream
//! lookups and schedules background refreshes of expired entries.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use tokio::task::JoinHandle;
use tracing::debug;

use crate::cache::{CacheStats, CachedInfo, EntryStore, RateLimiter};
use crate::config::Config;
use crate::directory::GatewayDirectory;
use crate::error::{LookupError, Result};
use crate::models::GatewayRecord;
use crate::tasks::spawn_refill_task;

struct Inner {
    directory: Arc<dyn GatewayDirectory>,
    store: Mutex<EntryStore>,
    limiter: Arc<RateLimiter>,
    refill_task: JoinHandle<()>,
}

impl Drop for Inner {
    fn drop(&mut self) {
        self.refill_task.abort();
    }
}

// == Gateway Info Cache ==
/// Rate-limited cache of public gateway records.
///
/// Cheap to clone; all clones share one store and one rate limiter. The
/// refill task is stopped when the last clone is dropped.
#[derive(Clone)]
pub struct GatewayInfoCache {
    inner: Arc<Inner>,
}

impl GatewayInfoCache {
    // == Constructor ==
    /// Creates a cache with auto-refresh disabled.
    ///
    /// The rate limiter starts with `burst` permits and regains one every
    /// `interval`. Must be called from within a tokio runtime, which also
    /// runs the refill task and every background fetch.
    pub fn new(directory: Arc<dyn GatewayDirectory>, interval: Duration, burst: usize) -> Self {
        let limiter = Arc::new(RateLimiter::new(burst));
        let refill_task = spawn_refill_task(limiter.clone(), interval);

        Self {
            inner: Arc::new(Inner {
                directory,
                store: Mutex::new(EntryStore::new(None)),
                limiter,
                refill_task,
            }),
        }
    }

    /// Creates a cache from configuration.
    pub fn from_config(directory: Arc<dyn GatewayDirectory>, config: &Config) -> Self {
        let cache = Self::new(directory, config.request_interval(), config.request_burst);
        match config.expiry() {
            Some(expiry) => cache.with_expiry(expiry),
            None => cache,
        }
    }

    /// Refreshes entries older than `expiry` when they are read.
    pub fn with_expiry(self, expiry: Duration) -> Self {
        self.store().set_expiry(Some(expiry));
        self
    }

    // == Fetch ==
    /// Looks up `gateway_id` upstream and stores the outcome.
    ///
    /// Waits for a rate limiter permit first. Exactly one lookup is made.
    pub async fn fetch(&self, gateway_id: &str) -> Result<GatewayRecord> {
        self.inner.limiter.acquire().await;
        let outcome = self.inner.directory.find_gateway(gateway_id).await;

        let now = Instant::now();
        let mut store = self.store();
        match outcome {
            Ok(record) => {
                store.set_success(gateway_id, record.clone(), now);
                Ok(record)
            }
            Err(source) => {
                let err = LookupError::upstream(gateway_id, source);
                store.set_failure(gateway_id, err.clone(), now);
                Err(err)
            }
        }
    }

    /// Runs [`fetch`](Self::fetch) as a background task.
    pub fn spawn_fetch(&self, gateway_id: &str) -> JoinHandle<Result<GatewayRecord>> {
        let cache = self.clone();
        let gateway_id = gateway_id.to_string();
        tokio::spawn(async move { cache.fetch(&gateway_id).await })
    }

    // == Get ==
    /// Returns the cached record and last fetch error without waiting.
    ///
    /// If the entry has expired, a refresh is started in the background and
    /// the stale value is returned; the refreshed value serves later reads.
    pub fn get(&self, gateway_id: &str) -> CachedInfo {
        let info = self.store().get(gateway_id, Instant::now());
        if info.needs_refresh {
            debug!(gateway_id, "Refreshing expired gateway information");
            let cache = self.clone();
            let gateway_id = gateway_id.to_string();
            tokio::spawn(async move {
                if let Err(err) = cache.fetch(&gateway_id).await {
                    debug!(%gateway_id, error = %err, "Gateway information refresh failed");
                }
            });
        }
        info
    }

    // == Remove ==
    /// Forgets `gateway_id`. Returns whether it was cached.
    pub fn remove(&self, gateway_id: &str) -> bool {
        self.store().remove(gateway_id)
    }

    pub fn stats(&self) -> CacheStats {
        self.store().stats()
    }

    /// Rate limiter permits currently available.
    pub fn available_permits(&self) -> usize {
        self.inner.limiter.available()
    }

    fn store(&self) -> MutexGuard<'_, EntryStore> {
        self.inner.store.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for GatewayInfoCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayInfoCache")
            .field("store", &*self.store())
            .field("limiter", &self.inner.limiter)
            .finish_non_exhaustive()
    }
}
