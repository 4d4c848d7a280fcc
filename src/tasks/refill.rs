//! Rate Limiter Refill Task
//!
//! Background task that tops up the rate limiter on a fixed cadence.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, trace};

use crate::cache::RateLimiter;

/// Shortest refill period accepted by the timer.
const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// Spawns a background task that adds one permit to `limiter` every `interval`.
///
/// The bucket starts full, so the first refill happens one interval after
/// spawning. Ticks missed while the runtime was busy are skipped rather
/// than replayed, and refills into a full bucket are discarded.
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during shutdown.
///
/// # Example
/// ```ignore
/// let limiter = Arc::new(RateLimiter::new(50));
/// let refill_handle = spawn_refill_task(limiter.clone(), Duration::from_millis(50));
/// // Later, during shutdown:
/// refill_handle.abort();
/// ```
pub fn spawn_refill_task(limiter: Arc<RateLimiter>, interval: Duration) -> JoinHandle<()> {
    let period = interval.max(MIN_INTERVAL);

    tokio::spawn(async move {
        debug!(
            "Starting rate limiter refill task with interval of {:?} and burst of {}",
            period,
            limiter.burst()
        );

        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;
            if limiter.try_refill() {
                trace!(available = limiter.available(), "Rate limiter refilled");
            }
        }
    })
}
