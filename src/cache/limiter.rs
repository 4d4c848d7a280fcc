//! Rate Limiter Module
//!
//! Token bucket bounding how often the upstream directory may be queried.
//! Permits are taken by fetches and put back one at a time by the refill
//! task in [`crate::tasks`].

use std::sync::{Mutex, PoisonError};

use tokio::sync::Semaphore;

// == Rate Limiter ==
/// Global token bucket shared by all gateway lookups.
#[derive(Debug)]
pub struct RateLimiter {
    permits: Semaphore,
    burst: usize,
    /// Serializes refills so the bucket never overshoots `burst`
    refill: Mutex<()>,
}

impl RateLimiter {
    // == Constructor ==
    /// Creates a full bucket holding `burst` permits.
    pub fn new(burst: usize) -> Self {
        Self {
            permits: Semaphore::new(burst),
            burst,
            refill: Mutex::new(()),
        }
    }

    // == Acquire ==
    /// Waits until a permit is available and consumes it.
    ///
    /// Never fails; waiting is the only cost. Waiters are served in FIFO order.
    pub async fn acquire(&self) {
        // The semaphore is never closed, so acquire only ever waits.
        if let Ok(permit) = self.permits.acquire().await {
            permit.forget();
        }
    }

    // == Try Refill ==
    /// Adds one permit unless the bucket is already full.
    ///
    /// Returns whether a permit was added; refills beyond `burst` are dropped.
    pub fn try_refill(&self) -> bool {
        let _guard = self.refill.lock().unwrap_or_else(PoisonError::into_inner);
        if self.permits.available_permits() >= self.burst {
            return false;
        }
        self.permits.add_permits(1);
        true
    }

    /// Permits that can be taken right now without waiting.
    pub fn available(&self) -> usize {
        self.permits.available_permits()
    }

    pub fn burst(&self) -> usize {
        self.burst
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::{assert_pending, assert_ready, task};

    #[test]
    fn test_limiter_starts_full() {
        let limiter = RateLimiter::new(3);
        assert_eq!(limiter.available(), 3);
        assert_eq!(limiter.burst(), 3);
    }

    #[tokio::test]
    async fn test_burst_acquires_without_waiting() {
        let limiter = RateLimiter::new(3);

        for _ in 0..3 {
            let mut acquire = task::spawn(limiter.acquire());
            assert_ready!(acquire.poll());
        }
        assert_eq!(limiter.available(), 0);
    }

    #[tokio::test]
    async fn test_acquire_beyond_burst_waits_for_refill() {
        let limiter = RateLimiter::new(2);
        limiter.acquire().await;
        limiter.acquire().await;

        let mut blocked = task::spawn(limiter.acquire());
        assert_pending!(blocked.poll());

        assert!(limiter.try_refill());
        assert!(blocked.is_woken());
        assert_ready!(blocked.poll());
        assert_eq!(limiter.available(), 0);
    }

    #[test]
    fn test_refill_is_capped_at_burst() {
        let limiter = RateLimiter::new(2);

        assert!(!limiter.try_refill());
        assert!(!limiter.try_refill());
        assert_eq!(limiter.available(), 2);
    }

    #[tokio::test]
    async fn test_refill_restores_one_permit_at_a_time() {
        let limiter = RateLimiter::new(3);
        for _ in 0..3 {
            limiter.acquire().await;
        }

        assert!(limiter.try_refill());
        assert_eq!(limiter.available(), 1);

        for _ in 0..5 {
            limiter.try_refill();
        }
        assert_eq!(limiter.available(), 3);
    }
}
