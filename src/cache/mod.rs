//! Cache Module
//!
//! Rate-limited, expiring cache of public gateway information.

mod entry;
mod fetcher;
mod limiter;
mod stats;
mod store;


// Re-export public types
pub use entry::CacheEntry;
pub use fetcher::GatewayInfoCache;
pub use limiter::RateLimiter;
pub use stats::CacheStats;
pub use store::{CachedInfo, EntryStore};
