//! Background Tasks Module
//!
//! Contains background tasks that run periodically while the cache is alive.
//!
//! # Tasks
//! - Rate limiter refill: Returns one permit to the bucket per interval

mod refill;

pub use refill::spawn_refill_task;
