//! Gateway Info - public gateway metadata for pipeline messages
//!
//! Caches directory records per gateway, throttles lookups against the
//! account server and fills in uplink and status fields gateways leave unset.

pub mod cache;
pub mod config;
pub mod directory;
pub mod error;
pub mod hooks;
pub mod models;
pub mod tasks;

pub use cache::GatewayInfoCache;
pub use config::Config;
pub use hooks::PublicGatewayInfo;
