//! Enrichment Hooks Module
//!
//! Pipeline-facing handlers for connect, disconnect, uplink and status events.

mod public;

pub use public::PublicGatewayInfo;
