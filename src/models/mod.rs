//! Directory records and pipeline messages
//!
//! Records come from the account server; messages flow through the
//! gateway pipeline and are enriched in place.

pub mod messages;
pub mod record;

// Re-export commonly used types
pub use messages::{
    ConnectMessage, DisconnectMessage, GpsMetadata, PipelineEvent, StatusMessage, Trace,
    TraceEvent, UplinkMessage,
};
pub use record::{AntennaLocation, Attributes, GatewayRecord};
