//! Pipeline message models
//!
//! The subset of gateway messages the enrichment hooks read and write.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::record::AntennaLocation;

/// GPS metadata as carried on uplink and status messages.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GpsMetadata {
    pub latitude: f32,
    pub longitude: f32,
    pub altitude: i32,
}

impl From<&AntennaLocation> for GpsMetadata {
    fn from(location: &AntennaLocation) -> Self {
        Self {
            latitude: location.latitude as f32,
            longitude: location.longitude as f32,
            altitude: location.altitude as i32,
        }
    }
}

// == Trace ==
/// One annotation on a message's processing trace.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TraceEvent {
    pub event: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, String>,
}

/// Append-only processing trace.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Trace {
    events: Vec<TraceEvent>,
}

impl Trace {
    /// Records an event without metadata.
    pub fn add_event(&mut self, event: impl Into<String>) {
        self.events.push(TraceEvent {
            event: event.into(),
            metadata: BTreeMap::new(),
        });
    }

    /// Records an event with a single key/value annotation.
    pub fn add_event_with(
        &mut self,
        event: impl Into<String>,
        key: impl Into<String>,
        value: impl Into<String>,
    ) {
        let mut metadata = BTreeMap::new();
        metadata.insert(key.into(), value.into());
        self.events.push(TraceEvent {
            event: event.into(),
            metadata,
        });
    }

    pub fn events(&self) -> &[TraceEvent] {
        &self.events
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

// == Messages ==
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectMessage {
    pub gateway_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisconnectMessage {
    pub gateway_id: String,
}

/// Uplink received by a gateway.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UplinkMessage {
    pub gateway_id: String,
    /// Gateway GPS metadata, `None` when the gateway did not report it
    #[serde(default)]
    pub gps: Option<GpsMetadata>,
    #[serde(default, skip_serializing_if = "Trace::is_empty")]
    pub trace: Trace,
    /// Opaque radio payload, passed through untouched
    #[serde(default)]
    pub payload: String,
}

/// Gateway status report. Empty strings mean "not reported".
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StatusMessage {
    pub gateway_id: String,
    pub gps: Option<GpsMetadata>,
    pub frequency_plan: String,
    pub platform: String,
    pub description: String,
}

/// A message arriving from the pipeline, tagged by kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PipelineEvent {
    Connect(ConnectMessage),
    Disconnect(DisconnectMessage),
    Uplink(UplinkMessage),
    Status(StatusMessage),
}
