//! Public gateway information hooks
//!
//! Entry points invoked by the message pipeline. Connect and disconnect
//! maintain the cache; uplink and status read it and fill in fields the
//! gateway did not report. Cached data never overwrites a message field.

use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::cache::GatewayInfoCache;
use crate::models::{
    ConnectMessage, DisconnectMessage, GpsMetadata, PipelineEvent, StatusMessage, UplinkMessage,
};

/// Injects public gateway information into pipeline messages.
#[derive(Debug, Clone)]
pub struct PublicGatewayInfo {
    cache: GatewayInfoCache,
}

impl PublicGatewayInfo {
    pub fn new(cache: GatewayInfoCache) -> Self {
        Self { cache }
    }

    pub fn cache(&self) -> &GatewayInfoCache {
        &self.cache
    }

    /// Routes one pipeline event to its hook.
    ///
    /// Returns the enriched message for uplink and status events.
    pub fn handle_event(&self, event: PipelineEvent) -> Option<PipelineEvent> {
        match event {
            PipelineEvent::Connect(msg) => {
                self.handle_connect(&msg);
                None
            }
            PipelineEvent::Disconnect(msg) => {
                self.handle_disconnect(&msg);
                None
            }
            PipelineEvent::Uplink(mut msg) => {
                self.handle_uplink(&mut msg);
                Some(PipelineEvent::Uplink(msg))
            }
            PipelineEvent::Status(mut msg) => {
                self.handle_status(&mut msg);
                Some(PipelineEvent::Status(msg))
            }
        }
    }

    /// Fetches the gateway's public information in the background.
    ///
    /// Returns immediately. Failures are logged; the handle only resolves
    /// once the fetch is done and may be dropped.
    pub fn handle_connect(&self, msg: &ConnectMessage) -> JoinHandle<()> {
        let cache = self.cache.clone();
        let gateway_id = msg.gateway_id.clone();
        tokio::spawn(async move {
            match cache.fetch(&gateway_id).await {
                Ok(_) => debug!(%gateway_id, "Got public gateway information"),
                Err(err) => {
                    warn!(%gateway_id, error = %err, "Could not get public gateway information")
                }
            }
        })
    }

    /// Drops the gateway's cached information.
    pub fn handle_disconnect(&self, msg: &DisconnectMessage) {
        if self.cache.remove(&msg.gateway_id) {
            debug!(gateway_id = %msg.gateway_id, "Removed public gateway information");
        }
    }

    /// Fills in the gateway location when the uplink has none.
    ///
    /// A cached lookup error is recorded on the message trace.
    pub fn handle_uplink(&self, msg: &mut UplinkMessage) {
        let info = self.cache.get(&msg.gateway_id);
        if let Some(err) = &info.error {
            msg.trace
                .add_event_with("unable to get gateway info", "error", err.to_string());
        }

        if msg.gps.is_none() {
            if let Some(location) = &info.record.antenna_location {
                msg.trace.add_event("injecting gateway location");
                msg.gps = Some(GpsMetadata::from(location));
            }
        }
    }

    /// Fills in location, frequency plan, platform and description where
    /// the status message left them unset. Lookup errors are ignored.
    pub fn handle_status(&self, msg: &mut StatusMessage) {
        let info = self.cache.get(&msg.gateway_id);
        let record = &info.record;

        if msg.gps.is_none() {
            msg.gps = record.antenna_location.as_ref().map(GpsMetadata::from);
        }
        if msg.frequency_plan.is_empty() {
            msg.frequency_plan = record.frequency_plan.clone();
        }
        if msg.platform.is_empty() {
            msg.platform = record.attributes.platform();
        }
        if msg.description.is_empty() {
            if let Some(description) = &record.attributes.description {
                msg.description = description.clone();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use crate::directory::InMemoryDirectory;
    use crate::models::{AntennaLocation, Attributes, GatewayRecord};

    fn full_record(id: &str) -> GatewayRecord {
        GatewayRecord {
            id: id.to_string(),
            frequency_plan: "EU_863_870".to_string(),
            antenna_location: Some(AntennaLocation {
                latitude: 1.0,
                longitude: 2.0,
                altitude: 3.0,
            }),
            attributes: Attributes {
                brand: Some("Y".to_string()),
                model: Some("Z".to_string()),
                description: Some("rooftop".to_string()),
            },
            ..GatewayRecord::default()
        }
    }

    async fn connected(directory: InMemoryDirectory, gateway_id: &str) -> PublicGatewayInfo {
        let cache = GatewayInfoCache::new(Arc::new(directory), Duration::from_secs(3600), 10);
        let hooks = PublicGatewayInfo::new(cache);
        hooks
            .handle_connect(&ConnectMessage {
                gateway_id: gateway_id.to_string(),
            })
            .await
            .unwrap();
        hooks
    }

    #[tokio::test]
    async fn test_uplink_injects_location() {
        let hooks = connected(InMemoryDirectory::from_records([full_record("gw1")]), "gw1").await;

        let mut msg = UplinkMessage {
            gateway_id: "gw1".to_string(),
            ..UplinkMessage::default()
        };
        hooks.handle_uplink(&mut msg);

        assert_eq!(
            msg.gps,
            Some(GpsMetadata {
                latitude: 1.0,
                longitude: 2.0,
                altitude: 3,
            })
        );
        assert_eq!(msg.trace.events()[0].event, "injecting gateway location");
    }

    #[tokio::test]
    async fn test_uplink_keeps_reported_location() {
        let hooks = connected(InMemoryDirectory::from_records([full_record("gw1")]), "gw1").await;
        let reported = GpsMetadata {
            latitude: 10.0,
            longitude: 20.0,
            altitude: 30,
        };

        let mut msg = UplinkMessage {
            gateway_id: "gw1".to_string(),
            gps: Some(reported),
            ..UplinkMessage::default()
        };
        hooks.handle_uplink(&mut msg);

        assert_eq!(msg.gps, Some(reported));
        assert!(msg.trace.is_empty());
    }

    #[tokio::test]
    async fn test_uplink_records_lookup_error_on_trace() {
        let directory = InMemoryDirectory::new();
        directory.fail("gw1", "account server down");
        let hooks = connected(directory, "gw1").await;

        let mut msg = UplinkMessage {
            gateway_id: "gw1".to_string(),
            ..UplinkMessage::default()
        };
        hooks.handle_uplink(&mut msg);

        assert!(msg.gps.is_none());
        let events = msg.trace.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event, "unable to get gateway info");
        assert!(events[0].metadata["error"].contains("account server down"));
    }

    #[tokio::test]
    async fn test_status_fills_unset_fields() {
        let hooks = connected(InMemoryDirectory::from_records([full_record("gw1")]), "gw1").await;

        let mut msg = StatusMessage {
            gateway_id: "gw1".to_string(),
            ..StatusMessage::default()
        };
        hooks.handle_status(&mut msg);

        assert_eq!(msg.gps.map(|gps| gps.altitude), Some(3));
        assert_eq!(msg.frequency_plan, "EU_863_870");
        assert_eq!(msg.platform, "Y Z");
        assert_eq!(msg.description, "rooftop");
    }

    #[tokio::test]
    async fn test_status_never_overwrites_reported_fields() {
        let hooks = connected(InMemoryDirectory::from_records([full_record("gw1")]), "gw1").await;

        let mut msg = StatusMessage {
            gateway_id: "gw1".to_string(),
            gps: Some(GpsMetadata::default()),
            frequency_plan: "US_902_928".to_string(),
            platform: "X".to_string(),
            description: "basement".to_string(),
        };
        let original = msg.clone();
        hooks.handle_status(&mut msg);

        assert_eq!(msg, original);
    }

    #[tokio::test]
    async fn test_status_ignores_lookup_error() {
        let hooks = connected(InMemoryDirectory::new(), "gw1").await;

        let mut msg = StatusMessage {
            gateway_id: "gw1".to_string(),
            ..StatusMessage::default()
        };
        hooks.handle_status(&mut msg);

        assert_eq!(
            msg,
            StatusMessage {
                gateway_id: "gw1".to_string(),
                ..StatusMessage::default()
            }
        );
    }

    #[tokio::test]
    async fn test_disconnect_removes_information() {
        let hooks = connected(InMemoryDirectory::from_records([full_record("gw1")]), "gw1").await;

        hooks.handle_disconnect(&DisconnectMessage {
            gateway_id: "gw1".to_string(),
        });

        let mut msg = UplinkMessage {
            gateway_id: "gw1".to_string(),
            ..UplinkMessage::default()
        };
        hooks.handle_uplink(&mut msg);
        assert!(msg.gps.is_none());
        assert_eq!(hooks.cache().stats().total_entries, 0);
    }
}
