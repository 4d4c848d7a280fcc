//! Account server client
//!
//! Resolves public gateway records over the account server's HTTP API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::trace;

use super::GatewayDirectory;
use crate::error::DirectoryError;
use crate::models::GatewayRecord;

/// HTTP client for `GET {base}/api/v2/gateways/{id}`.
#[derive(Debug, Clone)]
pub struct AccountServerDirectory {
    client: Client,
    base_url: String,
}

impl AccountServerDirectory {
    /// Creates a client for the account server at `base_url`.
    ///
    /// `timeout` bounds each request; it is the only timeout applied to lookups.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, DirectoryError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, base_url))
    }

    /// Creates a directory on top of an existing HTTP client.
    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn gateway_url(&self, gateway_id: &str) -> String {
        format!("{}/api/v2/gateways/{}", self.base_url, gateway_id)
    }
}

#[async_trait]
impl GatewayDirectory for AccountServerDirectory {
    async fn find_gateway(&self, gateway_id: &str) -> Result<GatewayRecord, DirectoryError> {
        let url = self.gateway_url(gateway_id);
        trace!(%url, "Querying account server");

        let response = self
            .client
            .get(&url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => Ok(response.json::<GatewayRecord>().await?),
            StatusCode::NOT_FOUND => Err(DirectoryError::NotFound),
            status => Err(DirectoryError::Status(status.as_u16())),
        }
    }
}
