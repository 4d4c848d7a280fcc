//! Directory Module
//!
//! Boundary to the external account/directory service that owns public
//! gateway records.

mod account;
mod memory;

use async_trait::async_trait;

use crate::error::DirectoryError;
use crate::models::GatewayRecord;

pub use account::AccountServerDirectory;
pub use memory::InMemoryDirectory;

/// Looks up public gateway records.
///
/// Implementations may take arbitrarily long; any timeout is theirs to
/// enforce, the cache never cancels a lookup.
#[async_trait]
pub trait GatewayDirectory: Send + Sync {
    /// Fetches the public record of one gateway.
    async fn find_gateway(&self, gateway_id: &str) -> Result<GatewayRecord, DirectoryError>;
}
