//! Error types for the gateway info cache
//!
//! Provides unified error handling using thiserror.

use std::sync::Arc;

use thiserror::Error;

// == Directory Error Enum ==
/// Failure reported by a directory client while looking up one gateway.
#[derive(Error, Debug)]
pub enum DirectoryError {
    /// The directory has no record for the gateway
    #[error("gateway not found")]
    NotFound,

    /// The directory answered with a non-success status
    #[error("unexpected status {0}")]
    Status(u16),

    /// Transport or decoding failure
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The directory is unreachable or refused the request for another reason
    #[error("directory unavailable: {0}")]
    Unavailable(String),
}

// == Lookup Error Enum ==
/// The only error the cache produces: an upstream lookup failed.
///
/// Cloneable so the outcome of one fetch can be cached and handed to every
/// later reader of the same gateway.
#[derive(Error, Debug, Clone)]
pub enum LookupError {
    /// Upstream lookup failed, cause preserved as-is
    #[error("lookup of gateway {gateway_id} failed: {source}")]
    Upstream {
        gateway_id: String,
        #[source]
        source: Arc<DirectoryError>,
    },
}

impl LookupError {
    /// Wraps a directory failure for the given gateway.
    pub fn upstream(gateway_id: impl Into<String>, source: DirectoryError) -> Self {
        LookupError::Upstream {
            gateway_id: gateway_id.into(),
            source: Arc::new(source),
        }
    }

    /// Identifier of the gateway whose lookup failed.
    pub fn gateway_id(&self) -> &str {
        match self {
            LookupError::Upstream { gateway_id, .. } => gateway_id,
        }
    }
}

// == Config Error Enum ==
/// Invalid configuration values.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// An environment variable could not be parsed
    #[error("invalid value {value:?} for {name}")]
    InvalidValue { name: &'static str, value: String },

    /// The rate limiter needs at least one permit
    #[error("request burst must be at least 1")]
    ZeroBurst,
}

// == Result Type Alias ==
/// Convenience Result type for cache lookups.
pub type Result<T> = std::result::Result<T, LookupError>;
