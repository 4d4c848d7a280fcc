//! Directory record models
//!
//! Public gateway information as returned by the account server.

use serde::{Deserialize, Serialize};

/// Physical location of a gateway antenna.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AntennaLocation {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub altitude: f64,
}

/// Free-form gateway attributes.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Attributes {
    pub brand: Option<String>,
    pub model: Option<String>,
    pub description: Option<String>,
}

impl Attributes {
    /// Joins the non-empty brand and model with a single space.
    ///
    /// Returns an empty string when neither is known.
    pub fn platform(&self) -> String {
        [self.brand.as_deref(), self.model.as_deref()]
            .into_iter()
            .flatten()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

// == Gateway Record ==
/// Public directory record of one gateway.
///
/// `GatewayRecord::default()` is the empty record handed out for gateways
/// that have never been fetched successfully.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayRecord {
    /// Gateway identifier
    pub id: String,
    /// Frequency plan identifier, empty when unknown
    pub frequency_plan: String,
    pub frequency_plan_url: Option<String>,
    pub antenna_location: Option<AntennaLocation>,
    pub attributes: Attributes,
    pub location_public: bool,
    pub status_public: bool,
}

impl GatewayRecord {
    /// Returns true if this is the empty record.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
