//! Optional geolocation attached to status updates and clock events.

use serde::{Deserialize, Serialize};

/// A place reported by the client: a free-form label plus optional
/// coordinates. Every field may be absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeoLocation {
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
}

impl GeoLocation {
    /// A location with only a label.
    pub fn named(location: impl Into<String>) -> Self {
        Self {
            location: Some(location.into()),
            ..Self::default()
        }
    }
}
