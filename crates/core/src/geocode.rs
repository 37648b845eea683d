//! Address geocoding seam.
//!
//! Lookups are best-effort: a failed or empty lookup is `None`, never an
//! error. Implementations log their own failures.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

#[async_trait]
pub trait GeocodeLookup: Send + Sync {
    /// Resolve an address to coordinates. Empty addresses resolve to `None`
    /// without any outbound request.
    async fn lookup(&self, address: &str) -> Option<Coordinates>;
}

/// Geocoder used when no provider key is configured. Always `None`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledGeocoder;

#[async_trait]
impl GeocodeLookup for DisabledGeocoder {
    async fn lookup(&self, _address: &str) -> Option<Coordinates> {
        None
    }
}
