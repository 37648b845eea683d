//! HTTP client for the Google Geocoding API.
//!
//! [`GoogleGeocoder::geocode`] reports every failure as a [`GeocodeError`].
//! The [`GeocodeLookup`] implementation is the best-effort face used by the
//! import pipeline: it logs the error and answers `None`.

use async_trait::async_trait;
use serde::Deserialize;

use permit_core::geocode::{Coordinates, GeocodeLookup};

/// Default endpoint of the Google Geocoding API (JSON output).
pub const GOOGLE_GEOCODE_URL: &str = "https://maps.googleapis.com/maps/api/geocode/json";

/// Status string the provider returns on success.
const STATUS_OK: &str = "OK";

/// Geocoding client bound to one API key.
pub struct GoogleGeocoder {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
}

/// Errors from a single geocoding request.
#[derive(Debug, thiserror::Error)]
pub enum GeocodeError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout, decode).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The provider answered with a non-2xx status code.
    #[error("Geocoding API error ({status}): {body}")]
    Http { status: u16, body: String },

    /// The provider answered with a status other than `OK`.
    #[error("Geocoding provider status {status}: {message:?}")]
    Provider {
        status: String,
        message: Option<String>,
    },

    /// `OK` with an empty result list.
    #[error("No geocoding results")]
    NoResults,
}

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    status: String,
    #[serde(default)]
    results: Vec<GeocodeResult>,
    #[serde(default)]
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: Location,
}

#[derive(Debug, Deserialize)]
struct Location {
    lat: f64,
    lng: f64,
}

impl GoogleGeocoder {
    /// Create a client for the public Google endpoint.
    pub fn new(api_key: String) -> Self {
        Self::with_client(reqwest::Client::new(), GOOGLE_GEOCODE_URL.to_string(), api_key)
    }

    /// Create a client reusing an existing [`reqwest::Client`] (for shared
    /// timeouts and connection pooling) and a custom endpoint.
    pub fn with_client(client: reqwest::Client, api_url: String, api_key: String) -> Self {
        Self {
            client,
            api_url,
            api_key,
        }
    }

    /// Geocode one address with a single `GET` request. No retries.
    pub async fn geocode(&self, address: &str) -> Result<Coordinates, GeocodeError> {
        let response = self
            .client
            .get(&self.api_url)
            .query(&[("address", address), ("key", self.api_key.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GeocodeError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GeocodeResponse = response.json().await?;
        first_location(parsed)
    }
}

/// Take the first result's location from a provider response.
fn first_location(response: GeocodeResponse) -> Result<Coordinates, GeocodeError> {
    if response.status != STATUS_OK {
        return Err(GeocodeError::Provider {
            status: response.status,
            message: response.error_message,
        });
    }
    response
        .results
        .into_iter()
        .next()
        .map(|r| Coordinates {
            lat: r.geometry.location.lat,
            lng: r.geometry.location.lng,
        })
        .ok_or(GeocodeError::NoResults)
}

#[async_trait]
impl GeocodeLookup for GoogleGeocoder {
    async fn lookup(&self, address: &str) -> Option<Coordinates> {
        let address = address.trim();
        if address.is_empty() {
            return None;
        }

        match self.geocode(address).await {
            Ok(coords) => Some(coords),
            Err(e) => {
                tracing::warn!(address, error = %e, "Geocoding failed");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn parse(json: serde_json::Value) -> GeocodeResponse {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn first_result_wins() {
        let response = parse(serde_json::json!({
            "status": "OK",
            "results": [
                { "geometry": { "location": { "lat": 40.7357, "lng": -74.1724 } } },
                { "geometry": { "location": { "lat": 1.0, "lng": 2.0 } } }
            ]
        }));
        let coords = first_location(response).unwrap();
        assert_eq!(
            coords,
            Coordinates {
                lat: 40.7357,
                lng: -74.1724
            }
        );
    }

    #[test]
    fn zero_results_is_an_error() {
        let response = parse(serde_json::json!({ "status": "OK", "results": [] }));
        assert_matches!(first_location(response), Err(GeocodeError::NoResults));
    }

    #[test]
    fn provider_status_is_reported() {
        let response = parse(serde_json::json!({
            "status": "REQUEST_DENIED",
            "error_message": "The provided API key is invalid."
        }));
        assert_matches!(
            first_location(response),
            Err(GeocodeError::Provider { status, message: Some(_) }) if status == "REQUEST_DENIED"
        );
    }

    #[test]
    fn zero_results_status_is_provider_error() {
        let response = parse(serde_json::json!({ "status": "ZERO_RESULTS", "results": [] }));
        assert_matches!(first_location(response), Err(GeocodeError::Provider { .. }));
    }

    fn unreachable() -> GoogleGeocoder {
        GoogleGeocoder::with_client(
            reqwest::Client::new(),
            "http://127.0.0.1:1/geocode/json".to_string(),
            "test-key".to_string(),
        )
    }

    #[tokio::test]
    async fn empty_address_makes_no_request() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let geocoder = GoogleGeocoder::with_client(
            reqwest::Client::new(),
            format!("http://{addr}/geocode/json"),
            "test-key".to_string(),
        );

        assert_eq!(geocoder.lookup("   ").await, None);
        assert_eq!(geocoder.lookup("").await, None);

        let accepted =
            tokio::time::timeout(std::time::Duration::from_millis(200), listener.accept()).await;
        assert!(accepted.is_err(), "empty address must not open a connection");
    }

    #[tokio::test]
    async fn transport_failure_is_none() {
        assert_eq!(unreachable().lookup("12 Oak St").await, None);
    }
}
