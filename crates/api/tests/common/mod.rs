#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use permit_api::config::ServerConfig;
use permit_api::router::build_app_router;
use permit_api::state::AppState;
use permit_core::geocode::{Coordinates, DisabledGeocoder, GeocodeLookup};
use permit_core::memory::InMemoryProjectStore;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3000".to_string()],
        request_timeout_secs: 30,
        max_upload_bytes: 1024 * 1024,
        geocoding_api_key: None,
        geocoding_timeout_secs: 1,
    }
}

/// Geocoder that resolves every non-empty address to the same point.
pub struct FixedGeocoder(pub Coordinates);

#[async_trait]
impl GeocodeLookup for FixedGeocoder {
    async fn lookup(&self, address: &str) -> Option<Coordinates> {
        (!address.trim().is_empty()).then_some(self.0)
    }
}

/// Geocoder that waits before answering, like a slow provider.
pub struct SlowGeocoder(pub std::time::Duration);

#[async_trait]
impl GeocodeLookup for SlowGeocoder {
    async fn lookup(&self, _address: &str) -> Option<Coordinates> {
        tokio::time::sleep(self.0).await;
        None
    }
}

/// Build the full application router over `store`, with geocoding disabled.
pub fn build_test_app(store: Arc<InMemoryProjectStore>) -> Router {
    build_test_app_with(store, Arc::new(DisabledGeocoder))
}

/// Build the full application router with an explicit geocoder.
pub fn build_test_app_with(
    store: Arc<InMemoryProjectStore>,
    geocoder: Arc<dyn GeocodeLookup>,
) -> Router {
    build_test_app_with_config(store, geocoder, test_config())
}

/// Build the full application router with an explicit geocoder and config.
pub fn build_test_app_with_config(
    store: Arc<InMemoryProjectStore>,
    geocoder: Arc<dyn GeocodeLookup>,
    config: ServerConfig,
) -> Router {
    let state = AppState {
        store,
        geocoder,
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    app.oneshot(Request::get(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send_json(app, "POST", uri, body).await
}

pub async fn put_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send_json(app, "PUT", uri, body).await
}

async fn send_json(
    app: Router,
    method: &str,
    uri: &str,
    body: serde_json::Value,
) -> Response<Body> {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub const BOUNDARY: &str = "permit-test-boundary";

/// POST a `multipart/form-data` body with one file part per `(field, bytes)`.
pub async fn post_multipart(app: Router, uri: &str, parts: Vec<(&str, Vec<u8>)>) -> Response<Body> {
    let mut body = Vec::new();
    for (i, (field, bytes)) in parts.into_iter().enumerate() {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{field}\"; filename=\"upload-{i}.csv\"\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(b"Content-Type: text/csv\r\n\r\n");
        body.extend_from_slice(&bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}
