use std::sync::Arc;

use permit_core::geocode::GeocodeLookup;
use permit_core::store::ProjectStore;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable; every field is behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Project persistence (PostgreSQL in production, in-memory in tests).
    pub store: Arc<dyn ProjectStore>,
    /// Address lookup used by the CSV import.
    pub geocoder: Arc<dyn GeocodeLookup>,
    pub config: Arc<ServerConfig>,
}
