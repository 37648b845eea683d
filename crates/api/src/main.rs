use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use permit_core::geocode::{DisabledGeocoder, GeocodeLookup};
use permit_geocoding::client::GOOGLE_GEOCODE_URL;
use permit_geocoding::GoogleGeocoder;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use permit_api::config::ServerConfig;
use permit_api::router::build_app_router;
use permit_api::state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "permit_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = permit_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    permit_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database health check passed");

    permit_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // --- Geocoding ---
    let geocoder: Arc<dyn GeocodeLookup> = match &config.geocoding_api_key {
        Some(key) => {
            let client = reqwest::Client::builder()
                .timeout(Duration::from_secs(config.geocoding_timeout_secs))
                .build()
                .expect("Failed to build geocoding HTTP client");
            tracing::info!(timeout_secs = config.geocoding_timeout_secs, "Geocoding enabled");
            Arc::new(GoogleGeocoder::with_client(
                client,
                GOOGLE_GEOCODE_URL.to_string(),
                key.clone(),
            ))
        }
        None => {
            tracing::warn!("GEOCODING_API_KEY not set; imported projects will have no coordinates");
            Arc::new(DisabledGeocoder)
        }
    };

    // --- App state ---
    let state = AppState {
        store: Arc::new(permit_db::PgProjectStore::new(pool.clone())),
        geocoder,
        config: Arc::new(config.clone()),
    };

    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Server stopped accepting connections, closing database pool");
    pool.close().await;
    tracing::info!("Graceful shutdown complete");
}

/// Wait for SIGINT (Ctrl-C) or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("Received Ctrl-C, starting graceful shutdown"),
        () = terminate => tracing::info!("Received SIGTERM, starting graceful shutdown"),
    }
}
