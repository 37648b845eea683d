pub mod dashboard;
pub mod health;
pub mod project;

use axum::routing::post;
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api` route tree. These routes run under the request timeout.
///
/// ```text
/// /dashboard/summary                     headline counts (GET)
/// /dashboard/generateProjectPDF          summary PDF (GET)
/// /dashboard/generateProjectPDF/{id}     project PDF (GET)
/// /dashboard/count-by-date?year=YYYY     monthly milestone starts (GET)
/// /dashboard/project-by-type             per-type counts (GET)
///
/// /projects                              list, create
/// /projects/{id}                         get, update
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/dashboard", dashboard::router())
        .nest("/projects", project::router())
}

/// Routes exempt from the request timeout, mounted at the root.
///
/// ```text
/// /api/dashboard/upload-csv              CSV import (POST, multipart `files`)
/// ```
pub fn import_routes() -> Router<AppState> {
    Router::new().route(
        "/api/dashboard/upload-csv",
        post(handlers::dashboard::upload_csv),
    )
}
