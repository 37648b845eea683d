//! Route definitions for the `/dashboard` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::dashboard;
use crate::state::AppState;

/// Routes mounted at `/dashboard`. The CSV upload is mounted separately by
/// [`super::import_routes`].
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/summary", get(dashboard::summary))
        .route("/generateProjectPDF", get(dashboard::summary_pdf))
        .route("/generateProjectPDF/{id}", get(dashboard::project_pdf))
        .route("/count-by-date", get(dashboard::count_by_date))
        .route("/project-by-type", get(dashboard::project_by_type))
}
