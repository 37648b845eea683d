//! Handlers for the `/dashboard` resource: headline counts, PDF reports,
//! CSV upload and chart aggregates.

use axum::extract::{Multipart, Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use permit_core::dashboard::{bucket_by_month, year_bounds, DashboardSummary, MonthlyCount, TypeCount};
use permit_core::error::CoreError;
use permit_core::project::DateField;
use permit_core::report::{
    project_lines, render_pdf, summary_lines, PROJECT_REPORT_TITLE, SUMMARY_REPORT_TITLE,
};
use permit_core::types::DbId;
use permit_pipeline::{import_rows, parse_csv, CsvRow, ImportSummary};

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Multipart field carrying the uploaded CSV file(s).
pub const UPLOAD_FIELD: &str = "files";

// ---------------------------------------------------------------------------
// Query parameters
// ---------------------------------------------------------------------------

/// Query params for `GET /dashboard/count-by-date`.
///
/// `year` is taken as a string so a missing or malformed value produces the
/// standard JSON error body instead of the extractor's plain-text rejection.
#[derive(Debug, Deserialize)]
pub struct CountByDateQuery {
    pub year: Option<String>,
}

// ---------------------------------------------------------------------------
// Summary
// ---------------------------------------------------------------------------

/// GET /api/dashboard/summary
pub async fn summary(State(state): State<AppState>) -> AppResult<Json<DataResponse<DashboardSummary>>> {
    let summary = state.store.summary().await?;
    Ok(Json(DataResponse { data: summary }))
}

// ---------------------------------------------------------------------------
// PDF reports
// ---------------------------------------------------------------------------

fn pdf_response(filename: String, bytes: Vec<u8>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        bytes,
    )
}

/// GET /api/dashboard/generateProjectPDF
///
/// Without a project id the report covers the dashboard summary.
pub async fn summary_pdf(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let summary = state.store.summary().await?;
    let bytes = render_pdf(SUMMARY_REPORT_TITLE, &summary_lines(&summary))?;
    Ok(pdf_response("project-summary.pdf".to_string(), bytes))
}

/// GET /api/dashboard/generateProjectPDF/{id}
pub async fn project_pdf(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let project = state
        .store
        .find_by_id(id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))?;
    let bytes = render_pdf(PROJECT_REPORT_TITLE, &project_lines(&project))?;
    Ok(pdf_response(format!("project-{id}.pdf"), bytes))
}

// ---------------------------------------------------------------------------
// CSV upload
// ---------------------------------------------------------------------------

/// POST /api/dashboard/upload-csv
///
/// Every `files` part is read and parsed before any row is written, so one
/// malformed file fails the whole request with nothing stored. The parsed
/// files are then imported in the order received and their summaries merged.
/// Other parts are ignored.
pub async fn upload_csv(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<Json<DataResponse<ImportSummary>>> {
    let mut files: Vec<(String, Vec<CsvRow>)> = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let filename = field.file_name().unwrap_or("upload.csv").to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?;

        let rows = parse_csv(&data).inspect_err(|e| {
            tracing::warn!(filename = %filename, error = %e, "Rejecting unreadable CSV upload");
        })?;
        files.push((filename, rows));
    }

    if files.is_empty() {
        return Err(AppError::BadRequest(format!(
            "Missing required '{UPLOAD_FIELD}' file field"
        )));
    }

    let mut summary = ImportSummary::default();
    for (filename, rows) in &files {
        tracing::info!(filename = %filename, rows = rows.len(), "Importing CSV upload");
        summary.merge(import_rows(rows, state.store.as_ref(), state.geocoder.as_ref()).await);
    }
    Ok(Json(DataResponse { data: summary }))
}

// ---------------------------------------------------------------------------
// Chart aggregates
// ---------------------------------------------------------------------------

/// GET /api/dashboard/count-by-date?year=YYYY
///
/// Twelve buckets counting construction starts and restoration starts that
/// fall in each month of `year`.
pub async fn count_by_date(
    State(state): State<AppState>,
    Query(params): Query<CountByDateQuery>,
) -> AppResult<Json<DataResponse<Vec<MonthlyCount>>>> {
    let raw = params
        .year
        .ok_or_else(|| AppError::BadRequest("Query parameter 'year' is required".to_string()))?;
    let year: i32 = raw
        .trim()
        .parse()
        .map_err(|_| AppError::BadRequest(format!("Invalid year '{raw}'")))?;
    let (from, to) = year_bounds(year)
        .ok_or_else(|| AppError::BadRequest(format!("Year {year} is out of range")))?;

    let constructions = state
        .store
        .find_by_date_range(DateField::ConstStart, from, to)
        .await?;
    let restorations = state
        .store
        .find_by_date_range(DateField::RestStart, from, to)
        .await?;

    let months = bucket_by_month(
        year,
        constructions.iter().filter_map(|p| p.const_start_date),
        restorations.iter().filter_map(|p| p.rest_start_date),
    );
    Ok(Json(DataResponse { data: months }))
}

/// GET /api/dashboard/project-by-type
pub async fn project_by_type(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<TypeCount>>>> {
    let counts = state.store.count_by_type().await?;
    Ok(Json(DataResponse { data: counts }))
}
