//! Handlers for the `/projects` resource.
//!
//! Writes go through [`ProjectStore::create`] and [`ProjectStore::update`],
//! so the completion status is derived here exactly as it is for imports.
//!
//! [`ProjectStore::create`]: permit_core::store::ProjectStore::create
//! [`ProjectStore::update`]: permit_core::store::ProjectStore::update

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use permit_core::error::CoreError;
use permit_core::project::{Project, ProjectInput};
use permit_core::types::DbId;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Reject payloads without a usable permit number.
fn validate(input: &mut ProjectInput) -> AppResult<()> {
    input.permit_no = input.permit_no.trim().to_string();
    if input.permit_no.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "permit_no must not be empty".to_string(),
        )));
    }
    Ok(())
}

/// POST /api/projects
pub async fn create(
    State(state): State<AppState>,
    Json(mut input): Json<ProjectInput>,
) -> AppResult<(StatusCode, Json<DataResponse<Project>>)> {
    validate(&mut input)?;
    let project = state.store.create(input).await?;
    tracing::info!(id = project.id, permit_no = %project.permit_no, "Project created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: project })))
}

/// GET /api/projects
pub async fn list(State(state): State<AppState>) -> AppResult<Json<DataResponse<Vec<Project>>>> {
    let projects = state.store.list().await?;
    Ok(Json(DataResponse { data: projects }))
}

/// GET /api/projects/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Project>>> {
    let project = state
        .store
        .find_by_id(id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))?;
    Ok(Json(DataResponse { data: project }))
}

/// PUT /api/projects/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(mut input): Json<ProjectInput>,
) -> AppResult<Json<DataResponse<Project>>> {
    validate(&mut input)?;
    let project = state
        .store
        .update(id, input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))?;
    Ok(Json(DataResponse { data: project }))
}
