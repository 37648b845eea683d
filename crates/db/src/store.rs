//! [`ProjectStore`] backed by PostgreSQL through [`ProjectRepo`].

use async_trait::async_trait;
use permit_core::dashboard::{DashboardSummary, TypeCount};
use permit_core::error::CoreError;
use permit_core::project::{DateField, Project, ProjectInput, ProjectType};
use permit_core::store::ProjectStore;
use permit_core::types::{DbId, Timestamp};

use crate::error::map_sqlx_error;
use crate::models::project::ProjectRow;
use crate::repositories::ProjectRepo;
use crate::DbPool;

/// Cheaply cloneable handle over a connection pool.
#[derive(Debug, Clone)]
pub struct PgProjectStore {
    pool: DbPool,
}

impl PgProjectStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn into_projects(rows: Vec<ProjectRow>) -> Result<Vec<Project>, CoreError> {
    rows.into_iter().map(ProjectRow::into_project).collect()
}

#[async_trait]
impl ProjectStore for PgProjectStore {
    async fn find_by_id(&self, id: DbId) -> Result<Option<Project>, CoreError> {
        ProjectRepo::find_by_id(&self.pool, id)
            .await
            .map_err(map_sqlx_error)?
            .map(ProjectRow::into_project)
            .transpose()
    }

    async fn find_by_permit_no(&self, permit_no: &str) -> Result<Option<Project>, CoreError> {
        ProjectRepo::find_by_permit_no(&self.pool, permit_no)
            .await
            .map_err(map_sqlx_error)?
            .map(ProjectRow::into_project)
            .transpose()
    }

    async fn list(&self) -> Result<Vec<Project>, CoreError> {
        let rows = ProjectRepo::list(&self.pool).await.map_err(map_sqlx_error)?;
        into_projects(rows)
    }

    async fn find_by_date_range(
        &self,
        field: DateField,
        from: Timestamp,
        to: Timestamp,
    ) -> Result<Vec<Project>, CoreError> {
        let rows = ProjectRepo::find_by_date_range(&self.pool, field, from, to)
            .await
            .map_err(map_sqlx_error)?;
        into_projects(rows)
    }

    async fn summary(&self) -> Result<DashboardSummary, CoreError> {
        let row = ProjectRepo::summary(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(DashboardSummary {
            total_permit: row.total_permit,
            total_emergency: row.total_emergency,
            completed_constructions: row.completed_constructions,
            completed_restorations: row.completed_restorations,
        })
    }

    async fn count_by_type(&self) -> Result<Vec<TypeCount>, CoreError> {
        let rows = ProjectRepo::count_by_type(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        rows.into_iter()
            .map(|row| {
                let project_type = ProjectType::from_str(&row.project_type).ok_or_else(|| {
                    CoreError::Internal(format!("unknown project_type '{}'", row.project_type))
                })?;
                Ok(TypeCount {
                    project_type,
                    count: row.count,
                })
            })
            .collect()
    }

    async fn insert(&self, input: &ProjectInput) -> Result<Project, CoreError> {
        ProjectRepo::create(&self.pool, input)
            .await
            .map_err(map_sqlx_error)?
            .into_project()
    }

    async fn replace(
        &self,
        id: DbId,
        input: &ProjectInput,
    ) -> Result<Option<Project>, CoreError> {
        ProjectRepo::update(&self.pool, id, input)
            .await
            .map_err(map_sqlx_error)?
            .map(ProjectRow::into_project)
            .transpose()
    }
}
