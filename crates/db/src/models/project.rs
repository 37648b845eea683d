//! Row types for the `projects` table.

use permit_core::error::CoreError;
use permit_core::project::{Project, ProjectStatus, ProjectType};
use permit_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A raw row from the `projects` table. Enum columns are stored as text.
#[derive(Debug, Clone, FromRow)]
pub struct ProjectRow {
    pub id: DbId,
    pub permit_no: String,
    pub year: Option<i32>,
    pub address: String,
    pub town: String,
    pub layout_no: String,
    pub const_start_date: Option<Timestamp>,
    pub const_end_date: Option<Timestamp>,
    pub rest_start_date: Option<Timestamp>,
    pub rest_end_date: Option<Timestamp>,
    pub remarks: Option<String>,
    pub project_type: String,
    pub permit_closeout: Option<bool>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub project_status: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl ProjectRow {
    /// Convert into the domain type, rejecting unknown enum values.
    pub fn into_project(self) -> Result<Project, CoreError> {
        let project_type = ProjectType::from_str(&self.project_type).ok_or_else(|| {
            CoreError::Internal(format!(
                "project {} has unknown project_type '{}'",
                self.id, self.project_type
            ))
        })?;
        let project_status = match self.project_status.as_deref() {
            None => None,
            Some(s) => Some(ProjectStatus::from_str(s).ok_or_else(|| {
                CoreError::Internal(format!("project {} has unknown project_status '{s}'", self.id))
            })?),
        };

        Ok(Project {
            id: self.id,
            permit_no: self.permit_no,
            year: self.year,
            address: self.address,
            town: self.town,
            layout_no: self.layout_no,
            const_start_date: self.const_start_date,
            const_end_date: self.const_end_date,
            rest_start_date: self.rest_start_date,
            rest_end_date: self.rest_end_date,
            remarks: self.remarks,
            project_type,
            permit_closeout: self.permit_closeout,
            latitude: self.latitude,
            longitude: self.longitude,
            project_status,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Row for the dashboard headline query.
#[derive(Debug, Clone, FromRow)]
pub struct SummaryRow {
    pub total_permit: i64,
    pub total_emergency: i64,
    pub completed_constructions: i64,
    pub completed_restorations: i64,
}

/// Row for the per-type count query.
#[derive(Debug, Clone, FromRow)]
pub struct TypeCountRow {
    pub project_type: String,
    pub count: i64,
}
