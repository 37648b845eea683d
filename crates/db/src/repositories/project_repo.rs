//! Repository for the `projects` table.

use permit_core::project::{DateField, ProjectInput, ProjectType};
use permit_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::project::{ProjectRow, SummaryRow, TypeCountRow};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, permit_no, year, address, town, layout_no, \
    const_start_date, const_end_date, rest_start_date, rest_end_date, \
    remarks, project_type, permit_closeout, latitude, longitude, project_status, \
    created_at, updated_at";

/// Provides queries and writes for project records.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Insert a new project, returning the created row.
    pub async fn create(pool: &PgPool, input: &ProjectInput) -> Result<ProjectRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO projects (permit_no, year, address, town, layout_no,
                const_start_date, const_end_date, rest_start_date, rest_end_date,
                remarks, project_type, permit_closeout, latitude, longitude, project_status)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProjectRow>(&query)
            .bind(&input.permit_no)
            .bind(input.year)
            .bind(&input.address)
            .bind(&input.town)
            .bind(&input.layout_no)
            .bind(input.const_start_date)
            .bind(input.const_end_date)
            .bind(input.rest_start_date)
            .bind(input.rest_end_date)
            .bind(&input.remarks)
            .bind(input.project_type.as_str())
            .bind(input.permit_closeout)
            .bind(input.latitude)
            .bind(input.longitude)
            .bind(input.project_status.map(|s| s.as_str()))
            .fetch_one(pool)
            .await
    }

    /// Find a project by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<ProjectRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = $1");
        sqlx::query_as::<_, ProjectRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a project by exact (case-sensitive) permit number.
    pub async fn find_by_permit_no(
        pool: &PgPool,
        permit_no: &str,
    ) -> Result<Option<ProjectRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE permit_no = $1");
        sqlx::query_as::<_, ProjectRow>(&query)
            .bind(permit_no)
            .fetch_optional(pool)
            .await
    }

    /// List all projects ordered by most recently created first.
    pub async fn list(pool: &PgPool) -> Result<Vec<ProjectRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects ORDER BY created_at DESC, id DESC");
        sqlx::query_as::<_, ProjectRow>(&query).fetch_all(pool).await
    }

    /// Overwrite a project with `input`.
    ///
    /// Closeout, coordinates and status are only changed when the payload
    /// carries a value. Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &ProjectInput,
    ) -> Result<Option<ProjectRow>, sqlx::Error> {
        let query = format!(
            "UPDATE projects SET
                permit_no = $2,
                year = $3,
                address = $4,
                town = $5,
                layout_no = $6,
                const_start_date = $7,
                const_end_date = $8,
                rest_start_date = $9,
                rest_end_date = $10,
                remarks = $11,
                project_type = $12,
                permit_closeout = COALESCE($13, permit_closeout),
                latitude = COALESCE($14, latitude),
                longitude = COALESCE($15, longitude),
                project_status = COALESCE($16, project_status),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProjectRow>(&query)
            .bind(id)
            .bind(&input.permit_no)
            .bind(input.year)
            .bind(&input.address)
            .bind(&input.town)
            .bind(&input.layout_no)
            .bind(input.const_start_date)
            .bind(input.const_end_date)
            .bind(input.rest_start_date)
            .bind(input.rest_end_date)
            .bind(&input.remarks)
            .bind(input.project_type.as_str())
            .bind(input.permit_closeout)
            .bind(input.latitude)
            .bind(input.longitude)
            .bind(input.project_status.map(|s| s.as_str()))
            .fetch_optional(pool)
            .await
    }

    /// Projects whose `field` falls in `[from, to)`, ordered by that date.
    pub async fn find_by_date_range(
        pool: &PgPool,
        field: DateField,
        from: Timestamp,
        to: Timestamp,
    ) -> Result<Vec<ProjectRow>, sqlx::Error> {
        let column = field.column();
        let query = format!(
            "SELECT {COLUMNS} FROM projects
             WHERE {column} >= $1 AND {column} < $2
             ORDER BY {column} ASC, id ASC"
        );
        sqlx::query_as::<_, ProjectRow>(&query)
            .bind(from)
            .bind(to)
            .fetch_all(pool)
            .await
    }

    /// Headline dashboard counts in a single pass.
    pub async fn summary(pool: &PgPool) -> Result<SummaryRow, sqlx::Error> {
        sqlx::query_as::<_, SummaryRow>(
            "SELECT
                COUNT(*) FILTER (WHERE project_type = $1) AS total_permit,
                COUNT(*) FILTER (WHERE project_type IN ($2, $3)) AS total_emergency,
                COUNT(*) FILTER (
                    WHERE const_start_date IS NOT NULL AND const_end_date IS NOT NULL
                ) AS completed_constructions,
                COUNT(*) FILTER (
                    WHERE rest_start_date IS NOT NULL AND rest_end_date IS NOT NULL
                ) AS completed_restorations
             FROM projects",
        )
        .bind(ProjectType::Permit.as_str())
        .bind(ProjectType::Gas.as_str())
        .bind(ProjectType::Electric.as_str())
        .fetch_one(pool)
        .await
    }

    /// Number of projects per type, ordered by type name.
    pub async fn count_by_type(pool: &PgPool) -> Result<Vec<TypeCountRow>, sqlx::Error> {
        sqlx::query_as::<_, TypeCountRow>(
            "SELECT project_type, COUNT(*) AS count
             FROM projects
             GROUP BY project_type
             ORDER BY project_type ASC",
        )
        .fetch_all(pool)
        .await
    }
}
