//! Persistence seam for project records.
//!
//! Handlers and the import pipeline receive an `Arc<dyn ProjectStore>`
//! instead of reaching for a global database handle. Backends implement the
//! raw [`insert`](ProjectStore::insert) / [`replace`](ProjectStore::replace)
//! writes; callers go through [`create`](ProjectStore::create) and
//! [`update`](ProjectStore::update), which run the completion status
//! derivation exactly once before delegating.

use async_trait::async_trait;

use crate::dashboard::{DashboardSummary, TypeCount};
use crate::error::CoreError;
use crate::project::{apply_completion_status, DateField, Project, ProjectInput};
use crate::types::{DbId, Timestamp};

#[async_trait]
pub trait ProjectStore: Send + Sync {
    /// Find a project by its internal ID.
    async fn find_by_id(&self, id: DbId) -> Result<Option<Project>, CoreError>;

    /// Find a project by exact permit number.
    async fn find_by_permit_no(&self, permit_no: &str) -> Result<Option<Project>, CoreError>;

    /// List all projects, most recently created first.
    async fn list(&self) -> Result<Vec<Project>, CoreError>;

    /// Projects whose `field` falls in `[from, to)`, ordered by that date.
    async fn find_by_date_range(
        &self,
        field: DateField,
        from: Timestamp,
        to: Timestamp,
    ) -> Result<Vec<Project>, CoreError>;

    /// Headline counts for the dashboard.
    async fn summary(&self) -> Result<DashboardSummary, CoreError>;

    /// Number of projects per type.
    async fn count_by_type(&self) -> Result<Vec<TypeCount>, CoreError>;

    /// Persist a new row exactly as given. Backends only; use [`create`](Self::create).
    async fn insert(&self, input: &ProjectInput) -> Result<Project, CoreError>;

    /// Overwrite an existing row exactly as given. Backends only; use [`update`](Self::update).
    ///
    /// Returns `None` if no row with the given `id` exists.
    async fn replace(&self, id: DbId, input: &ProjectInput)
        -> Result<Option<Project>, CoreError>;

    /// Create a project, deriving its completion status first.
    async fn create(&self, mut input: ProjectInput) -> Result<Project, CoreError> {
        apply_completion_status(&mut input);
        self.insert(&input).await
    }

    /// Update a project, deriving its completion status first.
    async fn update(
        &self,
        id: DbId,
        mut input: ProjectInput,
    ) -> Result<Option<Project>, CoreError> {
        apply_completion_status(&mut input);
        self.replace(id, &input).await
    }
}
