//! In-process [`ProjectStore`] backed by a `Vec` behind a tokio `RwLock`.
//!
//! Used for tests and for running the API without a database. Permit
//! numbers registered with [`InMemoryProjectStore::reject_permits`] have
//! every write refused, which lets callers exercise per-row failure paths.

use std::collections::HashSet;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::dashboard::{count_types, DashboardSummary, TypeCount};
use crate::error::CoreError;
use crate::project::{DateField, Project, ProjectInput};
use crate::store::ProjectStore;
use crate::types::{DbId, Timestamp};

#[derive(Debug, Default)]
struct Rows {
    next_id: DbId,
    projects: Vec<Project>,
}

#[derive(Debug, Default)]
pub struct InMemoryProjectStore {
    rows: RwLock<Rows>,
    rejected: HashSet<String>,
}

impl InMemoryProjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Refuse every write whose permit number is in `permits`.
    pub fn reject_permits<I, S>(mut self, permits: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rejected.extend(permits.into_iter().map(Into::into));
        self
    }

    /// Number of stored rows.
    pub async fn len(&self) -> usize {
        self.rows.read().await.projects.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    fn check_writable(&self, input: &ProjectInput) -> Result<(), CoreError> {
        if self.rejected.contains(&input.permit_no) {
            return Err(CoreError::Rejected(format!(
                "permit {} is not writable",
                input.permit_no
            )));
        }
        Ok(())
    }
}

fn duplicate_permit(permit_no: &str) -> CoreError {
    CoreError::Conflict(format!("permit number {permit_no} already exists"))
}

#[async_trait]
impl ProjectStore for InMemoryProjectStore {
    async fn find_by_id(&self, id: DbId) -> Result<Option<Project>, CoreError> {
        let rows = self.rows.read().await;
        Ok(rows.projects.iter().find(|p| p.id == id).cloned())
    }

    async fn find_by_permit_no(&self, permit_no: &str) -> Result<Option<Project>, CoreError> {
        let rows = self.rows.read().await;
        Ok(rows
            .projects
            .iter()
            .find(|p| p.permit_no == permit_no)
            .cloned())
    }

    async fn list(&self) -> Result<Vec<Project>, CoreError> {
        let rows = self.rows.read().await;
        Ok(rows.projects.iter().rev().cloned().collect())
    }

    async fn find_by_date_range(
        &self,
        field: DateField,
        from: Timestamp,
        to: Timestamp,
    ) -> Result<Vec<Project>, CoreError> {
        let rows = self.rows.read().await;
        let mut matches: Vec<Project> = rows
            .projects
            .iter()
            .filter(|p| field.get(p).is_some_and(|d| d >= from && d < to))
            .cloned()
            .collect();
        matches.sort_by_key(|p| field.get(p));
        Ok(matches)
    }

    async fn summary(&self) -> Result<DashboardSummary, CoreError> {
        let rows = self.rows.read().await;
        Ok(DashboardSummary::from_projects(&rows.projects))
    }

    async fn count_by_type(&self) -> Result<Vec<TypeCount>, CoreError> {
        let rows = self.rows.read().await;
        Ok(count_types(&rows.projects))
    }

    async fn insert(&self, input: &ProjectInput) -> Result<Project, CoreError> {
        self.check_writable(input)?;
        let mut rows = self.rows.write().await;
        if rows.projects.iter().any(|p| p.permit_no == input.permit_no) {
            return Err(duplicate_permit(&input.permit_no));
        }
        rows.next_id += 1;
        let project = Project::from_input(rows.next_id, input, Utc::now());
        rows.projects.push(project.clone());
        Ok(project)
    }

    async fn replace(
        &self,
        id: DbId,
        input: &ProjectInput,
    ) -> Result<Option<Project>, CoreError> {
        self.check_writable(input)?;
        let mut rows = self.rows.write().await;
        if rows
            .projects
            .iter()
            .any(|p| p.id != id && p.permit_no == input.permit_no)
        {
            return Err(duplicate_permit(&input.permit_no));
        }
        let Some(project) = rows.projects.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };
        project.apply(input, Utc::now());
        Ok(Some(project.clone()))
    }
}
