//! Sequential upsert of CSV rows into a [`ProjectStore`].
//!
//! Rows are handled strictly in file order, one at a time: each row's
//! geocode lookup and write finish before the next row starts, so the
//! error list follows the order of the sheet. A failed write is recorded
//! by permit number and the batch carries on; rows written before a failure
//! stay written.

use serde::Serialize;

use permit_core::error::CoreError;
use permit_core::geocode::GeocodeLookup;
use permit_core::project::{Project, ProjectInput};
use permit_core::store::ProjectStore;

use crate::mapper::{map_row, MappedRow};
use crate::reader::{parse_csv, CsvImportError, CsvRow};

/// Result of one import run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    /// Data rows in the file, including skipped ones.
    pub total: usize,
    /// Rows with a permit number whose write was attempted, failed or not.
    pub processed: usize,
    /// Permit numbers whose write failed, in file order.
    pub errors: Vec<String>,
}

impl ImportSummary {
    /// Fold another file's summary into this one (multi-file uploads).
    pub fn merge(&mut self, other: ImportSummary) {
        self.total += other.total;
        self.processed += other.processed;
        self.errors.extend(other.errors);
    }
}

/// Whether an upsert created a new row or updated an existing one.
#[derive(Debug, Clone, PartialEq)]
pub enum UpsertOutcome {
    Created(Project),
    Updated(Project),
}

/// Create or update a project keyed by its exact permit number.
pub async fn upsert(
    store: &dyn ProjectStore,
    input: ProjectInput,
) -> Result<UpsertOutcome, CoreError> {
    match store.find_by_permit_no(&input.permit_no).await? {
        Some(existing) => store
            .update(existing.id, input)
            .await?
            .map(UpsertOutcome::Updated)
            .ok_or(CoreError::NotFound {
                entity: "Project",
                id: existing.id,
            }),
        None => store.create(input).await.map(UpsertOutcome::Created),
    }
}

/// Import already-parsed rows.
pub async fn import_rows(
    rows: &[CsvRow],
    store: &dyn ProjectStore,
    geocoder: &dyn GeocodeLookup,
) -> ImportSummary {
    let mut summary = ImportSummary {
        total: rows.len(),
        ..Default::default()
    };

    for (index, row) in rows.iter().enumerate() {
        let input = match map_row(row, geocoder).await {
            MappedRow::Skip => {
                tracing::debug!(row = index + 1, "Skipping row without permit number");
                continue;
            }
            MappedRow::Record(input) => input,
        };

        let permit_no = input.permit_no.clone();
        match upsert(store, input).await {
            Ok(UpsertOutcome::Created(project)) => {
                tracing::debug!(permit_no = %permit_no, id = project.id, "Project created");
            }
            Ok(UpsertOutcome::Updated(project)) => {
                tracing::debug!(permit_no = %permit_no, id = project.id, "Project updated");
            }
            Err(e) => {
                tracing::error!(
                    row = index + 1,
                    permit_no = %permit_no,
                    error = %e,
                    "Failed to import project row"
                );
                summary.errors.push(permit_no);
            }
        }
        summary.processed += 1;
    }

    tracing::info!(
        total = summary.total,
        processed = summary.processed,
        errors = summary.errors.len(),
        "CSV import finished"
    );

    summary
}

/// Parse an uploaded CSV file and import its rows.
pub async fn import_csv(
    bytes: &[u8],
    store: &dyn ProjectStore,
    geocoder: &dyn GeocodeLookup,
) -> Result<ImportSummary, CsvImportError> {
    let rows = parse_csv(bytes)?;
    Ok(import_rows(&rows, store, geocoder).await)
}
