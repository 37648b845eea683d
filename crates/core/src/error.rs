use crate::types::DbId;

/// Domain errors shared by the store implementations, the import pipeline
/// and the report renderer.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    /// A write collided with an existing row (duplicate permit number).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The store refused a write for a reason other than a conflict.
    #[error("Write rejected: {0}")]
    Rejected(String),

    #[error("Report rendering failed: {0}")]
    Report(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
