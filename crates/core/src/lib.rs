//! Domain layer for project records.
//!
//! No database, no HTTP: types, pure rules (date normalization, completion
//! status), the persistence and geocoding seams, dashboard aggregates and
//! PDF report rendering.

pub mod dashboard;
pub mod dates;
pub mod error;
pub mod geocode;
pub mod memory;
pub mod project;
pub mod report;
pub mod store;
pub mod types;
