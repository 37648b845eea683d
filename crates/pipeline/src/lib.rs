//! CSV bulk import of project records.
//!
//! [`reader::parse_csv`] turns an uploaded file into header-keyed rows,
//! [`mapper`] turns one row into a write payload, and [`import`] upserts
//! the payloads one at a time by permit number.

pub mod import;
pub mod mapper;
pub mod reader;

pub use import::{import_csv, import_rows, ImportSummary};
pub use reader::{parse_csv, CsvImportError, CsvRow};
