//! Header-driven CSV reading.

use std::collections::HashMap;

use csv::{ReaderBuilder, Trim};

/// One data row keyed by header name.
pub type CsvRow = HashMap<String, String>;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Errors that make a whole file unreadable.
#[derive(Debug, thiserror::Error)]
pub enum CsvImportError {
    #[error("CSV header row could not be read: {0}")]
    Header(#[source] csv::Error),

    /// `line` is 1-based and counts the header row.
    #[error("CSV line {line} could not be read: {source}")]
    Row {
        line: usize,
        #[source]
        source: csv::Error,
    },
}

/// Parse CSV bytes into rows keyed by the (trimmed) header names.
///
/// Cells are trimmed, short rows simply lack the missing columns, blank
/// lines are ignored, and a leading UTF-8 byte order mark is dropped.
pub fn parse_csv(bytes: &[u8]) -> Result<Vec<CsvRow>, CsvImportError> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);

    let mut reader = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(bytes);

    let headers = reader.headers().map_err(CsvImportError::Header)?.clone();

    let mut rows = Vec::new();
    for (index, result) in reader.records().enumerate() {
        let record = result.map_err(|source| CsvImportError::Row {
            line: index + 2,
            source,
        })?;
        let row: CsvRow = headers
            .iter()
            .zip(record.iter())
            .map(|(header, value)| (header.to_string(), value.to_string()))
            .collect();
        rows.push(row);
    }

    Ok(rows)
}
