//! Maps one CSV row from the import template onto a project write payload.

use permit_core::dates::normalize_date;
use permit_core::geocode::GeocodeLookup;
use permit_core::project::{ProjectInput, ProjectType};

use crate::reader::CsvRow;

/// Column headers of the import template.
pub mod columns {
    pub const PERMIT_NO: &str = "Permit #";
    pub const YEAR: &str = "Year";
    pub const LOCATION: &str = "Location";
    pub const TOWN: &str = "Town";
    pub const LAYOUT_NO: &str = "Layout #";
    pub const CONST_START_DATE: &str = "Const Start Date";
    pub const CONST_END_DATE: &str = "Const End Date";
    pub const REST_START_DATE: &str = "Rest Start Date";
    pub const REST_END_DATE: &str = "Rest End Date";
    pub const REMARKS: &str = "Remarks";
    pub const PERMIT_CLOSEOUT: &str = "Permit Closeout";
}

/// Type assigned to every imported row. The sheet has no type column that
/// is read, so emergencies imported here are recorded as permits.
pub const IMPORTED_PROJECT_TYPE: ProjectType = ProjectType::Permit;

/// Outcome of mapping one row.
#[derive(Debug, Clone, PartialEq)]
pub enum MappedRow {
    /// The row has no permit number and is not imported.
    Skip,
    Record(ProjectInput),
}

/// Trimmed cell value; missing columns read as empty.
fn cell<'a>(row: &'a CsvRow, column: &str) -> &'a str {
    row.get(column).map(|v| v.trim()).unwrap_or("")
}

/// Trimmed permit number, or `None` when blank.
pub fn permit_number(row: &CsvRow) -> Option<&str> {
    Some(cell(row, columns::PERMIT_NO)).filter(|p| !p.is_empty())
}

/// Tri-state closeout flag.
///
/// Blank means "not stated" (`None`). `N` (exact) and `no` (any case) mean
/// `false`; every other value means `true`.
pub fn parse_permit_closeout(raw: &str) -> Option<bool> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    Some(!(raw == "N" || raw.eq_ignore_ascii_case("no")))
}

/// Map a row's cells without any lookups. `None` when the permit number is blank.
pub fn map_fields(row: &CsvRow) -> Option<ProjectInput> {
    let permit_no = permit_number(row)?;
    let date = |column: &str| normalize_date(Some(cell(row, column)));
    let remarks = cell(row, columns::REMARKS);

    Some(ProjectInput {
        permit_no: permit_no.to_string(),
        year: cell(row, columns::YEAR).parse().ok(),
        address: cell(row, columns::LOCATION).to_string(),
        town: cell(row, columns::TOWN).to_string(),
        layout_no: cell(row, columns::LAYOUT_NO).to_string(),
        const_start_date: date(columns::CONST_START_DATE),
        const_end_date: date(columns::CONST_END_DATE),
        rest_start_date: date(columns::REST_START_DATE),
        rest_end_date: date(columns::REST_END_DATE),
        remarks: (!remarks.is_empty()).then(|| remarks.to_string()),
        project_type: IMPORTED_PROJECT_TYPE,
        permit_closeout: parse_permit_closeout(cell(row, columns::PERMIT_CLOSEOUT)),
        latitude: None,
        longitude: None,
        project_status: None,
    })
}

/// Map a row and geocode its address. Coordinates are attached only when
/// the lookup succeeds.
pub async fn map_row(row: &CsvRow, geocoder: &dyn GeocodeLookup) -> MappedRow {
    let Some(mut input) = map_fields(row) else {
        return MappedRow::Skip;
    };

    if let Some(coords) = geocoder.lookup(&input.address).await {
        input.latitude = Some(coords.lat);
        input.longitude = Some(coords.lng);
    }

    MappedRow::Record(input)
}
