//! Project records: the stored row, the write payload, and the completion
//! status derived before every write.

use serde::{Deserialize, Serialize};

use crate::dates::deserialize_optional_timestamp;
use crate::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Project type
// ---------------------------------------------------------------------------

/// Kind of work a project record tracks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectType {
    #[default]
    Permit,
    Gas,
    Electric,
}

impl ProjectType {
    /// Return the type name as stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Permit => "permit",
            Self::Gas => "gas",
            Self::Electric => "electric",
        }
    }

    /// Parse a type string. Returns `None` for unknown values.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "permit" => Some(Self::Permit),
            "gas" => Some(Self::Gas),
            "electric" => Some(Self::Electric),
            _ => None,
        }
    }

    /// Utility emergencies (gas and electric) as opposed to planned permits.
    pub fn is_emergency(&self) -> bool {
        matches!(self, Self::Gas | Self::Electric)
    }

    /// All valid type values.
    pub const ALL: &'static [&'static str] = &["permit", "gas", "electric"];
}

impl std::fmt::Display for ProjectType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Project status
// ---------------------------------------------------------------------------

/// Derived project status. Only `completed` is ever assigned automatically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    Completed,
}

impl ProjectStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Completed => "completed",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }
}

impl std::fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Milestone date fields
// ---------------------------------------------------------------------------

/// One of the four milestone date columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateField {
    ConstStart,
    ConstEnd,
    RestStart,
    RestEnd,
}

impl DateField {
    /// Column name in the `projects` table.
    pub fn column(&self) -> &'static str {
        match self {
            Self::ConstStart => "const_start_date",
            Self::ConstEnd => "const_end_date",
            Self::RestStart => "rest_start_date",
            Self::RestEnd => "rest_end_date",
        }
    }

    /// Read this field from a stored project.
    pub fn get(&self, project: &Project) -> Option<Timestamp> {
        match self {
            Self::ConstStart => project.const_start_date,
            Self::ConstEnd => project.const_end_date,
            Self::RestStart => project.rest_start_date,
            Self::RestEnd => project.rest_end_date,
        }
    }

    pub const ALL: [DateField; 4] = [
        Self::ConstStart,
        Self::ConstEnd,
        Self::RestStart,
        Self::RestEnd,
    ];
}

// ---------------------------------------------------------------------------
// Stored row
// ---------------------------------------------------------------------------

/// A project row as read back from a store.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Project {
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
    pub project_type: ProjectType,
    pub permit_closeout: Option<bool>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub project_status: Option<ProjectStatus>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Project {
    /// Build a new row from a write payload.
    pub fn from_input(id: DbId, input: &ProjectInput, now: Timestamp) -> Self {
        Self {
            id,
            permit_no: input.permit_no.clone(),
            year: input.year,
            address: input.address.clone(),
            town: input.town.clone(),
            layout_no: input.layout_no.clone(),
            const_start_date: input.const_start_date,
            const_end_date: input.const_end_date,
            rest_start_date: input.rest_start_date,
            rest_end_date: input.rest_end_date,
            remarks: input.remarks.clone(),
            project_type: input.project_type,
            permit_closeout: input.permit_closeout,
            latitude: input.latitude,
            longitude: input.longitude,
            project_status: input.project_status,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply an update payload to this row.
    ///
    /// Identity, dates, remarks and type are overwritten. Closeout,
    /// coordinates and status keep their stored value when the payload
    /// leaves them out, so a status is never cleared by an update.
    pub fn apply(&mut self, input: &ProjectInput, now: Timestamp) {
        self.permit_no = input.permit_no.clone();
        self.year = input.year;
        self.address = input.address.clone();
        self.town = input.town.clone();
        self.layout_no = input.layout_no.clone();
        self.const_start_date = input.const_start_date;
        self.const_end_date = input.const_end_date;
        self.rest_start_date = input.rest_start_date;
        self.rest_end_date = input.rest_end_date;
        self.remarks = input.remarks.clone();
        self.project_type = input.project_type;
        self.permit_closeout = input.permit_closeout.or(self.permit_closeout);
        self.latitude = input.latitude.or(self.latitude);
        self.longitude = input.longitude.or(self.longitude);
        self.project_status = input.project_status.or(self.project_status);
        self.updated_at = now;
    }

    /// Both construction dates are recorded.
    pub fn construction_done(&self) -> bool {
        self.const_start_date.is_some() && self.const_end_date.is_some()
    }

    /// Both restoration dates are recorded.
    pub fn restoration_done(&self) -> bool {
        self.rest_start_date.is_some() && self.rest_end_date.is_some()
    }
}

// ---------------------------------------------------------------------------
// Write payload
// ---------------------------------------------------------------------------

/// Fields written on create or update, from the import pipeline or the API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectInput {
    pub permit_no: String,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub town: String,
    #[serde(default)]
    pub layout_no: String,
    #[serde(default, deserialize_with = "deserialize_optional_timestamp")]
    pub const_start_date: Option<Timestamp>,
    #[serde(default, deserialize_with = "deserialize_optional_timestamp")]
    pub const_end_date: Option<Timestamp>,
    #[serde(default, deserialize_with = "deserialize_optional_timestamp")]
    pub rest_start_date: Option<Timestamp>,
    #[serde(default, deserialize_with = "deserialize_optional_timestamp")]
    pub rest_end_date: Option<Timestamp>,
    #[serde(default)]
    pub remarks: Option<String>,
    #[serde(default)]
    pub project_type: ProjectType,
    #[serde(default)]
    pub permit_closeout: Option<bool>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub project_status: Option<ProjectStatus>,
}

impl ProjectInput {
    /// All four milestone dates are present in this payload.
    pub fn has_all_milestones(&self) -> bool {
        self.const_start_date.is_some()
            && self.const_end_date.is_some()
            && self.rest_start_date.is_some()
            && self.rest_end_date.is_some()
    }
}

/// Stamp `completed` on a payload whose four milestone dates are all set.
///
/// An incomplete payload is left exactly as it is: no other status is ever
/// assigned here and an existing status is never reset. Stores run this
/// once per write through [`ProjectStore::create`] and
/// [`ProjectStore::update`].
///
/// [`ProjectStore::create`]: crate::store::ProjectStore::create
/// [`ProjectStore::update`]: crate::store::ProjectStore::update
pub fn apply_completion_status(input: &mut ProjectInput) {
    if input.has_all_milestones() {
        input.project_status = Some(ProjectStatus::Completed);
    }
}
