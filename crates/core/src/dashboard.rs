//! Dashboard aggregates: headline counts, per-type counts and per-month
//! milestone counts for a calendar year.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::project::{Project, ProjectType};
use crate::types::Timestamp;

/// Headline counts shown on the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    /// Projects of type `permit`.
    pub total_permit: i64,
    /// Projects of type `gas` or `electric`.
    pub total_emergency: i64,
    /// Projects with both construction dates set.
    pub completed_constructions: i64,
    /// Projects with both restoration dates set.
    pub completed_restorations: i64,
}

impl DashboardSummary {
    /// Compute the summary from an in-memory set of projects.
    pub fn from_projects<'a>(projects: impl IntoIterator<Item = &'a Project>) -> Self {
        projects.into_iter().fold(Self::default(), |mut acc, p| {
            match p.project_type {
                ProjectType::Permit => acc.total_permit += 1,
                t if t.is_emergency() => acc.total_emergency += 1,
                _ => {}
            }
            if p.construction_done() {
                acc.completed_constructions += 1;
            }
            if p.restoration_done() {
                acc.completed_restorations += 1;
            }
            acc
        })
    }
}

/// Number of projects of one type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeCount {
    pub project_type: ProjectType,
    pub count: i64,
}

/// Count projects per type, ordered by type name, omitting types with no rows.
pub fn count_types<'a>(projects: impl IntoIterator<Item = &'a Project>) -> Vec<TypeCount> {
    let mut counts = std::collections::BTreeMap::<&'static str, TypeCount>::new();
    for p in projects {
        counts
            .entry(p.project_type.as_str())
            .or_insert(TypeCount {
                project_type: p.project_type,
                count: 0,
            })
            .count += 1;
    }
    counts.into_values().collect()
}

/// Milestone starts in one month of a year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MonthlyCount {
    /// Month number, 1 through 12.
    pub month: u32,
    /// Projects whose construction started this month.
    pub constructions: i64,
    /// Projects whose restoration started this month.
    pub restorations: i64,
}

/// Earliest and latest year accepted by the per-month report.
pub const MIN_REPORT_YEAR: i32 = 1900;
pub const MAX_REPORT_YEAR: i32 = 2999;

/// Half-open `[Jan 1 year, Jan 1 year+1)` range in UTC.
///
/// Returns `None` for years outside [`MIN_REPORT_YEAR`]..=[`MAX_REPORT_YEAR`].
pub fn year_bounds(year: i32) -> Option<(Timestamp, Timestamp)> {
    if !(MIN_REPORT_YEAR..=MAX_REPORT_YEAR).contains(&year) {
        return None;
    }
    let start = NaiveDate::from_ymd_opt(year, 1, 1)?.and_hms_opt(0, 0, 0)?.and_utc();
    let end = NaiveDate::from_ymd_opt(year + 1, 1, 1)?.and_hms_opt(0, 0, 0)?.and_utc();
    Some((start, end))
}

/// Bucket construction and restoration start dates into the twelve months
/// of `year`. Dates outside the year are ignored.
pub fn bucket_by_month(
    year: i32,
    construction_starts: impl IntoIterator<Item = Timestamp>,
    restoration_starts: impl IntoIterator<Item = Timestamp>,
) -> Vec<MonthlyCount> {
    let mut months: Vec<MonthlyCount> = (1..=12)
        .map(|month| MonthlyCount {
            month,
            constructions: 0,
            restorations: 0,
        })
        .collect();

    for ts in construction_starts.into_iter().filter(|ts| ts.year() == year) {
        months[ts.month0() as usize].constructions += 1;
    }
    for ts in restoration_starts.into_iter().filter(|ts| ts.year() == year) {
        months[ts.month0() as usize].restorations += 1;
    }
    months
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::ProjectInput;
    use chrono::{TimeZone, Utc};

    fn project(id: i64, project_type: ProjectType, with_const: bool, with_rest: bool) -> Project {
        let d = Some(Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap());
        let input = ProjectInput {
            permit_no: format!("P-{id}"),
            project_type,
            const_start_date: d,
            const_end_date: if with_const { d } else { None },
            rest_start_date: d,
            rest_end_date: if with_rest { d } else { None },
            ..Default::default()
        };
        Project::from_input(id, &input, Utc::now())
    }

    #[test]
    fn summary_counts_types_and_completions() {
        let rows = vec![
            project(1, ProjectType::Permit, true, false),
            project(2, ProjectType::Permit, false, false),
            project(3, ProjectType::Gas, true, true),
            project(4, ProjectType::Electric, false, true),
        ];
        let summary = DashboardSummary::from_projects(&rows);
        assert_eq!(
            summary,
            DashboardSummary {
                total_permit: 2,
                total_emergency: 2,
                completed_constructions: 2,
                completed_restorations: 2,
            }
        );
    }

    #[test]
    fn summary_serializes_camel_case() {
        let json = serde_json::to_value(DashboardSummary::default()).unwrap();
        assert!(json.get("totalPermit").is_some());
        assert!(json.get("completedRestorations").is_some());
    }

    #[test]
    fn type_counts_skip_empty_types() {
        let rows = vec![
            project(1, ProjectType::Gas, false, false),
            project(2, ProjectType::Gas, false, false),
            project(3, ProjectType::Permit, false, false),
        ];
        let counts = count_types(&rows);
        assert_eq!(
            counts,
            vec![
                TypeCount {
                    project_type: ProjectType::Gas,
                    count: 2
                },
                TypeCount {
                    project_type: ProjectType::Permit,
                    count: 1
                },
            ]
        );
    }

    #[test]
    fn year_bounds_cover_whole_year() {
        let (start, end) = year_bounds(2024).unwrap();
        assert_eq!(start, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        assert_eq!(end, Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap());
        assert!(year_bounds(10).is_none());
        assert!(year_bounds(12000).is_none());
    }

    #[test]
    fn buckets_have_twelve_months() {
        let jan = Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap();
        let dec = Utc.with_ymd_and_hms(2024, 12, 31, 0, 0, 0).unwrap();
        let other_year = Utc.with_ymd_and_hms(2023, 12, 31, 0, 0, 0).unwrap();

        let months = bucket_by_month(2024, vec![jan, jan, other_year], vec![dec]);
        assert_eq!(months.len(), 12);
        assert_eq!(months[0].month, 1);
        assert_eq!(months[0].constructions, 2);
        assert_eq!(months[11].restorations, 1);
        assert_eq!(months.iter().map(|m| m.constructions).sum::<i64>(), 2);
    }
}
