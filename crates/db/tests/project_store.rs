//! Integration tests for the PostgreSQL project store.
//!
//! Need a reachable `DATABASE_URL`; run with `cargo test -- --ignored`.

use assert_matches::assert_matches;
use chrono::{TimeZone, Utc};
use permit_core::error::CoreError;
use permit_core::project::{DateField, ProjectInput, ProjectStatus, ProjectType};
use permit_core::store::ProjectStore;
use permit_core::types::Timestamp;
use permit_db::PgProjectStore;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn day(month: u32, day: u32) -> Option<Timestamp> {
    Some(Utc.with_ymd_and_hms(2024, month, day, 0, 0, 0).unwrap())
}

fn input(permit_no: &str) -> ProjectInput {
    ProjectInput {
        permit_no: permit_no.to_string(),
        address: "1 Main St".to_string(),
        town: "Newark".to_string(),
        ..Default::default()
    }
}

fn complete(permit_no: &str) -> ProjectInput {
    ProjectInput {
        const_start_date: day(1, 5),
        const_end_date: day(1, 9),
        rest_start_date: day(2, 1),
        rest_end_date: day(2, 3),
        ..input(permit_no)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn create_and_find(pool: PgPool) {
    let store = PgProjectStore::new(pool);
    let created = store.create(input("P-1")).await.unwrap();
    assert_eq!(created.project_type, ProjectType::Permit);
    assert_eq!(created.project_status, None);

    let by_id = store.find_by_id(created.id).await.unwrap().unwrap();
    assert_eq!(by_id.permit_no, "P-1");

    let by_permit = store.find_by_permit_no("P-1").await.unwrap().unwrap();
    assert_eq!(by_permit.id, created.id);

    assert!(store.find_by_permit_no("p-1").await.unwrap().is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn complete_create_is_marked_completed(pool: PgPool) {
    let store = PgProjectStore::new(pool);
    let created = store.create(complete("P-2")).await.unwrap();
    assert_eq!(created.project_status, Some(ProjectStatus::Completed));
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn duplicate_permit_is_a_conflict(pool: PgPool) {
    let store = PgProjectStore::new(pool);
    store.create(input("P-3")).await.unwrap();
    assert_matches!(store.create(input("P-3")).await, Err(CoreError::Conflict(_)));
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn update_keeps_status_coordinates_and_closeout(pool: PgPool) {
    let store = PgProjectStore::new(pool);
    let created = store
        .create(ProjectInput {
            permit_closeout: Some(true),
            latitude: Some(40.7),
            longitude: Some(-74.1),
            ..complete("P-4")
        })
        .await
        .unwrap();

    let updated = store
        .update(
            created.id,
            ProjectInput {
                remarks: Some("partial".to_string()),
                ..input("P-4")
            },
        )
        .await
        .unwrap()
        .unwrap();

    assert_eq!(updated.const_start_date, None);
    assert_eq!(updated.remarks.as_deref(), Some("partial"));
    assert_eq!(updated.permit_closeout, Some(true));
    assert_eq!(updated.latitude, Some(40.7));
    assert_eq!(updated.longitude, Some(-74.1));
    assert_eq!(updated.project_status, Some(ProjectStatus::Completed));
    assert!(updated.updated_at >= created.updated_at);
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn update_missing_row_is_none(pool: PgPool) {
    let store = PgProjectStore::new(pool);
    assert!(store.update(9999, input("P-5")).await.unwrap().is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn aggregates_match_rows(pool: PgPool) {
    let store = PgProjectStore::new(pool);
    store.create(complete("P-6")).await.unwrap();
    store.create(input("P-7")).await.unwrap();
    store
        .create(ProjectInput {
            project_type: ProjectType::Gas,
            const_start_date: day(3, 1),
            ..input("G-1")
        })
        .await
        .unwrap();

    let summary = store.summary().await.unwrap();
    assert_eq!(summary.total_permit, 2);
    assert_eq!(summary.total_emergency, 1);
    assert_eq!(summary.completed_constructions, 1);
    assert_eq!(summary.completed_restorations, 1);

    let types: Vec<(ProjectType, i64)> = store
        .count_by_type()
        .await
        .unwrap()
        .into_iter()
        .map(|t| (t.project_type, t.count))
        .collect();
    assert_eq!(types, vec![(ProjectType::Gas, 1), (ProjectType::Permit, 2)]);

    let from = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let to = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
    let starts = store
        .find_by_date_range(DateField::ConstStart, from, to)
        .await
        .unwrap();
    let permits: Vec<&str> = starts.iter().map(|p| p.permit_no.as_str()).collect();
    assert_eq!(permits, vec!["P-6", "G-1"]);
}
