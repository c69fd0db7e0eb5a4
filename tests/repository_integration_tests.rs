//! Integration tests for repository implementations.

use std::sync::Arc;

use chrono::Utc;
use smart_scheduler::db::{
    schedule_checksum, LocalRepository, ReferenceSource, RepositoryError, ScheduleStore,
};
use smart_scheduler::models::{
    Assignment, Day, Faculty, ReferenceData, Schedule, ScheduleId, ScheduleStats,
};

fn schedule(name: &str) -> Schedule {
    Schedule {
        id: ScheduleId::random(),
        name: name.to_string(),
        description: None,
        assignments: vec![],
        conflicts: vec![],
        stats: ScheduleStats::default(),
        created_at: Utc::now(),
        updated_at: Utc::now(),
        is_published: false,
    }
}

#[tokio::test]
async fn health_check_through_trait_object() {
    let repo: Arc<dyn ScheduleStore> = Arc::new(LocalRepository::new());
    let result = repo.health_check().await;
    assert!(result.is_ok());
    assert!(result.unwrap());
}

#[tokio::test]
async fn store_and_retrieve_schedule() {
    let repo = LocalRepository::new();

    let mut stored = schedule("Integration Test Schedule");
    stored.assignments.push(
        Assignment::new(
            "a1".into(),
            "f1".into(),
            "s1".into(),
            "c1".into(),
            Day::Wednesday,
            "09:00".parse().unwrap(),
            "10:00".parse().unwrap(),
        )
        .unwrap(),
    );

    let checksum = schedule_checksum(&stored);
    let info = repo.store_schedule(&stored, &checksum).await.unwrap();
    assert_eq!(info.schedule_id, stored.id);
    assert_eq!(info.checksum, checksum);

    let retrieved = repo.fetch_schedule(&stored.id).await.unwrap();
    assert_eq!(retrieved.name, stored.name);
    assert_eq!(retrieved.assignments.len(), 1);
}

#[tokio::test]
async fn list_preserves_storage_order() {
    let repo = LocalRepository::new();

    for i in 1..=3 {
        let entry = schedule(&format!("Schedule {}", i));
        repo.store_schedule(&entry, &schedule_checksum(&entry))
            .await
            .unwrap();
    }

    let schedules = repo.list_schedules().await.unwrap();
    assert_eq!(schedules.len(), 3);
    let names: Vec<&str> = schedules.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, ["Schedule 1", "Schedule 2", "Schedule 3"]);
}

#[tokio::test]
async fn unknown_id_yields_not_found() {
    let repo = LocalRepository::new();
    let result = repo.fetch_schedule(&"nope".into()).await;
    assert!(matches!(result, Err(RepositoryError::NotFound(_))));
}

#[tokio::test]
async fn unhealthy_repository_rejects_operations() {
    let repo = LocalRepository::new();
    repo.set_healthy(false);

    let entry = schedule("Unreachable");
    let result = repo.store_schedule(&entry, "sum").await;
    assert!(matches!(result, Err(RepositoryError::ConnectionError(_))));

    let result = repo.fetch_faculties().await;
    assert!(matches!(result, Err(RepositoryError::ConnectionError(_))));

    repo.set_healthy(true);
    assert!(repo.store_schedule(&entry, "sum").await.is_ok());
}

#[tokio::test]
async fn reference_source_round_trip() {
    let repo = LocalRepository::new().with_reference_data(ReferenceData {
        faculties: vec![Faculty {
            id: "f1".into(),
            name: "Dr. Smith".to_string(),
            email: Some("smith@example.edu".to_string()),
            subjects: vec!["s1".into()],
            max_hours_per_day: 6.0,
            max_hours_per_week: 18.0,
            availability: vec![],
        }],
        subjects: vec![],
        classrooms: vec![],
    });

    let source: Arc<dyn ReferenceSource> = Arc::new(repo);
    let faculties = source.fetch_faculties().await.unwrap();
    assert_eq!(faculties.len(), 1);
    assert_eq!(faculties[0].name, "Dr. Smith");
}
