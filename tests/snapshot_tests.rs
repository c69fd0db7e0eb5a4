//! Persisted-snapshot round trips through the filesystem and back into a
//! running engine.

use std::sync::Arc;

use chrono::Utc;
use smart_scheduler::db::{LocalRepository, PersistedState};
use smart_scheduler::engine::ScheduleEngine;
use smart_scheduler::models::{
    Assignment, Classroom, Constraint, ConstraintPriority, ConstraintRule, Day, Faculty, Schedule,
    ScheduleId, ScheduleStats, Subject,
};

fn booking(id: &str, start: &str, end: &str) -> Assignment {
    Assignment::new(
        id.into(),
        "f1".into(),
        "s1".into(),
        "c1".into(),
        Day::Monday,
        start.parse().unwrap(),
        end.parse().unwrap(),
    )
    .unwrap()
}

fn sample_state() -> PersistedState {
    PersistedState {
        saved_schedules: vec![Schedule {
            id: ScheduleId::new("sch-1"),
            name: "Autumn Term".to_string(),
            description: None,
            assignments: vec![booking("a1", "09:00", "11:00")],
            conflicts: vec![],
            stats: ScheduleStats::default(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
            is_published: false,
        }],
        faculties: vec![Faculty {
            id: "f1".into(),
            name: "Dr. Smith".to_string(),
            email: None,
            subjects: vec!["s1".into()],
            max_hours_per_day: 6.0,
            max_hours_per_week: 20.0,
            availability: vec![],
        }],
        subjects: vec![Subject {
            id: "s1".into(),
            name: "Algorithms".to_string(),
            description: None,
            total_hours: 48.0,
            sessions_per_week: 2,
            session_duration_minutes: 120,
            preferred_classroom_ids: vec![],
            allow_consecutive: false,
        }],
        classrooms: vec![Classroom {
            id: "c1".into(),
            name: "Room 101".to_string(),
            building: None,
            floor: None,
            capacity: 40,
            resources: vec![],
        }],
        constraints: vec![Constraint::new(
            ConstraintRule::PreferredDayPattern {
                days: Day::WEEKDAYS.to_vec(),
            },
            ConstraintPriority::Soft,
        )],
    }
}

#[test]
fn file_round_trip_preserves_content() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");

    let state = sample_state();
    state.save(&path).unwrap();
    let loaded = PersistedState::load(&path).unwrap();

    assert_eq!(loaded.saved_schedules.len(), 1);
    assert_eq!(loaded.saved_schedules[0].name, "Autumn Term");
    assert_eq!(loaded.faculties.len(), 1);
    assert_eq!(loaded.subjects.len(), 1);
    assert_eq!(loaded.classrooms.len(), 1);
    assert_eq!(loaded.constraints.len(), 1);

    // Derived views were recomputed on load.
    let schedule = &loaded.saved_schedules[0];
    assert_eq!(schedule.stats.total_assignments, 1);
    // s1 requires 4h/week, 2h assigned.
    assert!((schedule.stats.unassigned_hours - 2.0).abs() < 1e-9);
}

#[test]
fn missing_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(PersistedState::load(&dir.path().join("absent.json")).is_err());
}

#[tokio::test]
async fn snapshot_hydrates_engine_and_repository() {
    let state = sample_state();

    let repo = LocalRepository::new();
    state.seed_repository(&repo);

    let engine = ScheduleEngine::new(Arc::new(repo.clone()), Arc::new(repo));
    engine.hydrate(&state);

    // Reference data and constraints are in force.
    assert_eq!(engine.reference_data().faculties.len(), 1);
    assert_eq!(engine.constraints().len(), 1);

    // The persisted schedule is loadable and intact.
    let loaded = engine.load_schedule(&ScheduleId::new("sch-1")).await.unwrap();
    assert_eq!(loaded.name, "Autumn Term");
    assert_eq!(loaded.stats.total_assignments, 1);

    // New assignments denormalize against the hydrated reference data.
    let next = engine
        .add_assignment(
            Assignment::new(
                "a2".into(),
                "f1".into(),
                "s1".into(),
                "c1".into(),
                Day::Tuesday,
                "09:00".parse().unwrap(),
                "11:00".parse().unwrap(),
            )
            .unwrap(),
        )
        .unwrap();
    let added = next.assignment(&"a2".into()).unwrap();
    assert_eq!(added.faculty_name.as_deref(), Some("Dr. Smith"));
}
