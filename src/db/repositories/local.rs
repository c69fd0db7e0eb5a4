//! In-memory local repository implementation.
//!
//! Stores everything in process memory behind a single lock, giving fast,
//! deterministic, isolated execution. This is the default backend for unit
//! tests, demos, and single-session use; the surrounding application swaps in
//! a remote-backed implementation through the same traits.

use std::sync::Arc;

use async_trait::async_trait;
use log::info;
use parking_lot::RwLock;

use crate::db::checksum::schedule_checksum;
use crate::db::repository::{
    ReferenceSource, RepositoryError, RepositoryResult, ScheduleInfo, ScheduleStore,
};
use crate::models::{Classroom, Faculty, ReferenceData, Schedule, ScheduleId, Subject};

/// In-memory repository for saved schedules and reference data.
#[derive(Clone)]
pub struct LocalRepository {
    data: Arc<RwLock<LocalData>>,
}

struct StoredSchedule {
    schedule: Schedule,
    checksum: String,
}

struct LocalData {
    /// Insertion-ordered so listings are stable.
    schedules: Vec<StoredSchedule>,
    reference: ReferenceData,
    is_healthy: bool,
}

impl Default for LocalData {
    fn default() -> Self {
        Self {
            schedules: Vec::new(),
            reference: ReferenceData::default(),
            is_healthy: true,
        }
    }
}

impl LocalRepository {
    /// Create a new empty local repository.
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(LocalData::default())),
        }
    }

    /// Seed the reference collections, replacing whatever was there.
    pub fn set_reference_data(&self, reference: ReferenceData) {
        self.data.write().reference = reference;
    }

    /// Builder-style variant of [`Self::set_reference_data`].
    pub fn with_reference_data(self, reference: ReferenceData) -> Self {
        self.set_reference_data(reference);
        self
    }

    /// Pre-load a saved schedule, computing its checksum. Used when
    /// re-hydrating from a persisted snapshot.
    pub fn seed_schedule(&self, schedule: Schedule) {
        let checksum = schedule_checksum(&schedule);
        self.data
            .write()
            .schedules
            .push(StoredSchedule { schedule, checksum });
    }

    /// Set the health status, for exercising connection-failure paths.
    pub fn set_healthy(&self, healthy: bool) {
        self.data.write().is_healthy = healthy;
    }

    /// Number of schedules stored.
    pub fn schedule_count(&self) -> usize {
        self.data.read().schedules.len()
    }

    fn check_health(&self) -> RepositoryResult<()> {
        if !self.data.read().is_healthy {
            return Err(RepositoryError::ConnectionError(
                "Repository is not reachable".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for LocalRepository {
    fn default() -> Self {
        Self::new()
    }
}

fn info_for(entry: &StoredSchedule) -> ScheduleInfo {
    ScheduleInfo {
        schedule_id: entry.schedule.id.clone(),
        name: entry.schedule.name.clone(),
        checksum: entry.checksum.clone(),
        is_published: entry.schedule.is_published,
    }
}

#[async_trait]
impl ScheduleStore for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(self.data.read().is_healthy)
    }

    async fn store_schedule(
        &self,
        schedule: &Schedule,
        checksum: &str,
    ) -> RepositoryResult<ScheduleInfo> {
        self.check_health()?;

        let mut data = self.data.write();

        // Upsert by id first; otherwise replace a content-identical entry
        // instead of appending a duplicate.
        if let Some(existing) = data
            .schedules
            .iter_mut()
            .find(|s| s.schedule.id == schedule.id)
        {
            existing.schedule = schedule.clone();
            existing.checksum = checksum.to_string();
            return Ok(info_for(existing));
        }

        if let Some(existing) = data.schedules.iter_mut().find(|s| s.checksum == checksum) {
            info!(
                "schedule {} has identical content to stored {}; replacing",
                schedule.id, existing.schedule.id
            );
            existing.schedule = schedule.clone();
            return Ok(info_for(existing));
        }

        let entry = StoredSchedule {
            schedule: schedule.clone(),
            checksum: checksum.to_string(),
        };
        let info = info_for(&entry);
        data.schedules.push(entry);
        Ok(info)
    }

    async fn fetch_schedule(&self, schedule_id: &ScheduleId) -> RepositoryResult<Schedule> {
        self.check_health()?;

        self.data
            .read()
            .schedules
            .iter()
            .find(|s| &s.schedule.id == schedule_id)
            .map(|s| s.schedule.clone())
            .ok_or_else(|| {
                RepositoryError::NotFound(format!("Schedule {} not found", schedule_id))
            })
    }

    async fn list_schedules(&self) -> RepositoryResult<Vec<ScheduleInfo>> {
        self.check_health()?;
        Ok(self.data.read().schedules.iter().map(info_for).collect())
    }

    async fn has_schedule(&self, schedule_id: &ScheduleId) -> RepositoryResult<bool> {
        self.check_health()?;
        Ok(self
            .data
            .read()
            .schedules
            .iter()
            .any(|s| &s.schedule.id == schedule_id))
    }
}

#[async_trait]
impl ReferenceSource for LocalRepository {
    async fn fetch_faculties(&self) -> RepositoryResult<Vec<Faculty>> {
        self.check_health()?;
        Ok(self.data.read().reference.faculties.clone())
    }

    async fn fetch_subjects(&self) -> RepositoryResult<Vec<Subject>> {
        self.check_health()?;
        Ok(self.data.read().reference.subjects.clone())
    }

    async fn fetch_classrooms(&self) -> RepositoryResult<Vec<Classroom>> {
        self.check_health()?;
        Ok(self.data.read().reference.classrooms.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ScheduleStats;
    use chrono::Utc;

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
    async fn health_check_toggles() {
        let repo = LocalRepository::new();
        assert!(repo.health_check().await.unwrap());

        repo.set_healthy(false);
        assert!(!repo.health_check().await.unwrap());
        assert!(matches!(
            repo.list_schedules().await,
            Err(RepositoryError::ConnectionError(_))
        ));
    }

    #[tokio::test]
    async fn store_and_retrieve_round_trip() {
        let repo = LocalRepository::new();
        let stored = schedule("Term 1");

        let info = repo
            .store_schedule(&stored, &schedule_checksum(&stored))
            .await
            .unwrap();
        assert_eq!(info.schedule_id, stored.id);
        assert_eq!(info.name, "Term 1");

        let fetched = repo.fetch_schedule(&stored.id).await.unwrap();
        assert_eq!(fetched.name, stored.name);
        assert!(repo.has_schedule(&stored.id).await.unwrap());
    }

    #[tokio::test]
    async fn storing_same_id_replaces() {
        let repo = LocalRepository::new();
        let mut stored = schedule("Before");
        repo.store_schedule(&stored, "sum-1").await.unwrap();

        stored.name = "After".to_string();
        repo.store_schedule(&stored, "sum-2").await.unwrap();

        assert_eq!(repo.schedule_count(), 1);
        assert_eq!(repo.fetch_schedule(&stored.id).await.unwrap().name, "After");
    }

    #[tokio::test]
    async fn identical_content_is_deduplicated() {
        let repo = LocalRepository::new();
        let first = schedule("Term 1");
        let second = schedule("Term 1"); // different id, same content

        let checksum = schedule_checksum(&first);
        repo.store_schedule(&first, &checksum).await.unwrap();
        repo.store_schedule(&second, &checksum).await.unwrap();

        assert_eq!(repo.schedule_count(), 1);
        // The dedup replaced the entry's schedule with the newer copy.
        let listing = repo.list_schedules().await.unwrap();
        assert_eq!(listing[0].schedule_id, second.id);
    }

    #[tokio::test]
    async fn missing_schedule_is_not_found() {
        let repo = LocalRepository::new();
        let result = repo.fetch_schedule(&"missing".into()).await;
        assert!(matches!(result, Err(RepositoryError::NotFound(_))));
        assert!(!repo.has_schedule(&"missing".into()).await.unwrap());
    }

    #[tokio::test]
    async fn reference_data_round_trip() {
        let repo = LocalRepository::new().with_reference_data(ReferenceData {
            faculties: vec![Faculty {
                id: "f1".into(),
                name: "Dr. Smith".to_string(),
                email: None,
                subjects: vec![],
                max_hours_per_day: 6.0,
                max_hours_per_week: 20.0,
                availability: vec![],
            }],
            subjects: vec![],
            classrooms: vec![],
        });

        let faculties = repo.fetch_faculties().await.unwrap();
        assert_eq!(faculties.len(), 1);
        assert!(repo.fetch_subjects().await.unwrap().is_empty());
        assert!(repo.fetch_classrooms().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn seeded_schedules_are_listed() {
        let repo = LocalRepository::new();
        repo.seed_schedule(schedule("Hydrated"));

        let listing = repo.list_schedules().await.unwrap();
        assert_eq!(listing.len(), 1);
        assert_eq!(listing[0].name, "Hydrated");
    }
}
