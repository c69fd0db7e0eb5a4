//! Saved-schedule store trait.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::error::RepositoryResult;
use crate::models::{Schedule, ScheduleId};

/// Lightweight listing entry for a stored schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleInfo {
    pub schedule_id: ScheduleId,
    pub name: String,
    pub checksum: String,
    pub is_published: bool,
}

/// Repository trait for the saved-schedule collection.
///
/// The collection is append/replace-only: storing under an existing id
/// replaces that entry, and no operation exposes deletion.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to work with async Rust.
#[async_trait]
pub trait ScheduleStore: Send + Sync {
    /// Check that the backing store is reachable.
    ///
    /// # Returns
    /// - `Ok(true)` if the store is healthy
    /// - `Ok(false)` if unhealthy but no error occurred
    /// - `Err(RepositoryError)` if the check itself failed
    async fn health_check(&self) -> RepositoryResult<bool>;

    /// Store a schedule snapshot under its id (upsert).
    ///
    /// `checksum` is the content hash used for deduplication: when a
    /// different entry already carries the same checksum, implementations
    /// replace that entry instead of appending a duplicate.
    ///
    /// # Returns
    /// * `Ok(ScheduleInfo)` - Listing entry for the stored schedule
    /// * `Err(RepositoryError)` - If the operation fails
    async fn store_schedule(
        &self,
        schedule: &Schedule,
        checksum: &str,
    ) -> RepositoryResult<ScheduleInfo>;

    /// Retrieve a stored schedule by id.
    ///
    /// # Returns
    /// * `Ok(Schedule)` - The complete stored snapshot
    /// * `Err(RepositoryError::NotFound)` - If no entry has this id
    async fn fetch_schedule(&self, schedule_id: &ScheduleId) -> RepositoryResult<Schedule>;

    /// List stored schedules in storage order.
    async fn list_schedules(&self) -> RepositoryResult<Vec<ScheduleInfo>>;

    /// True when an entry with this id is stored.
    async fn has_schedule(&self, schedule_id: &ScheduleId) -> RepositoryResult<bool>;
}
