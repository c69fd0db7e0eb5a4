//! Reference-data boundary trait.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::models::{Classroom, Faculty, Subject};

/// Read-only source of faculty, subject, and classroom reference data.
///
/// In production this fronts the remote service that owns these records; the
/// engine only reads them, as context for display denormalization and
/// capacity figures.
#[async_trait]
pub trait ReferenceSource: Send + Sync {
    async fn fetch_faculties(&self) -> RepositoryResult<Vec<Faculty>>;

    async fn fetch_subjects(&self) -> RepositoryResult<Vec<Subject>>;

    async fn fetch_classrooms(&self) -> RepositoryResult<Vec<Classroom>>;
}
