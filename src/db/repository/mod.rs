//! Repository trait definitions for the persistence and reference boundary.
//!
//! Responsibilities are split across focused traits so implementations stay
//! small and testable:
//!
//! - [`error`]: Error types for repository operations
//! - [`schedule`]: The saved-schedule collection (upsert, fetch, list)
//! - [`reference`]: Read-only faculty/subject/classroom reference data
//!
//! # Convenience Trait Bound
//!
//! For code that needs the whole boundary, use the [`Repository`] bound:
//!
//! ```ignore
//! fn build_engine<R: Repository + 'static>(repo: Arc<R>) -> ScheduleEngine {
//!     ScheduleEngine::new(repo.clone(), repo)
//! }
//! ```

pub mod error;
pub mod reference;
pub mod schedule;

// Re-export error types
pub use error::{RepositoryError, RepositoryResult};

// Re-export all traits
pub use reference::ReferenceSource;
pub use schedule::{ScheduleInfo, ScheduleStore};

/// Composite trait bound for a complete repository implementation.
///
/// Automatically implemented for any type implementing both boundary traits.
pub trait Repository: ScheduleStore + ReferenceSource {}

// Blanket implementation: implementing both traits implies Repository.
impl<T> Repository for T where T: ScheduleStore + ReferenceSource {}
