//! Persistence and reference-data boundary.
//!
//! The engine never talks to storage directly; it goes through the Repository
//! pattern so backends can be swapped without touching scheduling logic.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  Application layer (UI store, persistence adapter)      │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  ScheduleEngine - lifecycle + recomputation             │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Repository traits (repository/) - abstract interface   │
//! │  - ScheduleStore (saved-schedule collection)            │
//! │  - ReferenceSource (faculty/subject/classroom data)     │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//!     ┌───────────────▼──────────────────────────────┐
//!     │             Local Repository                  │
//!     │               (in-memory)                     │
//!     └──────────────────────────────────────────────┘
//! ```
//!
//! [`snapshot::PersistedState`] is the serialized subset the application
//! stores between sessions; it is re-validated as untrusted input on load.

pub mod checksum;
pub mod repositories;
pub mod repository;
pub mod snapshot;

pub use checksum::schedule_checksum;
pub use repositories::LocalRepository;
pub use repository::{
    ReferenceSource, Repository, RepositoryError, RepositoryResult, ScheduleInfo, ScheduleStore,
};
pub use snapshot::PersistedState;
