//! # Smart Scheduler
//!
//! Conflict-detection and statistics engine for institutional timetables.
//!
//! The crate holds a collection of scheduled class assignments (faculty ×
//! subject × classroom × time slot) and keeps two derived views correct at
//! all times: the set of scheduling conflicts, and aggregate utilization
//! statistics per faculty and per classroom. A schedule moves from a mutable
//! draft to a published state only when it is conflict-free.
//!
//! ## Architecture
//!
//! The crate is organized into several logical modules:
//!
//! - [`models`]: Domain types: days, times, slot grids, assignments,
//!   schedules, reference data, typed constraints
//! - [`algorithms`]: Pure computations: sweep-line conflict detection,
//!   utilization statistics, constraint evaluation
//! - [`engine`]: The lifecycle state machine owning the current snapshot
//! - [`db`]: Repository traits, the in-memory backend, and the persisted
//!   snapshot subset
//! - [`config`]: TOML-backed engine configuration
//!
//! Generating an optimal timetable is explicitly out of scope: the engine
//! verifies and aggregates candidate schedules, and generation is a seam
//! ([`engine::AssignmentGenerator`]) the application fills in, typically with
//! an external solver.
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use smart_scheduler::db::LocalRepository;
//! use smart_scheduler::engine::ScheduleEngine;
//! use smart_scheduler::models::{Assignment, Day};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let repo = LocalRepository::new();
//! let engine = ScheduleEngine::new(Arc::new(repo.clone()), Arc::new(repo));
//!
//! let schedule = engine.add_assignment(Assignment::new(
//!     "a1".into(),
//!     "f1".into(),
//!     "s1".into(),
//!     "c1".into(),
//!     Day::Monday,
//!     "09:00".parse()?,
//!     "11:00".parse()?,
//! )?)?;
//! assert!(schedule.conflicts.is_empty());
//!
//! let published = engine.publish_schedule(&schedule.id).await?;
//! assert!(published.is_published);
//! # Ok(())
//! # }
//! ```

pub mod algorithms;
pub mod config;
pub mod db;
pub mod engine;
pub mod models;

pub use engine::{EngineError, ScheduleEngine};
