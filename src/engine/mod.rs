//! The schedule lifecycle engine.
//!
//! [`ScheduleEngine`] owns the current [`Schedule`] snapshot and the door to
//! the repository boundary. Every mutation builds a brand-new snapshot with
//! freshly recomputed conflicts and statistics and swaps it in atomically, so
//! readers always observe a whole, consistent schedule.
//!
//! # State machine
//!
//! ```text
//! Empty --add_assignment / generate--> Draft
//! Draft --mutate--> Draft (recomputation only)
//! Draft --publish (guard: zero conflicts)--> Published
//! Published --mutate, still conflict-free--> Published
//! Published --mutate, conflicts reintroduced--> Draft (is_published reverts)
//! ```
//!
//! Mutations are synchronous and CPU-bound. Lifecycle operations
//! (generate / save / load / publish / reference refresh) are async, reach
//! the repository boundary, and are serialized on an internal gate so a save
//! in flight can never observe a half-updated schedule.

pub mod generator;

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use log::{debug, info, warn};
use parking_lot::RwLock;
use tokio::sync::Mutex;
use tokio::time::timeout;

use crate::algorithms::{
    check_constraints, compute_stats, detect_conflicts, CapacityModel, ConstraintViolation,
};
use crate::config::EngineConfig;
use crate::db::repository::{
    ReferenceSource, RepositoryError, RepositoryResult, ScheduleInfo, ScheduleStore,
};
use crate::db::{schedule_checksum, PersistedState};
use crate::models::{
    Assignment, AssignmentError, AssignmentId, AssignmentPatch, Constraint, ConstraintId,
    ConstraintSet, ReferenceData, Schedule, ScheduleId, ScheduleStats, TimeSlot,
};

pub use generator::{AssignmentGenerator, SampleGenerator};

/// Error surfaced by engine operations.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Malformed assignment data: inverted interval, missing id, duplicate id.
    #[error("validation error: {0}")]
    Validation(String),

    /// Load or update target does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Publish guard failure: the schedule still has conflicts.
    #[error("cannot publish: {0} unresolved conflict(s)")]
    ConflictsPresent(usize),

    /// Publish id does not match the current schedule.
    #[error("invalid publish target: {0}")]
    InvalidTarget(String),

    /// Repository boundary failure. The previous schedule state is intact.
    #[error("upstream failure: {0}")]
    Upstream(#[source] RepositoryError),

    /// A repository call exceeded the configured deadline.
    #[error("lifecycle operation timed out after {0:?}")]
    Timeout(Duration),

    /// A lifecycle operation is in flight; the mutation was rejected rather
    /// than allowed to interleave with it.
    #[error("a lifecycle operation is in flight")]
    Busy,
}

impl From<AssignmentError> for EngineError {
    fn from(e: AssignmentError) -> Self {
        EngineError::Validation(e.to_string())
    }
}

impl From<RepositoryError> for EngineError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::NotFound(message) => EngineError::NotFound(message),
            other => EngineError::Upstream(other),
        }
    }
}

/// Owns the current schedule and drives its lifecycle.
///
/// One engine instance per session/process; collaborators are injected, there
/// is no ambient global.
pub struct ScheduleEngine {
    current: RwLock<Option<Schedule>>,
    reference: RwLock<ReferenceData>,
    constraints: RwLock<ConstraintSet>,
    /// Serializes lifecycle operations so at most one is in flight.
    lifecycle_gate: Mutex<()>,
    store: Arc<dyn ScheduleStore>,
    reference_source: Arc<dyn ReferenceSource>,
    generator: Box<dyn AssignmentGenerator>,
    capacity: CapacityModel,
    slots: Vec<TimeSlot>,
    io_timeout: Duration,
}

impl ScheduleEngine {
    /// Create an engine with default configuration.
    pub fn new(store: Arc<dyn ScheduleStore>, reference_source: Arc<dyn ReferenceSource>) -> Self {
        Self::with_config(store, reference_source, EngineConfig::default())
    }

    /// Create an engine with explicit configuration.
    pub fn with_config(
        store: Arc<dyn ScheduleStore>,
        reference_source: Arc<dyn ReferenceSource>,
        config: EngineConfig,
    ) -> Self {
        Self {
            current: RwLock::new(None),
            reference: RwLock::new(ReferenceData::default()),
            constraints: RwLock::new(ConstraintSet::default()),
            lifecycle_gate: Mutex::new(()),
            store,
            reference_source,
            generator: Box::new(SampleGenerator),
            capacity: config.capacity.capacity_model(),
            slots: config.slots.generate(),
            io_timeout: config.lifecycle.io_timeout(),
        }
    }

    /// Replace the generation seam (builder style).
    pub fn with_generator(mut self, generator: Box<dyn AssignmentGenerator>) -> Self {
        self.generator = generator;
        self
    }

    /// Adopt reference data and constraints from a persisted snapshot.
    ///
    /// Saved schedules re-enter through the injected store; see
    /// [`PersistedState::seed_repository`].
    pub fn hydrate(&self, state: &PersistedState) {
        *self.reference.write() = state.reference_data();
        *self.constraints.write() = ConstraintSet::new(state.constraints.clone());
    }

    // ==================== Snapshot accessors ====================

    /// The current schedule as a whole snapshot clone, if one exists.
    pub fn current_schedule(&self) -> Option<Schedule> {
        self.current.read().clone()
    }

    /// The reference collections currently held as lookup context.
    pub fn reference_data(&self) -> ReferenceData {
        self.reference.read().clone()
    }

    /// The generated slot grid.
    pub fn time_slots(&self) -> &[TimeSlot] {
        &self.slots
    }

    // ==================== Mutations (synchronous) ====================

    /// Add an assignment to the current schedule, creating a fresh draft when
    /// none exists.
    ///
    /// # Returns
    /// * `Ok(Schedule)` - The new snapshot
    /// * `Err(EngineError::Validation)` - Inverted interval, missing or
    ///   duplicate id; start/end are never silently swapped
    pub fn add_assignment(&self, assignment: Assignment) -> Result<Schedule, EngineError> {
        let _gate = self.mutation_gate()?;
        assignment.validate()?;

        let mut assignment = assignment;
        assignment.denormalize(&self.reference.read());

        let mut current = self.current.write();
        let next = match current.as_ref() {
            None => self.new_draft("New Schedule", vec![assignment]),
            Some(schedule) => {
                if schedule.assignment(&assignment.id).is_some() {
                    return Err(EngineError::Validation(format!(
                        "assignment id {} already present",
                        assignment.id
                    )));
                }
                let mut assignments = schedule.assignments.clone();
                assignments.push(assignment);
                self.recompute(schedule, assignments)
            }
        };

        debug!(
            "add_assignment: {} assignments, {} conflicts",
            next.assignments.len(),
            next.conflicts.len()
        );
        *current = Some(next.clone());
        Ok(next)
    }

    /// Remove an assignment by id.
    ///
    /// Removing from a non-existent schedule or an unknown id is a no-op, not
    /// an error. A schedule emptied by removal stays a draft. Returns the
    /// current snapshot, `Ok(None)` when no schedule exists.
    pub fn remove_assignment(&self, id: &AssignmentId) -> Result<Option<Schedule>, EngineError> {
        let _gate = self.mutation_gate()?;
        let mut current = self.current.write();
        let schedule = match current.as_ref() {
            Some(schedule) => schedule,
            None => return Ok(None),
        };

        if schedule.assignment(id).is_none() {
            return Ok(current.clone());
        }

        let assignments: Vec<Assignment> = schedule
            .assignments
            .iter()
            .filter(|a| &a.id != id)
            .cloned()
            .collect();
        let next = self.recompute(schedule, assignments);
        *current = Some(next.clone());
        Ok(Some(next))
    }

    /// Merge a patch into an existing assignment. The id is immutable; the
    /// merged record is re-validated before anything is replaced.
    pub fn update_assignment(
        &self,
        id: &AssignmentId,
        patch: &AssignmentPatch,
    ) -> Result<Schedule, EngineError> {
        let _gate = self.mutation_gate()?;
        let mut current = self.current.write();
        let next = {
            let schedule = current
                .as_ref()
                .ok_or_else(|| EngineError::NotFound("no current schedule".to_string()))?;
            let index = schedule
                .assignments
                .iter()
                .position(|a| &a.id == id)
                .ok_or_else(|| EngineError::NotFound(format!("assignment {} not found", id)))?;

            let mut updated = patch.apply(&schedule.assignments[index])?;
            updated.denormalize(&self.reference.read());

            let mut assignments = schedule.assignments.clone();
            assignments[index] = updated;
            self.recompute(schedule, assignments)
        };

        *current = Some(next.clone());
        Ok(next)
    }

    // ==================== Lifecycle operations (async) ====================

    /// Replace the current schedule outright with a freshly generated draft.
    pub async fn generate_schedule(&self) -> Result<Schedule, EngineError> {
        let _gate = self.lifecycle_gate.lock().await;

        let assignments = {
            let reference = self.reference.read();
            self.generator.generate(&reference, &self.slots)
        };
        for assignment in &assignments {
            assignment.validate()?;
        }

        let next = self.new_draft("Generated Schedule", assignments);
        info!(
            "generated schedule {} with {} assignments",
            next.id,
            next.assignments.len()
        );
        *self.current.write() = Some(next.clone());
        Ok(next)
    }

    /// Copy the current schedule into the saved collection under the given
    /// name. The current snapshot itself is unchanged.
    pub async fn save_schedule(
        &self,
        name: &str,
        description: Option<&str>,
    ) -> Result<ScheduleInfo, EngineError> {
        let _gate = self.lifecycle_gate.lock().await;

        let mut copy = self
            .current_schedule()
            .ok_or_else(|| EngineError::NotFound("no current schedule to save".to_string()))?;
        copy.name = name.to_string();
        copy.description = description.map(str::to_string);
        copy.updated_at = Utc::now();

        let checksum = schedule_checksum(&copy);
        info!("saving schedule '{}' ({})", copy.name, copy.id);
        self.store_call(self.store.store_schedule(&copy, &checksum))
            .await
    }

    /// Make a saved schedule current.
    ///
    /// Loaded data is untrusted: assignment invariants are re-validated and
    /// derived views recomputed before the snapshot is adopted. Fails with
    /// `NotFound` when no saved entry matches.
    pub async fn load_schedule(&self, id: &ScheduleId) -> Result<Schedule, EngineError> {
        let _gate = self.lifecycle_gate.lock().await;

        let loaded = self.store_call(self.store.fetch_schedule(id)).await?;
        for assignment in &loaded.assignments {
            assignment.validate()?;
        }

        let assignments = loaded.assignments.clone();
        let mut next = self.recompute(&loaded, assignments);
        // Loading edits nothing; keep the stored modification stamp.
        next.updated_at = loaded.updated_at;

        info!(
            "loaded schedule {} ({} assignments, {} conflicts)",
            next.id,
            next.assignments.len(),
            next.conflicts.len()
        );
        *self.current.write() = Some(next.clone());
        Ok(next)
    }

    /// Publish the current schedule.
    ///
    /// # Returns
    /// * `Err(EngineError::InvalidTarget)` - `id` is not the current schedule
    /// * `Err(EngineError::ConflictsPresent)` - conflicts are unresolved
    /// * `Ok(Schedule)` - the published snapshot; the saved entry, when one
    ///   exists, mirrors the change
    pub async fn publish_schedule(&self, id: &ScheduleId) -> Result<Schedule, EngineError> {
        let _gate = self.lifecycle_gate.lock().await;

        let published = {
            let current = self.current.read();
            let schedule = current
                .as_ref()
                .ok_or_else(|| EngineError::InvalidTarget("no current schedule".to_string()))?;
            if schedule.id != *id {
                return Err(EngineError::InvalidTarget(format!(
                    "schedule {} is not the current schedule",
                    id
                )));
            }
            if schedule.has_conflicts() {
                return Err(EngineError::ConflictsPresent(schedule.conflicts.len()));
            }

            let mut published = schedule.clone();
            published.is_published = true;
            published.updated_at = Utc::now();
            published
        };

        // Mirror into the saved collection first; an upstream failure must
        // leave the current snapshot untouched.
        if self.store_call(self.store.has_schedule(id)).await? {
            let checksum = schedule_checksum(&published);
            self.store_call(self.store.store_schedule(&published, &checksum))
                .await?;
        }

        info!("published schedule {}", id);
        *self.current.write() = Some(published.clone());
        Ok(published)
    }

    /// Refresh faculty/subject/classroom context from the reference boundary.
    ///
    /// On failure the previously held reference data is unchanged.
    pub async fn load_reference_data(&self) -> Result<ReferenceData, EngineError> {
        let _gate = self.lifecycle_gate.lock().await;

        let faculties = self
            .store_call(self.reference_source.fetch_faculties())
            .await?;
        let subjects = self
            .store_call(self.reference_source.fetch_subjects())
            .await?;
        let classrooms = self
            .store_call(self.reference_source.fetch_classrooms())
            .await?;

        let reference = ReferenceData {
            faculties,
            subjects,
            classrooms,
        };
        info!(
            "loaded reference data: {} faculties, {} subjects, {} classrooms",
            reference.faculties.len(),
            reference.subjects.len(),
            reference.classrooms.len()
        );
        *self.reference.write() = reference.clone();
        Ok(reference)
    }

    /// List the saved collection.
    pub async fn list_saved_schedules(&self) -> Result<Vec<ScheduleInfo>, EngineError> {
        self.store_call(self.store.list_schedules()).await
    }

    // ==================== Constraints ====================

    pub fn add_constraint(&self, constraint: Constraint) {
        self.constraints.write().add(constraint);
    }

    pub fn remove_constraint(&self, id: &ConstraintId) -> bool {
        self.constraints.write().remove(id)
    }

    pub fn toggle_constraint(&self, id: &ConstraintId) -> bool {
        self.constraints.write().toggle(id)
    }

    pub fn constraints(&self) -> ConstraintSet {
        self.constraints.read().clone()
    }

    /// Evaluate the enabled constraints against the current assignments.
    ///
    /// Advisory only: violations never gate publishing, which is guarded by
    /// double-booking conflicts alone.
    pub fn check_constraints(&self) -> Vec<ConstraintViolation> {
        let current = self.current.read();
        let assignments = current
            .as_ref()
            .map(|s| s.assignments.as_slice())
            .unwrap_or(&[]);
        check_constraints(assignments, &self.constraints.read())
    }

    // ==================== Internals ====================

    /// Mutations must not interleave with an in-flight lifecycle operation:
    /// they take the gate non-blocking and reject instead of queueing.
    fn mutation_gate(&self) -> Result<tokio::sync::MutexGuard<'_, ()>, EngineError> {
        self.lifecycle_gate.try_lock().map_err(|_| EngineError::Busy)
    }

    async fn store_call<T, F>(&self, operation: F) -> Result<T, EngineError>
    where
        F: Future<Output = RepositoryResult<T>>,
    {
        match timeout(self.io_timeout, operation).await {
            Ok(result) => result.map_err(EngineError::from),
            Err(_) => Err(EngineError::Timeout(self.io_timeout)),
        }
    }

    fn new_draft(&self, name: &str, assignments: Vec<Assignment>) -> Schedule {
        let now = Utc::now();
        let empty = Schedule {
            id: ScheduleId::random(),
            name: name.to_string(),
            description: None,
            assignments: vec![],
            conflicts: vec![],
            stats: ScheduleStats::default(),
            created_at: now,
            updated_at: now,
            is_published: false,
        };
        self.recompute(&empty, assignments)
    }

    /// Build the next snapshot from a mutated assignment list: rerun the
    /// detector and the stats calculator, re-run the publish guard.
    fn recompute(&self, previous: &Schedule, assignments: Vec<Assignment>) -> Schedule {
        let reference = self.reference.read();
        let capacity = self.capacity.clone().with_reference(&reference);
        let subjects = if reference.subjects.is_empty() {
            None
        } else {
            Some(reference.subjects.as_slice())
        };

        let conflicts = detect_conflicts(&assignments);
        let mut stats = compute_stats(&assignments, &capacity, subjects);
        stats.total_conflicts = conflicts.len();

        let is_published = if previous.is_published {
            if conflicts.is_empty() {
                true
            } else {
                warn!(
                    "schedule {}: mutation reintroduced {} conflict(s), reverting published state",
                    previous.id,
                    conflicts.len()
                );
                false
            }
        } else {
            false
        };

        Schedule {
            id: previous.id.clone(),
            name: previous.name.clone(),
            description: previous.description.clone(),
            assignments,
            conflicts,
            stats,
            created_at: previous.created_at,
            updated_at: Utc::now(),
            is_published,
        }
    }
}
