//! Persisted-subset snapshot for startup re-hydration.
//!
//! The surrounding application persists the saved schedules plus the
//! reference collections (browser/local storage in the reference frontend)
//! and hands them back on startup. The core treats that subset as untrusted:
//! every time invariant is re-checked and every derived view recomputed
//! before anything re-enters the engine or the repository.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};

use crate::algorithms::{compute_stats, detect_conflicts, CapacityModel};
use crate::db::repositories::LocalRepository;
use crate::models::{Classroom, Constraint, Faculty, ReferenceData, Schedule, Subject};

/// The subset of engine state the application persists between sessions.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PersistedState {
    #[serde(default)]
    pub saved_schedules: Vec<Schedule>,
    #[serde(default)]
    pub faculties: Vec<Faculty>,
    #[serde(default)]
    pub subjects: Vec<Subject>,
    #[serde(default)]
    pub classrooms: Vec<Classroom>,
    #[serde(default)]
    pub constraints: Vec<Constraint>,
}

impl PersistedState {
    /// Parse and validate a snapshot from its JSON form.
    ///
    /// Malformed times fail during deserialization (times only parse from
    /// `"HH:MM"`); inverted intervals and missing ids fail during
    /// re-validation. Derived views are recomputed, never trusted.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let mut state: PersistedState =
            serde_json::from_str(json).context("Invalid persisted state JSON")?;
        state.revalidate().context("Persisted state failed validation")?;
        Ok(state)
    }

    /// Load and validate a snapshot from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_json_str(&raw)
    }

    /// Write the snapshot as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .context("Failed to serialize persisted state")?;
        fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }

    /// The reference collections as engine lookup context.
    pub fn reference_data(&self) -> ReferenceData {
        ReferenceData {
            faculties: self.faculties.clone(),
            subjects: self.subjects.clone(),
            classrooms: self.classrooms.clone(),
        }
    }

    /// Seed a local repository with the snapshot's saved schedules and
    /// reference data.
    pub fn seed_repository(&self, repository: &LocalRepository) {
        repository.set_reference_data(self.reference_data());
        for schedule in &self.saved_schedules {
            repository.seed_schedule(schedule.clone());
        }
    }

    fn revalidate(&mut self) -> Result<()> {
        let subjects = self.subjects.clone();
        for schedule in &mut self.saved_schedules {
            for assignment in &schedule.assignments {
                assignment.validate().with_context(|| {
                    format!(
                        "assignment {} in schedule {}",
                        assignment.id, schedule.id
                    )
                })?;
            }

            // Persisted derived views may be stale or fabricated; recompute.
            // The engine recomputes again with its own capacity figures when
            // a schedule is loaded.
            schedule.conflicts = detect_conflicts(&schedule.assignments);
            let mut stats =
                compute_stats(&schedule.assignments, &CapacityModel::default(), Some(&subjects));
            stats.total_conflicts = schedule.conflicts.len();
            schedule.stats = stats;

            if schedule.is_published && !schedule.conflicts.is_empty() {
                warn!(
                    "persisted schedule {} claims published with {} conflicts; demoting to draft",
                    schedule.id,
                    schedule.conflicts.len()
                );
                schedule.is_published = false;
            }
        }
        Ok(())
    }
}
