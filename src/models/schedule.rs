//! Schedule snapshots and their derived views.
//!
//! A [`Schedule`] is an immutable value: the engine never edits one in place,
//! it builds a replacement with freshly recomputed conflicts and stats and
//! swaps the whole snapshot.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::assignment::{Assignment, AssignmentId};
use super::reference::{ClassroomId, FacultyId};
use crate::define_string_id;

define_string_id!(ScheduleId);

impl ScheduleId {
    /// Generate a fresh random id.
    pub fn random() -> Self {
        ScheduleId(Uuid::new_v4().to_string())
    }
}

/// How severe a detected conflict is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Severity {
    Low,
    Medium,
    High,
}

/// The resource axis on which two assignments collide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConflictKind {
    FacultyDoubleBooking,
    ClassroomDoubleBooking,
}

impl ConflictKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConflictKind::FacultyDoubleBooking => "FacultyDoubleBooking",
            ConflictKind::ClassroomDoubleBooking => "ClassroomDoubleBooking",
        }
    }
}

/// A detected scheduling violation: two assignments illegitimately sharing a
/// resource over overlapping time.
///
/// Conflicts are derived, never persisted independently; they are recomputed
/// from the current assignment set on every mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conflict {
    pub kind: ConflictKind,
    pub message: String,
    /// Earlier-starting member of the colliding pair.
    pub first: Assignment,
    pub second: Assignment,
    pub severity: Severity,
}

impl Conflict {
    pub fn involves(&self, id: &AssignmentId) -> bool {
        self.first.id == *id || self.second.id == *id
    }
}

/// Aggregate utilization figures, recomputed wholesale on every mutation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScheduleStats {
    pub total_assignments: usize,
    pub total_conflicts: usize,
    /// Faculty id to booked percentage of weekly capacity, capped at 100.
    pub faculty_utilization: BTreeMap<FacultyId, f64>,
    /// Classroom id to booked percentage of weekly capacity, capped at 100.
    pub room_utilization: BTreeMap<ClassroomId, f64>,
    /// Required-minus-assigned weekly hours summed across subjects.
    ///
    /// Honest only when subject reference data was available to the stats
    /// computation; otherwise reported as 0.0.
    pub unassigned_hours: f64,
}

/// A complete timetable snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    pub id: ScheduleId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub assignments: Vec<Assignment>,
    #[serde(default)]
    pub conflicts: Vec<Conflict>,
    #[serde(default)]
    pub stats: ScheduleStats,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// True only while the conflict-free publish guard has held since the
    /// last transition.
    #[serde(default)]
    pub is_published: bool,
}

impl Schedule {
    pub fn assignment(&self, id: &AssignmentId) -> Option<&Assignment> {
        self.assignments.iter().find(|a| &a.id == id)
    }

    pub fn has_conflicts(&self) -> bool {
        !self.conflicts.is_empty()
    }
}
