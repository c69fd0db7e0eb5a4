//! The atomic bookable unit of a timetable.
//!
//! An [`Assignment`] books one faculty member and one subject into one
//! classroom for a day/time interval. Assignments are immutable values:
//! "updating" one produces a new value with the same id via
//! [`AssignmentPatch::apply`].

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::reference::{ClassroomId, FacultyId, ReferenceData, SubjectId};
use super::time::{duration_minutes, Day, TimeOfDay};
use crate::define_string_id;

define_string_id!(AssignmentId);

impl AssignmentId {
    /// Generate a fresh random id.
    pub fn random() -> Self {
        AssignmentId(Uuid::new_v4().to_string())
    }
}

/// Error constructing or updating an assignment.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AssignmentError {
    #[error("assignment interval is inverted or empty: {start} >= {end}")]
    InvertedInterval { start: TimeOfDay, end: TimeOfDay },

    #[error("assignment is missing required field '{0}'")]
    MissingId(&'static str),
}

/// One scheduled booking of a faculty member, subject, and classroom into a
/// day/time interval. Invariant: start < end.
///
/// The `*_name` fields are denormalized display caches filled from reference
/// data; they are never authoritative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub id: AssignmentId,
    pub faculty_id: FacultyId,
    pub subject_id: SubjectId,
    pub classroom_id: ClassroomId,
    /// Slot-grid entry this booking was made from, if any.
    #[serde(default)]
    pub time_slot_id: Option<String>,
    pub day: Day,
    pub start: TimeOfDay,
    pub end: TimeOfDay,
    #[serde(default)]
    pub faculty_name: Option<String>,
    #[serde(default)]
    pub subject_name: Option<String>,
    #[serde(default)]
    pub classroom_name: Option<String>,
}

impl Assignment {
    /// Create a validated assignment.
    ///
    /// # Returns
    /// * `Err(AssignmentError)` when `start >= end` or any id is empty
    pub fn new(
        id: AssignmentId,
        faculty_id: FacultyId,
        subject_id: SubjectId,
        classroom_id: ClassroomId,
        day: Day,
        start: TimeOfDay,
        end: TimeOfDay,
    ) -> Result<Self, AssignmentError> {
        let assignment = Self {
            id,
            faculty_id,
            subject_id,
            classroom_id,
            time_slot_id: None,
            day,
            start,
            end,
            faculty_name: None,
            subject_name: None,
            classroom_name: None,
        };
        assignment.validate()?;
        Ok(assignment)
    }

    /// Re-check the construction invariants.
    ///
    /// Used on untrusted input (snapshot re-hydration) and by the engine
    /// before every recompute; never silently swaps start/end.
    pub fn validate(&self) -> Result<(), AssignmentError> {
        if self.start >= self.end {
            return Err(AssignmentError::InvertedInterval {
                start: self.start,
                end: self.end,
            });
        }
        if self.id.as_str().is_empty() {
            return Err(AssignmentError::MissingId("id"));
        }
        if self.faculty_id.as_str().is_empty() {
            return Err(AssignmentError::MissingId("facultyId"));
        }
        if self.subject_id.as_str().is_empty() {
            return Err(AssignmentError::MissingId("subjectId"));
        }
        if self.classroom_id.as_str().is_empty() {
            return Err(AssignmentError::MissingId("classroomId"));
        }
        Ok(())
    }

    /// Booked duration in fractional hours.
    pub fn duration_hours(&self) -> f64 {
        duration_minutes(self.start, self.end)
            .map(|m| f64::from(m) / 60.0)
            .unwrap_or(0.0)
    }

    /// Attach the slot-grid id this booking was made from.
    pub fn with_slot(mut self, time_slot_id: impl Into<String>) -> Self {
        self.time_slot_id = Some(time_slot_id.into());
        self
    }

    /// Attach denormalized display names.
    pub fn with_names(
        mut self,
        faculty: impl Into<String>,
        subject: impl Into<String>,
        classroom: impl Into<String>,
    ) -> Self {
        self.faculty_name = Some(faculty.into());
        self.subject_name = Some(subject.into());
        self.classroom_name = Some(classroom.into());
        self
    }

    /// Fill missing display names from reference data.
    pub fn denormalize(&mut self, reference: &ReferenceData) {
        if self.faculty_name.is_none() {
            self.faculty_name = reference.faculty(&self.faculty_id).map(|f| f.name.clone());
        }
        if self.subject_name.is_none() {
            self.subject_name = reference.subject(&self.subject_id).map(|s| s.name.clone());
        }
        if self.classroom_name.is_none() {
            self.classroom_name = reference
                .classroom(&self.classroom_id)
                .map(|c| c.name.clone());
        }
    }

    /// Display label for the faculty involved: name when cached, id otherwise.
    pub fn faculty_label(&self) -> &str {
        self.faculty_name
            .as_deref()
            .unwrap_or_else(|| self.faculty_id.as_str())
    }

    /// Display label for the classroom involved: name when cached, id otherwise.
    pub fn classroom_label(&self) -> &str {
        self.classroom_name
            .as_deref()
            .unwrap_or_else(|| self.classroom_id.as_str())
    }
}

/// Partial update merged onto an existing assignment.
///
/// The id is not part of the patch; it is immutable for the lifetime of the
/// assignment. When a resource id changes without an accompanying display
/// name, the stale cached name is dropped so it can be re-denormalized.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssignmentPatch {
    #[serde(default)]
    pub faculty_id: Option<FacultyId>,
    #[serde(default)]
    pub subject_id: Option<SubjectId>,
    #[serde(default)]
    pub classroom_id: Option<ClassroomId>,
    #[serde(default)]
    pub time_slot_id: Option<String>,
    #[serde(default)]
    pub day: Option<Day>,
    #[serde(default)]
    pub start: Option<TimeOfDay>,
    #[serde(default)]
    pub end: Option<TimeOfDay>,
    #[serde(default)]
    pub faculty_name: Option<String>,
    #[serde(default)]
    pub subject_name: Option<String>,
    #[serde(default)]
    pub classroom_name: Option<String>,
}

impl AssignmentPatch {
    /// Produce a new assignment with this patch applied.
    ///
    /// The merged result is re-validated, so a patch can never smuggle an
    /// inverted interval past the construction invariant.
    pub fn apply(&self, base: &Assignment) -> Result<Assignment, AssignmentError> {
        let mut merged = base.clone();

        if let Some(faculty_id) = &self.faculty_id {
            if *faculty_id != merged.faculty_id {
                merged.faculty_name = None;
            }
            merged.faculty_id = faculty_id.clone();
        }
        if let Some(subject_id) = &self.subject_id {
            if *subject_id != merged.subject_id {
                merged.subject_name = None;
            }
            merged.subject_id = subject_id.clone();
        }
        if let Some(classroom_id) = &self.classroom_id {
            if *classroom_id != merged.classroom_id {
                merged.classroom_name = None;
            }
            merged.classroom_id = classroom_id.clone();
        }
        if let Some(slot) = &self.time_slot_id {
            merged.time_slot_id = Some(slot.clone());
        }
        if let Some(day) = self.day {
            merged.day = day;
        }
        if let Some(start) = self.start {
            merged.start = start;
        }
        if let Some(end) = self.end {
            merged.end = end;
        }
        if let Some(name) = &self.faculty_name {
            merged.faculty_name = Some(name.clone());
        }
        if let Some(name) = &self.subject_name {
            merged.subject_name = Some(name.clone());
        }
        if let Some(name) = &self.classroom_name {
            merged.classroom_name = Some(name.clone());
        }

        merged.validate()?;
        Ok(merged)
    }
}
