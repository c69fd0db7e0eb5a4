//! Read-only reference data supplied by the surrounding application.
//!
//! Faculty, subject, and classroom records arrive from the remote data
//! boundary already denormalized. The engine uses them as context for display
//! names, capacity figures, and required-hours computations; it does not own
//! or validate them.

use serde::{Deserialize, Serialize};

use super::time::{Day, TimeOfDay};
use crate::define_string_id;

define_string_id!(FacultyId);
define_string_id!(SubjectId);
define_string_id!(ClassroomId);

/// A recurring weekly window in which a faculty member is available to teach.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Availability {
    pub day: Day,
    pub start: TimeOfDay,
    pub end: TimeOfDay,
}

/// A teaching staff member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Faculty {
    pub id: FacultyId,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    /// Subjects this faculty member can teach.
    #[serde(default)]
    pub subjects: Vec<SubjectId>,
    pub max_hours_per_day: f64,
    pub max_hours_per_week: f64,
    #[serde(default)]
    pub availability: Vec<Availability>,
}

/// A course to be timetabled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subject {
    pub id: SubjectId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Total teaching hours over the term.
    pub total_hours: f64,
    pub sessions_per_week: u32,
    /// Duration of a single session in minutes.
    pub session_duration_minutes: u32,
    #[serde(default)]
    pub preferred_classroom_ids: Vec<ClassroomId>,
    #[serde(default)]
    pub allow_consecutive: bool,
}

impl Subject {
    /// Weekly teaching requirement in hours.
    pub fn required_weekly_hours(&self) -> f64 {
        f64::from(self.sessions_per_week) * f64::from(self.session_duration_minutes) / 60.0
    }
}

/// A bookable room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classroom {
    pub id: ClassroomId,
    pub name: String,
    #[serde(default)]
    pub building: Option<String>,
    #[serde(default)]
    pub floor: Option<i32>,
    pub capacity: u32,
    /// Equipment available in the room.
    #[serde(default)]
    pub resources: Vec<String>,
}

/// Snapshot of the reference collections, kept by the engine as lookup
/// context.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReferenceData {
    #[serde(default)]
    pub faculties: Vec<Faculty>,
    #[serde(default)]
    pub subjects: Vec<Subject>,
    #[serde(default)]
    pub classrooms: Vec<Classroom>,
}

impl ReferenceData {
    pub fn is_empty(&self) -> bool {
        self.faculties.is_empty() && self.subjects.is_empty() && self.classrooms.is_empty()
    }

    pub fn faculty(&self, id: &FacultyId) -> Option<&Faculty> {
        self.faculties.iter().find(|f| &f.id == id)
    }

    pub fn subject(&self, id: &SubjectId) -> Option<&Subject> {
        self.subjects.iter().find(|s| &s.id == id)
    }

    pub fn classroom(&self, id: &ClassroomId) -> Option<&Classroom> {
        self.classrooms.iter().find(|c| &c.id == id)
    }
}
