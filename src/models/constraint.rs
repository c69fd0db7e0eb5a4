//! Scheduling restrictions as typed rules.
//!
//! Each concrete restriction shape is one variant of [`ConstraintRule`], so
//! evaluation code matches exhaustively instead of inspecting an open-ended
//! untyped payload.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::reference::{ClassroomId, FacultyId, SubjectId};
use super::time::{Day, TimeOfDay};
use crate::define_string_id;

define_string_id!(ConstraintId);

impl ConstraintId {
    /// Generate a fresh random id.
    pub fn random() -> Self {
        ConstraintId(Uuid::new_v4().to_string())
    }
}

/// Hard constraints must hold; soft constraints are preferences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConstraintPriority {
    Hard,
    Soft,
}

/// One concrete restriction shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ConstraintRule {
    /// The faculty member cannot teach inside this window.
    FacultyUnavailable {
        faculty_id: FacultyId,
        day: Day,
        start: TimeOfDay,
        end: TimeOfDay,
    },
    /// Sessions of the subject should sit inside this window.
    SubjectPreferredTime {
        subject_id: SubjectId,
        days: Vec<Day>,
        start: TimeOfDay,
        end: TimeOfDay,
    },
    /// The subject may only be taught in these rooms.
    RoomRestriction {
        subject_id: SubjectId,
        allowed_classrooms: Vec<ClassroomId>,
    },
    /// Minimum gap in minutes between two bookings of the same faculty
    /// member on one day.
    MinimumBreakTime { minutes: u32 },
    /// Upper bound on back-to-back sessions per faculty member and day.
    MaxConsecutiveClasses { limit: u32 },
    /// Teaching days should stay within this pattern.
    PreferredDayPattern { days: Vec<Day> },
}

impl ConstraintRule {
    pub fn kind(&self) -> &'static str {
        match self {
            ConstraintRule::FacultyUnavailable { .. } => "FacultyUnavailable",
            ConstraintRule::SubjectPreferredTime { .. } => "SubjectPreferredTime",
            ConstraintRule::RoomRestriction { .. } => "RoomRestriction",
            ConstraintRule::MinimumBreakTime { .. } => "MinimumBreakTime",
            ConstraintRule::MaxConsecutiveClasses { .. } => "MaxConsecutiveClasses",
            ConstraintRule::PreferredDayPattern { .. } => "PreferredDayPattern",
        }
    }

    /// The faculty this rule targets, when it targets one.
    pub fn faculty_id(&self) -> Option<&FacultyId> {
        match self {
            ConstraintRule::FacultyUnavailable { faculty_id, .. } => Some(faculty_id),
            _ => None,
        }
    }

    /// The subject this rule targets, when it targets one.
    pub fn subject_id(&self) -> Option<&SubjectId> {
        match self {
            ConstraintRule::SubjectPreferredTime { subject_id, .. }
            | ConstraintRule::RoomRestriction { subject_id, .. } => Some(subject_id),
            _ => None,
        }
    }
}

/// A restriction with its bookkeeping metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Constraint {
    pub id: ConstraintId,
    pub rule: ConstraintRule,
    pub priority: ConstraintPriority,
    #[serde(default)]
    pub description: Option<String>,
    pub enabled: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Constraint {
    pub fn new(rule: ConstraintRule, priority: ConstraintPriority) -> Self {
        let now = Utc::now();
        Self {
            id: ConstraintId::random(),
            rule,
            priority,
            description: None,
            enabled: true,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// The owned constraint collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConstraintSet {
    constraints: Vec<Constraint>,
}

impl ConstraintSet {
    pub fn new(constraints: Vec<Constraint>) -> Self {
        Self { constraints }
    }

    pub fn add(&mut self, constraint: Constraint) {
        self.constraints.push(constraint);
    }

    /// Remove a constraint; false when the id was absent.
    pub fn remove(&mut self, id: &ConstraintId) -> bool {
        let before = self.constraints.len();
        self.constraints.retain(|c| &c.id != id);
        self.constraints.len() < before
    }

    /// Flip a constraint's enabled flag; false when the id was absent.
    pub fn toggle(&mut self, id: &ConstraintId) -> bool {
        match self.constraints.iter_mut().find(|c| &c.id == id) {
            Some(constraint) => {
                constraint.enabled = !constraint.enabled;
                constraint.updated_at = Utc::now();
                true
            }
            None => false,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Constraint> {
        self.constraints.iter()
    }

    /// Only the constraints currently in force.
    pub fn enabled(&self) -> impl Iterator<Item = &Constraint> {
        self.constraints.iter().filter(|c| c.enabled)
    }

    pub fn for_faculty(&self, id: &FacultyId) -> Vec<&Constraint> {
        self.constraints
            .iter()
            .filter(|c| c.rule.faculty_id() == Some(id))
            .collect()
    }

    pub fn for_subject(&self, id: &SubjectId) -> Vec<&Constraint> {
        self.constraints
            .iter()
            .filter(|c| c.rule.subject_id() == Some(id))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }
}
