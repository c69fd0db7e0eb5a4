//! Domain models for timetable assignments, schedules, and reference data.

pub mod assignment;
pub mod constraint;
pub mod macros;
pub mod reference;
pub mod schedule;
pub mod time;

pub use assignment::{Assignment, AssignmentError, AssignmentId, AssignmentPatch};
pub use constraint::{
    Constraint, ConstraintId, ConstraintPriority, ConstraintRule, ConstraintSet,
};
pub use reference::{
    Availability, Classroom, ClassroomId, Faculty, FacultyId, ReferenceData, Subject, SubjectId,
};
pub use schedule::{Conflict, ConflictKind, Schedule, ScheduleId, ScheduleStats, Severity};
pub use time::{
    duration_minutes, generate_slots, Day, TimeOfDay, TimeParseError, TimeSlot,
};
