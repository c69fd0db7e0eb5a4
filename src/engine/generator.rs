//! The schedule-generation seam.
//!
//! Producing an optimal timetable from constraints is not this crate's job;
//! the engine only verifies and aggregates a candidate schedule. Generation
//! is therefore a trait the application implements, typically fronting an
//! external solver. The bundled [`SampleGenerator`] yields a small fixed set
//! for demos and tests.

use crate::models::{Assignment, Day, ReferenceData, TimeOfDay, TimeSlot};

/// Source of candidate assignment sets for a fresh draft.
pub trait AssignmentGenerator: Send + Sync {
    /// Produce the assignment set a generated draft starts from.
    ///
    /// Implementations may consult the reference collections and the slot
    /// grid; the engine validates and recomputes over whatever comes back.
    fn generate(&self, reference: &ReferenceData, slots: &[TimeSlot]) -> Vec<Assignment>;
}

/// Fixed illustrative assignment set.
pub struct SampleGenerator;

impl AssignmentGenerator for SampleGenerator {
    fn generate(&self, _reference: &ReferenceData, _slots: &[TimeSlot]) -> Vec<Assignment> {
        const SAMPLE: [(&str, &str, &str, &str, Day, &str, &str, &str, &str, &str); 3] = [
            (
                "1",
                "faculty1",
                "subject1",
                "classroom1",
                Day::Monday,
                "09:00",
                "11:00",
                "Dr. Smith",
                "Introduction to Programming",
                "Room 101",
            ),
            (
                "2",
                "faculty2",
                "subject2",
                "classroom2",
                Day::Monday,
                "11:00",
                "13:00",
                "Dr. Johnson",
                "Database Management",
                "Room 102",
            ),
            (
                "3",
                "faculty1",
                "subject3",
                "classroom1",
                Day::Tuesday,
                "09:00",
                "11:00",
                "Dr. Smith",
                "Algorithms",
                "Room 101",
            ),
        ];

        SAMPLE
            .iter()
            .filter_map(
                |(id, faculty, subject, room, day, start, end, faculty_name, subject_name, room_name)| {
                    let start: TimeOfDay = start.parse().ok()?;
                    let end: TimeOfDay = end.parse().ok()?;
                    let assignment = Assignment::new(
                        (*id).into(),
                        (*faculty).into(),
                        (*subject).into(),
                        (*room).into(),
                        *day,
                        start,
                        end,
                    )
                    .ok()?;
                    Some(
                        assignment
                            .with_slot(format!("{}-{:02}00", day, start.hour()))
                            .with_names(*faculty_name, *subject_name, *room_name),
                    )
                },
            )
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_set_is_valid_and_conflict_free() {
        let assignments = SampleGenerator.generate(&ReferenceData::default(), &[]);
        assert_eq!(assignments.len(), 3);
        for assignment in &assignments {
            assignment.validate().unwrap();
        }
        assert!(crate::algorithms::detect_conflicts(&assignments).is_empty());
        assert_eq!(assignments[0].time_slot_id.as_deref(), Some("Monday-0900"));
        assert_eq!(assignments[0].faculty_name.as_deref(), Some("Dr. Smith"));
    }
}
