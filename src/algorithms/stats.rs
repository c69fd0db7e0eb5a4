//! Utilization aggregation over an assignment set.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::{
    Assignment, ClassroomId, FacultyId, ReferenceData, ScheduleStats, Subject, SubjectId,
};

/// Nominal weekly capacity figures used to turn booked hours into
/// percentages.
///
/// The global constants are configuration, not derived from availability
/// data; per-faculty overrides can be layered on from reference data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapacityModel {
    /// Weekly teaching capacity assumed for a faculty member, in hours.
    pub faculty_weekly_hours: f64,
    /// Weekly booking capacity assumed for a classroom, in hours.
    pub classroom_weekly_hours: f64,
    /// Per-faculty overrides, drawn from `Faculty::max_hours_per_week`.
    #[serde(default)]
    pub faculty_overrides: BTreeMap<FacultyId, f64>,
}

impl Default for CapacityModel {
    fn default() -> Self {
        Self {
            faculty_weekly_hours: 40.0,
            classroom_weekly_hours: 50.0,
            faculty_overrides: BTreeMap::new(),
        }
    }
}

impl CapacityModel {
    pub fn new(faculty_weekly_hours: f64, classroom_weekly_hours: f64) -> Self {
        Self {
            faculty_weekly_hours,
            classroom_weekly_hours,
            faculty_overrides: BTreeMap::new(),
        }
    }

    /// Layer per-faculty weekly capacities from reference data over the
    /// global constant. Non-positive figures are ignored.
    pub fn with_reference(mut self, reference: &ReferenceData) -> Self {
        for faculty in &reference.faculties {
            if faculty.max_hours_per_week > 0.0 {
                self.faculty_overrides
                    .insert(faculty.id.clone(), faculty.max_hours_per_week);
            }
        }
        self
    }

    fn faculty_capacity(&self, id: &FacultyId) -> f64 {
        self.faculty_overrides
            .get(id)
            .copied()
            .unwrap_or(self.faculty_weekly_hours)
    }
}

/// Compute utilization statistics for an assignment set.
///
/// Pure and deterministic. `total_conflicts` is left at zero; the caller
/// fills it from the conflict detector's output (this function knows nothing
/// about conflicts). `unassigned_hours` is computed honestly only when
/// subject reference data is supplied; with `None` the field is 0.0.
pub fn compute_stats(
    assignments: &[Assignment],
    capacity: &CapacityModel,
    subjects: Option<&[Subject]>,
) -> ScheduleStats {
    let mut faculty_hours: BTreeMap<FacultyId, f64> = BTreeMap::new();
    let mut room_hours: BTreeMap<ClassroomId, f64> = BTreeMap::new();

    for assignment in assignments {
        let hours = assignment.duration_hours();
        *faculty_hours
            .entry(assignment.faculty_id.clone())
            .or_insert(0.0) += hours;
        *room_hours
            .entry(assignment.classroom_id.clone())
            .or_insert(0.0) += hours;
    }

    let faculty_utilization = faculty_hours
        .into_iter()
        .map(|(id, booked)| {
            let capped = utilization(booked, capacity.faculty_capacity(&id));
            (id, capped)
        })
        .collect();

    let room_utilization = room_hours
        .into_iter()
        .map(|(id, booked)| {
            let capped = utilization(booked, capacity.classroom_weekly_hours);
            (id, capped)
        })
        .collect();

    ScheduleStats {
        total_assignments: assignments.len(),
        total_conflicts: 0,
        faculty_utilization,
        room_utilization,
        unassigned_hours: subjects
            .map(|s| unassigned_hours(assignments, s))
            .unwrap_or(0.0),
    }
}

/// Booked percentage of capacity, within [0, 100] even when booked hours
/// exceed the nominal capacity.
fn utilization(booked: f64, capacity: f64) -> f64 {
    if capacity <= 0.0 {
        if booked > 0.0 {
            100.0
        } else {
            0.0
        }
    } else {
        (booked / capacity * 100.0).min(100.0)
    }
}

/// Weekly hours still required across subjects: per subject,
/// max(0, sessions_per_week × session_duration − assigned hours).
pub fn unassigned_hours(assignments: &[Assignment], subjects: &[Subject]) -> f64 {
    let mut assigned: BTreeMap<&SubjectId, f64> = BTreeMap::new();
    for assignment in assignments {
        *assigned.entry(&assignment.subject_id).or_insert(0.0) += assignment.duration_hours();
    }

    subjects
        .iter()
        .map(|subject| {
            let booked = assigned.get(&subject.id).copied().unwrap_or(0.0);
            (subject.required_weekly_hours() - booked).max(0.0)
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Day, Faculty};

    fn booking(id: &str, faculty: &str, room: &str, start: &str, end: &str) -> Assignment {
        Assignment::new(
            id.into(),
            faculty.into(),
            "s1".into(),
            room.into(),
            Day::Monday,
            start.parse().unwrap(),
            end.parse().unwrap(),
        )
        .unwrap()
    }

    fn subject(id: &str, sessions: u32, minutes: u32) -> Subject {
        Subject {
            id: id.into(),
            name: id.to_string(),
            description: None,
            total_hours: 0.0,
            sessions_per_week: sessions,
            session_duration_minutes: minutes,
            preferred_classroom_ids: vec![],
            allow_consecutive: false,
        }
    }

    #[test]
    fn empty_input_yields_empty_stats() {
        let stats = compute_stats(&[], &CapacityModel::default(), None);
        assert_eq!(stats.total_assignments, 0);
        assert_eq!(stats.total_conflicts, 0);
        assert!(stats.faculty_utilization.is_empty());
        assert!(stats.room_utilization.is_empty());
        assert_eq!(stats.unassigned_hours, 0.0);
    }

    #[test]
    fn accumulates_fractional_hours_per_resource() {
        let assignments = vec![
            booking("a1", "f1", "c1", "09:00", "10:30"),
            booking("a2", "f1", "c2", "11:00", "12:00"),
            booking("a3", "f2", "c1", "13:00", "15:00"),
        ];
        let stats = compute_stats(&assignments, &CapacityModel::default(), None);

        assert_eq!(stats.total_assignments, 3);
        // f1: 2.5h of 40h; c1: 3.5h of 50h.
        let f1 = stats.faculty_utilization[&"f1".into()];
        assert!((f1 - 2.5 / 40.0 * 100.0).abs() < 1e-9);
        let c1 = stats.room_utilization[&"c1".into()];
        assert!((c1 - 3.5 / 50.0 * 100.0).abs() < 1e-9);
    }

    #[test]
    fn utilization_is_capped_at_100() {
        // 60 booked hours against a 40h capacity.
        let assignments: Vec<Assignment> = (0..30)
            .map(|i| {
                let mut a = booking("x", "f1", "c1", "09:00", "11:00");
                a.id = format!("a{i}").into();
                a
            })
            .collect();
        let stats = compute_stats(&assignments, &CapacityModel::default(), None);
        assert_eq!(stats.faculty_utilization[&"f1".into()], 100.0);

        for value in stats
            .faculty_utilization
            .values()
            .chain(stats.room_utilization.values())
        {
            assert!((0.0..=100.0).contains(value));
        }
    }

    #[test]
    fn per_faculty_capacity_overrides_apply() {
        let reference = ReferenceData {
            faculties: vec![Faculty {
                id: "f1".into(),
                name: "Dr. Smith".to_string(),
                email: None,
                subjects: vec![],
                max_hours_per_day: 4.0,
                max_hours_per_week: 10.0,
                availability: vec![],
            }],
            subjects: vec![],
            classrooms: vec![],
        };
        let capacity = CapacityModel::default().with_reference(&reference);

        let assignments = vec![booking("a1", "f1", "c1", "09:00", "14:00")];
        let stats = compute_stats(&assignments, &capacity, None);
        // 5h of a 10h override, not of the 40h default.
        assert!((stats.faculty_utilization[&"f1".into()] - 50.0).abs() < 1e-9);
    }

    #[test]
    fn unassigned_hours_needs_subject_data() {
        let assignments = vec![booking("a1", "f1", "c1", "09:00", "11:00")];

        let without = compute_stats(&assignments, &CapacityModel::default(), None);
        assert_eq!(without.unassigned_hours, 0.0);

        // s1 requires 2 × 90min = 3h, 2h assigned; s2 requires 1h, none assigned.
        let subjects = vec![subject("s1", 2, 90), subject("s2", 1, 60)];
        let with = compute_stats(&assignments, &CapacityModel::default(), Some(&subjects));
        assert!((with.unassigned_hours - 2.0).abs() < 1e-9);
    }

    #[test]
    fn over_assigned_subjects_do_not_go_negative() {
        let assignments = vec![
            booking("a1", "f1", "c1", "09:00", "12:00"),
            booking("a2", "f2", "c2", "13:00", "16:00"),
        ];
        let subjects = vec![subject("s1", 1, 60)];
        assert_eq!(unassigned_hours(&assignments, &subjects), 0.0);
    }
}
