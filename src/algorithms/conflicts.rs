//! Double-booking detection.
//!
//! Pure functions over an assignment list: no hidden state, deterministic
//! output, input-order independent.

use std::collections::BTreeMap;

use crate::models::{Assignment, Conflict, ConflictKind, Day, Severity};

/// Detect every double-booking in `assignments`.
///
/// Assignments are partitioned twice (by faculty and by classroom) and each
/// (resource, day) bucket is swept in start order while tracking the set of
/// intervals still open, so overlaps nested inside a longer booking are
/// caught, not just adjacent pairs. Intervals are half-open: a booking ending
/// exactly when the next starts does not conflict.
///
/// Output order is stable regardless of input order: the faculty axis first,
/// then classrooms; within an axis, resource id order, then day order, then
/// chronological. An assignment double-booked on both axes appears in a
/// conflict per axis.
pub fn detect_conflicts(assignments: &[Assignment]) -> Vec<Conflict> {
    let mut conflicts = Vec::new();
    sweep_axis(assignments, ConflictKind::FacultyDoubleBooking, &mut conflicts);
    sweep_axis(
        assignments,
        ConflictKind::ClassroomDoubleBooking,
        &mut conflicts,
    );
    conflicts
}

fn resource_key<'a>(assignment: &'a Assignment, kind: ConflictKind) -> &'a str {
    match kind {
        ConflictKind::FacultyDoubleBooking => assignment.faculty_id.as_str(),
        ConflictKind::ClassroomDoubleBooking => assignment.classroom_id.as_str(),
    }
}

fn sweep_axis(assignments: &[Assignment], kind: ConflictKind, out: &mut Vec<Conflict>) {
    let mut buckets: BTreeMap<(&str, Day), Vec<&Assignment>> = BTreeMap::new();
    for assignment in assignments {
        buckets
            .entry((resource_key(assignment, kind), assignment.day))
            .or_default()
            .push(assignment);
    }

    for ((_, day), mut bucket) in buckets {
        if bucket.len() < 2 {
            continue;
        }
        // Ties on start are broken by id to keep the sweep deterministic.
        bucket.sort_by(|a, b| a.start.cmp(&b.start).then_with(|| a.id.cmp(&b.id)));

        // Active-interval sweep: each new start is compared against every
        // interval still open. Checking only the previous assignment would
        // miss a short booking nested inside a longer one.
        let mut active: Vec<&Assignment> = Vec::new();
        for assignment in bucket {
            active.retain(|open| open.end > assignment.start);
            for open in &active {
                out.push(make_conflict(kind, day, open, assignment));
            }
            active.push(assignment);
        }
    }
}

fn make_conflict(
    kind: ConflictKind,
    day: Day,
    first: &Assignment,
    second: &Assignment,
) -> Conflict {
    let message = match kind {
        ConflictKind::FacultyDoubleBooking => format!(
            "Faculty {} is double-booked on {} ({}-{} overlaps {}-{})",
            first.faculty_label(),
            day,
            second.start,
            second.end,
            first.start,
            first.end,
        ),
        ConflictKind::ClassroomDoubleBooking => format!(
            "Classroom {} is double-booked on {} ({}-{} overlaps {}-{})",
            first.classroom_label(),
            day,
            second.start,
            second.end,
            first.start,
            first.end,
        ),
    };

    Conflict {
        kind,
        message,
        first: first.clone(),
        second: second.clone(),
        severity: Severity::High,
    }
}
