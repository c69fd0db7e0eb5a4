//! Advisory evaluation of scheduling constraints.
//!
//! Each [`ConstraintRule`] variant is handled exhaustively, so adding a new
//! restriction shape forces this module to say what it means. Violations are
//! advisory: they do not gate publishing, which is guarded only by
//! double-booking conflicts.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::{
    Assignment, AssignmentId, Constraint, ConstraintId, ConstraintPriority, ConstraintRule,
    ConstraintSet, Day, TimeOfDay,
};

/// A constraint the assignment set does not satisfy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstraintViolation {
    pub constraint_id: ConstraintId,
    pub kind: String,
    pub priority: ConstraintPriority,
    pub message: String,
    pub assignment_ids: Vec<AssignmentId>,
}

impl ConstraintViolation {
    fn new(constraint: &Constraint, message: String, assignment_ids: Vec<AssignmentId>) -> Self {
        Self {
            constraint_id: constraint.id.clone(),
            kind: constraint.rule.kind().to_string(),
            priority: constraint.priority,
            message,
            assignment_ids,
        }
    }
}

/// Evaluate every enabled constraint against the assignment set.
///
/// Pure and deterministic; disabled constraints are skipped.
pub fn check_constraints(
    assignments: &[Assignment],
    constraints: &ConstraintSet,
) -> Vec<ConstraintViolation> {
    let mut violations = Vec::new();
    for constraint in constraints.enabled() {
        evaluate(constraint, assignments, &mut violations);
    }
    violations
}

fn overlaps(a_start: TimeOfDay, a_end: TimeOfDay, b_start: TimeOfDay, b_end: TimeOfDay) -> bool {
    a_start < b_end && b_start < a_end
}

/// Assignments per (faculty, day), sorted by start time.
fn faculty_day_buckets(assignments: &[Assignment]) -> BTreeMap<(&str, Day), Vec<&Assignment>> {
    let mut buckets: BTreeMap<(&str, Day), Vec<&Assignment>> = BTreeMap::new();
    for assignment in assignments {
        buckets
            .entry((assignment.faculty_id.as_str(), assignment.day))
            .or_default()
            .push(assignment);
    }
    for bucket in buckets.values_mut() {
        bucket.sort_by(|a, b| a.start.cmp(&b.start).then_with(|| a.id.cmp(&b.id)));
    }
    buckets
}

fn evaluate(constraint: &Constraint, assignments: &[Assignment], out: &mut Vec<ConstraintViolation>) {
    match &constraint.rule {
        ConstraintRule::FacultyUnavailable {
            faculty_id,
            day,
            start,
            end,
        } => {
            for assignment in assignments {
                if assignment.faculty_id == *faculty_id
                    && assignment.day == *day
                    && overlaps(assignment.start, assignment.end, *start, *end)
                {
                    out.push(ConstraintViolation::new(
                        constraint,
                        format!(
                            "Faculty {} is booked {}-{} on {} inside an unavailable window {}-{}",
                            assignment.faculty_label(),
                            assignment.start,
                            assignment.end,
                            day,
                            start,
                            end,
                        ),
                        vec![assignment.id.clone()],
                    ));
                }
            }
        }

        ConstraintRule::SubjectPreferredTime {
            subject_id,
            days,
            start,
            end,
        } => {
            for assignment in assignments {
                if assignment.subject_id != *subject_id {
                    continue;
                }
                let wrong_day = !days.contains(&assignment.day);
                let outside_window = assignment.start < *start || assignment.end > *end;
                if wrong_day || outside_window {
                    out.push(ConstraintViolation::new(
                        constraint,
                        format!(
                            "Session of subject {} at {} {}-{} falls outside the preferred window",
                            subject_id, assignment.day, assignment.start, assignment.end,
                        ),
                        vec![assignment.id.clone()],
                    ));
                }
            }
        }

        ConstraintRule::RoomRestriction {
            subject_id,
            allowed_classrooms,
        } => {
            for assignment in assignments {
                if assignment.subject_id == *subject_id
                    && !allowed_classrooms.contains(&assignment.classroom_id)
                {
                    out.push(ConstraintViolation::new(
                        constraint,
                        format!(
                            "Subject {} is scheduled in {}, which is not an allowed room",
                            subject_id,
                            assignment.classroom_label(),
                        ),
                        vec![assignment.id.clone()],
                    ));
                }
            }
        }

        ConstraintRule::MinimumBreakTime { minutes } => {
            // A zero gap is consecutive teaching, governed by
            // MaxConsecutiveClasses; only an existing-but-short break counts.
            for ((faculty, day), bucket) in faculty_day_buckets(assignments) {
                for pair in bucket.windows(2) {
                    let gap = pair[1].start.minutes_since_midnight() as i64
                        - pair[0].end.minutes_since_midnight() as i64;
                    if gap > 0 && (gap as u32) < *minutes {
                        out.push(ConstraintViolation::new(
                            constraint,
                            format!(
                                "Faculty {} has only a {}-minute break on {} (minimum {})",
                                faculty, gap, day, minutes,
                            ),
                            vec![pair[0].id.clone(), pair[1].id.clone()],
                        ));
                    }
                }
            }
        }

        ConstraintRule::MaxConsecutiveClasses { limit } => {
            for ((faculty, day), bucket) in faculty_day_buckets(assignments) {
                // Group back-to-back runs (each booking starting exactly when
                // the previous one ends), then flag runs over the limit.
                let mut chains: Vec<Vec<&Assignment>> = Vec::new();
                for assignment in bucket {
                    match chains.last_mut() {
                        Some(chain)
                            if chain
                                .last()
                                .map(|prev| prev.end == assignment.start)
                                .unwrap_or(false) =>
                        {
                            chain.push(assignment);
                        }
                        _ => chains.push(vec![assignment]),
                    }
                }
                for chain in chains {
                    if chain.len() > *limit as usize {
                        out.push(ConstraintViolation::new(
                            constraint,
                            format!(
                                "Faculty {} teaches {} back-to-back classes on {} (maximum {})",
                                faculty,
                                chain.len(),
                                day,
                                limit,
                            ),
                            chain.iter().map(|a| a.id.clone()).collect(),
                        ));
                    }
                }
            }
        }

        ConstraintRule::PreferredDayPattern { days } => {
            for assignment in assignments {
                if !days.contains(&assignment.day) {
                    out.push(ConstraintViolation::new(
                        constraint,
                        format!(
                            "Assignment on {} falls outside the preferred day pattern",
                            assignment.day,
                        ),
                        vec![assignment.id.clone()],
                    ));
                }
            }
        }
    }
}
