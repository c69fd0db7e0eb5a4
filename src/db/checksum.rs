//! Checksum calculation for saved-schedule deduplication.

use sha2::{Digest, Sha256};

use crate::models::Schedule;

/// SHA-256 over a schedule's bookable content: name, description, and the
/// ordered assignment list.
///
/// Derived views and timestamps are excluded, so saving the same timetable
/// twice hashes identically regardless of when the saves happened.
///
/// # Returns
/// Hexadecimal string representation of the SHA-256 hash.
pub fn schedule_checksum(schedule: &Schedule) -> String {
    let mut hasher = Sha256::new();
    hasher.update(schedule.name.as_bytes());
    hasher.update([0u8]);
    if let Some(description) = &schedule.description {
        hasher.update(description.as_bytes());
    }
    hasher.update([0u8]);
    hasher.update(serde_json::to_vec(&schedule.assignments).unwrap_or_default());
    hex::encode(hasher.finalize())
}
