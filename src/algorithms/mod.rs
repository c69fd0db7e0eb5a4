//! Pure computations over assignment sets.
//!
//! Everything here is deterministic and side-effect free: the engine feeds in
//! the full assignment list after every mutation and swaps in the results.

pub mod conflicts;
pub mod constraints;
pub mod stats;

pub use conflicts::detect_conflicts;
pub use constraints::{check_constraints, ConstraintViolation};
pub use stats::{compute_stats, unassigned_hours, CapacityModel};
