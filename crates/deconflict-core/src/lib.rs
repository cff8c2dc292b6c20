//! Strategic deconfliction core.
//!
//! Turns a declared [`Mission`] into a time-stamped [`Trajectory`] and checks
//! it against other tracked flights with a cylindrical safety buffer.

pub mod conflict;
pub mod models;
pub mod rules;
pub mod spatial;
pub mod trajectory;

pub use conflict::{
    check_for_conflicts, dedup_conflicts, Conflict, ConflictDetector, ConflictReport,
    ConflictStatus, TIME_WINDOW_EXCEEDED_ID,
};
pub use models::{Mission, Point3, TimedPoint, TrackedFlight, Trajectory};
pub use rules::SafetyRules;
pub use spatial::{distance_3d, position_at, within_cylinder};
pub use trajectory::{build_trajectory, path_length, TrajectoryError};
