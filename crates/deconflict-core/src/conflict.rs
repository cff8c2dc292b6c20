//! Conflict detection module for mission deconfliction.
//!
//! Samples the primary trajectory and every tracked flight at a fixed
//! cadence and tests a cylindrical safety buffer between each pair of
//! airborne positions. Detection is discrete: breaches shorter than one
//! time step can be missed.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::models::{Point3, TrackedFlight, Trajectory};
use crate::rules::SafetyRules;
use crate::spatial::within_cylinder;

/// Flight id reported when the primary cannot finish inside its window.
pub const TIME_WINDOW_EXCEEDED_ID: &str = "MISSION_TIME_WINDOW_EXCEEDED";

/// Overall outcome of a deconfliction check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConflictStatus {
    /// No breach detected
    Clear,
    /// At least one breach, or the mission window was exceeded
    Conflict,
}

/// A single detected breach.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conflict {
    /// Sample time rounded to hundredths of a second
    pub time: f64,
    /// Primary drone position at `time`
    pub location: Point3,
    #[serde(alias = "conflicted_with_flight_id")]
    pub other_id: String,
}

impl Conflict {
    /// True for the synthetic entry raised when the mission window is exceeded.
    pub fn is_window_violation(&self) -> bool {
        self.other_id == TIME_WINDOW_EXCEEDED_ID
    }
}

/// Final output of a deconfliction check.
///
/// Deserialized reports are rebuilt from their conflict list; any `status`
/// in the payload is ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ReportPayload")]
pub struct ConflictReport {
    status: ConflictStatus,
    conflicts: Vec<Conflict>,
}

#[derive(Deserialize)]
struct ReportPayload {
    #[serde(default)]
    conflicts: Vec<Conflict>,
}

impl From<ReportPayload> for ConflictReport {
    fn from(payload: ReportPayload) -> Self {
        Self::from_conflicts(payload.conflicts)
    }
}

impl ConflictReport {
    pub fn clear() -> Self {
        Self {
            status: ConflictStatus::Clear,
            conflicts: Vec::new(),
        }
    }

    /// Status is derived from the list, so the two can never disagree.
    pub fn from_conflicts(conflicts: Vec<Conflict>) -> Self {
        if conflicts.is_empty() {
            return Self::clear();
        }
        Self {
            status: ConflictStatus::Conflict,
            conflicts,
        }
    }

    pub fn status(&self) -> ConflictStatus {
        self.status
    }

    pub fn conflicts(&self) -> &[Conflict] {
        &self.conflicts
    }

    pub fn is_clear(&self) -> bool {
        self.status == ConflictStatus::Clear
    }

    pub fn into_conflicts(self) -> Vec<Conflict> {
        self.conflicts
    }
}

/// Conflict detector bound to one set of safety rules.
#[derive(Debug, Clone, Default)]
pub struct ConflictDetector {
    rules: SafetyRules,
}

impl ConflictDetector {
    pub fn new(rules: SafetyRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &SafetyRules {
        &self.rules
    }

    /// Check `primary` against `others` using this detector's rules.
    pub fn check(
        &self,
        primary: &Trajectory,
        window_end: f64,
        others: &[TrackedFlight],
    ) -> ConflictReport {
        check_for_conflicts(
            primary,
            window_end,
            others,
            self.rules.buffer_horizontal_m,
            self.rules.buffer_vertical_m,
            self.rules.time_step_s,
        )
    }
}

/// Check a primary trajectory against every tracked flight.
///
/// A primary that lands after `window_end` is reported as a single
/// [`TIME_WINDOW_EXCEEDED_ID`] conflict and no spatial check is made.
/// Otherwise positions are sampled every `time_step_s` from the primary's
/// first to last timestamp inclusive. Pairs where either drone is not
/// airborne are skipped.
///
/// A non-positive `time_step_s` samples the first instant only.
pub fn check_for_conflicts(
    primary: &Trajectory,
    window_end: f64,
    others: &[TrackedFlight],
    buffer_horizontal_m: f64,
    buffer_vertical_m: f64,
    time_step_s: f64,
) -> ConflictReport {
    let (Some(first), Some(last)) = (primary.first(), primary.last()) else {
        return ConflictReport::clear();
    };
    let mission_start = first.time;
    let mission_finish = last.time;

    if mission_finish > window_end {
        tracing::debug!(
            "Mission finishes at {}s, after window end {}s",
            mission_finish,
            window_end
        );
        return ConflictReport::from_conflicts(vec![Conflict {
            time: mission_finish,
            location: last.point,
            other_id: TIME_WINDOW_EXCEEDED_ID.to_string(),
        }]);
    }

    let mut detections = Vec::new();
    let mut samples = 0u64;
    let mut t = mission_start;

    while t <= mission_finish {
        samples += 1;

        if let Some(primary_pos) = primary.position_at(t) {
            for other in others {
                let Some(other_pos) = other.trajectory.position_at(t) else {
                    continue;
                };

                let breach = within_cylinder(
                    &primary_pos,
                    &other_pos,
                    buffer_horizontal_m,
                    buffer_vertical_m,
                );
                if breach {
                    tracing::trace!("Breach with {} at t={}s", other.id, t);
                    detections.push(Conflict {
                        time: round_to_hundredths(t),
                        location: primary_pos,
                        other_id: other.id.clone(),
                    });
                }
            }
        }

        // Also stops once the step is too small to advance the clock
        let next = t + time_step_s;
        if next <= t {
            break;
        }
        t = next;
    }

    let conflicts = dedup_conflicts(detections);
    tracing::debug!(
        "Sampled {} instant(s) against {} flight(s): {} conflict(s)",
        samples,
        others.len(),
        conflicts.len()
    );

    ConflictReport::from_conflicts(conflicts)
}

/// Keep the first conflict for each (flight id, rounded time) pair.
pub fn dedup_conflicts(conflicts: Vec<Conflict>) -> Vec<Conflict> {
    let mut seen: HashSet<(String, i64)> = HashSet::with_capacity(conflicts.len());
    conflicts
        .into_iter()
        .filter(|conflict| seen.insert((conflict.other_id.clone(), hundredths(conflict.time))))
        .collect()
}

fn round_to_hundredths(t: f64) -> f64 {
    hundredths(t) as f64 / 100.0
}

/// Ties go to the even neighbour, so 0.125 reports as 0.12.
fn hundredths(t: f64) -> i64 {
    (t * 100.0).round_ties_even() as i64
}
