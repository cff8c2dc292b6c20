//! Runs one scenario at a chosen departure time.

use deconflict_core::{build_trajectory, ConflictDetector, ConflictReport, Trajectory};
use serde::Serialize;

use crate::scenarios::Scenario;

/// Result of running a scenario.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RunOutcome {
    /// No check was made; the mission could not be flown as requested
    Rejected { reason: String },
    /// The check completed. The trajectory is kept for later position queries.
    Checked {
        trajectory: Trajectory,
        report: ConflictReport,
    },
}

impl RunOutcome {
    pub fn report(&self) -> Option<&ConflictReport> {
        match self {
            RunOutcome::Checked { report, .. } => Some(report),
            RunOutcome::Rejected { .. } => None,
        }
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, RunOutcome::Rejected { .. })
    }
}

/// Build the primary trajectory departing at `start_time` and check it.
///
/// Departing before the mission window opens is rejected without a check,
/// as is a mission the trajectory builder refuses.
pub fn run_scenario(scenario: &Scenario, start_time: f64, detector: &ConflictDetector) -> RunOutcome {
    tracing::info!("Running '{}' departing at {}s", scenario.name, start_time);

    let mission = &scenario.mission;
    if start_time < mission.window_start {
        return RunOutcome::Rejected {
            reason: format!(
                "Desired start time {}s is before allowed window start of {}s",
                start_time, mission.window_start
            ),
        };
    }

    let trajectory = match build_trajectory(mission, start_time) {
        Ok(trajectory) => trajectory,
        Err(e) => {
            tracing::warn!("Rejected '{}': {}", scenario.name, e);
            return RunOutcome::Rejected {
                reason: e.to_string(),
            };
        }
    };

    let report = detector.check(&trajectory, mission.window_end, &scenario.flights);
    if !report.is_clear() {
        tracing::info!(
            "'{}' has {} conflict(s)",
            scenario.name,
            report.conflicts().len()
        );
    }

    RunOutcome::Checked { trajectory, report }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenarios::{create_head_on_scenario, create_near_miss_scenario};
    use deconflict_core::{ConflictStatus, Point3};

    #[test]
    fn test_rejects_departure_before_window() {
        let outcome = run_scenario(&create_head_on_scenario(), -1.0, &ConflictDetector::default());
        match outcome {
            RunOutcome::Rejected { reason } => assert!(reason.contains("before allowed window start")),
            other => panic!("expected rejection, got {:?}", other),
        }
    }

    #[test]
    fn test_rejects_invalid_speed() {
        let mut scenario = create_near_miss_scenario();
        scenario.mission.speed = 0.0;
        let outcome = run_scenario(&scenario, 0.0, &ConflictDetector::default());
        assert!(outcome.is_rejected());
        assert!(outcome.report().is_none());
    }

    #[test]
    fn test_checked_keeps_trajectory() {
        let outcome = run_scenario(&create_head_on_scenario(), 0.0, &ConflictDetector::default());
        let RunOutcome::Checked { trajectory, report } = outcome else {
            panic!("expected a completed check");
        };
        assert_eq!(report.status(), ConflictStatus::Conflict);
        assert_eq!(trajectory.position_at(5.0), Some(Point3::new(50.0, 50.0, 50.0)));
    }

    #[test]
    fn test_outcome_serializes_with_tag() {
        let outcome = run_scenario(&create_near_miss_scenario(), 0.0, &ConflictDetector::default());
        let value = serde_json::to_value(&outcome).unwrap();
        assert_eq!(value["outcome"], "checked");
        assert_eq!(value["report"]["status"], "CLEAR");
        assert_eq!(value["trajectory"][1]["time"], 10.0);
    }
}
