//! Human-readable and JSON rendering of scenario runs.

use deconflict_core::{Conflict, SafetyRules};
use serde::Serialize;

use crate::runner::RunOutcome;
use crate::scenarios::Scenario;

/// One scenario run as emitted by `--json`.
#[derive(Debug, Serialize)]
pub struct RunRecord<'a> {
    pub key: &'a str,
    pub name: &'a str,
    pub start_time: f64,
    #[serde(flatten)]
    pub outcome: &'a RunOutcome,
}

/// Render a run for the terminal.
pub fn render_run(
    key: &str,
    scenario: &Scenario,
    start_time: f64,
    rules: &SafetyRules,
    outcome: &RunOutcome,
) -> String {
    let mission = &scenario.mission;
    let mut lines = vec![
        format!("Scenario: {} ({})", scenario.name, key),
        format!(
            "  Desired start time: {}s | Window: {}s -> {}s",
            start_time, mission.window_start, mission.window_end
        ),
        format!(
            "  Buffers: H={}m, V={}m | Time step: {}s",
            rules.buffer_horizontal_m, rules.buffer_vertical_m, rules.time_step_s
        ),
    ];

    for flight in &scenario.flights {
        match (flight.trajectory.start_time(), flight.trajectory.end_time()) {
            (Some(from), Some(to)) => lines.push(format!(
                "  Tracked '{}' flies from t={}s to t={}s",
                flight.id, from, to
            )),
            _ => lines.push(format!("  Tracked '{}' has no recorded points", flight.id)),
        }
    }

    match outcome {
        RunOutcome::Rejected { reason } => {
            lines.push("STATUS: REJECTED".to_string());
            lines.push(format!("  Reason: {}", reason));
        }
        RunOutcome::Checked { trajectory, report } => {
            lines.push(format!("  Primary flight takes {:.1}s", trajectory.duration()));
            let status = if report.is_clear() { "CLEAR" } else { "CONFLICT" };
            lines.push(format!("STATUS: {}", status));
            lines.extend(report.conflicts().iter().map(render_conflict));
        }
    }

    lines.join("\n")
}

fn render_conflict(conflict: &Conflict) -> String {
    let location = if conflict.is_window_violation() {
        "N/A (mission time window)".to_string()
    } else {
        let p = &conflict.location;
        format!("(x={:.2}, y={:.2}, z={:.2})", p.x, p.y, p.z)
    };
    format!(
        "  - Time: {}s\n    Location: {}\n    With: {}",
        conflict.time, location, conflict.other_id
    )
}
