//! Integration tests for the `deconflict` binary.

use assert_cmd::Command;
use predicates::str::contains;
use serde_json::Value;
use std::fs;
use tempfile::TempDir;

fn cmd() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_deconflict"));
    cmd.env_remove("DECONFLICT_BUFFER_HORIZONTAL_M")
        .env_remove("DECONFLICT_BUFFER_VERTICAL_M")
        .env_remove("DECONFLICT_TIME_STEP_S")
        .env_remove("DECONFLICT_SCENARIOS");
    cmd
}

fn run_json(cmd: &mut Command, args: &[&str]) -> Value {
    let out = cmd
        .arg("--json")
        .args(args)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    serde_json::from_slice(&out).expect("valid json output")
}

#[test]
fn list_shows_builtin_scenarios() {
    cmd()
        .arg("list")
        .assert()
        .success()
        .stdout(contains("head_on_conflict"))
        .stdout(contains("cylindrical_test"));
}

#[test]
fn head_on_reports_conflict() {
    let value = run_json(&mut cmd(), &["run", "head_on_conflict"]);
    assert_eq!(value["outcome"], "checked");
    assert_eq!(value["report"]["status"], "CONFLICT");

    let conflicts = value["report"]["conflicts"].as_array().unwrap();
    assert!(conflicts
        .iter()
        .any(|c| c["other_id"] == "Drone-B (Head-On)" && c["location"]["z"] == 50.0));
}

#[test]
fn near_miss_is_clear_until_vertical_buffer_grows() {
    let value = run_json(&mut cmd(), &["run", "near_miss_3d"]);
    assert_eq!(value["report"]["status"], "CLEAR");

    let value = run_json(
        cmd().env("DECONFLICT_BUFFER_VERTICAL_M", "30"),
        &["run", "near_miss_3d"],
    );
    assert_eq!(value["report"]["status"], "CONFLICT");

    let value = run_json(
        cmd().env("DECONFLICT_BUFFER_VERTICAL_M", "30"),
        &["run", "near_miss_3d", "--buffer-vertical", "2"],
    );
    assert_eq!(value["report"]["status"], "CLEAR");
}

#[test]
fn start_before_window_is_rejected() {
    let value = run_json(&mut cmd(), &["run", "head_on_conflict", "--start", "-1"]);
    assert_eq!(value["outcome"], "rejected");
    assert!(value.get("report").is_none());
}

#[test]
fn text_report_for_window_violation() {
    cmd()
        .args(["run", "time_window_violation"])
        .assert()
        .success()
        .stdout(contains("STATUS: CONFLICT"))
        .stdout(contains("MISSION_TIME_WINDOW_EXCEEDED"));
}

#[test]
fn run_all_covers_every_scenario() {
    let value = run_json(&mut cmd(), &["run-all"]);
    let runs = value.as_array().unwrap();
    assert_eq!(runs.len(), 6);

    let cylindrical = runs
        .iter()
        .find(|r| r["key"] == "cylindrical_test")
        .unwrap();
    let conflicts = cylindrical["report"]["conflicts"].as_array().unwrap();
    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts[0]["other_id"], "Drone-C (CONFLICT)");
}

#[test]
fn unknown_scenario_fails() {
    cmd()
        .args(["run", "no_such_scenario"])
        .assert()
        .failure()
        .stderr(contains("Unknown scenario"));
}

#[test]
fn negative_buffer_is_rejected() {
    cmd()
        .args(["--buffer-horizontal", "-1", "list"])
        .assert()
        .failure()
        .stderr(contains("Invalid safety rules"));
}

#[test]
fn scenario_file_is_loaded() {
    let tmp = TempDir::new().expect("create temp dir");
    let path = tmp.path().join("scenarios.json");
    fs::write(
        &path,
        serde_json::json!({
            "hover_block": {
                "scenario_name": "Hover Block",
                "primary_mission": {
                    "waypoints": [{"x": 0, "y": 0, "z": 20}, {"x": 40, "y": 0, "z": 20}],
                    "speed": 4.0,
                    "mission_start_time": 0.0,
                    "mission_end_time": 15.0
                },
                "simulated_flights": [
                    {"flight_id": "Hover", "trajectory": [
                        {"x": 20, "y": 1, "z": 20.5, "time": 0},
                        {"x": 20, "y": 1, "z": 20.5, "time": 60}
                    ]}
                ]
            }
        })
        .to_string(),
    )
    .expect("write scenario file");

    let value = run_json(
        &mut cmd(),
        &["--scenarios", path.to_str().unwrap(), "run", "hover_block"],
    );
    assert_eq!(value["name"], "Hover Block");
    assert_eq!(value["report"]["status"], "CONFLICT");
    assert_eq!(value["report"]["conflicts"][0]["other_id"], "Hover");

    let value = run_json(
        &mut cmd(),
        &["--scenarios", path.to_str().unwrap(), "run", "hover_block", "--start", "6"],
    );
    assert_eq!(value["report"]["conflicts"][0]["other_id"], "MISSION_TIME_WINDOW_EXCEEDED");
}
