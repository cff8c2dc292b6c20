//! Pre-defined deconfliction scenarios and scenario file loading.

use anyhow::{ensure, Context, Result};
use deconflict_core::{Mission, Point3, TimedPoint, TrackedFlight};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Speed of the shared primary mission (m/s).
const PRIMARY_SPEED: f64 = 10.0;
/// The primary mission takes 10s; it must be done within [0, 20].
const WINDOW_START: f64 = 0.0;
const WINDOW_END: f64 = 20.0;

/// A primary mission together with the traffic it is checked against.
#[derive(Debug, Clone)]
pub struct Scenario {
    pub name: String,
    pub mission: Mission,
    pub flights: Vec<TrackedFlight>,
}

impl Scenario {
    /// Departure used when the caller does not pick one.
    pub fn default_start_time(&self) -> f64 {
        self.mission.window_start
    }
}

/// Our mission flies from (0, 50) to (100, 50) at 50m altitude.
fn primary_mission(window_end: f64) -> Mission {
    Mission {
        waypoints: vec![Point3::new(0.0, 50.0, 50.0), Point3::new(100.0, 50.0, 50.0)],
        speed: PRIMARY_SPEED,
        window_start: WINDOW_START,
        window_end,
    }
}

/// Straight flight between two points over [from, to].
fn straight(id: &str, start: (f64, f64, f64), end: (f64, f64, f64), from: f64, to: f64) -> TrackedFlight {
    TrackedFlight::new(
        id,
        vec![
            TimedPoint::at(start.0, start.1, start.2, from),
            TimedPoint::at(end.0, end.1, end.2, to),
        ],
    )
}

/// Another drone on a parallel track, airborne only after we have landed.
pub fn create_clear_scenario() -> Scenario {
    Scenario {
        name: "Clear Scenario".to_string(),
        mission: primary_mission(WINDOW_END),
        flights: vec![straight(
            "Drone-A (Clear)",
            (0.0, 60.0, 50.0),
            (100.0, 60.0, 50.0),
            30.0,
            40.0,
        )],
    }
}

/// Drone flying our route in reverse at the same time.
pub fn create_head_on_scenario() -> Scenario {
    Scenario {
        name: "Head-On Conflict".to_string(),
        mission: primary_mission(WINDOW_END),
        flights: vec![straight(
            "Drone-B (Head-On)",
            (100.0, 50.0, 50.0),
            (0.0, 50.0, 50.0),
            0.0,
            10.0,
        )],
    }
}

/// South-to-north crossing; both drones reach (50, 50, 50) at t=5.
pub fn create_crossing_scenario() -> Scenario {
    Scenario {
        name: "Crossing Conflict".to_string(),
        mission: primary_mission(WINDOW_END),
        flights: vec![straight(
            "Drone-C (Crossing)",
            (50.0, 0.0, 50.0),
            (50.0, 100.0, 50.0),
            0.0,
            10.0,
        )],
    }
}

/// Same crossing 25m above us, which clears the vertical buffer.
pub fn create_near_miss_scenario() -> Scenario {
    Scenario {
        name: "3D Near Miss (Altitude Clear)".to_string(),
        mission: primary_mission(WINDOW_END),
        flights: vec![straight(
            "Drone-D (Near Miss)",
            (50.0, 0.0, 75.0),
            (50.0, 100.0, 75.0),
            0.0,
            10.0,
        )],
    }
}

/// No traffic, but the mission cannot land by t=5.
pub fn create_time_window_scenario() -> Scenario {
    Scenario {
        name: "Mission Time Window Violation".to_string(),
        mission: primary_mission(5.0),
        flights: Vec::new(),
    }
}

/// Three drones hovering near (50, 50, 50) around t=5.
///
/// - Drone-A: inside the horizontal radius, 10m above
/// - Drone-B: inside the vertical half-height, 10m to the side
/// - Drone-C: inside both, the only conflict with default buffers
pub fn create_cylindrical_scenario() -> Scenario {
    let hover = |id: &str, x: f64, y: f64, z: f64| straight(id, (x, y, z), (x, y, z), 4.9, 5.1);

    Scenario {
        name: "Cylindrical Buffer Test".to_string(),
        mission: primary_mission(WINDOW_END),
        flights: vec![
            hover("Drone-A (H-Close)", 50.0, 53.0, 60.0),
            hover("Drone-B (V-Close)", 50.0, 60.0, 51.0),
            hover("Drone-C (CONFLICT)", 50.0, 53.0, 51.0),
        ],
    }
}

/// All built-in scenarios keyed by stable identifier.
pub fn builtin_scenarios() -> BTreeMap<String, Scenario> {
    [
        ("clear_scenario", create_clear_scenario()),
        ("head_on_conflict", create_head_on_scenario()),
        ("crossing_conflict", create_crossing_scenario()),
        ("near_miss_3d", create_near_miss_scenario()),
        ("time_window_violation", create_time_window_scenario()),
        ("cylindrical_test", create_cylindrical_scenario()),
    ]
    .into_iter()
    .map(|(key, scenario)| (key.to_string(), scenario))
    .collect()
}

/// One entry of a scenario file.
#[derive(Debug, Deserialize)]
struct ScenarioEntry {
    scenario_name: String,
    primary_mission: Mission,
    #[serde(default)]
    simulated_flights: Vec<TrackedFlight>,
}

/// Load scenarios from a JSON file.
///
/// Entries that fail to parse are skipped with a warning; the load fails
/// only when the file is unreadable, is not a JSON object, or yields no
/// usable scenario.
pub fn load_scenarios(path: &Path) -> Result<BTreeMap<String, Scenario>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read scenario file {}", path.display()))?;
    let scenarios = parse_scenarios(&raw)
        .with_context(|| format!("Failed to load scenarios from {}", path.display()))?;
    tracing::info!("Loaded {} scenario(s) from {}", scenarios.len(), path.display());
    Ok(scenarios)
}

/// Parse the contents of a scenario file.
pub fn parse_scenarios(raw: &str) -> Result<BTreeMap<String, Scenario>> {
    let entries: BTreeMap<String, serde_json::Value> =
        serde_json::from_str(raw).context("Scenario file must be a JSON object")?;

    let mut scenarios = BTreeMap::new();
    for (key, value) in entries {
        match parse_entry(value) {
            Ok(scenario) => {
                scenarios.insert(key, scenario);
            }
            Err(e) => tracing::warn!("Skipping scenario '{}': {:#}", key, e),
        }
    }

    ensure!(!scenarios.is_empty(), "No valid scenarios were loaded");
    Ok(scenarios)
}

fn parse_entry(value: serde_json::Value) -> Result<Scenario> {
    let entry: ScenarioEntry = serde_json::from_value(value)?;
    let mission = entry.primary_mission;

    ensure!(
        !mission.waypoints.is_empty(),
        "Primary mission needs at least one waypoint"
    );
    ensure!(
        mission.window_end >= mission.window_start,
        "Mission window ends ({}s) before it starts ({}s)",
        mission.window_end,
        mission.window_start
    );
    for flight in &entry.simulated_flights {
        ensure!(
            flight.trajectory.is_time_ordered(),
            "Flight '{}' has timestamps out of order",
            flight.id
        );
    }

    Ok(Scenario {
        name: entry.scenario_name,
        mission,
        flights: entry.simulated_flights,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use deconflict_core::{build_trajectory, ConflictDetector};

    fn check(scenario: &Scenario) -> deconflict_core::ConflictReport {
        let trajectory = build_trajectory(&scenario.mission, scenario.default_start_time()).unwrap();
        ConflictDetector::default().check(&trajectory, scenario.mission.window_end, &scenario.flights)
    }

    #[test]
    fn test_builtin_keys() {
        let keys: Vec<String> = builtin_scenarios().into_keys().collect();
        assert_eq!(
            keys,
            vec![
                "clear_scenario",
                "crossing_conflict",
                "cylindrical_test",
                "head_on_conflict",
                "near_miss_3d",
                "time_window_violation",
            ]
        );
    }

    #[test]
    fn test_builtin_outcomes_with_default_rules() {
        assert!(check(&create_clear_scenario()).is_clear());
        assert!(check(&create_near_miss_scenario()).is_clear());
        assert!(!check(&create_head_on_scenario()).is_clear());
        assert!(!check(&create_crossing_scenario()).is_clear());

        let window = check(&create_time_window_scenario());
        assert!(window.conflicts()[0].is_window_violation());
    }

    #[test]
    fn test_cylindrical_scenario_flags_only_drone_c() {
        let report = check(&create_cylindrical_scenario());
        assert_eq!(report.conflicts().len(), 1);
        assert_eq!(report.conflicts()[0].other_id, "Drone-C (CONFLICT)");
    }

    #[test]
    fn test_parse_scenario_file() {
        let raw = serde_json::json!({
            "custom": {
                "scenario_name": "Custom",
                "primary_mission": {
                    "waypoints": [{"x": 0, "y": 0, "z": 10}, {"x": 30, "y": 40, "z": 10}],
                    "speed": 5.0,
                    "mission_start_time": 2.0,
                    "mission_end_time": 30.0
                },
                "simulated_flights": [
                    {"flight_id": "X", "trajectory": [
                        {"x": 0, "y": 0, "z": 10, "time": 0},
                        {"x": 0, "y": 0, "z": 10, "time": 5}
                    ]}
                ]
            }
        })
        .to_string();

        let scenarios = parse_scenarios(&raw).unwrap();
        let custom = &scenarios["custom"];
        assert_eq!(custom.name, "Custom");
        assert_eq!(custom.default_start_time(), 2.0);
        assert_eq!(custom.flights[0].id, "X");
        assert_eq!(custom.mission.waypoints[1], Point3::new(30.0, 40.0, 10.0));
    }

    #[test]
    fn test_parse_skips_broken_entries() {
        let raw = serde_json::json!({
            "broken": {"scenario_name": "No mission"},
            "reversed": {
                "scenario_name": "Reversed",
                "primary_mission": {
                    "waypoints": [{"x": 0, "y": 0, "z": 0}],
                    "speed": 1.0,
                    "mission_start_time": 0.0,
                    "mission_end_time": 1.0
                },
                "simulated_flights": [
                    {"flight_id": "Y", "trajectory": [
                        {"x": 0, "y": 0, "z": 0, "time": 5},
                        {"x": 1, "y": 0, "z": 0, "time": 1}
                    ]}
                ]
            },
            "ok": {
                "scenario_name": "Ok",
                "primary_mission": {
                    "waypoints": [{"x": 0, "y": 0, "z": 0}],
                    "speed": 1.0,
                    "mission_start_time": 0.0,
                    "mission_end_time": 1.0
                }
            }
        })
        .to_string();

        let scenarios = parse_scenarios(&raw).unwrap();
        assert_eq!(scenarios.len(), 1);
        assert!(scenarios["ok"].flights.is_empty());
    }

    #[test]
    fn test_parse_rejects_empty_or_invalid_files() {
        assert!(parse_scenarios("[]").is_err());
        assert!(parse_scenarios("{}").is_err());
        assert!(parse_scenarios("{\"bad\": 1}").is_err());
    }

    #[test]
    fn test_load_missing_file_mentions_path() {
        let err = load_scenarios(Path::new("/nonexistent/scenarios.json")).unwrap_err();
        assert!(format!("{:#}", err).contains("/nonexistent/scenarios.json"));
    }
}
