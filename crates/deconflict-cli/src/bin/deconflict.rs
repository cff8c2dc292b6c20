//! CLI tool for checking a primary drone mission against recorded traffic.
//!
//! Reports are written to stdout; logs go to stderr.

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use deconflict_cli::report::{render_run, RunRecord};
use deconflict_cli::{builtin_scenarios, load_scenarios, run_scenario, Config, Scenario};
use deconflict_core::ConflictDetector;
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Strategic deconfliction for drone missions
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Scenario file (JSON); built-in scenarios are used when omitted
    #[arg(long, global = true)]
    scenarios: Option<PathBuf>,

    /// Horizontal safety buffer in meters
    #[arg(long, global = true, allow_negative_numbers = true)]
    buffer_horizontal: Option<f64>,

    /// Vertical safety buffer in meters
    #[arg(long, global = true, allow_negative_numbers = true)]
    buffer_vertical: Option<f64>,

    /// Sampling time step in seconds
    #[arg(long, global = true, allow_negative_numbers = true)]
    time_step: Option<f64>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List available scenarios
    List,
    /// Run one scenario
    Run {
        /// Scenario key, as shown by `list`
        key: String,

        /// Departure time in seconds (default: start of the mission window)
        #[arg(long, allow_negative_numbers = true)]
        start: Option<f64>,
    },
    /// Run every scenario at its default departure time
    RunAll,
}

#[derive(Serialize)]
struct ScenarioSummary<'a> {
    key: &'a str,
    name: &'a str,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("deconflict=info".parse()?)
                .add_directive("deconflict_cli=info".parse()?),
        )
        .init();

    let args = Args::parse();
    let config = Config::from_env().with_overrides(
        args.buffer_horizontal,
        args.buffer_vertical,
        args.time_step,
        args.scenarios,
    );

    let problems = config.rules.validate();
    if !problems.is_empty() {
        bail!("Invalid safety rules: {}", problems.join("; "));
    }

    let scenarios = match &config.scenarios_path {
        Some(path) => load_scenarios(path)?,
        None => builtin_scenarios(),
    };
    let detector = ConflictDetector::new(config.rules);

    match args.command {
        Command::List => list(&scenarios, args.json),
        Command::Run { key, start } => {
            let scenario = scenarios
                .get(&key)
                .with_context(|| format!("Unknown scenario '{}'", key))?;
            let start_time = start.unwrap_or_else(|| scenario.default_start_time());
            let value = execute(&key, scenario, start_time, &detector, args.json)?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&value)?);
            }
            Ok(())
        }
        Command::RunAll => {
            let mut values = Vec::with_capacity(scenarios.len());
            for (key, scenario) in &scenarios {
                values.push(execute(
                    key,
                    scenario,
                    scenario.default_start_time(),
                    &detector,
                    args.json,
                )?);
            }
            if args.json {
                println!("{}", serde_json::to_string_pretty(&values)?);
            }
            Ok(())
        }
    }
}

fn list(scenarios: &BTreeMap<String, Scenario>, json: bool) -> Result<()> {
    if json {
        let summaries: Vec<ScenarioSummary> = scenarios
            .iter()
            .map(|(key, scenario)| ScenarioSummary {
                key,
                name: &scenario.name,
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&summaries)?);
        return Ok(());
    }

    for (key, scenario) in scenarios {
        println!("{:<24} {}", key, scenario.name);
    }
    Ok(())
}

/// Run one scenario, print its text report unless `json` is set, and
/// return the JSON form for the caller to collect.
fn execute(
    key: &str,
    scenario: &Scenario,
    start_time: f64,
    detector: &ConflictDetector,
    json: bool,
) -> Result<serde_json::Value> {
    let outcome = run_scenario(scenario, start_time, detector);
    if !json {
        println!(
            "{}\n",
            render_run(key, scenario, start_time, detector.rules(), &outcome)
        );
    }

    let record = RunRecord {
        key,
        name: &scenario.name,
        start_time,
        outcome: &outcome,
    };
    serde_json::to_value(&record).with_context(|| format!("Failed to serialize run '{}'", key))
}
