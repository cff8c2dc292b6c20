//! Deconfliction CLI - scenario tooling around the deconfliction core.
//!
//! This crate provides:
//! - built-in and file-based deconfliction scenarios
//! - a runner that checks a scenario at a chosen departure time
//! - text and JSON rendering for the `deconflict` binary

pub mod config;
pub mod report;
pub mod runner;
pub mod scenarios;

pub use config::Config;
pub use runner::{run_scenario, RunOutcome};
pub use scenarios::{builtin_scenarios, load_scenarios, Scenario};
