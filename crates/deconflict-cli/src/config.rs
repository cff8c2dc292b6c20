//! CLI configuration from environment.

use std::env;
use std::path::PathBuf;

use deconflict_core::SafetyRules;

pub const ENV_BUFFER_HORIZONTAL: &str = "DECONFLICT_BUFFER_HORIZONTAL_M";
pub const ENV_BUFFER_VERTICAL: &str = "DECONFLICT_BUFFER_VERTICAL_M";
pub const ENV_TIME_STEP: &str = "DECONFLICT_TIME_STEP_S";
pub const ENV_SCENARIOS: &str = "DECONFLICT_SCENARIOS";

#[derive(Debug, Clone)]
pub struct Config {
    pub rules: SafetyRules,
    /// Scenario file; built-in scenarios are used when unset
    pub scenarios_path: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup. Unset or unparsable values fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = SafetyRules::default();
        let number = |key: &str, fallback: f64| {
            lookup(key)
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(fallback)
        };

        Self {
            rules: SafetyRules {
                buffer_horizontal_m: number(ENV_BUFFER_HORIZONTAL, defaults.buffer_horizontal_m),
                buffer_vertical_m: number(ENV_BUFFER_VERTICAL, defaults.buffer_vertical_m),
                time_step_s: number(ENV_TIME_STEP, defaults.time_step_s),
            },
            scenarios_path: lookup(ENV_SCENARIOS)
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from),
        }
    }

    /// Command-line values win over the environment.
    pub fn with_overrides(
        mut self,
        buffer_horizontal_m: Option<f64>,
        buffer_vertical_m: Option<f64>,
        time_step_s: Option<f64>,
        scenarios_path: Option<PathBuf>,
    ) -> Self {
        if let Some(value) = buffer_horizontal_m {
            self.rules.buffer_horizontal_m = value;
        }
        if let Some(value) = buffer_vertical_m {
            self.rules.buffer_vertical_m = value;
        }
        if let Some(value) = time_step_s {
            self.rules.time_step_s = value;
        }
        if scenarios_path.is_some() {
            self.scenarios_path = scenarios_path;
        }
        self
    }
}
