//! Safety rules and sampling thresholds for deconfliction checks.

use serde::{Deserialize, Serialize};

/// Configuration for one deconfliction run.
///
/// Built once by the caller and passed by reference into every check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SafetyRules {
    /// Radius of the safety cylinder in meters
    pub buffer_horizontal_m: f64,
    /// Half-height of the safety cylinder in meters
    pub buffer_vertical_m: f64,
    /// Sampling cadence in seconds
    pub time_step_s: f64,
}

impl Default for SafetyRules {
    fn default() -> Self {
        Self {
            buffer_horizontal_m: 5.0,
            buffer_vertical_m: 2.0,
            time_step_s: 0.5,
        }
    }
}

impl SafetyRules {
    pub fn new(buffer_horizontal_m: f64, buffer_vertical_m: f64, time_step_s: f64) -> Self {
        Self {
            buffer_horizontal_m,
            buffer_vertical_m,
            time_step_s,
        }
    }

    /// Validate the rule set.
    /// Returns list of validation errors (empty = valid).
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.buffer_horizontal_m.is_nan() || self.buffer_horizontal_m < 0.0 {
            errors.push(format!(
                "Horizontal buffer must be a non-negative number (got {})",
                self.buffer_horizontal_m
            ));
        }
        if self.buffer_vertical_m.is_nan() || self.buffer_vertical_m < 0.0 {
            errors.push(format!(
                "Vertical buffer must be a non-negative number (got {})",
                self.buffer_vertical_m
            ));
        }
        if !(self.time_step_s.is_finite() && self.time_step_s > 0.0) {
            errors.push(format!(
                "Time step must be a positive finite number of seconds (got {})",
                self.time_step_s
            ));
        }

        errors
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}
