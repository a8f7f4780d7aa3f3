//! Tunable constants of the engine.
//!
//! None of these values are fitted to data; they are chosen so that the
//! behaviour is easy to reason about and can be overridden per deployment.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
#[error("{field}: {reason}")]
pub struct ConfigError {
    pub field: &'static str,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Most recent observations kept per scale.
    pub per_scale_limit: usize,
    /// Age at which an observation weighs half as much as a fresh one.
    pub decay_half_life_days: f64,
    /// Total recency weight that earns full confidence.
    pub expected_weight_floor: f64,
    /// Trailing window of the GAF series used for the baseline trend.
    pub trend_window_days: i64,
    pub sampling_interval_days: i64,
    /// Bound on the fitted baseline slope, severity points per day.
    pub max_baseline_slope: f64,
    /// Slope bump of a fully effective medication at reference dose.
    pub improvement_slope: f64,
    pub reference_dose: f64,
    /// Bound on the summed treatment deviation from the baseline slope.
    pub max_slope_adjustment: f64,
    pub beam_width: usize,
    /// Plan evaluations allowed per search.
    pub iteration_cap: usize,
    /// Candidate action dates per search.
    pub max_offsets: usize,
    /// Plan confidence when the search stopped at `iteration_cap`.
    pub budget_confidence: f64,
    /// Confidence ceiling for results built without usable data.
    pub insufficient_data_confidence: f64,
    pub max_horizon_days: i64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            per_scale_limit: 10,
            decay_half_life_days: 90.0,
            expected_weight_floor: 3.0,
            trend_window_days: 180,
            sampling_interval_days: 7,
            max_baseline_slope: 1.0,
            improvement_slope: 0.15,
            reference_dose: 100.0,
            max_slope_adjustment: 0.5,
            beam_width: 8,
            iteration_cap: 2_000,
            max_offsets: 6,
            budget_confidence: 0.6,
            insufficient_data_confidence: 0.1,
            max_horizon_days: 3_650,
        }
    }
}

impl EngineConfig {
    /// Exponential decay constant derived from the half-life.
    pub fn decay_lambda(&self) -> f64 {
        std::f64::consts::LN_2 / self.decay_half_life_days
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        positive_count("per_scale_limit", self.per_scale_limit)?;
        positive_count("beam_width", self.beam_width)?;
        positive_count("iteration_cap", self.iteration_cap)?;
        positive_count("max_offsets", self.max_offsets)?;
        positive("decay_half_life_days", self.decay_half_life_days)?;
        positive("expected_weight_floor", self.expected_weight_floor)?;
        positive("reference_dose", self.reference_dose)?;
        non_negative("max_baseline_slope", self.max_baseline_slope)?;
        non_negative("improvement_slope", self.improvement_slope)?;
        non_negative("max_slope_adjustment", self.max_slope_adjustment)?;
        unit_interval("budget_confidence", self.budget_confidence)?;
        unit_interval("insufficient_data_confidence", self.insufficient_data_confidence)?;
        positive_days("trend_window_days", self.trend_window_days)?;
        positive_days("sampling_interval_days", self.sampling_interval_days)?;
        positive_days("max_horizon_days", self.max_horizon_days)?;
        Ok(())
    }
}

fn positive_count(field: &'static str, value: usize) -> Result<(), ConfigError> {
    if value == 0 {
        return Err(ConfigError {
            field,
            reason: "must be at least 1".to_string(),
        });
    }
    Ok(())
}

fn positive_days(field: &'static str, value: i64) -> Result<(), ConfigError> {
    if value <= 0 {
        return Err(ConfigError {
            field,
            reason: format!("must be a positive number of days, got {value}"),
        });
    }
    Ok(())
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if !(value.is_finite() && value > 0.0) {
        return Err(ConfigError {
            field,
            reason: format!("must be a positive finite number, got {value}"),
        });
    }
    Ok(())
}

fn non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if !(value.is_finite() && value >= 0.0) {
        return Err(ConfigError {
            field,
            reason: format!("must be a non-negative finite number, got {value}"),
        });
    }
    Ok(())
}

fn unit_interval(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(ConfigError {
            field,
            reason: format!("must lie in [0, 1], got {value}"),
        });
    }
    Ok(())
}
