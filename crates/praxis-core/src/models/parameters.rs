use serde::{Deserialize, Serialize};
use ts_rs::TS;

pub const DEFAULT_TIME_HORIZON_DAYS: i64 = 90;
pub const DEFAULT_MAX_MEDICATION_CHANGES: i64 = 2;
pub const DEFAULT_MIN_TREATMENT_DURATION_DAYS: i64 = 30;
pub const DEFAULT_MAX_DOSAGE: f64 = 100.0;

/// What the optimizer should reduce when comparing candidate plans.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Objective {
    /// Mean predicted severity over the horizon.
    #[default]
    MinimizeSymptoms,
    /// Number and dose of active medications, severity as tie-break.
    MinimizeMedicationBurden,
    /// Predicted severity at the end of the horizon.
    MaximizeFunctioning,
    /// Spread of the predicted trajectory, severity as tie-break.
    StabilizeMood,
}

impl Objective {
    pub fn as_str(&self) -> &'static str {
        match self {
            Objective::MinimizeSymptoms => "minimize_symptoms",
            Objective::MinimizeMedicationBurden => "minimize_medication_burden",
            Objective::MaximizeFunctioning => "maximize_functioning",
            Objective::StabilizeMood => "stabilize_mood",
        }
    }
}

/// Limits every candidate plan must respect. Signed types so negative
/// caller input can be detected and rejected rather than wrapped.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TreatmentConstraints {
    #[serde(default = "default_max_medication_changes")]
    #[ts(type = "number")]
    pub max_medication_changes: i64,
    #[serde(default = "default_min_treatment_duration_days")]
    #[ts(type = "number")]
    pub min_treatment_duration_days: i64,
    #[serde(default = "default_max_dosage")]
    pub max_dosage: f64,
}

impl Default for TreatmentConstraints {
    fn default() -> Self {
        Self {
            max_medication_changes: DEFAULT_MAX_MEDICATION_CHANGES,
            min_treatment_duration_days: DEFAULT_MIN_TREATMENT_DURATION_DAYS,
            max_dosage: DEFAULT_MAX_DOSAGE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OptimizationParameters {
    #[serde(default = "default_time_horizon_days")]
    #[ts(type = "number")]
    pub time_horizon_days: i64,
    #[serde(default)]
    pub objective: Objective,
    #[serde(default)]
    pub constraints: TreatmentConstraints,
    /// Evaluation instant. Defaults to the latest date in the history.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub as_of: Option<jiff::Timestamp>,
}

impl Default for OptimizationParameters {
    fn default() -> Self {
        Self {
            time_horizon_days: DEFAULT_TIME_HORIZON_DAYS,
            objective: Objective::default(),
            constraints: TreatmentConstraints::default(),
            as_of: None,
        }
    }
}

fn default_time_horizon_days() -> i64 {
    DEFAULT_TIME_HORIZON_DAYS
}

fn default_max_medication_changes() -> i64 {
    DEFAULT_MAX_MEDICATION_CHANGES
}

fn default_min_treatment_duration_days() -> i64 {
    DEFAULT_MIN_TREATMENT_DURATION_DAYS
}

fn default_max_dosage() -> f64 {
    DEFAULT_MAX_DOSAGE
}
