use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::gaf::GafResult;
use super::parameters::Objective;
use super::plan::MedicationAction;

/// One sample of a predicted trajectory. `predicted_score` is symptom
/// severity on 0–100 (higher is worse, i.e. `100 - GAF`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TrajectoryPoint {
    pub date: jiff::Timestamp,
    pub predicted_score: f64,
    pub lower: f64,
    pub upper: f64,
}

/// Degraded-but-returned conditions attached to a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum ResultFlag {
    InsufficientData,
    SearchBudgetExceeded,
    ObservationsExcluded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RiskAssessment {
    pub level: RiskLevel,
    pub factors: Vec<String>,
    pub mitigations: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum TrendDirection {
    Improving,
    Stable,
    Deteriorating,
}

/// Direction of the historical GAF series, first to last point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TrendAssessment {
    pub direction: TrendDirection,
    pub change: f64,
    pub description: String,
}

/// The engine's output contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OptimizationResult {
    pub recommended_plan: Vec<MedicationAction>,
    pub predicted_trajectory: Vec<TrajectoryPoint>,
    pub rationale: String,
    pub confidence: f64,
    pub objective: Objective,
    pub gaf: GafResult,
    pub flags: BTreeSet<ResultFlag>,
    pub risk: RiskAssessment,
    pub trend: TrendAssessment,
    pub treatment_suggestions: Vec<String>,
    /// GAF implied by the last trajectory sample.
    pub gaf_prediction: Option<f64>,
}

impl OptimizationResult {
    pub fn has_flag(&self, flag: ResultFlag) -> bool {
        self.flags.contains(&flag)
    }
}
