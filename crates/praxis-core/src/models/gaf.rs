use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Where a normalization took its maximum from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum MaxSource {
    Observation,
    ReferenceTable,
}

/// Audit record for one observation that contributed to a score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ObservationProvenance {
    pub scale: String,
    pub date: jiff::Timestamp,
    pub raw_score: f64,
    pub severity: f64,
    pub weight: f64,
    /// The raw score fell outside `[0, max]` and was clamped.
    pub clamped: bool,
    pub max_source: MaxSource,
}

/// An observation left out of a score, with the reason.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ExcludedObservation {
    pub scale_name: String,
    pub date: jiff::Timestamp,
    pub reason: String,
}

/// Aggregated functioning score across all scales.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct GafResult {
    /// In `[0, 100]`, higher is better functioning. `None` when no
    /// observation could be normalized.
    pub score: Option<f64>,
    pub confidence: f64,
    pub contributing_scales: BTreeSet<String>,
    pub insufficient_data: bool,
    #[serde(default)]
    pub observations: Vec<ObservationProvenance>,
    #[serde(default)]
    pub excluded: Vec<ExcludedObservation>,
}

impl GafResult {
    pub fn insufficient(excluded: Vec<ExcludedObservation>) -> Self {
        Self {
            score: None,
            confidence: 0.0,
            contributing_scales: BTreeSet::new(),
            insufficient_data: true,
            observations: Vec::new(),
            excluded,
        }
    }

    pub fn band(&self) -> Option<GafBand> {
        self.score.map(GafBand::for_score)
    }
}

/// The conventional ten-point GAF functioning bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum GafBand {
    Superior,
    Minimal,
    Slight,
    Mild,
    Moderate,
    Serious,
    ImpairedReality,
    Major,
    Danger,
    Persistent,
}

impl GafBand {
    pub fn for_score(score: f64) -> Self {
        match score.round() as i64 {
            91.. => GafBand::Superior,
            81..=90 => GafBand::Minimal,
            71..=80 => GafBand::Slight,
            61..=70 => GafBand::Mild,
            51..=60 => GafBand::Moderate,
            41..=50 => GafBand::Serious,
            31..=40 => GafBand::ImpairedReality,
            21..=30 => GafBand::Major,
            11..=20 => GafBand::Danger,
            _ => GafBand::Persistent,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            GafBand::Superior => "superior functioning with no notable psychiatric symptoms",
            GafBand::Minimal => "transient mild symptoms, good overall functioning",
            GafBand::Slight => "mild symptoms with slight impairment in social or occupational functioning",
            GafBand::Mild => "moderate symptoms with noticeable loss of functioning",
            GafBand::Moderate => "moderately serious symptoms with serious loss of functioning",
            GafBand::Serious => "serious symptoms with significant impairment",
            GafBand::ImpairedReality => "severe symptoms with some impairment in reality testing",
            GafBand::Major => "very serious behavioural disturbance, risk of self-harm",
            GafBand::Danger => "persistent danger of hurting self or others",
            GafBand::Persistent => "grossly impaired functioning, urgent psychiatric care required",
        }
    }
}
