use serde::{Deserialize, Serialize};
use thiserror::Error;
use ts_rs::TS;

/// Which direction of a raw score means the patient is worse off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Polarity {
    /// Higher raw score = more symptoms (YMRS, HAM-D, PANSS, ...).
    Symptom,
    /// Higher raw score = better functioning (GAF).
    Functioning,
}

/// Inclusive range of valid raw scores.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ScoreRange {
    pub min: f64,
    pub max: f64,
}

impl ScoreRange {
    pub fn contains(&self, value: f64) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum SeverityBand {
    Minimal,
    Mild,
    Moderate,
    Severe,
}

impl SeverityBand {
    pub fn as_str(&self) -> &'static str {
        match self {
            SeverityBand::Minimal => "minimal",
            SeverityBand::Mild => "mild",
            SeverityBand::Moderate => "moderate",
            SeverityBand::Severe => "severe",
        }
    }
}

/// Raw-score cutoffs; a score strictly above a cutoff enters that band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SeverityThresholds {
    pub mild: f64,
    pub moderate: f64,
    pub severe: f64,
}

impl SeverityThresholds {
    pub fn classify(&self, raw_score: f64) -> SeverityBand {
        if raw_score > self.severe {
            SeverityBand::Severe
        } else if raw_score > self.moderate {
            SeverityBand::Moderate
        } else if raw_score > self.mild {
            SeverityBand::Mild
        } else {
            SeverityBand::Minimal
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS, Error)]
#[ts(export)]
#[error("{message}")]
pub struct ValidationError {
    pub scale: String,
    pub value: f64,
    pub expected_range: ScoreRange,
    pub message: String,
}
