use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// A single administration of a clinical rating scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ScaleObservation {
    pub date: jiff::Timestamp,
    pub scale_name: String,
    pub raw_score: f64,
    /// Overrides the reference table maximum when present and positive.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_score: Option<f64>,
}
