use crate::Scale;
use crate::scoring::SeverityThresholds;

/// HAM-A: Hamilton Anxiety Rating Scale. 14 items rated 0–4, total 0–56.
pub struct HamA;

impl Scale for HamA {
    fn id(&self) -> &str {
        "HAM-A"
    }

    fn name(&self) -> &str {
        "Hamilton Anxiety Rating Scale"
    }

    fn max_score(&self) -> f64 {
        56.0
    }

    fn thresholds(&self) -> Option<SeverityThresholds> {
        Some(SeverityThresholds {
            mild: 7.0,
            moderate: 17.0,
            severe: 24.0,
        })
    }
}
