use crate::Scale;
use crate::scoring::SeverityThresholds;

/// HAM-D: Hamilton Depression Rating Scale, 17-item version. Total 0–52.
pub struct HamD;

impl Scale for HamD {
    fn id(&self) -> &str {
        "HAM-D"
    }

    fn name(&self) -> &str {
        "Hamilton Depression Rating Scale"
    }

    fn aliases(&self) -> &[&str] {
        &["HDRS", "HAM-D17", "HRSD"]
    }

    fn max_score(&self) -> f64 {
        52.0
    }

    fn thresholds(&self) -> Option<SeverityThresholds> {
        Some(SeverityThresholds {
            mild: 8.0,
            moderate: 16.0,
            severe: 24.0,
        })
    }
}
