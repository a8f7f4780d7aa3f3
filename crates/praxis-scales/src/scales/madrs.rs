use crate::Scale;
use crate::scoring::SeverityThresholds;

/// MADRS: Montgomery-Åsberg Depression Rating Scale.
/// 10 items rated 0–6. Total 0–60.
pub struct Madrs;

impl Scale for Madrs {
    fn id(&self) -> &str {
        "MADRS"
    }

    fn name(&self) -> &str {
        "Montgomery-Asberg Depression Rating Scale"
    }

    fn max_score(&self) -> f64 {
        60.0
    }

    fn thresholds(&self) -> Option<SeverityThresholds> {
        Some(SeverityThresholds {
            mild: 6.0,
            moderate: 19.0,
            severe: 34.0,
        })
    }
}
