use crate::Scale;
use crate::scoring::SeverityThresholds;

/// PANSS: Positive and Negative Syndrome Scale.
/// 30 items rated 1–7 across positive, negative and general
/// psychopathology subscales. Normalized against the 210 ceiling.
pub struct Panss;

impl Scale for Panss {
    fn id(&self) -> &str {
        "PANSS"
    }

    fn name(&self) -> &str {
        "Positive and Negative Syndrome Scale"
    }

    fn max_score(&self) -> f64 {
        210.0
    }

    fn thresholds(&self) -> Option<SeverityThresholds> {
        Some(SeverityThresholds {
            mild: 70.0,
            moderate: 90.0,
            severe: 110.0,
        })
    }
}
