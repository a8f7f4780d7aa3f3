use crate::Scale;
use crate::scoring::SeverityThresholds;

/// YMRS: Young Mania Rating Scale.
/// 11 items; four scored 0–8, seven scored 0–4. Total 0–60.
pub struct Ymrs;

impl Scale for Ymrs {
    fn id(&self) -> &str {
        "YMRS"
    }

    fn name(&self) -> &str {
        "Young Mania Rating Scale"
    }

    fn max_score(&self) -> f64 {
        60.0
    }

    fn thresholds(&self) -> Option<SeverityThresholds> {
        Some(SeverityThresholds {
            mild: 8.0,
            moderate: 16.0,
            severe: 24.0,
        })
    }
}
