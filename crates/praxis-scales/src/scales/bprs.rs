use crate::Scale;
use crate::scoring::SeverityThresholds;

/// BPRS: Brief Psychiatric Rating Scale, 18-item version rated 1–7.
pub struct Bprs;

impl Scale for Bprs {
    fn id(&self) -> &str {
        "BPRS"
    }

    fn name(&self) -> &str {
        "Brief Psychiatric Rating Scale"
    }

    fn max_score(&self) -> f64 {
        126.0
    }

    fn thresholds(&self) -> Option<SeverityThresholds> {
        Some(SeverityThresholds {
            mild: 31.0,
            moderate: 41.0,
            severe: 53.0,
        })
    }
}
