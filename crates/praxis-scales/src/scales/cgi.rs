use crate::Scale;
use crate::scoring::SeverityThresholds;

/// CGI-S: Clinical Global Impression, Severity. Single rating 1–7.
pub struct CgiS;

impl Scale for CgiS {
    fn id(&self) -> &str {
        "CGI-S"
    }

    fn name(&self) -> &str {
        "Clinical Global Impression - Severity"
    }

    fn aliases(&self) -> &[&str] {
        &["CGI"]
    }

    fn max_score(&self) -> f64 {
        7.0
    }

    fn thresholds(&self) -> Option<SeverityThresholds> {
        Some(SeverityThresholds {
            mild: 2.0,
            moderate: 3.0,
            severe: 4.0,
        })
    }
}
