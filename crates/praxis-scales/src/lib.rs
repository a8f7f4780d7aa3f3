//! praxis-scales
//!
//! Reference table of psychiatric rating scales and the severity
//! normalizer built on it. Pure data and arithmetic, no I/O.

pub mod error;
pub mod normalize;
pub mod scales;
pub mod scoring;

use std::sync::LazyLock;

use praxis_core::models::observation::ScaleObservation;
use scoring::{Polarity, ScoreRange, SeverityBand, SeverityThresholds, ValidationError};

/// Trait implemented by each supported clinical rating scale.
pub trait Scale: Send + Sync {
    /// Canonical identifier, also the display key (e.g., "YMRS", "HAM-D").
    fn id(&self) -> &str;

    /// Full instrument name.
    fn name(&self) -> &str;

    /// Alternative spellings accepted on lookup, besides the id.
    fn aliases(&self) -> &[&str] {
        &[]
    }

    /// Highest attainable raw score.
    fn max_score(&self) -> f64;

    fn polarity(&self) -> Polarity {
        Polarity::Symptom
    }

    /// Raw-score cutoffs for mild, moderate and severe symptoms.
    fn thresholds(&self) -> Option<SeverityThresholds> {
        None
    }

    fn range(&self) -> ScoreRange {
        ScoreRange {
            min: 0.0,
            max: self.max_score(),
        }
    }

    /// Severity band for a raw score. Scales without thresholds have none.
    fn classify(&self, raw_score: f64) -> Option<SeverityBand> {
        self.thresholds().map(|t| t.classify(raw_score))
    }

    /// Severity band of an observation. A raw score given against its own
    /// maximum is rescaled onto the reference maximum before classifying.
    fn classify_observation(&self, observation: &ScaleObservation) -> Option<SeverityBand> {
        let raw = match observation.max_score {
            Some(max) if max.is_finite() && max > 0.0 => {
                observation.raw_score * self.max_score() / max
            }
            _ => observation.raw_score,
        };
        self.classify(raw)
    }

    /// Whether `name` refers to this scale, ignoring case and separators.
    fn matches(&self, name: &str) -> bool {
        let key = lookup_key(name);
        lookup_key(self.id()) == key || self.aliases().iter().any(|a| lookup_key(a) == key)
    }

    /// Check an observation's raw score against this scale's range.
    fn validate(&self, observation: &ScaleObservation) -> Option<ValidationError> {
        let range = match observation.max_score {
            Some(max) if max > 0.0 => ScoreRange { min: 0.0, max },
            _ => self.range(),
        };
        if range.contains(observation.raw_score) {
            return None;
        }
        Some(ValidationError {
            scale: self.id().to_string(),
            value: observation.raw_score,
            expected_range: range,
            message: format!(
                "{}: score {} is outside range [{}, {}]",
                self.id(),
                observation.raw_score,
                range.min,
                range.max,
            ),
        })
    }
}

static REGISTRY: LazyLock<Vec<Box<dyn Scale>>> = LazyLock::new(|| {
    vec![
        Box::new(scales::ymrs::Ymrs),
        Box::new(scales::hamd::HamD),
        Box::new(scales::panss::Panss),
        Box::new(scales::cgi::CgiS),
        Box::new(scales::madrs::Madrs),
        Box::new(scales::hama::HamA),
        Box::new(scales::bprs::Bprs),
        Box::new(scales::gaf::Gaf),
    ]
});

/// Return all registered scales.
pub fn all_scales() -> &'static [Box<dyn Scale>] {
    &REGISTRY
}

/// Look up a scale by id or alias.
pub fn get_scale(name: &str) -> Option<&'static dyn Scale> {
    all_scales().iter().find(|s| s.matches(name)).map(|s| s.as_ref())
}

/// Grouping key for a scale name: the registry id when known, otherwise
/// the trimmed upper-cased name.
pub fn canonical_name(name: &str) -> String {
    match get_scale(name) {
        Some(scale) => scale.id().to_string(),
        None => name.trim().to_uppercase(),
    }
}

fn lookup_key(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, ' ' | '-' | '_'))
        .flat_map(char::to_uppercase)
        .collect()
}
