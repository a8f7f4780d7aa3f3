//! Raw score → severity in `[0, 1]`.

use praxis_core::models::gaf::MaxSource;
use praxis_core::models::observation::ScaleObservation;

use crate::error::ScaleError;
use crate::scoring::Polarity;
use crate::get_scale;

/// A successfully normalized observation.
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized {
    /// Registry id, or the upper-cased name of an unregistered scale.
    pub scale: String,
    /// 0 = no symptoms, 1 = worst attainable.
    pub severity: f64,
    pub effective_max: f64,
    /// The raw score was outside `[0, effective_max]` and was clamped.
    pub clamped: bool,
    pub max_source: MaxSource,
}

/// Map an observation onto `[0, 1]` severity.
///
/// The observation's own `max_score` wins when positive; otherwise the
/// reference table is consulted. Out-of-range raw scores are clamped and
/// reported through [`Normalized::clamped`]. Functioning scales are
/// inverted so that 1 always means most severe.
pub fn normalize(observation: &ScaleObservation) -> Result<Normalized, ScaleError> {
    if !observation.raw_score.is_finite() {
        return Err(ScaleError::NonFiniteScore {
            scale: observation.scale_name.clone(),
            value: observation.raw_score,
        });
    }

    let scale = get_scale(&observation.scale_name);
    let own_max = observation
        .max_score
        .filter(|max| max.is_finite() && *max > 0.0);

    let (effective_max, max_source) = match (own_max, scale) {
        (Some(max), _) => (max, MaxSource::Observation),
        (None, Some(scale)) => (scale.max_score(), MaxSource::ReferenceTable),
        (None, None) => return Err(ScaleError::UnknownScale(observation.scale_name.clone())),
    };

    let ratio = observation.raw_score / effective_max;
    let clamped = !(0.0..=1.0).contains(&ratio);
    let ratio = ratio.clamp(0.0, 1.0);

    let severity = match scale.map_or(Polarity::Symptom, |s| s.polarity()) {
        Polarity::Symptom => ratio,
        Polarity::Functioning => 1.0 - ratio,
    };

    Ok(Normalized {
        scale: scale.map_or_else(
            || observation.scale_name.trim().to_uppercase(),
            |s| s.id().to_string(),
        ),
        severity,
        effective_max,
        clamped,
        max_source,
    })
}
