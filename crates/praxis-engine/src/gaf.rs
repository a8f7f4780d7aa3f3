//! GAF compatibility scorer.
//!
//! Aggregates normalized, recency-weighted observations across every scale
//! into one 0–100 score where higher means better functioning.

use std::collections::{BTreeMap, BTreeSet};

use jiff::Timestamp;
use praxis_core::models::gaf::{ExcludedObservation, GafResult, ObservationProvenance};
use praxis_core::models::observation::ScaleObservation;
use praxis_core::time::days_between;
use praxis_scales::canonical_name;
use praxis_scales::normalize::normalize;
use tracing::{debug, warn};

use crate::config::EngineConfig;

/// Observations dated at or before `as_of`, in input order.
pub fn observations_until(observations: &[ScaleObservation], as_of: Timestamp) -> Vec<ScaleObservation> {
    observations
        .iter()
        .filter(|o| o.date <= as_of)
        .cloned()
        .collect()
}

/// Score a set of observations as seen at `as_of`.
///
/// Keeps the `per_scale_limit` most recent observations of each scale,
/// weights each by `exp(-λ·age_days)` and averages `1 - severity`.
/// Observations that cannot be normalized are excluded and lower the
/// confidence in proportion to how many were dropped.
pub fn score(observations: &[ScaleObservation], as_of: Timestamp, config: &EngineConfig) -> GafResult {
    let mut ordered: Vec<&ScaleObservation> = observations.iter().collect();
    ordered.sort_by_key(|o| o.date);

    let mut by_scale: BTreeMap<String, Vec<&ScaleObservation>> = BTreeMap::new();
    for observation in ordered {
        by_scale
            .entry(canonical_name(&observation.scale_name))
            .or_default()
            .push(observation);
    }

    let lambda = config.decay_lambda();
    let mut retained = 0usize;
    let mut weighted_sum = 0.0;
    let mut total_weight = 0.0;
    let mut contributing_scales = BTreeSet::new();
    let mut provenance = Vec::new();
    let mut excluded = Vec::new();

    for series in by_scale.values() {
        let skip = series.len().saturating_sub(config.per_scale_limit);
        for observation in &series[skip..] {
            retained += 1;
            let normalized = match normalize(observation) {
                Ok(normalized) => normalized,
                Err(e) => {
                    warn!(
                        scale = %observation.scale_name,
                        date = %observation.date,
                        error = %e,
                        "observation excluded from GAF score"
                    );
                    excluded.push(ExcludedObservation {
                        scale_name: observation.scale_name.clone(),
                        date: observation.date,
                        reason: e.to_string(),
                    });
                    continue;
                }
            };

            if normalized.clamped {
                debug!(
                    scale = %normalized.scale,
                    raw_score = observation.raw_score,
                    max = normalized.effective_max,
                    "raw score clamped into scale range"
                );
            }

            let age_days = days_between(observation.date, as_of).max(0.0);
            let weight = (-lambda * age_days).exp();
            weighted_sum += weight * (1.0 - normalized.severity);
            total_weight += weight;
            contributing_scales.insert(normalized.scale.clone());
            provenance.push(ObservationProvenance {
                scale: normalized.scale,
                date: observation.date,
                raw_score: observation.raw_score,
                severity: normalized.severity,
                weight,
                clamped: normalized.clamped,
                max_source: normalized.max_source,
            });
        }
    }

    // Weights can underflow to zero for observations decades old.
    if provenance.is_empty() || total_weight <= f64::MIN_POSITIVE {
        return GafResult::insufficient(excluded);
    }

    let score = (100.0 * weighted_sum / total_weight).clamp(0.0, 100.0);
    let coverage = provenance.len() as f64 / retained as f64;
    let confidence = ((total_weight / config.expected_weight_floor).min(1.0) * coverage).clamp(0.0, 1.0);

    GafResult {
        score: Some(score),
        confidence,
        contributing_scales,
        insufficient_data: false,
        observations: provenance,
        excluded,
    }
}
