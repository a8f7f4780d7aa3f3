//! Trend, risk and follow-up suggestions derived from a scored history and
//! its projected trajectory.

use std::collections::BTreeMap;

use jiff::Timestamp;
use praxis_core::models::gaf::GafResult;
use praxis_core::models::imaging::ImagingEvent;
use praxis_core::models::observation::ScaleObservation;
use praxis_core::models::result::{
    RiskAssessment, RiskLevel, TrajectoryPoint, TrendAssessment, TrendDirection,
};
use praxis_core::time::days_between;
use praxis_scales::scoring::SeverityBand;
use praxis_scales::{canonical_name, get_scale};

use crate::trajectory::Baseline;

const SIGNIFICANT_CHANGE: f64 = 10.0;
const MILD_CHANGE: f64 = 5.0;

const HIGH_BURDEN: f64 = 75.0;
const MODERATE_BURDEN: f64 = 50.0;
const ESCALATION: f64 = 85.0;
const INCREASE: f64 = 70.0;

const STRONG_IMPROVEMENT: f64 = 20.0;
const GOOD_FUNCTIONING: f64 = 80.0;
const FAIR_FUNCTIONING: f64 = 60.0;
const POOR_FUNCTIONING: f64 = 40.0;
const IMAGING_RECENCY_DAYS: f64 = 180.0;

/// Everything the formatter needs besides the plan and the score.
#[derive(Debug, Clone)]
pub struct Assessment {
    pub trend: TrendAssessment,
    pub risk: RiskAssessment,
    pub suggestions: Vec<String>,
}

/// Direction of the historical GAF series.
pub fn trend(baseline: &Baseline) -> TrendAssessment {
    let (Some(first), Some(last)) = (baseline.series.first(), baseline.series.last()) else {
        return not_enough_data();
    };
    if baseline.series.len() < 2 {
        return not_enough_data();
    }

    let change = last.1 - first.1;
    let (direction, description) = if change > SIGNIFICANT_CHANGE {
        (TrendDirection::Improving, "significant improvement in functioning")
    } else if change > MILD_CHANGE {
        (TrendDirection::Improving, "mild improvement in functioning")
    } else if change < -SIGNIFICANT_CHANGE {
        (TrendDirection::Deteriorating, "significant deterioration in functioning")
    } else if change < -MILD_CHANGE {
        (TrendDirection::Deteriorating, "mild deterioration in functioning")
    } else {
        (TrendDirection::Stable, "functioning is stable")
    };

    TrendAssessment {
        direction,
        change,
        description: description.to_string(),
    }
}

fn not_enough_data() -> TrendAssessment {
    TrendAssessment {
        direction: TrendDirection::Stable,
        change: 0.0,
        description: "not enough data to establish a trend".to_string(),
    }
}

/// Risk from current burden, projected escalation and scales whose latest
/// reading is in their severe band.
pub fn risk(
    gaf: &GafResult,
    trajectory: &[TrajectoryPoint],
    observations: &[ScaleObservation],
) -> RiskAssessment {
    let Some(score) = gaf.score else {
        return RiskAssessment {
            level: RiskLevel::Medium,
            factors: vec!["insufficient clinical data".to_string()],
            mitigations: vec!["collect additional clinical scale assessments".to_string()],
        };
    };

    let current = 100.0 - score;
    let predicted_max = trajectory
        .iter()
        .map(|p| p.predicted_score)
        .fold(current, f64::max);

    let mut factors = Vec::new();
    let mut mitigations = Vec::new();

    if current > HIGH_BURDEN {
        factors.push("high symptom burden".to_string());
        mitigations.push("increase monitoring frequency".to_string());
    } else if current > MODERATE_BURDEN {
        factors.push("moderate symptom burden".to_string());
        mitigations.push("regular follow-up appointments".to_string());
    }

    if predicted_max > ESCALATION {
        factors.push("predicted symptom escalation".to_string());
        mitigations.push("consider preventive treatment adjustment".to_string());
    } else if predicted_max > INCREASE {
        factors.push("predicted symptom increase".to_string());
        mitigations.push("close monitoring of treatment response".to_string());
    }

    for reading in latest_readings(observations) {
        if reading.band == SeverityBand::Severe {
            factors.push(format!(
                "{} in severe range (score {})",
                reading.scale, reading.raw_score
            ));
            mitigations.push(format!("urgent review of {} symptoms", reading.scale));
        }
    }

    let level = if factors.len() >= 2 || current > HIGH_BURDEN {
        RiskLevel::High
    } else if !factors.is_empty() || current > MODERATE_BURDEN {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    };

    RiskAssessment {
        level,
        factors,
        mitigations,
    }
}

/// Most recent reading of one scale, classified against its thresholds.
#[derive(Debug, Clone, PartialEq)]
pub struct ScaleReading {
    pub scale: &'static str,
    pub raw_score: f64,
    pub band: SeverityBand,
}

/// Latest observation of every known scale that has severity thresholds,
/// ordered by scale id. Same-day duplicates resolve to the higher score.
pub fn latest_readings(observations: &[ScaleObservation]) -> Vec<ScaleReading> {
    let mut latest: BTreeMap<String, &ScaleObservation> = BTreeMap::new();
    for observation in observations {
        let key = canonical_name(&observation.scale_name);
        let newer = latest.get(&key).is_none_or(|seen| {
            observation.date > seen.date
                || (observation.date == seen.date
                    && observation.raw_score.total_cmp(&seen.raw_score).is_gt())
        });
        if newer {
            latest.insert(key, observation);
        }
    }

    latest
        .values()
        .filter_map(|observation| {
            let scale = get_scale(&observation.scale_name)?;
            let band = scale.classify_observation(observation)?;
            Some(ScaleReading {
                scale: scale.id(),
                raw_score: observation.raw_score,
                band,
            })
        })
        .collect()
}

/// Treatment, per-scale and imaging follow-up suggestions.
pub fn suggestions(
    gaf: &GafResult,
    trajectory: &[TrajectoryPoint],
    observations: &[ScaleObservation],
    imaging: &[ImagingEvent],
    as_of: Timestamp,
) -> Vec<String> {
    let mut out = Vec::new();

    match (gaf.score, trajectory.last()) {
        (Some(score), Some(last)) => {
            let improvement = (100.0 - score) - last.predicted_score;
            if improvement > STRONG_IMPROVEMENT {
                out.push("Continue current treatment protocol".to_string());
                out.push("Schedule 6-month follow-up imaging".to_string());
            } else if improvement > 0.0 {
                out.push("Review medication dosage".to_string());
                out.push("Schedule 3-month follow-up imaging".to_string());
            } else {
                out.push("Urgent treatment plan revision recommended".to_string());
                out.push("Schedule monthly imaging to monitor progression".to_string());
                out.push("Consider multidisciplinary consultation".to_string());
            }
        }
        _ => out.push("Collect additional clinical scale assessments".to_string()),
    }

    let mut flagged = false;
    for reading in latest_readings(observations) {
        let advice = match reading.band {
            SeverityBand::Severe => "severe symptom burden; urgent intervention advised",
            SeverityBand::Moderate => "moderate symptom burden; review treatment",
            SeverityBand::Mild => "mild symptoms; continue monitoring",
            SeverityBand::Minimal => continue,
        };
        out.push(format!("{}: {advice}", reading.scale));
        flagged = true;
    }
    if !flagged && let Some(score) = gaf.score {
        let advice = if score >= GOOD_FUNCTIONING {
            "Good functioning; maintain the current treatment protocol"
        } else if score >= FAIR_FUNCTIONING {
            "Fair functioning; review the treatment plan"
        } else if score >= POOR_FUNCTIONING {
            "Poor functioning; revise the treatment regimen"
        } else {
            "Very poor functioning; urgent intervention may be needed"
        };
        out.push(advice.to_string());
    }

    let unprocessed = imaging.iter().filter(|i| !i.processed).count();
    if unprocessed == 1 {
        out.push("1 imaging study awaiting processing".to_string());
    } else if unprocessed > 1 {
        out.push(format!("{unprocessed} imaging studies awaiting processing"));
    }

    let recent = imaging.iter().any(|i| {
        i.processed && i.date <= as_of && days_between(i.date, as_of) <= IMAGING_RECENCY_DAYS
    });
    if !recent {
        out.push("Schedule follow-up imaging".to_string());
    }

    out
}
