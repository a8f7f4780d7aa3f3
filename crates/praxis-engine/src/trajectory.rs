//! Trajectory estimator.
//!
//! Fits a baseline trend to the patient's GAF history and integrates it
//! forward day by day, bending the slope wherever a plan changes the
//! medication regimen. Predicted scores are symptom severity on 0–100
//! (`100 - GAF`), so lower is better.

use std::collections::BTreeMap;

use jiff::Timestamp;
use praxis_core::models::history::PatientHistory;
use praxis_core::models::observation::ScaleObservation;
use praxis_core::models::plan::{ActionKind, MedicationAction};
use praxis_core::models::result::TrajectoryPoint;
use praxis_core::time::{add_days, days_between};

use crate::config::EngineConfig;
use crate::gaf;
use crate::medication::{medication_key, slope_bump};

/// Severity assumed when there is nothing to fit.
pub const NEUTRAL_SEVERITY: f64 = 50.0;

const BAND_RADIUS_BASE: f64 = 5.0;
const BAND_RADIUS_PER_DAY: f64 = 0.1;
const BAND_RADIUS_MAX: f64 = 15.0;

/// Linear trend of severity around the evaluation instant.
#[derive(Debug, Clone, PartialEq)]
pub struct Baseline {
    /// `(days relative to as_of, GAF score)`, oldest first.
    pub series: Vec<(f64, f64)>,
    /// Fitted severity at `as_of`.
    pub level: f64,
    /// Severity points per day.
    pub slope: f64,
}

impl Baseline {
    pub fn neutral() -> Self {
        Self {
            series: Vec::new(),
            level: NEUTRAL_SEVERITY,
            slope: 0.0,
        }
    }

    /// Fit the trend of the GAF series over the trailing window.
    ///
    /// Each distinct observation date in the window contributes the GAF
    /// score computed from everything observed up to that date. One point
    /// gives a flat line, two or more a least-squares line.
    pub fn fit(observations: &[ScaleObservation], as_of: Timestamp, config: &EngineConfig) -> Self {
        let mut sorted: Vec<ScaleObservation> = observations
            .iter()
            .filter(|o| o.date <= as_of)
            .cloned()
            .collect();
        sorted.sort_by_key(|o| o.date);

        let Some(latest) = sorted.last().map(|o| o.date) else {
            return Self::neutral();
        };
        let window_start = add_days(latest, -config.trend_window_days);

        let mut dates: Vec<Timestamp> = sorted
            .iter()
            .map(|o| o.date)
            .filter(|d| *d >= window_start)
            .collect();
        dates.dedup();

        let series: Vec<(f64, f64)> = dates
            .into_iter()
            .filter_map(|date| {
                let seen = sorted.partition_point(|o| o.date <= date);
                gaf::score(&sorted[..seen], date, config)
                    .score
                    .map(|score| (days_between(as_of, date), score))
            })
            .collect();

        if series.is_empty() {
            return Self::neutral();
        }

        let severities: Vec<(f64, f64)> = series.iter().map(|&(x, gaf)| (x, 100.0 - gaf)).collect();
        let (level, slope) = fit_line(&severities, config.max_baseline_slope);
        Self {
            series,
            level: level.clamp(0.0, 100.0),
            slope,
        }
    }
}

/// Least-squares line through `points`, returned as (value at x = 0, slope)
/// with the slope bounded by `max_slope`.
fn fit_line(points: &[(f64, f64)], max_slope: f64) -> (f64, f64) {
    let n = points.len() as f64;
    let (sum_x, sum_y) = points
        .iter()
        .fold((0.0, 0.0), |(sx, sy), &(x, y)| (sx + x, sy + y));
    let mean_x = sum_x / n;
    let mean_y = sum_y / n;

    let (sxx, sxy) = points.iter().fold((0.0, 0.0), |(sxx, sxy), &(x, y)| {
        let dx = x - mean_x;
        (sxx + dx * dx, sxy + dx * (y - mean_y))
    });

    let slope = if sxx > 1e-12 { sxy / sxx } else { 0.0 };
    let slope = if slope.is_finite() {
        slope.clamp(-max_slope, max_slope)
    } else {
        0.0
    };
    (mean_y - slope * mean_x, slope)
}

/// A medication active at some point of a simulation.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveMedication {
    /// Spelling used when the medication entered the regimen.
    pub name: String,
    pub dose: f64,
    /// Day (relative to `as_of`) of the last start or dose change.
    pub last_change_day: i64,
}

/// Active medications keyed by [`medication_key`].
pub type Regimen = BTreeMap<String, ActiveMedication>;

/// Courses active at `as_of`. When one medication has overlapping
/// courses, the one started last wins.
pub fn regimen_at(history: &PatientHistory, as_of: Timestamp) -> Regimen {
    let mut courses: Vec<_> = history.active_treatments(as_of).collect();
    courses.sort_by_key(|c| c.start_date);

    let mut regimen = Regimen::new();
    for course in courses {
        regimen.insert(
            medication_key(&course.name),
            ActiveMedication {
                name: course.name.clone(),
                dose: course.dosage,
                last_change_day: days_between(as_of, course.start_date).floor() as i64,
            },
        );
    }
    regimen
}

/// Apply one plan action. A start without a dose uses the reference dose,
/// a dose adjustment of an inactive medication starts it, and stopping an
/// inactive medication does nothing.
pub fn apply_action(regimen: &mut Regimen, action: &MedicationAction, day: i64, config: &EngineConfig) {
    let key = medication_key(&action.medication);
    match action.action {
        ActionKind::Start | ActionKind::AdjustDose => {
            let previous = regimen.get(&key).map(|m| m.dose);
            let dose = action
                .dosage
                .or(previous)
                .unwrap_or(config.reference_dose);
            let name = regimen
                .get(&key)
                .map_or_else(|| action.medication.clone(), |m| m.name.clone());
            regimen.insert(
                key,
                ActiveMedication {
                    name,
                    dose,
                    last_change_day: day,
                },
            );
        }
        ActionKind::Stop => {
            regimen.remove(&key);
        }
    }
}

fn total_bump(regimen: &Regimen, config: &EngineConfig) -> f64 {
    regimen
        .values()
        .map(|m| slope_bump(&m.name, m.dose, config))
        .sum()
}

/// Whole day (relative to `as_of`) on which an action takes effect.
pub fn action_day(as_of: Timestamp, date: Timestamp) -> i64 {
    days_between(as_of, date).ceil() as i64
}

/// Sample days: every `interval` days, plus the horizon itself.
pub fn sample_days(horizon_days: i64, interval: i64) -> Vec<i64> {
    let interval = interval.max(1);
    let mut days: Vec<i64> = (1..)
        .map(|k| k * interval)
        .take_while(|d| *d <= horizon_days)
        .collect();
    if horizon_days > 0 && days.last() != Some(&horizon_days) {
        days.push(horizon_days);
    }
    days
}

/// Medication load at one sample, for burden-based objectives.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegimenLoad {
    pub count: usize,
    pub total_dose: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Simulation {
    pub points: Vec<TrajectoryPoint>,
    /// Parallel to `points`.
    pub loads: Vec<RegimenLoad>,
}

/// Integrate the baseline forward under `plan`.
///
/// `regimen` is the medication state at `as_of`; its effect is already
/// part of the baseline, so only departures from it bend the slope. The
/// summed departure is bounded by `max_slope_adjustment` and the running
/// level saturates in `[0, 100]`.
pub fn simulate(
    baseline: &Baseline,
    regimen: &Regimen,
    plan: &[MedicationAction],
    horizon_days: i64,
    as_of: Timestamp,
    config: &EngineConfig,
) -> Simulation {
    let reference_bump = total_bump(regimen, config);
    let mut regimen = regimen.clone();

    let mut scheduled: Vec<(i64, &MedicationAction)> = plan
        .iter()
        .map(|a| (action_day(as_of, a.date), a))
        .collect();
    scheduled.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.canonical_cmp(b.1)));

    let samples = sample_days(horizon_days, config.sampling_interval_days);
    let mut points = Vec::with_capacity(samples.len());
    let mut loads = Vec::with_capacity(samples.len());
    let mut samples = samples.into_iter().peekable();
    let mut pending = scheduled.into_iter().peekable();

    let mut level = baseline.level;
    let mut deviation = 0.0;

    for day in 0..horizon_days.max(0) {
        let mut changed = false;
        while let Some((_, action)) = pending.next_if(|(d, _)| *d <= day) {
            apply_action(&mut regimen, action, day, config);
            changed = true;
        }
        if changed {
            deviation = (total_bump(&regimen, config) - reference_bump)
                .clamp(-config.max_slope_adjustment, config.max_slope_adjustment);
        }

        level = (level + baseline.slope + deviation).clamp(0.0, 100.0);

        let elapsed = day + 1;
        if samples.next_if_eq(&elapsed).is_some() {
            points.push(trajectory_point(as_of, elapsed, level));
            loads.push(RegimenLoad {
                count: regimen.len(),
                total_dose: regimen.values().map(|m| m.dose).sum(),
            });
        }
    }

    Simulation { points, loads }
}

fn trajectory_point(as_of: Timestamp, day: i64, level: f64) -> TrajectoryPoint {
    let radius = (BAND_RADIUS_BASE + BAND_RADIUS_PER_DAY * day as f64).min(BAND_RADIUS_MAX);
    TrajectoryPoint {
        date: add_days(as_of, day),
        predicted_score: level,
        lower: (level - radius).max(0.0),
        upper: (level + radius).min(100.0),
    }
}

/// Predicted severity trajectory of `history` under `plan` over
/// `horizon_days`, sampled every `sampling_interval_days`.
pub fn project(
    history: &PatientHistory,
    plan: &[MedicationAction],
    horizon_days: i64,
    as_of: Timestamp,
    config: &EngineConfig,
) -> Vec<TrajectoryPoint> {
    let observations = gaf::observations_until(&history.clinical_data, as_of);
    let baseline = Baseline::fit(&observations, as_of, config);
    let regimen = regimen_at(history, as_of);
    simulate(&baseline, &regimen, plan, horizon_days, as_of, config).points
}
