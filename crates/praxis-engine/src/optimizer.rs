//! Treatment optimizer.
//!
//! Bounded beam search over medication plans. A plan is a sequence of
//! start / adjust-dose / stop actions on a grid of dates; every partial
//! plan is also a candidate answer, so the search can stop at any depth.
//! Each candidate is scored by projecting its trajectory and reducing it
//! under the selected objective.

use std::cmp::Ordering;

use jiff::Timestamp;
use praxis_core::models::history::PatientHistory;
use praxis_core::models::parameters::{Objective, OptimizationParameters, TreatmentConstraints};
use praxis_core::models::plan::{ActionKind, MedicationAction, cmp_action_lists};
use praxis_core::models::result::OptimizationResult;
use praxis_core::time::add_days;
use tracing::{debug, info, warn};

use crate::assessment::{self, Assessment};
use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::format::{self, SearchSummary};
use crate::medication::{CATALOG, medication_key};
use crate::trajectory::{Baseline, Regimen, Simulation, apply_action, regimen_at, simulate};
use crate::{gaf, resolve_as_of};

/// Fractions of `max_dosage` offered as candidate doses.
const DOSE_FRACTIONS: [f64; 4] = [0.25, 0.5, 0.75, 1.0];

/// Costs are compared after rounding to this resolution.
const COST_RESOLUTION: f64 = 1e6;

/// Reject parameters the search cannot honour.
pub fn validate_parameters(
    parameters: &OptimizationParameters,
    config: &EngineConfig,
) -> Result<(), EngineError> {
    let constraints = &parameters.constraints;
    if parameters.time_horizon_days <= 0 {
        return Err(EngineError::InvalidParameters(format!(
            "time_horizon_days must be positive, got {}",
            parameters.time_horizon_days
        )));
    }
    if parameters.time_horizon_days > config.max_horizon_days {
        return Err(EngineError::InvalidParameters(format!(
            "time_horizon_days {} exceeds the supported maximum of {}",
            parameters.time_horizon_days, config.max_horizon_days
        )));
    }
    if constraints.max_medication_changes < 0 {
        return Err(EngineError::InvalidParameters(format!(
            "max_medication_changes must not be negative, got {}",
            constraints.max_medication_changes
        )));
    }
    if constraints.min_treatment_duration_days < 0 {
        return Err(EngineError::InvalidParameters(format!(
            "min_treatment_duration_days must not be negative, got {}",
            constraints.min_treatment_duration_days
        )));
    }
    if !(constraints.max_dosage.is_finite() && constraints.max_dosage >= 0.0) {
        return Err(EngineError::InvalidParameters(format!(
            "max_dosage must be a non-negative finite number, got {}",
            constraints.max_dosage
        )));
    }
    Ok(())
}

/// Score the history, search for the best plan and assemble the result.
pub fn analyze_patient(
    history: &PatientHistory,
    parameters: &OptimizationParameters,
    config: &EngineConfig,
) -> Result<OptimizationResult, EngineError> {
    validate_parameters(parameters, config)?;

    let as_of = resolve_as_of(history, parameters.as_of);
    let horizon_days = parameters.time_horizon_days;
    let observations = gaf::observations_until(&history.clinical_data, as_of);
    if observations.len() < history.clinical_data.len() {
        debug!(
            ignored = history.clinical_data.len() - observations.len(),
            "observations dated after the evaluation instant ignored"
        );
    }

    info!(
        patient_id = ?history.patient_id,
        objective = parameters.objective.as_str(),
        horizon_days,
        observations = observations.len(),
        "analyzing patient"
    );

    let gaf = gaf::score(&observations, as_of, config);
    let regimen = regimen_at(history, as_of);

    let (baseline, plan, simulation, summary) = if gaf.insufficient_data {
        info!("insufficient clinical data, returning the no-op plan");
        let baseline = Baseline::neutral();
        let simulation = simulate(&baseline, &regimen, &[], horizon_days, as_of, config);
        let summary = SearchSummary {
            objective: parameters.objective,
            evaluations: 0,
            budget_exceeded: false,
            fallback: true,
            plan_confidence: config.insufficient_data_confidence,
        };
        (baseline, Vec::new(), simulation, summary)
    } else {
        let baseline = Baseline::fit(&observations, as_of, config);
        let search = PlanSearch::new(history, &baseline, &regimen, parameters, as_of, config);
        let outcome = search.run();
        info!(
            actions = outcome.best.actions.len(),
            cost = outcome.best.cost.primary,
            noop_cost = outcome.noop.cost.primary,
            evaluations = outcome.evaluations,
            "plan search finished"
        );
        if outcome.budget_exceeded {
            warn!(
                evaluations = outcome.evaluations,
                "plan search stopped at its evaluation budget"
            );
        }
        let summary = SearchSummary {
            objective: parameters.objective,
            evaluations: outcome.evaluations,
            budget_exceeded: outcome.budget_exceeded,
            fallback: false,
            plan_confidence: if outcome.budget_exceeded {
                config.budget_confidence
            } else {
                1.0
            },
        };
        let best = outcome.best;
        (baseline, best.actions, best.simulation, summary)
    };

    let assessment = Assessment {
        trend: assessment::trend(&baseline),
        risk: assessment::risk(&gaf, &simulation.points, &observations),
        suggestions: assessment::suggestions(
            &gaf,
            &simulation.points,
            &observations,
            &history.imaging,
            as_of,
        ),
    };

    Ok(format::format(plan, simulation.points, gaf, summary, assessment))
}

/// Objective value of a plan; lower is better. Compared as integers so
/// that ties are exact and the ordering is total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct PlanCost {
    pub primary: i64,
    pub secondary: i64,
}

impl PlanCost {
    fn new(primary: f64, secondary: f64) -> Self {
        Self {
            primary: quantize(primary),
            secondary: quantize(secondary),
        }
    }
}

fn quantize(value: f64) -> i64 {
    (value * COST_RESOLUTION).round() as i64
}

/// A plan together with its projection and cost.
#[derive(Debug, Clone)]
pub struct ScoredPlan {
    pub actions: Vec<MedicationAction>,
    /// Day offset of each action relative to the evaluation instant.
    pub days: Vec<i64>,
    pub cost: PlanCost,
    pub simulation: Simulation,
}

/// Lower cost first, then fewer actions, then the lexicographically
/// smallest action list.
pub fn rank(a: &ScoredPlan, b: &ScoredPlan) -> Ordering {
    a.cost
        .cmp(&b.cost)
        .then(a.actions.len().cmp(&b.actions.len()))
        .then_with(|| cmp_action_lists(&a.actions, &b.actions))
}

#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub best: ScoredPlan,
    pub noop: ScoredPlan,
    pub evaluations: usize,
    pub budget_exceeded: bool,
}

pub struct PlanSearch<'a> {
    baseline: &'a Baseline,
    regimen: &'a Regimen,
    medications: Vec<String>,
    dose_levels: Vec<f64>,
    offsets: Vec<i64>,
    as_of: Timestamp,
    horizon_days: i64,
    objective: Objective,
    constraints: TreatmentConstraints,
    config: &'a EngineConfig,
}

impl<'a> PlanSearch<'a> {
    pub fn new(
        history: &PatientHistory,
        baseline: &'a Baseline,
        regimen: &'a Regimen,
        parameters: &OptimizationParameters,
        as_of: Timestamp,
        config: &'a EngineConfig,
    ) -> Self {
        let constraints = parameters.constraints;

        let mut medications: Vec<String> = Vec::new();
        let mut seen: Vec<String> = Vec::new();
        let names = history
            .treatments
            .iter()
            .map(|t| t.name.trim())
            .chain(CATALOG.iter().copied());
        for name in names {
            let key = medication_key(name);
            if !key.is_empty() && !seen.contains(&key) {
                seen.push(key);
                medications.push(name.to_string());
            }
        }

        let mut dose_levels: Vec<f64> = DOSE_FRACTIONS
            .iter()
            .map(|f| f * constraints.max_dosage)
            .filter(|d| *d > 0.0)
            .collect();
        dose_levels.dedup_by_key(|d| quantize(*d));

        let step = if constraints.min_treatment_duration_days > 0 {
            constraints.min_treatment_duration_days
        } else {
            config.sampling_interval_days
        };
        let offsets: Vec<i64> = (0..)
            .map(|k: i64| k.saturating_mul(step))
            .take_while(|d| *d < parameters.time_horizon_days)
            .take(config.max_offsets)
            .collect();

        Self {
            baseline,
            regimen,
            medications,
            dose_levels,
            offsets,
            as_of,
            horizon_days: parameters.time_horizon_days,
            objective: parameters.objective,
            constraints,
            config,
        }
    }

    pub fn run(&self) -> SearchOutcome {
        let noop = self.evaluate(Vec::new(), Vec::new());
        let mut evaluations = 1usize;
        let mut best = noop.clone();
        let mut beam = vec![noop.clone()];
        let mut budget_exceeded = false;

        let depth_limit = usize::try_from(self.constraints.max_medication_changes).unwrap_or(0);
        for depth in 0..depth_limit {
            let mut next = Vec::new();
            'expand: for plan in &beam {
                for (action, day) in self.expansions(plan) {
                    if evaluations >= self.config.iteration_cap {
                        budget_exceeded = true;
                        break 'expand;
                    }
                    let mut actions = plan.actions.clone();
                    actions.push(action);
                    let mut days = plan.days.clone();
                    days.push(day);
                    next.push(self.evaluate(actions, days));
                    evaluations += 1;
                }
            }

            next.sort_by(rank);
            if let Some(top) = next.first()
                && rank(top, &best).is_lt()
            {
                best = top.clone();
            }

            debug!(
                depth = depth + 1,
                candidates = next.len(),
                evaluations,
                best_primary = best.cost.primary,
                "beam expanded"
            );

            next.truncate(self.config.beam_width);
            beam = next;
            if budget_exceeded || beam.is_empty() {
                break;
            }
        }

        SearchOutcome {
            best,
            noop,
            evaluations,
            budget_exceeded,
        }
    }

    fn evaluate(&self, actions: Vec<MedicationAction>, days: Vec<i64>) -> ScoredPlan {
        let simulation = simulate(
            self.baseline,
            self.regimen,
            &actions,
            self.horizon_days,
            self.as_of,
            self.config,
        );
        let cost = self.cost(&simulation);
        ScoredPlan {
            actions,
            days,
            cost,
            simulation,
        }
    }

    fn cost(&self, simulation: &Simulation) -> PlanCost {
        let scores: Vec<f64> = simulation.points.iter().map(|p| p.predicted_score).collect();
        let mean_score = mean(&scores);

        match self.objective {
            Objective::MinimizeSymptoms => PlanCost::new(mean_score, 0.0),
            Objective::MinimizeMedicationBurden => {
                let max_dosage = self.constraints.max_dosage;
                let burdens: Vec<f64> = simulation
                    .loads
                    .iter()
                    .map(|load| {
                        let magnitude = if max_dosage > 0.0 {
                            load.total_dose / max_dosage
                        } else {
                            0.0
                        };
                        load.count as f64 + magnitude
                    })
                    .collect();
                PlanCost::new(mean(&burdens), mean_score)
            }
            Objective::MaximizeFunctioning => {
                let last = scores.last().copied().unwrap_or(mean_score);
                PlanCost::new(last, mean_score)
            }
            Objective::StabilizeMood => {
                let variance =
                    mean(&scores.iter().map(|s| (s - mean_score).powi(2)).collect::<Vec<_>>());
                PlanCost::new(variance.sqrt(), mean_score)
            }
        }
    }

    /// Every action that may extend `plan` without breaking a constraint.
    fn expansions(&self, plan: &ScoredPlan) -> Vec<(MedicationAction, i64)> {
        let limit = usize::try_from(self.constraints.max_medication_changes).unwrap_or(0);
        if plan.actions.len() >= limit {
            return Vec::new();
        }

        let min_gap = self.constraints.min_treatment_duration_days;
        let mut regimen = self.regimen.clone();
        for (action, day) in plan.actions.iter().zip(&plan.days) {
            apply_action(&mut regimen, action, *day, self.config);
        }
        let last = plan.actions.last().zip(plan.days.last().copied());

        let mut out = Vec::new();
        for &day in &self.offsets {
            if let Some((_, last_day)) = last
                && day < last_day.saturating_add(min_gap)
            {
                continue;
            }
            let date = add_days(self.as_of, day);

            for name in &self.medications {
                let key = medication_key(name);
                let touched_today = plan
                    .actions
                    .iter()
                    .zip(&plan.days)
                    .any(|(a, d)| *d == day && medication_key(&a.medication) == key);
                if touched_today {
                    continue;
                }

                let candidates: Vec<MedicationAction> = match regimen.get(&key) {
                    None => self
                        .dose_levels
                        .iter()
                        .map(|dose| MedicationAction {
                            date,
                            action: ActionKind::Start,
                            medication: name.clone(),
                            dosage: Some(*dose),
                        })
                        .collect(),
                    Some(active) => {
                        if day.saturating_sub(active.last_change_day) < min_gap {
                            continue;
                        }
                        self.dose_levels
                            .iter()
                            .filter(|dose| quantize(**dose) != quantize(active.dose))
                            .map(|dose| MedicationAction {
                                date,
                                action: ActionKind::AdjustDose,
                                medication: active.name.clone(),
                                dosage: Some(*dose),
                            })
                            .chain(std::iter::once(MedicationAction {
                                date,
                                action: ActionKind::Stop,
                                medication: active.name.clone(),
                                dosage: None,
                            }))
                            .collect()
                    }
                };

                for action in candidates {
                    // Same-day actions only arise with a zero gap; keep them in
                    // canonical order so each action set is generated once.
                    if let Some((previous, last_day)) = last
                        && day == last_day
                        && action.canonical_cmp(previous) != Ordering::Greater
                    {
                        continue;
                    }
                    out.push((action, day));
                }
            }
        }
        out
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}
