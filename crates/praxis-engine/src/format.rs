//! Assembly of the final recommendation.

use std::collections::BTreeSet;
use std::fmt::Write as _;

use praxis_core::models::gaf::GafResult;
use praxis_core::models::parameters::Objective;
use praxis_core::models::plan::{ActionKind, MedicationAction};
use praxis_core::models::result::{OptimizationResult, ResultFlag, TrajectoryPoint};

use crate::assessment::Assessment;

/// How the plan was obtained.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchSummary {
    pub objective: Objective,
    pub evaluations: usize,
    pub budget_exceeded: bool,
    /// The search was skipped for lack of data.
    pub fallback: bool,
    pub plan_confidence: f64,
}

/// Combine plan, trajectory, score and assessment into one result. The
/// plan is moved in unchanged.
pub fn format(
    plan: Vec<MedicationAction>,
    trajectory: Vec<TrajectoryPoint>,
    gaf: GafResult,
    search: SearchSummary,
    assessment: Assessment,
) -> OptimizationResult {
    let mut flags = BTreeSet::new();
    if gaf.insufficient_data {
        flags.insert(ResultFlag::InsufficientData);
    }
    if search.budget_exceeded {
        flags.insert(ResultFlag::SearchBudgetExceeded);
    }
    if !gaf.excluded.is_empty() {
        flags.insert(ResultFlag::ObservationsExcluded);
    }

    let confidence = gaf.confidence.min(search.plan_confidence).clamp(0.0, 1.0);
    let gaf_prediction = match (gaf.score, trajectory.last()) {
        (Some(_), Some(last)) => Some(100.0 - last.predicted_score),
        _ => None,
    };
    let rationale = rationale(&plan, &gaf, &search, &assessment);

    OptimizationResult {
        recommended_plan: plan,
        predicted_trajectory: trajectory,
        rationale,
        confidence,
        objective: search.objective,
        gaf,
        flags,
        risk: assessment.risk,
        trend: assessment.trend,
        treatment_suggestions: assessment.suggestions,
        gaf_prediction,
    }
}

fn rationale(
    plan: &[MedicationAction],
    gaf: &GafResult,
    search: &SearchSummary,
    assessment: &Assessment,
) -> String {
    let mut out = String::new();
    let _ = write!(out, "Objective: {}. ", search.objective.as_str());

    if search.fallback {
        out.push_str(
            "Clinical data were insufficient to score functioning, so no treatment change is proposed. ",
        );
    } else if plan.is_empty() {
        out.push_str("Recommended plan: no change to the current regimen. ");
    } else {
        let steps: Vec<String> = plan.iter().map(describe_action).collect();
        let _ = write!(out, "Recommended plan: {}. ", steps.join("; "));
    }

    if let (Some(score), Some(band)) = (gaf.score, gaf.band()) {
        let scales: Vec<&str> = gaf.contributing_scales.iter().map(String::as_str).collect();
        let _ = write!(
            out,
            "Estimated GAF {score:.1} ({}), from {}. ",
            band.description(),
            scales.join(", ")
        );
        let _ = write!(out, "Trend: {}. ", assessment.trend.description);
    }

    if !gaf.excluded.is_empty() {
        let _ = write!(
            out,
            "{} observation(s) excluded from scoring. ",
            gaf.excluded.len()
        );
    }

    if search.budget_exceeded {
        let _ = write!(
            out,
            "The plan search stopped after {} evaluations; the plan is the best found within that budget. ",
            search.evaluations
        );
    }

    out.push_str(
        "Treatment effects are projected with a placeholder model that is not clinically validated.",
    );
    out
}

fn describe_action(action: &MedicationAction) -> String {
    let date = action.date.strftime("%Y-%m-%d");
    match (action.action, action.dosage) {
        (ActionKind::Start, Some(dose)) => {
            format!("start {} at {dose} mg on {date}", action.medication)
        }
        (ActionKind::AdjustDose, Some(dose)) => {
            format!("adjust {} to {dose} mg on {date}", action.medication)
        }
        (ActionKind::Stop, _) => format!("stop {} on {date}", action.medication),
        (ActionKind::Start, None) => format!("start {} on {date}", action.medication),
        (ActionKind::AdjustDose, None) => format!("adjust {} on {date}", action.medication),
    }
}
