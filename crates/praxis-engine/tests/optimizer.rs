use jiff::Timestamp;
use praxis_core::models::gaf::GafResult;
use praxis_core::models::history::PatientHistory;
use praxis_core::models::imaging::ImagingEvent;
use praxis_core::models::observation::ScaleObservation;
use praxis_core::models::parameters::{Objective, OptimizationParameters, TreatmentConstraints};
use praxis_core::models::plan::{ActionKind, MedicationAction};
use praxis_core::models::result::{
    ResultFlag, RiskAssessment, RiskLevel, TrendAssessment, TrendDirection,
};
use praxis_core::models::treatment::MedicationCourse;
use praxis_core::time::days_between;
use praxis_engine::DecisionEngine;
use praxis_engine::assessment::Assessment;
use praxis_engine::config::EngineConfig;
use praxis_engine::error::EngineError;
use praxis_engine::format::{SearchSummary, format};
use praxis_engine::trajectory::project;

fn ts(s: &str) -> Timestamp {
    s.parse().unwrap()
}

fn obs(date: &str, scale: &str, raw: f64, max: Option<f64>) -> ScaleObservation {
    ScaleObservation {
        date: ts(date),
        scale_name: scale.to_string(),
        raw_score: raw,
        max_score: max,
    }
}

fn single_ymrs_history() -> PatientHistory {
    PatientHistory {
        clinical_data: vec![obs("2024-01-01T00:00:00Z", "YMRS", 20.0, Some(40.0))],
        ..PatientHistory::default()
    }
}

fn treated_history() -> PatientHistory {
    PatientHistory {
        clinical_data: vec![
            obs("2023-11-01T00:00:00Z", "YMRS", 28.0, None),
            obs("2023-12-01T00:00:00Z", "YMRS", 24.0, None),
            obs("2023-12-15T00:00:00Z", "HAM-D", 20.0, None),
            obs("2024-01-05T00:00:00Z", "YMRS", 22.0, None),
            obs("2024-01-05T00:00:00Z", "PANSS", 90.0, None),
        ],
        treatments: vec![MedicationCourse {
            name: "Quetiapine".to_string(),
            dosage: 300.0,
            start_date: ts("2023-10-15T00:00:00Z"),
            end_date: None,
        }],
        imaging: vec![ImagingEvent {
            date: ts("2023-12-20T00:00:00Z"),
            path: "scans/2023-12-20.nii".to_string(),
            processed: false,
        }],
        ..PatientHistory::default()
    }
}

fn mean_score(points: &[praxis_core::models::result::TrajectoryPoint]) -> f64 {
    points.iter().map(|p| p.predicted_score).sum::<f64>() / points.len() as f64
}

#[test]
fn empty_history_falls_back_to_no_op() {
    let engine = DecisionEngine::default();
    let result = engine
        .analyze_patient(&PatientHistory::default(), &OptimizationParameters::default())
        .unwrap();

    assert!(result.has_flag(ResultFlag::InsufficientData));
    assert!(result.recommended_plan.is_empty());
    assert!(result.confidence <= 0.1);
    assert_eq!(result.predicted_trajectory.len(), 13);
    assert!(result.predicted_trajectory.iter().all(|p| p.predicted_score == 50.0));
    assert_eq!(result.gaf_prediction, None);
    assert_eq!(result.risk.level, RiskLevel::Medium);
    assert!(result.rationale.contains("insufficient"));
}

#[test]
fn single_ymrs_scenario() {
    let engine = DecisionEngine::default();
    let history = single_ymrs_history();
    let result = engine
        .analyze_patient(&history, &OptimizationParameters::default())
        .unwrap();

    let gaf = result.gaf.score.unwrap();
    assert!((gaf - 50.0).abs() < 1e-9);
    assert!(!result.has_flag(ResultFlag::InsufficientData));

    let as_of = ts("2024-01-01T00:00:00Z");
    let untreated = project(&history, &[], 90, as_of, engine.config());
    assert!(untreated.iter().all(|p| (p.predicted_score - 50.0).abs() < 1e-9));

    // Starting any catalog medication lowers the mean, so a plan is chosen.
    assert!(!result.recommended_plan.is_empty());
    assert!(mean_score(&result.predicted_trajectory) < mean_score(&untreated));
    assert_eq!(result.recommended_plan[0].action, ActionKind::Start);
}

#[test]
fn plans_respect_constraints() {
    let engine = DecisionEngine::default();
    let parameters = OptimizationParameters {
        time_horizon_days: 120,
        objective: Objective::MinimizeSymptoms,
        constraints: TreatmentConstraints {
            max_medication_changes: 3,
            min_treatment_duration_days: 21,
            max_dosage: 200.0,
        },
        as_of: None,
    };
    let result = engine.analyze_patient(&treated_history(), &parameters).unwrap();
    let plan = &result.recommended_plan;

    assert!(plan.len() <= 3);
    for action in plan {
        if let Some(dose) = action.dosage {
            assert!(dose > 0.0 && dose <= 200.0);
        }
    }
    for pair in plan.windows(2) {
        assert!(days_between(pair[0].date, pair[1].date) >= 21.0);
    }
}

#[test]
fn zero_changes_returns_empty_plan() {
    let engine = DecisionEngine::default();
    let parameters = OptimizationParameters {
        constraints: TreatmentConstraints {
            max_medication_changes: 0,
            ..TreatmentConstraints::default()
        },
        ..OptimizationParameters::default()
    };
    let result = engine.analyze_patient(&treated_history(), &parameters).unwrap();
    assert!(result.recommended_plan.is_empty());
    assert!(!result.has_flag(ResultFlag::SearchBudgetExceeded));
}

#[test]
fn zero_max_dosage_allows_only_stops() {
    let engine = DecisionEngine::default();
    let parameters = OptimizationParameters {
        objective: Objective::MinimizeMedicationBurden,
        constraints: TreatmentConstraints {
            max_dosage: 0.0,
            ..TreatmentConstraints::default()
        },
        ..OptimizationParameters::default()
    };
    let result = engine.analyze_patient(&treated_history(), &parameters).unwrap();
    assert!(result
        .recommended_plan
        .iter()
        .all(|a| a.action == ActionKind::Stop));
    // stopping the only medication is the lightest regimen
    assert_eq!(result.recommended_plan.len(), 1);
    assert_eq!(result.recommended_plan[0].medication, "Quetiapine");
}

#[test]
fn results_are_deterministic() {
    let history = treated_history();
    let parameters = OptimizationParameters {
        objective: Objective::StabilizeMood,
        ..OptimizationParameters::default()
    };
    let first = DecisionEngine::default().analyze_patient(&history, &parameters).unwrap();
    let second = DecisionEngine::default().analyze_patient(&history, &parameters).unwrap();
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn reordered_input_gives_same_result() {
    let history = treated_history();
    let mut shuffled = history.clone();
    shuffled.clinical_data.reverse();

    let engine = DecisionEngine::default();
    let parameters = OptimizationParameters::default();
    let a = engine.analyze_patient(&history, &parameters).unwrap();
    let b = engine.analyze_patient(&shuffled, &parameters).unwrap();
    assert_eq!(a.recommended_plan, b.recommended_plan);
    assert_eq!(a.gaf.score, b.gaf.score);
}

#[test]
fn every_objective_produces_a_result() {
    let engine = DecisionEngine::default();
    for objective in [
        Objective::MinimizeSymptoms,
        Objective::MinimizeMedicationBurden,
        Objective::MaximizeFunctioning,
        Objective::StabilizeMood,
    ] {
        let parameters = OptimizationParameters {
            objective,
            ..OptimizationParameters::default()
        };
        let result = engine.analyze_patient(&treated_history(), &parameters).unwrap();
        assert_eq!(result.objective, objective);
        assert!(result.rationale.contains(objective.as_str()));
        assert!(result.rationale.contains("placeholder model"));
    }
}

#[test]
fn tiny_budget_sets_flag_and_caps_confidence() {
    let engine = DecisionEngine::new(EngineConfig {
        iteration_cap: 5,
        expected_weight_floor: 0.5,
        ..EngineConfig::default()
    })
    .unwrap();
    let result = engine
        .analyze_patient(&treated_history(), &OptimizationParameters::default())
        .unwrap();
    assert!(result.has_flag(ResultFlag::SearchBudgetExceeded));
    assert!(result.confidence <= 0.6);
    assert!(result.rationale.contains("stopped after 5 evaluations"));
}

#[test]
fn observations_after_as_of_are_ignored() {
    let engine = DecisionEngine::default();
    let mut history = single_ymrs_history();
    history
        .clinical_data
        .push(obs("2024-06-01T00:00:00Z", "YMRS", 40.0, Some(40.0)));
    let parameters = OptimizationParameters {
        as_of: Some(ts("2024-01-01T00:00:00Z")),
        ..OptimizationParameters::default()
    };
    let result = engine.analyze_patient(&history, &parameters).unwrap();
    assert!((result.gaf.score.unwrap() - 50.0).abs() < 1e-9);
    assert_eq!(result.gaf.observations.len(), 1);
}

#[test]
fn unprocessed_imaging_is_reported() {
    let engine = DecisionEngine::default();
    let result = engine
        .analyze_patient(&treated_history(), &OptimizationParameters::default())
        .unwrap();
    assert!(result
        .treatment_suggestions
        .iter()
        .any(|s| s == "1 imaging study awaiting processing"));
    assert!(result
        .treatment_suggestions
        .iter()
        .any(|s| s == "Schedule follow-up imaging"));
}

#[test]
fn invalid_parameters_are_rejected() {
    let engine = DecisionEngine::default();
    let history = single_ymrs_history();
    let cases = [
        OptimizationParameters {
            time_horizon_days: 0,
            ..OptimizationParameters::default()
        },
        OptimizationParameters {
            time_horizon_days: 100_000,
            ..OptimizationParameters::default()
        },
        OptimizationParameters {
            constraints: TreatmentConstraints {
                max_medication_changes: -1,
                ..TreatmentConstraints::default()
            },
            ..OptimizationParameters::default()
        },
        OptimizationParameters {
            constraints: TreatmentConstraints {
                min_treatment_duration_days: -7,
                ..TreatmentConstraints::default()
            },
            ..OptimizationParameters::default()
        },
        OptimizationParameters {
            constraints: TreatmentConstraints {
                max_dosage: f64::NAN,
                ..TreatmentConstraints::default()
            },
            ..OptimizationParameters::default()
        },
    ];
    for parameters in cases {
        let err = engine.analyze_patient(&history, &parameters).unwrap_err();
        assert!(matches!(err, EngineError::InvalidParameters(_)), "{parameters:?}");
    }
}

#[test]
fn invalid_config_is_rejected() {
    let err = DecisionEngine::new(EngineConfig {
        beam_width: 0,
        ..EngineConfig::default()
    })
    .unwrap_err();
    assert!(err.to_string().contains("beam_width"));
}

#[test]
fn format_keeps_plan_verbatim() {
    let plan = vec![
        MedicationAction {
            date: ts("2024-01-01T00:00:00Z"),
            action: ActionKind::Start,
            medication: "Lithium Carbonate".to_string(),
            dosage: Some(450.0),
        },
        MedicationAction {
            date: ts("2024-02-15T12:30:00Z"),
            action: ActionKind::Stop,
            medication: "quetiapine".to_string(),
            dosage: None,
        },
    ];
    let assessment = Assessment {
        trend: TrendAssessment {
            direction: TrendDirection::Stable,
            change: 0.0,
            description: "functioning is stable".to_string(),
        },
        risk: RiskAssessment {
            level: RiskLevel::Low,
            factors: Vec::new(),
            mitigations: Vec::new(),
        },
        suggestions: Vec::new(),
    };
    let search = SearchSummary {
        objective: Objective::MinimizeSymptoms,
        evaluations: 10,
        budget_exceeded: false,
        fallback: false,
        plan_confidence: 1.0,
    };
    let result = format(
        plan.clone(),
        Vec::new(),
        GafResult::insufficient(Vec::new()),
        search,
        assessment,
    );
    assert_eq!(result.recommended_plan, plan);
    assert!(result.rationale.contains("start Lithium Carbonate at 450 mg on 2024-01-01"));
    assert!(result.rationale.contains("stop quetiapine on 2024-02-15"));
}
