use jiff::Timestamp;
use praxis_core::models::history::PatientHistory;
use praxis_core::models::observation::ScaleObservation;
use praxis_core::models::plan::{ActionKind, MedicationAction};
use praxis_core::models::treatment::MedicationCourse;
use praxis_core::time::add_days;
use praxis_engine::config::EngineConfig;
use praxis_engine::trajectory::{
    Baseline, NEUTRAL_SEVERITY, Regimen, apply_action, project, regimen_at, sample_days,
    simulate,
};

fn ts(s: &str) -> Timestamp {
    s.parse().unwrap()
}

fn ymrs(date: &str, raw: f64) -> ScaleObservation {
    ScaleObservation {
        date: ts(date),
        scale_name: "YMRS".to_string(),
        raw_score: raw,
        max_score: None,
    }
}

fn course(name: &str, dosage: f64, start: &str, end: Option<&str>) -> MedicationCourse {
    MedicationCourse {
        name: name.to_string(),
        dosage,
        start_date: ts(start),
        end_date: end.map(ts),
    }
}

#[test]
fn samples_every_interval_and_the_horizon() {
    assert_eq!(sample_days(20, 7), vec![7, 14, 20]);
    assert_eq!(sample_days(14, 7), vec![7, 14]);
    assert_eq!(sample_days(3, 7), vec![3]);
    assert!(sample_days(0, 7).is_empty());
}

#[test]
fn empty_history_projects_flat_neutral_line() {
    let config = EngineConfig::default();
    let as_of = Timestamp::UNIX_EPOCH;
    let points = project(&PatientHistory::default(), &[], 90, as_of, &config);

    assert_eq!(points.len(), 13);
    assert!(points.iter().all(|p| p.predicted_score == NEUTRAL_SEVERITY));
    assert_eq!(points.last().unwrap().date, add_days(as_of, 90));
}

#[test]
fn single_observation_projects_flat_line() {
    let config = EngineConfig::default();
    let history = PatientHistory {
        clinical_data: vec![ScaleObservation {
            date: ts("2024-01-01T00:00:00Z"),
            scale_name: "YMRS".to_string(),
            raw_score: 20.0,
            max_score: Some(40.0),
        }],
        ..PatientHistory::default()
    };
    let as_of = ts("2024-01-01T00:00:00Z");
    let points = project(&history, &[], 90, as_of, &config);

    assert!(!points.is_empty());
    for point in &points {
        assert!((point.predicted_score - 50.0).abs() < 1e-9);
        assert!(point.lower <= point.predicted_score && point.predicted_score <= point.upper);
    }
}

#[test]
fn confidence_band_widens_then_caps() {
    let config = EngineConfig::default();
    let points = project(&PatientHistory::default(), &[], 200, Timestamp::UNIX_EPOCH, &config);
    let first = &points[0];
    let last = points.last().unwrap();
    assert!((first.upper - first.predicted_score - 5.7).abs() < 1e-9);
    assert!((last.upper - last.predicted_score - 15.0).abs() < 1e-9);
}

#[test]
fn worsening_history_has_positive_slope() {
    let config = EngineConfig::default();
    let observations = [
        ymrs("2024-01-01T00:00:00Z", 6.0),
        ymrs("2024-02-01T00:00:00Z", 18.0),
        ymrs("2024-03-01T00:00:00Z", 30.0),
    ];
    let baseline = Baseline::fit(&observations, ts("2024-03-01T00:00:00Z"), &config);
    assert_eq!(baseline.series.len(), 3);
    assert!(baseline.slope > 0.0);
    assert!(baseline.slope <= config.max_baseline_slope);
    // series carries GAF, oldest first
    assert!(baseline.series[0].1 > baseline.series[2].1);
}

#[test]
fn starting_a_medication_bends_the_trajectory_down() {
    let config = EngineConfig::default();
    let as_of = ts("2024-03-01T00:00:00Z");
    let baseline = Baseline {
        series: vec![(0.0, 40.0)],
        level: 60.0,
        slope: 0.0,
    };
    let plan = [MedicationAction {
        date: as_of,
        action: ActionKind::Start,
        medication: "lithium".to_string(),
        dosage: Some(100.0),
    }];

    let untreated = simulate(&baseline, &Regimen::new(), &[], 90, as_of, &config);
    let treated = simulate(&baseline, &Regimen::new(), &plan, 90, as_of, &config);

    let untreated_last = untreated.points.last().unwrap().predicted_score;
    let treated_last = treated.points.last().unwrap().predicted_score;
    assert!((untreated_last - 60.0).abs() < 1e-9);
    assert!(treated_last < untreated_last);
    assert_eq!(treated.loads.last().unwrap().count, 1);
    assert_eq!(treated.loads.last().unwrap().total_dose, 100.0);
}

#[test]
fn stopping_an_active_medication_reverts_its_benefit() {
    let config = EngineConfig::default();
    let as_of = ts("2024-03-01T00:00:00Z");
    let history = PatientHistory {
        treatments: vec![course("Lithium", 900.0, "2024-01-01T00:00:00Z", None)],
        ..PatientHistory::default()
    };
    let regimen = regimen_at(&history, as_of);
    assert!(regimen.contains_key("lithium"));

    let baseline = Baseline {
        series: vec![(0.0, 50.0)],
        level: 50.0,
        slope: 0.0,
    };
    let stop = [MedicationAction {
        date: as_of,
        action: ActionKind::Stop,
        medication: "lithium".to_string(),
        dosage: None,
    }];
    let stopped = simulate(&baseline, &regimen, &stop, 60, as_of, &config);
    assert!(stopped.points.last().unwrap().predicted_score > 50.0);
    assert_eq!(stopped.loads.last().unwrap().count, 0);
}

#[test]
fn levels_saturate_at_the_bounds() {
    let config = EngineConfig::default();
    let baseline = Baseline {
        series: vec![(0.0, 5.0)],
        level: 95.0,
        slope: 1.0,
    };
    let sim = simulate(&baseline, &Regimen::new(), &[], 60, Timestamp::UNIX_EPOCH, &config);
    assert!(sim.points.iter().all(|p| p.predicted_score <= 100.0));
    assert_eq!(sim.points.last().unwrap().predicted_score, 100.0);
}

#[test]
fn ended_courses_are_not_active() {
    let history = PatientHistory {
        treatments: vec![
            course("quetiapine", 300.0, "2023-01-01T00:00:00Z", Some("2023-06-01T00:00:00Z")),
            course("sertraline", 50.0, "2023-05-01T00:00:00Z", None),
        ],
        ..PatientHistory::default()
    };
    let regimen = regimen_at(&history, ts("2024-01-01T00:00:00Z"));
    assert_eq!(regimen.keys().collect::<Vec<_>>(), vec!["sertraline"]);
}

#[test]
fn adjusting_an_inactive_medication_starts_it() {
    let config = EngineConfig::default();
    let mut regimen = Regimen::new();
    let adjust = MedicationAction {
        date: Timestamp::UNIX_EPOCH,
        action: ActionKind::AdjustDose,
        medication: "Aripiprazole".to_string(),
        dosage: Some(15.0),
    };
    apply_action(&mut regimen, &adjust, 14, &config);
    let active = &regimen["aripiprazole"];
    assert_eq!(active.dose, 15.0);
    assert_eq!(active.last_change_day, 14);
    assert_eq!(active.name, "Aripiprazole");
}
