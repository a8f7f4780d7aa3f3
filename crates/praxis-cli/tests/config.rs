use std::io::Write;

use praxis_cli::config::{CURRENT_VERSION, load_config, migrate, parse_config};
use praxis_engine::config::EngineConfig;

#[test]
fn missing_path_uses_defaults() {
    let config = load_config(None).unwrap();
    assert_eq!(config.config_version, CURRENT_VERSION);
    assert_eq!(config.engine, EngineConfig::default());
}

#[test]
fn current_config_loads_from_disk() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{"config_version": 1, "engine": {{"beam_width": 4, "iteration_cap": 500}}}}"#
    )
    .unwrap();

    let config = load_config(Some(file.path())).unwrap();
    assert_eq!(config.engine.beam_width, 4);
    assert_eq!(config.engine.iteration_cap, 500);
    assert_eq!(config.engine.per_scale_limit, 10);
}

#[test]
fn v0_config_is_migrated() {
    let lambda = std::f64::consts::LN_2 / 60.0;
    let contents = format!(r#"{{"beam_width": 3, "decay_lambda": {lambda}}}"#);
    let config = parse_config(&contents).unwrap();

    assert_eq!(config.config_version, 1);
    assert_eq!(config.engine.beam_width, 3);
    assert!((config.engine.decay_half_life_days - 60.0).abs() < 1e-9);
}

#[test]
fn migration_moves_fields_under_engine() {
    let migrated = migrate(serde_json::json!({"max_offsets": 2}), 0).unwrap();
    assert_eq!(migrated["config_version"], 1);
    assert_eq!(migrated["engine"]["max_offsets"], 2);
    assert!(migrated.get("max_offsets").is_none());
}

#[test]
fn newer_version_is_rejected() {
    let err = parse_config(r#"{"config_version": 99}"#).unwrap_err();
    assert!(err.to_string().contains("newer than this build supports"));
}

#[test]
fn invalid_tunables_are_rejected() {
    let err = parse_config(r#"{"config_version": 1, "engine": {"budget_confidence": 1.5}}"#)
        .unwrap_err();
    assert!(err.to_string().contains("budget_confidence"));
}

#[test]
fn unreadable_file_names_the_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.json");
    let err = load_config(Some(&path)).unwrap_err();
    assert!(err.to_string().contains("missing.json"));
}

#[test]
fn out_of_range_version_is_rejected() {
    for contents in [
        r#"{"config_version": 4294967297}"#,
        r#"{"config_version": -1}"#,
        r#"{"config_version": "1"}"#,
    ] {
        let err = parse_config(contents).unwrap_err();
        assert!(err.to_string().contains("not a valid version number"), "{contents}");
    }
}
