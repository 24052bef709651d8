//! Plan configuration loading and its effect on evaluation.

use hubstaff_core::{
    config::PlanConfig,
    engine::Evaluator,
    error::PlanError,
    fields::*,
    lock::LockSet,
    record::Record,
};
use std::path::PathBuf;

fn repo_data_dir() -> String {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../data")
        .to_string_lossy()
        .into_owned()
}

fn scratch_data_dir(config_json: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("hubstaff-config-{}", uuid::Uuid::new_v4()));
    std::fs::create_dir_all(dir.join("staffing")).unwrap();
    std::fs::write(dir.join("staffing/plan_config.json"), config_json).unwrap();
    dir
}

fn scenario_a() -> Record {
    [
        (OUT_DOCS, 100.0),
        (OUT_NON_DOCS, 200.0),
        (IN_DOCS, 50.0),
        (IN_NON_DOCS, 150.0),
        (OUT_AIR, 40.0),
        (OUT_SURFACE, 160.0),
        (IN_AIR, 20.0),
        (IN_SURFACE, 130.0),
        (OUT_NDX_OUT_VOL, 300.0),
        (OUT_NDX_VOL_WT, 900.0),
        (IN_NDX_OUT_VOL, 250.0),
        (IN_NDX_VOL_WT, 750.0),
        (SORTER, 1.0),
        (AT, 20.0),
    ]
    .into_iter()
    .collect()
}

#[test]
fn shipped_config_matches_built_in_defaults() {
    let loaded = PlanConfig::load(&repo_data_dir()).unwrap();
    let defaults = PlanConfig::default();
    assert_eq!(loaded.base_fields, defaults.base_fields);
    assert_eq!(loaded.correlated_pairs, defaults.correlated_pairs);
    assert_eq!(loaded.constants.working_days, defaults.constants.working_days);
    let drift = loaded.constants.doc_seconds_per_shipment
        - defaults.constants.doc_seconds_per_shipment;
    assert!(drift.abs() < 1e-12);
}

#[test]
fn partial_config_keeps_remaining_defaults() {
    let dir = scratch_data_dir(r#"{"constants": {"working_days": 20}}"#);
    let config = PlanConfig::load(dir.to_str().unwrap()).unwrap();
    std::fs::remove_dir_all(&dir).ok();

    assert_eq!(config.constants.working_days, 20.0);
    assert_eq!(config.constants.docs_per_packet, 15.0);
    assert_eq!(config.base_fields.len(), BASE_INPUT_FIELDS.len());
}

#[test]
fn missing_config_file_is_an_error() {
    let dir = std::env::temp_dir().join(format!("hubstaff-missing-{}", uuid::Uuid::new_v4()));
    assert!(PlanConfig::load(dir.to_str().unwrap()).is_err());
}

#[test]
fn working_days_drive_the_daily_figures() {
    let mut config = PlanConfig::default();
    config.constants.working_days = 20.0;
    let evaluator = Evaluator::standard(&config).unwrap();

    let mut record = scenario_a();
    evaluator.evaluate(&mut record, &LockSet::new());
    assert_eq!(record.number(OUT_PER_DAY_NON_DOCS), 10.0);
    assert_eq!(record.number(PER_DAY_NDX), 10.0);
}

#[test]
fn only_base_fields_may_be_edited() {
    let config = PlanConfig::default();
    assert!(config.require_base_field(OUT_NDX_VOL_WT).is_ok());
    assert!(matches!(
        config.require_base_field(PER_DAY_NDX),
        Err(PlanError::UnknownField { field }) if field == PER_DAY_NDX
    ));
}

#[test]
fn dropping_a_base_field_from_config_fails_validation() {
    let mut config = PlanConfig::default();
    config.base_fields.retain(|f| f != AT);
    assert!(matches!(
        Evaluator::standard(&config),
        Err(PlanError::RegistryOrder { dependency, .. }) if dependency == AT
    ));
}
