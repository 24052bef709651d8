//! Fail-soft evaluation: failures become data and propagate through it.

use hubstaff_core::{
    config::PlanConfig,
    engine::Evaluator,
    error::PlanError,
    expr::{constant, field},
    failure::{ArithmeticFault, FailureKind},
    fields::*,
    lock::LockSet,
    record::Record,
    registry::{standard_entries, FormulaEntry, FormulaRegistry},
};

fn evaluator() -> Evaluator {
    Evaluator::standard(&PlanConfig::default()).expect("standard registry is valid")
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
fn removing_a_base_input_fails_exactly_its_downstream() {
    let evaluator = evaluator();

    for removed in BASE_INPUT_FIELDS {
        let mut record = scenario_a();
        record.remove(removed);
        let report = evaluator.evaluate(&mut record, &LockSet::new());
        let downstream = evaluator.registry().downstream_of(removed);

        for key in evaluator.registry().keys() {
            let value = record.number(key);
            if downstream.contains(&key) {
                assert!(value.is_nan(), "without {removed}: {key} = {value}, expected NaN");
                let failure = record.failure(key).expect("failed slot carries a reason");
                assert_eq!(
                    failure.kind,
                    FailureKind::MissingDependency { field: removed.to_string() },
                    "without {removed}: {key} has the wrong root reason"
                );
            } else {
                assert!(value.is_finite(), "without {removed}: unrelated {key} = {value}");
            }
        }
        assert_eq!(report.failures.len(), downstream.len(), "without {removed}");
    }
}

#[test]
fn removing_the_productivity_constant_fails_every_manpower_figure() {
    let evaluator = evaluator();
    let mut record = scenario_a();
    record.remove(AT);
    evaluator.evaluate(&mut record, &LockSet::new());

    assert!(record.number(MANPOWER_WITH_SORTER).is_nan());
    assert!(record.number(MANPOWER_WITHOUT_SORTER).is_nan());
    assert!(record.number(TOTAL).is_finite(), "total does not read 'at'");
}

#[test]
fn division_by_zero_is_contained_to_its_key() {
    let evaluator = evaluator();
    let mut record = scenario_a();
    record.set(IN_NDX_OUT_VOL, 0.0);
    let report = evaluator.evaluate(&mut record, &LockSet::new());

    assert_eq!(report.failures.len(), 1, "{:?}", report.failures);
    assert_eq!(report.failures[0].key, IN_AVG_WT_CN);
    assert!(report.failures[0].is_root());
    assert_eq!(
        record.failure(IN_AVG_WT_CN).map(|f| &f.kind),
        Some(&FailureKind::Arithmetic { fault: ArithmeticFault::DivisionByZero })
    );
    assert!(record.number(MANPOWER_WITH_SORTER).is_finite());
}

#[test]
fn propagated_failures_carry_the_first_root_reason() {
    let evaluator = evaluator();
    let mut record = scenario_a();
    record.set(AT, 0.0);
    let report = evaluator.evaluate(&mut record, &LockSet::new());

    // Every manpower_in_units_* divides by 'at' and fails on its own.
    let roots: Vec<&str> = report.root_failures().map(|f| f.key.as_str()).collect();
    assert_eq!(roots.len(), 10, "{roots:?}");
    assert!(roots.iter().all(|k| k.starts_with("manpower_in_units_")));

    // The totals inherit the first one they read.
    for total in [MANPOWER_WITH_SORTER, MANPOWER_WITHOUT_SORTER] {
        let failure = record.failure(total).expect("total failed");
        assert_eq!(failure.origin, MANPOWER_IN_UNITS_CD_UNIT);
        assert_eq!(
            failure.kind,
            FailureKind::Arithmetic { fault: ArithmeticFault::DivisionByZero }
        );
    }
}

#[test]
fn text_value_is_a_type_mismatch() {
    let evaluator = evaluator();
    let mut record = scenario_a();
    record.set_text(OUT_AIR, "n/a");
    evaluator.evaluate(&mut record, &LockSet::new());

    assert_eq!(
        record.failure(OUT_PER_DAY_AIR).map(|f| &f.kind),
        Some(&FailureKind::TypeMismatch { field: OUT_AIR.into(), found: "n/a".into() })
    );
    assert!(record.number(PER_DAY_AIR).is_nan());
    assert!(record.number(XRAY_UNIT).is_nan());
    assert!(record.number(PER_DAY_DOX).is_finite());
}

#[test]
fn nan_input_is_reported_as_not_a_number() {
    let evaluator = evaluator();
    let mut record = scenario_a();
    record.set(IN_SURFACE, f64::NAN);
    evaluator.evaluate(&mut record, &LockSet::new());

    assert_eq!(
        record.failure(IN_PER_DAY_SURFACE).map(|f| &f.kind),
        Some(&FailureKind::NotANumber { field: IN_SURFACE.into() })
    );
    assert!(record.number(MANPOWER_WITH_SORTER).is_finite());
}

#[test]
fn overflow_is_an_arithmetic_failure() {
    let evaluator = evaluator();
    let mut record = scenario_a();
    record.set(IN_NDX_VOL_WT, f64::MAX);
    record.set(IN_NDX_OUT_VOL, 1e-300);
    evaluator.evaluate(&mut record, &LockSet::new());

    assert_eq!(
        record.failure(IN_AVG_WT_CN).map(|f| &f.kind),
        Some(&FailureKind::Arithmetic { fault: ArithmeticFault::NonFinite })
    );
}

#[test]
fn standard_registry_reads_only_earlier_fields() {
    let registry = evaluator().registry().clone();
    for (position, entry) in registry.entries().iter().enumerate() {
        for dependency in entry.dependencies() {
            let ok = is_base_input(dependency)
                || registry.position(dependency).is_some_and(|p| p < position);
            assert!(ok, "{} reads {dependency} before it is available", entry.key);
        }
    }
}

/// A registry with skidder_unit moved ahead of the units it sums.
fn misordered_entries() -> Vec<FormulaEntry> {
    let mut entries = standard_entries(&PlanConfig::default().constants);
    let from = entries.iter().position(|e| e.key == SKIDDER_UNIT).unwrap();
    let skidder = entries.remove(from);
    let to = entries.iter().position(|e| e.key == CD_UNIT).unwrap();
    entries.insert(to, skidder);
    entries
}

#[test]
fn validation_rejects_out_of_order_entries() {
    let registry = FormulaRegistry::from_entries(misordered_entries());
    match registry.validate(&BASE_INPUT_FIELDS) {
        Err(PlanError::RegistryOrder { key, dependency }) => {
            assert_eq!(key, SKIDDER_UNIT);
            assert_eq!(dependency, CD_UNIT);
        }
        other => panic!("expected RegistryOrder, got {other:?}"),
    }
}

#[test]
fn unvalidated_misordered_entry_degrades_to_nan() {
    let evaluator = Evaluator::new(FormulaRegistry::from_entries(misordered_entries()));
    let mut record = scenario_a();
    let report = evaluator.evaluate(&mut record, &LockSet::new());

    assert!(record.number(SKIDDER_UNIT).is_nan());
    assert_eq!(
        record.failure(SKIDDER_UNIT).map(|f| &f.kind),
        Some(&FailureKind::MissingDependency { field: CD_UNIT.into() })
    );
    assert!(record.number(CD_UNIT).is_finite(), "later keys still evaluate");
    assert!(record.number(MANPOWER_WITH_SORTER).is_nan());
    assert!(report.root_failures().any(|f| f.key == SKIDDER_UNIT));
}

#[test]
fn validation_rejects_duplicates_and_shadowed_inputs() {
    let duplicate = FormulaRegistry::from_entries(vec![
        FormulaEntry::new(PACKET, field(IN_DOCS) / 15.0),
        FormulaEntry::new(PACKET, field(OUT_DOCS) / 15.0),
    ]);
    assert!(matches!(
        duplicate.validate(&BASE_INPUT_FIELDS),
        Err(PlanError::DuplicateFormula { key }) if key == PACKET
    ));

    let shadowing = FormulaRegistry::from_entries(vec![FormulaEntry::new(AT, constant(8.0))]);
    assert!(matches!(
        shadowing.validate(&BASE_INPUT_FIELDS),
        Err(PlanError::DuplicateFormula { key }) if key == AT
    ));
}

#[test]
fn validation_rejects_self_reference() {
    let registry = FormulaRegistry::from_entries(vec![FormulaEntry::new(
        PACKET,
        field(PACKET) + 1.0,
    )]);
    assert!(matches!(
        registry.validate(&BASE_INPUT_FIELDS),
        Err(PlanError::RegistryOrder { key, dependency }) if key == PACKET && dependency == PACKET
    ));
}
