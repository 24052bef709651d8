//! The evaluation engine.
//!
//! EVALUATION PROTOCOL (fixed, never reordered):
//!   1. Walk the registry in declared order.
//!   2. Locked key: skip. Its value is left exactly as supplied.
//!   3. Otherwise evaluate the formula against the record as it stands
//!      (base inputs plus every earlier key) and store the result.
//!
//! RULES:
//!   - A failing formula never aborts the walk. Its key is stored as a
//!     failed value (NaN when read numerically) and evaluation continues.
//!   - Failures propagate through data: a formula reading a failed field
//!     fails with the same root reason.
//!   - The engine holds no state beyond the read-only registry. Independent
//!     records may be evaluated from any number of threads.

use crate::{
    config::PlanConfig,
    error::PlanResult,
    failure::{Failure, FailureKind},
    lock::{LockSet, Overrides},
    record::{FieldValue, Record},
    registry::FormulaRegistry,
};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldFailure {
    pub key: String,
    pub failure: Failure,
}

impl FieldFailure {
    /// True when `key`'s own formula failed, false when it inherited
    /// the failure from an upstream field.
    pub fn is_root(&self) -> bool {
        self.failure.is_root_for(&self.key)
    }
}

/// What happened during one evaluation pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EvaluationReport {
    /// Keys whose formula ran, in registry order.
    pub evaluated: Vec<String>,
    /// Keys skipped because they were locked, in registry order.
    pub locked: Vec<String>,
    pub failures: Vec<FieldFailure>,
}

impl EvaluationReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn root_failures(&self) -> impl Iterator<Item = &FieldFailure> {
        self.failures.iter().filter(|f| f.is_root())
    }

    pub fn failed_keys(&self) -> impl Iterator<Item = &str> {
        self.failures.iter().map(|f| f.key.as_str())
    }
}

/// Evaluate `registry` against `record` in place, skipping `locked` keys.
pub fn compute_derived(
    registry: &FormulaRegistry,
    record: &mut Record,
    locked: &LockSet,
) -> EvaluationReport {
    let mut report = EvaluationReport::default();

    for entry in registry.entries() {
        if locked.contains(entry.key) {
            if !record.contains(entry.key) {
                // Locked without a value: nothing to preserve, so the slot
                // is filled as unavailable to keep every key present.
                log::warn!("Locked key '{}' has no supplied value", entry.key);
                let failure = Failure::new(
                    entry.key,
                    FailureKind::MissingDependency { field: entry.key.to_string() },
                );
                record.set(entry.key, FieldValue::Failed(failure.clone()));
                report.failures.push(FieldFailure {
                    key: entry.key.to_string(),
                    failure,
                });
            } else {
                log::debug!("Skipping locked key '{}'", entry.key);
            }
            report.locked.push(entry.key.to_string());
            continue;
        }

        report.evaluated.push(entry.key.to_string());
        match entry.expr.evaluate(record) {
            Ok(value) => record.set(entry.key, value),
            Err(fault) => {
                let failure = fault.into_failure(entry.key);
                if failure.is_root_for(entry.key) {
                    log::warn!("Formula failed: {failure}");
                } else {
                    log::debug!("'{}' unavailable, inherited from {failure}", entry.key);
                }
                record.set(entry.key, FieldValue::Failed(failure.clone()));
                report.failures.push(FieldFailure {
                    key: entry.key.to_string(),
                    failure,
                });
            }
        }
    }

    log::debug!(
        "Evaluated {} formulas ({} locked, {} failed)",
        report.evaluated.len(),
        report.locked.len(),
        report.failures.len()
    );
    report
}

/// A validated registry ready to evaluate records.
#[derive(Debug, Clone)]
pub struct Evaluator {
    registry: FormulaRegistry,
}

impl Evaluator {
    pub fn new(registry: FormulaRegistry) -> Self {
        Self { registry }
    }

    /// Build and validate the standard staffing registry.
    /// A registry ordering defect surfaces here, not as runtime NaNs.
    pub fn standard(config: &PlanConfig) -> PlanResult<Self> {
        Ok(Self::new(FormulaRegistry::standard(config)?))
    }

    pub fn registry(&self) -> &FormulaRegistry {
        &self.registry
    }

    pub fn evaluate(&self, record: &mut Record, locked: &LockSet) -> EvaluationReport {
        compute_derived(&self.registry, record, locked)
    }

    /// Seed `overrides` into the record, lock them, and evaluate.
    pub fn evaluate_with(&self, record: &mut Record, overrides: &Overrides) -> EvaluationReport {
        let locked = overrides.apply(record);
        self.evaluate(record, &locked)
    }
}
