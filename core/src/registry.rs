//! The formula registry: every derived field, in fixed evaluation order.
//!
//! RULES:
//!   - Order is total and fixed. The engine never reorders or sorts it.
//!   - An entry may only read base inputs or keys declared before it.
//!   - `validate()` enforces the rule above at start-up. A registry built
//!     with `from_entries()` and never validated still evaluates, but an
//!     out-of-order read degrades to a failed (NaN) field at runtime.

use crate::{
    config::{PlanConfig, WorkloadConstants},
    error::{PlanError, PlanResult},
    expr::{constant, field, max, round_up, sum_fields, Expr},
    fields::*,
    types::FieldName,
};
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq)]
pub struct FormulaEntry {
    pub key: FieldName,
    pub expr: Expr,
}

impl FormulaEntry {
    pub fn new(key: FieldName, expr: Expr) -> Self {
        Self { key, expr }
    }

    pub fn dependencies(&self) -> Vec<FieldName> {
        self.expr.dependencies()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormulaRegistry {
    entries: Vec<FormulaEntry>,
}

impl FormulaRegistry {
    /// Build a registry in the given order without checking it.
    pub fn from_entries(entries: Vec<FormulaEntry>) -> Self {
        Self { entries }
    }

    /// The staffing registry, built from `config.constants` and validated
    /// against `config.base_fields`.
    pub fn standard(config: &PlanConfig) -> PlanResult<Self> {
        let registry = Self::from_entries(standard_entries(&config.constants));
        registry.validate(&config.base_fields)?;
        log::debug!("Standard registry validated: {} formulas", registry.len());
        Ok(registry)
    }

    /// Check declaration order: every dependency must be a base field or
    /// an earlier key, and no key may be declared twice or shadow a base
    /// field.
    pub fn validate<S: AsRef<str>>(&self, base_fields: &[S]) -> PlanResult<()> {
        let mut available: HashSet<&str> = base_fields.iter().map(AsRef::as_ref).collect();
        for entry in &self.entries {
            for dependency in entry.dependencies() {
                if !available.contains(dependency) {
                    return Err(PlanError::RegistryOrder {
                        key: entry.key.to_string(),
                        dependency: dependency.to_string(),
                    });
                }
            }
            if !available.insert(entry.key) {
                return Err(PlanError::DuplicateFormula { key: entry.key.to_string() });
            }
        }
        Ok(())
    }

    pub fn entries(&self) -> &[FormulaEntry] {
        &self.entries
    }

    pub fn keys(&self) -> impl Iterator<Item = FieldName> + '_ {
        self.entries.iter().map(|e| e.key)
    }

    pub fn get(&self, key: &str) -> Option<&FormulaEntry> {
        self.entries.iter().find(|e| e.key == key)
    }

    pub fn position(&self, key: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.key == key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.position(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys that read `source` directly or transitively, in registry order.
    pub fn downstream_of(&self, source: &str) -> Vec<FieldName> {
        let mut tainted: HashSet<&str> = HashSet::from([source]);
        let mut out = Vec::new();
        for entry in &self.entries {
            if entry.dependencies().iter().any(|d| tainted.contains(d)) {
                tainted.insert(entry.key);
                out.push(entry.key);
            }
        }
        out
    }
}

/// Workload units, in the order the staffing sums read them.
const PROCESS_UNITS: [FieldName; 9] = [
    CD_UNIT,
    WITH_SORTER_SORTER_UNIT,
    WITH_SORTER_NON_CONY,
    MANUAL_SORTING_UNITS,
    XRAY_UNIT,
    AIR_UNIT,
    SURFACE_UNIT,
    DOC_UNIT,
    EXCEPTION_HAN_UNIT,
];

/// (manpower key, workload unit it staffs)
const MANPOWER_UNITS: [(FieldName, FieldName); 10] = [
    (MANPOWER_IN_UNITS_CD_UNIT, CD_UNIT),
    (MANPOWER_IN_UNITS_WITH_SORTER_SORTER_UNIT, WITH_SORTER_SORTER_UNIT),
    (MANPOWER_IN_UNITS_WITH_SORTER_NON_CONY, WITH_SORTER_NON_CONY),
    (MANPOWER_IN_UNITS_WITH_NO_SORTER_MANUAL_SORTING_UNITS, MANUAL_SORTING_UNITS),
    (MANPOWER_IN_UNITS_SKIDDER_UNIT, SKIDDER_UNIT),
    (MANPOWER_IN_UNITS_XRAY_UNIT, XRAY_UNIT),
    (MANPOWER_IN_UNITS_AIR_UNIT, AIR_UNIT),
    (MANPOWER_IN_UNITS_SURFACE_UNIT, SURFACE_UNIT),
    (MANPOWER_IN_UNITS_DOC_UNIT, DOC_UNIT),
    (MANPOWER_IN_UNITS_EXCEPTION_HAN_UNIT, EXCEPTION_HAN_UNIT),
];

/// (per-day key, monthly source field)
const PER_DAY_DIRECTIONAL: [(FieldName, FieldName); 12] = [
    (OUT_PER_DAY_DOCS, OUT_DOCS),
    (OUT_PER_DAY_NON_DOCS, OUT_NON_DOCS),
    (OUT_PER_DAY_AIR, OUT_AIR),
    (OUT_PER_DAY_SURFACE, OUT_SURFACE),
    (OUT_PER_DAY_NDX_OUT_VOL, OUT_NDX_OUT_VOL),
    (OUT_PER_DAY_NDX_VOL_WT, OUT_NDX_VOL_WT),
    (IN_PER_DAY_DOCS, IN_DOCS),
    (IN_PER_DAY_NON_DOCS, IN_NON_DOCS),
    (IN_PER_DAY_AIR, IN_AIR),
    (IN_PER_DAY_SURFACE, IN_SURFACE),
    (IN_PER_DAY_NDX_OUT_VOL, IN_NDX_OUT_VOL),
    (IN_PER_DAY_NDX_VOL_WT, IN_NDX_VOL_WT),
];

/// The staffing formulas in evaluation order.
///
/// Both staffing totals are computed unconditionally from the same pool of
/// manpower intermediates; each subtracts the intermediates that do not
/// apply to its scenario. The `sorter` input does not select between them.
pub fn standard_entries(c: &WorkloadConstants) -> Vec<FormulaEntry> {
    let sph = c.seconds_per_hour;
    let mut entries = vec![
        FormulaEntry::new(IN_AVG_WT_CN, field(IN_NDX_VOL_WT) / field(IN_NDX_OUT_VOL)),
        FormulaEntry::new(OUT_AVG_WT_CN, field(OUT_NDX_VOL_WT) / field(OUT_NDX_OUT_VOL)),
        FormulaEntry::new(PACKET, max_docs() / c.docs_per_packet),
        FormulaEntry::new(BAG_DOC, (max_docs() / c.docs_per_packet) / c.packets_per_bag),
        FormulaEntry::new(
            VOL_BAG_NON_DOC,
            max([field(IN_NDX_OUT_VOL), field(OUT_NDX_OUT_VOL)]) / c.ndx_volume_per_bag,
        ),
        FormulaEntry::new(
            WT_BAG_NON_DOC,
            max([field(IN_NDX_VOL_WT), field(OUT_NDX_VOL_WT)]) / c.ndx_weight_per_bag,
        ),
    ];

    entries.extend(PER_DAY_DIRECTIONAL.iter().map(|&(key, source)| {
        FormulaEntry::new(key, round_up(field(source) / c.working_days, 0))
    }));

    entries.extend([
        FormulaEntry::new(
            PER_DAY_NDX,
            max([field(OUT_PER_DAY_NON_DOCS), field(IN_PER_DAY_NON_DOCS)]),
        ),
        FormulaEntry::new(PER_DAY_DOX, max([field(OUT_PER_DAY_DOCS), field(IN_PER_DAY_DOCS)])),
        FormulaEntry::new(PER_DAY_PACKET, field(PACKET) / c.working_days),
        FormulaEntry::new(PER_DAY_BAG_DOC, field(BAG_DOC) / c.working_days),
        FormulaEntry::new(
            PER_DAY_BAG_NON_DOC,
            max([field(VOL_BAG_NON_DOC), field(WT_BAG_NON_DOC)]) / c.working_days,
        ),
        FormulaEntry::new(PER_DAY_AIR, field(OUT_PER_DAY_AIR) / c.air_shipments_per_bag),
        FormulaEntry::new(CD_UNIT, bags_per_day() * c.cd_seconds_per_bag / sph),
        FormulaEntry::new(
            WITH_SORTER_SORTER_UNIT,
            constant(c.sorter_seconds_per_shipment) * field(PER_DAY_NDX) * c.sorter_utilisation
                / sph,
        ),
        FormulaEntry::new(
            WITH_SORTER_NON_CONY,
            (field(WITH_SORTER_SORTER_UNIT)
                * c.non_conveyable_share
                * c.non_conveyable_handling_factor)
                / c.sorter_utilisation,
        ),
        FormulaEntry::new(
            MANUAL_SORTING_UNITS,
            field(PER_DAY_NDX) * c.manual_sort_seconds_per_shipment / sph,
        ),
        // Atomic units come before skidder_unit, which sums them.
        FormulaEntry::new(XRAY_UNIT, field(PER_DAY_AIR) * c.xray_seconds_per_bag / sph),
        FormulaEntry::new(AIR_UNIT, field(PER_DAY_AIR) * c.air_seconds_per_bag / sph),
        FormulaEntry::new(
            SURFACE_UNIT,
            (bags_per_day() - field(PER_DAY_AIR)) * c.surface_seconds_per_bag / sph,
        ),
        FormulaEntry::new(
            DOC_UNIT,
            (constant(c.doc_handling_share) * field(PER_DAY_DOX) * c.doc_seconds_per_shipment)
                / sph,
        ),
        FormulaEntry::new(
            EXCEPTION_HAN_UNIT,
            constant(c.exception_rate) * c.exception_seconds * field(PER_DAY_NDX) / sph,
        ),
        FormulaEntry::new(SKIDDER_UNIT, constant(c.skidder_share) * sum_fields(&PROCESS_UNITS)),
        FormulaEntry::new(
            TOTAL,
            constant(c.total_buffer)
                * (sum_fields(&[
                    CD_UNIT,
                    WITH_SORTER_SORTER_UNIT,
                    WITH_SORTER_NON_CONY,
                    MANUAL_SORTING_UNITS,
                    SKIDDER_UNIT,
                    XRAY_UNIT,
                    AIR_UNIT,
                    SURFACE_UNIT,
                    DOC_UNIT,
                    EXCEPTION_HAN_UNIT,
                ]) - field(MANUAL_SORTING_UNITS)),
        ),
    ]);

    entries.extend(MANPOWER_UNITS.iter().map(|&(key, unit)| {
        FormulaEntry::new(key, round_up(field(unit) * c.manpower_buffer / field(AT), 0))
    }));

    let all_manpower: Vec<FieldName> = MANPOWER_UNITS.iter().map(|&(key, _)| key).collect();
    entries.extend([
        FormulaEntry::new(
            MANPOWER_WITH_SORTER,
            sum_fields(&all_manpower)
                - field(MANPOWER_IN_UNITS_WITH_NO_SORTER_MANUAL_SORTING_UNITS),
        ),
        FormulaEntry::new(
            MANPOWER_WITHOUT_SORTER,
            sum_fields(&all_manpower)
                - field(MANPOWER_IN_UNITS_WITH_SORTER_SORTER_UNIT)
                - field(MANPOWER_IN_UNITS_WITH_SORTER_NON_CONY),
        ),
    ]);

    entries
}

fn max_docs() -> Expr {
    max([field(IN_DOCS), field(OUT_DOCS)])
}

fn bags_per_day() -> Expr {
    field(PER_DAY_BAG_DOC) + field(PER_DAY_BAG_NON_DOC)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_registry_has_every_derived_field_once() {
        let registry = FormulaRegistry::standard(&PlanConfig::default()).unwrap();
        assert_eq!(registry.len(), 47);
        let unique: HashSet<_> = registry.keys().collect();
        assert_eq!(unique.len(), 47);
        assert_eq!(registry.position(IN_AVG_WT_CN), Some(0));
        assert_eq!(registry.position(MANPOWER_WITHOUT_SORTER), Some(46));
    }

    #[test]
    fn skidder_follows_every_unit_it_sums() {
        let registry = FormulaRegistry::standard(&PlanConfig::default()).unwrap();
        let skidder = registry.position(SKIDDER_UNIT).unwrap();
        for unit in PROCESS_UNITS {
            assert!(registry.position(unit).unwrap() < skidder, "{unit} after skidder_unit");
        }
    }

    #[test]
    fn downstream_of_follows_transitive_reads() {
        let registry = FormulaRegistry::standard(&PlanConfig::default()).unwrap();
        let downstream = registry.downstream_of(PER_DAY_DOX);
        assert_eq!(
            downstream,
            vec![
                DOC_UNIT,
                SKIDDER_UNIT,
                TOTAL,
                MANPOWER_IN_UNITS_SKIDDER_UNIT,
                MANPOWER_IN_UNITS_DOC_UNIT,
                MANPOWER_WITH_SORTER,
                MANPOWER_WITHOUT_SORTER,
            ]
        );
    }
}
