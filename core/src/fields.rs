//! Stable field names.
//!
//! RULE: These names are the public output contract. Consumers read
//! them by string; renaming one is a compatibility break.

// ── Base inputs (never computed) ──────────────────────────────

pub const OUT_DOCS: &str = "out_docs";
pub const OUT_NON_DOCS: &str = "out_non_docs";
pub const OUT_AIR: &str = "out_air";
pub const OUT_SURFACE: &str = "out_surface";
pub const OUT_NDX_OUT_VOL: &str = "out_ndx_out_vol";
pub const OUT_NDX_VOL_WT: &str = "out_ndx_vol_wt";
pub const IN_DOCS: &str = "in_docs";
pub const IN_NON_DOCS: &str = "in_non_docs";
pub const IN_AIR: &str = "in_air";
pub const IN_SURFACE: &str = "in_surface";
pub const IN_NDX_OUT_VOL: &str = "in_ndx_out_vol";
pub const IN_NDX_VOL_WT: &str = "in_ndx_vol_wt";
/// 1 when the hub has a sorting machine installed. Informational only.
pub const SORTER: &str = "sorter";
/// Productivity constant: divisor applied to every workload unit.
pub const AT: &str = "at";

/// Base inputs in source-column order.
pub const BASE_INPUT_FIELDS: [&str; 14] = [
    OUT_DOCS,
    OUT_NON_DOCS,
    OUT_AIR,
    OUT_SURFACE,
    OUT_NDX_OUT_VOL,
    OUT_NDX_VOL_WT,
    IN_DOCS,
    IN_NON_DOCS,
    IN_AIR,
    IN_SURFACE,
    IN_NDX_OUT_VOL,
    IN_NDX_VOL_WT,
    SORTER,
    AT,
];

// ── Shipment and bag counts ───────────────────────────────────

pub const IN_AVG_WT_CN: &str = "in_avg_wt_cn";
pub const OUT_AVG_WT_CN: &str = "out_avg_wt_cn";
pub const PACKET: &str = "packet";
pub const BAG_DOC: &str = "bag_doc";
pub const VOL_BAG_NON_DOC: &str = "vol_bag_non_doc";
pub const WT_BAG_NON_DOC: &str = "wt_bag_non_doc";

// ── Per-day throughput ────────────────────────────────────────

pub const OUT_PER_DAY_DOCS: &str = "out_per_day_docs";
pub const OUT_PER_DAY_NON_DOCS: &str = "out_per_day_non_docs";
pub const OUT_PER_DAY_AIR: &str = "out_per_day_air";
pub const OUT_PER_DAY_SURFACE: &str = "out_per_day_surface";
pub const OUT_PER_DAY_NDX_OUT_VOL: &str = "out_per_day_ndx_out_vol";
pub const OUT_PER_DAY_NDX_VOL_WT: &str = "out_per_day_ndx_vol_wt";
pub const IN_PER_DAY_DOCS: &str = "in_per_day_docs";
pub const IN_PER_DAY_NON_DOCS: &str = "in_per_day_non_docs";
pub const IN_PER_DAY_AIR: &str = "in_per_day_air";
pub const IN_PER_DAY_SURFACE: &str = "in_per_day_surface";
pub const IN_PER_DAY_NDX_OUT_VOL: &str = "in_per_day_ndx_out_vol";
pub const IN_PER_DAY_NDX_VOL_WT: &str = "in_per_day_ndx_vol_wt";
pub const PER_DAY_NDX: &str = "per_day_ndx";
pub const PER_DAY_DOX: &str = "per_day_dox";
pub const PER_DAY_PACKET: &str = "per_day_packet";
pub const PER_DAY_BAG_DOC: &str = "per_day_bag_doc";
pub const PER_DAY_BAG_NON_DOC: &str = "per_day_bag_non_doc";
pub const PER_DAY_AIR: &str = "per_day_air";

// ── Workload units ────────────────────────────────────────────

pub const CD_UNIT: &str = "cd_unit";
pub const WITH_SORTER_SORTER_UNIT: &str = "with_sorter_sorter_unit";
pub const WITH_SORTER_NON_CONY: &str = "with_sorter_non_cony";
pub const MANUAL_SORTING_UNITS: &str = "manual_sorting_units";
pub const XRAY_UNIT: &str = "xray_unit";
pub const AIR_UNIT: &str = "air_unit";
pub const SURFACE_UNIT: &str = "surface_unit";
pub const DOC_UNIT: &str = "doc_unit";
pub const EXCEPTION_HAN_UNIT: &str = "exception_han_unit";
pub const SKIDDER_UNIT: &str = "skidder_unit";
pub const TOTAL: &str = "total";

// ── Manpower in units ─────────────────────────────────────────

pub const MANPOWER_IN_UNITS_CD_UNIT: &str = "manpower_in_units_cd_unit";
pub const MANPOWER_IN_UNITS_WITH_SORTER_SORTER_UNIT: &str =
    "manpower_in_units_with_sorter_sorter_unit";
pub const MANPOWER_IN_UNITS_WITH_SORTER_NON_CONY: &str =
    "manpower_in_units_with_sorter_non_cony";
pub const MANPOWER_IN_UNITS_WITH_NO_SORTER_MANUAL_SORTING_UNITS: &str =
    "manpower_in_units_with_no_sorter_manual_sorting_units";
pub const MANPOWER_IN_UNITS_SKIDDER_UNIT: &str = "manpower_in_units_skidder_unit";
pub const MANPOWER_IN_UNITS_XRAY_UNIT: &str = "manpower_in_units_xray_unit";
pub const MANPOWER_IN_UNITS_AIR_UNIT: &str = "manpower_in_units_air_unit";
pub const MANPOWER_IN_UNITS_SURFACE_UNIT: &str = "manpower_in_units_surface_unit";
pub const MANPOWER_IN_UNITS_DOC_UNIT: &str = "manpower_in_units_doc_unit";
pub const MANPOWER_IN_UNITS_EXCEPTION_HAN_UNIT: &str = "manpower_in_units_exception_han_unit";

// ── Staffing totals ───────────────────────────────────────────

pub const MANPOWER_WITH_SORTER: &str = "manpower_with_sorter";
pub const MANPOWER_WITHOUT_SORTER: &str = "manpower_without_sorter";

/// Correlated base inputs. Editing one without the other is suspicious
/// but never rejected.
pub const CORRELATED_PAIRS: [(&str, &str); 2] = [
    (IN_NDX_OUT_VOL, IN_NDX_VOL_WT),
    (OUT_NDX_OUT_VOL, OUT_NDX_VOL_WT),
];

pub fn is_base_input(field: &str) -> bool {
    BASE_INPUT_FIELDS.contains(&field)
}
