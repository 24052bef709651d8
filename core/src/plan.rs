//! Hub staffing plans: the consumer side of the engine.
//!
//! For a hub, the first delivered row is evaluated unlocked to obtain a baseline
//! daily forecast (per_day_ndx, per_day_dox). Every shift is then evaluated
//! with that forecast (or the caller's) locked in, and both staffing totals
//! are reported side by side. The `sorter` input does not pick one.

use crate::{
    engine::{EvaluationReport, Evaluator},
    error::{PlanError, PlanResult},
    fields::{MANPOWER_WITHOUT_SORTER, MANPOWER_WITH_SORTER, PER_DAY_DOX, PER_DAY_NDX},
    lock::{LockSet, Overrides},
    record::Record,
    source::RecordSource,
    types::{HubCode, ShiftSlot},
};
use serde::{Deserialize, Serialize};

/// Daily shipment forecast substituted for the historical figures.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    pub per_day_ndx: f64,
    pub per_day_dox: f64,
}

impl Forecast {
    pub fn overrides(&self) -> Overrides {
        Overrides::new()
            .with(PER_DAY_NDX, self.per_day_ndx)
            .with(PER_DAY_DOX, self.per_day_dox)
    }
}

#[derive(Debug, Clone, Default)]
pub struct PlanOptions {
    /// Locked into every shift. Defaults to the hub's baseline.
    pub forecast: Option<Forecast>,
    /// What-if edits to base inputs, applied to every shift before evaluation.
    pub base_edits: Overrides,
}

#[derive(Debug, Clone, Serialize)]
pub struct ShiftStaffing {
    pub shift: ShiftSlot,
    /// `None` when the total could not be computed.
    pub with_sorter: Option<f64>,
    pub without_sorter: Option<f64>,
    pub record: Record,
    pub report: EvaluationReport,
}

#[derive(Debug, Clone, Serialize)]
pub struct HubPlan {
    pub hub: HubCode,
    /// Forecast derived from the hub's first delivered row.
    pub baseline: Forecast,
    /// Forecast actually locked into every shift.
    pub forecast: Forecast,
    pub shifts: Vec<ShiftStaffing>,
}

/// Evaluate the first delivered row of `hub` without locks and read its
/// forecast. Unavailable values stay NaN.
pub fn baseline_forecast(
    source: &dyn RecordSource,
    evaluator: &Evaluator,
    hub: &str,
    base_edits: &Overrides,
) -> PlanResult<Forecast> {
    let mut record = source
        .first_record(hub)?
        .ok_or_else(|| PlanError::HubNotFound { hub: hub.to_string() })?;
    base_edits.seed(&mut record);
    evaluator.evaluate(&mut record, &LockSet::new());
    Ok(Forecast {
        per_day_ndx: record.number(PER_DAY_NDX),
        per_day_dox: record.number(PER_DAY_DOX),
    })
}

pub fn plan_hub(
    source: &dyn RecordSource,
    evaluator: &Evaluator,
    hub: &str,
    options: &PlanOptions,
) -> PlanResult<HubPlan> {
    let baseline = baseline_forecast(source, evaluator, hub, &options.base_edits)?;
    let forecast = options.forecast.unwrap_or(baseline);
    let overrides = forecast.overrides();

    let mut shifts = Vec::new();
    for shift in source.shifts(hub)? {
        let mut record = source.require_record(hub, &shift)?;
        options.base_edits.seed(&mut record);
        let report = evaluator.evaluate_with(&mut record, &overrides);
        shifts.push(ShiftStaffing {
            with_sorter: record.available(MANPOWER_WITH_SORTER),
            without_sorter: record.available(MANPOWER_WITHOUT_SORTER),
            shift,
            record,
            report,
        });
    }

    log::info!(
        "Planned hub {hub}: {} shifts (per_day_ndx={}, per_day_dox={})",
        shifts.len(),
        forecast.per_day_ndx,
        forecast.per_day_dox
    );
    Ok(HubPlan {
        hub: hub.to_string(),
        baseline,
        forecast,
        shifts,
    })
}
