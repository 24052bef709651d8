//! Record sources: where base records come from.
//!
//! The engine never talks to a source. Callers fetch a base record, hand
//! it to the evaluator, and read the result.

use crate::{
    error::{PlanError, PlanResult},
    record::Record,
    types::{HubCode, ShiftSlot},
};
use std::collections::BTreeSet;

/// One base record as delivered for a (hub, shift) identity.
#[derive(Debug, Clone, PartialEq)]
pub struct BaseRow {
    pub hub: HubCode,
    pub shift: ShiftSlot,
    pub record: Record,
}

/// Supplies one base record per (hub, shift).
pub trait RecordSource: Send {
    /// All hub codes, sorted ascending.
    fn hubs(&self) -> PlanResult<Vec<HubCode>>;

    /// Shift slots of `hub`, sorted ascending. Empty for an unknown hub.
    fn shifts(&self, hub: &str) -> PlanResult<Vec<ShiftSlot>>;

    /// The base record for (hub, shift). When several rows share the
    /// identity, the first one delivered wins.
    fn base_record(&self, hub: &str, shift: &str) -> PlanResult<Option<Record>>;

    /// The first record delivered for `hub`, whatever its shift. `None`
    /// for an unknown hub.
    fn first_record(&self, hub: &str) -> PlanResult<Option<Record>>;

    fn require_record(&self, hub: &str, shift: &str) -> PlanResult<Record> {
        self.base_record(hub, shift)?.ok_or_else(|| PlanError::RecordNotFound {
            hub: hub.to_string(),
            shift: shift.to_string(),
        })
    }
}

/// Rows held in memory, in delivery order. Used for tests and synthetic data.
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    rows: Vec<BaseRow>,
}

impl InMemorySource {
    pub fn new(rows: Vec<BaseRow>) -> Self {
        Self { rows }
    }

    pub fn push(&mut self, row: BaseRow) {
        self.rows.push(row);
    }

    pub fn rows(&self) -> &[BaseRow] {
        &self.rows
    }
}

impl RecordSource for InMemorySource {
    fn hubs(&self) -> PlanResult<Vec<HubCode>> {
        let hubs: BTreeSet<&str> = self.rows.iter().map(|r| r.hub.as_str()).collect();
        Ok(hubs.into_iter().map(str::to_string).collect())
    }

    fn shifts(&self, hub: &str) -> PlanResult<Vec<ShiftSlot>> {
        let shifts: BTreeSet<&str> = self
            .rows
            .iter()
            .filter(|r| r.hub == hub)
            .map(|r| r.shift.as_str())
            .collect();
        Ok(shifts.into_iter().map(str::to_string).collect())
    }

    fn base_record(&self, hub: &str, shift: &str) -> PlanResult<Option<Record>> {
        Ok(self
            .rows
            .iter()
            .find(|r| r.hub == hub && r.shift == shift)
            .map(|r| r.record.clone()))
    }

    fn first_record(&self, hub: &str) -> PlanResult<Option<Record>> {
        Ok(self
            .rows
            .iter()
            .find(|r| r.hub == hub)
            .map(|r| r.record.clone()))
    }
}
