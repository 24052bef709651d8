//! Shared primitive types used across the planner.

/// A hub identifier as delivered by the record source (e.g. `"BLR-01"`).
pub type HubCode = String;

/// A shift slot label within a hub (e.g. `"06:00-14:00"`).
pub type ShiftSlot = String;

/// The name of a record field. Registry keys are `'static`; record
/// slots may also hold caller-supplied names.
pub type FieldName = &'static str;
