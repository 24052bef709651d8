//! Staffing requirements for logistics hubs.
//!
//! A base record of monthly volumes per hub/shift is evaluated against a
//! fixed, ordered registry of formulas. The result carries every workload
//! intermediate plus two staffing totals: with and without a sorting
//! machine. Fields that cannot be computed are marked failed (NaN), never
//! zero, and the rest of the record is still produced.

pub mod config;
pub mod engine;
pub mod error;
pub mod expr;
pub mod failure;
pub mod fields;
pub mod import;
pub mod lock;
pub mod math;
pub mod plan;
pub mod record;
pub mod registry;
pub mod source;
pub mod store;
pub mod synthetic;
pub mod types;

pub use engine::{compute_derived, EvaluationReport, Evaluator, FieldFailure};
pub use error::{PlanError, PlanResult};
pub use lock::{LockSet, Overrides};
pub use record::{FieldValue, Record};
pub use registry::{FormulaEntry, FormulaRegistry};
