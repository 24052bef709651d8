//! Per-field evaluation failures.
//!
//! A failure is DATA, not an error: it is stored in the record slot of the
//! key that could not be computed and never escapes the engine. Any formula
//! reading a failed slot fails with the same (first encountered) reason, so
//! the origin of a chain of unavailable fields is always recoverable.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArithmeticFault {
    DivisionByZero,
    /// Result overflowed or left the real domain.
    NonFinite,
    /// `max` over an empty list.
    EmptyAggregate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FailureKind {
    /// A referenced field is absent from the record.
    MissingDependency { field: String },
    /// A referenced field holds a non-numeric value.
    TypeMismatch { field: String, found: String },
    /// A referenced field holds NaN (e.g. an empty source cell).
    NotANumber { field: String },
    Arithmetic { fault: ArithmeticFault },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Failure {
    /// The registry key whose formula failed first.
    pub origin: String,
    pub kind: FailureKind,
}

impl Failure {
    pub fn new(origin: impl Into<String>, kind: FailureKind) -> Self {
        Self {
            origin: origin.into(),
            kind,
        }
    }

    /// True when this failure was raised by `key` itself rather than
    /// inherited from an upstream field.
    pub fn is_root_for(&self, key: &str) -> bool {
        self.origin == key
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            FailureKind::MissingDependency { field } => {
                write!(f, "{}: missing field '{field}'", self.origin)
            }
            FailureKind::TypeMismatch { field, found } => {
                write!(f, "{}: field '{field}' is not numeric ({found:?})", self.origin)
            }
            FailureKind::NotANumber { field } => {
                write!(f, "{}: field '{field}' is NaN", self.origin)
            }
            FailureKind::Arithmetic { fault } => {
                write!(f, "{}: arithmetic failure ({fault:?})", self.origin)
            }
        }
    }
}

/// Outcome of evaluating one expression, before the engine attaches
/// the key being computed.
#[derive(Debug, Clone, PartialEq)]
pub enum Fault {
    /// The expression itself could not be evaluated.
    Root(FailureKind),
    /// The expression read a field that had already failed.
    Upstream(Failure),
}

impl Fault {
    pub fn arithmetic(fault: ArithmeticFault) -> Self {
        Fault::Root(FailureKind::Arithmetic { fault })
    }

    /// Resolve into a stored failure for `key`.
    pub fn into_failure(self, key: &str) -> Failure {
        match self {
            Fault::Root(kind) => Failure::new(key, kind),
            Fault::Upstream(failure) => failure,
        }
    }
}
