//! The record: one hub+shift scenario, base inputs plus derived fields.
//!
//! Owned by a single evaluation call. Never persisted once derived.

use crate::failure::{Failure, FailureKind, Fault};
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Number(f64),
    /// Non-numeric value delivered by the record source.
    Text(String),
    /// A derived field that could not be computed.
    Failed(Failure),
}

impl FieldValue {
    /// Numeric projection. Anything that is not a number reads as NaN.
    pub fn as_f64(&self) -> f64 {
        match self {
            FieldValue::Number(v) => *v,
            FieldValue::Text(_) | FieldValue::Failed(_) => f64::NAN,
        }
    }

    pub fn failure(&self) -> Option<&Failure> {
        match self {
            FieldValue::Failed(f) => Some(f),
            _ => None,
        }
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        FieldValue::Number(v)
    }
}

// Failed slots serialize as null, the same as NaN does in serde_json.
impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FieldValue::Number(v) => serializer.serialize_f64(*v),
            FieldValue::Text(s) => serializer.serialize_str(s),
            FieldValue::Failed(_) => serializer.serialize_none(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Record {
    fields: BTreeMap<String, FieldValue>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, field: impl Into<String>, value: impl Into<FieldValue>) {
        self.fields.insert(field.into(), value.into());
    }

    pub fn set_text(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(field.into(), FieldValue::Text(value.into()));
    }

    pub fn remove(&mut self, field: &str) -> Option<FieldValue> {
        self.fields.remove(field)
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Numeric value of `field`, NaN if absent, failed or non-numeric.
    /// Consumers must treat NaN as "unavailable", never as zero.
    pub fn number(&self, field: &str) -> f64 {
        self.fields.get(field).map_or(f64::NAN, FieldValue::as_f64)
    }

    /// `Some(value)` only for a present, non-NaN number.
    pub fn available(&self, field: &str) -> Option<f64> {
        Some(self.number(field)).filter(|v| !v.is_nan())
    }

    pub fn failure(&self, field: &str) -> Option<&Failure> {
        self.fields.get(field).and_then(FieldValue::failure)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Read a field as a formula operand.
    pub(crate) fn read(&self, field: &str) -> Result<f64, Fault> {
        match self.fields.get(field) {
            None => Err(Fault::Root(FailureKind::MissingDependency { field: field.into() })),
            Some(FieldValue::Number(v)) if v.is_nan() => {
                Err(Fault::Root(FailureKind::NotANumber { field: field.into() }))
            }
            Some(FieldValue::Number(v)) => Ok(*v),
            Some(FieldValue::Text(s)) => Err(Fault::Root(FailureKind::TypeMismatch {
                field: field.into(),
                found: s.clone(),
            })),
            Some(FieldValue::Failed(f)) => Err(Fault::Upstream(f.clone())),
        }
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        let mut record = Record::new();
        for (k, v) in iter {
            record.set(k, v);
        }
        record
    }
}
