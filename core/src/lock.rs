//! Locked keys and operator overrides.
//!
//! Locking key k makes the engine skip k's formula for ONE evaluation;
//! everything downstream of k sees the supplied value as if computed.
//! Locks never alter the registry.

use crate::record::Record;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LockSet {
    keys: BTreeSet<String>,
}

impl LockSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>) -> bool {
        self.keys.insert(key.into())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for LockSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self { keys: iter.into_iter().map(Into::into).collect() }
    }
}

/// Authoritative values for normally-derived fields, e.g. a forecast an
/// operator wants to substitute for the historical figure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Overrides {
    values: BTreeMap<String, f64>,
}

impl Overrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: f64) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: impl Into<String>, value: f64) {
        self.values.insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.values.get(key).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Write every value into `record` without locking anything.
    pub fn seed(&self, record: &mut Record) {
        for (key, value) in &self.values {
            record.set(key.clone(), *value);
        }
    }

    /// Write every override into `record` and return the keys to lock.
    pub fn apply(&self, record: &mut Record) -> LockSet {
        self.seed(record);
        self.values.keys().cloned().collect()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }
}

/// An edit to one half of a correlated pair without the other.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CorrelationWarning {
    pub edited: String,
    pub partner: String,
}

/// Pairs where exactly one member appears in `edited`. Advisory only:
/// nothing in the engine enforces correlation.
pub fn correlation_warnings(
    pairs: &[(String, String)],
    edited: &[&str],
) -> Vec<CorrelationWarning> {
    let mut warnings = Vec::new();
    for (a, b) in pairs {
        let edited_a = edited.contains(&a.as_str());
        let edited_b = edited.contains(&b.as_str());
        let (changed, partner) = match (edited_a, edited_b) {
            (true, false) => (a, b),
            (false, true) => (b, a),
            _ => continue,
        };
        log::warn!("'{changed}' edited without its correlated field '{partner}'");
        warnings.push(CorrelationWarning {
            edited: changed.clone(),
            partner: partner.clone(),
        });
    }
    warnings
}
