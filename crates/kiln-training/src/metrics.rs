use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One metric value as reported by a training backend.
///
/// Backends report heterogeneous maps: losses and scores are numeric, while
/// entries such as class-name tables come through as text. Only numeric
/// values carry meaning for downstream consumers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    Int(i64),
    Float(f64),
    Text(String),
}

impl MetricValue {
    /// Numeric view of the value. Text entries have none.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(v) => Some(*v as f64),
            Self::Float(v) => Some(*v),
            Self::Text(_) => None,
        }
    }

    #[must_use]
    pub fn is_numeric(&self) -> bool {
        self.as_f64().is_some()
    }
}

impl From<f64> for MetricValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<i64> for MetricValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<&str> for MetricValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for MetricValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// The metrics a backend reports at one epoch boundary.
///
/// Keys are the backend's raw metric names; no renaming happens at this
/// layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpochSnapshot {
    /// Zero-based epoch index.
    pub epoch: u32,
    pub values: BTreeMap<String, MetricValue>,
}

impl EpochSnapshot {
    #[must_use]
    pub fn new(epoch: u32) -> Self {
        Self { epoch, values: BTreeMap::new() }
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<MetricValue>) {
        self.values.insert(key.into(), value.into());
    }

    /// Entries with a numeric value, in key order.
    pub fn numeric_entries(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().filter_map(|(key, value)| value.as_f64().map(|v| (key.as_str(), v)))
    }
}
