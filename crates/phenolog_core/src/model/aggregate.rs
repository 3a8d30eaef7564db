//! Derived per-field aggregate model.
//!
//! Aggregates are recomputed on every read and never persisted.

use crate::model::observation::ObservationRecord;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// How `current_value` was derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueType {
    /// Exactly one non-null value exists.
    Single,
    /// Rounded arithmetic mean of all-numeric values.
    Mean,
    /// Most frequent value of mixed or categorical values.
    Mode,
    /// No non-null value; current value is the latest (null) record.
    Latest,
}

/// Inclusive bounds of numeric-coerced values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NumericRange {
    pub min: f64,
    pub max: f64,
}

/// Representative value and history of one trait field for one plant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedField {
    pub field: String,
    pub current_value: Value,
    pub value_type: ValueType,
    /// All records, newest first, null-valued ones included.
    pub observations: Vec<ObservationRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<NumericRange>,
    /// Stringified value -> occurrence count. Mode aggregates only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_count: Option<BTreeMap<String, usize>>,
    pub has_conflicts: bool,
}

impl AggregatedField {
    /// Latest record regardless of value, if any.
    pub fn latest_observation(&self) -> Option<&ObservationRecord> {
        self.observations.first()
    }

    pub fn observation_count(&self) -> usize {
        self.observations.len()
    }
}
