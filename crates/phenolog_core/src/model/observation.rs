//! Plant and observation record model.
//!
//! # Responsibility
//! - Define the plant entity consumed by observation collection.
//! - Keep observation values untyped (`serde_json::Value`) at rest.
//!
//! # Invariants
//! - Dates are Unix epoch milliseconds.
//! - `Value::Null` means "no value recorded", never an observed absence.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use uuid::Uuid;

/// Stable plant identifier.
pub type PlantId = Uuid;

/// Which input stream produced an observation record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObservationSource {
    /// Explicit single-field spot observation.
    Individual,
    /// Expanded from a dated cycle record.
    Cycle,
    /// Synthesized from static registration attributes.
    Baseline,
}

/// One timestamped value of one trait field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservationRecord {
    pub field: String,
    pub value: Value,
    pub observation_date: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub photos: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditions: Option<String>,
    #[serde(default)]
    pub exclude_from_automatic_cycle: bool,
    #[serde(default = "default_source")]
    pub source: ObservationSource,
}

fn default_source() -> ObservationSource {
    ObservationSource::Individual
}

impl ObservationRecord {
    /// Creates an individual spot observation with no annotations.
    pub fn new(field: impl Into<String>, value: Value, observation_date: i64) -> Self {
        Self {
            field: field.into(),
            value,
            observation_date,
            notes: None,
            photos: Vec::new(),
            observer: None,
            conditions: None,
            exclude_from_automatic_cycle: false,
            source: ObservationSource::Individual,
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn with_observer(mut self, observer: impl Into<String>) -> Self {
        self.observer = Some(observer.into());
        self
    }

    pub fn has_value(&self) -> bool {
        !self.value.is_null()
    }
}

/// Bulk dated record holding several trait values observed together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleRecord {
    pub name: String,
    pub start_date: i64,
    #[serde(default)]
    pub values: BTreeMap<String, Value>,
}

impl CycleRecord {
    pub fn new(name: impl Into<String>, start_date: i64) -> Self {
        Self {
            name: name.into(),
            start_date,
            values: BTreeMap::new(),
        }
    }

    pub fn with_value(mut self, field: impl Into<String>, value: Value) -> Self {
        self.values.insert(field.into(), value);
        self
    }
}

/// Plant entity as exposed to the aggregation pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlantRecord {
    pub id: PlantId,
    pub name: String,
    /// Unix epoch milliseconds; dates synthesized registration records.
    #[serde(default)]
    pub acquisition_date: Option<i64>,
    #[serde(default)]
    pub observations: Vec<ObservationRecord>,
    #[serde(default)]
    pub cycles: Vec<CycleRecord>,
    /// Registration-time trait values keyed by field.
    #[serde(default)]
    pub static_values: BTreeMap<String, Value>,
}

impl PlantRecord {
    /// Creates an empty plant with a generated stable ID.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            acquisition_date: None,
            observations: Vec::new(),
            cycles: Vec::new(),
            static_values: BTreeMap::new(),
        }
    }
}
