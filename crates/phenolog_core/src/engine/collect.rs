//! Per-field observation collection from a plant entity.
//!
//! # Invariants
//! - Individual observations are always included verbatim.
//! - Every cycle entry becomes one record dated at the cycle start.
//! - Static values are a fallback only: a field that received any individual
//!   or cycle record gets no registration record.
//! - Null static values are skipped.
//! - Output is a pure function of the plant record.

use crate::model::observation::{
    CycleRecord, ObservationRecord, ObservationSource, PlantRecord,
};
use log::debug;
use serde_json::Value;
use std::collections::BTreeMap;

/// Note attached to records synthesized from static registration values.
pub const REGISTRATION_NOTE: &str = "Registered/Base value.";
/// Date used for registration records when acquisition date is unknown.
pub const EPOCH_SENTINEL_MS: i64 = 0;

/// Field -> records in collection order.
pub type CollectedObservations = BTreeMap<String, Vec<ObservationRecord>>;

/// Gathers every record for every field of one plant.
pub fn collect_observations(plant: &PlantRecord) -> CollectedObservations {
    let mut collected = CollectedObservations::new();

    for record in &plant.observations {
        collected
            .entry(record.field.clone())
            .or_default()
            .push(record.clone());
    }

    for cycle in &plant.cycles {
        for (field, value) in &cycle.values {
            collected
                .entry(field.clone())
                .or_default()
                .push(cycle_record(cycle, field, value));
        }
    }

    let registered_at = plant.acquisition_date.unwrap_or(EPOCH_SENTINEL_MS);
    let mut registration_fallbacks = 0usize;
    for (field, value) in &plant.static_values {
        if value.is_null() || collected.contains_key(field) {
            continue;
        }
        collected.insert(
            field.clone(),
            vec![registration_record(field, value, registered_at)],
        );
        registration_fallbacks += 1;
    }

    debug!(
        "event=observations_collected module=engine plant_id={} fields={} individual={} cycles={} registration_fallbacks={}",
        plant.id,
        collected.len(),
        plant.observations.len(),
        plant.cycles.len(),
        registration_fallbacks
    );

    collected
}

fn cycle_record(cycle: &CycleRecord, field: &str, value: &Value) -> ObservationRecord {
    ObservationRecord {
        field: field.to_string(),
        value: value.clone(),
        observation_date: cycle.start_date,
        notes: Some(cycle.name.clone()),
        photos: Vec::new(),
        observer: None,
        conditions: None,
        exclude_from_automatic_cycle: false,
        source: ObservationSource::Cycle,
    }
}

fn registration_record(field: &str, value: &Value, registered_at: i64) -> ObservationRecord {
    ObservationRecord {
        field: field.to_string(),
        value: value.clone(),
        observation_date: registered_at,
        notes: Some(REGISTRATION_NOTE.to_string()),
        photos: Vec::new(),
        observer: None,
        conditions: None,
        exclude_from_automatic_cycle: true,
        source: ObservationSource::Baseline,
    }
}
