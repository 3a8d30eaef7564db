//! Plant observation summary use-cases.
//!
//! # Responsibility
//! - Run collect -> aggregate -> group for one plant against a schema.
//! - Serve single-field detail views with full history.
//!
//! # Invariants
//! - Results are recomputed on every call; nothing is cached or persisted.
//! - Unknown fields yield a well-formed empty aggregate, never an error.

use crate::engine::aggregate::{aggregate_all, aggregate_field};
use crate::engine::collect::collect_observations;
use crate::engine::group::{group_by_schema, GroupedArea};
use crate::model::aggregate::AggregatedField;
use crate::model::observation::{PlantId, PlantRecord};
use crate::model::schema::TraitSchema;
use log::info;
use serde::Serialize;
use std::collections::BTreeMap;

/// Display-ready observation summary of one plant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlantSummary {
    pub plant_id: PlantId,
    pub areas: Vec<GroupedArea>,
    /// Number of observed fields across all areas.
    pub field_count: usize,
    /// Number of observed fields with conflicting values.
    pub conflict_count: usize,
}

/// Aggregates every observed field of one plant.
pub fn aggregate_plant(plant: &PlantRecord) -> BTreeMap<String, AggregatedField> {
    aggregate_all(&collect_observations(plant))
}

/// Builds the grouped summary for one plant.
pub fn summarize_plant(plant: &PlantRecord, schema: &TraitSchema) -> PlantSummary {
    let aggregated = aggregate_plant(plant);
    let field_count = aggregated.len();
    let conflict_count = aggregated
        .values()
        .filter(|aggregate| aggregate.has_conflicts)
        .count();
    let observation_count: usize = aggregated
        .values()
        .map(AggregatedField::observation_count)
        .sum();
    let areas = group_by_schema(aggregated, schema);

    info!(
        "event=plant_summary module=service status=ok plant_id={} areas={} fields={} observations={} conflicts={}",
        plant.id,
        areas.len(),
        field_count,
        observation_count,
        conflict_count
    );

    PlantSummary {
        plant_id: plant.id,
        areas,
        field_count,
        conflict_count,
    }
}

/// Full aggregate and history of one field.
pub fn field_detail(plant: &PlantRecord, field: &str) -> AggregatedField {
    let collected = collect_observations(plant);
    let records = collected.get(field).map(Vec::as_slice).unwrap_or_default();
    aggregate_field(field, records)
}
