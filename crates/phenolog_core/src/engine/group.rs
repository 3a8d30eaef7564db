//! Re-projection of aggregated fields onto the schema hierarchy.
//!
//! # Invariants
//! - Every aggregated field appears exactly once in the output.
//! - Fields unknown to the schema land in a trailing "Other Observations"
//!   area with title-cased labels.
//! - Areas with no observed traits are omitted.

use crate::model::aggregate::AggregatedField;
use crate::model::schema::{title_case_field, TraitSchema};
use serde::Serialize;
use std::collections::BTreeMap;

/// Display name of the catch-all area for unmapped fields.
pub const OTHER_AREA_NAME: &str = "Other Observations";

/// One aggregated field decorated with its display label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabeledField {
    pub label: String,
    /// Owning schema group; `None` in the catch-all area.
    pub group: Option<String>,
    pub aggregate: AggregatedField,
}

/// Observed traits of one area, in schema order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupedArea {
    pub area: String,
    pub is_custom: bool,
    pub traits: Vec<LabeledField>,
    pub observed_count: usize,
}

/// Buckets aggregates by schema area; consumes the aggregate map.
pub fn group_by_schema(
    aggregated: BTreeMap<String, AggregatedField>,
    schema: &TraitSchema,
) -> Vec<GroupedArea> {
    let mut unassigned = aggregated;
    let mut grouped = Vec::new();

    for area in &schema.areas {
        let mut traits = Vec::new();
        for group in &area.groups {
            for definition in &group.traits {
                // Removal doubles as the "assigned" mark for repeated fields.
                if let Some(aggregate) = unassigned.remove(&definition.field) {
                    traits.push(LabeledField {
                        label: definition.label.clone(),
                        group: Some(group.name.clone()),
                        aggregate,
                    });
                }
            }
        }
        push_area(&mut grouped, area.name.clone(), area.is_custom, traits);
    }

    let other = unassigned
        .into_iter()
        .map(|(field, aggregate)| LabeledField {
            label: title_case_field(&field),
            group: None,
            aggregate,
        })
        .collect();
    push_area(&mut grouped, OTHER_AREA_NAME.to_string(), false, other);

    grouped
}

fn push_area(
    grouped: &mut Vec<GroupedArea>,
    area: String,
    is_custom: bool,
    traits: Vec<LabeledField>,
) {
    if traits.is_empty() {
        return;
    }
    grouped.push(GroupedArea {
        area,
        is_custom,
        observed_count: traits.len(),
        traits,
    });
}
