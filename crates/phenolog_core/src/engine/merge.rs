//! Baseline + overlay schema merge.
//!
//! # Invariants
//! - Baseline ordering is preserved.
//! - Overlay items land after baseline siblings: traits at the end of their
//!   group, groups at the end of their area, areas at the end of the schema.
//! - Only injected items are tagged `is_custom`.
//! - No uniqueness validation happens here.

use crate::model::overlay::CustomOverlayStore;
use crate::model::schema::{TraitArea, TraitDefinition, TraitGroup, TraitSchema};
use log::warn;

/// Merges the overlay into the baseline, returning a new schema.
pub fn merge_schema(baseline: &TraitSchema, overlay: &CustomOverlayStore) -> TraitSchema {
    let mut areas = Vec::with_capacity(baseline.areas.len() + overlay.custom_areas.len());

    for area in &baseline.areas {
        let traits_by_group = overlay.custom_traits.get(&area.name);
        let mut groups: Vec<TraitGroup> = area
            .groups
            .iter()
            .map(|group| {
                let mut traits = group.traits.clone();
                if let Some(extra) = traits_by_group.and_then(|by_group| by_group.get(&group.name))
                {
                    traits.extend(extra.iter().cloned().map(tag_trait));
                }
                TraitGroup {
                    name: group.name.clone(),
                    traits,
                    is_custom: group.is_custom,
                }
            })
            .collect();

        if let Some(extra_groups) = overlay.custom_groups.get(&area.name) {
            groups.extend(extra_groups.iter().cloned().map(tag_group));
        }

        areas.push(TraitArea {
            name: area.name.clone(),
            groups,
            is_custom: area.is_custom,
        });
    }

    areas.extend(overlay.custom_areas.iter().cloned().map(tag_area));

    let orphaned = orphaned_overlay_targets(baseline, overlay);
    if !orphaned.is_empty() {
        warn!(
            "event=schema_merge module=engine status=partial orphaned_targets={} targets={}",
            orphaned.len(),
            orphaned.join("|")
        );
    }

    TraitSchema { areas }
}

/// Lists overlay attachment targets missing from the baseline.
///
/// Entries under these targets are skipped by [`merge_schema`].
pub fn orphaned_overlay_targets(
    baseline: &TraitSchema,
    overlay: &CustomOverlayStore,
) -> Vec<String> {
    let mut orphaned = Vec::new();
    for (area_name, by_group) in &overlay.custom_traits {
        let area = baseline.area(area_name);
        for group_name in by_group.keys() {
            if area.and_then(|area| area.group(group_name)).is_none() {
                orphaned.push(format!("{area_name}/{group_name}"));
            }
        }
    }
    for area_name in overlay.custom_groups.keys() {
        if baseline.area(area_name).is_none() {
            orphaned.push(area_name.clone());
        }
    }
    orphaned
}

fn tag_trait(mut definition: TraitDefinition) -> TraitDefinition {
    definition.is_custom = true;
    definition
}

fn tag_group(mut group: TraitGroup) -> TraitGroup {
    group.is_custom = true;
    group.traits = group.traits.into_iter().map(tag_trait).collect();
    group
}

fn tag_area(mut area: TraitArea) -> TraitArea {
    area.is_custom = true;
    area.groups = area.groups.into_iter().map(tag_group).collect();
    area
}
