use phenolog_core::{
    merge_schema, summarize_plant, CustomOverlayStore, GroupLocation, ObservationRecord,
    OverlayEditError, PlantRecord, TraitArea, TraitDefinition, TraitDraft, TraitGroup,
    TraitLocation, TraitSchema, ValueKind, OTHER_AREA_NAME,
};
use serde_json::json;

const NOW: i64 = 1_760_000_000_000;

fn baseline() -> TraitSchema {
    TraitSchema::new(vec![TraitArea::new(
        "Flowering",
        vec![TraitGroup::new(
            "Blooms",
            vec![TraitDefinition::baseline(
                "flower_color",
                "Flower Color",
                ValueKind::Text,
            )],
        )],
    )])
}

fn in_blooms() -> TraitLocation {
    TraitLocation::BaselineGroup {
        area: "Flowering".to_string(),
        group: "Blooms".to_string(),
    }
}

#[test]
fn with_trait_stamps_metadata_and_returns_new_snapshot() {
    let base = baseline();
    let empty = CustomOverlayStore::default();

    let (next, created) = empty
        .with_trait(&base, &in_blooms(), &TraitDraft::new("Bud Count", ValueKind::Number), NOW)
        .unwrap();

    assert!(empty.is_empty(), "previous snapshot must stay untouched");
    assert_eq!(created.field, "custom_bud_count");
    assert_eq!(created.label, "Bud Count");
    assert!(created.is_custom);
    assert_eq!(created.created_at, Some(NOW));
    assert_eq!(created.updated_at, Some(NOW));
    assert_eq!(
        next.custom_traits["Flowering"]["Blooms"],
        vec![created.clone()]
    );

    let merged = merge_schema(&base, &next);
    let blooms = &merged.areas[0].groups[0];
    assert_eq!(blooms.traits.last().unwrap().field, "custom_bud_count");
    assert!(!blooms.traits[0].is_custom);
}

#[test]
fn repeated_labels_get_suffixed_fields() {
    let base = baseline();
    let draft = TraitDraft::new("Bud Count", ValueKind::Number);

    let (first, _) = CustomOverlayStore::default()
        .with_trait(&base, &in_blooms(), &draft, NOW)
        .unwrap();
    let (second, created) = first.with_trait(&base, &in_blooms(), &draft, NOW).unwrap();

    assert_eq!(created.field, "custom_bud_count_1");
    assert_eq!(second.definitions().count(), 2);
}

#[test]
fn locations_are_dispatched_explicitly() {
    let base = baseline();
    let overlay = CustomOverlayStore::default()
        .with_group(
            &base,
            &GroupLocation::BaselineArea {
                area: "Flowering".to_string(),
            },
            "Scent",
        )
        .unwrap()
        .with_area(&base, "Propagation")
        .unwrap()
        .with_group(
            &base,
            &GroupLocation::CustomArea {
                area: "Propagation".to_string(),
            },
            "Cuttings",
        )
        .unwrap();

    let draft = TraitDraft::new("Scent Strength", ValueKind::Rating);
    let (overlay, scent) = overlay
        .with_trait(
            &base,
            &TraitLocation::CustomGroup {
                area: "Flowering".to_string(),
                group: "Scent".to_string(),
            },
            &draft,
            NOW,
        )
        .unwrap();
    let (overlay, rooting) = overlay
        .with_trait(
            &base,
            &TraitLocation::CustomArea {
                area: "Propagation".to_string(),
                group: "Cuttings".to_string(),
            },
            &TraitDraft::new("Rooting Days", ValueKind::Number),
            NOW,
        )
        .unwrap();

    assert_eq!(overlay.custom_groups["Flowering"][0].traits, vec![scent]);
    assert_eq!(overlay.custom_areas[0].groups[0].traits, vec![rooting]);
    assert!(overlay.custom_traits.is_empty());

    let wrong_kind = overlay
        .with_trait(
            &base,
            &TraitLocation::BaselineGroup {
                area: "Flowering".to_string(),
                group: "Scent".to_string(),
            },
            &draft,
            NOW,
        )
        .unwrap_err();
    assert_eq!(
        wrong_kind,
        OverlayEditError::GroupNotFound {
            area: "Flowering".to_string(),
            group: "Scent".to_string(),
        }
    );
}

#[test]
fn catch_all_area_name_is_reserved() {
    let base = baseline();
    let overlay = CustomOverlayStore::default();

    assert_eq!(
        overlay.with_area(&base, " Other Observations ").unwrap_err(),
        OverlayEditError::DuplicateArea(OTHER_AREA_NAME.to_string())
    );

    let overlay = overlay.with_area(&base, "Propagation").unwrap();
    let overlay = overlay
        .with_group(
            &base,
            &GroupLocation::CustomArea {
                area: "Propagation".to_string(),
            },
            "Cuttings",
        )
        .unwrap();
    let (overlay, rooting) = overlay
        .with_trait(
            &base,
            &TraitLocation::CustomArea {
                area: "Propagation".to_string(),
                group: "Cuttings".to_string(),
            },
            &TraitDraft::new("Rooting Days", ValueKind::Number),
            NOW,
        )
        .unwrap();

    let mut plant = PlantRecord::new("Fig");
    plant.observations.extend([
        ObservationRecord::new(rooting.field.clone(), json!(21), NOW),
        ObservationRecord::new("deleted_thing", json!("x"), NOW),
    ]);
    let summary = summarize_plant(&plant, &merge_schema(&base, &overlay));

    let areas: Vec<(&str, bool)> = summary
        .areas
        .iter()
        .map(|area| (area.area.as_str(), area.is_custom))
        .collect();
    assert_eq!(
        areas,
        vec![("Propagation", true), (OTHER_AREA_NAME, false)]
    );
}

#[test]
fn duplicate_names_are_rejected() {
    let base = baseline();
    let overlay = CustomOverlayStore::default();

    assert_eq!(
        overlay.with_area(&base, " Flowering ").unwrap_err(),
        OverlayEditError::DuplicateArea("Flowering".to_string())
    );
    assert_eq!(
        overlay
            .with_group(
                &base,
                &GroupLocation::BaselineArea {
                    area: "Flowering".to_string()
                },
                "Blooms"
            )
            .unwrap_err(),
        OverlayEditError::DuplicateGroup {
            area: "Flowering".to_string(),
            group: "Blooms".to_string(),
        }
    );
    assert_eq!(
        overlay.with_area(&base, "   ").unwrap_err(),
        OverlayEditError::BlankName
    );
    assert_eq!(
        overlay
            .with_group(
                &base,
                &GroupLocation::BaselineArea {
                    area: "Roots".to_string()
                },
                "Depth"
            )
            .unwrap_err(),
        OverlayEditError::AreaNotFound("Roots".to_string())
    );
}

#[test]
fn with_definition_rejects_field_collisions() {
    let base = baseline();
    let mut clash = TraitDefinition::baseline("flower_color", "Flower Colour", ValueKind::Text);
    clash.created_at = Some(NOW);

    let err = CustomOverlayStore::default()
        .with_definition(&base, &in_blooms(), clash)
        .unwrap_err();
    assert_eq!(err, OverlayEditError::DuplicateField("flower_color".to_string()));
}

#[test]
fn update_keeps_field_and_created_at() {
    let base = baseline();
    let (overlay, created) = CustomOverlayStore::default()
        .with_trait(&base, &in_blooms(), &TraitDraft::new("Bud Count", ValueKind::Number), NOW)
        .unwrap();

    let draft = TraitDraft::new("Bud Stage", ValueKind::Select).with_options(["Tight", "Open"]);
    let (updated_overlay, updated) = overlay
        .with_trait_updated(&created.field, &draft, NOW + 5_000)
        .unwrap();

    assert_eq!(updated.field, "custom_bud_count");
    assert_eq!(updated.label, "Bud Stage");
    assert_eq!(updated.kind, ValueKind::Select);
    assert_eq!(updated.created_at, Some(NOW));
    assert_eq!(updated.updated_at, Some(NOW + 5_000));
    assert_eq!(overlay.find_definition("custom_bud_count"), Some(&created));
    assert_eq!(
        updated_overlay.find_definition("custom_bud_count"),
        Some(&updated)
    );

    assert_eq!(
        overlay
            .with_trait_updated("flower_color", &draft, NOW)
            .unwrap_err(),
        OverlayEditError::TraitNotFound("flower_color".to_string())
    );
}

#[test]
fn deletions_remove_entries_and_prune_empty_maps() {
    let base = baseline();
    let (overlay, created) = CustomOverlayStore::default()
        .with_trait(&base, &in_blooms(), &TraitDraft::new("Bud Count", ValueKind::Number), NOW)
        .unwrap();

    let without = overlay.without_trait(&created.field).unwrap();
    assert!(without.is_empty());
    assert_eq!(
        without.without_trait(&created.field).unwrap_err(),
        OverlayEditError::TraitNotFound(created.field.clone())
    );

    let with_area = without.with_area(&base, "Propagation").unwrap();
    assert!(with_area.without_area("Propagation").unwrap().is_empty());
    assert_eq!(
        with_area.without_area("Flowering").unwrap_err(),
        OverlayEditError::AreaNotFound("Flowering".to_string())
    );

    let location = GroupLocation::BaselineArea {
        area: "Flowering".to_string(),
    };
    let with_group = without.with_group(&base, &location, "Scent").unwrap();
    assert!(with_group.without_group(&location, "Scent").unwrap().is_empty());
}
