//! Immutable snapshot edits of the custom overlay document.
//!
//! # Responsibility
//! - Apply one authoring edit and return a brand-new document.
//! - Dispatch on explicit attachment location kinds.
//! - Enforce global field uniqueness at write time.
//!
//! # Invariants
//! - `&self` is never modified; callers keep prior snapshots intact.
//! - A returned document never holds two definitions with one `field`.

use crate::engine::field_name::generate_field_name;
use crate::engine::group::OTHER_AREA_NAME;
use crate::model::overlay::{
    CustomOverlayStore, GroupLocation, OverlayEditError, TraitDraft, TraitLocation,
};
use crate::model::schema::{TraitArea, TraitDefinition, TraitGroup, TraitSchema};
use std::collections::{BTreeSet, HashSet};

type EditResult<T> = Result<T, OverlayEditError>;

impl CustomOverlayStore {
    /// Adds a custom trait at `location`, returning the new document and the
    /// created definition.
    pub fn with_trait(
        &self,
        baseline: &TraitSchema,
        location: &TraitLocation,
        draft: &TraitDraft,
        now_ms: i64,
    ) -> EditResult<(Self, TraitDefinition)> {
        draft.validate()?;

        let field = generate_field_name(&draft.label, &self.known_fields(baseline));
        let definition = TraitDefinition {
            field,
            label: draft.label.trim().to_string(),
            kind: draft.kind,
            options: draft.options.clone(),
            timing: draft.timing.clone(),
            is_custom: true,
            created_at: Some(now_ms),
            updated_at: Some(now_ms),
        };

        let next = self.with_definition(baseline, location, definition.clone())?;
        Ok((next, definition))
    }

    /// Inserts a fully formed definition (e.g. restored from an export).
    ///
    /// Rejects the edit with [`OverlayEditError::DuplicateField`] when the
    /// field already exists in the baseline or overlay.
    pub fn with_definition(
        &self,
        baseline: &TraitSchema,
        location: &TraitLocation,
        mut definition: TraitDefinition,
    ) -> EditResult<Self> {
        definition.is_custom = true;
        let mut next = self.clone();

        match location {
            TraitLocation::BaselineGroup { area, group } => {
                let baseline_area = baseline
                    .area(area)
                    .ok_or_else(|| OverlayEditError::AreaNotFound(area.clone()))?;
                if baseline_area.group(group).is_none() {
                    return Err(group_not_found(area, group));
                }
                next.custom_traits
                    .entry(area.clone())
                    .or_default()
                    .entry(group.clone())
                    .or_default()
                    .push(definition);
            }
            TraitLocation::CustomGroup { area, group } => {
                let target = next
                    .custom_groups
                    .get_mut(area)
                    .and_then(|groups| groups.iter_mut().find(|g| &g.name == group))
                    .ok_or_else(|| group_not_found(area, group))?;
                target.traits.push(definition);
            }
            TraitLocation::CustomArea { area, group } => {
                let custom_area = next
                    .custom_areas
                    .iter_mut()
                    .find(|a| &a.name == area)
                    .ok_or_else(|| OverlayEditError::AreaNotFound(area.clone()))?;
                let target = custom_area
                    .groups
                    .iter_mut()
                    .find(|g| &g.name == group)
                    .ok_or_else(|| group_not_found(area, group))?;
                target.traits.push(definition);
            }
        }

        next.ensure_unique_fields(baseline)?;
        Ok(next)
    }

    /// Edits label, kind, options and timing of one custom trait.
    ///
    /// `field` and `created_at` are kept; `updated_at` becomes `now_ms`.
    pub fn with_trait_updated(
        &self,
        field: &str,
        draft: &TraitDraft,
        now_ms: i64,
    ) -> EditResult<(Self, TraitDefinition)> {
        draft.validate()?;
        let mut next = self.clone();
        let target = next
            .definitions_mut()
            .find(|definition| definition.field == field)
            .ok_or_else(|| OverlayEditError::TraitNotFound(field.to_string()))?;

        target.label = draft.label.trim().to_string();
        target.kind = draft.kind;
        target.options = draft.options.clone();
        target.timing = draft.timing.clone();
        target.updated_at = Some(now_ms);
        let updated = target.clone();

        Ok((next, updated))
    }

    /// Removes one custom trait wherever it is attached.
    pub fn without_trait(&self, field: &str) -> EditResult<Self> {
        let mut next = self.clone();
        let mut removed = false;

        for by_group in next.custom_traits.values_mut() {
            for traits in by_group.values_mut() {
                removed |= remove_field(traits, field);
            }
            by_group.retain(|_, traits| !traits.is_empty());
        }
        next.custom_traits.retain(|_, by_group| !by_group.is_empty());

        for group in next.custom_groups.values_mut().flatten() {
            removed |= remove_field(&mut group.traits, field);
        }
        for group in next
            .custom_areas
            .iter_mut()
            .flat_map(|area| area.groups.iter_mut())
        {
            removed |= remove_field(&mut group.traits, field);
        }

        if !removed {
            return Err(OverlayEditError::TraitNotFound(field.to_string()));
        }
        Ok(next)
    }

    /// Adds an empty custom group at `location`.
    pub fn with_group(
        &self,
        baseline: &TraitSchema,
        location: &GroupLocation,
        name: &str,
    ) -> EditResult<Self> {
        let name = normalize_name(name)?;
        let group = TraitGroup {
            name: name.clone(),
            traits: Vec::new(),
            is_custom: true,
        };
        let mut next = self.clone();

        match location {
            GroupLocation::BaselineArea { area } => {
                let baseline_area = baseline
                    .area(area)
                    .ok_or_else(|| OverlayEditError::AreaNotFound(area.clone()))?;
                let custom = next.custom_groups.entry(area.clone()).or_default();
                let taken = baseline_area.group(&name).is_some()
                    || custom.iter().any(|existing| existing.name == name);
                if taken {
                    return Err(OverlayEditError::DuplicateGroup {
                        area: area.clone(),
                        group: name,
                    });
                }
                custom.push(group);
            }
            GroupLocation::CustomArea { area } => {
                let custom_area = next
                    .custom_areas
                    .iter_mut()
                    .find(|a| &a.name == area)
                    .ok_or_else(|| OverlayEditError::AreaNotFound(area.clone()))?;
                if custom_area.group(&name).is_some() {
                    return Err(OverlayEditError::DuplicateGroup {
                        area: area.clone(),
                        group: name,
                    });
                }
                custom_area.groups.push(group);
            }
        }

        Ok(next)
    }

    /// Removes a custom group and every trait inside it.
    pub fn without_group(&self, location: &GroupLocation, name: &str) -> EditResult<Self> {
        let mut next = self.clone();

        match location {
            GroupLocation::BaselineArea { area } => {
                let groups = next
                    .custom_groups
                    .get_mut(area)
                    .ok_or_else(|| group_not_found(area, name))?;
                let before = groups.len();
                groups.retain(|group| group.name != name);
                if groups.len() == before {
                    return Err(group_not_found(area, name));
                }
                if groups.is_empty() {
                    next.custom_groups.remove(area);
                }
            }
            GroupLocation::CustomArea { area } => {
                let custom_area = next
                    .custom_areas
                    .iter_mut()
                    .find(|a| &a.name == area)
                    .ok_or_else(|| OverlayEditError::AreaNotFound(area.clone()))?;
                let before = custom_area.groups.len();
                custom_area.groups.retain(|group| group.name != name);
                if custom_area.groups.len() == before {
                    return Err(group_not_found(area, name));
                }
            }
        }

        Ok(next)
    }

    /// Appends an empty custom area.
    ///
    /// The catch-all area name is reserved and reported as a duplicate.
    pub fn with_area(&self, baseline: &TraitSchema, name: &str) -> EditResult<Self> {
        let name = normalize_name(name)?;
        let taken = name == OTHER_AREA_NAME
            || baseline.area(&name).is_some()
            || self.custom_area(&name).is_some();
        if taken {
            return Err(OverlayEditError::DuplicateArea(name));
        }
        let mut next = self.clone();
        next.custom_areas.push(TraitArea {
            name,
            groups: Vec::new(),
            is_custom: true,
        });
        Ok(next)
    }

    /// Removes a custom area with all its groups and traits.
    pub fn without_area(&self, name: &str) -> EditResult<Self> {
        if self.custom_area(name).is_none() {
            return Err(OverlayEditError::AreaNotFound(name.to_string()));
        }
        let mut next = self.clone();
        next.custom_areas.retain(|area| area.name != name);
        Ok(next)
    }

    /// Baseline fields plus every overlay field, orphaned entries included.
    pub fn known_fields(&self, baseline: &TraitSchema) -> BTreeSet<String> {
        let mut fields = baseline.field_names();
        fields.extend(self.definitions().map(|definition| definition.field.clone()));
        fields
    }

    fn ensure_unique_fields(&self, baseline: &TraitSchema) -> EditResult<()> {
        let mut seen = HashSet::new();
        let baseline_fields = baseline.traits().map(|hit| hit.definition);
        for definition in baseline_fields.chain(self.definitions()) {
            if !seen.insert(definition.field.as_str()) {
                return Err(OverlayEditError::DuplicateField(definition.field.clone()));
            }
        }
        Ok(())
    }

    fn definitions_mut(&mut self) -> impl Iterator<Item = &mut TraitDefinition> {
        let from_traits = self
            .custom_traits
            .values_mut()
            .flat_map(|by_group| by_group.values_mut())
            .flatten();
        let from_groups = self
            .custom_groups
            .values_mut()
            .flatten()
            .flat_map(|group| group.traits.iter_mut());
        let from_areas = self
            .custom_areas
            .iter_mut()
            .flat_map(|area| area.groups.iter_mut())
            .flat_map(|group| group.traits.iter_mut());
        from_traits.chain(from_groups).chain(from_areas)
    }
}

fn remove_field(traits: &mut Vec<TraitDefinition>, field: &str) -> bool {
    let before = traits.len();
    traits.retain(|definition| definition.field != field);
    traits.len() != before
}

fn normalize_name(name: &str) -> EditResult<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(OverlayEditError::BlankName);
    }
    Ok(trimmed.to_string())
}

fn group_not_found(area: &str, group: &str) -> OverlayEditError {
    OverlayEditError::GroupNotFound {
        area: area.to_string(),
        group: group.to_string(),
    }
}
