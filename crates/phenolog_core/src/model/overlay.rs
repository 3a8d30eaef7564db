//! Custom trait overlay document and authoring inputs.
//!
//! # Responsibility
//! - Define the persisted overlay shape layered on the baseline taxonomy.
//! - Define explicit attachment locations for authoring edits.
//!
//! # Invariants
//! - Every `field` is unique across baseline and all overlay mechanisms.
//! - Documents are treated as immutable snapshots; edits return new ones
//!   (see `engine::authoring`).

use crate::model::schema::{TimingHint, TraitArea, TraitDefinition, TraitGroup, ValueKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// User-authored extensions of the baseline taxonomy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomOverlayStore {
    /// Wholly new areas, appended after every baseline area.
    #[serde(default)]
    pub custom_areas: Vec<TraitArea>,
    /// New groups keyed by target baseline area name.
    #[serde(default)]
    pub custom_groups: BTreeMap<String, Vec<TraitGroup>>,
    /// New traits keyed by baseline area name, then baseline group name.
    #[serde(default)]
    pub custom_traits: BTreeMap<String, BTreeMap<String, Vec<TraitDefinition>>>,
}

impl CustomOverlayStore {
    pub fn is_empty(&self) -> bool {
        self.custom_areas.is_empty() && self.custom_groups.is_empty() && self.custom_traits.is_empty()
    }

    /// Every trait definition held by the overlay, whatever its mechanism.
    pub fn definitions(&self) -> impl Iterator<Item = &TraitDefinition> {
        let from_traits = self
            .custom_traits
            .values()
            .flat_map(|by_group| by_group.values())
            .flatten();
        let from_groups = self
            .custom_groups
            .values()
            .flatten()
            .flat_map(|group| group.traits.iter());
        let from_areas = self
            .custom_areas
            .iter()
            .flat_map(|area| area.groups.iter())
            .flat_map(|group| group.traits.iter());
        from_traits.chain(from_groups).chain(from_areas)
    }

    pub fn find_definition(&self, field: &str) -> Option<&TraitDefinition> {
        self.definitions().find(|definition| definition.field == field)
    }

    pub fn custom_area(&self, name: &str) -> Option<&TraitArea> {
        self.custom_areas.iter().find(|area| area.name == name)
    }
}

/// Where a new custom trait attaches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TraitLocation {
    /// Existing baseline group inside a baseline area.
    BaselineGroup { area: String, group: String },
    /// Custom group previously added to a baseline area.
    CustomGroup { area: String, group: String },
    /// Group inside a wholly custom area.
    CustomArea { area: String, group: String },
}

/// Where a new custom group attaches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupLocation {
    /// Existing baseline area.
    BaselineArea { area: String },
    /// Wholly custom area.
    CustomArea { area: String },
}

/// Author input for creating or editing a custom trait.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraitDraft {
    pub label: String,
    pub kind: ValueKind,
    pub options: Option<Vec<String>>,
    pub timing: Option<TimingHint>,
}

impl TraitDraft {
    pub fn new(label: impl Into<String>, kind: ValueKind) -> Self {
        Self {
            label: label.into(),
            kind,
            options: None,
            timing: None,
        }
    }

    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = Some(options.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_timing(mut self, timing: TimingHint) -> Self {
        self.timing = Some(timing);
        self
    }

    /// Validates author input before it reaches an overlay document.
    pub fn validate(&self) -> Result<(), OverlayEditError> {
        if self.label.trim().is_empty() {
            return Err(OverlayEditError::BlankLabel);
        }
        if let Some(options) = &self.options {
            if options.iter().any(|option| option.trim().is_empty()) {
                return Err(OverlayEditError::BlankOption);
            }
        }
        let has_options = self
            .options
            .as_ref()
            .is_some_and(|options| !options.is_empty());
        if self.kind == ValueKind::Select && !has_options {
            return Err(OverlayEditError::MissingOptions);
        }
        if let Some(month) = self.timing.as_ref().and_then(|timing| timing.month) {
            if !(1..=12).contains(&month) {
                return Err(OverlayEditError::InvalidMonth(month));
            }
        }
        Ok(())
    }
}

/// Authoring-time overlay edit failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverlayEditError {
    /// Trait label is blank after trim.
    BlankLabel,
    /// Area or group name is blank after trim.
    BlankName,
    /// Select trait declared without options.
    MissingOptions,
    /// Options list contains a blank entry.
    BlankOption,
    /// Timing month outside 1..=12.
    InvalidMonth(u8),
    /// Target area does not exist for the requested location kind.
    AreaNotFound(String),
    /// Target group does not exist for the requested location kind.
    GroupNotFound { area: String, group: String },
    /// Area name already used by baseline or overlay.
    DuplicateArea(String),
    /// Group name already used inside the target area.
    DuplicateGroup { area: String, group: String },
    /// Field identifier already defined elsewhere.
    DuplicateField(String),
    /// No custom trait with this field exists.
    TraitNotFound(String),
}

impl Display for OverlayEditError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankLabel => write!(f, "trait label must not be blank"),
            Self::BlankName => write!(f, "area/group name must not be blank"),
            Self::MissingOptions => write!(f, "select traits require at least one option"),
            Self::BlankOption => write!(f, "trait options must not contain blank entries"),
            Self::InvalidMonth(month) => write!(f, "timing month must be 1..=12, got {month}"),
            Self::AreaNotFound(area) => write!(f, "area not found: {area}"),
            Self::GroupNotFound { area, group } => {
                write!(f, "group not found: {area} / {group}")
            }
            Self::DuplicateArea(area) => write!(f, "area already exists: {area}"),
            Self::DuplicateGroup { area, group } => {
                write!(f, "group already exists: {area} / {group}")
            }
            Self::DuplicateField(field) => write!(f, "trait field already exists: {field}"),
            Self::TraitNotFound(field) => write!(f, "custom trait not found: {field}"),
        }
    }
}

impl Error for OverlayEditError {}
