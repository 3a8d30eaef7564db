//! Trait taxonomy model: areas -> groups -> trait definitions.
//!
//! # Responsibility
//! - Define the hierarchy shared by the baseline catalog and merged schemas.
//! - Provide first-match lookup and never-failing label resolution.
//!
//! # Invariants
//! - `field` identifies one trait across the whole schema.
//! - `is_custom` reflects only the item's own origin.
//! - Baseline items carry no `created_at`/`updated_at` stamps.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Input widget/value kind of one trait.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    /// Free text.
    Text,
    /// Numeric measurement.
    Number,
    /// One of the enumerated `options`.
    Select,
    /// Ordinal score, usually 1..=5.
    Rating,
    /// Yes/no flag.
    Boolean,
}

/// Season used by default-timing hints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Season {
    Spring,
    Summer,
    Autumn,
    Winter,
}

/// Suggested timing for recording one trait.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimingHint {
    #[serde(default)]
    pub season: Option<Season>,
    /// Calendar month, 1..=12.
    #[serde(default)]
    pub month: Option<u8>,
    /// Weeks after acquisition or sowing.
    #[serde(default)]
    pub weeks: Option<u32>,
    /// Keep this trait out of automatically scheduled cycles.
    #[serde(default)]
    pub exclude_from_automatic_cycle: bool,
}

/// One observable plant characteristic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraitDefinition {
    /// Stable identifier; observation records reference this.
    pub field: String,
    pub label: String,
    pub kind: ValueKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timing: Option<TimingHint>,
    #[serde(default)]
    pub is_custom: bool,
    /// Unix epoch milliseconds. Custom traits only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<i64>,
    /// Unix epoch milliseconds. Custom traits only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<i64>,
}

impl TraitDefinition {
    /// Creates a baseline definition with no options or timing.
    pub fn baseline(field: impl Into<String>, label: impl Into<String>, kind: ValueKind) -> Self {
        Self {
            field: field.into(),
            label: label.into(),
            kind,
            options: None,
            timing: None,
            is_custom: false,
            created_at: None,
            updated_at: None,
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
}

/// Named ordered collection of traits inside one area.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraitGroup {
    pub name: String,
    #[serde(default)]
    pub traits: Vec<TraitDefinition>,
    #[serde(default)]
    pub is_custom: bool,
}

impl TraitGroup {
    pub fn new(name: impl Into<String>, traits: Vec<TraitDefinition>) -> Self {
        Self {
            name: name.into(),
            traits,
            is_custom: false,
        }
    }
}

/// Named ordered collection of groups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraitArea {
    pub name: String,
    #[serde(default)]
    pub groups: Vec<TraitGroup>,
    #[serde(default)]
    pub is_custom: bool,
}

impl TraitArea {
    pub fn new(name: impl Into<String>, groups: Vec<TraitGroup>) -> Self {
        Self {
            name: name.into(),
            groups,
            is_custom: false,
        }
    }

    pub fn group(&self, name: &str) -> Option<&TraitGroup> {
        self.groups.iter().find(|group| group.name == name)
    }
}

/// Ordered area hierarchy, used for both the baseline and merged schemas.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraitSchema {
    pub areas: Vec<TraitArea>,
}

/// Trait match returned by [`TraitSchema::find_trait`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraitLookup<'a> {
    pub area: &'a TraitArea,
    pub group: &'a TraitGroup,
    pub definition: &'a TraitDefinition,
}

impl TraitSchema {
    pub fn new(areas: Vec<TraitArea>) -> Self {
        Self { areas }
    }

    pub fn area(&self, name: &str) -> Option<&TraitArea> {
        self.areas.iter().find(|area| area.name == name)
    }

    /// Iterates every trait in area -> group -> trait order.
    pub fn traits(&self) -> impl Iterator<Item = TraitLookup<'_>> {
        self.areas.iter().flat_map(|area| {
            area.groups.iter().flat_map(move |group| {
                group.traits.iter().map(move |definition| TraitLookup {
                    area,
                    group,
                    definition,
                })
            })
        })
    }

    /// Finds a trait by field; the first match in schema order wins.
    pub fn find_trait(&self, field: &str) -> Option<TraitLookup<'_>> {
        self.traits().find(|hit| hit.definition.field == field)
    }

    /// Resolves a display label; unknown fields fall back to a title-cased
    /// rendering of the raw field name.
    pub fn label_for(&self, field: &str) -> String {
        match self.find_trait(field) {
            Some(hit) => hit.definition.label.clone(),
            None => title_case_field(field),
        }
    }

    /// Every field identifier present in the schema.
    pub fn field_names(&self) -> BTreeSet<String> {
        self.traits()
            .map(|hit| hit.definition.field.clone())
            .collect()
    }

    pub fn trait_count(&self) -> usize {
        self.traits().count()
    }
}

/// Two or more definitions share one field identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateFieldsError {
    /// Duplicated fields in first-duplicate order.
    pub fields: Vec<String>,
}

impl Display for DuplicateFieldsError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "schema has duplicate trait fields: {}", self.fields.join(", "))
    }
}

impl Error for DuplicateFieldsError {}

/// Checks global field uniqueness across a (merged) schema.
///
/// Merging never calls this; it is an opt-in audit for loaded documents.
pub fn validate_unique_fields(schema: &TraitSchema) -> Result<(), DuplicateFieldsError> {
    let mut seen = HashSet::new();
    let mut duplicates = Vec::new();
    for hit in schema.traits() {
        let field = hit.definition.field.as_str();
        if !seen.insert(field) && !duplicates.iter().any(|dup| dup == field) {
            duplicates.push(field.to_string());
        }
    }
    if duplicates.is_empty() {
        Ok(())
    } else {
        Err(DuplicateFieldsError { fields: duplicates })
    }
}

/// Renders a raw field identifier as a human label.
///
/// `custom_bud_count` -> `Custom Bud Count`, `flowerColor` -> `Flower Color`.
///
/// A lone capital ending a word stays attached, so `pH_level` reads
/// `PH Level`; capital runs split off as acronyms (`leafRGB` -> `Leaf RGB`).
pub fn title_case_field(field: &str) -> String {
    let mut words: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut prev_lower = false;
    let mut chars = field.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '_' || c == '-' || c.is_whitespace() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            prev_lower = false;
            continue;
        }
        let starts_word = chars.peek().is_some_and(|next| next.is_alphabetic());
        if c.is_uppercase() && prev_lower && starts_word && !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }
        prev_lower = c.is_lowercase() || c.is_ascii_digit();
        current.push(c);
    }
    if !current.is_empty() {
        words.push(current);
    }

    words
        .iter()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
