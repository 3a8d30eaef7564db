//! Field identifier generation for custom traits.
//!
//! This is the only mechanism that keeps generated identifiers away from
//! existing ones; merging never re-checks.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;

/// Prefix marking identifiers created by authoring.
pub const CUSTOM_FIELD_PREFIX: &str = "custom_";
const EMPTY_SLUG: &str = "trait";

static NON_ALPHANUMERIC_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-z0-9]+").expect("valid slug regex"));

/// Lowercases a label and collapses non-alphanumeric runs to `_`.
pub fn slugify(label: &str) -> String {
    let lowered = label.to_lowercase();
    let slug = NON_ALPHANUMERIC_RE.replace_all(&lowered, "_");
    let trimmed = slug.trim_matches('_');
    if trimmed.is_empty() {
        EMPTY_SLUG.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Generates a `custom_<slug>` field, suffixing `_1`, `_2`, ... on collision.
pub fn generate_field_name(label: &str, existing_fields: &BTreeSet<String>) -> String {
    let base = format!("{CUSTOM_FIELD_PREFIX}{}", slugify(label));
    if !existing_fields.contains(&base) {
        return base;
    }

    let mut suffix = 1usize;
    loop {
        let candidate = format!("{base}_{suffix}");
        if !existing_fields.contains(&candidate) {
            return candidate;
        }
        suffix += 1;
    }
}
