//! Domain model for trait taxonomies and plant observations.
//!
//! # Responsibility
//! - Define the schema hierarchy, overlay document and observation records.
//! - Define the derived aggregate shape returned to presentation callers.
//!
//! # Invariants
//! - Trait `field` identifiers are stable and globally unique.
//! - Aggregates are derived values and never persisted.

pub mod aggregate;
pub mod observation;
pub mod overlay;
pub mod schema;
