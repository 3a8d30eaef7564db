//! Pure schema and observation pipeline.
//!
//! # Responsibility
//! - Merge baseline and overlay schemas; author overlay snapshots.
//! - Collect, aggregate and group plant observations.
//!
//! # Invariants
//! - No module here performs I/O or holds mutable global state.
//! - Identical inputs always produce deep-equal outputs.

pub mod aggregate;
pub mod authoring;
pub mod collect;
pub mod field_name;
pub mod group;
pub mod merge;
