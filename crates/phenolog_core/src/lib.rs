//! Core domain logic for Phenolog.
//! Trait-schema merging and per-plant observation aggregation.

pub mod baseline;
pub mod db;
pub mod engine;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

use std::time::{SystemTime, UNIX_EPOCH};

pub use baseline::baseline_schema;
pub use engine::aggregate::{aggregate_all, aggregate_field};
pub use engine::collect::{collect_observations, CollectedObservations};
pub use engine::field_name::generate_field_name;
pub use engine::group::{group_by_schema, GroupedArea, LabeledField, OTHER_AREA_NAME};
pub use engine::merge::merge_schema;
pub use logging::{default_log_level, init_logging, logging_status, LogSettings, LoggingError};
pub use model::aggregate::{AggregatedField, NumericRange, ValueType};
pub use model::observation::{
    CycleRecord, ObservationRecord, ObservationSource, PlantId, PlantRecord,
};
pub use model::overlay::{
    CustomOverlayStore, GroupLocation, OverlayEditError, TraitDraft, TraitLocation,
};
pub use model::schema::{
    title_case_field, validate_unique_fields, DuplicateFieldsError, Season, TimingHint,
    TraitArea, TraitDefinition, TraitGroup, TraitSchema, ValueKind,
};
pub use repo::overlay_repo::{OverlayRepository, RepoError, RepoResult, SqliteOverlayRepository};
pub use service::overlay_service::{OverlayService, OverlayServiceError};
pub use service::plant_summary::{aggregate_plant, field_detail, summarize_plant, PlantSummary};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// Current wall-clock time as Unix epoch milliseconds.
pub(crate) fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_millis() as i64)
}
