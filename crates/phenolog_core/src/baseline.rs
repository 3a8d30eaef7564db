//! Built-in baseline trait taxonomy.
//!
//! # Invariants
//! - Built once per process and never mutated.
//! - Field identifiers are unique and never start with `custom_`.

use crate::model::schema::{
    Season, TimingHint, TraitArea, TraitDefinition, TraitGroup, TraitSchema, ValueKind,
};
use once_cell::sync::Lazy;

static BASELINE: Lazy<TraitSchema> = Lazy::new(build_baseline);

/// Returns the process-wide baseline taxonomy.
pub fn baseline_schema() -> &'static TraitSchema {
    &BASELINE
}

fn seasonal(season: Season) -> TimingHint {
    TimingHint {
        season: Some(season),
        ..TimingHint::default()
    }
}

fn registration_only() -> TimingHint {
    TimingHint {
        exclude_from_automatic_cycle: true,
        ..TimingHint::default()
    }
}

fn t(field: &str, label: &str, kind: ValueKind) -> TraitDefinition {
    TraitDefinition::baseline(field, label, kind)
}

fn build_baseline() -> TraitSchema {
    TraitSchema::new(vec![
        TraitArea::new(
            "Identity",
            vec![
                TraitGroup::new(
                    "Registration",
                    vec![
                        t("species", "Species", ValueKind::Text).with_timing(registration_only()),
                        t("cultivar", "Cultivar", ValueKind::Text).with_timing(registration_only()),
                        t("source", "Source", ValueKind::Select)
                            .with_options(["Seed", "Cutting", "Nursery", "Division", "Gift"])
                            .with_timing(registration_only()),
                    ],
                ),
                TraitGroup::new(
                    "Placement",
                    vec![
                        t("location", "Location", ValueKind::Text),
                        t("light_exposure", "Light Exposure", ValueKind::Select)
                            .with_options(["Full sun", "Partial shade", "Full shade"]),
                        t("container", "Grown in Container", ValueKind::Boolean),
                    ],
                ),
            ],
        ),
        TraitArea::new(
            "Growth",
            vec![
                TraitGroup::new(
                    "Size",
                    vec![
                        t("height_cm", "Height (cm)", ValueKind::Number),
                        t("spread_cm", "Spread (cm)", ValueKind::Number),
                        t("stem_count", "Stem Count", ValueKind::Number),
                    ],
                ),
                TraitGroup::new(
                    "Habit",
                    vec![
                        t("growth_habit", "Growth Habit", ValueKind::Select).with_options([
                            "Upright", "Spreading", "Trailing", "Climbing", "Rosette",
                        ]),
                        t("vigor", "Vigor", ValueKind::Rating),
                    ],
                ),
            ],
        ),
        TraitArea::new(
            "Foliage",
            vec![TraitGroup::new(
                "Leaves",
                vec![
                    t("leaf_color", "Leaf Color", ValueKind::Text),
                    t("leaf_shape", "Leaf Shape", ValueKind::Select).with_options([
                        "Ovate", "Lanceolate", "Cordate", "Linear", "Palmate", "Compound",
                    ]),
                    t("variegation", "Variegated", ValueKind::Boolean),
                    t("autumn_color", "Autumn Color", ValueKind::Text)
                        .with_timing(seasonal(Season::Autumn)),
                ],
            )],
        ),
        TraitArea::new(
            "Flowering",
            vec![
                TraitGroup::new(
                    "Blooms",
                    vec![
                        t("flower_color", "Flower Color", ValueKind::Text)
                            .with_timing(seasonal(Season::Summer)),
                        t("flower_size_mm", "Flower Size (mm)", ValueKind::Number)
                            .with_timing(seasonal(Season::Summer)),
                        t("fragrance", "Fragrance", ValueKind::Rating),
                    ],
                ),
                TraitGroup::new(
                    "Bloom Timing",
                    vec![
                        t("first_bloom_week", "First Bloom (weeks)", ValueKind::Number).with_timing(
                            TimingHint {
                                season: Some(Season::Spring),
                                weeks: Some(8),
                                ..TimingHint::default()
                            },
                        ),
                        t("bloom_duration_days", "Bloom Duration (days)", ValueKind::Number),
                        t("repeat_blooming", "Repeat Blooming", ValueKind::Boolean),
                    ],
                ),
            ],
        ),
        TraitArea::new(
            "Fruiting",
            vec![TraitGroup::new(
                "Harvest",
                vec![
                    t("fruit_set", "Fruit Set", ValueKind::Boolean),
                    t("yield_g", "Yield (g)", ValueKind::Number).with_timing(TimingHint {
                        season: Some(Season::Autumn),
                        month: Some(9),
                        ..TimingHint::default()
                    }),
                    t("fruit_quality", "Fruit Quality", ValueKind::Select)
                        .with_options(["Poor", "Fair", "Good", "Excellent"]),
                ],
            )],
        ),
        TraitArea::new(
            "Health",
            vec![TraitGroup::new(
                "Condition",
                vec![
                    t("overall_health", "Overall Health", ValueKind::Rating),
                    t("pest_pressure", "Pest Pressure", ValueKind::Select)
                        .with_options(["None", "Low", "Moderate", "Severe"]),
                    t("disease_signs", "Disease Signs", ValueKind::Text),
                    t("winter_hardy", "Winter Hardy", ValueKind::Boolean)
                        .with_timing(seasonal(Season::Winter)),
                ],
            )],
        ),
    ])
}
