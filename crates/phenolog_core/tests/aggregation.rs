use phenolog_core::{aggregate_field, NumericRange, ObservationRecord, ValueType};
use serde_json::{json, Value};
use std::collections::BTreeMap;

fn records(values: &[(Value, i64)]) -> Vec<ObservationRecord> {
    values
        .iter()
        .map(|(value, date)| ObservationRecord::new("trait", value.clone(), *date))
        .collect()
}

#[test]
fn numeric_values_are_averaged() {
    let aggregate = aggregate_field(
        "stem_count",
        &records(&[(json!(8), 1), (json!(8), 2), (json!(9), 3)]),
    );

    assert_eq!(aggregate.value_type, ValueType::Mean);
    assert_eq!(aggregate.current_value, json!(8.3));
    assert_eq!(aggregate.range, Some(NumericRange { min: 8.0, max: 9.0 }));
    assert!(aggregate.has_conflicts);
    assert_eq!(aggregate.value_count, None);
}

#[test]
fn numeric_strings_count_as_numbers() {
    let aggregate = aggregate_field(
        "height_cm",
        &records(&[(json!("10"), 1), (json!(12), 2), (json!(" 14.5 "), 3)]),
    );

    assert_eq!(aggregate.value_type, ValueType::Mean);
    assert_eq!(aggregate.current_value, json!(12.2));
    assert_eq!(aggregate.range, Some(NumericRange { min: 10.0, max: 14.5 }));
}

#[test]
fn huge_finite_values_keep_a_finite_mean() {
    let aggregate = aggregate_field(
        "yield_g",
        &records(&[(json!(1e308), 1), (json!(1e308), 2)]),
    );

    assert_eq!(aggregate.value_type, ValueType::Mean);
    assert_eq!(aggregate.current_value, json!(1e308));
    assert_eq!(
        aggregate.range,
        Some(NumericRange { min: 1e308, max: 1e308 })
    );
    assert!(!aggregate.has_conflicts);
}

#[test]
fn categorical_values_use_mode_with_input_order_tie_break() {
    let aggregate = aggregate_field(
        "fruit_quality",
        &records(&[
            (json!("Good"), 1),
            (json!("Excellent"), 3),
            (json!("Good"), 2),
        ]),
    );

    assert_eq!(aggregate.value_type, ValueType::Mode);
    assert_eq!(aggregate.current_value, json!("Good"));
    let expected: BTreeMap<String, usize> =
        [("Good".to_string(), 2), ("Excellent".to_string(), 1)].into();
    assert_eq!(aggregate.value_count, Some(expected));
    assert!(aggregate.has_conflicts);
    assert_eq!(aggregate.range, None);
}

#[test]
fn mode_tie_goes_to_first_input_not_newest() {
    // "Fair" is newest, "Poor" appears first in input order.
    let aggregate = aggregate_field(
        "fruit_quality",
        &records(&[(json!("Poor"), 1), (json!("Fair"), 9)]),
    );

    assert_eq!(aggregate.value_type, ValueType::Mode);
    assert_eq!(aggregate.current_value, json!("Poor"));
    assert_eq!(aggregate.observations[0].value, json!("Fair"));
}

#[test]
fn mixed_values_fall_back_to_mode() {
    let aggregate = aggregate_field(
        "vigor",
        &records(&[(json!(4), 1), (json!("strong"), 2), (json!("4"), 3)]),
    );

    assert_eq!(aggregate.value_type, ValueType::Mode);
    assert_eq!(aggregate.current_value, json!(4));
    assert_eq!(aggregate.value_count.as_ref().unwrap()["4"], 2);
}

#[test]
fn single_value_passes_through() {
    let aggregate = aggregate_field("leaf_shape", &records(&[(json!("Ovate"), 5)]));
    assert_eq!(aggregate.value_type, ValueType::Single);
    assert_eq!(aggregate.current_value, json!("Ovate"));
    assert!(!aggregate.has_conflicts);
    assert_eq!(aggregate.range, None);
    assert_eq!(aggregate.value_count, None);

    let numeric = aggregate_field("height_cm", &records(&[(json!(5), 5), (Value::Null, 9)]));
    assert_eq!(numeric.value_type, ValueType::Single);
    assert_eq!(numeric.current_value, json!(5));
    assert_eq!(numeric.observations.len(), 2);
}

#[test]
fn repeated_value_is_not_a_conflict() {
    let aggregate = aggregate_field(
        "winter_hardy",
        &records(&[(json!("True"), 1), (json!("True"), 2), (json!("True"), 3)]),
    );

    assert!(!aggregate.has_conflicts);
    assert_eq!(aggregate.current_value, json!("True"));
}

#[test]
fn null_only_records_yield_well_formed_empty_aggregate() {
    let aggregate = aggregate_field(
        "disease_signs",
        &records(&[(Value::Null, 1), (Value::Null, 2)]),
    );

    assert_eq!(aggregate.value_type, ValueType::Latest);
    assert_eq!(aggregate.current_value, Value::Null);
    assert_eq!(aggregate.range, None);
    assert_eq!(aggregate.value_count, None);
    assert!(!aggregate.has_conflicts);
    assert_eq!(aggregate.observations.len(), 2);
    assert!(aggregate.observations.iter().all(|record| !record.has_value()));

    let none = aggregate_field("disease_signs", &[]);
    assert_eq!(none.value_type, ValueType::Latest);
    assert!(none.observations.is_empty());
}

#[test]
fn history_is_newest_first_and_stable_on_ties() {
    let input = vec![
        ObservationRecord::new("vigor", json!(2), 100).with_notes("a"),
        ObservationRecord::new("vigor", json!(3), 300).with_notes("b"),
        ObservationRecord::new("vigor", json!(4), 100).with_notes("c"),
        ObservationRecord::new("vigor", Value::Null, 200).with_notes("d"),
    ];

    let aggregate = aggregate_field("vigor", &input);

    let notes: Vec<&str> = aggregate
        .observations
        .iter()
        .map(|record| record.notes.as_deref().unwrap())
        .collect();
    assert_eq!(notes, vec!["b", "d", "a", "c"]);
    assert_eq!(aggregate.latest_observation().unwrap().value, json!(3));
}

#[test]
fn aggregation_is_deterministic() {
    let input = records(&[(json!("Good"), 1), (json!(7), 2), (Value::Null, 3)]);
    assert_eq!(aggregate_field("x", &input), aggregate_field("x", &input));
}
