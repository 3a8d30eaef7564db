//! Per-field reduction of observation records.
//!
//! # Responsibility
//! - Pick one representative value per field (single, mean, mode, latest).
//! - Attach numeric range or categorical distribution and a conflict flag.
//!
//! # Invariants
//! - `observations` keeps every record, newest first; ties keep input order.
//! - Null values never take part in statistics.
//! - Mode ties go to the token seen first in collection order.
//! - `has_conflicts` counts distinct stringified values only.

use crate::engine::collect::CollectedObservations;
use crate::model::aggregate::{AggregatedField, NumericRange, ValueType};
use crate::model::observation::ObservationRecord;
use serde_json::{Number, Value};
use std::collections::{BTreeMap, HashMap};

/// Largest magnitude rendered without a fractional part.
const INTEGRAL_RENDER_LIMIT: f64 = 1e15;

/// Aggregates every collected field.
pub fn aggregate_all(collected: &CollectedObservations) -> BTreeMap<String, AggregatedField> {
    collected
        .iter()
        .map(|(field, records)| (field.clone(), aggregate_field(field, records)))
        .collect()
}

/// Reduces one field's records into an [`AggregatedField`].
pub fn aggregate_field(field: &str, records: &[ObservationRecord]) -> AggregatedField {
    // Frequencies come from the untouched input order, before date sorting.
    let present: Vec<&Value> = records
        .iter()
        .filter(|record| record.has_value())
        .map(|record| &record.value)
        .collect();
    let tally = tally_tokens(&present);

    let mut observations = records.to_vec();
    observations.sort_by(|a, b| b.observation_date.cmp(&a.observation_date));

    let has_conflicts = tally.len() > 1;
    let mut aggregate = AggregatedField {
        field: field.to_string(),
        current_value: Value::Null,
        value_type: ValueType::Latest,
        observations,
        range: None,
        value_count: None,
        has_conflicts,
    };

    match present.as_slice() {
        [] => {}
        [only] => {
            aggregate.current_value = (*only).clone();
            aggregate.value_type = ValueType::Single;
        }
        many => match numeric_values(many) {
            Some(numbers) => {
                let mean = running_mean(&numbers);
                aggregate.current_value = number_value(round_one_decimal(mean));
                aggregate.value_type = ValueType::Mean;
                aggregate.range = Some(NumericRange {
                    min: numbers.iter().copied().fold(f64::INFINITY, f64::min),
                    max: numbers.iter().copied().fold(f64::NEG_INFINITY, f64::max),
                });
            }
            None => {
                let mut winner = &tally[0];
                for entry in &tally[1..] {
                    if entry.count > winner.count {
                        winner = entry;
                    }
                }
                aggregate.current_value = winner.first_value.clone();
                aggregate.value_type = ValueType::Mode;
                aggregate.value_count = Some(
                    tally
                        .iter()
                        .map(|entry| (entry.token.clone(), entry.count))
                        .collect(),
                );
            }
        },
    }

    aggregate
}

struct TokenTally<'a> {
    token: String,
    count: usize,
    first_value: &'a Value,
}

/// Counts stringified tokens, ordered by first occurrence.
fn tally_tokens<'a>(values: &[&'a Value]) -> Vec<TokenTally<'a>> {
    let mut tally: Vec<TokenTally<'a>> = Vec::new();
    let mut index_by_token: HashMap<String, usize> = HashMap::new();
    for value in values {
        let token = stringify_value(value);
        match index_by_token.get(&token) {
            Some(&index) => tally[index].count += 1,
            None => {
                index_by_token.insert(token.clone(), tally.len());
                tally.push(TokenTally {
                    token,
                    count: 1,
                    first_value: *value,
                });
            }
        }
    }
    tally
}

/// Returns every value as `f64` when all of them are numeric.
fn numeric_values(values: &[&Value]) -> Option<Vec<f64>> {
    values.iter().map(|value| numeric_value(value)).collect()
}

/// Numbers, or strings whose trimmed text parses to a finite number.
pub fn numeric_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64().filter(|n| n.is_finite()),
        Value::String(text) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return None;
            }
            trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
        }
        _ => None,
    }
}

/// Renders a value as the token used for counting and conflict detection.
pub fn stringify_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(flag) => flag.to_string(),
        Value::String(text) => text.clone(),
        Value::Number(number) => {
            if number.is_i64() || number.is_u64() {
                return number.to_string();
            }
            match number.as_f64() {
                Some(n) if n.fract() == 0.0 && n.abs() < INTEGRAL_RENDER_LIMIT => {
                    format!("{}", n as i64)
                }
                Some(n) => n.to_string(),
                None => number.to_string(),
            }
        }
        Value::Array(items) => items
            .iter()
            .map(stringify_value)
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => value.to_string(),
    }
}

/// Incremental mean; stays finite for any finite inputs.
fn running_mean(numbers: &[f64]) -> f64 {
    numbers
        .iter()
        .enumerate()
        .fold(0.0, |mean, (index, n)| mean + (n - mean) / (index + 1) as f64)
}

fn round_one_decimal(value: f64) -> f64 {
    // Beyond this magnitude there is no fractional part left to round.
    if value.abs() >= INTEGRAL_RENDER_LIMIT {
        return value;
    }
    (value * 10.0).round() / 10.0
}

fn number_value(value: f64) -> Value {
    if value.fract() == 0.0 && value.abs() < INTEGRAL_RENDER_LIMIT {
        return Value::from(value as i64);
    }
    Number::from_f64(value).map_or(Value::Null, Value::Number)
}
