//! Reshaping remote records onto the reference schema.
//!
//! The policy is deliberately lenient: columns the record lacks become
//! nulls, keys the schema lacks are dropped, and nothing here ever fails.

use std::collections::{BTreeSet, HashSet};

use serde_json::{Map, Value};

/// Project a remote record onto the reference schema.
///
/// The output has exactly one cell per reference column, in reference
/// order. The source tag overwrites the tag column when the reference
/// schema carries it.
pub fn reshape(
    record: &Map<String, Value>,
    columns: &[String],
    tag_column: &str,
    tag: &str,
) -> Vec<Option<String>> {
    columns
        .iter()
        .map(|column| {
            if column == tag_column {
                return Some(tag.to_string());
            }
            record.get(column).and_then(cell_value)
        })
        .collect()
}

/// Record keys across a batch that are not part of the reference schema.
/// Reported so upstream schema drift shows up in logs.
pub fn dropped_keys(records: &[Map<String, Value>], columns: &[String]) -> BTreeSet<String> {
    let known: HashSet<&str> = columns.iter().map(String::as_str).collect();
    records
        .iter()
        .flat_map(|record| record.keys())
        .filter(|key| !known.contains(key.as_str()))
        .cloned()
        .collect()
}

fn cell_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        other => Some(other.to_string()),
    }
}
