//! Turns records into a polars [`DataFrame`] for CSV output.

use crate::types::record::Record;
use polars::error::PolarsResult;
use polars::prelude::{Column, DataFrame};
use serde_json::Value;

/// Columns that always come first, in this order, when present.
const LEADING_COLUMNS: [&str; 2] = ["station", "date"];

/// Column names across all `records`: `station`, `date`, then every other key
/// in the order it is first seen.
pub fn column_names(records: &[Record]) -> Vec<String> {
    let mut names: Vec<String> = LEADING_COLUMNS
        .iter()
        .filter(|name| records.iter().any(|r| r.fields().contains_key(**name)))
        .map(|name| name.to_string())
        .collect();

    for record in records {
        for key in record.fields().keys() {
            if !names.iter().any(|name| name == key) {
                names.push(key.clone());
            }
        }
    }
    names
}

/// Builds a string-typed frame with one row per record. Missing fields become nulls.
pub fn records_to_frame(records: &[Record]) -> PolarsResult<DataFrame> {
    let columns = column_names(records)
        .into_iter()
        .map(|name| {
            let values: Vec<Option<String>> = records
                .iter()
                .map(|record| record.fields().get(&name).and_then(cell_text))
                .collect();
            Column::new(name.as_str().into(), values)
        })
        .collect::<Vec<_>>();
    DataFrame::new(columns)
}

fn cell_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
