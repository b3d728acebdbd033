//! Shared helpers for formatters.
//!
//! Responsibilities:
//! - Flatten nested JSON into dot-notation columns.
//! - Convert a metrics response into tabular rows.
//! - Write formatted output to stdout or a file.

use anyhow::{Context, Result};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use sumo_client::Record;
use sumo_client::models::format_epoch_millis;

/// Flatten a JSON value into a map of dot-notation keys to string values.
///
/// - Primitive values: stored with string conversion (`null` becomes empty)
/// - Nested objects: keys are prefixed with the parent key, e.g. `user.name`
/// - Arrays: each element gets an indexed key, e.g. `tags.0`
pub fn flatten_json_object(value: &Value, prefix: &str, output: &mut BTreeMap<String, String>) {
    match value {
        Value::Array(arr) => {
            for (i, item) in arr.iter().enumerate() {
                flatten_json_object(item, &format!("{prefix}.{i}"), output);
            }
        }
        Value::Object(obj) => flatten_map(obj, prefix, output),
        other => {
            output.insert(prefix.to_string(), format_json_value(other));
        }
    }
}

fn flatten_map(obj: &Map<String, Value>, prefix: &str, output: &mut BTreeMap<String, String>) {
    for (key, val) in obj {
        let new_key = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        flatten_json_object(val, &new_key, output);
    }
}

/// Flatten one record.
pub fn flatten_record(record: &Record) -> BTreeMap<String, String> {
    let mut flat = BTreeMap::new();
    flatten_map(record, "", &mut flat);
    flat
}

/// Sorted union of flattened keys across all records.
pub fn all_columns(records: &[Record]) -> Vec<String> {
    let mut keys = BTreeSet::new();
    for record in records {
        keys.extend(flatten_record(record).into_keys());
    }
    keys.into_iter().collect()
}

/// Format a JSON value as a string for display.
///
/// Strings are returned as-is, null becomes empty, arrays and objects are
/// serialized as compact JSON.
pub fn format_json_value(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        Value::Array(_) | Value::Object(_) => serde_json::to_string(v).unwrap_or_default(),
    }
}

/// One row per data point of a metrics response.
///
/// Columns: `rowId`, `metric`, each dimension, `timestamp` (local time) and `value`.
pub fn metrics_rows(response: &Value) -> Vec<Record> {
    let mut rows = Vec::new();
    let Some(results) = response.get("queryResult").and_then(Value::as_array) else {
        return rows;
    };

    for result in results {
        let row_id = result.get("rowId").cloned().unwrap_or(Value::Null);
        let series = result
            .pointer("/timeSeriesList/timeSeries")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default();

        for ts in series {
            let definition = ts.get("metricDefinition");
            let metric = definition
                .and_then(|d| d.get("metric"))
                .cloned()
                .unwrap_or(Value::Null);
            let dimensions = definition
                .and_then(|d| d.get("dimensions"))
                .and_then(Value::as_object);

            let timestamps = ts
                .pointer("/points/timestamps")
                .and_then(Value::as_array)
                .map(Vec::as_slice)
                .unwrap_or_default();
            let values = ts
                .pointer("/points/values")
                .and_then(Value::as_array)
                .map(Vec::as_slice)
                .unwrap_or_default();

            for (at, value) in timestamps.iter().zip(values) {
                let mut row = Map::new();
                row.insert("rowId".to_string(), row_id.clone());
                row.insert("metric".to_string(), metric.clone());
                if let Some(dimensions) = dimensions {
                    for (k, v) in dimensions {
                        row.insert(k.clone(), v.clone());
                    }
                }
                let timestamp = at
                    .as_i64()
                    .and_then(format_epoch_millis)
                    .map(Value::String)
                    .unwrap_or_else(|| at.clone());
                row.insert("timestamp".to_string(), timestamp);
                row.insert("value".to_string(), value.clone());
                rows.push(row);
            }
        }
    }

    rows
}

/// Write formatted output to a file or stdout.
pub fn output_result(output: &str, output_file: Option<&Path>) -> Result<()> {
    if let Some(path) = output_file {
        write_to_file(output, path)
            .with_context(|| format!("Failed to write output to {}", path.display()))?;
        eprintln!("Results written to {}", path.display());
    } else {
        print!("{output}");
        if !output.is_empty() && !output.ends_with('\n') {
            println!();
        }
    }
    Ok(())
}

/// Write formatted output to a file atomically.
///
/// Creates parent directories if needed, writes to a temp file then renames.
pub fn write_to_file(content: &str, path: &Path) -> Result<()> {
    use std::io::Write;
    use tempfile::NamedTempFile;

    let parent_dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    std::fs::create_dir_all(parent_dir)
        .with_context(|| format!("Failed to create directory: {}", parent_dir.display()))?;

    let mut temp_file = NamedTempFile::new_in(parent_dir)
        .with_context(|| format!("Failed to create temp file in: {}", parent_dir.display()))?;
    temp_file
        .write_all(content.as_bytes())
        .context("Failed to write to temp file")?;
    temp_file.flush().context("Failed to flush temp file")?;
    temp_file
        .persist(path)
        .with_context(|| format!("Failed to write file: {}", path.display()))?;

    Ok(())
}
