//! Result rows and their post-processing.

use chrono::{Local, TimeZone};
use serde::Deserialize;
use serde_json::{Map, Value};

/// Field carrying the aggregation bucket start as epoch milliseconds.
pub const TIMESLICE_FIELD: &str = "_timeslice";

/// One result row.
pub type Record = Map<String, Value>;

/// Rows in server order, concatenated across pages.
pub type RecordSet = Vec<Record>;

/// Body of `GET /search/jobs/{id}/records`.
#[derive(Debug, Clone, Deserialize)]
pub struct RecordsResponse {
    #[serde(default)]
    pub records: Vec<RecordEnvelope>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecordEnvelope {
    pub map: Record,
}

impl RecordsResponse {
    pub fn into_records(self) -> RecordSet {
        self.records.into_iter().map(|r| r.map).collect()
    }
}

/// Format epoch milliseconds as `YYYY-MM-DD HH:MM:SS` in the local zone.
pub fn format_epoch_millis(millis: i64) -> Option<String> {
    Local
        .timestamp_millis_opt(millis)
        .single()
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
}

/// The backend sends `_timeslice` as a number or as a numeric string.
fn timeslice_millis(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Rewrite `_timeslice` on every record that has one. Other fields are untouched,
/// and values that are not epoch milliseconds are left as they are.
pub fn format_timeslices(records: &mut RecordSet) {
    for record in records.iter_mut() {
        let formatted = record
            .get(TIMESLICE_FIELD)
            .and_then(timeslice_millis)
            .and_then(format_epoch_millis);
        if let Some(formatted) = formatted {
            record.insert(TIMESLICE_FIELD.to_string(), Value::String(formatted));
        }
    }
}

/// Render a bucket width for `timeslice` clauses: `1d`, `6h`, `5m`, `30s`.
pub fn timeslice_label(step_seconds: u64) -> String {
    let step = step_seconds as f64;
    if step_seconds >= 86_400 {
        format!("{}d", (step / 86_400.0).round() as u64)
    } else if step_seconds >= 3_600 {
        format!("{}h", (step / 3_600.0).round() as u64)
    } else if step_seconds > 60 {
        format!("{}m", (step / 60.0).round() as u64)
    } else {
        format!("{step_seconds}s")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> Record {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_timeslice_converted_and_other_fields_preserved() {
        let mut rows = vec![record(json!({"_timeslice": 1700000000000i64, "count": 5}))];
        format_timeslices(&mut rows);

        let expected = Local
            .timestamp_millis_opt(1_700_000_000_000)
            .unwrap()
            .format("%Y-%m-%d %H:%M:%S")
            .to_string();
        assert_eq!(rows[0]["_timeslice"], json!(expected));
        assert_eq!(rows[0]["count"], json!(5));
    }

    #[test]
    fn test_timeslice_string_value_is_converted() {
        let mut rows = vec![record(json!({"_timeslice": "1700000000000"}))];
        format_timeslices(&mut rows);

        let formatted = rows[0]["_timeslice"].as_str().unwrap();
        assert_eq!(formatted.len(), "2023-11-14 22:13:20".len());
        assert!(formatted.starts_with("2023-11-1"));
    }

    #[test]
    fn test_rows_without_timeslice_untouched() {
        let mut rows = vec![
            record(json!({"_sourcecategory": "prod/web", "_count": "3"})),
            record(json!({"_timeslice": "not-a-number"})),
        ];
        let before = rows.clone();
        format_timeslices(&mut rows);
        assert_eq!(rows, before);
    }

    #[test]
    fn test_records_response_unwraps_map() {
        let body: RecordsResponse = serde_json::from_value(json!({
            "fields": [{"name": "count", "fieldType": "int"}],
            "records": [{"map": {"count": "1"}}, {"map": {"count": "2"}}]
        }))
        .unwrap();
        let rows = body.into_records();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1]["count"], json!("2"));
    }

    #[test]
    fn test_timeslice_label_units() {
        assert_eq!(timeslice_label(30), "30s");
        assert_eq!(timeslice_label(60), "60s");
        assert_eq!(timeslice_label(300), "5m");
        assert_eq!(timeslice_label(3_600), "1h");
        assert_eq!(timeslice_label(5_400), "2h");
        assert_eq!(timeslice_label(86_400), "1d");
        assert_eq!(timeslice_label(7 * 86_400), "7d");
    }
}
