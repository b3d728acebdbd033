//! Testing utilities for Sumo Logic client tests.
//!
//! Available when running tests or when the `test-utils` feature is enabled.
//!
//! # Example
//! ```ignore
//! use sumo_client::testing::{load_fixture, records_page};
//!
//! let status = load_fixture("search/job_status_done.json");
//! let page = records_page(0..3);
//! ```

use std::path::Path;

use serde_json::{Value, json};

/// Load a JSON fixture file from the fixtures directory.
///
/// # Arguments
/// * `fixture_path` - Relative path within the fixtures directory (e.g., "search/create_job.json")
///
/// # Panics
/// - If the fixture file cannot be read
/// - If the file content is not valid JSON
pub fn load_fixture(fixture_path: &str) -> Value {
    let full_path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("fixtures")
        .join(fixture_path);
    let content = std::fs::read_to_string(&full_path)
        .unwrap_or_else(|_| panic!("Failed to load fixture: {}", full_path.display()));
    serde_json::from_str(&content).expect("Invalid JSON in fixture")
}

/// A records response whose rows are `{"row": "<n>", "_count": "1"}` for each `n`.
pub fn records_page(rows: impl IntoIterator<Item = usize>) -> Value {
    let records: Vec<Value> = rows
        .into_iter()
        .map(|n| json!({ "map": { "row": n.to_string(), "_count": "1" } }))
        .collect();
    json!({ "fields": [{"name": "row"}, {"name": "_count"}], "records": records })
}

/// A job status body in the given backend state.
pub fn job_status(state: &str) -> Value {
    json!({
        "state": state,
        "messageCount": 0,
        "histogramBuckets": [],
        "pendingErrors": [],
        "pendingWarnings": [],
        "recordCount": 0
    })
}
