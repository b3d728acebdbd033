//! JSON formatter implementation.

use anyhow::Result;
use serde_json::Value;
use sumo_client::Record;

use crate::formatters::Formatter;

/// Pretty-printed JSON.
pub struct JsonFormatter;

impl Formatter for JsonFormatter {
    fn format_records(&self, records: &[Record]) -> Result<String> {
        Ok(serde_json::to_string_pretty(records)?)
    }

    fn format_metrics(&self, response: &Value) -> Result<String> {
        Ok(serde_json::to_string_pretty(response)?)
    }
}
