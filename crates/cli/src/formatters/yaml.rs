//! YAML formatter implementation.

use anyhow::Result;
use serde_json::Value;
use sumo_client::Record;

use crate::formatters::Formatter;

pub struct YamlFormatter;

impl Formatter for YamlFormatter {
    fn format_records(&self, records: &[Record]) -> Result<String> {
        Ok(serde_yaml::to_string(records)?)
    }

    fn format_metrics(&self, response: &Value) -> Result<String> {
        Ok(serde_yaml::to_string(response)?)
    }
}
