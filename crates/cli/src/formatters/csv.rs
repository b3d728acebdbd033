//! CSV formatter implementation.
//!
//! Responsibilities:
//! - Format records as RFC 4180 CSV via the `csv` crate.
//! - Flatten nested JSON structures for tabular output.
//!
//! Invariants:
//! - The header is the sorted union of flattened keys; missing cells are empty.

use anyhow::{Context, Result};
use sumo_client::Record;

use crate::formatters::Formatter;
use crate::formatters::common::{all_columns, flatten_record};

pub struct CsvFormatter;

impl Formatter for CsvFormatter {
    fn format_records(&self, records: &[Record]) -> Result<String> {
        if records.is_empty() {
            return Ok(String::new());
        }

        let columns = all_columns(records);
        let mut writer = ::csv::Writer::from_writer(Vec::new());
        writer.write_record(&columns)?;

        for record in records {
            let flat = flatten_record(record);
            writer.write_record(
                columns
                    .iter()
                    .map(|c| flat.get(c).map(String::as_str).unwrap_or_default()),
            )?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| anyhow::anyhow!("Failed to flush CSV output: {}", e.error()))?;
        String::from_utf8(bytes).context("CSV output was not valid UTF-8")
    }
}
