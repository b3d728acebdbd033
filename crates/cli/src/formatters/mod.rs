//! Output formatters for CLI commands.
//!
//! Responsibilities:
//! - Provide multiple output formats: JSON, Table, CSV, and YAML.
//! - Render search records and metrics query responses through one `Formatter` trait.
//!
//! Does NOT handle:
//! - Direct printing to stdout (returns formatted strings; see `common::output_result`).
//!
//! Invariants:
//! - Column order is the sorted union of keys across all rows.
//! - Nested values are flattened with dot notation for CSV and Table.
//!
//! ## Empty-State Handling
//!
//! | Format | Empty State Behavior |
//! |--------|---------------------|
//! | JSON | `[]` |
//! | YAML | `[]` |
//! | CSV | empty output |
//! | Table | `No results found.` |

use anyhow::Result;
use clap::ValueEnum;
use serde_json::Value;
use sumo_client::Record;

mod common;
mod csv;
mod json;
mod table;
mod yaml;

pub use common::{metrics_rows, output_result};
pub use csv::CsvFormatter;
pub use json::JsonFormatter;
pub use table::TableFormatter;
pub use yaml::YamlFormatter;

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Yaml,
}

/// Renders command results in one output format.
pub trait Formatter {
    /// Format search job records.
    fn format_records(&self, records: &[Record]) -> Result<String>;

    /// Format a metrics query response.
    ///
    /// Tabular formats render one row per data point; document formats keep
    /// the response as returned.
    fn format_metrics(&self, response: &Value) -> Result<String> {
        self.format_records(&metrics_rows(response))
    }
}

/// Get a formatter for the specified format.
pub fn get_formatter(format: OutputFormat) -> Box<dyn Formatter> {
    match format {
        OutputFormat::Json => Box::new(JsonFormatter),
        OutputFormat::Table => Box::new(TableFormatter),
        OutputFormat::Csv => Box::new(CsvFormatter),
        OutputFormat::Yaml => Box::new(YamlFormatter),
    }
}
