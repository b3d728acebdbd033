//! Plain aligned table formatter.
//!
//! Invariants:
//! - Every column is padded to its widest cell (header included).
//! - An empty result set renders a human message instead of a bare header.

use anyhow::Result;
use sumo_client::Record;

use crate::formatters::Formatter;
use crate::formatters::common::{all_columns, flatten_record};

pub struct TableFormatter;

impl Formatter for TableFormatter {
    fn format_records(&self, records: &[Record]) -> Result<String> {
        if records.is_empty() {
            return Ok("No results found.\n".to_string());
        }

        let columns = all_columns(records);
        let rows: Vec<Vec<String>> = records
            .iter()
            .map(|record| {
                let mut flat = flatten_record(record);
                columns
                    .iter()
                    .map(|c| flat.remove(c).unwrap_or_default())
                    .collect()
            })
            .collect();

        let widths: Vec<usize> = columns
            .iter()
            .enumerate()
            .map(|(i, header)| {
                rows.iter()
                    .map(|row| row[i].chars().count())
                    .chain(std::iter::once(header.chars().count()))
                    .max()
                    .unwrap_or_default()
            })
            .collect();

        let mut output = String::new();
        push_line(&mut output, &columns, &widths);
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        push_line(&mut output, &rule, &widths);
        for row in &rows {
            push_line(&mut output, row, &widths);
        }

        Ok(output)
    }
}

fn push_line(output: &mut String, cells: &[String], widths: &[usize]) {
    let line: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{cell:<width$}"))
        .collect();
    output.push_str(line.join("  ").trim_end());
    output.push('\n');
}
