//! RFC 4180 CSV: a string-built writer and a reader on the `csv` crate.

use super::Table;
use crate::error::CoreError;

/// Quote a field when it contains a delimiter, quote or line break.
pub fn escape(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Render a table as CSV: header row then data rows, `\n` line endings.
pub fn build(table: &Table) -> String {
    let mut out = String::new();
    for row in std::iter::once(&table.header).chain(table.rows.iter()) {
        let line: Vec<String> = row.iter().map(|cell| escape(cell)).collect();
        out.push_str(&line.join(","));
        out.push('\n');
    }
    out
}

/// Parse CSV text into rows of fields. Quoted fields may span lines.
pub fn parse(text: &str) -> Result<Vec<Vec<String>>, CoreError> {
    ::csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes())
        .records()
        .map(|record| {
            record
                .map(|r| r.iter().map(str::to_string).collect())
                .map_err(|e| CoreError::Validation(format!("Malformed CSV: {e}")))
        })
        .collect()
}
