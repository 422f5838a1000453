//! Report export formats: CSV, JSON and PDF.
//!
//! Reports are first flattened into a [`Table`]; CSV and PDF render the
//! table while JSON serializes the typed report directly.

pub mod csv;
pub mod pdf;

use serde::Serialize;

use crate::error::CoreError;
use crate::types::Cents;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    Csv,
    Json,
    Pdf,
}

impl ReportFormat {
    /// Parse a `?format=` value. Absent means JSON.
    pub fn parse(value: Option<&str>) -> Result<Self, CoreError> {
        match value.map(str::to_ascii_lowercase).as_deref() {
            None | Some("json") => Ok(Self::Json),
            Some("csv") => Ok(Self::Csv),
            Some("pdf") => Ok(Self::Pdf),
            Some(other) => Err(CoreError::Validation(format!(
                "Unsupported export format '{other}'. Must be one of: csv, json, pdf"
            ))),
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            Self::Csv => "text/csv",
            Self::Json => "application/json",
            Self::Pdf => "application/pdf",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
            Self::Pdf => "pdf",
        }
    }
}

/// A titled grid of string cells.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub title: String,
    pub subtitle: Option<String>,
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(title: impl Into<String>, header: &[&str]) -> Self {
        Self {
            title: title.into(),
            subtitle: None,
            header: header.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    pub fn push_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }
}

/// Render cents as a plain decimal amount (`-1234.05`), without currency
/// symbols or grouping so spreadsheets parse it as a number.
pub fn format_cents(cents: Cents) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    format!("{sign}{}.{:02}", abs / 100, abs % 100)
}

/// Inverse of [`format_cents`].
pub fn parse_cents(value: &str) -> Option<Cents> {
    let value = value.trim();
    let (negative, digits) = match value.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, value),
    };
    let (whole, frac) = digits.split_once('.').unwrap_or((digits, "0"));
    if frac.len() > 2 {
        return None;
    }
    let whole: i64 = whole.parse().ok()?;
    let frac: i64 = format!("{frac:0<2}").parse().ok()?;
    let cents = whole * 100 + frac;
    Some(if negative { -cents } else { cents })
}
