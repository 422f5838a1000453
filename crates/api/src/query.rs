//! Shared query parameter types for API handlers.

use adops_core::error::CoreError;
use adops_core::pagination::{clamp_limit, clamp_offset, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use adops_core::types::Date;
use adops_core::validation::validate_date_range;
use serde::Deserialize;

/// Generic pagination parameters (`?limit=&offset=`).
#[derive(Debug, Default, Deserialize)]
pub struct PaginationParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl PaginationParams {
    /// Clamped `(limit, offset)` pair.
    pub fn resolve(&self) -> (i64, i64) {
        (
            clamp_limit(self.limit, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE),
            clamp_offset(self.offset),
        )
    }
}

/// Inclusive reporting period (`?from=YYYY-MM-DD&to=YYYY-MM-DD`).
#[derive(Debug, Default, Deserialize)]
pub struct DateRangeParams {
    pub from: Option<Date>,
    pub to: Option<Date>,
}

impl DateRangeParams {
    pub fn validate(&self) -> Result<(), CoreError> {
        validate_date_range(self.from, self.to)
    }

    /// Human-readable period used in report titles.
    pub fn describe(&self) -> String {
        match (self.from, self.to) {
            (Some(from), Some(to)) => format!("{from} to {to}"),
            (Some(from), None) => format!("Since {from}"),
            (None, Some(to)) => format!("Through {to}"),
            (None, None) => "All time".to_string(),
        }
    }
}

/// `?format=csv|json|pdf&from=&to=` for report exports.
#[derive(Debug, Default, Deserialize)]
pub struct ExportParams {
    pub format: Option<String>,
    pub from: Option<Date>,
    pub to: Option<Date>,
}

impl ExportParams {
    pub fn period(&self) -> DateRangeParams {
        DateRangeParams {
            from: self.from,
            to: self.to,
        }
    }
}

/// `?days=N` trailing analytics window.
#[derive(Debug, Default, Deserialize)]
pub struct AnalyticsParams {
    pub days: Option<i64>,
}

/// Default trailing window for analytics and measured download averages.
pub const DEFAULT_ANALYTICS_DAYS: i64 = 30;
/// Longest window accepted by `?days=`.
pub const MAX_ANALYTICS_DAYS: i64 = 365;

impl AnalyticsParams {
    pub fn days(&self) -> i64 {
        self.days
            .unwrap_or(DEFAULT_ANALYTICS_DAYS)
            .clamp(1, MAX_ANALYTICS_DAYS)
    }
}
