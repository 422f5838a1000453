//! Aggregates for revenue, expense and P&L reporting.

use adops_core::types::{Cents, DbId};
use serde::Serialize;
use sqlx::FromRow;

/// Revenue and expense totals for one show inside a reporting period.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ShowFinancials {
    pub show_id: DbId,
    pub show_name: String,
    pub revenue_share_pct: f64,
    pub revenue_cents: Cents,
    pub expense_cents: Cents,
}

/// Totals not attributed to any show.
#[derive(Debug, Clone, Default, FromRow, Serialize)]
pub struct UnattributedTotals {
    pub revenue_cents: Cents,
    pub expense_cents: Cents,
}

/// Invoice-side totals for an organization inside a period.
#[derive(Debug, Clone, Default, FromRow, Serialize)]
pub struct InvoiceTotals {
    pub invoiced_cents: Cents,
    pub collected_cents: Cents,
    pub outstanding_cents: Cents,
}
