//! Expense entity model and DTOs.

use adops_core::types::{Cents, Date, DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `expenses` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Expense {
    pub id: DbId,
    pub organization_id: DbId,
    pub show_id: Option<DbId>,
    pub category: String,
    pub description: String,
    pub amount_cents: Cents,
    pub incurred_on: Date,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateExpense {
    pub show_id: Option<DbId>,
    pub category: String,
    pub description: String,
    pub amount_cents: Cents,
    pub incurred_on: Date,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateExpense {
    pub show_id: Option<DbId>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub amount_cents: Option<Cents>,
    pub incurred_on: Option<Date>,
}

/// Filters for `GET /expenses`. Date bounds are inclusive.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExpenseListParams {
    pub show_id: Option<DbId>,
    pub category: Option<String>,
    pub from: Option<Date>,
    pub to: Option<Date>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
