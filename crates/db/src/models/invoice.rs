//! Invoice and payment models and DTOs.

use adops_core::types::{Cents, Date, DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `invoices` table with its paid total.
///
/// `paid_cents` is aggregated from `payments` in every query.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Invoice {
    pub id: DbId,
    pub organization_id: DbId,
    pub campaign_id: Option<DbId>,
    pub show_id: Option<DbId>,
    pub invoice_number: String,
    pub client_name: String,
    pub amount_cents: Cents,
    pub paid_cents: Cents,
    pub issued_on: Date,
    pub due_on: Date,
    pub status: String,
    pub notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateInvoice {
    pub campaign_id: Option<DbId>,
    pub show_id: Option<DbId>,
    pub invoice_number: String,
    pub client_name: String,
    pub amount_cents: Cents,
    pub issued_on: Date,
    pub due_on: Date,
    pub notes: Option<String>,
}

/// DTO for editing an invoice. Only drafts accept edits.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateInvoice {
    pub campaign_id: Option<DbId>,
    pub show_id: Option<DbId>,
    pub client_name: Option<String>,
    pub amount_cents: Option<Cents>,
    pub issued_on: Option<Date>,
    pub due_on: Option<Date>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct InvoiceListParams {
    pub status: Option<String>,
    pub campaign_id: Option<DbId>,
    pub show_id: Option<DbId>,
    pub from: Option<Date>,
    pub to: Option<Date>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// A row from the `payments` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Payment {
    pub id: DbId,
    pub invoice_id: DbId,
    pub recorded_by: Option<DbId>,
    pub amount_cents: Cents,
    pub paid_on: Date,
    pub method: String,
    pub reference: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreatePayment {
    pub amount_cents: Cents,
    pub paid_on: Date,
    /// Defaults to `ach` if omitted.
    pub method: Option<String>,
    pub reference: Option<String>,
}
