//! Organization entity model and DTOs.

use adops_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `organizations` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Organization {
    pub id: DbId,
    pub name: String,
    pub slug: String,
    pub contact_email: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateOrganization {
    pub name: String,
    pub slug: String,
    pub contact_email: Option<String>,
}

/// DTO for updating the caller's organization. All fields are optional.
/// First admin account created alongside a new organization.
#[derive(Debug, Clone)]
pub struct NewOwner {
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateOrganization {
    pub name: Option<String>,
    pub contact_email: Option<String>,
}

/// Headline counts for the organization dashboard.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct OrganizationOverview {
    pub show_count: i64,
    pub active_campaign_count: i64,
    pub open_invoice_count: i64,
    pub outstanding_cents: i64,
    pub pending_approval_count: i64,
}
