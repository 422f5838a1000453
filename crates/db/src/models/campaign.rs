//! Campaign and flight models and DTOs.

use adops_core::types::{Cents, Date, DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `campaigns` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Campaign {
    pub id: DbId,
    pub organization_id: DbId,
    pub advertiser_name: String,
    pub name: String,
    pub status: String,
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
    pub budget_cents: Cents,
    pub notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateCampaign {
    pub advertiser_name: String,
    pub name: String,
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
    /// Defaults to 0 if omitted.
    pub budget_cents: Option<Cents>,
    pub notes: Option<String>,
}

/// DTO for updating a campaign. Status moves through its own endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateCampaign {
    pub advertiser_name: Option<String>,
    pub name: Option<String>,
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
    pub budget_cents: Option<Cents>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CampaignListParams {
    pub status: Option<String>,
    pub advertiser: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// A row from the `campaign_shows` table: one placement of a campaign on a show.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CampaignShow {
    pub id: DbId,
    pub campaign_id: DbId,
    pub show_id: DbId,
    pub placement: String,
    pub slots: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateCampaignShow {
    pub show_id: DbId,
    pub placement: String,
    /// Defaults to 1 if omitted.
    pub slots: Option<i32>,
}
