//! Proposal and line-item models and DTOs.

use adops_core::proposal::{LineItemInput, ProposalTotals};
use adops_core::types::{Cents, Date, DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `proposals` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Proposal {
    pub id: DbId,
    pub organization_id: DbId,
    pub campaign_id: Option<DbId>,
    pub created_by: Option<DbId>,
    pub client_name: String,
    pub title: String,
    pub status: String,
    pub valid_until: Option<Date>,
    pub discount_pct: f64,
    pub notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateProposal {
    pub campaign_id: Option<DbId>,
    pub client_name: String,
    pub title: String,
    pub valid_until: Option<Date>,
    /// Defaults to 0 if omitted.
    pub discount_pct: Option<f64>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateProposal {
    pub campaign_id: Option<DbId>,
    pub client_name: Option<String>,
    pub title: Option<String>,
    pub valid_until: Option<Date>,
    pub discount_pct: Option<f64>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProposalListParams {
    pub status: Option<String>,
    pub campaign_id: Option<DbId>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// A row from the `proposal_items` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProposalItem {
    pub id: DbId,
    pub proposal_id: DbId,
    pub show_id: DbId,
    pub placement: String,
    pub pricing: String,
    pub rate: f64,
    pub slots: i32,
    pub episodes: i32,
    pub estimated_downloads: Option<i64>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl ProposalItem {
    pub fn pricing_input(&self) -> LineItemInput {
        LineItemInput {
            pricing: self.pricing.clone(),
            rate: self.rate,
            slots: self.slots,
            episodes: self.episodes,
            estimated_downloads: self.estimated_downloads,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateProposalItem {
    pub show_id: DbId,
    pub placement: String,
    pub pricing: String,
    pub rate: f64,
    pub slots: i32,
    pub episodes: i32,
    pub estimated_downloads: Option<i64>,
}

impl CreateProposalItem {
    pub fn pricing_input(&self) -> LineItemInput {
        LineItemInput {
            pricing: self.pricing.clone(),
            rate: self.rate,
            slots: self.slots,
            episodes: self.episodes,
            estimated_downloads: self.estimated_downloads,
        }
    }
}

/// A line item with its computed total.
#[derive(Debug, Clone, Serialize)]
pub struct PricedProposalItem {
    #[serde(flatten)]
    pub item: ProposalItem,
    pub line_total_cents: Cents,
}

/// `GET /proposals/{id}` payload.
#[derive(Debug, Clone, Serialize)]
pub struct ProposalDetail {
    #[serde(flatten)]
    pub proposal: Proposal,
    pub items: Vec<PricedProposalItem>,
    pub totals: ProposalTotals,
}
