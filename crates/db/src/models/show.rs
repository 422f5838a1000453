//! Show entity model, DTOs and revenue-settings mapping.

use adops_core::revenue::{PlacementRate, PricingModel, RevenueSettings};
use adops_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `shows` table, revenue columns included.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Show {
    pub id: DbId,
    pub organization_id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub host_name: Option<String>,
    pub talent_user_id: Option<DbId>,
    pub category: Option<String>,
    pub status: String,
    pub pricing_model: String,
    pub pre_roll_cpm: Option<f64>,
    pub pre_roll_spot_cost: Option<f64>,
    pub pre_roll_slots: Option<i32>,
    pub mid_roll_cpm: Option<f64>,
    pub mid_roll_spot_cost: Option<f64>,
    pub mid_roll_slots: Option<i32>,
    pub post_roll_cpm: Option<f64>,
    pub post_roll_spot_cost: Option<f64>,
    pub post_roll_slots: Option<i32>,
    pub avg_downloads_override: Option<f64>,
    pub revenue_share_pct: f64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Show {
    /// Assemble the structured rate card from the flat revenue columns.
    ///
    /// An unrecognized stored pricing model reads as the default (CPM).
    pub fn revenue_settings(&self) -> RevenueSettings {
        RevenueSettings {
            pricing_model: PricingModel::parse(&self.pricing_model).unwrap_or_default(),
            pre_roll: PlacementRate {
                cpm: self.pre_roll_cpm,
                spot_cost: self.pre_roll_spot_cost,
                slots: self.pre_roll_slots,
            },
            mid_roll: PlacementRate {
                cpm: self.mid_roll_cpm,
                spot_cost: self.mid_roll_spot_cost,
                slots: self.mid_roll_slots,
            },
            post_roll: PlacementRate {
                cpm: self.post_roll_cpm,
                spot_cost: self.post_roll_spot_cost,
                slots: self.post_roll_slots,
            },
            avg_downloads_override: self.avg_downloads_override,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateShow {
    pub name: String,
    pub description: Option<String>,
    pub host_name: Option<String>,
    pub talent_user_id: Option<DbId>,
    pub category: Option<String>,
    /// Defaults to `active` if omitted.
    pub status: Option<String>,
    /// Defaults to 0 if omitted.
    pub revenue_share_pct: Option<f64>,
}

/// DTO for updating a show. Revenue settings have their own endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateShow {
    pub name: Option<String>,
    pub description: Option<String>,
    pub host_name: Option<String>,
    pub talent_user_id: Option<DbId>,
    pub category: Option<String>,
    pub status: Option<String>,
    pub revenue_share_pct: Option<f64>,
}

/// Filters for `GET /shows`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ShowListParams {
    pub status: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
