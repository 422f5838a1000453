//! Creative entity model and DTOs.

use adops_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `creatives` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Creative {
    pub id: DbId,
    pub campaign_id: DbId,
    pub name: String,
    pub creative_type: String,
    pub script: Option<String>,
    pub audio_url: Option<String>,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateCreative {
    pub name: String,
    /// Defaults to `host_read` if omitted.
    pub creative_type: Option<String>,
    pub script: Option<String>,
    pub audio_url: Option<String>,
}

/// DTO for editing creative content. Status follows the approval flow.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateCreative {
    pub name: Option<String>,
    pub creative_type: Option<String>,
    pub script: Option<String>,
    pub audio_url: Option<String>,
}
