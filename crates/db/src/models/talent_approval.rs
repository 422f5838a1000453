//! Talent approval request model and DTOs.

use adops_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `talent_approvals` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TalentApproval {
    pub id: DbId,
    pub organization_id: DbId,
    pub creative_id: DbId,
    pub show_id: DbId,
    pub requested_by: DbId,
    pub talent_user_id: DbId,
    pub status: String,
    pub request_notes: Option<String>,
    pub response_comment: Option<String>,
    pub responded_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Request body for `POST /talent-approvals`.
#[derive(Debug, Clone, Deserialize)]
pub struct RequestApproval {
    pub creative_id: DbId,
    pub show_id: DbId,
    pub notes: Option<String>,
}

/// Fully resolved insert, with the talent taken from the show.
#[derive(Debug, Clone)]
pub struct CreateTalentApproval {
    pub organization_id: DbId,
    pub creative_id: DbId,
    pub show_id: DbId,
    pub requested_by: DbId,
    pub talent_user_id: DbId,
    pub request_notes: Option<String>,
}

/// Request body for `POST /talent-approvals/{id}/respond`.
#[derive(Debug, Clone, Deserialize)]
pub struct RespondApproval {
    pub decision: String,
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApprovalListParams {
    pub status: Option<String>,
    /// Only requests assigned to the caller.
    #[serde(default)]
    pub mine: bool,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
