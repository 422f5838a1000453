//! Repository for the `talent_approvals` table.

use adops_core::pagination::{clamp_limit, clamp_offset, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use adops_core::talent_approval::APPROVAL_PENDING;
use adops_core::types::DbId;
use sqlx::PgPool;

use crate::models::talent_approval::{ApprovalListParams, CreateTalentApproval, TalentApproval};

const COLUMNS: &str = "id, organization_id, creative_id, show_id, requested_by, talent_user_id, \
                        status, request_notes, response_comment, responded_at, created_at, updated_at";

pub struct TalentApprovalRepo;

impl TalentApprovalRepo {
    /// Insert a pending request.
    ///
    /// A second pending request for the same creative and show violates
    /// `uq_talent_approvals_pending`.
    pub async fn create(
        pool: &PgPool,
        input: &CreateTalentApproval,
    ) -> Result<TalentApproval, sqlx::Error> {
        let query = format!(
            "INSERT INTO talent_approvals
                (organization_id, creative_id, show_id, requested_by, talent_user_id, request_notes)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, TalentApproval>(&query)
            .bind(input.organization_id)
            .bind(input.creative_id)
            .bind(input.show_id)
            .bind(input.requested_by)
            .bind(input.talent_user_id)
            .bind(&input.request_notes)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        organization_id: DbId,
        id: DbId,
    ) -> Result<Option<TalentApproval>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM talent_approvals WHERE id = $1 AND organization_id = $2"
        );
        sqlx::query_as::<_, TalentApproval>(&query)
            .bind(id)
            .bind(organization_id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_pending(
        pool: &PgPool,
        creative_id: DbId,
        show_id: DbId,
    ) -> Result<Option<TalentApproval>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM talent_approvals
             WHERE creative_id = $1 AND show_id = $2 AND status = $3"
        );
        sqlx::query_as::<_, TalentApproval>(&query)
            .bind(creative_id)
            .bind(show_id)
            .bind(APPROVAL_PENDING)
            .fetch_optional(pool)
            .await
    }

    /// List requests, newest first. `talent_user_id` restricts to one assignee.
    pub async fn list(
        pool: &PgPool,
        organization_id: DbId,
        talent_user_id: Option<DbId>,
        params: &ApprovalListParams,
    ) -> Result<Vec<TalentApproval>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM talent_approvals
             WHERE organization_id = $1
               AND ($2::BIGINT IS NULL OR talent_user_id = $2)
               AND ($3::TEXT IS NULL OR status = $3)
             ORDER BY created_at DESC, id DESC
             LIMIT $4 OFFSET $5"
        );
        sqlx::query_as::<_, TalentApproval>(&query)
            .bind(organization_id)
            .bind(talent_user_id)
            .bind(&params.status)
            .bind(clamp_limit(params.limit, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE))
            .bind(clamp_offset(params.offset))
            .fetch_all(pool)
            .await
    }

    /// Record a decision on a pending request.
    ///
    /// Returns `None` when the request was answered in the meantime.
    pub async fn respond(
        pool: &PgPool,
        id: DbId,
        decision: &str,
        comment: Option<&str>,
    ) -> Result<Option<TalentApproval>, sqlx::Error> {
        let query = format!(
            "UPDATE talent_approvals SET
                status = $2,
                response_comment = $3,
                responded_at = NOW()
             WHERE id = $1 AND status = $4
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, TalentApproval>(&query)
            .bind(id)
            .bind(decision)
            .bind(comment)
            .bind(APPROVAL_PENDING)
            .fetch_optional(pool)
            .await
    }
}
