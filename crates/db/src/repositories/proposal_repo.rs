//! Repository for the `proposals` and `proposal_items` tables.

use adops_core::pagination::{clamp_limit, clamp_offset, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use adops_core::types::DbId;
use sqlx::PgPool;

use crate::models::proposal::{
    CreateProposal, CreateProposalItem, Proposal, ProposalItem, ProposalListParams, UpdateProposal,
};

const COLUMNS: &str = "id, organization_id, campaign_id, created_by, client_name, title, status, \
                        valid_until, discount_pct, notes, created_at, updated_at";

const ITEM_COLUMNS: &str = "id, proposal_id, show_id, placement, pricing, rate, slots, episodes, \
                             estimated_downloads, created_at, updated_at";

pub struct ProposalRepo;

impl ProposalRepo {
    pub async fn create(
        pool: &PgPool,
        organization_id: DbId,
        created_by: DbId,
        input: &CreateProposal,
    ) -> Result<Proposal, sqlx::Error> {
        let query = format!(
            "INSERT INTO proposals
                (organization_id, campaign_id, created_by, client_name, title, valid_until,
                 discount_pct, notes)
             VALUES ($1, $2, $3, $4, $5, $6, COALESCE($7, 0), $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Proposal>(&query)
            .bind(organization_id)
            .bind(input.campaign_id)
            .bind(created_by)
            .bind(&input.client_name)
            .bind(&input.title)
            .bind(input.valid_until)
            .bind(input.discount_pct)
            .bind(&input.notes)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        organization_id: DbId,
        id: DbId,
    ) -> Result<Option<Proposal>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM proposals
             WHERE id = $1 AND organization_id = $2 AND deleted_at IS NULL"
        );
        sqlx::query_as::<_, Proposal>(&query)
            .bind(id)
            .bind(organization_id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(
        pool: &PgPool,
        organization_id: DbId,
        params: &ProposalListParams,
    ) -> Result<Vec<Proposal>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM proposals
             WHERE organization_id = $1
               AND deleted_at IS NULL
               AND ($2::TEXT IS NULL OR status = $2)
               AND ($3::BIGINT IS NULL OR campaign_id = $3)
             ORDER BY created_at DESC, id DESC
             LIMIT $4 OFFSET $5"
        );
        sqlx::query_as::<_, Proposal>(&query)
            .bind(organization_id)
            .bind(&params.status)
            .bind(params.campaign_id)
            .bind(clamp_limit(params.limit, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE))
            .bind(clamp_offset(params.offset))
            .fetch_all(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        organization_id: DbId,
        id: DbId,
        input: &UpdateProposal,
    ) -> Result<Option<Proposal>, sqlx::Error> {
        let query = format!(
            "UPDATE proposals SET
                campaign_id = COALESCE($3, campaign_id),
                client_name = COALESCE($4, client_name),
                title = COALESCE($5, title),
                valid_until = COALESCE($6, valid_until),
                discount_pct = COALESCE($7, discount_pct),
                notes = COALESCE($8, notes)
             WHERE id = $1 AND organization_id = $2 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Proposal>(&query)
            .bind(id)
            .bind(organization_id)
            .bind(input.campaign_id)
            .bind(&input.client_name)
            .bind(&input.title)
            .bind(input.valid_until)
            .bind(input.discount_pct)
            .bind(&input.notes)
            .fetch_optional(pool)
            .await
    }

    pub async fn set_status(
        pool: &PgPool,
        organization_id: DbId,
        id: DbId,
        status: &str,
    ) -> Result<Option<Proposal>, sqlx::Error> {
        let query = format!(
            "UPDATE proposals SET status = $3
             WHERE id = $1 AND organization_id = $2 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Proposal>(&query)
            .bind(id)
            .bind(organization_id)
            .bind(status)
            .fetch_optional(pool)
            .await
    }

    pub async fn soft_delete(
        pool: &PgPool,
        organization_id: DbId,
        id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE proposals SET deleted_at = NOW()
             WHERE id = $1 AND organization_id = $2 AND deleted_at IS NULL",
        )
        .bind(id)
        .bind(organization_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    // -----------------------------------------------------------------------
    // Line items
    // -----------------------------------------------------------------------

    pub async fn add_item(
        pool: &PgPool,
        proposal_id: DbId,
        input: &CreateProposalItem,
    ) -> Result<ProposalItem, sqlx::Error> {
        let query = format!(
            "INSERT INTO proposal_items
                (proposal_id, show_id, placement, pricing, rate, slots, episodes, estimated_downloads)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {ITEM_COLUMNS}"
        );
        sqlx::query_as::<_, ProposalItem>(&query)
            .bind(proposal_id)
            .bind(input.show_id)
            .bind(&input.placement)
            .bind(&input.pricing)
            .bind(input.rate)
            .bind(input.slots)
            .bind(input.episodes)
            .bind(input.estimated_downloads)
            .fetch_one(pool)
            .await
    }

    pub async fn list_items(
        pool: &PgPool,
        proposal_id: DbId,
    ) -> Result<Vec<ProposalItem>, sqlx::Error> {
        let query = format!(
            "SELECT {ITEM_COLUMNS} FROM proposal_items WHERE proposal_id = $1 ORDER BY id"
        );
        sqlx::query_as::<_, ProposalItem>(&query)
            .bind(proposal_id)
            .fetch_all(pool)
            .await
    }

    pub async fn remove_item(
        pool: &PgPool,
        proposal_id: DbId,
        item_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM proposal_items WHERE id = $1 AND proposal_id = $2")
            .bind(item_id)
            .bind(proposal_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
