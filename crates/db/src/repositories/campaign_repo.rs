//! Repository for the `campaigns` and `campaign_shows` tables.

use adops_core::pagination::{clamp_limit, clamp_offset, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use adops_core::types::DbId;
use sqlx::PgPool;

use crate::models::campaign::{
    Campaign, CampaignListParams, CampaignShow, CreateCampaign, CreateCampaignShow, UpdateCampaign,
};

const COLUMNS: &str = "id, organization_id, advertiser_name, name, status, start_date, end_date, \
                        budget_cents, notes, created_at, updated_at";

const FLIGHT_COLUMNS: &str = "id, campaign_id, show_id, placement, slots, created_at, updated_at";

pub struct CampaignRepo;

impl CampaignRepo {
    pub async fn create(
        pool: &PgPool,
        organization_id: DbId,
        input: &CreateCampaign,
    ) -> Result<Campaign, sqlx::Error> {
        let query = format!(
            "INSERT INTO campaigns
                (organization_id, advertiser_name, name, start_date, end_date, budget_cents, notes)
             VALUES ($1, $2, $3, $4, $5, COALESCE($6, 0), $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Campaign>(&query)
            .bind(organization_id)
            .bind(&input.advertiser_name)
            .bind(&input.name)
            .bind(input.start_date)
            .bind(input.end_date)
            .bind(input.budget_cents)
            .bind(&input.notes)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        organization_id: DbId,
        id: DbId,
    ) -> Result<Option<Campaign>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM campaigns
             WHERE id = $1 AND organization_id = $2 AND deleted_at IS NULL"
        );
        sqlx::query_as::<_, Campaign>(&query)
            .bind(id)
            .bind(organization_id)
            .fetch_optional(pool)
            .await
    }

    /// List campaigns, newest first. `advertiser` is a case-insensitive substring match.
    pub async fn list(
        pool: &PgPool,
        organization_id: DbId,
        params: &CampaignListParams,
    ) -> Result<Vec<Campaign>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM campaigns
             WHERE organization_id = $1
               AND deleted_at IS NULL
               AND ($2::TEXT IS NULL OR status = $2)
               AND ($3::TEXT IS NULL OR advertiser_name ILIKE '%' || $3 || '%')
             ORDER BY created_at DESC, id DESC
             LIMIT $4 OFFSET $5"
        );
        sqlx::query_as::<_, Campaign>(&query)
            .bind(organization_id)
            .bind(&params.status)
            .bind(&params.advertiser)
            .bind(clamp_limit(params.limit, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE))
            .bind(clamp_offset(params.offset))
            .fetch_all(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        organization_id: DbId,
        id: DbId,
        input: &UpdateCampaign,
    ) -> Result<Option<Campaign>, sqlx::Error> {
        let query = format!(
            "UPDATE campaigns SET
                advertiser_name = COALESCE($3, advertiser_name),
                name = COALESCE($4, name),
                start_date = COALESCE($5, start_date),
                end_date = COALESCE($6, end_date),
                budget_cents = COALESCE($7, budget_cents),
                notes = COALESCE($8, notes)
             WHERE id = $1 AND organization_id = $2 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Campaign>(&query)
            .bind(id)
            .bind(organization_id)
            .bind(&input.advertiser_name)
            .bind(&input.name)
            .bind(input.start_date)
            .bind(input.end_date)
            .bind(input.budget_cents)
            .bind(&input.notes)
            .fetch_optional(pool)
            .await
    }

    pub async fn set_status(
        pool: &PgPool,
        organization_id: DbId,
        id: DbId,
        status: &str,
    ) -> Result<Option<Campaign>, sqlx::Error> {
        let query = format!(
            "UPDATE campaigns SET status = $3
             WHERE id = $1 AND organization_id = $2 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Campaign>(&query)
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
            "UPDATE campaigns SET deleted_at = NOW()
             WHERE id = $1 AND organization_id = $2 AND deleted_at IS NULL",
        )
        .bind(id)
        .bind(organization_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    // -----------------------------------------------------------------------
    // Flights
    // -----------------------------------------------------------------------

    pub async fn add_flight(
        pool: &PgPool,
        campaign_id: DbId,
        input: &CreateCampaignShow,
    ) -> Result<CampaignShow, sqlx::Error> {
        let query = format!(
            "INSERT INTO campaign_shows (campaign_id, show_id, placement, slots)
             VALUES ($1, $2, $3, COALESCE($4, 1))
             RETURNING {FLIGHT_COLUMNS}"
        );
        sqlx::query_as::<_, CampaignShow>(&query)
            .bind(campaign_id)
            .bind(input.show_id)
            .bind(&input.placement)
            .bind(input.slots)
            .fetch_one(pool)
            .await
    }

    pub async fn list_flights(
        pool: &PgPool,
        campaign_id: DbId,
    ) -> Result<Vec<CampaignShow>, sqlx::Error> {
        let query = format!(
            "SELECT {FLIGHT_COLUMNS} FROM campaign_shows
             WHERE campaign_id = $1
             ORDER BY show_id, placement"
        );
        sqlx::query_as::<_, CampaignShow>(&query)
            .bind(campaign_id)
            .fetch_all(pool)
            .await
    }

    /// Campaigns flighted on a show, for the show detail page.
    pub async fn list_for_show(
        pool: &PgPool,
        organization_id: DbId,
        show_id: DbId,
    ) -> Result<Vec<Campaign>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM campaigns
             WHERE organization_id = $1
               AND deleted_at IS NULL
               AND id IN (SELECT campaign_id FROM campaign_shows WHERE show_id = $2)
             ORDER BY start_date DESC NULLS LAST, id DESC"
        );
        sqlx::query_as::<_, Campaign>(&query)
            .bind(organization_id)
            .bind(show_id)
            .fetch_all(pool)
            .await
    }

    pub async fn remove_flight(
        pool: &PgPool,
        campaign_id: DbId,
        flight_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM campaign_shows WHERE id = $1 AND campaign_id = $2")
            .bind(flight_id)
            .bind(campaign_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
