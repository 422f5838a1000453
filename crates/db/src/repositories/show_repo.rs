//! Repository for the `shows` table.

use adops_core::pagination::{clamp_limit, clamp_offset, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use adops_core::revenue::RevenueSettings;
use adops_core::types::DbId;
use sqlx::PgPool;

use crate::models::show::{CreateShow, Show, ShowListParams, UpdateShow};

const COLUMNS: &str = "id, organization_id, name, description, host_name, talent_user_id, \
    category, status, pricing_model, \
    pre_roll_cpm, pre_roll_spot_cost, pre_roll_slots, \
    mid_roll_cpm, mid_roll_spot_cost, mid_roll_slots, \
    post_roll_cpm, post_roll_spot_cost, post_roll_slots, \
    avg_downloads_override, revenue_share_pct, created_at, updated_at";

/// CRUD and revenue-settings access for shows. All reads skip soft-deleted rows.
pub struct ShowRepo;

impl ShowRepo {
    pub async fn create(
        pool: &PgPool,
        organization_id: DbId,
        input: &CreateShow,
    ) -> Result<Show, sqlx::Error> {
        let query = format!(
            "INSERT INTO shows
                (organization_id, name, description, host_name, talent_user_id, category,
                 status, revenue_share_pct)
             VALUES ($1, $2, $3, $4, $5, $6, COALESCE($7, 'active'), COALESCE($8, 0))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Show>(&query)
            .bind(organization_id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.host_name)
            .bind(input.talent_user_id)
            .bind(&input.category)
            .bind(&input.status)
            .bind(input.revenue_share_pct)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        organization_id: DbId,
        id: DbId,
    ) -> Result<Option<Show>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM shows
             WHERE id = $1 AND organization_id = $2 AND deleted_at IS NULL"
        );
        sqlx::query_as::<_, Show>(&query)
            .bind(id)
            .bind(organization_id)
            .fetch_optional(pool)
            .await
    }

    /// List shows alphabetically, optionally filtered by status.
    pub async fn list(
        pool: &PgPool,
        organization_id: DbId,
        params: &ShowListParams,
    ) -> Result<Vec<Show>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM shows
             WHERE organization_id = $1
               AND deleted_at IS NULL
               AND ($2::TEXT IS NULL OR status = $2)
             ORDER BY name ASC
             LIMIT $3 OFFSET $4"
        );
        sqlx::query_as::<_, Show>(&query)
            .bind(organization_id)
            .bind(&params.status)
            .bind(clamp_limit(params.limit, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE))
            .bind(clamp_offset(params.offset))
            .fetch_all(pool)
            .await
    }

    /// Every live show in the organization. Used by reporting.
    pub async fn list_all(pool: &PgPool, organization_id: DbId) -> Result<Vec<Show>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM shows
             WHERE organization_id = $1 AND deleted_at IS NULL
             ORDER BY name ASC"
        );
        sqlx::query_as::<_, Show>(&query)
            .bind(organization_id)
            .fetch_all(pool)
            .await
    }

    /// Shows whose approvals are routed to the given talent user.
    pub async fn list_for_talent(
        pool: &PgPool,
        organization_id: DbId,
        talent_user_id: DbId,
    ) -> Result<Vec<Show>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM shows
             WHERE organization_id = $1 AND talent_user_id = $2 AND deleted_at IS NULL
             ORDER BY name ASC"
        );
        sqlx::query_as::<_, Show>(&query)
            .bind(organization_id)
            .bind(talent_user_id)
            .fetch_all(pool)
            .await
    }

    /// Update a show. Only non-`None` fields in `input` are applied.
    pub async fn update(
        pool: &PgPool,
        organization_id: DbId,
        id: DbId,
        input: &UpdateShow,
    ) -> Result<Option<Show>, sqlx::Error> {
        let query = format!(
            "UPDATE shows SET
                name = COALESCE($3, name),
                description = COALESCE($4, description),
                host_name = COALESCE($5, host_name),
                talent_user_id = COALESCE($6, talent_user_id),
                category = COALESCE($7, category),
                status = COALESCE($8, status),
                revenue_share_pct = COALESCE($9, revenue_share_pct)
             WHERE id = $1 AND organization_id = $2 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Show>(&query)
            .bind(id)
            .bind(organization_id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(&input.host_name)
            .bind(input.talent_user_id)
            .bind(&input.category)
            .bind(&input.status)
            .bind(input.revenue_share_pct)
            .fetch_optional(pool)
            .await
    }

    /// Replace the whole rate card. Absent rates are stored as NULL.
    pub async fn update_revenue_settings(
        pool: &PgPool,
        organization_id: DbId,
        id: DbId,
        settings: &RevenueSettings,
    ) -> Result<Option<Show>, sqlx::Error> {
        let query = format!(
            "UPDATE shows SET
                pricing_model = $3,
                pre_roll_cpm = $4, pre_roll_spot_cost = $5, pre_roll_slots = $6,
                mid_roll_cpm = $7, mid_roll_spot_cost = $8, mid_roll_slots = $9,
                post_roll_cpm = $10, post_roll_spot_cost = $11, post_roll_slots = $12,
                avg_downloads_override = $13
             WHERE id = $1 AND organization_id = $2 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Show>(&query)
            .bind(id)
            .bind(organization_id)
            .bind(settings.pricing_model.as_str())
            .bind(settings.pre_roll.cpm)
            .bind(settings.pre_roll.spot_cost)
            .bind(settings.pre_roll.slots)
            .bind(settings.mid_roll.cpm)
            .bind(settings.mid_roll.spot_cost)
            .bind(settings.mid_roll.slots)
            .bind(settings.post_roll.cpm)
            .bind(settings.post_roll.spot_cost)
            .bind(settings.post_roll.slots)
            .bind(settings.avg_downloads_override)
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete a show. Returns `true` if a row was marked deleted.
    pub async fn soft_delete(
        pool: &PgPool,
        organization_id: DbId,
        id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE shows SET deleted_at = NOW()
             WHERE id = $1 AND organization_id = $2 AND deleted_at IS NULL",
        )
        .bind(id)
        .bind(organization_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
