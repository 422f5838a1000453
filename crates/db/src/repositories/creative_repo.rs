//! Repository for the `creatives` table.

use adops_core::types::DbId;
use sqlx::PgPool;

use crate::models::creative::{CreateCreative, Creative, UpdateCreative};

const COLUMNS: &str = "id, campaign_id, name, creative_type, script, audio_url, status, \
                        created_at, updated_at";

/// Restricts `campaign_id` to live campaigns of organization `$2`.
const ORG_SCOPE: &str =
    "campaign_id IN (SELECT id FROM campaigns WHERE organization_id = $2 AND deleted_at IS NULL)";

pub struct CreativeRepo;

impl CreativeRepo {
    pub async fn create(
        pool: &PgPool,
        campaign_id: DbId,
        input: &CreateCreative,
    ) -> Result<Creative, sqlx::Error> {
        let query = format!(
            "INSERT INTO creatives (campaign_id, name, creative_type, script, audio_url)
             VALUES ($1, $2, COALESCE($3, 'host_read'), $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Creative>(&query)
            .bind(campaign_id)
            .bind(&input.name)
            .bind(&input.creative_type)
            .bind(&input.script)
            .bind(&input.audio_url)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        organization_id: DbId,
        id: DbId,
    ) -> Result<Option<Creative>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM creatives WHERE id = $1 AND {ORG_SCOPE}");
        sqlx::query_as::<_, Creative>(&query)
            .bind(id)
            .bind(organization_id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list_for_campaign(
        pool: &PgPool,
        campaign_id: DbId,
    ) -> Result<Vec<Creative>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM creatives WHERE campaign_id = $1 ORDER BY created_at, id"
        );
        sqlx::query_as::<_, Creative>(&query)
            .bind(campaign_id)
            .fetch_all(pool)
            .await
    }

    /// Edit creative content.
    ///
    /// Changing the script or audio of a reviewed creative sends it back to
    /// `draft` so it has to be approved again.
    pub async fn update(
        pool: &PgPool,
        organization_id: DbId,
        id: DbId,
        input: &UpdateCreative,
    ) -> Result<Option<Creative>, sqlx::Error> {
        let query = format!(
            "UPDATE creatives SET
                name = COALESCE($3, name),
                creative_type = COALESCE($4, creative_type),
                script = COALESCE($5, script),
                audio_url = COALESCE($6, audio_url),
                status = CASE
                    WHEN ($5::TEXT IS NOT NULL AND $5 IS DISTINCT FROM script)
                      OR ($6::TEXT IS NOT NULL AND $6 IS DISTINCT FROM audio_url)
                    THEN 'draft'
                    ELSE status
                END
             WHERE id = $1 AND {ORG_SCOPE}
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Creative>(&query)
            .bind(id)
            .bind(organization_id)
            .bind(&input.name)
            .bind(&input.creative_type)
            .bind(&input.script)
            .bind(&input.audio_url)
            .fetch_optional(pool)
            .await
    }

    pub async fn set_status(
        pool: &PgPool,
        id: DbId,
        status: &str,
    ) -> Result<Option<Creative>, sqlx::Error> {
        let query = format!(
            "UPDATE creatives SET status = $2 WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Creative>(&query)
            .bind(id)
            .bind(status)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, organization_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let query = format!("DELETE FROM creatives WHERE id = $1 AND {ORG_SCOPE}");
        let result = sqlx::query(&query)
            .bind(id)
            .bind(organization_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
