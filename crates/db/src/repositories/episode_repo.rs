//! Repository for the `episodes` table.
//!
//! Episodes belong to a show; organization scoping goes through the parent.

use adops_core::pagination::{clamp_limit, clamp_offset, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use adops_core::types::DbId;
use sqlx::PgPool;

use crate::models::episode::{CreateEpisode, Episode, UpdateEpisode};

const COLUMNS: &str = "id, show_id, title, episode_number, published_at, duration_secs, \
                        status, created_at, updated_at";

/// Restricts `show_id` to live shows of organization `$2`.
const ORG_SCOPE: &str =
    "show_id IN (SELECT id FROM shows WHERE organization_id = $2 AND deleted_at IS NULL)";

pub struct EpisodeRepo;

impl EpisodeRepo {
    /// Insert an episode under a show. The caller has already checked the show.
    pub async fn create(
        pool: &PgPool,
        show_id: DbId,
        input: &CreateEpisode,
    ) -> Result<Episode, sqlx::Error> {
        let query = format!(
            "INSERT INTO episodes (show_id, title, episode_number, published_at, duration_secs, status)
             VALUES ($1, $2, $3, $4, $5, COALESCE($6, 'draft'))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Episode>(&query)
            .bind(show_id)
            .bind(&input.title)
            .bind(input.episode_number)
            .bind(input.published_at)
            .bind(input.duration_secs)
            .bind(&input.status)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        organization_id: DbId,
        id: DbId,
    ) -> Result<Option<Episode>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM episodes
             WHERE id = $1 AND deleted_at IS NULL AND {ORG_SCOPE}"
        );
        sqlx::query_as::<_, Episode>(&query)
            .bind(id)
            .bind(organization_id)
            .fetch_optional(pool)
            .await
    }

    /// Episodes of a show, newest publication first, unpublished last.
    pub async fn list_for_show(
        pool: &PgPool,
        show_id: DbId,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<Episode>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM episodes
             WHERE show_id = $1 AND deleted_at IS NULL
             ORDER BY published_at DESC NULLS LAST, id DESC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Episode>(&query)
            .bind(show_id)
            .bind(clamp_limit(limit, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE))
            .bind(clamp_offset(offset))
            .fetch_all(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        organization_id: DbId,
        id: DbId,
        input: &UpdateEpisode,
    ) -> Result<Option<Episode>, sqlx::Error> {
        let query = format!(
            "UPDATE episodes SET
                title = COALESCE($3, title),
                episode_number = COALESCE($4, episode_number),
                published_at = COALESCE($5, published_at),
                duration_secs = COALESCE($6, duration_secs),
                status = COALESCE($7, status)
             WHERE id = $1 AND deleted_at IS NULL AND {ORG_SCOPE}
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Episode>(&query)
            .bind(id)
            .bind(organization_id)
            .bind(&input.title)
            .bind(input.episode_number)
            .bind(input.published_at)
            .bind(input.duration_secs)
            .bind(&input.status)
            .fetch_optional(pool)
            .await
    }

    pub async fn soft_delete(
        pool: &PgPool,
        organization_id: DbId,
        id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let query = format!(
            "UPDATE episodes SET deleted_at = NOW()
             WHERE id = $1 AND deleted_at IS NULL AND {ORG_SCOPE}"
        );
        let result = sqlx::query(&query)
            .bind(id)
            .bind(organization_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
