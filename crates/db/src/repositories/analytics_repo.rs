//! Repository for `episode_downloads`: ingest and per-show aggregation.

use adops_core::types::{Date, DbId};
use sqlx::PgPool;

use crate::models::analytics::{DailyDownloads, EpisodeDownloadTotal};

pub struct AnalyticsRepo;

impl AnalyticsRepo {
    /// Insert or overwrite daily counts for an episode. Returns rows written.
    ///
    /// Each day may appear at most once in `days`.
    pub async fn upsert_downloads(
        pool: &PgPool,
        episode_id: DbId,
        days: &[DailyDownloads],
    ) -> Result<u64, sqlx::Error> {
        let dates: Vec<Date> = days.iter().map(|d| d.day).collect();
        let counts: Vec<i64> = days.iter().map(|d| d.downloads).collect();
        let result = sqlx::query(
            "INSERT INTO episode_downloads (episode_id, day, downloads)
             SELECT $1, t.day, t.downloads
             FROM UNNEST($2::DATE[], $3::BIGINT[]) AS t(day, downloads)
             ON CONFLICT (episode_id, day) DO UPDATE SET downloads = EXCLUDED.downloads",
        )
        .bind(episode_id)
        .bind(&dates)
        .bind(&counts)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Total downloads for a show's live episodes on or after `since`.
    pub async fn total_for_show(
        pool: &PgPool,
        show_id: DbId,
        since: Date,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COALESCE(SUM(d.downloads), 0)::BIGINT
             FROM episode_downloads d
             JOIN episodes e ON e.id = d.episode_id
             WHERE e.show_id = $1 AND e.deleted_at IS NULL AND d.day >= $2",
        )
        .bind(show_id)
        .bind(since)
        .fetch_one(pool)
        .await
    }

    /// Mean downloads per episode, counting only episodes with data in the window.
    ///
    /// `None` when no episode has any downloads recorded since `since`.
    pub async fn average_per_episode(
        pool: &PgPool,
        show_id: DbId,
        since: Date,
    ) -> Result<Option<f64>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT AVG(t.total)::FLOAT8
             FROM (SELECT SUM(d.downloads) AS total
                     FROM episode_downloads d
                     JOIN episodes e ON e.id = d.episode_id
                    WHERE e.show_id = $1 AND e.deleted_at IS NULL AND d.day >= $2
                    GROUP BY d.episode_id) t",
        )
        .bind(show_id)
        .bind(since)
        .fetch_one(pool)
        .await
    }

    /// Per-episode totals in the window, most downloaded first.
    pub async fn per_episode(
        pool: &PgPool,
        show_id: DbId,
        since: Date,
    ) -> Result<Vec<EpisodeDownloadTotal>, sqlx::Error> {
        sqlx::query_as::<_, EpisodeDownloadTotal>(
            "SELECT e.id AS episode_id, e.title, SUM(d.downloads)::BIGINT AS downloads
             FROM episode_downloads d
             JOIN episodes e ON e.id = d.episode_id
             WHERE e.show_id = $1 AND e.deleted_at IS NULL AND d.day >= $2
             GROUP BY e.id, e.title
             ORDER BY downloads DESC, e.id",
        )
        .bind(show_id)
        .bind(since)
        .fetch_all(pool)
        .await
    }

    /// Show-wide downloads per day, oldest first. Days without data are absent.
    pub async fn daily_series(
        pool: &PgPool,
        show_id: DbId,
        since: Date,
    ) -> Result<Vec<DailyDownloads>, sqlx::Error> {
        sqlx::query_as::<_, DailyDownloads>(
            "SELECT d.day, SUM(d.downloads)::BIGINT AS downloads
             FROM episode_downloads d
             JOIN episodes e ON e.id = d.episode_id
             WHERE e.show_id = $1 AND e.deleted_at IS NULL AND d.day >= $2
             GROUP BY d.day
             ORDER BY d.day",
        )
        .bind(show_id)
        .bind(since)
        .fetch_all(pool)
        .await
    }
}
