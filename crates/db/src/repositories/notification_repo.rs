//! Per-user inbox rows in `notifications`.

use adops_core::types::DbId;
use sqlx::PgPool;

use crate::models::notification::{InboxFilter, Notification, NotificationContent};

const NOTIFICATION_COLUMNS: &str = "id, user_id, event_type, title, body, entity_type, \
                                    entity_id, is_read, read_at, created_at";

pub struct NotificationRepo;

impl NotificationRepo {
    /// Deliver the same content to every user in `user_ids` with one insert.
    /// Returns the rows in recipient order.
    pub async fn create_for_users(
        pool: &PgPool,
        user_ids: &[DbId],
        content: &NotificationContent,
    ) -> Result<Vec<Notification>, sqlx::Error> {
        if user_ids.is_empty() {
            return Ok(Vec::new());
        }
        let sql = format!(
            "INSERT INTO notifications \
                 (user_id, event_type, title, body, entity_type, entity_id) \
             SELECT recipient, $2, $3, $4, $5, $6 \
             FROM UNNEST($1::BIGINT[]) WITH ORDINALITY AS r(recipient, ord) \
             ORDER BY ord \
             RETURNING {NOTIFICATION_COLUMNS}"
        );
        sqlx::query_as::<_, Notification>(&sql)
            .bind(user_ids)
            .bind(&content.event_type)
            .bind(&content.title)
            .bind(content.body.as_deref())
            .bind(content.entity_type.as_deref())
            .bind(content.entity_id)
            .fetch_all(pool)
            .await
    }

    /// A page of the user's inbox, newest first.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
        filter: &InboxFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Notification>, sqlx::Error> {
        let sql = format!(
            "SELECT {NOTIFICATION_COLUMNS} FROM notifications \
             WHERE user_id = $1 \
               AND ($2 = false OR is_read = false) \
               AND ($3::TEXT IS NULL OR split_part(event_type, '.', 1) = $3) \
             ORDER BY created_at DESC, id DESC \
             LIMIT $4 OFFSET $5"
        );
        sqlx::query_as::<_, Notification>(&sql)
            .bind(user_id)
            .bind(filter.unread_only)
            .bind(filter.category.as_deref())
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// `false` when the notification does not exist or belongs to someone else.
    pub async fn mark_read(
        pool: &PgPool,
        user_id: DbId,
        notification_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let done = sqlx::query(
            "UPDATE notifications SET is_read = true, read_at = COALESCE(read_at, NOW()) \
             WHERE id = $1 AND user_id = $2",
        )
        .bind(notification_id)
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(done.rows_affected() == 1)
    }

    /// Mark the user's unread notifications read, optionally one category
    /// only. Returns how many changed.
    pub async fn mark_all_read(
        pool: &PgPool,
        user_id: DbId,
        category: Option<&str>,
    ) -> Result<u64, sqlx::Error> {
        let done = sqlx::query(
            "UPDATE notifications SET is_read = true, read_at = NOW() \
             WHERE user_id = $1 AND is_read = false \
               AND ($2::TEXT IS NULL OR split_part(event_type, '.', 1) = $2)",
        )
        .bind(user_id)
        .bind(category)
        .execute(pool)
        .await?;
        Ok(done.rows_affected())
    }

    pub async fn unread_count(pool: &PgPool, user_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM notifications WHERE user_id = $1 AND is_read = false",
        )
        .bind(user_id)
        .fetch_one(pool)
        .await
    }
}
