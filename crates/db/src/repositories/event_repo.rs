//! Append and read the `events` log. Type names resolve through the seeded
//! `event_types` lookup.

use adops_core::types::DbId;
use sqlx::PgPool;

use crate::models::event::{ActivityEntry, NewEvent};

pub struct EventRepo;

impl EventRepo {
    /// Id of a seeded event type such as `invoice.paid`.
    pub async fn type_id_by_name(pool: &PgPool, name: &str) -> Result<Option<DbId>, sqlx::Error> {
        sqlx::query_scalar("SELECT id FROM event_types WHERE name = $1")
            .bind(name)
            .fetch_optional(pool)
            .await
    }

    /// Append one event; returns its id.
    pub async fn insert(pool: &PgPool, event: &NewEvent<'_>) -> Result<DbId, sqlx::Error> {
        sqlx::query_scalar(
            "INSERT INTO events \
                 (event_type_id, organization_id, source_entity_type, source_entity_id, \
                  actor_user_id, payload) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING id",
        )
        .bind(event.event_type_id)
        .bind(event.organization_id)
        .bind(event.source_entity_type)
        .bind(event.source_entity_id)
        .bind(event.actor_user_id)
        .bind(event.payload)
        .fetch_one(pool)
        .await
    }

    /// The organization's event log, newest first, optionally narrowed to
    /// one event type.
    pub async fn activity(
        pool: &PgPool,
        organization_id: DbId,
        event_type: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ActivityEntry>, sqlx::Error> {
        sqlx::query_as::<_, ActivityEntry>(
            "SELECT e.id, t.name AS event_type, e.source_entity_type, e.source_entity_id, \
                    e.actor_user_id, u.username AS actor_username, e.payload, e.created_at \
             FROM events e \
             JOIN event_types t ON t.id = e.event_type_id \
             LEFT JOIN users u ON u.id = e.actor_user_id \
             WHERE e.organization_id = $1 \
               AND ($2::TEXT IS NULL OR t.name = $2) \
             ORDER BY e.created_at DESC, e.id DESC \
             LIMIT $3 OFFSET $4",
        )
        .bind(organization_id)
        .bind(event_type)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
    }
}
