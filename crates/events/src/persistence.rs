//! Durable event persistence service.
//!
//! [`EventPersistence`] writes every [`PlatformEvent`] it receives to the
//! `events` table. Direct recipients are folded into the stored payload
//! under [`PAYLOAD_RECIPIENTS`].

use adops_core::event_types::PAYLOAD_RECIPIENTS;
use adops_core::types::DbId;
use adops_db::models::event::NewEvent;
use adops_db::repositories::EventRepo;
use adops_db::DbPool;
use tokio::sync::broadcast;

use crate::bus::PlatformEvent;

pub struct EventPersistence;

impl EventPersistence {
    /// Run until the bus is dropped. Failed writes are logged and skipped.
    pub async fn run(pool: DbPool, mut receiver: broadcast::Receiver<PlatformEvent>) {
        loop {
            match receiver.recv().await {
                Ok(event) => {
                    if let Err(e) = Self::persist(&pool, &event).await {
                        tracing::error!(
                            error = %e,
                            event_type = %event.event_type,
                            "Failed to persist event"
                        );
                    }
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(
                        skipped = n,
                        "Event persistence lagged, some events were not persisted"
                    );
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Event bus closed, persistence shutting down");
                    break;
                }
            }
        }
    }

    /// Append one event to the log. An event type that was never seeded
    /// is a programming error and surfaces as `RowNotFound`.
    pub async fn persist(pool: &DbPool, event: &PlatformEvent) -> Result<DbId, sqlx::Error> {
        let event_type_id = EventRepo::type_id_by_name(pool, &event.event_type)
            .await?
            .ok_or(sqlx::Error::RowNotFound)?;

        let payload = stored_payload(event);
        EventRepo::insert(
            pool,
            &NewEvent {
                event_type_id,
                organization_id: event.organization_id,
                source_entity_type: event.source_entity_type.as_deref(),
                source_entity_id: event.source_entity_id,
                actor_user_id: event.actor_user_id,
                payload: &payload,
            },
        )
        .await
    }
}

fn stored_payload(event: &PlatformEvent) -> serde_json::Value {
    let mut payload = event.payload.clone();
    if event.recipient_user_ids.is_empty() {
        return payload;
    }
    if let Some(map) = payload.as_object_mut() {
        map.insert(
            PAYLOAD_RECIPIENTS.to_string(),
            serde_json::json!(event.recipient_user_ids),
        );
    }
    payload
}
