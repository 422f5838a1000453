//! The durable event log behind the event bus.

use adops_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// An event about to be appended to `events`.
#[derive(Debug, Clone)]
pub struct NewEvent<'a> {
    pub event_type_id: DbId,
    pub organization_id: Option<DbId>,
    pub source_entity_type: Option<&'a str>,
    pub source_entity_id: Option<DbId>,
    pub actor_user_id: Option<DbId>,
    pub payload: &'a serde_json::Value,
}

/// A logged event with its type name resolved, as shown in the admin
/// activity feed.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ActivityEntry {
    pub id: DbId,
    pub event_type: String,
    pub source_entity_type: Option<String>,
    pub source_entity_id: Option<DbId>,
    pub actor_user_id: Option<DbId>,
    /// Username of the actor, when the event had one.
    pub actor_username: Option<String>,
    pub payload: serde_json::Value,
    pub created_at: Timestamp,
}
