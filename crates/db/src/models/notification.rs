//! In-app inbox entries written by the notification router.

use adops_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Notification {
    pub id: DbId,
    pub user_id: DbId,
    /// Dotted event name, e.g. `invoice.paid`.
    pub event_type: String,
    pub title: String,
    pub body: Option<String>,
    /// What the notification links to (`invoice`, `talent_approval`, ...).
    pub entity_type: Option<String>,
    pub entity_id: Option<DbId>,
    pub is_read: bool,
    pub read_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

/// The content of one event's notification, shared by all its recipients.
#[derive(Debug, Clone)]
pub struct NotificationContent {
    pub event_type: String,
    pub title: String,
    pub body: Option<String>,
    pub entity_type: Option<String>,
    pub entity_id: Option<DbId>,
}

/// Filters for a user's inbox.
#[derive(Debug, Clone, Default)]
pub struct InboxFilter {
    pub unread_only: bool,
    /// Event family, the part of the event type before the first dot
    /// (`invoice`, `proposal`, `campaign`, `talent_approval`).
    pub category: Option<String>,
}
