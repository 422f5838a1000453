//! In-process event bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`EventBus`] is shared via `Arc<EventBus>` in the API state. Handlers
//! publish after their writes commit; the persistence service and the
//! notification router each hold their own receiver.

use adops_core::types::DbId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

// ---------------------------------------------------------------------------
// PlatformEvent
// ---------------------------------------------------------------------------

/// A domain event, e.g. an invoice being paid or a talent answering a
/// creative approval request.
///
/// Built with [`PlatformEvent::new`] plus the `with_*` builder methods.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformEvent {
    /// Dot-separated event name, e.g. `"invoice.paid"`.
    pub event_type: String,

    /// Organization the event happened in.
    pub organization_id: Option<DbId>,

    /// Source entity kind (e.g. `"invoice"`, `"talent_approval"`).
    pub source_entity_type: Option<String>,

    pub source_entity_id: Option<DbId>,

    /// User whose request triggered the event.
    pub actor_user_id: Option<DbId>,

    /// Users that must be notified regardless of role-based fan-out.
    #[serde(default)]
    pub recipient_user_ids: Vec<DbId>,

    /// Event-specific JSON data.
    pub payload: serde_json::Value,

    pub timestamp: DateTime<Utc>,
}

impl PlatformEvent {
    pub fn new(event_type: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
            organization_id: None,
            source_entity_type: None,
            source_entity_id: None,
            actor_user_id: None,
            recipient_user_ids: Vec::new(),
            payload: serde_json::Value::Object(Default::default()),
            timestamp: Utc::now(),
        }
    }

    pub fn with_organization(mut self, organization_id: DbId) -> Self {
        self.organization_id = Some(organization_id);
        self
    }

    pub fn with_source(mut self, entity_type: impl Into<String>, entity_id: DbId) -> Self {
        self.source_entity_type = Some(entity_type.into());
        self.source_entity_id = Some(entity_id);
        self
    }

    pub fn with_actor(mut self, user_id: DbId) -> Self {
        self.actor_user_id = Some(user_id);
        self
    }

    /// Add a directly targeted user. Duplicates are ignored.
    pub fn with_recipient(mut self, user_id: DbId) -> Self {
        if !self.recipient_user_ids.contains(&user_id) {
            self.recipient_user_ids.push(user_id);
        }
        self
    }

    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }

    /// String field from the payload, if present.
    pub fn payload_str(&self, key: &str) -> Option<&str> {
        self.payload.get(key).and_then(|v| v.as_str())
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

const DEFAULT_CAPACITY: usize = 1024;

/// In-process fan-out event bus.
///
/// ```rust
/// use adops_events::bus::{EventBus, PlatformEvent};
///
/// let bus = EventBus::default();
/// let mut rx = bus.subscribe();
///
/// bus.publish(PlatformEvent::new("invoice.paid").with_organization(1));
/// ```
pub struct EventBus {
    sender: broadcast::Sender<PlatformEvent>,
}

impl EventBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full the oldest messages are dropped and slow
    /// receivers observe `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish to all current subscribers. Dropped silently when there are none.
    pub fn publish(&self, event: PlatformEvent) {
        tracing::debug!(event_type = %event.event_type, "Publishing event");
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PlatformEvent> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
