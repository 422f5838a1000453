//! Event-to-notification routing.
//!
//! [`NotificationRouter`] subscribes to the platform event bus and writes a
//! `notifications` row for every user an event concerns: the users named
//! directly on the event plus, for financial and sales events, the active
//! members of the roles that follow them. The acting user is never
//! notified about their own action.

use adops_core::event_types::{
    EVENT_CAMPAIGN_STATUS_CHANGED, EVENT_INVOICE_OVERDUE, EVENT_INVOICE_PAID,
    EVENT_PROPOSAL_ACCEPTED, EVENT_TALENT_APPROVAL_REQUESTED, EVENT_TALENT_APPROVAL_RESPONDED,
};
use adops_core::export::format_cents;
use adops_core::roles::{ROLE_ADMIN, ROLE_FINANCE, ROLE_SALES};
use adops_core::types::DbId;
use adops_db::models::notification::NotificationContent;
use adops_db::repositories::{NotificationRepo, UserRepo};
use adops_db::DbPool;
use adops_events::PlatformEvent;
use tokio::sync::broadcast;

/// Roles whose members are notified of an event type in addition to its
/// direct recipients.
pub fn fanout_roles(event_type: &str) -> &'static [&'static str] {
    match event_type {
        EVENT_INVOICE_PAID | EVENT_INVOICE_OVERDUE => &[ROLE_FINANCE, ROLE_ADMIN],
        EVENT_PROPOSAL_ACCEPTED | EVENT_CAMPAIGN_STATUS_CHANGED => &[ROLE_SALES],
        _ => &[],
    }
}

/// Render the title and body a user sees for an event.
pub fn compose(event: &PlatformEvent) -> (String, Option<String>) {
    let text = |key: &str| event.payload_str(key).unwrap_or("").to_string();
    let cents = |key: &str| {
        event
            .payload
            .get(key)
            .and_then(|v| v.as_i64())
            .map(format_cents)
    };

    match event.event_type.as_str() {
        EVENT_TALENT_APPROVAL_REQUESTED => (
            format!("Approval requested: {}", text("creative_name")),
            Some(format!("Please review the ad read for {}", text("show_name"))),
        ),
        EVENT_TALENT_APPROVAL_RESPONDED => {
            let decision = text("decision").replace('_', " ");
            (
                format!("Creative {decision}"),
                event.payload_str("comment").map(str::to_string),
            )
        }
        EVENT_INVOICE_PAID => (
            format!("Invoice {} paid", text("invoice_number")),
            cents("amount_cents").map(|amount| format!("{} paid {amount}", text("client_name"))),
        ),
        EVENT_INVOICE_OVERDUE => (
            format!("Invoice {} is overdue", text("invoice_number")),
            cents("outstanding_cents")
                .map(|amount| format!("{} owes {amount}", text("client_name"))),
        ),
        EVENT_PROPOSAL_ACCEPTED => (
            format!("Proposal accepted: {}", text("title")),
            cents("total_cents").map(|total| format!("{} accepted {total}", text("client_name"))),
        ),
        EVENT_CAMPAIGN_STATUS_CHANGED => (
            format!("Campaign {} is now {}", text("campaign_name"), text("to")),
            None,
        ),
        other => (other.to_string(), None),
    }
}

/// Writes in-app notifications for platform events.
pub struct NotificationRouter {
    pool: DbPool,
}

impl NotificationRouter {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Run until the bus is dropped. Routing failures are logged and the
    /// loop moves on to the next event.
    pub async fn run(self, mut receiver: broadcast::Receiver<PlatformEvent>) {
        loop {
            match receiver.recv().await {
                Ok(event) => {
                    if let Err(e) = self.route_event(&event).await {
                        tracing::error!(
                            error = %e,
                            event_type = %event.event_type,
                            "Failed to route event"
                        );
                    }
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "Notification router lagged");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Event bus closed, notification router shutting down");
                    break;
                }
            }
        }
    }

    /// Create one notification per target user. Returns how many were written.
    pub async fn route_event(&self, event: &PlatformEvent) -> Result<usize, sqlx::Error> {
        let targets = self.determine_targets(event).await?;
        if targets.is_empty() {
            return Ok(0);
        }

        let (title, body) = compose(event);
        let content = NotificationContent {
            event_type: event.event_type.clone(),
            title,
            body,
            entity_type: event.source_entity_type.clone(),
            entity_id: event.source_entity_id,
        };
        NotificationRepo::create_for_users(&self.pool, &targets, &content).await?;

        tracing::debug!(
            event_type = %event.event_type,
            recipients = targets.len(),
            "Notifications created"
        );
        Ok(targets.len())
    }

    /// Direct recipients first, then role fan-out, deduplicated, minus the actor.
    async fn determine_targets(&self, event: &PlatformEvent) -> Result<Vec<DbId>, sqlx::Error> {
        let mut targets = event.recipient_user_ids.clone();

        let roles = fanout_roles(&event.event_type);
        if let (false, Some(org)) = (roles.is_empty(), event.organization_id) {
            for user_id in UserRepo::active_ids_with_roles(&self.pool, org, roles).await? {
                if !targets.contains(&user_id) {
                    targets.push(user_id);
                }
            }
        }

        if let Some(actor) = event.actor_user_id {
            targets.retain(|id| *id != actor);
        }
        Ok(targets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn approval_request_names_creative_and_show() {
        let event = PlatformEvent::new(EVENT_TALENT_APPROVAL_REQUESTED).with_payload(
            serde_json::json!({"creative_name": "Spring promo", "show_name": "Night Owls"}),
        );
        let (title, body) = compose(&event);
        assert_eq!(title, "Approval requested: Spring promo");
        assert_eq!(body.as_deref(), Some("Please review the ad read for Night Owls"));
    }

    #[test]
    fn response_carries_comment() {
        let event = PlatformEvent::new(EVENT_TALENT_APPROVAL_RESPONDED).with_payload(
            serde_json::json!({"decision": "revision_requested", "comment": "Shorter intro"}),
        );
        let (title, body) = compose(&event);
        assert_eq!(title, "Creative revision requested");
        assert_eq!(body.as_deref(), Some("Shorter intro"));
    }

    #[test]
    fn invoice_amounts_are_formatted() {
        let event = PlatformEvent::new(EVENT_INVOICE_PAID).with_payload(serde_json::json!({
            "invoice_number": "INV-7",
            "client_name": "Acme",
            "amount_cents": 123_450,
        }));
        let (title, body) = compose(&event);
        assert_eq!(title, "Invoice INV-7 paid");
        assert_eq!(body.as_deref(), Some("Acme paid 1234.50"));
    }

    #[test]
    fn unknown_events_use_their_name() {
        let (title, body) = compose(&PlatformEvent::new("something.else"));
        assert_eq!(title, "something.else");
        assert!(body.is_none());
    }

    #[test]
    fn fanout_by_event_type() {
        assert_eq!(fanout_roles(EVENT_INVOICE_PAID), &[ROLE_FINANCE, ROLE_ADMIN]);
        assert_eq!(fanout_roles(EVENT_PROPOSAL_ACCEPTED), &[ROLE_SALES]);
        assert!(fanout_roles(EVENT_TALENT_APPROVAL_REQUESTED).is_empty());
    }
}
