//! Platform event names.
//!
//! These must match the seed rows of the `event_types` table.

pub const EVENT_TALENT_APPROVAL_REQUESTED: &str = "talent_approval.requested";
pub const EVENT_TALENT_APPROVAL_RESPONDED: &str = "talent_approval.responded";
pub const EVENT_INVOICE_PAID: &str = "invoice.paid";
pub const EVENT_INVOICE_OVERDUE: &str = "invoice.overdue";
pub const EVENT_PROPOSAL_ACCEPTED: &str = "proposal.accepted";
pub const EVENT_CAMPAIGN_STATUS_CHANGED: &str = "campaign.status_changed";

/// Payload key carrying the user ids an event should notify.
pub const PAYLOAD_RECIPIENTS: &str = "recipient_user_ids";
