//! Talent approval decisions for host-read creatives.
//!
//! A sales user asks a show's talent to approve a creative. The talent
//! approves, rejects or asks for a revision; the creative status follows
//! the decision.

use crate::error::CoreError;
use crate::show::{CREATIVE_APPROVED, CREATIVE_DRAFT, CREATIVE_REJECTED};

pub const APPROVAL_PENDING: &str = "pending";
pub const APPROVAL_APPROVED: &str = "approved";
pub const APPROVAL_REJECTED: &str = "rejected";
pub const APPROVAL_REVISION_REQUESTED: &str = "revision_requested";

pub const APPROVAL_STATUSES: &[&str] = &[
    APPROVAL_PENDING,
    APPROVAL_APPROVED,
    APPROVAL_REJECTED,
    APPROVAL_REVISION_REQUESTED,
];

/// Decisions a talent may submit.
pub const VALID_DECISIONS: &[&str] = &[
    APPROVAL_APPROVED,
    APPROVAL_REJECTED,
    APPROVAL_REVISION_REQUESTED,
];

/// Validate a talent's response to a pending request.
///
/// Rejections and revision requests must explain themselves.
pub fn validate_response(
    current_status: &str,
    decision: &str,
    comment: Option<&str>,
) -> Result<(), CoreError> {
    if !VALID_DECISIONS.contains(&decision) {
        return Err(CoreError::Validation(format!(
            "Invalid decision '{decision}'. Must be one of: {}",
            VALID_DECISIONS.join(", ")
        )));
    }
    if current_status != APPROVAL_PENDING {
        return Err(CoreError::Conflict(format!(
            "Approval request has already been answered ('{current_status}')"
        )));
    }
    let has_comment = comment.is_some_and(|c| !c.trim().is_empty());
    if decision != APPROVAL_APPROVED && !has_comment {
        return Err(CoreError::Validation(format!(
            "A comment is required when the decision is '{decision}'"
        )));
    }
    Ok(())
}

/// Creative status that follows a talent decision.
pub fn creative_status_for(decision: &str) -> &'static str {
    match decision {
        APPROVAL_APPROVED => CREATIVE_APPROVED,
        APPROVAL_REJECTED => CREATIVE_REJECTED,
        _ => CREATIVE_DRAFT,
    }
}
