//! Show, episode and creative status constants.

use crate::error::CoreError;
use crate::validation::validate_one_of;

pub const SHOW_STATUSES: &[&str] = &["active", "hiatus", "archived"];

pub const EPISODE_STATUSES: &[&str] = &["draft", "scheduled", "published"];

pub const CREATIVE_TYPES: &[&str] = &["host_read", "pre_produced"];

pub const CREATIVE_DRAFT: &str = "draft";
pub const CREATIVE_IN_REVIEW: &str = "in_review";
pub const CREATIVE_APPROVED: &str = "approved";
pub const CREATIVE_REJECTED: &str = "rejected";

pub const CREATIVE_STATUSES: &[&str] = &[
    CREATIVE_DRAFT,
    CREATIVE_IN_REVIEW,
    CREATIVE_APPROVED,
    CREATIVE_REJECTED,
];

pub fn validate_show_status(status: &str) -> Result<(), CoreError> {
    validate_one_of(status, SHOW_STATUSES, "show status")
}

pub fn validate_episode_status(status: &str) -> Result<(), CoreError> {
    validate_one_of(status, EPISODE_STATUSES, "episode status")
}

pub fn validate_creative_type(kind: &str) -> Result<(), CoreError> {
    validate_one_of(kind, CREATIVE_TYPES, "creative type")
}

pub fn validate_creative_status(status: &str) -> Result<(), CoreError> {
    validate_one_of(status, CREATIVE_STATUSES, "creative status")
}
