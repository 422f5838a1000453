//! Campaign lifecycle and budget pacing.

use serde::Serialize;

use crate::error::CoreError;
use crate::types::{Cents, Date};
use crate::validation::validate_one_of;

pub const CAMPAIGN_PLANNING: &str = "planning";
pub const CAMPAIGN_ACTIVE: &str = "active";
pub const CAMPAIGN_PAUSED: &str = "paused";
pub const CAMPAIGN_COMPLETED: &str = "completed";
pub const CAMPAIGN_CANCELLED: &str = "cancelled";

pub const CAMPAIGN_STATUSES: &[&str] = &[
    CAMPAIGN_PLANNING,
    CAMPAIGN_ACTIVE,
    CAMPAIGN_PAUSED,
    CAMPAIGN_COMPLETED,
    CAMPAIGN_CANCELLED,
];

fn campaign_targets(from: &str) -> &'static [&'static str] {
    match from {
        CAMPAIGN_PLANNING => &[CAMPAIGN_ACTIVE, CAMPAIGN_CANCELLED],
        CAMPAIGN_ACTIVE => &[CAMPAIGN_PAUSED, CAMPAIGN_COMPLETED, CAMPAIGN_CANCELLED],
        CAMPAIGN_PAUSED => &[CAMPAIGN_ACTIVE, CAMPAIGN_COMPLETED, CAMPAIGN_CANCELLED],
        _ => &[],
    }
}

pub fn validate_campaign_status(status: &str) -> Result<(), CoreError> {
    validate_one_of(status, CAMPAIGN_STATUSES, "campaign status")
}

pub fn validate_campaign_transition(from: &str, to: &str) -> Result<(), CoreError> {
    validate_campaign_status(to)?;
    if from == to || campaign_targets(from).contains(&to) {
        Ok(())
    } else {
        Err(CoreError::transition("Campaign", from, to))
    }
}

/// Budget pacing for a campaign flight.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Pacing {
    pub budget_cents: Cents,
    pub delivered_cents: Cents,
    pub remaining_cents: Cents,
    /// Share of the budget delivered, 0 when there is no budget.
    pub delivered_pct: f64,
    /// Share of the flight elapsed on `today`, `None` without both dates.
    pub elapsed_pct: Option<f64>,
}

pub fn pacing(
    budget_cents: Cents,
    delivered_cents: Cents,
    start: Option<Date>,
    end: Option<Date>,
    today: Date,
) -> Pacing {
    let budget = budget_cents.max(0);
    let delivered = delivered_cents.max(0);
    let delivered_pct = if budget == 0 {
        0.0
    } else {
        delivered as f64 / budget as f64 * 100.0
    };

    let elapsed_pct = match (start, end) {
        (Some(start), Some(end)) => {
            let total_days = (end - start).num_days() + 1;
            let elapsed = (today - start).num_days() + 1;
            Some((elapsed.clamp(0, total_days) as f64 / total_days as f64) * 100.0)
        }
        _ => None,
    };

    Pacing {
        budget_cents: budget,
        delivered_cents: delivered,
        remaining_cents: (budget - delivered).max(0),
        delivered_pct,
        elapsed_pct,
    }
}
