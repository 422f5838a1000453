//! Proposal lifecycle and line-item pricing.
//!
//! Line items quote an ad placement on a show for a number of episodes.
//! Spot items are `rate × slots × episodes`; CPM items reuse
//! [`revenue::cpm_revenue`](crate::revenue::cpm_revenue) per episode.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::revenue::{cpm_revenue, spot_revenue, MAX_RATE};
use crate::types::Cents;
use crate::validation::{validate_one_of, validate_percentage};

pub const PROPOSAL_DRAFT: &str = "draft";
pub const PROPOSAL_SENT: &str = "sent";
pub const PROPOSAL_ACCEPTED: &str = "accepted";
pub const PROPOSAL_REJECTED: &str = "rejected";
pub const PROPOSAL_EXPIRED: &str = "expired";

pub const PROPOSAL_STATUSES: &[&str] = &[
    PROPOSAL_DRAFT,
    PROPOSAL_SENT,
    PROPOSAL_ACCEPTED,
    PROPOSAL_REJECTED,
    PROPOSAL_EXPIRED,
];

pub const ITEM_PRICING_CPM: &str = "cpm";
pub const ITEM_PRICING_SPOT: &str = "spot";
pub const ITEM_PRICING: &[&str] = &[ITEM_PRICING_CPM, ITEM_PRICING_SPOT];

/// Largest per-episode downloads estimate a CPM item may quote.
pub const MAX_ESTIMATED_DOWNLOADS: i64 = 1_000_000_000;

/// Largest total a single line item may reach ($10 billion).
pub const MAX_LINE_TOTAL_CENTS: Cents = 1_000_000_000_000;

fn proposal_targets(from: &str) -> &'static [&'static str] {
    match from {
        PROPOSAL_DRAFT => &[PROPOSAL_SENT],
        PROPOSAL_SENT => &[
            PROPOSAL_ACCEPTED,
            PROPOSAL_REJECTED,
            PROPOSAL_EXPIRED,
            PROPOSAL_DRAFT,
        ],
        _ => &[],
    }
}

pub fn validate_proposal_transition(from: &str, to: &str) -> Result<(), CoreError> {
    validate_one_of(to, PROPOSAL_STATUSES, "proposal status")?;
    if proposal_targets(from).contains(&to) {
        Ok(())
    } else {
        Err(CoreError::transition("Proposal", from, to))
    }
}

/// Only drafts may have their line items edited.
pub fn ensure_editable(status: &str) -> Result<(), CoreError> {
    if status == PROPOSAL_DRAFT {
        Ok(())
    } else {
        Err(CoreError::Conflict(format!(
            "Proposal is '{status}'; only draft proposals can be edited"
        )))
    }
}

/// Pricing inputs of one line item.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LineItemInput {
    pub pricing: String,
    /// Dollars: a CPM rate or a flat cost per spot.
    pub rate: f64,
    pub slots: i32,
    pub episodes: i32,
    /// Per-episode downloads used for CPM items.
    pub estimated_downloads: Option<i64>,
}

pub fn validate_line_item(item: &LineItemInput) -> Result<(), CoreError> {
    validate_one_of(&item.pricing, ITEM_PRICING, "pricing")?;
    if !item.rate.is_finite() || !(0.0..=MAX_RATE).contains(&item.rate) {
        return Err(CoreError::Validation(format!(
            "rate must be between 0 and {MAX_RATE}, got {}",
            item.rate
        )));
    }
    if item.slots < 1 || item.episodes < 1 {
        return Err(CoreError::Validation(
            "slots and episodes must each be at least 1".into(),
        ));
    }
    if item.pricing == ITEM_PRICING_CPM && item.estimated_downloads.unwrap_or(0) <= 0 {
        return Err(CoreError::Validation(
            "CPM line items require estimated_downloads".into(),
        ));
    }
    if item.estimated_downloads.unwrap_or(0) > MAX_ESTIMATED_DOWNLOADS {
        return Err(CoreError::Validation(format!(
            "estimated_downloads must not exceed {MAX_ESTIMATED_DOWNLOADS}"
        )));
    }
    if line_total_cents(item) >= MAX_LINE_TOTAL_CENTS {
        return Err(CoreError::Validation(format!(
            "Line total must stay below {} dollars",
            MAX_LINE_TOTAL_CENTS / 100
        )));
    }
    Ok(())
}

/// Saturates at the `i64` bounds.
fn dollars_to_cents(dollars: f64) -> Cents {
    if dollars.is_finite() {
        (dollars * 100.0).round() as Cents
    } else {
        0
    }
}

/// Total for one line item in cents.
pub fn line_total_cents(item: &LineItemInput) -> Cents {
    let episodes = item.episodes.max(0) as f64;
    let per_episode = if item.pricing == ITEM_PRICING_CPM {
        cpm_revenue(
            item.rate,
            item.slots,
            item.estimated_downloads.unwrap_or(0) as f64,
        )
    } else {
        spot_revenue(item.rate, item.slots)
    };
    dollars_to_cents(per_episode * episodes)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProposalTotals {
    pub subtotal_cents: Cents,
    pub discount_pct: f64,
    pub discount_cents: Cents,
    pub total_cents: Cents,
}

/// Subtotal, discount and total. Sums saturate instead of wrapping.
pub fn totals(line_totals: &[Cents], discount_pct: f64) -> ProposalTotals {
    let subtotal = line_totals
        .iter()
        .fold(0, |acc: Cents, &line| acc.saturating_add(line));
    let pct = if discount_pct.is_finite() {
        discount_pct.clamp(0.0, 100.0)
    } else {
        0.0
    };
    let discount = (subtotal as f64 * pct / 100.0).round() as Cents;
    ProposalTotals {
        subtotal_cents: subtotal,
        discount_pct: pct,
        discount_cents: discount,
        total_cents: subtotal.saturating_sub(discount),
    }
}

pub fn validate_discount(discount_pct: f64) -> Result<(), CoreError> {
    validate_percentage(discount_pct, "discount_pct")
}
