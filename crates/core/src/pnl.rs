//! Profit & loss arithmetic for shows and the whole organization.

use serde::Serialize;

use crate::types::Cents;

/// A profit & loss rollup. All amounts are in cents.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PnlSummary {
    pub gross_revenue_cents: Cents,
    pub talent_payout_cents: Cents,
    pub expense_cents: Cents,
    /// Revenue minus talent payout minus expenses. May be negative.
    pub net_profit_cents: Cents,
    /// Net profit as a percentage of gross revenue; 0 when there is no revenue.
    pub margin_pct: f64,
}

/// Expense total for one category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub category: String,
    pub amount_cents: Cents,
}

/// Talent payout for a revenue-share agreement, rounded to the nearest cent.
///
/// The share is clamped to `[0, 100]`; a non-finite share pays nothing.
pub fn talent_payout(revenue_cents: Cents, revenue_share_pct: f64) -> Cents {
    if !revenue_share_pct.is_finite() || revenue_cents <= 0 {
        return 0;
    }
    let share = revenue_share_pct.clamp(0.0, 100.0);
    (revenue_cents as f64 * share / 100.0).round() as Cents
}

pub fn compute_pnl(revenue_cents: Cents, expense_cents: Cents, revenue_share_pct: f64) -> PnlSummary {
    let revenue = revenue_cents.max(0);
    let expenses = expense_cents.max(0);
    let payout = talent_payout(revenue, revenue_share_pct);
    let net = revenue - payout - expenses;
    let margin_pct = if revenue == 0 {
        0.0
    } else {
        net as f64 / revenue as f64 * 100.0
    };

    PnlSummary {
        gross_revenue_cents: revenue,
        talent_payout_cents: payout,
        expense_cents: expenses,
        net_profit_cents: net,
        margin_pct,
    }
}

/// Merge per-show P&L rows into an organization-wide summary.
///
/// The merged margin is recomputed from the totals rather than averaged.
pub fn merge(summaries: &[PnlSummary]) -> PnlSummary {
    let revenue: Cents = summaries.iter().map(|s| s.gross_revenue_cents).sum();
    let payout: Cents = summaries.iter().map(|s| s.talent_payout_cents).sum();
    let expenses: Cents = summaries.iter().map(|s| s.expense_cents).sum();
    let net = revenue - payout - expenses;
    PnlSummary {
        gross_revenue_cents: revenue,
        talent_payout_cents: payout,
        expense_cents: expenses,
        net_profit_cents: net,
        margin_pct: if revenue == 0 {
            0.0
        } else {
            net as f64 / revenue as f64 * 100.0
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_pnl() {
        let pnl = compute_pnl(100_000, 20_000, 30.0);
        assert_eq!(pnl.talent_payout_cents, 30_000);
        assert_eq!(pnl.net_profit_cents, 50_000);
        assert_eq!(pnl.margin_pct, 50.0);
    }

    #[test]
    fn zero_revenue_has_zero_margin() {
        let pnl = compute_pnl(0, 5_000, 50.0);
        assert_eq!(pnl.margin_pct, 0.0);
        assert_eq!(pnl.net_profit_cents, -5_000);
    }

    #[test]
    fn share_is_clamped() {
        assert_eq!(talent_payout(10_000, 150.0), 10_000);
        assert_eq!(talent_payout(10_000, -5.0), 0);
        assert_eq!(talent_payout(10_000, f64::NAN), 0);
    }

    #[test]
    fn payout_rounds_to_nearest_cent() {
        assert_eq!(talent_payout(333, 50.0), 167);
    }

    #[test]
    fn merge_recomputes_margin() {
        let a = compute_pnl(100_000, 0, 0.0);
        let b = compute_pnl(0, 50_000, 0.0);
        let merged = merge(&[a, b]);
        assert_eq!(merged.net_profit_cents, 50_000);
        assert_eq!(merged.margin_pct, 50.0);
    }

    #[test]
    fn merge_of_nothing_is_zero() {
        let merged = merge(&[]);
        assert_eq!(merged.gross_revenue_cents, 0);
        assert_eq!(merged.margin_pct, 0.0);
    }
}
