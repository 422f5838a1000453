//! Reporting aggregates over invoices, payments and expenses.
//!
//! Revenue is booked from invoices in a revenue status (sent, paid,
//! overdue) by `issued_on`. Expenses count by `incurred_on`. Both bounds
//! are inclusive and either may be open.

use adops_core::financials::{OPEN_INVOICE_STATUSES, REVENUE_INVOICE_STATUSES};
use adops_core::pnl::CategoryTotal;
use adops_core::types::{Date, DbId};
use sqlx::PgPool;

use crate::models::financial::{InvoiceTotals, ShowFinancials, UnattributedTotals};

fn owned(statuses: &[&str]) -> Vec<String> {
    statuses.iter().map(|s| s.to_string()).collect()
}

const SHOW_FINANCIALS: &str = "SELECT s.id AS show_id, s.name AS show_name, s.revenue_share_pct,
        COALESCE((SELECT SUM(i.amount_cents) FROM invoices i
                   WHERE i.show_id = s.id AND i.status = ANY($2)
                     AND ($3::DATE IS NULL OR i.issued_on >= $3)
                     AND ($4::DATE IS NULL OR i.issued_on <= $4)), 0)::BIGINT AS revenue_cents,
        COALESCE((SELECT SUM(e.amount_cents) FROM expenses e
                   WHERE e.show_id = s.id AND e.deleted_at IS NULL
                     AND ($3::DATE IS NULL OR e.incurred_on >= $3)
                     AND ($4::DATE IS NULL OR e.incurred_on <= $4)), 0)::BIGINT AS expense_cents
     FROM shows s
     WHERE s.organization_id = $1 AND s.deleted_at IS NULL";

pub struct FinancialRepo;

impl FinancialRepo {
    /// Revenue and expenses per live show, in name order.
    pub async fn show_financials(
        pool: &PgPool,
        organization_id: DbId,
        from: Option<Date>,
        to: Option<Date>,
    ) -> Result<Vec<ShowFinancials>, sqlx::Error> {
        let query = format!("{SHOW_FINANCIALS} ORDER BY s.name");
        sqlx::query_as::<_, ShowFinancials>(&query)
            .bind(organization_id)
            .bind(owned(REVENUE_INVOICE_STATUSES))
            .bind(from)
            .bind(to)
            .fetch_all(pool)
            .await
    }

    pub async fn show_financials_for(
        pool: &PgPool,
        organization_id: DbId,
        show_id: DbId,
        from: Option<Date>,
        to: Option<Date>,
    ) -> Result<Option<ShowFinancials>, sqlx::Error> {
        let query = format!("{SHOW_FINANCIALS} AND s.id = $5");
        sqlx::query_as::<_, ShowFinancials>(&query)
            .bind(organization_id)
            .bind(owned(REVENUE_INVOICE_STATUSES))
            .bind(from)
            .bind(to)
            .bind(show_id)
            .fetch_optional(pool)
            .await
    }

    /// Revenue and expenses with no show attached.
    pub async fn unattributed(
        pool: &PgPool,
        organization_id: DbId,
        from: Option<Date>,
        to: Option<Date>,
    ) -> Result<UnattributedTotals, sqlx::Error> {
        sqlx::query_as::<_, UnattributedTotals>(
            "SELECT
                COALESCE((SELECT SUM(amount_cents) FROM invoices
                           WHERE organization_id = $1 AND show_id IS NULL AND status = ANY($2)
                             AND ($3::DATE IS NULL OR issued_on >= $3)
                             AND ($4::DATE IS NULL OR issued_on <= $4)), 0)::BIGINT AS revenue_cents,
                COALESCE((SELECT SUM(amount_cents) FROM expenses
                           WHERE organization_id = $1 AND show_id IS NULL AND deleted_at IS NULL
                             AND ($3::DATE IS NULL OR incurred_on >= $3)
                             AND ($4::DATE IS NULL OR incurred_on <= $4)), 0)::BIGINT AS expense_cents",
        )
        .bind(organization_id)
        .bind(owned(REVENUE_INVOICE_STATUSES))
        .bind(from)
        .bind(to)
        .fetch_one(pool)
        .await
    }

    /// Invoiced, collected and still-open amounts for the period.
    ///
    /// Collections count payments by `paid_on`; outstanding covers open
    /// invoices issued in the period.
    pub async fn invoice_totals(
        pool: &PgPool,
        organization_id: DbId,
        from: Option<Date>,
        to: Option<Date>,
    ) -> Result<InvoiceTotals, sqlx::Error> {
        sqlx::query_as::<_, InvoiceTotals>(
            "SELECT
                COALESCE((SELECT SUM(amount_cents) FROM invoices
                           WHERE organization_id = $1 AND status = ANY($2)
                             AND ($4::DATE IS NULL OR issued_on >= $4)
                             AND ($5::DATE IS NULL OR issued_on <= $5)), 0)::BIGINT AS invoiced_cents,
                COALESCE((SELECT SUM(p.amount_cents) FROM payments p
                           JOIN invoices i ON i.id = p.invoice_id
                           WHERE i.organization_id = $1
                             AND ($4::DATE IS NULL OR p.paid_on >= $4)
                             AND ($5::DATE IS NULL OR p.paid_on <= $5)), 0)::BIGINT AS collected_cents,
                COALESCE((SELECT SUM(GREATEST(i.amount_cents - COALESCE(
                                    (SELECT SUM(p.amount_cents) FROM payments p
                                      WHERE p.invoice_id = i.id), 0), 0))
                            FROM invoices i
                           WHERE i.organization_id = $1 AND i.status = ANY($3)
                             AND ($4::DATE IS NULL OR i.issued_on >= $4)
                             AND ($5::DATE IS NULL OR i.issued_on <= $5)), 0)::BIGINT AS outstanding_cents",
        )
        .bind(organization_id)
        .bind(owned(REVENUE_INVOICE_STATUSES))
        .bind(owned(OPEN_INVOICE_STATUSES))
        .bind(from)
        .bind(to)
        .fetch_one(pool)
        .await
    }

    /// Expense totals by category, largest first. `show_id` narrows to one show.
    pub async fn expenses_by_category(
        pool: &PgPool,
        organization_id: DbId,
        show_id: Option<DbId>,
        from: Option<Date>,
        to: Option<Date>,
    ) -> Result<Vec<CategoryTotal>, sqlx::Error> {
        let rows: Vec<(String, i64)> = sqlx::query_as(
            "SELECT category, SUM(amount_cents)::BIGINT
             FROM expenses
             WHERE organization_id = $1
               AND deleted_at IS NULL
               AND ($2::BIGINT IS NULL OR show_id = $2)
               AND ($3::DATE IS NULL OR incurred_on >= $3)
               AND ($4::DATE IS NULL OR incurred_on <= $4)
             GROUP BY category
             ORDER BY 2 DESC, category",
        )
        .bind(organization_id)
        .bind(show_id)
        .bind(from)
        .bind(to)
        .fetch_all(pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(category, amount_cents)| CategoryTotal {
                category,
                amount_cents,
            })
            .collect())
    }
}
