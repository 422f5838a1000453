//! Repository for the `invoices` and `payments` tables.

use adops_core::error::CoreError;
use adops_core::financials::{validate_payment, INVOICE_OVERDUE, INVOICE_PAID, INVOICE_SENT, REVENUE_INVOICE_STATUSES};
use adops_core::pagination::{clamp_limit, clamp_offset, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use adops_core::types::{Cents, Date, DbId};
use sqlx::PgPool;

use crate::models::invoice::{
    CreateInvoice, CreatePayment, Invoice, InvoiceListParams, Payment, UpdateInvoice,
};

/// Invoice columns plus the aggregated `paid_cents`.
const COLUMNS: &str = "id, organization_id, campaign_id, show_id, invoice_number, client_name, \
    amount_cents, \
    (SELECT COALESCE(SUM(p.amount_cents), 0)::BIGINT FROM payments p \
      WHERE p.invoice_id = invoices.id) AS paid_cents, \
    issued_on, due_on, status, notes, created_at, updated_at";

const PAYMENT_COLUMNS: &str =
    "id, invoice_id, recorded_by, amount_cents, paid_on, method, reference, created_at, updated_at";

pub struct InvoiceRepo;

impl InvoiceRepo {
    /// Insert a draft invoice.
    pub async fn create(
        pool: &PgPool,
        organization_id: DbId,
        input: &CreateInvoice,
    ) -> Result<Invoice, sqlx::Error> {
        let query = format!(
            "INSERT INTO invoices
                (organization_id, campaign_id, show_id, invoice_number, client_name,
                 amount_cents, issued_on, due_on, notes)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Invoice>(&query)
            .bind(organization_id)
            .bind(input.campaign_id)
            .bind(input.show_id)
            .bind(&input.invoice_number)
            .bind(&input.client_name)
            .bind(input.amount_cents)
            .bind(input.issued_on)
            .bind(input.due_on)
            .bind(&input.notes)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        organization_id: DbId,
        id: DbId,
    ) -> Result<Option<Invoice>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM invoices WHERE id = $1 AND organization_id = $2");
        sqlx::query_as::<_, Invoice>(&query)
            .bind(id)
            .bind(organization_id)
            .fetch_optional(pool)
            .await
    }

    /// List invoices, most recently issued first. Date bounds apply to `issued_on`.
    pub async fn list(
        pool: &PgPool,
        organization_id: DbId,
        params: &InvoiceListParams,
    ) -> Result<Vec<Invoice>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM invoices
             WHERE organization_id = $1
               AND ($2::TEXT IS NULL OR status = $2)
               AND ($3::BIGINT IS NULL OR campaign_id = $3)
               AND ($4::BIGINT IS NULL OR show_id = $4)
               AND ($5::DATE IS NULL OR issued_on >= $5)
               AND ($6::DATE IS NULL OR issued_on <= $6)
             ORDER BY issued_on DESC, id DESC
             LIMIT $7 OFFSET $8"
        );
        sqlx::query_as::<_, Invoice>(&query)
            .bind(organization_id)
            .bind(&params.status)
            .bind(params.campaign_id)
            .bind(params.show_id)
            .bind(params.from)
            .bind(params.to)
            .bind(clamp_limit(params.limit, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE))
            .bind(clamp_offset(params.offset))
            .fetch_all(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        organization_id: DbId,
        id: DbId,
        input: &UpdateInvoice,
    ) -> Result<Option<Invoice>, sqlx::Error> {
        let query = format!(
            "UPDATE invoices SET
                campaign_id = COALESCE($3, campaign_id),
                show_id = COALESCE($4, show_id),
                client_name = COALESCE($5, client_name),
                amount_cents = COALESCE($6, amount_cents),
                issued_on = COALESCE($7, issued_on),
                due_on = COALESCE($8, due_on),
                notes = COALESCE($9, notes)
             WHERE id = $1 AND organization_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Invoice>(&query)
            .bind(id)
            .bind(organization_id)
            .bind(input.campaign_id)
            .bind(input.show_id)
            .bind(&input.client_name)
            .bind(input.amount_cents)
            .bind(input.issued_on)
            .bind(input.due_on)
            .bind(&input.notes)
            .fetch_optional(pool)
            .await
    }

    pub async fn set_status(
        pool: &PgPool,
        organization_id: DbId,
        id: DbId,
        status: &str,
    ) -> Result<Option<Invoice>, sqlx::Error> {
        let query = format!(
            "UPDATE invoices SET status = $3
             WHERE id = $1 AND organization_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Invoice>(&query)
            .bind(id)
            .bind(organization_id)
            .bind(status)
            .fetch_optional(pool)
            .await
    }

    /// Delete a draft invoice. Returns `false` if it is missing or no longer a draft.
    pub async fn delete_draft(
        pool: &PgPool,
        organization_id: DbId,
        id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM invoices WHERE id = $1 AND organization_id = $2 AND status = 'draft'",
        )
        .bind(id)
        .bind(organization_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Move every sent invoice due before `today` to overdue, returning the moved rows.
    pub async fn mark_overdue(
        pool: &PgPool,
        organization_id: DbId,
        today: Date,
    ) -> Result<Vec<Invoice>, sqlx::Error> {
        let query = format!(
            "UPDATE invoices SET status = $3
             WHERE organization_id = $1 AND status = $4 AND due_on < $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Invoice>(&query)
            .bind(organization_id)
            .bind(today)
            .bind(INVOICE_OVERDUE)
            .bind(INVOICE_SENT)
            .fetch_all(pool)
            .await
    }

    /// Booked revenue for a campaign across all periods.
    pub async fn invoiced_for_campaign(
        pool: &PgPool,
        campaign_id: DbId,
    ) -> Result<Cents, sqlx::Error> {
        let statuses: Vec<String> = REVENUE_INVOICE_STATUSES.iter().map(|s| s.to_string()).collect();
        sqlx::query_scalar(
            "SELECT COALESCE(SUM(amount_cents), 0)::BIGINT FROM invoices
             WHERE campaign_id = $1 AND status = ANY($2)",
        )
        .bind(campaign_id)
        .bind(&statuses)
        .fetch_one(pool)
        .await
    }

    // -----------------------------------------------------------------------
    // Payments
    // -----------------------------------------------------------------------

    pub async fn list_payments(
        pool: &PgPool,
        invoice_id: DbId,
    ) -> Result<Vec<Payment>, sqlx::Error> {
        let query = format!(
            "SELECT {PAYMENT_COLUMNS} FROM payments WHERE invoice_id = $1 ORDER BY paid_on, id"
        );
        sqlx::query_as::<_, Payment>(&query)
            .bind(invoice_id)
            .fetch_all(pool)
            .await
    }

    /// Insert a payment and settle the invoice when the balance reaches zero.
    ///
    /// The invoice row is locked first and the payment is checked with
    /// [`validate_payment`] against the status and balance read under that
    /// lock, so concurrent payments and a racing `void` see each other.
    /// A failed check rolls back and comes back as [`PaymentOutcome::Rejected`].
    pub async fn record_payment(
        pool: &PgPool,
        organization_id: DbId,
        invoice_id: DbId,
        recorded_by: DbId,
        input: &CreatePayment,
    ) -> Result<PaymentOutcome, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let (previous_status, amount_cents): (String, Cents) = sqlx::query_as(
            "SELECT status, amount_cents FROM invoices
             WHERE id = $1 AND organization_id = $2
             FOR UPDATE",
        )
        .bind(invoice_id)
        .bind(organization_id)
        .fetch_one(&mut *tx)
        .await?;

        let paid_cents: Cents = sqlx::query_scalar(
            "SELECT COALESCE(SUM(amount_cents), 0)::BIGINT FROM payments WHERE invoice_id = $1",
        )
        .bind(invoice_id)
        .fetch_one(&mut *tx)
        .await?;

        let check = validate_payment(&previous_status, amount_cents, paid_cents, input.amount_cents);
        if let Err(e) = check {
            tx.rollback().await?;
            return Ok(PaymentOutcome::Rejected(e));
        }

        let query = format!(
            "INSERT INTO payments (invoice_id, recorded_by, amount_cents, paid_on, method, reference)
             VALUES ($1, $2, $3, $4, COALESCE($5, 'ach'), $6)
             RETURNING {PAYMENT_COLUMNS}"
        );
        let payment = sqlx::query_as::<_, Payment>(&query)
            .bind(invoice_id)
            .bind(recorded_by)
            .bind(input.amount_cents)
            .bind(input.paid_on)
            .bind(&input.method)
            .bind(&input.reference)
            .fetch_one(&mut *tx)
            .await?;

        let query = format!(
            "UPDATE invoices SET status = CASE
                WHEN (SELECT COALESCE(SUM(amount_cents), 0) FROM payments WHERE invoice_id = $1)
                     >= amount_cents THEN $2
                ELSE status
             END
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let invoice = sqlx::query_as::<_, Invoice>(&query)
            .bind(invoice_id)
            .bind(INVOICE_PAID)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(PaymentOutcome::Recorded {
            payment,
            invoice,
            previous_status,
        })
    }
}

/// Result of [`InvoiceRepo::record_payment`].
#[derive(Debug)]
pub enum PaymentOutcome {
    Recorded {
        payment: Payment,
        /// The invoice after the write.
        invoice: Invoice,
        /// Status held under the row lock, before any settlement.
        previous_status: String,
    },
    /// The payment failed validation against the locked invoice.
    Rejected(CoreError),
}
