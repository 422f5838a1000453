//! Invoice, payment and expense rules.

use crate::error::CoreError;
use crate::types::{Cents, Date};
use crate::validation::validate_one_of;

// ---------------------------------------------------------------------------
// Invoice statuses
// ---------------------------------------------------------------------------

pub const INVOICE_DRAFT: &str = "draft";
pub const INVOICE_SENT: &str = "sent";
pub const INVOICE_PAID: &str = "paid";
pub const INVOICE_OVERDUE: &str = "overdue";
pub const INVOICE_VOID: &str = "void";

pub const INVOICE_STATUSES: &[&str] = &[
    INVOICE_DRAFT,
    INVOICE_SENT,
    INVOICE_PAID,
    INVOICE_OVERDUE,
    INVOICE_VOID,
];

/// Statuses counted as money still owed.
pub const OPEN_INVOICE_STATUSES: &[&str] = &[INVOICE_SENT, INVOICE_OVERDUE];

/// Statuses whose amounts count as booked revenue.
pub const REVENUE_INVOICE_STATUSES: &[&str] = &[INVOICE_SENT, INVOICE_PAID, INVOICE_OVERDUE];

/// Allowed `from -> to` invoice transitions. `paid` and `void` are terminal.
fn invoice_targets(from: &str) -> &'static [&'static str] {
    match from {
        INVOICE_DRAFT => &[INVOICE_SENT, INVOICE_VOID],
        INVOICE_SENT => &[INVOICE_PAID, INVOICE_OVERDUE, INVOICE_VOID],
        INVOICE_OVERDUE => &[INVOICE_PAID, INVOICE_VOID],
        _ => &[],
    }
}

pub fn validate_invoice_status(status: &str) -> Result<(), CoreError> {
    validate_one_of(status, INVOICE_STATUSES, "invoice status")
}

pub fn validate_invoice_transition(from: &str, to: &str) -> Result<(), CoreError> {
    validate_invoice_status(to)?;
    if invoice_targets(from).contains(&to) {
        Ok(())
    } else {
        Err(CoreError::transition("Invoice", from, to))
    }
}

/// Amount still owed on an invoice. Never negative.
pub fn outstanding_cents(amount_cents: Cents, paid_cents: Cents) -> Cents {
    (amount_cents - paid_cents).max(0)
}

/// Check that a payment can be applied to an invoice.
pub fn validate_payment(
    invoice_status: &str,
    amount_cents: Cents,
    paid_cents: Cents,
    payment_cents: Cents,
) -> Result<(), CoreError> {
    if payment_cents <= 0 {
        return Err(CoreError::Validation(
            "Payment amount must be greater than zero".into(),
        ));
    }
    if !OPEN_INVOICE_STATUSES.contains(&invoice_status) {
        return Err(CoreError::Conflict(format!(
            "Payments can only be recorded against sent or overdue invoices (status is '{invoice_status}')"
        )));
    }
    let outstanding = outstanding_cents(amount_cents, paid_cents);
    if payment_cents > outstanding {
        return Err(CoreError::Validation(format!(
            "Payment of {payment_cents} exceeds outstanding balance of {outstanding}"
        )));
    }
    Ok(())
}

/// A sent invoice becomes overdue the day after its due date.
pub fn is_overdue(status: &str, due_on: Date, today: Date) -> bool {
    status == INVOICE_SENT && today > due_on
}

// ---------------------------------------------------------------------------
// Payment methods
// ---------------------------------------------------------------------------

pub const PAYMENT_METHODS: &[&str] = &["ach", "wire", "check", "card", "other"];

pub fn validate_payment_method(method: &str) -> Result<(), CoreError> {
    validate_one_of(method, PAYMENT_METHODS, "payment method")
}

// ---------------------------------------------------------------------------
// Expense categories
// ---------------------------------------------------------------------------

pub const EXPENSE_CATEGORIES: &[&str] = &[
    "production",
    "hosting",
    "marketing",
    "talent",
    "software",
    "other",
];

pub fn validate_expense_category(category: &str) -> Result<(), CoreError> {
    validate_one_of(category, EXPENSE_CATEGORIES, "expense category")
}
