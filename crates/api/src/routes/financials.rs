//! Route definitions for invoices, expenses and financial reports.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::{expense, financials, invoice};
use crate::state::AppState;

/// Routes mounted at `/invoices`.
///
/// ```text
/// GET    /                  -> list
/// POST   /                  -> create
/// POST   /mark-overdue      -> mark_overdue
/// GET    /{id}              -> get_by_id
/// PUT    /{id}              -> update (drafts only)
/// DELETE /{id}              -> delete (drafts only)
/// PUT    /{id}/status       -> set_status
/// GET    /{id}/payments     -> list_payments
/// POST   /{id}/payments     -> record_payment
/// ```
pub fn invoice_router() -> Router<AppState> {
    Router::new()
        .route("/", get(invoice::list).post(invoice::create))
        .route("/mark-overdue", post(invoice::mark_overdue))
        .route(
            "/{id}",
            get(invoice::get_by_id)
                .put(invoice::update)
                .delete(invoice::delete),
        )
        .route("/{id}/status", put(invoice::set_status))
        .route(
            "/{id}/payments",
            get(invoice::list_payments).post(invoice::record_payment),
        )
}

/// Routes mounted at `/expenses`.
///
/// ```text
/// GET    /       -> list (?show_id&category&from&to)
/// POST   /       -> create
/// GET    /{id}   -> get_by_id
/// PUT    /{id}   -> update
/// DELETE /{id}   -> delete
/// ```
pub fn expense_router() -> Router<AppState> {
    Router::new()
        .route("/", get(expense::list).post(expense::create))
        .route(
            "/{id}",
            get(expense::get_by_id)
                .put(expense::update)
                .delete(expense::delete),
        )
}

/// Routes mounted at `/financials`.
///
/// ```text
/// GET /summary  -> summary (?from&to)
/// GET /export   -> export (?format=csv|json|pdf&from&to)
/// ```
pub fn report_router() -> Router<AppState> {
    Router::new()
        .route("/summary", get(financials::summary))
        .route("/export", get(financials::export))
}
