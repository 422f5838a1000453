//! Handlers for `/invoices` and their payments.
//!
//! All endpoints require the finance role.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::Serialize;
use adops_core::error::CoreError;
use adops_core::event_types::{EVENT_INVOICE_OVERDUE, EVENT_INVOICE_PAID};
use adops_core::financials::{
    outstanding_cents, validate_invoice_status, validate_invoice_transition,
    validate_payment_method, INVOICE_DRAFT, INVOICE_PAID,
};
use adops_core::types::{Cents, Date, DbId};
use adops_core::validation::{validate_name, validate_positive_cents};
use adops_db::models::invoice::{
    CreateInvoice, CreatePayment, Invoice, InvoiceListParams, Payment, UpdateInvoice,
};
use adops_db::repositories::{InvoiceRepo, PaymentOutcome};
use adops_db::DbPool;
use adops_events::PlatformEvent;

use crate::error::{AppError, AppResult};
use crate::handlers::campaign::{ensure_campaign, StatusRequest};
use crate::handlers::show::ensure_show;
use crate::middleware::rbac::RequireFinance;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct PaymentRecorded {
    pub payment: Payment,
    pub invoice: Invoice,
}

#[derive(Debug, Serialize)]
pub struct OverdueSweep {
    pub marked: usize,
    pub invoices: Vec<Invoice>,
}

async fn ensure_invoice(pool: &DbPool, organization_id: DbId, id: DbId) -> AppResult<Invoice> {
    InvoiceRepo::find_by_id(pool, organization_id, id)
        .await?
        .ok_or(AppError::not_found("Invoice", id))
}

fn validate_terms(issued_on: Date, due_on: Date) -> AppResult<()> {
    if due_on < issued_on {
        return Err(AppError::Core(CoreError::Validation(
            "due_on must be on or after issued_on".into(),
        )));
    }
    Ok(())
}

async fn ensure_links(
    pool: &DbPool,
    organization_id: DbId,
    campaign_id: Option<DbId>,
    show_id: Option<DbId>,
) -> AppResult<()> {
    if let Some(campaign_id) = campaign_id {
        ensure_campaign(pool, organization_id, campaign_id).await?;
    }
    if let Some(show_id) = show_id {
        ensure_show(pool, organization_id, show_id).await?;
    }
    Ok(())
}

fn paid_event(organization_id: DbId, actor: DbId, invoice: &Invoice) -> PlatformEvent {
    PlatformEvent::new(EVENT_INVOICE_PAID)
        .with_organization(organization_id)
        .with_source("invoice", invoice.id)
        .with_actor(actor)
        .with_payload(serde_json::json!({
            "invoice_number": invoice.invoice_number,
            "client_name": invoice.client_name,
            "amount_cents": invoice.amount_cents,
        }))
}

/// POST /api/v1/invoices
///
/// New invoices start as drafts.
pub async fn create(
    State(state): State<AppState>,
    RequireFinance(user): RequireFinance,
    Json(input): Json<CreateInvoice>,
) -> AppResult<(StatusCode, Json<DataResponse<Invoice>>)> {
    validate_name(&input.invoice_number, "invoice_number")?;
    validate_name(&input.client_name, "client_name")?;
    validate_positive_cents(input.amount_cents, "amount_cents")?;
    validate_terms(input.issued_on, input.due_on)?;
    ensure_links(&state.pool, user.organization_id, input.campaign_id, input.show_id).await?;

    let invoice = InvoiceRepo::create(&state.pool, user.organization_id, &input).await?;
    tracing::info!(
        user_id = user.user_id,
        invoice_id = invoice.id,
        amount_cents = invoice.amount_cents,
        "Invoice created"
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: invoice })))
}

/// GET /api/v1/invoices?status=&campaign_id=&show_id=&from=&to=
pub async fn list(
    State(state): State<AppState>,
    RequireFinance(user): RequireFinance,
    Query(params): Query<InvoiceListParams>,
) -> AppResult<Json<DataResponse<Vec<Invoice>>>> {
    if let Some(status) = &params.status {
        validate_invoice_status(status)?;
    }
    adops_core::validation::validate_date_range(params.from, params.to)?;
    let invoices = InvoiceRepo::list(&state.pool, user.organization_id, &params).await?;
    Ok(Json(DataResponse { data: invoices }))
}

/// GET /api/v1/invoices/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    RequireFinance(user): RequireFinance,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Invoice>>> {
    let invoice = ensure_invoice(&state.pool, user.organization_id, id).await?;
    Ok(Json(DataResponse { data: invoice }))
}

/// PUT /api/v1/invoices/{id}
///
/// Only drafts can be edited.
pub async fn update(
    State(state): State<AppState>,
    RequireFinance(user): RequireFinance,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateInvoice>,
) -> AppResult<Json<DataResponse<Invoice>>> {
    let existing = ensure_invoice(&state.pool, user.organization_id, id).await?;
    if existing.status != INVOICE_DRAFT {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Invoice is '{}'; only draft invoices can be edited",
            existing.status
        ))));
    }
    if let Some(client) = &input.client_name {
        validate_name(client, "client_name")?;
    }
    if let Some(amount) = input.amount_cents {
        validate_positive_cents(amount, "amount_cents")?;
    }
    validate_terms(
        input.issued_on.unwrap_or(existing.issued_on),
        input.due_on.unwrap_or(existing.due_on),
    )?;
    ensure_links(&state.pool, user.organization_id, input.campaign_id, input.show_id).await?;

    let invoice = InvoiceRepo::update(&state.pool, user.organization_id, id, &input)
        .await?
        .ok_or(AppError::not_found("Invoice", id))?;
    Ok(Json(DataResponse { data: invoice }))
}

/// DELETE /api/v1/invoices/{id}
///
/// Issued invoices are voided through the status endpoint instead.
pub async fn delete(
    State(state): State<AppState>,
    RequireFinance(user): RequireFinance,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let existing = ensure_invoice(&state.pool, user.organization_id, id).await?;
    if existing.status != INVOICE_DRAFT {
        return Err(AppError::Core(CoreError::Conflict(
            "Only draft invoices can be deleted; void it instead".into(),
        )));
    }
    if InvoiceRepo::delete_draft(&state.pool, user.organization_id, id).await? {
        tracing::info!(user_id = user.user_id, invoice_id = id, "Invoice deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("Invoice", id))
    }
}

/// PUT /api/v1/invoices/{id}/status
///
/// `paid` is only accepted once payments cover the full amount.
pub async fn set_status(
    State(state): State<AppState>,
    RequireFinance(user): RequireFinance,
    Path(id): Path<DbId>,
    Json(input): Json<StatusRequest>,
) -> AppResult<Json<DataResponse<Invoice>>> {
    let existing = ensure_invoice(&state.pool, user.organization_id, id).await?;
    validate_invoice_transition(&existing.status, &input.status)?;
    if input.status == INVOICE_PAID {
        let outstanding = outstanding_cents(existing.amount_cents, existing.paid_cents);
        if outstanding > 0 {
            return Err(AppError::Core(CoreError::Conflict(format!(
                "Invoice still has {outstanding} cents outstanding; record a payment instead"
            ))));
        }
    }

    let invoice = InvoiceRepo::set_status(&state.pool, user.organization_id, id, &input.status)
        .await?
        .ok_or(AppError::not_found("Invoice", id))?;
    tracing::info!(
        user_id = user.user_id,
        invoice_id = id,
        from = %existing.status,
        to = %invoice.status,
        "Invoice status changed"
    );
    if invoice.status == INVOICE_PAID {
        state
            .event_bus
            .publish(paid_event(user.organization_id, user.user_id, &invoice));
    }
    Ok(Json(DataResponse { data: invoice }))
}

/// POST /api/v1/invoices/mark-overdue
///
/// Sweep sent invoices past their due date into `overdue`.
pub async fn mark_overdue(
    State(state): State<AppState>,
    RequireFinance(user): RequireFinance,
) -> AppResult<Json<DataResponse<OverdueSweep>>> {
    let today = Utc::now().date_naive();
    let invoices = InvoiceRepo::mark_overdue(&state.pool, user.organization_id, today).await?;

    for invoice in &invoices {
        let outstanding: Cents = outstanding_cents(invoice.amount_cents, invoice.paid_cents);
        state.event_bus.publish(
            PlatformEvent::new(EVENT_INVOICE_OVERDUE)
                .with_organization(user.organization_id)
                .with_source("invoice", invoice.id)
                .with_actor(user.user_id)
                .with_payload(serde_json::json!({
                    "invoice_number": invoice.invoice_number,
                    "client_name": invoice.client_name,
                    "due_on": invoice.due_on,
                    "outstanding_cents": outstanding,
                })),
        );
    }

    tracing::info!(
        user_id = user.user_id,
        marked = invoices.len(),
        "Overdue invoices swept"
    );
    Ok(Json(DataResponse {
        data: OverdueSweep {
            marked: invoices.len(),
            invoices,
        },
    }))
}

// ---------------------------------------------------------------------------
// Payments
// ---------------------------------------------------------------------------

/// GET /api/v1/invoices/{id}/payments
pub async fn list_payments(
    State(state): State<AppState>,
    RequireFinance(user): RequireFinance,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<Payment>>>> {
    ensure_invoice(&state.pool, user.organization_id, id).await?;
    let payments = InvoiceRepo::list_payments(&state.pool, id).await?;
    Ok(Json(DataResponse { data: payments }))
}

/// POST /api/v1/invoices/{id}/payments
///
/// A payment that settles the balance moves the invoice to `paid`.
pub async fn record_payment(
    State(state): State<AppState>,
    RequireFinance(user): RequireFinance,
    Path(id): Path<DbId>,
    Json(input): Json<CreatePayment>,
) -> AppResult<(StatusCode, Json<DataResponse<PaymentRecorded>>)> {
    ensure_invoice(&state.pool, user.organization_id, id).await?;
    if let Some(method) = &input.method {
        validate_payment_method(method)?;
    }

    let outcome =
        InvoiceRepo::record_payment(&state.pool, user.organization_id, id, user.user_id, &input)
            .await?;
    let (payment, updated, previous_status) = match outcome {
        PaymentOutcome::Recorded {
            payment,
            invoice,
            previous_status,
        } => (payment, invoice, previous_status),
        PaymentOutcome::Rejected(e) => return Err(e.into()),
    };
    tracing::info!(
        user_id = user.user_id,
        invoice_id = id,
        payment_id = payment.id,
        amount_cents = payment.amount_cents,
        "Payment recorded"
    );

    if updated.status == INVOICE_PAID && previous_status != INVOICE_PAID {
        state
            .event_bus
            .publish(paid_event(user.organization_id, user.user_id, &updated));
    }

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: PaymentRecorded {
                payment,
                invoice: updated,
            },
        }),
    ))
}
