//! Financial reporting: organization summary, per-show P&L and exports.

use axum::extract::{Path, Query, State};
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use adops_core::export::{self, format_cents, ReportFormat, Table};
use adops_core::pnl::{compute_pnl, merge, CategoryTotal, PnlSummary};
use adops_core::types::DbId;
use adops_db::models::financial::{InvoiceTotals, ShowFinancials};
use adops_db::repositories::FinancialRepo;
use adops_db::DbPool;

use crate::error::{AppError, AppResult};
use crate::handlers::show::ensure_show;
use crate::middleware::rbac::RequireFinance;
use crate::query::{DateRangeParams, ExportParams};
use crate::response::DataResponse;
use crate::state::AppState;

/// P&L for one show inside the reporting period.
#[derive(Debug, Clone, Serialize)]
pub struct ShowPnl {
    pub show_id: DbId,
    pub show_name: String,
    pub revenue_share_pct: f64,
    #[serde(flatten)]
    pub pnl: PnlSummary,
}

impl From<&ShowFinancials> for ShowPnl {
    fn from(row: &ShowFinancials) -> Self {
        Self {
            show_id: row.show_id,
            show_name: row.show_name.clone(),
            revenue_share_pct: row.revenue_share_pct,
            pnl: compute_pnl(row.revenue_cents, row.expense_cents, row.revenue_share_pct),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FinancialSummary {
    pub period: String,
    /// Organization-wide totals: every show plus unattributed records.
    pub totals: PnlSummary,
    pub shows: Vec<ShowPnl>,
    /// Invoices and expenses that carry no show.
    pub unattributed: PnlSummary,
    pub invoices: InvoiceTotals,
    pub expenses_by_category: Vec<CategoryTotal>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ShowPnlReport {
    pub period: String,
    #[serde(flatten)]
    pub show: ShowPnl,
    pub expenses_by_category: Vec<CategoryTotal>,
}

async fn build_summary(
    pool: &DbPool,
    organization_id: DbId,
    period: &DateRangeParams,
) -> AppResult<FinancialSummary> {
    period.validate()?;
    let (from, to) = (period.from, period.to);

    let rows = FinancialRepo::show_financials(pool, organization_id, from, to).await?;
    let unattributed = FinancialRepo::unattributed(pool, organization_id, from, to).await?;
    let invoices = FinancialRepo::invoice_totals(pool, organization_id, from, to).await?;
    let expenses_by_category =
        FinancialRepo::expenses_by_category(pool, organization_id, None, from, to).await?;

    let shows: Vec<ShowPnl> = rows.iter().map(ShowPnl::from).collect();
    // Unattributed revenue pays no talent share.
    let unattributed = compute_pnl(unattributed.revenue_cents, unattributed.expense_cents, 0.0);
    let mut parts: Vec<PnlSummary> = shows.iter().map(|s| s.pnl.clone()).collect();
    parts.push(unattributed.clone());

    Ok(FinancialSummary {
        period: period.describe(),
        totals: merge(&parts),
        shows,
        unattributed,
        invoices,
        expenses_by_category,
    })
}

fn pnl_row(section: &str, name: &str, pnl: &PnlSummary) -> Vec<String> {
    vec![
        section.to_string(),
        name.to_string(),
        format_cents(pnl.gross_revenue_cents),
        format_cents(pnl.talent_payout_cents),
        format_cents(pnl.expense_cents),
        format_cents(pnl.net_profit_cents),
        format!("{:.1}", pnl.margin_pct),
    ]
}

/// Flatten a summary into the table shared by the CSV and PDF exports.
fn summary_table(summary: &FinancialSummary) -> Table {
    let mut table = Table::new(
        "Financial Summary",
        &["section", "name", "revenue", "talent_payout", "expenses", "net_profit", "margin_pct"],
    )
    .with_subtitle(summary.period.clone());

    for show in &summary.shows {
        table.push_row(pnl_row("show", &show.show_name, &show.pnl));
    }
    table.push_row(pnl_row("unattributed", "No show", &summary.unattributed));
    table.push_row(pnl_row("total", "Organization", &summary.totals));

    for category in &summary.expenses_by_category {
        let mut row = vec![
            "expense_category".to_string(),
            category.category.clone(),
            String::new(),
            String::new(),
            format_cents(category.amount_cents),
        ];
        row.resize(7, String::new());
        table.push_row(row);
    }

    let invoices = &summary.invoices;
    for (name, cents) in [
        ("invoiced", invoices.invoiced_cents),
        ("collected", invoices.collected_cents),
        ("outstanding", invoices.outstanding_cents),
    ] {
        let mut row = vec![
            "invoices".to_string(),
            name.to_string(),
            format_cents(cents),
        ];
        row.resize(7, String::new());
        table.push_row(row);
    }
    table
}

fn attachment(format: ReportFormat, body: Vec<u8>) -> Response {
    let disposition = format!(
        "attachment; filename=\"financial-summary.{}\"",
        format.extension()
    );
    (
        StatusCode::OK,
        [
            (CONTENT_TYPE, format.content_type().to_string()),
            (CONTENT_DISPOSITION, disposition),
        ],
        body,
    )
        .into_response()
}

/// GET /api/v1/financials/summary?from=&to=
pub async fn summary(
    State(state): State<AppState>,
    RequireFinance(user): RequireFinance,
    Query(period): Query<DateRangeParams>,
) -> AppResult<Json<DataResponse<FinancialSummary>>> {
    let summary = build_summary(&state.pool, user.organization_id, &period).await?;
    Ok(Json(DataResponse { data: summary }))
}

/// GET /api/v1/shows/{id}/pnl?from=&to=
pub async fn show_pnl(
    State(state): State<AppState>,
    RequireFinance(user): RequireFinance,
    Path(show_id): Path<DbId>,
    Query(period): Query<DateRangeParams>,
) -> AppResult<Json<DataResponse<ShowPnlReport>>> {
    period.validate()?;
    let show = ensure_show(&state.pool, user.organization_id, show_id).await?;
    let row = FinancialRepo::show_financials_for(
        &state.pool,
        user.organization_id,
        show_id,
        period.from,
        period.to,
    )
    .await?
    .ok_or(AppError::not_found("Show", show_id))?;
    let expenses_by_category = FinancialRepo::expenses_by_category(
        &state.pool,
        user.organization_id,
        Some(show.id),
        period.from,
        period.to,
    )
    .await?;

    Ok(Json(DataResponse {
        data: ShowPnlReport {
            period: period.describe(),
            show: ShowPnl::from(&row),
            expenses_by_category,
        },
    }))
}

/// GET /api/v1/financials/export?format=csv|json|pdf&from=&to=
pub async fn export(
    State(state): State<AppState>,
    RequireFinance(user): RequireFinance,
    Query(params): Query<ExportParams>,
) -> AppResult<Response> {
    let format = ReportFormat::parse(params.format.as_deref())?;
    let summary = build_summary(&state.pool, user.organization_id, &params.period()).await?;
    tracing::info!(
        user_id = user.user_id,
        format = format.extension(),
        "Financial summary exported"
    );

    let response = match format {
        ReportFormat::Json => Json(DataResponse { data: summary }).into_response(),
        ReportFormat::Csv => attachment(
            format,
            export::csv::build(&summary_table(&summary)).into_bytes(),
        ),
        ReportFormat::Pdf => attachment(format, export::pdf::render(&summary_table(&summary))?),
    };
    Ok(response)
}
