//! Handlers for the `/expenses` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use adops_core::financials::validate_expense_category;
use adops_core::types::DbId;
use adops_core::validation::{validate_date_range, validate_name, validate_positive_cents};
use adops_db::models::expense::{CreateExpense, Expense, ExpenseListParams, UpdateExpense};
use adops_db::repositories::ExpenseRepo;

use crate::error::{AppError, AppResult};
use crate::handlers::show::ensure_show;
use crate::middleware::rbac::RequireFinance;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/expenses
pub async fn create(
    State(state): State<AppState>,
    RequireFinance(user): RequireFinance,
    Json(input): Json<CreateExpense>,
) -> AppResult<(StatusCode, Json<DataResponse<Expense>>)> {
    validate_expense_category(&input.category)?;
    validate_name(&input.description, "description")?;
    validate_positive_cents(input.amount_cents, "amount_cents")?;
    if let Some(show_id) = input.show_id {
        ensure_show(&state.pool, user.organization_id, show_id).await?;
    }

    let expense = ExpenseRepo::create(&state.pool, user.organization_id, &input).await?;
    tracing::info!(
        user_id = user.user_id,
        expense_id = expense.id,
        amount_cents = expense.amount_cents,
        "Expense recorded"
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: expense })))
}

/// GET /api/v1/expenses?show_id=&category=&from=&to=
pub async fn list(
    State(state): State<AppState>,
    RequireFinance(user): RequireFinance,
    Query(params): Query<ExpenseListParams>,
) -> AppResult<Json<DataResponse<Vec<Expense>>>> {
    if let Some(category) = &params.category {
        validate_expense_category(category)?;
    }
    validate_date_range(params.from, params.to)?;
    let expenses = ExpenseRepo::list(&state.pool, user.organization_id, &params).await?;
    Ok(Json(DataResponse { data: expenses }))
}

/// GET /api/v1/expenses/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    RequireFinance(user): RequireFinance,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Expense>>> {
    let expense = ExpenseRepo::find_by_id(&state.pool, user.organization_id, id)
        .await?
        .ok_or(AppError::not_found("Expense", id))?;
    Ok(Json(DataResponse { data: expense }))
}

/// PUT /api/v1/expenses/{id}
pub async fn update(
    State(state): State<AppState>,
    RequireFinance(user): RequireFinance,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateExpense>,
) -> AppResult<Json<DataResponse<Expense>>> {
    if let Some(category) = &input.category {
        validate_expense_category(category)?;
    }
    if let Some(description) = &input.description {
        validate_name(description, "description")?;
    }
    if let Some(amount) = input.amount_cents {
        validate_positive_cents(amount, "amount_cents")?;
    }
    if let Some(show_id) = input.show_id {
        ensure_show(&state.pool, user.organization_id, show_id).await?;
    }

    let expense = ExpenseRepo::update(&state.pool, user.organization_id, id, &input)
        .await?
        .ok_or(AppError::not_found("Expense", id))?;
    Ok(Json(DataResponse { data: expense }))
}

/// DELETE /api/v1/expenses/{id}
pub async fn delete(
    State(state): State<AppState>,
    RequireFinance(user): RequireFinance,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if ExpenseRepo::soft_delete(&state.pool, user.organization_id, id).await? {
        tracing::info!(user_id = user.user_id, expense_id = id, "Expense deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("Expense", id))
    }
}
