//! Role gates for handlers.
//!
//! Each gate is an extractor around [`AuthUser`] that answers 403 when the
//! caller lacks the role. `admin` passes every gate; talent has no gate of
//! its own because talent endpoints filter rows by the caller instead.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use adops_core::error::CoreError;
use adops_core::roles::{ROLE_ADMIN, ROLE_FINANCE, ROLE_SALES};

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Authenticate, then check `role` (admins always pass).
async fn authorize(
    parts: &mut Parts,
    state: &AppState,
    role: &'static str,
    denial: &'static str,
) -> Result<AuthUser, AppError> {
    let user = AuthUser::from_request_parts(parts, state).await?;
    if user.has_role(role) {
        Ok(user)
    } else {
        tracing::debug!(user_id = user.user_id, role = %user.role, required = role, "Role gate denied");
        Err(AppError::Core(CoreError::Forbidden(denial.into())))
    }
}

/// User management and the activity feed.
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, AppError> {
        authorize(parts, state, ROLE_ADMIN, "Admin role required")
            .await
            .map(Self)
    }
}

/// Campaigns, flights, proposals, creatives and approval requests.
pub struct RequireSales(pub AuthUser);

impl FromRequestParts<AppState> for RequireSales {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, AppError> {
        authorize(parts, state, ROLE_SALES, "Sales or Admin role required")
            .await
            .map(Self)
    }
}

/// Invoices, payments, expenses, rate cards and the financial reports.
pub struct RequireFinance(pub AuthUser);

impl FromRequestParts<AppState> for RequireFinance {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, AppError> {
        authorize(parts, state, ROLE_FINANCE, "Finance or Admin role required")
            .await
            .map(Self)
    }
}
