//! The caller's identity, taken from the access token.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use adops_core::error::CoreError;
use adops_core::roles::ROLE_ADMIN;
use adops_core::types::DbId;

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated caller extracted from `Authorization: Bearer <token>`.
///
/// Handlers scope every query by `organization_id`, so one tenant never
/// reads another's shows, campaigns or invoices.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: DbId,
    pub organization_id: DbId,
    pub role: String,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role == ROLE_ADMIN
    }

    /// True when the caller holds `role` or is an admin.
    pub fn has_role(&self, role: &str) -> bool {
        self.is_admin() || self.role == role
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Missing Authorization header".into(),
                ))
            })?;

        let token = header
            .split_once(' ')
            .filter(|(scheme, _)| scheme.eq_ignore_ascii_case("bearer"))
            .map(|(_, token)| token.trim())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Invalid Authorization format. Expected: Bearer <token>".into(),
                ))
            })?;

        let claims = validate_token(token, &state.config.jwt).map_err(|_| {
            AppError::Core(CoreError::Unauthorized("Invalid or expired token".into()))
        })?;

        Ok(AuthUser {
            user_id: claims.sub,
            organization_id: claims.org,
            role: claims.role,
        })
    }
}
