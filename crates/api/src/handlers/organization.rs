//! Handlers for `/organization`: the caller's own organization.

use axum::extract::State;
use axum::Json;
use adops_core::validation::{validate_email, validate_name};
use adops_db::models::organization::{Organization, OrganizationOverview, UpdateOrganization};
use adops_db::repositories::OrganizationRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/organization
pub async fn get_current(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<Organization>>> {
    let org = OrganizationRepo::find_by_id(&state.pool, auth.organization_id)
        .await?
        .ok_or(AppError::not_found("Organization", auth.organization_id))?;
    Ok(Json(DataResponse { data: org }))
}

/// PUT /api/v1/organization
pub async fn update_current(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(input): Json<UpdateOrganization>,
) -> AppResult<Json<DataResponse<Organization>>> {
    if let Some(name) = &input.name {
        validate_name(name, "name")?;
    }
    if let Some(email) = &input.contact_email {
        validate_email(email)?;
    }
    let org = OrganizationRepo::update(&state.pool, admin.organization_id, &input)
        .await?
        .ok_or(AppError::not_found("Organization", admin.organization_id))?;

    tracing::info!(admin_id = admin.user_id, organization_id = org.id, "Organization updated");
    Ok(Json(DataResponse { data: org }))
}

/// GET /api/v1/organization/overview
///
/// Dashboard counters: shows, active campaigns, open invoices and the
/// amount still owed on them, pending talent approvals.
pub async fn overview(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<OrganizationOverview>>> {
    let data = OrganizationRepo::overview(&state.pool, auth.organization_id).await?;
    Ok(Json(DataResponse { data }))
}
