//! Handlers for the `/shows` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use adops_core::error::CoreError;
use adops_core::show::validate_show_status;
use adops_core::types::DbId;
use adops_core::validation::{validate_name, validate_percentage};
use adops_db::models::campaign::Campaign;
use adops_db::models::show::{CreateShow, Show, ShowListParams, UpdateShow};
use adops_db::repositories::{CampaignRepo, ShowRepo, UserRepo};
use adops_db::DbPool;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// Load a live show of the organization or fail with 404.
pub(crate) async fn ensure_show(
    pool: &DbPool,
    organization_id: DbId,
    show_id: DbId,
) -> AppResult<Show> {
    ShowRepo::find_by_id(pool, organization_id, show_id)
        .await?
        .ok_or(AppError::not_found("Show", show_id))
}

/// The assigned talent must be an active member of the same organization.
async fn ensure_talent_user(pool: &DbPool, organization_id: DbId, user_id: DbId) -> AppResult<()> {
    match UserRepo::find_in_org(pool, organization_id, user_id).await? {
        Some(user) if user.is_active => Ok(()),
        Some(_) => Err(AppError::Core(CoreError::Validation(format!(
            "User {user_id} is deactivated and cannot be assigned as talent"
        )))),
        None => Err(AppError::not_found("User", user_id)),
    }
}

/// POST /api/v1/shows
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(input): Json<CreateShow>,
) -> AppResult<(StatusCode, Json<DataResponse<Show>>)> {
    validate_name(&input.name, "name")?;
    if let Some(status) = &input.status {
        validate_show_status(status)?;
    }
    if let Some(share) = input.revenue_share_pct {
        validate_percentage(share, "revenue_share_pct")?;
    }
    if let Some(talent) = input.talent_user_id {
        ensure_talent_user(&state.pool, admin.organization_id, talent).await?;
    }

    let show = ShowRepo::create(&state.pool, admin.organization_id, &input).await?;
    tracing::info!(user_id = admin.user_id, show_id = show.id, "Show created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: show })))
}

/// GET /api/v1/shows
///
/// Talent users only see the shows they host.
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<ShowListParams>,
) -> AppResult<Json<DataResponse<Vec<Show>>>> {
    if let Some(status) = &params.status {
        validate_show_status(status)?;
    }
    let shows = if auth.role == adops_core::roles::ROLE_TALENT {
        ShowRepo::list_for_talent(&state.pool, auth.organization_id, auth.user_id).await?
    } else {
        ShowRepo::list(&state.pool, auth.organization_id, &params).await?
    };
    Ok(Json(DataResponse { data: shows }))
}

/// GET /api/v1/shows/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Show>>> {
    let show = ensure_show(&state.pool, auth.organization_id, id).await?;
    Ok(Json(DataResponse { data: show }))
}

/// PUT /api/v1/shows/{id}
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateShow>,
) -> AppResult<Json<DataResponse<Show>>> {
    if let Some(name) = &input.name {
        validate_name(name, "name")?;
    }
    if let Some(status) = &input.status {
        validate_show_status(status)?;
    }
    if let Some(share) = input.revenue_share_pct {
        validate_percentage(share, "revenue_share_pct")?;
    }
    if let Some(talent) = input.talent_user_id {
        ensure_talent_user(&state.pool, admin.organization_id, talent).await?;
    }

    let show = ShowRepo::update(&state.pool, admin.organization_id, id, &input)
        .await?
        .ok_or(AppError::not_found("Show", id))?;
    tracing::info!(user_id = admin.user_id, show_id = id, "Show updated");
    Ok(Json(DataResponse { data: show }))
}

/// DELETE /api/v1/shows/{id}
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if ShowRepo::soft_delete(&state.pool, admin.organization_id, id).await? {
        tracing::info!(user_id = admin.user_id, show_id = id, "Show deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("Show", id))
    }
}

/// GET /api/v1/shows/{id}/campaigns
///
/// Campaigns with a flight on this show.
pub async fn list_campaigns(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<Campaign>>>> {
    ensure_show(&state.pool, auth.organization_id, id).await?;
    let campaigns = CampaignRepo::list_for_show(&state.pool, auth.organization_id, id).await?;
    Ok(Json(DataResponse { data: campaigns }))
}
