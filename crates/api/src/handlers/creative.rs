//! Handlers for creatives: listed and created under
//! `/campaigns/{campaign_id}/creatives`, edited at `/creatives/{id}`.
//!
//! Status is driven by the talent approval flow, not edited directly.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use adops_core::types::DbId;
use adops_core::show::validate_creative_type;
use adops_core::validation::validate_name;
use adops_db::models::creative::{CreateCreative, Creative, UpdateCreative};
use adops_db::repositories::CreativeRepo;

use crate::error::{AppError, AppResult};
use crate::handlers::campaign::ensure_campaign;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireSales;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/campaigns/{campaign_id}/creatives
pub async fn list_for_campaign(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(campaign_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<Creative>>>> {
    ensure_campaign(&state.pool, auth.organization_id, campaign_id).await?;
    let creatives = CreativeRepo::list_for_campaign(&state.pool, campaign_id).await?;
    Ok(Json(DataResponse { data: creatives }))
}

/// POST /api/v1/campaigns/{campaign_id}/creatives
pub async fn create(
    State(state): State<AppState>,
    RequireSales(user): RequireSales,
    Path(campaign_id): Path<DbId>,
    Json(input): Json<CreateCreative>,
) -> AppResult<(StatusCode, Json<DataResponse<Creative>>)> {
    ensure_campaign(&state.pool, user.organization_id, campaign_id).await?;
    validate_name(&input.name, "name")?;
    if let Some(kind) = &input.creative_type {
        validate_creative_type(kind)?;
    }

    let creative = CreativeRepo::create(&state.pool, campaign_id, &input).await?;
    tracing::info!(
        user_id = user.user_id,
        campaign_id,
        creative_id = creative.id,
        "Creative created"
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: creative })))
}

/// GET /api/v1/creatives/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Creative>>> {
    let creative = CreativeRepo::find_by_id(&state.pool, auth.organization_id, id)
        .await?
        .ok_or(AppError::not_found("Creative", id))?;
    Ok(Json(DataResponse { data: creative }))
}

/// PUT /api/v1/creatives/{id}
///
/// Editing the script or audio sends the creative back to `draft`.
pub async fn update(
    State(state): State<AppState>,
    RequireSales(user): RequireSales,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateCreative>,
) -> AppResult<Json<DataResponse<Creative>>> {
    if let Some(name) = &input.name {
        validate_name(name, "name")?;
    }
    if let Some(kind) = &input.creative_type {
        validate_creative_type(kind)?;
    }
    let creative = CreativeRepo::update(&state.pool, user.organization_id, id, &input)
        .await?
        .ok_or(AppError::not_found("Creative", id))?;
    Ok(Json(DataResponse { data: creative }))
}

/// DELETE /api/v1/creatives/{id}
pub async fn delete(
    State(state): State<AppState>,
    RequireSales(user): RequireSales,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if CreativeRepo::delete(&state.pool, user.organization_id, id).await? {
        tracing::info!(user_id = user.user_id, creative_id = id, "Creative deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("Creative", id))
    }
}
