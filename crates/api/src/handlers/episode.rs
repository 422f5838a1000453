//! Handlers for episodes, nested under `/shows/{show_id}/episodes` for
//! listing and creation and addressed directly at `/episodes/{id}`.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use adops_core::show::validate_episode_status;
use adops_core::types::DbId;
use adops_core::validation::validate_name;
use adops_db::models::episode::{CreateEpisode, Episode, UpdateEpisode};
use adops_db::repositories::EpisodeRepo;

use crate::error::{AppError, AppResult};
use crate::handlers::show::ensure_show;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

fn validate_counts(episode_number: Option<i32>, duration_secs: Option<i32>) -> AppResult<()> {
    if episode_number.is_some_and(|n| n < 0) || duration_secs.is_some_and(|d| d < 0) {
        return Err(AppError::BadRequest(
            "episode_number and duration_secs must not be negative".into(),
        ));
    }
    Ok(())
}

/// GET /api/v1/shows/{show_id}/episodes
pub async fn list_for_show(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(show_id): Path<DbId>,
    Query(page): Query<PaginationParams>,
) -> AppResult<Json<DataResponse<Vec<Episode>>>> {
    ensure_show(&state.pool, auth.organization_id, show_id).await?;
    let episodes = EpisodeRepo::list_for_show(&state.pool, show_id, page.limit, page.offset).await?;
    Ok(Json(DataResponse { data: episodes }))
}

/// POST /api/v1/shows/{show_id}/episodes
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(show_id): Path<DbId>,
    Json(input): Json<CreateEpisode>,
) -> AppResult<(StatusCode, Json<DataResponse<Episode>>)> {
    ensure_show(&state.pool, admin.organization_id, show_id).await?;
    validate_name(&input.title, "title")?;
    if let Some(status) = &input.status {
        validate_episode_status(status)?;
    }
    validate_counts(input.episode_number, input.duration_secs)?;

    let episode = EpisodeRepo::create(&state.pool, show_id, &input).await?;
    tracing::info!(user_id = admin.user_id, show_id, episode_id = episode.id, "Episode created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: episode })))
}

/// GET /api/v1/episodes/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Episode>>> {
    let episode = EpisodeRepo::find_by_id(&state.pool, auth.organization_id, id)
        .await?
        .ok_or(AppError::not_found("Episode", id))?;
    Ok(Json(DataResponse { data: episode }))
}

/// PUT /api/v1/episodes/{id}
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateEpisode>,
) -> AppResult<Json<DataResponse<Episode>>> {
    if let Some(title) = &input.title {
        validate_name(title, "title")?;
    }
    if let Some(status) = &input.status {
        validate_episode_status(status)?;
    }
    validate_counts(input.episode_number, input.duration_secs)?;

    let episode = EpisodeRepo::update(&state.pool, admin.organization_id, id, &input)
        .await?
        .ok_or(AppError::not_found("Episode", id))?;
    Ok(Json(DataResponse { data: episode }))
}

/// DELETE /api/v1/episodes/{id}
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if EpisodeRepo::soft_delete(&state.pool, admin.organization_id, id).await? {
        tracing::info!(user_id = admin.user_id, episode_id = id, "Episode deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("Episode", id))
    }
}
