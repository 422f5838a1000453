//! Per-episode ad-revenue estimates.
//!
//! A show's stored rate card feeds the estimate together with its measured
//! average downloads over the trailing analytics window. A stateless
//! calculator accepts an ad-hoc rate card for what-if pricing.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use adops_core::revenue::{estimate_episode, project, validate_settings, RevenueEstimate, RevenueSettings};
use adops_core::types::DbId;
use adops_db::models::show::Show;
use adops_db::repositories::{AnalyticsRepo, ShowRepo};

use crate::error::{AppError, AppResult};
use crate::handlers::analytics::window_start;
use crate::handlers::show::ensure_show;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireFinance;
use crate::query::DEFAULT_ANALYTICS_DAYS;
use crate::response::DataResponse;
use crate::state::AppState;

/// Upper bound on `episodes` for projections.
const MAX_PROJECTED_EPISODES: u32 = 520;

#[derive(Debug, Default, Deserialize)]
pub struct EstimateParams {
    /// Project the per-episode estimate over this many episodes.
    pub episodes: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct CalculateRequest {
    #[serde(flatten)]
    pub settings: RevenueSettings,
    /// Measured average downloads, used when no override is set.
    pub measured_downloads: Option<f64>,
    pub episodes: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct EstimateResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_id: Option<DbId>,
    pub estimate: RevenueEstimate,
    pub episodes: u32,
    pub projected_total: f64,
}

/// `episodes` defaults to 1 and is capped at [`MAX_PROJECTED_EPISODES`];
/// an explicit 0 is rejected.
fn build_response(
    show_id: Option<DbId>,
    estimate: RevenueEstimate,
    episodes: Option<u32>,
) -> AppResult<EstimateResponse> {
    let episodes = match episodes {
        Some(0) => return Err(AppError::BadRequest("episodes must be at least 1".into())),
        Some(n) => n.min(MAX_PROJECTED_EPISODES),
        None => 1,
    };
    Ok(EstimateResponse {
        show_id,
        projected_total: project(&estimate, episodes),
        estimate,
        episodes,
    })
}

/// GET /api/v1/shows/{id}/revenue-settings
pub async fn get_settings(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<RevenueSettings>>> {
    let show = ensure_show(&state.pool, auth.organization_id, id).await?;
    Ok(Json(DataResponse {
        data: show.revenue_settings(),
    }))
}

/// PUT /api/v1/shows/{id}/revenue-settings
///
/// Replaces the whole rate card; omitted placements are cleared.
pub async fn update_settings(
    State(state): State<AppState>,
    RequireFinance(user): RequireFinance,
    Path(id): Path<DbId>,
    Json(settings): Json<RevenueSettings>,
) -> AppResult<Json<DataResponse<RevenueSettings>>> {
    validate_settings(&settings)?;
    let show: Show =
        ShowRepo::update_revenue_settings(&state.pool, user.organization_id, id, &settings)
            .await?
            .ok_or(AppError::not_found("Show", id))?;

    tracing::info!(
        user_id = user.user_id,
        show_id = id,
        pricing_model = settings.pricing_model.as_str(),
        "Revenue settings updated"
    );
    Ok(Json(DataResponse {
        data: show.revenue_settings(),
    }))
}

/// GET /api/v1/shows/{id}/revenue-estimate?episodes=N
///
/// `episodes=0` is a 400; values above the projection cap are clamped.
pub async fn show_estimate(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    Query(params): Query<EstimateParams>,
) -> AppResult<Json<DataResponse<EstimateResponse>>> {
    let show = ensure_show(&state.pool, auth.organization_id, id).await?;
    let since = window_start(DEFAULT_ANALYTICS_DAYS);
    let measured = AnalyticsRepo::average_per_episode(&state.pool, id, since).await?;

    let estimate = estimate_episode(
        &show.revenue_settings(),
        measured,
        state.config.default_avg_downloads,
    );
    Ok(Json(DataResponse {
        data: build_response(Some(id), estimate, params.episodes)?,
    }))
}

/// POST /api/v1/revenue/estimate
///
/// Rate inputs never fail: missing, negative or non-finite numbers count
/// as zero and overflowing products collapse to zero. Only `episodes: 0`
/// is rejected.
pub async fn calculate(
    State(state): State<AppState>,
    _auth: AuthUser,
    Json(input): Json<CalculateRequest>,
) -> AppResult<Json<DataResponse<EstimateResponse>>> {
    let estimate = estimate_episode(
        &input.settings,
        input.measured_downloads,
        state.config.default_avg_downloads,
    );
    Ok(Json(DataResponse {
        data: build_response(None, estimate, input.episodes)?,
    }))
}
