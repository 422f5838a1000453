//! Download analytics: ingest per episode, aggregate per show.

use std::collections::HashSet;

use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use adops_core::types::{Date, DbId};
use adops_db::models::analytics::{DailyDownloads, EpisodeDownloadTotal};
use adops_db::repositories::{AnalyticsRepo, EpisodeRepo};

use crate::error::{AppError, AppResult};
use crate::handlers::show::ensure_show;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::query::AnalyticsParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Most days accepted in one ingest request.
const MAX_INGEST_DAYS: usize = 366;

#[derive(Debug, Deserialize)]
pub struct IngestDownloadsRequest {
    pub days: Vec<DailyDownloads>,
}

#[derive(Debug, Serialize)]
pub struct IngestResult {
    pub episode_id: DbId,
    pub days_written: u64,
}

#[derive(Debug, Serialize)]
pub struct ShowAnalytics {
    pub show_id: DbId,
    pub since: Date,
    pub days: i64,
    pub total_downloads: i64,
    /// `None` when no episode has downloads in the window.
    pub avg_downloads_per_episode: Option<f64>,
    pub episodes: Vec<EpisodeDownloadTotal>,
    pub daily: Vec<DailyDownloads>,
}

/// First day of a trailing window of `days` days ending today.
pub(crate) fn window_start(days: i64) -> Date {
    Utc::now().date_naive() - Duration::days(days - 1)
}

fn validate_ingest(days: &[DailyDownloads]) -> AppResult<()> {
    if days.is_empty() {
        return Err(AppError::BadRequest("days must not be empty".into()));
    }
    if days.len() > MAX_INGEST_DAYS {
        return Err(AppError::BadRequest(format!(
            "At most {MAX_INGEST_DAYS} days may be ingested per request"
        )));
    }
    let mut seen = HashSet::with_capacity(days.len());
    for entry in days {
        if entry.downloads < 0 {
            return Err(AppError::BadRequest(format!(
                "downloads for {} must not be negative",
                entry.day
            )));
        }
        if !seen.insert(entry.day) {
            return Err(AppError::BadRequest(format!(
                "day {} appears more than once",
                entry.day
            )));
        }
    }
    Ok(())
}

/// POST /api/v1/episodes/{id}/downloads
///
/// Upserts daily counts; re-sending a day overwrites it.
pub async fn ingest_downloads(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(episode_id): Path<DbId>,
    Json(input): Json<IngestDownloadsRequest>,
) -> AppResult<Json<DataResponse<IngestResult>>> {
    EpisodeRepo::find_by_id(&state.pool, admin.organization_id, episode_id)
        .await?
        .ok_or(AppError::not_found("Episode", episode_id))?;
    validate_ingest(&input.days)?;

    let written = AnalyticsRepo::upsert_downloads(&state.pool, episode_id, &input.days).await?;
    tracing::info!(episode_id, days_written = written, "Downloads ingested");

    Ok(Json(DataResponse {
        data: IngestResult {
            episode_id,
            days_written: written,
        },
    }))
}

/// GET /api/v1/shows/{id}/analytics?days=N
pub async fn show_analytics(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(show_id): Path<DbId>,
    Query(params): Query<AnalyticsParams>,
) -> AppResult<Json<DataResponse<ShowAnalytics>>> {
    ensure_show(&state.pool, auth.organization_id, show_id).await?;
    let days = params.days();
    let since = window_start(days);

    let total_downloads = AnalyticsRepo::total_for_show(&state.pool, show_id, since).await?;
    let avg = AnalyticsRepo::average_per_episode(&state.pool, show_id, since).await?;
    let episodes = AnalyticsRepo::per_episode(&state.pool, show_id, since).await?;
    let daily = AnalyticsRepo::daily_series(&state.pool, show_id, since).await?;

    Ok(Json(DataResponse {
        data: ShowAnalytics {
            show_id,
            since,
            days,
            total_downloads,
            avg_downloads_per_episode: avg,
            episodes,
            daily,
        },
    }))
}
