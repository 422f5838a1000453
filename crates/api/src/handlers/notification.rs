//! The caller's in-app inbox. Users only ever see and change their own rows.

use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use adops_core::types::DbId;
use adops_db::models::notification::{InboxFilter, Notification};
use adops_db::repositories::NotificationRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Event families a client may filter the inbox by.
const CATEGORIES: &[&str] = &["invoice", "proposal", "campaign", "talent_approval"];

#[derive(Debug, Deserialize)]
pub struct InboxQuery {
    #[serde(default)]
    pub unread_only: bool,
    pub category: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ReadAllRequest {
    pub category: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UnreadCount {
    pub unread_count: i64,
}

#[derive(Debug, Serialize)]
pub struct MarkedRead {
    pub marked: u64,
}

fn check_category(category: Option<String>) -> AppResult<Option<String>> {
    match category {
        Some(c) if !CATEGORIES.contains(&c.as_str()) => Err(AppError::BadRequest(format!(
            "Unknown notification category '{c}'. Expected one of: {}",
            CATEGORIES.join(", ")
        ))),
        other => Ok(other),
    }
}

/// GET /api/v1/notifications?unread_only=&category=&limit=&offset=
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<InboxQuery>,
) -> AppResult<Json<DataResponse<Vec<Notification>>>> {
    let filter = InboxFilter {
        unread_only: params.unread_only,
        category: check_category(params.category)?,
    };
    let (limit, offset) = PaginationParams {
        limit: params.limit,
        offset: params.offset,
    }
    .resolve();

    let data =
        NotificationRepo::list_for_user(&state.pool, auth.user_id, &filter, limit, offset).await?;
    Ok(Json(DataResponse { data }))
}

/// POST /api/v1/notifications/{id}/read
pub async fn mark_read(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !NotificationRepo::mark_read(&state.pool, auth.user_id, id).await? {
        return Err(AppError::not_found("Notification", id));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/notifications/read-all
///
/// The body is optional; `{"category": "invoice"}` limits the sweep.
pub async fn mark_all_read(
    State(state): State<AppState>,
    auth: AuthUser,
    body: Bytes,
) -> AppResult<Json<DataResponse<MarkedRead>>> {
    let request: ReadAllRequest = if body.iter().all(u8::is_ascii_whitespace) {
        ReadAllRequest::default()
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| AppError::BadRequest(format!("Invalid JSON body: {e}")))?
    };
    let category = check_category(request.category)?;
    let marked =
        NotificationRepo::mark_all_read(&state.pool, auth.user_id, category.as_deref()).await?;
    tracing::debug!(user_id = auth.user_id, marked, "Notifications marked read");
    Ok(Json(DataResponse {
        data: MarkedRead { marked },
    }))
}

/// GET /api/v1/notifications/unread-count
pub async fn unread_count(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<UnreadCount>>> {
    let unread_count = NotificationRepo::unread_count(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse {
        data: UnreadCount { unread_count },
    }))
}
