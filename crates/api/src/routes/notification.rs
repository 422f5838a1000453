//! Route definitions for the `/notifications` resource.
//!
//! All endpoints act on the caller's own notifications.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::notification;
use crate::state::AppState;

/// Routes mounted at `/notifications`.
///
/// ```text
/// GET    /              -> list
/// POST   /read-all      -> mark_all_read
/// GET    /unread-count  -> unread_count
/// POST   /{id}/read     -> mark_read
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(notification::list))
        .route("/read-all", post(notification::mark_all_read))
        .route("/unread-count", get(notification::unread_count))
        .route("/{id}/read", post(notification::mark_read))
}
