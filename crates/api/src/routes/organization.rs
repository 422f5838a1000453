//! Route definitions for the `/organization` resource (the caller's org).

use axum::routing::get;
use axum::Router;

use crate::handlers::organization;
use crate::state::AppState;

/// Routes mounted at `/organization`.
///
/// ```text
/// GET /          -> get_current
/// PUT /          -> update_current (admin)
/// GET /overview  -> overview
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(organization::get_current).put(organization::update_current),
        )
        .route("/overview", get(organization::overview))
}
