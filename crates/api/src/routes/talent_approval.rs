//! Route definitions for the `/talent-approvals` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::talent_approval;
use crate::state::AppState;

/// Routes mounted at `/talent-approvals`.
///
/// ```text
/// GET    /               -> list (?status&mine=true)
/// POST   /               -> request
/// GET    /{id}           -> get_by_id
/// POST   /{id}/respond   -> respond
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(talent_approval::list).post(talent_approval::request),
        )
        .route("/{id}", get(talent_approval::get_by_id))
        .route("/{id}/respond", post(talent_approval::respond))
}
