//! Route definitions for the stateless `/revenue` calculator.

use axum::routing::post;
use axum::Router;

use crate::handlers::revenue;
use crate::state::AppState;

/// Routes mounted at `/revenue`.
///
/// ```text
/// POST /estimate  -> calculate
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/estimate", post(revenue::calculate))
}
