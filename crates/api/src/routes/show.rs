//! Route definitions for the `/shows` and `/episodes` resources.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{analytics, episode, financials, revenue, show};
use crate::state::AppState;

/// Routes mounted at `/shows`.
///
/// ```text
/// GET    /                        -> show::list
/// POST   /                        -> show::create
/// GET    /{id}                    -> show::get_by_id
/// PUT    /{id}                    -> show::update
/// DELETE /{id}                    -> show::delete
/// GET    /{id}/campaigns          -> show::list_campaigns
/// GET    /{id}/episodes           -> episode::list_for_show
/// POST   /{id}/episodes           -> episode::create
/// GET    /{id}/revenue-settings   -> revenue::get_settings
/// PUT    /{id}/revenue-settings   -> revenue::update_settings
/// GET    /{id}/revenue-estimate   -> revenue::show_estimate
/// GET    /{id}/analytics          -> analytics::show_analytics
/// GET    /{id}/pnl                -> financials::show_pnl
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(show::list).post(show::create))
        .route(
            "/{id}",
            get(show::get_by_id).put(show::update).delete(show::delete),
        )
        .route("/{id}/campaigns", get(show::list_campaigns))
        .route(
            "/{id}/episodes",
            get(episode::list_for_show).post(episode::create),
        )
        .route(
            "/{id}/revenue-settings",
            get(revenue::get_settings).put(revenue::update_settings),
        )
        .route("/{id}/revenue-estimate", get(revenue::show_estimate))
        .route("/{id}/analytics", get(analytics::show_analytics))
        .route("/{id}/pnl", get(financials::show_pnl))
}

/// Routes mounted at `/episodes`.
///
/// ```text
/// GET    /{id}            -> episode::get_by_id
/// PUT    /{id}            -> episode::update
/// DELETE /{id}            -> episode::delete
/// POST   /{id}/downloads  -> analytics::ingest_downloads
/// ```
pub fn episode_router() -> Router<AppState> {
    Router::new()
        .route(
            "/{id}",
            get(episode::get_by_id)
                .put(episode::update)
                .delete(episode::delete),
        )
        .route("/{id}/downloads", post(analytics::ingest_downloads))
}
