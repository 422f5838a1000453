//! Route definitions for the `/campaigns` and `/creatives` resources.

use axum::routing::{delete, get, put};
use axum::Router;

use crate::handlers::{campaign, creative};
use crate::state::AppState;

/// Routes mounted at `/campaigns`.
///
/// ```text
/// GET    /                           -> campaign::list
/// POST   /                           -> campaign::create
/// GET    /{id}                       -> campaign::get_by_id
/// PUT    /{id}                       -> campaign::update
/// DELETE /{id}                       -> campaign::delete
/// PUT    /{id}/status                -> campaign::set_status
/// GET    /{id}/pacing                -> campaign::get_pacing
/// GET    /{id}/shows                 -> campaign::list_flights
/// POST   /{id}/shows                 -> campaign::add_flight
/// DELETE /{id}/shows/{flight_id}     -> campaign::remove_flight
/// GET    /{id}/creatives             -> creative::list_for_campaign
/// POST   /{id}/creatives             -> creative::create
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(campaign::list).post(campaign::create))
        .route(
            "/{id}",
            get(campaign::get_by_id)
                .put(campaign::update)
                .delete(campaign::delete),
        )
        .route("/{id}/status", put(campaign::set_status))
        .route("/{id}/pacing", get(campaign::get_pacing))
        .route(
            "/{id}/shows",
            get(campaign::list_flights).post(campaign::add_flight),
        )
        .route("/{id}/shows/{flight_id}", delete(campaign::remove_flight))
        .route(
            "/{id}/creatives",
            get(creative::list_for_campaign).post(creative::create),
        )
}

/// Routes mounted at `/creatives`.
///
/// ```text
/// GET    /{id}  -> get_by_id
/// PUT    /{id}  -> update
/// DELETE /{id}  -> delete
/// ```
pub fn creative_router() -> Router<AppState> {
    Router::new().route(
        "/{id}",
        get(creative::get_by_id)
            .put(creative::update)
            .delete(creative::delete),
    )
}
