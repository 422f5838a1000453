//! Route definitions for the `/proposals` resource.

use axum::routing::{delete, get, put};
use axum::Router;

use crate::handlers::proposal;
use crate::state::AppState;

/// Routes mounted at `/proposals`.
///
/// ```text
/// GET    /                        -> list
/// POST   /                        -> create
/// GET    /{id}                    -> get_by_id (items + totals)
/// PUT    /{id}                    -> update
/// DELETE /{id}                    -> delete
/// PUT    /{id}/status             -> set_status
/// GET    /{id}/items              -> list_items
/// POST   /{id}/items              -> add_item
/// DELETE /{id}/items/{item_id}    -> remove_item
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(proposal::list).post(proposal::create))
        .route(
            "/{id}",
            get(proposal::get_by_id)
                .put(proposal::update)
                .delete(proposal::delete),
        )
        .route("/{id}/status", put(proposal::set_status))
        .route(
            "/{id}/items",
            get(proposal::list_items).post(proposal::add_item),
        )
        .route("/{id}/items/{item_id}", delete(proposal::remove_item))
}
