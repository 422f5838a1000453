//! Route definitions for `/admin`: user management and the activity feed.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// Routes mounted at `/admin`. Every handler requires `RequireAdmin` and
/// only sees data of the admin's own organization.
///
/// ```text
/// GET    /users                      -> list_users
/// POST   /users                      -> create_user
/// GET    /users/{id}                 -> get_user
/// PUT    /users/{id}                 -> update_user
/// DELETE /users/{id}                 -> deactivate_user
/// POST   /users/{id}/reset-password  -> reset_password
/// GET    /activity                   -> activity
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users", get(admin::list_users).post(admin::create_user))
        .route(
            "/users/{id}",
            get(admin::get_user)
                .put(admin::update_user)
                .delete(admin::deactivate_user),
        )
        .route("/users/{id}/reset-password", post(admin::reset_password))
        .route("/activity", get(admin::activity))
}
