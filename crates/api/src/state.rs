use std::sync::Arc;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheap to clone: the pool is reference counted and the rest sits behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub pool: adops_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// Handlers publish platform events here; persistence and the
    /// notification router consume them.
    pub event_bus: Arc<adops_events::EventBus>,
}
