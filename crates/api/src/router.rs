//! Top-level HTTP application.
//!
//! `main.rs` and the integration tests both go through [`build_app_router`],
//! so requests in tests see the same layers as production traffic.

use std::time::Duration;

use axum::http::header::{AUTHORIZATION, CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::http::{HeaderName, HeaderValue, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use serde_json::json;
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::config::ServerConfig;
use crate::routes;
use crate::state::AppState;

const REQUEST_ID: &str = "x-request-id";

/// Assemble `/health`, the `/api/v1` tree and the middleware stack.
///
/// Layers listed first in the builder see the request first: CORS answers
/// preflights before anything else runs, the request ID is assigned before
/// the trace span opens, and panics are caught closest to the handlers.
pub fn build_app_router(state: AppState, config: &ServerConfig) -> Router {
    let request_id = HeaderName::from_static(REQUEST_ID);

    let middleware = ServiceBuilder::new()
        .layer(SetRequestIdLayer::new(request_id.clone(), MakeRequestUuid))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(PropagateRequestIdLayer::new(request_id))
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(config.request_timeout_secs),
        ))
        .layer(CatchPanicLayer::new());

    Router::new()
        .merge(routes::health::router())
        .nest("/api/v1", routes::api_routes())
        .fallback(unknown_route)
        .layer(middleware)
        // Applied separately (outermost) so the inner body is boxed into
        // axum's `Body`, which satisfies `Cors`'s `ResBody: Default` bound.
        .layer(build_cors_layer(config))
        .with_state(state)
}

/// Unmatched paths get the same error envelope as handler failures.
async fn unknown_route(uri: Uri) -> Response {
    let body = json!({
        "error": format!("No route for {}", uri.path()),
        "code": "NOT_FOUND",
    });
    (StatusCode::NOT_FOUND, Json(body)).into_response()
}

/// CORS for the configured dashboard origins.
///
/// Origins that are not valid header values are skipped with a warning.
pub fn build_cors_layer(config: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(%origin, error = %e, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        // Report exports are downloaded through fetch; the filename must be readable.
        .expose_headers([CONTENT_DISPOSITION, HeaderName::from_static(REQUEST_ID)])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600))
}
