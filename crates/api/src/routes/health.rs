//! `GET /health`, mounted at the root for load balancers and uptime checks.

use std::time::Instant;

use axum::extract::State;
use axum::http::StatusCode;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthReport {
    /// `ok`, or `degraded` when the database does not answer.
    pub status: &'static str,
    pub version: &'static str,
    pub db_healthy: bool,
    /// Round trip of the check query; absent when it failed.
    pub db_latency_ms: Option<u64>,
    /// Receivers on the event bus. Zero in production means persistence
    /// and the notification router have stopped.
    pub event_subscribers: usize,
}

/// Responds 200 when healthy and 503 when degraded, with the same body.
async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthReport>) {
    let started = Instant::now();
    let check = adops_db::health_check(&state.pool).await;
    let db_latency_ms = check
        .as_ref()
        .ok()
        .map(|()| u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX));

    if let Err(e) = &check {
        tracing::warn!(error = %e, "Database health check failed");
    }

    let db_healthy = check.is_ok();
    let (code, status) = if db_healthy {
        (StatusCode::OK, "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded")
    };

    let report = HealthReport {
        status,
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
        db_latency_ms,
        event_subscribers: state.event_bus.subscriber_count(),
    };
    (code, Json(report))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}
