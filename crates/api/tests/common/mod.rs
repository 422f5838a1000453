#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use adops_api::auth::jwt::{generate_access_token, JwtConfig};
use adops_api::auth::password::hash_password;
use adops_api::config::ServerConfig;
use adops_api::router::build_app_router;
use adops_api::state::AppState;
use adops_core::types::DbId;
use adops_db::models::organization::CreateOrganization;
use adops_db::models::user::{CreateUser, User};
use adops_db::repositories::{OrganizationRepo, RoleRepo, UserRepo};
use adops_events::EventBus;

pub const TEST_PASSWORD: &str = "test_password_123!";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        default_avg_downloads: 5000.0,
        jwt: JwtConfig {
            secret: "test-secret-not-for-production".to_string(),
            access_token_expiry_mins: 15,
            refresh_token_expiry_days: 7,
        },
    }
}

/// Build the full application router, middleware included, on the given pool.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with_bus(pool, Arc::new(EventBus::default()))
}

/// Same as [`build_test_app`] but publishing onto a caller-owned bus, so
/// tests can subscribe before issuing requests.
pub fn build_test_app_with_bus(pool: PgPool, event_bus: Arc<EventBus>) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        event_bus,
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Seeding
// ---------------------------------------------------------------------------

pub async fn create_org(pool: &PgPool, slug: &str) -> DbId {
    OrganizationRepo::create(
        pool,
        &CreateOrganization {
            name: format!("Org {slug}"),
            slug: slug.to_string(),
            contact_email: None,
        },
    )
    .await
    .expect("organization creation should succeed")
    .id
}

/// Insert a user with the given role and password [`TEST_PASSWORD`].
pub async fn create_user(pool: &PgPool, organization_id: DbId, username: &str, role: &str) -> User {
    let role_id = RoleRepo::find_by_name(pool, role)
        .await
        .unwrap()
        .unwrap_or_else(|| panic!("role {role} is not seeded"))
        .id;
    UserRepo::create(
        pool,
        &CreateUser {
            organization_id,
            username: username.to_string(),
            email: format!("{username}@test.com"),
            password_hash: hash_password(TEST_PASSWORD).expect("hashing should succeed"),
            role_id,
        },
    )
    .await
    .expect("user creation should succeed")
}

/// Mint an access token for `user` without going through login.
pub fn token_for(user: &User, role: &str) -> String {
    generate_access_token(user.id, user.organization_id, role, &test_config().jwt)
        .expect("token generation should succeed")
}

/// Create a user and return it with a ready-to-use bearer token.
pub async fn seed_user(
    pool: &PgPool,
    organization_id: DbId,
    username: &str,
    role: &str,
) -> (User, String) {
    let user = create_user(pool, organization_id, username, role).await;
    let token = token_for(&user, role);
    (user, token)
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

pub async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    send(app, Method::POST, uri, None, Some(body)).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response {
    send(app, Method::PUT, uri, Some(token), Some(body)).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, Method::DELETE, uri, Some(token), None).await
}

pub async fn body_bytes(response: Response) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}
