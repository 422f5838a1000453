//! Error envelope and RBAC mapping as seen by HTTP clients.
//!
//! Every failure renders as `{ "error": ..., "code": ... }`; internal
//! details never leak.

mod common;

use axum::http::StatusCode;
use axum::response::IntoResponse;
use common::{body_json, create_org, get_auth, post_json_auth, seed_user};
use sqlx::PgPool;

use adops_api::error::AppError;
use adops_core::error::CoreError;
use adops_core::roles::{ROLE_ADMIN, ROLE_FINANCE, ROLE_SALES, ROLE_TALENT};

#[tokio::test]
async fn internal_errors_are_sanitized() {
    for err in [
        AppError::InternalError("secret database credentials leaked".into()),
        AppError::Core(CoreError::Internal("panic stack trace here".into())),
    ] {
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(response).await;
        assert_eq!(json["code"], "INTERNAL_ERROR");
        assert_eq!(json["error"], "An internal error occurred");
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn missing_entity_returns_not_found_envelope(pool: PgPool) {
    let org = create_org(&pool, "acme").await;
    let (_, token) = seed_user(&pool, org, "viewer", ROLE_SALES).await;
    let app = common::build_test_app(pool);

    let response = get_auth(app, "/api/v1/shows/999999", &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["error"], "Show with id 999999 not found");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn finance_endpoints_reject_sales_and_talent(pool: PgPool) {
    let org = create_org(&pool, "acme").await;
    let (_, sales) = seed_user(&pool, org, "seller", ROLE_SALES).await;
    let (_, talent) = seed_user(&pool, org, "host", ROLE_TALENT).await;

    for token in [&sales, &talent] {
        for uri in ["/api/v1/invoices", "/api/v1/expenses", "/api/v1/financials/summary"] {
            let app = common::build_test_app(pool.clone());
            let response = get_auth(app, uri, token).await;
            assert_eq!(response.status(), StatusCode::FORBIDDEN, "{uri}");
            assert_eq!(body_json(response).await["code"], "FORBIDDEN");
        }
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn admin_and_finance_pass_the_finance_gate(pool: PgPool) {
    let org = create_org(&pool, "acme").await;
    let (_, admin) = seed_user(&pool, org, "boss", ROLE_ADMIN).await;
    let (_, finance) = seed_user(&pool, org, "books", ROLE_FINANCE).await;

    for token in [&admin, &finance] {
        let app = common::build_test_app(pool.clone());
        let response = get_auth(app, "/api/v1/financials/summary", token).await;
        assert_eq!(response.status(), StatusCode::OK);
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn sales_gate_rejects_finance(pool: PgPool) {
    let org = create_org(&pool, "acme").await;
    let (_, finance) = seed_user(&pool, org, "books", ROLE_FINANCE).await;
    let app = common::build_test_app(pool);

    let body = serde_json::json!({ "advertiser_name": "Acme", "name": "Spring" });
    let response = post_json_auth(app, "/api/v1/campaigns", body, &finance).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn validation_failures_return_400(pool: PgPool) {
    let org = create_org(&pool, "acme").await;
    let (_, admin) = seed_user(&pool, org, "boss", ROLE_ADMIN).await;
    let app = common::build_test_app(pool);

    let body = serde_json::json!({ "name": "Night Owls", "revenue_share_pct": 140.0 });
    let response = post_json_auth(app, "/api/v1/shows", body, &admin).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn duplicate_names_return_409(pool: PgPool) {
    let org = create_org(&pool, "acme").await;
    let (_, admin) = seed_user(&pool, org, "boss", ROLE_ADMIN).await;
    let body = serde_json::json!({ "name": "Night Owls" });

    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(app, "/api/v1/shows", body.clone(), &admin).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let app = common::build_test_app(pool);
    let response = post_json_auth(app, "/api/v1/shows", body, &admin).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["code"], "CONFLICT");
}
