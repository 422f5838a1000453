//! Invoices, payments, expenses and the financial reports over HTTP.

mod common;

use std::sync::Arc;

use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::http::StatusCode;
use common::{body_bytes, body_json, create_org, get_auth, post_json_auth, put_json_auth, seed_user};
use sqlx::PgPool;

use adops_api::notifications::NotificationRouter;
use adops_core::event_types::{EVENT_INVOICE_OVERDUE, EVENT_INVOICE_PAID};
use adops_core::export::csv;
use adops_core::roles::{ROLE_ADMIN, ROLE_FINANCE};
use adops_core::types::DbId;
use adops_events::EventBus;

struct Fixture {
    bus: Arc<EventBus>,
    admin: String,
    finance: String,
    show_id: DbId,
}

impl Fixture {
    fn app(&self, pool: &PgPool) -> axum::Router {
        common::build_test_app_with_bus(pool.clone(), self.bus.clone())
    }

    async fn invoice(&self, pool: &PgPool, body: serde_json::Value) -> DbId {
        let response = post_json_auth(self.app(pool), "/api/v1/invoices", body, &self.finance).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let json = body_json(response).await;
        assert_eq!(json["data"]["status"], "draft");
        json["data"]["id"].as_i64().unwrap()
    }

    async fn send(&self, pool: &PgPool, id: DbId) {
        let uri = format!("/api/v1/invoices/{id}/status");
        let body = serde_json::json!({ "status": "sent" });
        let response = put_json_auth(self.app(pool), &uri, body, &self.finance).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    async fn pay(&self, pool: &PgPool, id: DbId, cents: i64) -> axum::response::Response {
        let uri = format!("/api/v1/invoices/{id}/payments");
        let body = serde_json::json!({
            "amount_cents": cents,
            "paid_on": "2026-03-20",
            "method": "ach",
        });
        post_json_auth(self.app(pool), &uri, body, &self.finance).await
    }
}

async fn fixture(pool: &PgPool) -> Fixture {
    let org = create_org(pool, "acme").await;
    let (_, admin) = seed_user(pool, org, "boss", ROLE_ADMIN).await;
    let (_, finance) = seed_user(pool, org, "books", ROLE_FINANCE).await;

    let app = common::build_test_app(pool.clone());
    let body = serde_json::json!({ "name": "Night Owls", "revenue_share_pct": 25.0 });
    let response = post_json_auth(app, "/api/v1/shows", body, &admin).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let show_id = body_json(response).await["data"]["id"].as_i64().unwrap();

    Fixture {
        bus: Arc::new(EventBus::default()),
        admin,
        finance,
        show_id,
    }
}

fn show_invoice(show_id: DbId, number: &str, cents: i64) -> serde_json::Value {
    serde_json::json!({
        "show_id": show_id,
        "invoice_number": number,
        "client_name": "Acme Mattress",
        "amount_cents": cents,
        "issued_on": "2026-03-05",
        "due_on": "2026-04-04",
    })
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn payments_settle_invoice_and_notify(pool: PgPool) {
    let fx = fixture(&pool).await;
    let mut events = fx.bus.subscribe();
    let id = fx.invoice(&pool, show_invoice(fx.show_id, "INV-1", 100_000)).await;

    // Drafts do not take payments.
    assert_eq!(fx.pay(&pool, id, 1_000).await.status(), StatusCode::CONFLICT);
    fx.send(&pool, id).await;

    let response = fx.pay(&pool, id, 40_000).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["invoice"]["paid_cents"], 40_000);
    assert_eq!(json["data"]["invoice"]["status"], "sent");

    // Overpaying is refused.
    assert_eq!(fx.pay(&pool, id, 60_001).await.status(), StatusCode::BAD_REQUEST);

    let json = body_json(fx.pay(&pool, id, 60_000).await).await;
    assert_eq!(json["data"]["invoice"]["status"], "paid");

    let uri = format!("/api/v1/invoices/{id}/payments");
    let payments = body_json(get_auth(fx.app(&pool), &uri, &fx.finance).await).await;
    assert_eq!(payments["data"].as_array().unwrap().len(), 2);

    // Paid fans out to finance and admins, minus the finance user who acted.
    let event = events.try_recv().unwrap();
    assert_eq!(event.event_type, EVENT_INVOICE_PAID);
    let router = NotificationRouter::new(pool.clone());
    assert_eq!(router.route_event(&event).await.unwrap(), 1);
    let inbox = body_json(get_auth(fx.app(&pool), "/api/v1/notifications", &fx.admin).await).await;
    assert_eq!(inbox["data"][0]["title"], "Invoice INV-1 paid");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn paid_status_requires_full_payment(pool: PgPool) {
    let fx = fixture(&pool).await;
    let id = fx.invoice(&pool, show_invoice(fx.show_id, "INV-1", 50_000)).await;
    fx.send(&pool, id).await;

    let uri = format!("/api/v1/invoices/{id}/status");
    let body = serde_json::json!({ "status": "paid" });
    let response = put_json_auth(fx.app(&pool), &uri, body, &fx.finance).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // Sent invoices cannot go back to draft.
    let body = serde_json::json!({ "status": "draft" });
    let response = put_json_auth(fx.app(&pool), &uri, body, &fx.finance).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn sent_invoices_cannot_be_edited(pool: PgPool) {
    let fx = fixture(&pool).await;
    let id = fx.invoice(&pool, show_invoice(fx.show_id, "INV-1", 50_000)).await;
    fx.send(&pool, id).await;

    let uri = format!("/api/v1/invoices/{id}");
    let body = serde_json::json!({ "amount_cents": 10 });
    let response = put_json_auth(fx.app(&pool), &uri, body, &fx.finance).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn overdue_sweep_marks_past_due_invoices(pool: PgPool) {
    let fx = fixture(&pool).await;
    let mut events = fx.bus.subscribe();
    let body = serde_json::json!({
        "invoice_number": "INV-OLD",
        "client_name": "Slow Payer",
        "amount_cents": 30_000,
        "issued_on": "2026-01-01",
        "due_on": "2026-01-31",
    });
    let id = fx.invoice(&pool, body).await;
    fx.send(&pool, id).await;
    fx.invoice(&pool, show_invoice(fx.show_id, "INV-DRAFT", 10_000)).await;

    let response = post_json_auth(
        fx.app(&pool),
        "/api/v1/invoices/mark-overdue",
        serde_json::json!({}),
        &fx.finance,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["marked"], 1);
    assert_eq!(json["data"]["invoices"][0]["status"], "overdue");

    let event = events.try_recv().unwrap();
    assert_eq!(event.event_type, EVENT_INVOICE_OVERDUE);
    assert_eq!(event.payload["outstanding_cents"], 30_000);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn summary_and_csv_export_agree(pool: PgPool) {
    let fx = fixture(&pool).await;

    let id = fx.invoice(&pool, show_invoice(fx.show_id, "INV-1", 100_000)).await;
    fx.send(&pool, id).await;
    let body = serde_json::json!({
        "invoice_number": "INV-2",
        "client_name": "Network deal",
        "amount_cents": 20_000,
        "issued_on": "2026-03-10",
        "due_on": "2026-04-10",
    });
    let id = fx.invoice(&pool, body).await;
    fx.send(&pool, id).await;

    let body = serde_json::json!({
        "show_id": fx.show_id,
        "category": "hosting",
        "description": "Hosting, March",
        "amount_cents": 10_000,
        "incurred_on": "2026-03-01",
    });
    let response = post_json_auth(fx.app(&pool), "/api/v1/expenses", body, &fx.finance).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let summary =
        body_json(get_auth(fx.app(&pool), "/api/v1/financials/summary", &fx.finance).await).await;
    let show = &summary["data"]["shows"][0]["pnl"];
    assert_eq!(show["gross_revenue_cents"], 100_000);
    assert_eq!(show["talent_payout_cents"], 25_000);
    assert_eq!(show["expense_cents"], 10_000);
    assert_eq!(show["net_profit_cents"], 65_000);
    assert_eq!(summary["data"]["unattributed"]["gross_revenue_cents"], 20_000);
    assert_eq!(summary["data"]["totals"]["net_profit_cents"], 85_000);

    let response = get_auth(
        fx.app(&pool),
        "/api/v1/financials/export?format=csv",
        &fx.finance,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers()[CONTENT_TYPE].to_str().unwrap().starts_with("text/csv"));
    assert!(response.headers()[CONTENT_DISPOSITION]
        .to_str()
        .unwrap()
        .contains("financial-summary.csv"));

    let text = String::from_utf8(body_bytes(response).await).unwrap();
    let rows = csv::parse(&text).unwrap();
    assert_eq!(rows[0][0], "section");
    let total = rows.iter().find(|r| r[0] == "total").expect("total row");
    assert_eq!(total[2], "1200.00");
    assert_eq!(total[5], "850.00");
    let hosting = rows
        .iter()
        .find(|r| r[0] == "expense_category" && r[1] == "hosting")
        .expect("hosting row");
    assert_eq!(hosting[4], "100.00");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn export_rejects_unknown_format(pool: PgPool) {
    let fx = fixture(&pool).await;
    let response = get_auth(
        fx.app(&pool),
        "/api/v1/financials/export?format=xlsx",
        &fx.finance,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn pdf_export_is_a_pdf(pool: PgPool) {
    let fx = fixture(&pool).await;
    let response = get_auth(
        fx.app(&pool),
        "/api/v1/financials/export?format=pdf",
        &fx.admin,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = body_bytes(response).await;
    assert!(bytes.starts_with(b"%PDF"));
}
