//! Talent approval flow end to end: request, respond, notify.

mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use common::{body_json, create_org, get_auth, post_json_auth, seed_user};
use sqlx::PgPool;
use tokio::sync::broadcast;

use adops_api::notifications::NotificationRouter;
use adops_core::event_types::{EVENT_TALENT_APPROVAL_REQUESTED, EVENT_TALENT_APPROVAL_RESPONDED};
use adops_core::roles::{ROLE_ADMIN, ROLE_SALES, ROLE_TALENT};
use adops_core::types::DbId;
use adops_events::{EventBus, PlatformEvent};

struct Fixture {
    bus: Arc<EventBus>,
    sales_id: DbId,
    sales: String,
    talent_id: DbId,
    talent: String,
    other_talent: String,
    show_id: DbId,
    creative_id: DbId,
}

async fn created_id(response: axum::response::Response) -> DbId {
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

async fn fixture(pool: &PgPool) -> Fixture {
    let org = create_org(pool, "acme").await;
    let (_, admin) = seed_user(pool, org, "boss", ROLE_ADMIN).await;
    let (sales_user, sales) = seed_user(pool, org, "seller", ROLE_SALES).await;
    let (talent_user, talent) = seed_user(pool, org, "host", ROLE_TALENT).await;
    let (_, other_talent) = seed_user(pool, org, "cohost", ROLE_TALENT).await;

    let app = common::build_test_app(pool.clone());
    let body = serde_json::json!({ "name": "Night Owls", "talent_user_id": talent_user.id });
    let show_id = created_id(post_json_auth(app, "/api/v1/shows", body, &admin).await).await;

    let app = common::build_test_app(pool.clone());
    let body = serde_json::json!({ "advertiser_name": "Acme Mattress", "name": "Spring sleep" });
    let campaign_id = created_id(post_json_auth(app, "/api/v1/campaigns", body, &sales).await).await;

    let app = common::build_test_app(pool.clone());
    let uri = format!("/api/v1/campaigns/{campaign_id}/creatives");
    let body = serde_json::json!({
        "name": "Spring promo",
        "creative_type": "host_read",
        "script": "Sleep better tonight.",
    });
    let creative_id = created_id(post_json_auth(app, &uri, body, &sales).await).await;

    Fixture {
        bus: Arc::new(EventBus::default()),
        sales_id: sales_user.id,
        sales,
        talent_id: talent_user.id,
        talent,
        other_talent,
        show_id,
        creative_id,
    }
}

impl Fixture {
    fn app(&self, pool: &PgPool) -> axum::Router {
        common::build_test_app_with_bus(pool.clone(), self.bus.clone())
    }

    async fn request(&self, pool: &PgPool) -> axum::response::Response {
        let body = serde_json::json!({
            "creative_id": self.creative_id,
            "show_id": self.show_id,
            "notes": "Please read this week",
        });
        post_json_auth(self.app(pool), "/api/v1/talent-approvals", body, &self.sales).await
    }
}

fn next_event(receiver: &mut broadcast::Receiver<PlatformEvent>) -> PlatformEvent {
    receiver.try_recv().expect("an event should have been published")
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn request_then_approve(pool: PgPool) {
    let fx = fixture(&pool).await;
    let mut events = fx.bus.subscribe();
    let router = NotificationRouter::new(pool.clone());

    let response = fx.request(&pool).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let approval = body_json(response).await;
    let approval_id = approval["data"]["id"].as_i64().unwrap();
    assert_eq!(approval["data"]["status"], "pending");
    assert_eq!(approval["data"]["talent_user_id"], fx.talent_id);

    let uri = format!("/api/v1/creatives/{}", fx.creative_id);
    let creative = body_json(get_auth(fx.app(&pool), &uri, &fx.sales).await).await;
    assert_eq!(creative["data"]["status"], "in_review");

    // The assigned talent is notified of the request.
    let event = next_event(&mut events);
    assert_eq!(event.event_type, EVENT_TALENT_APPROVAL_REQUESTED);
    assert_eq!(router.route_event(&event).await.unwrap(), 1);
    let inbox = body_json(get_auth(fx.app(&pool), "/api/v1/notifications", &fx.talent).await).await;
    assert_eq!(inbox["data"][0]["title"], "Approval requested: Spring promo");

    let uri = format!("/api/v1/talent-approvals/{approval_id}/respond");
    let body = serde_json::json!({ "decision": "approved" });
    let response = post_json_auth(fx.app(&pool), &uri, body, &fx.talent).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["status"], "approved");

    let uri = format!("/api/v1/creatives/{}", fx.creative_id);
    let creative = body_json(get_auth(fx.app(&pool), &uri, &fx.sales).await).await;
    assert_eq!(creative["data"]["status"], "approved");

    // The requester hears back.
    let event = next_event(&mut events);
    assert_eq!(event.event_type, EVENT_TALENT_APPROVAL_RESPONDED);
    assert_eq!(event.recipient_user_ids, vec![fx.sales_id]);
    assert_eq!(router.route_event(&event).await.unwrap(), 1);
    let count = body_json(
        get_auth(fx.app(&pool), "/api/v1/notifications/unread-count", &fx.sales).await,
    )
    .await;
    assert_eq!(count["data"]["unread_count"], 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn duplicate_pending_request_conflicts(pool: PgPool) {
    let fx = fixture(&pool).await;
    assert_eq!(fx.request(&pool).await.status(), StatusCode::CREATED);

    let response = fx.request(&pool).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["code"], "CONFLICT");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn rejection_requires_comment(pool: PgPool) {
    let fx = fixture(&pool).await;
    let approval_id = created_id(fx.request(&pool).await).await;
    let uri = format!("/api/v1/talent-approvals/{approval_id}/respond");

    let body = serde_json::json!({ "decision": "rejected", "comment": "   " });
    let response = post_json_auth(fx.app(&pool), &uri, body, &fx.talent).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = serde_json::json!({ "decision": "revision_requested", "comment": "Shorter intro" });
    let response = post_json_auth(fx.app(&pool), &uri, body, &fx.talent).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "revision_requested");
    assert_eq!(json["data"]["response_comment"], "Shorter intro");

    // A revision sends the creative back to draft and frees the pair for a new request.
    let creative_uri = format!("/api/v1/creatives/{}", fx.creative_id);
    let creative = body_json(get_auth(fx.app(&pool), &creative_uri, &fx.sales).await).await;
    assert_eq!(creative["data"]["status"], "draft");
    assert_eq!(fx.request(&pool).await.status(), StatusCode::CREATED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn answered_requests_cannot_be_answered_again(pool: PgPool) {
    let fx = fixture(&pool).await;
    let approval_id = created_id(fx.request(&pool).await).await;
    let uri = format!("/api/v1/talent-approvals/{approval_id}/respond");

    let body = serde_json::json!({ "decision": "approved" });
    let response = post_json_auth(fx.app(&pool), &uri, body.clone(), &fx.talent).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = post_json_auth(fx.app(&pool), &uri, body, &fx.talent).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn talent_only_sees_own_requests(pool: PgPool) {
    let fx = fixture(&pool).await;
    let approval_id = created_id(fx.request(&pool).await).await;

    let mine = body_json(get_auth(fx.app(&pool), "/api/v1/talent-approvals", &fx.talent).await).await;
    assert_eq!(mine["data"].as_array().unwrap().len(), 1);

    let theirs =
        body_json(get_auth(fx.app(&pool), "/api/v1/talent-approvals", &fx.other_talent).await)
            .await;
    assert!(theirs["data"].as_array().unwrap().is_empty());

    let uri = format!("/api/v1/talent-approvals/{approval_id}");
    let response = get_auth(fx.app(&pool), &uri, &fx.other_talent).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let uri = format!("/api/v1/talent-approvals/{approval_id}/respond");
    let body = serde_json::json!({ "decision": "approved" });
    let response = post_json_auth(fx.app(&pool), &uri, body, &fx.other_talent).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn talent_cannot_request_approvals(pool: PgPool) {
    let fx = fixture(&pool).await;
    let body = serde_json::json!({ "creative_id": fx.creative_id, "show_id": fx.show_id });
    let response = post_json_auth(fx.app(&pool), "/api/v1/talent-approvals", body, &fx.talent).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn inbox_filters_and_clears_by_category(pool: PgPool) {
    let fx = fixture(&pool).await;
    let mut events = fx.bus.subscribe();
    let router = NotificationRouter::new(pool.clone());

    assert_eq!(fx.request(&pool).await.status(), StatusCode::CREATED);
    router.route_event(&next_event(&mut events)).await.unwrap();

    let uri = "/api/v1/notifications?category=talent_approval&unread_only=true";
    let inbox = body_json(get_auth(fx.app(&pool), uri, &fx.talent).await).await;
    assert_eq!(inbox["data"].as_array().unwrap().len(), 1);
    let uri = "/api/v1/notifications?category=invoice";
    let inbox = body_json(get_auth(fx.app(&pool), uri, &fx.talent).await).await;
    assert!(inbox["data"].as_array().unwrap().is_empty());

    let response = get_auth(fx.app(&pool), "/api/v1/notifications?category=weather", &fx.talent).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Clearing another category leaves the approval unread.
    let body = serde_json::json!({ "category": "invoice" });
    let response =
        post_json_auth(fx.app(&pool), "/api/v1/notifications/read-all", body, &fx.talent).await;
    assert_eq!(body_json(response).await["data"]["marked"], 0);

    let body = serde_json::json!({});
    let response =
        post_json_auth(fx.app(&pool), "/api/v1/notifications/read-all", body, &fx.talent).await;
    assert_eq!(body_json(response).await["data"]["marked"], 1);
    let count = body_json(
        get_auth(fx.app(&pool), "/api/v1/notifications/unread-count", &fx.talent).await,
    )
    .await;
    assert_eq!(count["data"]["unread_count"], 0);
}
