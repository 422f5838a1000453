//! Repository round trips against a real database:
//! - organization scoping on find/list
//! - unique and foreign-key violations
//! - payments settling invoices
//! - download upserts and averages
//! - single-use refresh sessions

use adops_core::types::Date;
use adops_db::models::analytics::DailyDownloads;
use adops_db::models::campaign::{CreateCampaign, CreateCampaignShow};
use adops_db::models::episode::CreateEpisode;
use adops_db::models::invoice::{CreateInvoice, CreatePayment};
use adops_db::models::organization::CreateOrganization;
use adops_db::models::session::CreateSession;
use adops_db::models::show::{CreateShow, ShowListParams, UpdateShow};
use adops_db::models::talent_approval::CreateTalentApproval;
use adops_db::models::user::CreateUser;
use adops_db::models::creative::CreateCreative;
use adops_core::error::CoreError;
use adops_db::models::invoice::{Invoice, Payment};
use adops_db::repositories::{
    AnalyticsRepo, CampaignRepo, CreativeRepo, EpisodeRepo, InvoiceRepo, OrganizationRepo,
    PaymentOutcome, SessionRepo, ShowRepo, TalentApprovalRepo, UserRepo,
};
use assert_matches::assert_matches;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn org(pool: &PgPool, slug: &str) -> i64 {
    OrganizationRepo::create(
        pool,
        &CreateOrganization {
            name: format!("Org {slug}"),
            slug: slug.to_string(),
            contact_email: None,
        },
    )
    .await
    .unwrap()
    .id
}

async fn user(pool: &PgPool, org_id: i64, name: &str, role_id: i64) -> i64 {
    UserRepo::create(
        pool,
        &CreateUser {
            organization_id: org_id,
            username: name.to_string(),
            email: format!("{name}@example.com"),
            password_hash: "not-a-real-hash".to_string(),
            role_id,
        },
    )
    .await
    .unwrap()
    .id
}

fn new_show(name: &str) -> CreateShow {
    CreateShow {
        name: name.to_string(),
        description: None,
        host_name: None,
        talent_user_id: None,
        category: None,
        status: None,
        revenue_share_pct: None,
    }
}

fn new_campaign(name: &str) -> CreateCampaign {
    CreateCampaign {
        advertiser_name: "Acme Mattresses".to_string(),
        name: name.to_string(),
        start_date: None,
        end_date: None,
        budget_cents: Some(500_000),
        notes: None,
    }
}

fn date(y: i32, m: u32, d: u32) -> Date {
    Date::from_ymd_opt(y, m, d).unwrap()
}

fn payment(amount_cents: i64) -> CreatePayment {
    CreatePayment {
        amount_cents,
        paid_on: date(2026, 3, 10),
        method: None,
        reference: None,
    }
}

fn recorded(outcome: PaymentOutcome) -> (Payment, Invoice) {
    match outcome {
        PaymentOutcome::Recorded { payment, invoice, .. } => (payment, invoice),
        PaymentOutcome::Rejected(e) => panic!("payment rejected: {e}"),
    }
}

fn new_invoice(number: &str, amount_cents: i64) -> CreateInvoice {
    CreateInvoice {
        campaign_id: None,
        show_id: None,
        invoice_number: number.to_string(),
        client_name: "Acme".to_string(),
        amount_cents,
        issued_on: date(2026, 3, 1),
        due_on: date(2026, 3, 31),
        notes: None,
    }
}

// ---------------------------------------------------------------------------
// Shows
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_show_defaults_and_update(pool: PgPool) {
    let org_id = org(&pool, "defaults").await;
    let show = ShowRepo::create(&pool, org_id, &new_show("Morning Brew"))
        .await
        .unwrap();
    assert_eq!(show.status, "active");
    assert_eq!(show.pricing_model, "cpm");
    assert_eq!(show.revenue_share_pct, 0.0);

    let updated = ShowRepo::update(
        &pool,
        org_id,
        show.id,
        &UpdateShow {
            name: None,
            description: Some("Daily news".to_string()),
            host_name: None,
            talent_user_id: None,
            category: None,
            status: Some("hiatus".to_string()),
            revenue_share_pct: Some(30.0),
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(updated.name, "Morning Brew");
    assert_eq!(updated.status, "hiatus");
    assert_eq!(updated.revenue_share_pct, 30.0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_shows_are_scoped_to_organization(pool: PgPool) {
    let a = org(&pool, "org-a").await;
    let b = org(&pool, "org-b").await;
    let show = ShowRepo::create(&pool, a, &new_show("Scoped")).await.unwrap();

    assert!(ShowRepo::find_by_id(&pool, b, show.id).await.unwrap().is_none());
    let listed = ShowRepo::list(&pool, b, &ShowListParams::default())
        .await
        .unwrap();
    assert!(listed.is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_show_name_violates_unique_index(pool: PgPool) {
    let org_id = org(&pool, "dupes").await;
    ShowRepo::create(&pool, org_id, &new_show("Twin")).await.unwrap();
    let err = ShowRepo::create(&pool, org_id, &new_show("Twin"))
        .await
        .unwrap_err();

    let db_err = err.as_database_error().expect("database error");
    assert_eq!(db_err.code().as_deref(), Some("23505"));
    assert_eq!(db_err.constraint(), Some("uq_shows_organization_name"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_flight_on_missing_show_violates_fk(pool: PgPool) {
    let org_id = org(&pool, "fk").await;
    let campaign = CampaignRepo::create(&pool, org_id, &new_campaign("Spring"))
        .await
        .unwrap();
    let err = CampaignRepo::add_flight(
        &pool,
        campaign.id,
        &CreateCampaignShow {
            show_id: 999_999,
            placement: "mid_roll".to_string(),
            slots: None,
        },
    )
    .await
    .unwrap_err();

    let db_err = err.as_database_error().expect("database error");
    assert_eq!(db_err.code().as_deref(), Some("23503"));
}

// ---------------------------------------------------------------------------
// Invoices and payments
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_partial_then_full_payment_settles_invoice(pool: PgPool) {
    let org_id = org(&pool, "billing").await;
    let finance = user(&pool, org_id, "fin", 3).await;
    let invoice = InvoiceRepo::create(&pool, org_id, &new_invoice("INV-001", 10_000))
        .await
        .unwrap();
    assert_eq!(invoice.status, "draft");
    assert_eq!(invoice.paid_cents, 0);
    InvoiceRepo::set_status(&pool, org_id, invoice.id, "sent")
        .await
        .unwrap();

    let (first, after_first) = recorded(
        InvoiceRepo::record_payment(&pool, org_id, invoice.id, finance, &payment(4_000))
            .await
            .unwrap(),
    );
    assert_eq!(first.method, "ach");
    assert_eq!(after_first.paid_cents, 4_000);
    assert_eq!(after_first.status, "sent");

    let (_, settled) = recorded(
        InvoiceRepo::record_payment(&pool, org_id, invoice.id, finance, &payment(6_000))
            .await
            .unwrap(),
    );
    assert_eq!(settled.paid_cents, 10_000);
    assert_eq!(settled.status, "paid");

    let payments = InvoiceRepo::list_payments(&pool, invoice.id).await.unwrap();
    assert_eq!(payments.len(), 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_concurrent_full_payments_settle_once(pool: PgPool) {
    let org_id = org(&pool, "race").await;
    let finance = user(&pool, org_id, "fin", 3).await;
    let invoice = InvoiceRepo::create(&pool, org_id, &new_invoice("INV-R", 10_000))
        .await
        .unwrap();
    InvoiceRepo::set_status(&pool, org_id, invoice.id, "sent")
        .await
        .unwrap();

    let full = payment(10_000);
    let (a, b) = tokio::join!(
        InvoiceRepo::record_payment(&pool, org_id, invoice.id, finance, &full),
        InvoiceRepo::record_payment(&pool, org_id, invoice.id, finance, &full),
    );
    let outcomes = [a.unwrap(), b.unwrap()];
    let settled = outcomes
        .iter()
        .filter(|o| matches!(o, PaymentOutcome::Recorded { .. }))
        .count();
    assert_eq!(settled, 1);
    assert!(outcomes
        .iter()
        .any(|o| matches!(o, PaymentOutcome::Rejected(CoreError::Conflict(_)))));

    let after = InvoiceRepo::find_by_id(&pool, org_id, invoice.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(after.paid_cents, 10_000);
    assert_eq!(after.status, "paid");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_payment_checks_use_locked_invoice_state(pool: PgPool) {
    let org_id = org(&pool, "locked").await;
    let finance = user(&pool, org_id, "fin", 3).await;
    let invoice = InvoiceRepo::create(&pool, org_id, &new_invoice("INV-L", 10_000))
        .await
        .unwrap();
    InvoiceRepo::set_status(&pool, org_id, invoice.id, "sent")
        .await
        .unwrap();

    recorded(
        InvoiceRepo::record_payment(&pool, org_id, invoice.id, finance, &payment(7_000))
            .await
            .unwrap(),
    );
    // Only 3000 remain.
    let over = InvoiceRepo::record_payment(&pool, org_id, invoice.id, finance, &payment(5_000))
        .await
        .unwrap();
    assert_matches!(over, PaymentOutcome::Rejected(CoreError::Validation(_)));

    InvoiceRepo::set_status(&pool, org_id, invoice.id, "void")
        .await
        .unwrap();
    let voided = InvoiceRepo::record_payment(&pool, org_id, invoice.id, finance, &payment(1_000))
        .await
        .unwrap();
    assert_matches!(voided, PaymentOutcome::Rejected(CoreError::Conflict(_)));

    let payments = InvoiceRepo::list_payments(&pool, invoice.id).await.unwrap();
    assert_eq!(payments.len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_invoice_number_unique_per_organization(pool: PgPool) {
    let a = org(&pool, "inv-a").await;
    let b = org(&pool, "inv-b").await;
    InvoiceRepo::create(&pool, a, &new_invoice("INV-7", 100)).await.unwrap();
    // Same number in another organization is fine.
    InvoiceRepo::create(&pool, b, &new_invoice("INV-7", 100)).await.unwrap();

    let err = InvoiceRepo::create(&pool, a, &new_invoice("INV-7", 100))
        .await
        .unwrap_err();
    let db_err = err.as_database_error().expect("database error");
    assert_eq!(db_err.constraint(), Some("uq_invoices_organization_number"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_mark_overdue_moves_only_past_due_sent(pool: PgPool) {
    let org_id = org(&pool, "overdue").await;
    let late = InvoiceRepo::create(&pool, org_id, &new_invoice("LATE", 500)).await.unwrap();
    let draft = InvoiceRepo::create(&pool, org_id, &new_invoice("DRAFT", 500)).await.unwrap();
    InvoiceRepo::set_status(&pool, org_id, late.id, "sent").await.unwrap();

    let moved = InvoiceRepo::mark_overdue(&pool, org_id, date(2026, 4, 1))
        .await
        .unwrap();
    assert_eq!(moved.len(), 1);
    assert_eq!(moved[0].id, late.id);
    assert_eq!(moved[0].status, "overdue");

    let untouched = InvoiceRepo::find_by_id(&pool, org_id, draft.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(untouched.status, "draft");
}

// ---------------------------------------------------------------------------
// Analytics
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_download_upsert_and_average(pool: PgPool) {
    let org_id = org(&pool, "analytics").await;
    let show = ShowRepo::create(&pool, org_id, &new_show("Numbers")).await.unwrap();
    let episode = |title: &str| CreateEpisode {
        title: title.to_string(),
        episode_number: None,
        published_at: None,
        duration_secs: None,
        status: None,
    };
    let ep1 = EpisodeRepo::create(&pool, show.id, &episode("One")).await.unwrap();
    let ep2 = EpisodeRepo::create(&pool, show.id, &episode("Two")).await.unwrap();

    let day = |d, downloads| DailyDownloads {
        day: date(2026, 3, d),
        downloads,
    };
    AnalyticsRepo::upsert_downloads(&pool, ep1.id, &[day(1, 1_000), day(2, 500)])
        .await
        .unwrap();
    // Re-sending a day overwrites it.
    AnalyticsRepo::upsert_downloads(&pool, ep1.id, &[day(2, 1_000)])
        .await
        .unwrap();
    AnalyticsRepo::upsert_downloads(&pool, ep2.id, &[day(2, 4_000)])
        .await
        .unwrap();

    let since = date(2026, 3, 1);
    assert_eq!(AnalyticsRepo::total_for_show(&pool, show.id, since).await.unwrap(), 6_000);
    let avg = AnalyticsRepo::average_per_episode(&pool, show.id, since)
        .await
        .unwrap();
    assert_eq!(avg, Some(3_000.0));

    let series = AnalyticsRepo::daily_series(&pool, show.id, since).await.unwrap();
    assert_eq!(series.len(), 2);
    assert_eq!(series[1].downloads, 5_000);

    let none = AnalyticsRepo::average_per_episode(&pool, show.id, date(2026, 4, 1))
        .await
        .unwrap();
    assert_eq!(none, None);
}

// ---------------------------------------------------------------------------
// Talent approvals
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_second_pending_approval_is_rejected(pool: PgPool) {
    let org_id = org(&pool, "approvals").await;
    let sales = user(&pool, org_id, "sally", 2).await;
    let talent = user(&pool, org_id, "tom", 4).await;
    let show = ShowRepo::create(&pool, org_id, &new_show("Hosted")).await.unwrap();
    let campaign = CampaignRepo::create(&pool, org_id, &new_campaign("Reads"))
        .await
        .unwrap();
    let creative = CreativeRepo::create(
        &pool,
        campaign.id,
        &CreateCreative {
            name: "Spring read".to_string(),
            creative_type: None,
            script: Some("Sleep better.".to_string()),
            audio_url: None,
        },
    )
    .await
    .unwrap();

    let input = CreateTalentApproval {
        organization_id: org_id,
        creative_id: creative.id,
        show_id: show.id,
        requested_by: sales,
        talent_user_id: talent,
        request_notes: None,
    };
    let first = TalentApprovalRepo::create(&pool, &input).await.unwrap();
    let err = TalentApprovalRepo::create(&pool, &input).await.unwrap_err();
    assert_eq!(
        err.as_database_error().and_then(|e| e.constraint()),
        Some("uq_talent_approvals_pending")
    );

    // Once answered, a fresh request is allowed.
    let answered = TalentApprovalRepo::respond(&pool, first.id, "approved", None)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(answered.status, "approved");
    assert!(answered.responded_at.is_some());
    assert!(TalentApprovalRepo::respond(&pool, first.id, "rejected", Some("late"))
        .await
        .unwrap()
        .is_none());
    TalentApprovalRepo::create(&pool, &input).await.unwrap();
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_refresh_session_redeems_once(pool: PgPool) {
    let org_id = org(&pool, "acme").await;
    let user_id = user(&pool, org_id, "seller", 2).await;
    let session = |hash: &str, days: i64| CreateSession {
        user_id,
        refresh_token_hash: hash.to_string(),
        expires_at: chrono::Utc::now() + chrono::Duration::days(days),
        user_agent: Some("test-agent".to_string()),
        ip_address: None,
    };

    SessionRepo::create(&pool, &session("live", 7)).await.unwrap();
    SessionRepo::create(&pool, &session("stale", -1)).await.unwrap();

    let redeemed = SessionRepo::redeem(&pool, "live").await.unwrap().unwrap();
    assert!(redeemed.is_revoked);
    assert_eq!(redeemed.user_agent.as_deref(), Some("test-agent"));
    assert!(SessionRepo::redeem(&pool, "live").await.unwrap().is_none());
    assert!(SessionRepo::redeem(&pool, "stale").await.unwrap().is_none());

    // Both the redeemed and the expired session are stale now.
    assert_eq!(SessionRepo::prune_for_user(&pool, user_id).await.unwrap(), 2);
}
