//! Soft-deleted rows disappear from reads but stay in the table.

use adops_db::models::campaign::{CampaignListParams, CreateCampaign};
use adops_db::models::episode::CreateEpisode;
use adops_db::models::expense::{CreateExpense, ExpenseListParams};
use adops_db::models::organization::CreateOrganization;
use adops_db::models::show::{CreateShow, ShowListParams};
use adops_db::repositories::{CampaignRepo, EpisodeRepo, ExpenseRepo, OrganizationRepo, ShowRepo};
use sqlx::PgPool;

async fn org(pool: &PgPool) -> i64 {
    OrganizationRepo::create(
        pool,
        &CreateOrganization {
            name: "Soft".to_string(),
            slug: "soft".to_string(),
            contact_email: None,
        },
    )
    .await
    .unwrap()
    .id
}

fn show(name: &str) -> CreateShow {
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

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_soft_deleted_show_hidden(pool: PgPool) {
    let org_id = org(&pool).await;
    let s = ShowRepo::create(&pool, org_id, &show("Gone")).await.unwrap();

    assert!(ShowRepo::soft_delete(&pool, org_id, s.id).await.unwrap());
    assert!(!ShowRepo::soft_delete(&pool, org_id, s.id).await.unwrap());
    assert!(ShowRepo::find_by_id(&pool, org_id, s.id).await.unwrap().is_none());
    assert!(ShowRepo::list(&pool, org_id, &ShowListParams::default())
        .await
        .unwrap()
        .is_empty());

    let (deleted_at,): (Option<chrono::DateTime<chrono::Utc>>,) =
        sqlx::query_as("SELECT deleted_at FROM shows WHERE id = $1")
            .bind(s.id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert!(deleted_at.is_some());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_name_reusable_after_soft_delete(pool: PgPool) {
    let org_id = org(&pool).await;
    let first = ShowRepo::create(&pool, org_id, &show("Reboot")).await.unwrap();
    ShowRepo::soft_delete(&pool, org_id, first.id).await.unwrap();
    ShowRepo::create(&pool, org_id, &show("Reboot")).await.unwrap();
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_episodes_of_deleted_show_hidden(pool: PgPool) {
    let org_id = org(&pool).await;
    let s = ShowRepo::create(&pool, org_id, &show("Parent")).await.unwrap();
    let ep = EpisodeRepo::create(
        &pool,
        s.id,
        &CreateEpisode {
            title: "Pilot".to_string(),
            episode_number: Some(1),
            published_at: None,
            duration_secs: None,
            status: None,
        },
    )
    .await
    .unwrap();
    assert!(EpisodeRepo::find_by_id(&pool, org_id, ep.id).await.unwrap().is_some());

    ShowRepo::soft_delete(&pool, org_id, s.id).await.unwrap();
    assert!(EpisodeRepo::find_by_id(&pool, org_id, ep.id).await.unwrap().is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_soft_deleted_campaign_and_expense_hidden(pool: PgPool) {
    let org_id = org(&pool).await;
    let c = CampaignRepo::create(
        &pool,
        org_id,
        &CreateCampaign {
            advertiser_name: "Acme".to_string(),
            name: "Old".to_string(),
            start_date: None,
            end_date: None,
            budget_cents: None,
            notes: None,
        },
    )
    .await
    .unwrap();
    CampaignRepo::soft_delete(&pool, org_id, c.id).await.unwrap();
    assert!(CampaignRepo::list(&pool, org_id, &CampaignListParams::default())
        .await
        .unwrap()
        .is_empty());

    let e = ExpenseRepo::create(
        &pool,
        org_id,
        &CreateExpense {
            show_id: None,
            category: "hosting".to_string(),
            description: "CDN".to_string(),
            amount_cents: 1_500,
            incurred_on: chrono::NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
        },
    )
    .await
    .unwrap();
    ExpenseRepo::soft_delete(&pool, org_id, e.id).await.unwrap();
    assert!(ExpenseRepo::list(&pool, org_id, &ExpenseListParams::default())
        .await
        .unwrap()
        .is_empty());
}
