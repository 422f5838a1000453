//! Reporting aggregates over invoices and expenses.

use adops_core::types::Date;
use adops_db::models::expense::CreateExpense;
use adops_db::models::invoice::CreateInvoice;
use adops_db::models::organization::CreateOrganization;
use adops_db::models::show::CreateShow;
use adops_db::repositories::{ExpenseRepo, FinancialRepo, InvoiceRepo, OrganizationRepo, ShowRepo};
use sqlx::PgPool;

fn date(y: i32, m: u32, d: u32) -> Date {
    Date::from_ymd_opt(y, m, d).unwrap()
}

struct Fixture {
    org_id: i64,
    show_id: i64,
}

async fn fixture(pool: &PgPool) -> Fixture {
    let org_id = OrganizationRepo::create(
        pool,
        &CreateOrganization {
            name: "Ledger".to_string(),
            slug: "ledger".to_string(),
            contact_email: None,
        },
    )
    .await
    .unwrap()
    .id;
    let show_id = ShowRepo::create(
        pool,
        org_id,
        &CreateShow {
            name: "Earnings Call".to_string(),
            description: None,
            host_name: None,
            talent_user_id: None,
            category: None,
            status: None,
            revenue_share_pct: Some(25.0),
        },
    )
    .await
    .unwrap()
    .id;

    let invoice = |number: &str, show: Option<i64>, cents, issued| CreateInvoice {
        campaign_id: None,
        show_id: show,
        invoice_number: number.to_string(),
        client_name: "Client".to_string(),
        amount_cents: cents,
        issued_on: issued,
        due_on: date(2026, 6, 30),
        notes: None,
    };
    // Booked: sent in March.
    let sent = InvoiceRepo::create(pool, org_id, &invoice("A", Some(show_id), 100_000, date(2026, 3, 5)))
        .await
        .unwrap();
    InvoiceRepo::set_status(pool, org_id, sent.id, "sent").await.unwrap();
    // Not booked: still a draft.
    InvoiceRepo::create(pool, org_id, &invoice("B", Some(show_id), 70_000, date(2026, 3, 6)))
        .await
        .unwrap();
    // Booked, but outside March.
    let april = InvoiceRepo::create(pool, org_id, &invoice("C", Some(show_id), 9_000, date(2026, 4, 2)))
        .await
        .unwrap();
    InvoiceRepo::set_status(pool, org_id, april.id, "sent").await.unwrap();
    // Booked, no show.
    let house = InvoiceRepo::create(pool, org_id, &invoice("D", None, 5_000, date(2026, 3, 9)))
        .await
        .unwrap();
    InvoiceRepo::set_status(pool, org_id, house.id, "sent").await.unwrap();

    let expense = |show: Option<i64>, category: &str, cents| CreateExpense {
        show_id: show,
        category: category.to_string(),
        description: "x".to_string(),
        amount_cents: cents,
        incurred_on: date(2026, 3, 15),
    };
    ExpenseRepo::create(pool, org_id, &expense(Some(show_id), "production", 20_000))
        .await
        .unwrap();
    ExpenseRepo::create(pool, org_id, &expense(Some(show_id), "hosting", 5_000))
        .await
        .unwrap();
    ExpenseRepo::create(pool, org_id, &expense(None, "software", 1_000))
        .await
        .unwrap();

    Fixture { org_id, show_id }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_show_financials_respect_period_and_status(pool: PgPool) {
    let f = fixture(&pool).await;
    let march = FinancialRepo::show_financials_for(
        &pool,
        f.org_id,
        f.show_id,
        Some(date(2026, 3, 1)),
        Some(date(2026, 3, 31)),
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(march.revenue_cents, 100_000);
    assert_eq!(march.expense_cents, 25_000);
    assert_eq!(march.revenue_share_pct, 25.0);

    let all_time = FinancialRepo::show_financials(&pool, f.org_id, None, None)
        .await
        .unwrap();
    assert_eq!(all_time.len(), 1);
    assert_eq!(all_time[0].revenue_cents, 109_000);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_unattributed_and_invoice_totals(pool: PgPool) {
    let f = fixture(&pool).await;
    let from = Some(date(2026, 3, 1));
    let to = Some(date(2026, 3, 31));

    let house = FinancialRepo::unattributed(&pool, f.org_id, from, to).await.unwrap();
    assert_eq!(house.revenue_cents, 5_000);
    assert_eq!(house.expense_cents, 1_000);

    let totals = FinancialRepo::invoice_totals(&pool, f.org_id, from, to).await.unwrap();
    assert_eq!(totals.invoiced_cents, 105_000);
    assert_eq!(totals.collected_cents, 0);
    assert_eq!(totals.outstanding_cents, 105_000);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_expenses_grouped_by_category(pool: PgPool) {
    let f = fixture(&pool).await;
    let rows = FinancialRepo::expenses_by_category(&pool, f.org_id, Some(f.show_id), None, None)
        .await
        .unwrap();
    let pairs: Vec<(&str, i64)> = rows
        .iter()
        .map(|r| (r.category.as_str(), r.amount_cents))
        .collect();
    assert_eq!(pairs, vec![("production", 20_000), ("hosting", 5_000)]);
}
