use sqlx::PgPool;

/// Full bootstrap: connect, migrate, verify the seeded lookups.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_full_bootstrap(pool: PgPool) {
    adops_db::health_check(&pool).await.unwrap();

    for table in ["roles", "event_types"] {
        let count: (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(&pool)
            .await
            .unwrap_or_else(|e| panic!("{table} query failed: {e}"));
        assert!(count.0 > 0, "{table} should have seed data, got 0 rows");
    }
}

/// Role names seeded by migration match the constants the API checks against.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_roles_match_core_constants(pool: PgPool) {
    use adops_core::roles::{ROLE_ADMIN, ROLE_FINANCE, ROLE_SALES, ROLE_TALENT};

    let roles = adops_db::repositories::RoleRepo::list(&pool).await.unwrap();
    let names: Vec<&str> = roles.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec![ROLE_ADMIN, ROLE_SALES, ROLE_FINANCE, ROLE_TALENT]);
}

/// Every event name the API publishes has a seeded event type.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_event_types_seeded(pool: PgPool) {
    use adops_core::event_types::*;

    for name in [
        EVENT_TALENT_APPROVAL_REQUESTED,
        EVENT_TALENT_APPROVAL_RESPONDED,
        EVENT_INVOICE_PAID,
        EVENT_INVOICE_OVERDUE,
        EVENT_PROPOSAL_ACCEPTED,
        EVENT_CAMPAIGN_STATUS_CHANGED,
    ] {
        let found = adops_db::repositories::EventRepo::type_id_by_name(&pool, name)
            .await
            .unwrap();
        assert!(found.is_some(), "event type {name} is not seeded");
    }
}
