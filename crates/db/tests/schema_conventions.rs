//! Schema-wide rules every migration must follow, checked against the
//! catalog after all migrations have run.

use sqlx::PgPool;

/// `(table, column, data_type)` for every user column in `public`.
async fn public_columns(pool: &PgPool) -> Vec<(String, String, String)> {
    sqlx::query_as(
        "SELECT c.table_name::TEXT, c.column_name::TEXT, c.data_type::TEXT
         FROM information_schema.columns c
         JOIN information_schema.tables t
           ON t.table_name = c.table_name AND t.table_schema = c.table_schema
         WHERE c.table_schema = 'public'
           AND t.table_type = 'BASE TABLE'
           AND c.table_name <> '_sqlx_migrations'
         ORDER BY c.table_name, c.ordinal_position",
    )
    .fetch_all(pool)
    .await
    .unwrap()
}

fn column_type<'a>(
    columns: &'a [(String, String, String)],
    table: &str,
    column: &str,
) -> Option<&'a str> {
    columns
        .iter()
        .find(|(t, c, _)| t == table && c == column)
        .map(|(_, _, ty)| ty.as_str())
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_column_types(pool: PgPool) {
    let columns = public_columns(&pool).await;
    let mut tables: Vec<&str> = columns.iter().map(|(t, _, _)| t.as_str()).collect();
    tables.dedup();

    for table in tables {
        assert_eq!(column_type(&columns, table, "id"), Some("bigint"), "{table}.id");
        for ts in ["created_at", "updated_at"] {
            assert_eq!(
                column_type(&columns, table, ts),
                Some("timestamp with time zone"),
                "{table}.{ts}"
            );
        }
    }

    let varchar: Vec<_> = columns
        .iter()
        .filter(|(_, _, ty)| ty == "character varying")
        .collect();
    assert!(varchar.is_empty(), "use TEXT instead of VARCHAR: {varchar:?}");
}

/// Money is stored as whole cents, never as floating point.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_money_columns_are_bigint_cents(pool: PgPool) {
    let columns = public_columns(&pool).await;
    let cents: Vec<_> = columns.iter().filter(|(_, c, _)| c.ends_with("_cents")).collect();
    assert!(!cents.is_empty());
    for (table, column, ty) in cents {
        assert_eq!(ty, "bigint", "{table}.{column}");
    }

    for table in ["invoices", "payments", "expenses"] {
        assert_eq!(column_type(&columns, table, "amount_cents"), Some("bigint"), "{table}");
    }
}

/// Tenant data carries a mandatory organization.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_tenant_tables_require_organization(pool: PgPool) {
    for table in [
        "users",
        "shows",
        "campaigns",
        "proposals",
        "invoices",
        "expenses",
        "talent_approvals",
    ] {
        let nullable: Option<String> = sqlx::query_scalar(
            "SELECT is_nullable::TEXT FROM information_schema.columns
             WHERE table_schema = 'public' AND table_name = $1 AND column_name = 'organization_id'",
        )
        .bind(table)
        .fetch_optional(&pool)
        .await
        .unwrap();
        assert_eq!(nullable.as_deref(), Some("NO"), "{table}.organization_id");
    }
}

/// Every foreign key column is indexed and every FK names an ON DELETE rule.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_foreign_keys(pool: PgPool) {
    let fks: Vec<(String, String, String, String)> = sqlx::query_as(
        "SELECT DISTINCT tc.constraint_name::TEXT, tc.table_name::TEXT,
                kcu.column_name::TEXT, rc.delete_rule::TEXT
         FROM information_schema.table_constraints tc
         JOIN information_schema.key_column_usage kcu
           ON kcu.constraint_name = tc.constraint_name AND kcu.table_schema = tc.table_schema
         JOIN information_schema.referential_constraints rc
           ON rc.constraint_name = tc.constraint_name AND rc.constraint_schema = tc.table_schema
         WHERE tc.constraint_type = 'FOREIGN KEY' AND tc.table_schema = 'public'
         ORDER BY 2, 3",
    )
    .fetch_all(&pool)
    .await
    .unwrap();
    assert!(!fks.is_empty());

    for (constraint, table, column, delete_rule) in &fks {
        assert_ne!(delete_rule, "NO ACTION", "{constraint} on {table} has no ON DELETE rule");

        let indexed: bool = sqlx::query_scalar(
            "SELECT EXISTS (
                 SELECT 1 FROM pg_indexes
                 WHERE schemaname = 'public' AND tablename = $1 AND indexdef LIKE $2
             )",
        )
        .bind(table)
        .bind(format!("%({column}%"))
        .fetch_one(&pool)
        .await
        .unwrap();
        assert!(indexed, "{table}.{column} is a foreign key without an index");
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_updated_at_triggers_present(pool: PgPool) {
    let missing: Vec<String> = sqlx::query_scalar(
        "SELECT c.table_name::TEXT
         FROM information_schema.columns c
         WHERE c.table_schema = 'public'
           AND c.column_name = 'updated_at'
           AND NOT EXISTS (
               SELECT 1 FROM information_schema.triggers t
               WHERE t.event_object_table = c.table_name
                 AND t.action_statement LIKE '%set_updated_at%'
           )
         ORDER BY 1",
    )
    .fetch_all(&pool)
    .await
    .unwrap();

    assert!(missing.is_empty(), "tables without the set_updated_at trigger: {missing:?}");
}
