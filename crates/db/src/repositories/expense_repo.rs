//! Repository for the `expenses` table.

use adops_core::pagination::{clamp_limit, clamp_offset, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use adops_core::types::DbId;
use sqlx::PgPool;

use crate::models::expense::{CreateExpense, Expense, ExpenseListParams, UpdateExpense};

const COLUMNS: &str = "id, organization_id, show_id, category, description, amount_cents, \
                        incurred_on, created_at, updated_at";

pub struct ExpenseRepo;

impl ExpenseRepo {
    pub async fn create(
        pool: &PgPool,
        organization_id: DbId,
        input: &CreateExpense,
    ) -> Result<Expense, sqlx::Error> {
        let query = format!(
            "INSERT INTO expenses (organization_id, show_id, category, description, amount_cents, incurred_on)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Expense>(&query)
            .bind(organization_id)
            .bind(input.show_id)
            .bind(&input.category)
            .bind(&input.description)
            .bind(input.amount_cents)
            .bind(input.incurred_on)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        organization_id: DbId,
        id: DbId,
    ) -> Result<Option<Expense>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM expenses
             WHERE id = $1 AND organization_id = $2 AND deleted_at IS NULL"
        );
        sqlx::query_as::<_, Expense>(&query)
            .bind(id)
            .bind(organization_id)
            .fetch_optional(pool)
            .await
    }

    /// List expenses, most recent first, with optional show/category/date filters.
    pub async fn list(
        pool: &PgPool,
        organization_id: DbId,
        params: &ExpenseListParams,
    ) -> Result<Vec<Expense>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM expenses
             WHERE organization_id = $1
               AND deleted_at IS NULL
               AND ($2::BIGINT IS NULL OR show_id = $2)
               AND ($3::TEXT IS NULL OR category = $3)
               AND ($4::DATE IS NULL OR incurred_on >= $4)
               AND ($5::DATE IS NULL OR incurred_on <= $5)
             ORDER BY incurred_on DESC, id DESC
             LIMIT $6 OFFSET $7"
        );
        sqlx::query_as::<_, Expense>(&query)
            .bind(organization_id)
            .bind(params.show_id)
            .bind(&params.category)
            .bind(params.from)
            .bind(params.to)
            .bind(clamp_limit(params.limit, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE))
            .bind(clamp_offset(params.offset))
            .fetch_all(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        organization_id: DbId,
        id: DbId,
        input: &UpdateExpense,
    ) -> Result<Option<Expense>, sqlx::Error> {
        let query = format!(
            "UPDATE expenses SET
                show_id = COALESCE($3, show_id),
                category = COALESCE($4, category),
                description = COALESCE($5, description),
                amount_cents = COALESCE($6, amount_cents),
                incurred_on = COALESCE($7, incurred_on)
             WHERE id = $1 AND organization_id = $2 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Expense>(&query)
            .bind(id)
            .bind(organization_id)
            .bind(input.show_id)
            .bind(&input.category)
            .bind(&input.description)
            .bind(input.amount_cents)
            .bind(input.incurred_on)
            .fetch_optional(pool)
            .await
    }

    pub async fn soft_delete(
        pool: &PgPool,
        organization_id: DbId,
        id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE expenses SET deleted_at = NOW()
             WHERE id = $1 AND organization_id = $2 AND deleted_at IS NULL",
        )
        .bind(id)
        .bind(organization_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
