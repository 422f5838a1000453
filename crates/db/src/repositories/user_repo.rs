//! Users of an organization, plus the login bookkeeping (failure count,
//! lockout, last login).

use adops_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::user::{CreateUser, UpdateUser, User};

const USER_COLUMNS: &str = "id, organization_id, username, email, password_hash, role_id, is_active, \
                        last_login_at, failed_login_count, locked_until, created_at, updated_at";

pub struct UserRepo;

impl UserRepo {
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (organization_id, username, email, password_hash, role_id)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {USER_COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(input.organization_id)
            .bind(&input.username)
            .bind(&input.email)
            .bind(&input.password_hash)
            .bind(input.role_id)
            .fetch_one(pool)
            .await
    }

    /// Find a user by ID regardless of organization. Used by auth.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user inside an organization.
    pub async fn find_in_org(
        pool: &PgPool,
        organization_id: DbId,
        id: DbId,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1 AND organization_id = $2");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(organization_id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by username (case-sensitive).
    pub async fn find_by_username(
        pool: &PgPool,
        username: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE username = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(username)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(pool: &PgPool, organization_id: DbId) -> Result<Vec<User>, sqlx::Error> {
        let query = format!(
            "SELECT {USER_COLUMNS} FROM users WHERE organization_id = $1 ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(organization_id)
            .fetch_all(pool)
            .await
    }

    /// Ids of the active users in an organization holding one of `roles`,
    /// in ascending id order. Used for notification fan-out.
    pub async fn active_ids_with_roles(
        pool: &PgPool,
        organization_id: DbId,
        roles: &[&str],
    ) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT u.id FROM users u
             JOIN roles r ON r.id = u.role_id
             WHERE u.organization_id = $1
               AND u.is_active = true
               AND r.name = ANY($2)
             ORDER BY u.id",
        )
        .bind(organization_id)
        .bind(roles)
        .fetch_all(pool)
        .await
    }

    /// Update a user. Only non-`None` fields in `input` are applied.
    pub async fn update(
        pool: &PgPool,
        organization_id: DbId,
        id: DbId,
        input: &UpdateUser,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "UPDATE users SET
                username = COALESCE($3, username),
                email = COALESCE($4, email),
                role_id = COALESCE($5, role_id),
                is_active = COALESCE($6, is_active)
             WHERE id = $1 AND organization_id = $2
             RETURNING {USER_COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(organization_id)
            .bind(&input.username)
            .bind(&input.email)
            .bind(input.role_id)
            .bind(input.is_active)
            .fetch_optional(pool)
            .await
    }

    /// Set `is_active = false`. Returns `true` if the row was updated.
    pub async fn deactivate(
        pool: &PgPool,
        organization_id: DbId,
        id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE users SET is_active = false
             WHERE id = $1 AND organization_id = $2 AND is_active = true",
        )
        .bind(id)
        .bind(organization_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Count a failed password attempt. Once the count reaches
    /// `lock_after`, the account is locked until `lock_until`. Returns the
    /// new failure count.
    pub async fn record_failed_login(
        pool: &PgPool,
        id: DbId,
        lock_after: i32,
        lock_until: Timestamp,
    ) -> Result<i32, sqlx::Error> {
        sqlx::query_scalar(
            "UPDATE users SET
                failed_login_count = failed_login_count + 1,
                locked_until = CASE
                    WHEN failed_login_count + 1 >= $2 THEN $3
                    ELSE locked_until
                END
             WHERE id = $1
             RETURNING failed_login_count",
        )
        .bind(id)
        .bind(lock_after)
        .bind(lock_until)
        .fetch_one(pool)
        .await
    }

    /// Reset the failure counter, clear any lock and stamp `last_login_at`.
    pub async fn record_successful_login(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE users SET
                failed_login_count = 0,
                locked_until = NULL,
                last_login_at = NOW()
             WHERE id = $1",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(())
    }

    pub async fn update_password(
        pool: &PgPool,
        id: DbId,
        password_hash: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE users SET password_hash = $2 WHERE id = $1")
            .bind(id)
            .bind(password_hash)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
