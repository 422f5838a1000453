//! Refresh-token sessions in `user_sessions`.
//!
//! Only the SHA-256 digest of a refresh token is stored. A session is
//! live while it is unrevoked and unexpired; redeeming it revokes it.

use adops_core::types::DbId;
use sqlx::PgPool;

use crate::models::session::{CreateSession, UserSession};

const SESSION_COLUMNS: &str = "id, user_id, refresh_token_hash, expires_at, is_revoked, \
                               user_agent, ip_address, created_at, updated_at";

pub struct SessionRepo;

impl SessionRepo {
    pub async fn create(pool: &PgPool, input: &CreateSession) -> Result<UserSession, sqlx::Error> {
        let sql = format!(
            "INSERT INTO user_sessions \
                 (user_id, refresh_token_hash, expires_at, user_agent, ip_address) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {SESSION_COLUMNS}"
        );
        sqlx::query_as::<_, UserSession>(&sql)
            .bind(input.user_id)
            .bind(&input.refresh_token_hash)
            .bind(input.expires_at)
            .bind(input.user_agent.as_deref())
            .bind(input.ip_address.as_deref())
            .fetch_one(pool)
            .await
    }

    /// Redeem a refresh token: revoke the live session carrying `token_hash`
    /// and return it.
    ///
    /// The check and the revocation are one statement, so two concurrent
    /// refreshes with the same token cannot both succeed.
    pub async fn redeem(pool: &PgPool, token_hash: &str) -> Result<Option<UserSession>, sqlx::Error> {
        let sql = format!(
            "UPDATE user_sessions SET is_revoked = true \
             WHERE refresh_token_hash = $1 AND is_revoked = false AND expires_at > NOW() \
             RETURNING {SESSION_COLUMNS}"
        );
        sqlx::query_as::<_, UserSession>(&sql)
            .bind(token_hash)
            .fetch_optional(pool)
            .await
    }

    /// Revoke every live session of a user (logout, password reset,
    /// deactivation). Returns how many were revoked.
    pub async fn revoke_all_for_user(pool: &PgPool, user_id: DbId) -> Result<u64, sqlx::Error> {
        let done = sqlx::query(
            "UPDATE user_sessions SET is_revoked = true \
             WHERE user_id = $1 AND is_revoked = false",
        )
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(done.rows_affected())
    }

    /// Delete a user's revoked and expired sessions. Returns the number removed.
    pub async fn prune_for_user(pool: &PgPool, user_id: DbId) -> Result<u64, sqlx::Error> {
        let done = sqlx::query(
            "DELETE FROM user_sessions \
             WHERE user_id = $1 AND (is_revoked = true OR expires_at <= NOW())",
        )
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(done.rows_affected())
    }
}
