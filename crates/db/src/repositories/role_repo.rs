//! The fixed role lookup (`admin`, `sales`, `finance`, `talent`).
//!
//! Rows are seeded by migration and never written at runtime; the names
//! match the constants in `adops_core::roles`.

use std::collections::HashMap;

use adops_core::types::DbId;
use sqlx::PgPool;

use crate::models::role::Role;

pub struct RoleRepo;

impl RoleRepo {
    pub async fn find_by_name(pool: &PgPool, name: &str) -> Result<Option<Role>, sqlx::Error> {
        sqlx::query_as::<_, Role>(
            "SELECT id, name, description, created_at, updated_at FROM roles WHERE name = $1",
        )
        .bind(name)
        .fetch_optional(pool)
        .await
    }

    pub async fn list(pool: &PgPool) -> Result<Vec<Role>, sqlx::Error> {
        sqlx::query_as::<_, Role>(
            "SELECT id, name, description, created_at, updated_at FROM roles ORDER BY id",
        )
        .fetch_all(pool)
        .await
    }

    /// Role id to name for every seeded role, for rendering user lists.
    pub async fn names_by_id(pool: &PgPool) -> Result<HashMap<DbId, String>, sqlx::Error> {
        let roles = Self::list(pool).await?;
        Ok(roles.into_iter().map(|r| (r.id, r.name)).collect())
    }

    /// Name of `role_id`, or `"unknown"` for an id that is not seeded.
    pub async fn resolve_name(pool: &PgPool, role_id: DbId) -> Result<String, sqlx::Error> {
        let name: Option<String> = sqlx::query_scalar("SELECT name FROM roles WHERE id = $1")
            .bind(role_id)
            .fetch_optional(pool)
            .await?;
        Ok(name.unwrap_or_else(|| "unknown".to_string()))
    }
}
