//! Episode entity model and DTOs.

use adops_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `episodes` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Episode {
    pub id: DbId,
    pub show_id: DbId,
    pub title: String,
    pub episode_number: Option<i32>,
    pub published_at: Option<Timestamp>,
    pub duration_secs: Option<i32>,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateEpisode {
    pub title: String,
    pub episode_number: Option<i32>,
    pub published_at: Option<Timestamp>,
    pub duration_secs: Option<i32>,
    /// Defaults to `draft` if omitted.
    pub status: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateEpisode {
    pub title: Option<String>,
    pub episode_number: Option<i32>,
    pub published_at: Option<Timestamp>,
    pub duration_secs: Option<i32>,
    pub status: Option<String>,
}
