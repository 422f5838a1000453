//! Download analytics rows and aggregates.

use adops_core::types::{Date, DbId};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Downloads recorded for one day.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct DailyDownloads {
    pub day: Date,
    pub downloads: i64,
}

/// Download total for one episode inside a time window.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct EpisodeDownloadTotal {
    pub episode_id: DbId,
    pub title: String,
    pub downloads: i64,
}
