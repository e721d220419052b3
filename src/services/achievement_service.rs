//! Domain service for achievements and the achievement report.

use thiserror::Error;

use crate::entities::achievements;
use crate::models::achievement::{AchievementReport, NewAchievement};

/// How many achievements the report lists under "recent".
pub const RECENT_ACHIEVEMENTS: i64 = 10;

#[derive(Debug, Error)]
pub enum AchievementError {
    #[error("Database error: {0}")]
    Database(String),
}

impl From<sea_orm::DbErr> for AchievementError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for AchievementError {
    fn from(err: anyhow::Error) -> Self {
        Self::Database(err.to_string())
    }
}

#[async_trait::async_trait]
pub trait AchievementService: Send + Sync {
    async fn add(&self, achievement: NewAchievement)
    -> Result<achievements::Model, AchievementError>;

    /// All achievements, newest first.
    async fn list(&self) -> Result<Vec<achievements::Model>, AchievementError>;

    /// Totals, per-category counts, best metrics and the most recent entries.
    async fn report(&self) -> Result<AchievementReport, AchievementError>;
}
