use anyhow::{Context, Result};
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};

use crate::db::query;
use crate::entities::achievements;
use crate::models::achievement::{BestMetric, CategoryCount, NewAchievement, TotalCount};

pub struct AchievementRepository {
    conn: DatabaseConnection,
}

impl AchievementRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn insert(&self, achievement: NewAchievement) -> Result<achievements::Model> {
        let active = achievements::ActiveModel {
            title: Set(achievement.title),
            description: Set(achievement.description),
            category: Set(achievement.category),
            metric_value: Set(achievement.metric_value),
            metric_unit: Set(achievement.metric_unit),
            achieved_at: Set(achievement.achieved_at.format("%Y-%m-%d").to_string()),
            created_by: Set(achievement.created_by),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        };

        active
            .insert(&self.conn)
            .await
            .context("Failed to insert achievement")
    }

    pub async fn list(&self) -> Result<Vec<achievements::Model>> {
        query::achievements_newest_first()
            .fetch_all(&self.conn)
            .await
            .context("Failed to list achievements")
    }

    pub async fn recent(&self, limit: i64) -> Result<Vec<achievements::Model>> {
        query::recent_achievements(limit)
            .fetch_all(&self.conn)
            .await
            .context("Failed to list recent achievements")
    }

    pub async fn total_count(&self) -> Result<i64> {
        let row: Option<TotalCount> = query::achievement_count()
            .fetch_one(&self.conn)
            .await
            .context("Failed to count achievements")?;

        Ok(row.map_or(0, |r| r.total_count))
    }

    pub async fn count_by_category(&self) -> Result<Vec<CategoryCount>> {
        query::achievements_by_category()
            .fetch_all(&self.conn)
            .await
            .context("Failed to group achievements by category")
    }

    pub async fn best_metrics(&self) -> Result<Vec<BestMetric>> {
        query::best_achievement_metrics()
            .fetch_all(&self.conn)
            .await
            .context("Failed to compute best achievement metrics")
    }
}
