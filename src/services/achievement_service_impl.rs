use async_trait::async_trait;
use tracing::info;

use crate::db::Store;
use crate::entities::achievements;
use crate::models::achievement::{AchievementReport, AchievementSummary, NewAchievement};
use crate::services::achievement_service::{
    AchievementError, AchievementService, RECENT_ACHIEVEMENTS,
};

pub struct SeaOrmAchievementService {
    store: Store,
}

impl SeaOrmAchievementService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }
}

#[async_trait]
impl AchievementService for SeaOrmAchievementService {
    async fn add(
        &self,
        achievement: NewAchievement,
    ) -> Result<achievements::Model, AchievementError> {
        let model = self.store.add_achievement(achievement).await?;

        info!(
            event = "achievement_added",
            achievement_id = model.id,
            category = %model.category,
            created_by = model.created_by.as_deref().unwrap_or(""),
        );

        Ok(model)
    }

    async fn list(&self) -> Result<Vec<achievements::Model>, AchievementError> {
        Ok(self.store.list_achievements().await?)
    }

    async fn report(&self) -> Result<AchievementReport, AchievementError> {
        let (total_count, by_category, best_metrics, recent_achievements) = tokio::try_join!(
            self.store.achievement_count(),
            self.store.achievements_by_category(),
            self.store.best_achievement_metrics(),
            self.store.recent_achievements(RECENT_ACHIEVEMENTS)
        )?;

        Ok(AchievementReport {
            summary: AchievementSummary {
                total_count,
                by_category,
            },
            best_metrics,
            recent_achievements,
        })
    }
}
