use chrono::NaiveDate;
use sea_orm::FromQueryResult;
use serde::Serialize;

use crate::entities::achievements;

#[derive(Debug, Clone)]
pub struct NewAchievement {
    pub title: String,
    pub description: String,
    pub category: String,
    /// Never negative
    pub metric_value: Option<i32>,
    pub metric_unit: String,
    pub achieved_at: NaiveDate,
    pub created_by: Option<String>,
}

#[derive(Debug, Clone, FromQueryResult)]
pub struct TotalCount {
    pub total_count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromQueryResult)]
pub struct CategoryCount {
    pub category: String,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromQueryResult)]
pub struct BestMetric {
    pub category: String,
    pub best_value: i64,
    pub metric_unit: String,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AchievementSummary {
    pub total_count: i64,
    pub by_category: Vec<CategoryCount>,
}

/// Everything the achievement report page shows.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AchievementReport {
    pub summary: AchievementSummary,
    pub best_metrics: Vec<BestMetric>,
    pub recent_achievements: Vec<achievements::Model>,
}
