use chrono::NaiveDate;
use sea_orm::FromQueryResult;
use serde::Serialize;

use crate::domain::Intensity;

#[derive(Debug, Clone)]
pub struct NewWorkout {
    pub title: String,
    pub activity_type: String,
    /// Always > 0
    pub duration_minutes: i32,
    pub intensity: Option<Intensity>,
    pub notes: String,
    pub performed_at: NaiveDate,
    pub created_by: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromQueryResult)]
pub struct MonthCount {
    /// `YYYY-MM`
    pub month: String,
    pub total: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromQueryResult)]
pub struct ActivityTypeCount {
    pub activity_type: String,
    pub total: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromQueryResult)]
pub struct IntensityCount {
    pub intensity: String,
    pub total: i64,
}

/// Grouped workout counts for the stats dashboard. Empty lists when there are no workouts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutStats {
    pub by_month: Vec<MonthCount>,
    pub by_type: Vec<ActivityTypeCount>,
    pub by_intensity: Vec<IntensityCount>,
}
