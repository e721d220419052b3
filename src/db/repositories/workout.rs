use anyhow::{Context, Result};
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};

use crate::db::query::{self, WorkoutFilter};
use crate::entities::workouts;
use crate::models::workout::{ActivityTypeCount, IntensityCount, MonthCount, NewWorkout};

pub struct WorkoutRepository {
    conn: DatabaseConnection,
}

impl WorkoutRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn insert(&self, workout: NewWorkout) -> Result<workouts::Model> {
        let active = workouts::ActiveModel {
            title: Set(workout.title),
            activity_type: Set(workout.activity_type),
            duration_minutes: Set(workout.duration_minutes),
            intensity: Set(workout
                .intensity
                .map(|i| i.as_str().to_string())
                .unwrap_or_default()),
            notes: Set(workout.notes),
            performed_at: Set(workout.performed_at.format("%Y-%m-%d").to_string()),
            created_by: Set(workout.created_by),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        };

        active
            .insert(&self.conn)
            .await
            .context("Failed to insert workout")
    }

    pub async fn find(&self, filter: &WorkoutFilter) -> Result<Vec<workouts::Model>> {
        filter
            .to_query()
            .fetch_all(&self.conn)
            .await
            .context("Failed to query workouts")
    }

    pub async fn count_by_month(&self) -> Result<Vec<MonthCount>> {
        query::workouts_by_month()
            .fetch_all(&self.conn)
            .await
            .context("Failed to group workouts by month")
    }

    pub async fn count_by_type(&self) -> Result<Vec<ActivityTypeCount>> {
        query::workouts_by_type()
            .fetch_all(&self.conn)
            .await
            .context("Failed to group workouts by activity type")
    }

    pub async fn count_by_intensity(&self) -> Result<Vec<IntensityCount>> {
        query::workouts_by_intensity()
            .fetch_all(&self.conn)
            .await
            .context("Failed to group workouts by intensity")
    }
}
