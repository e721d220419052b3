//! Domain service for logging, browsing and summarizing workouts.

use thiserror::Error;

use crate::db::WorkoutFilter;
use crate::entities::workouts;
use crate::models::workout::{NewWorkout, WorkoutStats};

/// Workouts shorter than this many minutes appear in the short-workouts view.
pub const SHORT_WORKOUT_MINUTES: i32 = 30;

#[derive(Debug, Error)]
pub enum WorkoutError {
    #[error("Database error: {0}")]
    Database(String),
}

impl From<sea_orm::DbErr> for WorkoutError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for WorkoutError {
    fn from(err: anyhow::Error) -> Self {
        Self::Database(err.to_string())
    }
}

#[async_trait::async_trait]
pub trait WorkoutService: Send + Sync {
    /// Stores a validated, sanitized workout.
    async fn add(&self, workout: NewWorkout) -> Result<workouts::Model, WorkoutError>;

    /// Workouts matching every filter that is set.
    async fn list(&self, filter: WorkoutFilter) -> Result<Vec<workouts::Model>, WorkoutError>;

    /// Workouts under [`SHORT_WORKOUT_MINUTES`], newest first.
    async fn short_workouts(&self) -> Result<Vec<workouts::Model>, WorkoutError> {
        self.list(
            WorkoutFilter::new()
                .shorter_than(SHORT_WORKOUT_MINUTES)
                .newest_first(),
        )
        .await
    }

    /// Counts grouped by month, activity type and intensity.
    ///
    /// # Errors
    ///
    /// Fails as a whole if any one of the grouped queries fails.
    async fn stats(&self) -> Result<WorkoutStats, WorkoutError>;
}
