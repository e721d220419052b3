use async_trait::async_trait;
use tracing::info;

use crate::db::{Store, WorkoutFilter};
use crate::entities::workouts;
use crate::models::workout::{NewWorkout, WorkoutStats};
use crate::services::workout_service::{WorkoutError, WorkoutService};

pub struct SeaOrmWorkoutService {
    store: Store,
}

impl SeaOrmWorkoutService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }
}

#[async_trait]
impl WorkoutService for SeaOrmWorkoutService {
    async fn add(&self, workout: NewWorkout) -> Result<workouts::Model, WorkoutError> {
        let model = self.store.add_workout(workout).await?;

        info!(
            event = "workout_added",
            workout_id = model.id,
            duration_minutes = model.duration_minutes,
            created_by = model.created_by.as_deref().unwrap_or(""),
        );

        Ok(model)
    }

    async fn list(&self, filter: WorkoutFilter) -> Result<Vec<workouts::Model>, WorkoutError> {
        Ok(self.store.find_workouts(&filter).await?)
    }

    async fn stats(&self) -> Result<WorkoutStats, WorkoutError> {
        let (by_month, by_type, by_intensity) = tokio::try_join!(
            self.store.workouts_by_month(),
            self.store.workouts_by_type(),
            self.store.workouts_by_intensity()
        )?;

        Ok(WorkoutStats {
            by_month,
            by_type,
            by_intensity,
        })
    }
}
