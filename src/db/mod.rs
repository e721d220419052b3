use anyhow::Result;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::domain::UserId;
use crate::entities::{achievements, login_audit, workouts};
use crate::models::achievement::{BestMetric, CategoryCount, NewAchievement};
use crate::models::user::UserSummary;
use crate::models::workout::{ActivityTypeCount, IntensityCount, MonthCount, NewWorkout};

pub mod migrator;
pub mod query;
pub mod repositories;

pub use query::{BuiltQuery, SortDirection, WorkoutFilter, WorkoutSort};
pub use repositories::user::{UserCredentials, UserRecord};

/// Handle to the connection pool. Cheap to clone; every clone shares the pool.
#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 10, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if !db_url.contains(":memory:") {
            let path_str = db_url.trim_start_matches("sqlite:");
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        // Requests beyond max_connections wait in the acquire queue.
        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(30))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    fn workout_repo(&self) -> repositories::workout::WorkoutRepository {
        repositories::workout::WorkoutRepository::new(self.conn.clone())
    }

    fn achievement_repo(&self) -> repositories::achievement::AchievementRepository {
        repositories::achievement::AchievementRepository::new(self.conn.clone())
    }

    fn audit_repo(&self) -> repositories::audit::AuditRepository {
        repositories::audit::AuditRepository::new(self.conn.clone())
    }

    // ------------------------------------------------------------------------
    // Users
    // ------------------------------------------------------------------------

    pub async fn username_exists(&self, username: &str) -> Result<bool> {
        self.user_repo().username_exists(username).await
    }

    pub async fn create_user(&self, record: UserRecord) -> Result<Option<UserId>> {
        self.user_repo().create(record).await
    }

    pub async fn get_user_credentials(&self, username: &str) -> Result<Option<UserCredentials>> {
        self.user_repo().get_credentials(username).await
    }

    pub async fn list_users(&self) -> Result<Vec<UserSummary>> {
        self.user_repo().list().await
    }

    pub async fn count_users(&self) -> Result<u64> {
        self.user_repo().count().await
    }

    // ------------------------------------------------------------------------
    // Workouts
    // ------------------------------------------------------------------------

    pub async fn add_workout(&self, workout: NewWorkout) -> Result<workouts::Model> {
        self.workout_repo().insert(workout).await
    }

    pub async fn find_workouts(&self, filter: &WorkoutFilter) -> Result<Vec<workouts::Model>> {
        self.workout_repo().find(filter).await
    }

    pub async fn workouts_by_month(&self) -> Result<Vec<MonthCount>> {
        self.workout_repo().count_by_month().await
    }

    pub async fn workouts_by_type(&self) -> Result<Vec<ActivityTypeCount>> {
        self.workout_repo().count_by_type().await
    }

    pub async fn workouts_by_intensity(&self) -> Result<Vec<IntensityCount>> {
        self.workout_repo().count_by_intensity().await
    }

    // ------------------------------------------------------------------------
    // Achievements
    // ------------------------------------------------------------------------

    pub async fn add_achievement(&self, achievement: NewAchievement) -> Result<achievements::Model> {
        self.achievement_repo().insert(achievement).await
    }

    pub async fn list_achievements(&self) -> Result<Vec<achievements::Model>> {
        self.achievement_repo().list().await
    }

    pub async fn recent_achievements(&self, limit: i64) -> Result<Vec<achievements::Model>> {
        self.achievement_repo().recent(limit).await
    }

    pub async fn achievement_count(&self) -> Result<i64> {
        self.achievement_repo().total_count().await
    }

    pub async fn achievements_by_category(&self) -> Result<Vec<CategoryCount>> {
        self.achievement_repo().count_by_category().await
    }

    pub async fn best_achievement_metrics(&self) -> Result<Vec<BestMetric>> {
        self.achievement_repo().best_metrics().await
    }

    // ------------------------------------------------------------------------
    // Login audit
    // ------------------------------------------------------------------------

    pub async fn append_login_audit(
        &self,
        identifier: &str,
        success: bool,
        reason: &str,
        ip: &str,
    ) -> Result<()> {
        self.audit_repo()
            .append(identifier, success, reason, ip)
            .await
    }

    pub async fn list_login_audit(&self) -> Result<Vec<login_audit::Model>> {
        self.audit_repo().list().await
    }
}
