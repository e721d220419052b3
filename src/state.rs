use std::sync::Arc;

use crate::config::Config;
use crate::db::Store;
use crate::services::{
    AchievementService, AuthService, CredentialStore, SeaOrmAchievementService,
    SeaOrmAuthService, SeaOrmWorkoutService, WorkoutService,
};
use crate::views::Views;

#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<Config>,

    pub store: Store,

    pub views: Arc<Views>,

    pub auth_service: Arc<dyn AuthService>,

    pub workout_service: Arc<dyn WorkoutService>,

    pub achievement_service: Arc<dyn AchievementService>,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        Self::with_store(config, store)
    }

    /// Wires services around an already connected store.
    pub fn with_store(config: Config, store: Store) -> anyhow::Result<Self> {
        let views = Views::new(config.server.site_name.clone())
            .map_err(|e| anyhow::anyhow!("Failed to load templates: {e}"))?;

        let credentials = CredentialStore::new(&config.security);

        let auth_service = Arc::new(SeaOrmAuthService::new(store.clone(), credentials))
            as Arc<dyn AuthService + Send + Sync + 'static>;

        let workout_service = Arc::new(SeaOrmWorkoutService::new(store.clone()))
            as Arc<dyn WorkoutService + Send + Sync + 'static>;

        let achievement_service = Arc::new(SeaOrmAchievementService::new(store.clone()))
            as Arc<dyn AchievementService + Send + Sync + 'static>;

        Ok(Self {
            config: Arc::new(config),
            store,
            views: Arc::new(views),
            auth_service,
            workout_service,
            achievement_service,
        })
    }
}
