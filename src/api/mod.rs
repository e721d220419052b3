use axum::{
    Router, middleware,
    routing::{get, post},
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

use crate::config::Config;
use crate::services::{AchievementService, AuthService, WorkoutService};
use crate::state::SharedState;
use crate::views::Views;

mod achievements;
mod error;
mod observability;
mod pages;
pub mod sanitize;
pub mod session;
mod stats;
mod types;
mod users;
pub mod validation;
mod workouts;

pub use error::{ApiError, AppError};
pub use types::*;

#[derive(Clone)]
pub struct AppState {
    pub shared: Arc<SharedState>,

    pub start_time: std::time::Instant,

    pub prometheus_handle: Option<PrometheusHandle>,
}

impl AppState {
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.shared.config
    }

    #[must_use]
    pub fn store(&self) -> &crate::db::Store {
        &self.shared.store
    }

    #[must_use]
    pub fn views(&self) -> &Views {
        &self.shared.views
    }

    #[must_use]
    pub fn auth(&self) -> &Arc<dyn AuthService> {
        &self.shared.auth_service
    }

    #[must_use]
    pub fn workouts(&self) -> &Arc<dyn WorkoutService> {
        &self.shared.workout_service
    }

    #[must_use]
    pub fn achievements(&self) -> &Arc<dyn AchievementService> {
        &self.shared.achievement_service
    }
}

#[must_use]
pub fn create_app_state(
    shared: Arc<SharedState>,
    prometheus_handle: Option<PrometheusHandle>,
) -> Arc<AppState> {
    Arc::new(AppState {
        shared,
        start_time: std::time::Instant::now(),
        prometheus_handle,
    })
}

pub async fn create_app_state_from_config(
    config: Config,
    prometheus_handle: Option<PrometheusHandle>,
) -> anyhow::Result<Arc<AppState>> {
    let shared = Arc::new(SharedState::new(config).await?);
    Ok(create_app_state(shared, prometheus_handle))
}

pub fn router(state: Arc<AppState>) -> Router {
    let secure_cookies = state.config().server.secure_cookies;

    // Expiry is pinned per session at login; this only covers anonymous sessions.
    let session_store = MemoryStore::default();
    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(secure_cookies)
        .with_http_only(true)
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_expiry(Expiry::OnSessionEnd);

    let protected_routes = create_protected_router();

    let public_routes = Router::new()
        .route("/", get(pages::index))
        .route("/about", get(pages::about))
        .route("/users/register", get(users::register_form))
        .route("/users/registered", post(users::registered))
        .route("/users/login", get(users::login_form).post(users::login))
        .route("/workouts", get(workouts::index))
        .route("/workouts/list", get(workouts::list))
        .route("/workouts/search", get(workouts::search_form))
        .route("/workouts/search_result", get(workouts::search_result))
        .route("/workouts/shortworkouts", get(workouts::short_workouts))
        .route("/achievements", get(achievements::index))
        .route("/achievements/list", get(achievements::list))
        .route("/achievements/report", get(achievements::report))
        .route("/api/workouts", get(stats::list_workouts))
        .route("/api/workouts/stats", get(stats::workout_stats))
        .route("/metrics", get(observability::get_metrics));

    Router::new()
        .merge(protected_routes)
        .merge(public_routes)
        .layer(middleware::from_fn(observability::logging_middleware))
        .layer(session_layer)
        .with_state(state)
        .layer(middleware::from_fn(observability::security_headers_middleware))
        .layer(TraceLayer::new_for_http())
}

fn create_protected_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/users/logout", get(users::logout))
        .route("/users/list", get(users::list))
        .route("/users/audit", get(users::audit))
        .route("/workouts/addworkout", get(workouts::add_form))
        .route("/workouts/workoutadded", post(workouts::add))
        .route("/workouts/stats", get(workouts::stats_page))
        .route(
            "/achievements/add",
            get(achievements::add_form).post(achievements::add),
        )
        .route_layer(middleware::from_fn(session::require_login))
}
