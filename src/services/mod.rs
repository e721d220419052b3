pub mod audit;
pub use audit::{AuditLog, LoginReason};

pub mod credentials;
pub use credentials::CredentialStore;

pub mod auth_service;
pub mod auth_service_impl;
pub use auth_service::{AuthError, AuthService};
pub use auth_service_impl::SeaOrmAuthService;

pub mod workout_service;
pub mod workout_service_impl;
pub use workout_service::{SHORT_WORKOUT_MINUTES, WorkoutError, WorkoutService};
pub use workout_service_impl::SeaOrmWorkoutService;

pub mod achievement_service;
pub mod achievement_service_impl;
pub use achievement_service::{AchievementError, AchievementService, RECENT_ACHIEVEMENTS};
pub use achievement_service_impl::SeaOrmAchievementService;
