pub use super::achievements::Entity as Achievements;
pub use super::login_audit::Entity as LoginAudit;
pub use super::users::Entity as Users;
pub use super::workouts::Entity as Workouts;
