pub mod prelude;

pub mod achievements;
pub mod login_audit;
pub mod users;
pub mod workouts;
