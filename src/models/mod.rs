pub mod achievement;
pub mod user;
pub mod workout;
