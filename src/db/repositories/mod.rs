pub mod achievement;
pub mod audit;
pub mod user;
pub mod workout;
