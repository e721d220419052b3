use sea_orm::FromQueryResult;
use serde::Serialize;

use crate::domain::UserId;

/// Registration input after validation and sanitization. The password is still plaintext.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub first: String,
    pub last: String,
    pub email: String,
    pub password: String,
}

/// A user row without the password hash.
#[derive(Debug, Clone, Serialize, FromQueryResult)]
pub struct UserSummary {
    pub id: i32,
    pub username: String,
    pub first: String,
    pub last: String,
    pub email: String,
}

/// Identity bound to a session after a successful login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub id: UserId,
    pub username: String,
}
