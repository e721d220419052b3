//! Domain service for registration, login and the user directory.

use thiserror::Error;

use crate::domain::UserId;
use crate::entities::login_audit;
use crate::models::user::{AuthenticatedUser, NewUser, UserSummary};

/// Errors specific to authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Unknown username or wrong password. Callers never learn which.
    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Username is already taken")]
    UsernameTaken,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for AuthError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Domain service trait for authentication.
#[async_trait::async_trait]
pub trait AuthService: Send + Sync {
    /// Hashes the password and creates the user.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::UsernameTaken`] without writing anything if the username exists.
    async fn register(&self, user: NewUser) -> Result<UserId, AuthError>;

    /// Verifies credentials and records the attempt in the login audit.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] if login fails.
    async fn login(
        &self,
        identifier: &str,
        password: &str,
        ip: &str,
    ) -> Result<AuthenticatedUser, AuthError>;

    /// All users, without password hashes.
    async fn list_users(&self) -> Result<Vec<UserSummary>, AuthError>;

    /// Login audit records, newest first.
    async fn list_audit(&self) -> Result<Vec<login_audit::Model>, AuthError>;
}
