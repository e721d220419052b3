//! `SeaORM` implementation of the `AuthService` trait.

use async_trait::async_trait;
use tracing::info;

use crate::db::{Store, UserRecord};
use crate::domain::UserId;
use crate::entities::login_audit;
use crate::models::user::{AuthenticatedUser, NewUser, UserSummary};
use crate::services::audit::{AuditLog, LoginReason};
use crate::services::auth_service::{AuthError, AuthService};
use crate::services::credentials::CredentialStore;

pub struct SeaOrmAuthService {
    store: Store,
    credentials: CredentialStore,
    audit: AuditLog,
}

impl SeaOrmAuthService {
    #[must_use]
    pub fn new(store: Store, credentials: CredentialStore) -> Self {
        let audit = AuditLog::new(store.clone());
        Self {
            store,
            credentials,
            audit,
        }
    }
}

#[async_trait]
impl AuthService for SeaOrmAuthService {
    async fn register(&self, user: NewUser) -> Result<UserId, AuthError> {
        // Fast path; the unique index settles concurrent registrations.
        if self.store.username_exists(&user.username).await? {
            return Err(AuthError::UsernameTaken);
        }

        let password_hash = self.credentials.hash(&user.password).await?;

        let Some(id) = self
            .store
            .create_user(UserRecord {
                username: user.username,
                first: user.first,
                last: user.last,
                email: user.email,
                password_hash,
            })
            .await?
        else {
            return Err(AuthError::UsernameTaken);
        };

        info!(event = "user_registered", user_id = %id);
        Ok(id)
    }

    async fn login(
        &self,
        identifier: &str,
        password: &str,
        ip: &str,
    ) -> Result<AuthenticatedUser, AuthError> {
        let Some(user) = self.store.get_user_credentials(identifier).await? else {
            self.audit
                .record(identifier, LoginReason::UnknownUsername, ip)
                .await;
            return Err(AuthError::InvalidCredentials);
        };

        let is_valid = self
            .credentials
            .verify(password, &user.password_hash)
            .await?;

        if !is_valid {
            self.audit
                .record(identifier, LoginReason::WrongPassword, ip)
                .await;
            return Err(AuthError::InvalidCredentials);
        }

        self.audit.record(identifier, LoginReason::LoginOk, ip).await;

        Ok(AuthenticatedUser {
            id: user.id,
            username: user.username,
        })
    }

    async fn list_users(&self) -> Result<Vec<UserSummary>, AuthError> {
        Ok(self.store.list_users().await?)
    }

    async fn list_audit(&self) -> Result<Vec<login_audit::Model>, AuthError> {
        Ok(self.audit.list().await?)
    }
}
