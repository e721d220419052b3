//! Append-only record of login attempts.

use tracing::{error, info};

use crate::db::Store;
use crate::entities::login_audit;

/// Why a login attempt ended the way it did. Stored as the audit `reason` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginReason {
    UnknownUsername,
    WrongPassword,
    LoginOk,
}

impl LoginReason {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::UnknownUsername => "unknown username",
            Self::WrongPassword => "wrong password",
            Self::LoginOk => "login ok",
        }
    }

    #[must_use]
    pub const fn is_success(self) -> bool {
        matches!(self, Self::LoginOk)
    }

    const fn outcome(self) -> &'static str {
        match self {
            Self::UnknownUsername => "unknown_username",
            Self::WrongPassword => "wrong_password",
            Self::LoginOk => "success",
        }
    }
}

#[derive(Clone)]
pub struct AuditLog {
    store: Store,
}

impl AuditLog {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    /// Appends one record. A failed write is logged and never reaches the caller.
    pub async fn record(&self, identifier: &str, reason: LoginReason, ip: &str) {
        metrics::counter!("login_attempts_total", "outcome" => reason.outcome()).increment(1);

        if let Err(e) = self
            .store
            .append_login_audit(identifier, reason.is_success(), reason.as_str(), ip)
            .await
        {
            error!(
                event = "login_audit_write_failed",
                identifier = %identifier,
                reason = reason.as_str(),
                error = %e,
                "Failed to write login audit record"
            );
            return;
        }

        info!(
            event = "login_attempt",
            identifier = %identifier,
            success = reason.is_success(),
            reason = reason.as_str(),
            ip = %ip,
        );
    }

    pub async fn list(&self) -> anyhow::Result<Vec<login_audit::Model>> {
        self.store.list_login_audit().await
    }
}
