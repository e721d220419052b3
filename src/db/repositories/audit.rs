use anyhow::{Context, Result};
use sea_orm::{DatabaseConnection, EntityTrait, Set};

use crate::db::query;
use crate::entities::{login_audit, prelude::*};

/// Append-only access to the `login_audit` table.
pub struct AuditRepository {
    conn: DatabaseConnection,
}

impl AuditRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn append(&self, identifier: &str, success: bool, reason: &str, ip: &str) -> Result<()> {
        let active_model = login_audit::ActiveModel {
            identifier: Set(identifier.to_string()),
            success: Set(success),
            reason: Set(reason.to_string()),
            ip: Set(ip.to_string()),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        };

        LoginAudit::insert(active_model)
            .exec(&self.conn)
            .await
            .context("Failed to insert login audit record")?;
        Ok(())
    }

    pub async fn list(&self) -> Result<Vec<login_audit::Model>> {
        query::login_audit_newest_first()
            .fetch_all(&self.conn)
            .await
            .context("Failed to list login audit records")
    }
}
