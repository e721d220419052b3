use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    Set, SqlErr,
};

use crate::db::query;
use crate::domain::UserId;
use crate::entities::users;
use crate::models::user::UserSummary;

/// Login lookup result: the user plus the stored hash to verify against.
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub id: UserId,
    pub username: String,
    pub password_hash: String,
}

/// Fields written at registration. `password_hash` is already hashed.
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub username: String,
    pub first: String,
    pub last: String,
    pub email: String,
    pub password_hash: String,
}

pub struct UserRepository {
    conn: DatabaseConnection,
}

impl UserRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn username_exists(&self, username: &str) -> Result<bool> {
        let count = users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .count(&self.conn)
            .await
            .context("Failed to check username")?;

        Ok(count > 0)
    }

    /// Inserts the user. Returns `None` when the username is already taken, including when a
    /// concurrent registration won the race past [`Self::username_exists`].
    pub async fn create(&self, record: UserRecord) -> Result<Option<UserId>> {
        let active = users::ActiveModel {
            username: Set(record.username),
            first: Set(record.first),
            last: Set(record.last),
            email: Set(record.email),
            password_hash: Set(record.password_hash),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        };

        match active.insert(&self.conn).await {
            Ok(model) => Ok(Some(UserId::new(model.id))),
            Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => Ok(None),
            Err(e) => Err(e).context("Failed to insert user"),
        }
    }

    /// Get a user with their password hash, for login
    pub async fn get_credentials(&self, username: &str) -> Result<Option<UserCredentials>> {
        let user = users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .one(&self.conn)
            .await
            .context("Failed to query user by username")?;

        Ok(user.map(|u| UserCredentials {
            id: UserId::new(u.id),
            username: u.username,
            password_hash: u.password_hash,
        }))
    }

    pub async fn list(&self) -> Result<Vec<UserSummary>> {
        query::user_directory()
            .fetch_all(&self.conn)
            .await
            .context("Failed to list users")
    }

    pub async fn count(&self) -> Result<u64> {
        users::Entity::find()
            .count(&self.conn)
            .await
            .context("Failed to count users")
    }
}
