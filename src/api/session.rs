//! Per-request session state and the login gate for protected routes.

use axum::{
    extract::{ConnectInfo, FromRequestParts, Request},
    http::request::Parts,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::net::SocketAddr;
use time::OffsetDateTime;
use tower_sessions::{Expiry, Session};

use super::AppError;
use crate::domain::UserId;
use crate::models::user::AuthenticatedUser;

const SESSION_USER_KEY: &str = "user";

pub const LOGIN_PATH: &str = "/users/login";

/// What the session store holds for a signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub user_id: UserId,
    pub username: String,
}

/// The request's session, either anonymous or bound to a user.
pub struct SessionContext {
    session: Session,
    user: Option<SessionUser>,
}

impl SessionContext {
    #[must_use]
    pub fn username(&self) -> Option<&str> {
        self.user.as_ref().map(|u| u.username.as_str())
    }

    /// Binds the session to `user` under a fresh session id that expires `ttl` from now.
    pub async fn login(
        &mut self,
        user: &AuthenticatedUser,
        ttl: time::Duration,
    ) -> Result<(), AppError> {
        self.session.cycle_id().await?;
        self.session
            .set_expiry(Some(Expiry::AtDateTime(OffsetDateTime::now_utc() + ttl)));

        let session_user = SessionUser {
            user_id: user.id,
            username: user.username.clone(),
        };
        self.session.insert(SESSION_USER_KEY, &session_user).await?;
        self.user = Some(session_user);
        Ok(())
    }

    /// Deletes the server-side record and expires the cookie.
    pub async fn logout(&mut self) -> Result<(), AppError> {
        self.session.flush().await?;
        self.user = None;
        Ok(())
    }
}

impl<S> FromRequestParts<S> for SessionContext
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state)
            .await
            .map_err(|(_, msg)| AppError::InternalError(msg.to_string()))?;

        let user = session.get::<SessionUser>(SESSION_USER_KEY).await?;

        Ok(Self { session, user })
    }
}

/// Redirects anonymous requests to the login page before the handler runs.
pub async fn require_login(session: Session, request: Request, next: Next) -> Response {
    match session.get::<SessionUser>(SESSION_USER_KEY).await {
        Ok(Some(user)) => {
            tracing::Span::current().record("user_id", user.user_id.value());
            next.run(request).await
        }
        Ok(None) => Redirect::to(LOGIN_PATH).into_response(),
        Err(e) => AppError::from(e).into_response(),
    }
}

/// The username bound to `session`, if it belongs to a signed-in user.
pub async fn signed_in_username(session: &Session) -> Option<String> {
    session
        .get::<SessionUser>(SESSION_USER_KEY)
        .await
        .ok()
        .flatten()
        .map(|user| user.username)
}

/// The peer address of the connection, or empty when the server runs without connect info.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientIp(pub String);

impl<S> FromRequestParts<S> for ClientIp
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let ip = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip().to_string())
            .unwrap_or_default();

        Ok(Self(ip))
    }
}
