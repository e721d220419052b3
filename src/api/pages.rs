use axum::{extract::State, response::Html};
use std::sync::Arc;

use super::{AppError, AppState, session::SessionContext};

/// GET /
pub async fn index(
    State(state): State<Arc<AppState>>,
    session: SessionContext,
) -> Result<Html<String>, AppError> {
    Ok(state.views().render("index.html", session.username(), ())?)
}

/// GET /about
pub async fn about(
    State(state): State<Arc<AppState>>,
    session: SessionContext,
) -> Result<Html<String>, AppError> {
    Ok(state.views().render("about.html", session.username(), ())?)
}
