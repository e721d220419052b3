use axum::{
    extract::{Form, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use minijinja::context;
use std::sync::Arc;

use super::sanitize::sanitize;
use super::session::SessionContext;
use super::validation::{FieldError, Validator};
use super::{AchievementForm, AppError, AppState};
use crate::models::achievement::NewAchievement;

fn add_page(
    state: &AppState,
    session: &SessionContext,
    status: StatusCode,
    errors: &[FieldError],
    form: &AchievementForm,
) -> Result<Response, AppError> {
    let page = state.views().render(
        "achievements_add.html",
        session.username(),
        context! { errors => errors, form => form },
    )?;
    Ok((status, page).into_response())
}

/// GET /achievements
pub async fn index() -> Redirect {
    Redirect::to("/achievements/list")
}

/// GET /achievements/list
pub async fn list(
    State(state): State<Arc<AppState>>,
    session: SessionContext,
) -> Result<Html<String>, AppError> {
    let achievements = state.achievements().list().await?;
    Ok(state.views().render(
        "achievements_list.html",
        session.username(),
        context! { achievements },
    )?)
}

/// GET /achievements/add
pub async fn add_form(
    State(state): State<Arc<AppState>>,
    session: SessionContext,
) -> Result<Response, AppError> {
    add_page(&state, &session, StatusCode::OK, &[], &AchievementForm::default())
}

/// POST /achievements/add
pub async fn add(
    State(state): State<Arc<AppState>>,
    session: SessionContext,
    Form(form): Form<AchievementForm>,
) -> Result<Response, AppError> {
    let cleaned = AchievementForm {
        title: sanitize(&form.title),
        description: sanitize(&form.description),
        category: sanitize(&form.category),
        metric_value: form.metric_value.trim().to_string(),
        metric_unit: sanitize(&form.metric_unit),
        achieved_at: form.achieved_at.trim().to_string(),
    };

    let mut validator = Validator::new();
    validator.required("title", &cleaned.title, "Title is required");
    let metric_value = validator.optional_non_negative_int(
        "metric_value",
        &cleaned.metric_value,
        "Metric value must be a positive number",
    );
    let achieved_at =
        validator.optional_iso_date("achieved_at", &cleaned.achieved_at, "Date must be valid");

    if let Err(errors) = validator.finish() {
        return add_page(&state, &session, StatusCode::BAD_REQUEST, &errors, &cleaned);
    }

    state
        .achievements()
        .add(NewAchievement {
            title: cleaned.title,
            description: cleaned.description,
            category: cleaned.category,
            metric_value,
            metric_unit: cleaned.metric_unit,
            achieved_at: achieved_at.unwrap_or_else(|| chrono::Utc::now().date_naive()),
            created_by: session.username().map(str::to_string),
        })
        .await?;

    Ok(Redirect::to("/achievements/list").into_response())
}

/// GET /achievements/report
pub async fn report(
    State(state): State<Arc<AppState>>,
    session: SessionContext,
) -> Result<Html<String>, AppError> {
    let report = state.achievements().report().await?;
    Ok(state.views().render(
        "achievements_report.html",
        session.username(),
        context! { report },
    )?)
}
