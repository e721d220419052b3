use axum::{
    extract::{Form, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use minijinja::context;
use std::sync::Arc;

use super::sanitize::sanitize;
use super::session::SessionContext;
use super::validation::{FieldError, Validator};
use super::{AppError, AppState, SearchQuery, WorkoutForm};
use crate::db::WorkoutFilter;
use crate::domain::Intensity;
use crate::entities::workouts;
use crate::models::workout::NewWorkout;
use crate::services::SHORT_WORKOUT_MINUTES;

fn list_page(
    state: &AppState,
    session: &SessionContext,
    heading: &str,
    workouts: &[workouts::Model],
) -> Result<Html<String>, AppError> {
    Ok(state.views().render(
        "workouts_list.html",
        session.username(),
        context! { heading => heading, workouts => workouts },
    )?)
}

fn add_page(
    state: &AppState,
    session: &SessionContext,
    status: StatusCode,
    errors: &[FieldError],
    form: &WorkoutForm,
) -> Result<Response, AppError> {
    let intensities: Vec<&str> = Intensity::ALL.iter().map(|i| i.as_str()).collect();
    let page = state.views().render(
        "add_workout.html",
        session.username(),
        context! { errors => errors, form => form, intensities => intensities },
    )?;
    Ok((status, page).into_response())
}

fn search_page(
    state: &AppState,
    session: &SessionContext,
    status: StatusCode,
    error: Option<&str>,
    search_text: &str,
) -> Result<Response, AppError> {
    let page = state.views().render(
        "search.html",
        session.username(),
        context! { error => error, search_text => search_text },
    )?;
    Ok((status, page).into_response())
}

/// GET /workouts
pub async fn index() -> Redirect {
    Redirect::to("/workouts/list")
}

/// GET /workouts/list
pub async fn list(
    State(state): State<Arc<AppState>>,
    session: SessionContext,
) -> Result<Html<String>, AppError> {
    let workouts = state
        .workouts()
        .list(WorkoutFilter::new().newest_first())
        .await?;
    list_page(&state, &session, "All workouts", &workouts)
}

/// GET /workouts/search
pub async fn search_form(
    State(state): State<Arc<AppState>>,
    session: SessionContext,
) -> Result<Response, AppError> {
    search_page(&state, &session, StatusCode::OK, None, "")
}

/// GET /workouts/search_result
pub async fn search_result(
    State(state): State<Arc<AppState>>,
    session: SessionContext,
    Query(query): Query<SearchQuery>,
) -> Result<Response, AppError> {
    let text = sanitize(&query.search_text);

    let mut validator = Validator::new();
    validator.required("search_text", &text, "Please enter something to search for");
    if let Err(errors) = validator.finish() {
        let first = errors.first().map(|e| e.message.as_str());
        return search_page(&state, &session, StatusCode::BAD_REQUEST, first, &text);
    }

    let workouts = state
        .workouts()
        .list(WorkoutFilter::new().search(text.as_str()).newest_first())
        .await?;

    let heading = format!("Search results for \"{text}\"");
    Ok(list_page(&state, &session, &heading, &workouts)?.into_response())
}

/// GET /workouts/shortworkouts
pub async fn short_workouts(
    State(state): State<Arc<AppState>>,
    session: SessionContext,
) -> Result<Html<String>, AppError> {
    let workouts = state.workouts().short_workouts().await?;
    let heading = format!("Short workouts (under {SHORT_WORKOUT_MINUTES} minutes)");
    list_page(&state, &session, &heading, &workouts)
}

/// GET /workouts/addworkout
pub async fn add_form(
    State(state): State<Arc<AppState>>,
    session: SessionContext,
) -> Result<Response, AppError> {
    add_page(&state, &session, StatusCode::OK, &[], &WorkoutForm::default())
}

/// POST /workouts/workoutadded
pub async fn add(
    State(state): State<Arc<AppState>>,
    session: SessionContext,
    Form(form): Form<WorkoutForm>,
) -> Result<Response, AppError> {
    let cleaned = WorkoutForm {
        title: sanitize(&form.title),
        activity_type: sanitize(&form.activity_type),
        duration_minutes: form.duration_minutes.trim().to_string(),
        intensity: form.intensity.trim().to_string(),
        notes: sanitize(&form.notes),
        performed_at: form.performed_at.trim().to_string(),
    };

    let mut validator = Validator::new();
    validator.required("title", &cleaned.title, "Title is required");
    let duration = validator.positive_int(
        "duration_minutes",
        &cleaned.duration_minutes,
        "Duration must be a positive number",
    );
    let intensity = validator.optional_intensity(
        "intensity",
        &cleaned.intensity,
        "Intensity must be low, medium or high",
    );
    let performed_at =
        validator.optional_iso_date("performed_at", &cleaned.performed_at, "Date must be valid");

    if let Err(errors) = validator.finish() {
        return add_page(&state, &session, StatusCode::BAD_REQUEST, &errors, &cleaned);
    }
    // positive_int only returns None after rejecting the field
    let Some(duration_minutes) = duration else {
        return Err(AppError::BadRequest("Duration must be a positive number".to_string()));
    };

    let workout = state
        .workouts()
        .add(NewWorkout {
            title: cleaned.title,
            activity_type: cleaned.activity_type,
            duration_minutes,
            intensity,
            notes: cleaned.notes,
            performed_at: performed_at.unwrap_or_else(|| chrono::Utc::now().date_naive()),
            created_by: session.username().map(str::to_string),
        })
        .await?;

    let page = state.views().render(
        "workout_added.html",
        session.username(),
        context! { workout => workout },
    )?;
    Ok(page.into_response())
}

/// GET /workouts/stats
pub async fn stats_page(
    State(state): State<Arc<AppState>>,
    session: SessionContext,
) -> Result<Html<String>, AppError> {
    Ok(state
        .views()
        .render("workout_stats.html", session.username(), ())?)
}
