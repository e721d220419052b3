use axum::{
    extract::{Form, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use minijinja::context;
use std::sync::Arc;

use super::sanitize::sanitize;
use super::session::{ClientIp, SessionContext};
use super::validation::{FieldError, Validator};
use super::{AppError, AppState, LoginForm, RegisterForm};
use crate::models::user::NewUser;
use crate::services::AuthError;

const INVALID_CREDENTIALS: &str = "Invalid username or password";

fn register_page(
    state: &AppState,
    session: &SessionContext,
    status: StatusCode,
    errors: &[FieldError],
    form: &RegisterForm,
) -> Result<Response, AppError> {
    let page = state.views().render(
        "register.html",
        session.username(),
        context! { errors => errors, form => form },
    )?;
    Ok((status, page).into_response())
}

fn login_page(
    state: &AppState,
    session: &SessionContext,
    status: StatusCode,
    error: Option<&str>,
    identifier: &str,
) -> Result<Response, AppError> {
    let page = state.views().render(
        "login.html",
        session.username(),
        context! { error => error, identifier => identifier },
    )?;
    Ok((status, page).into_response())
}

/// GET /users/register
pub async fn register_form(
    State(state): State<Arc<AppState>>,
    session: SessionContext,
) -> Result<Response, AppError> {
    register_page(&state, &session, StatusCode::OK, &[], &RegisterForm::default())
}

/// POST /users/registered
pub async fn registered(
    State(state): State<Arc<AppState>>,
    session: SessionContext,
    Form(form): Form<RegisterForm>,
) -> Result<Response, AppError> {
    let cleaned = RegisterForm {
        username: sanitize(&form.username),
        first: sanitize(&form.first),
        last: sanitize(&form.last),
        email: sanitize(&form.email),
        password: form.password,
    };

    let mut validator = Validator::new();
    validator.required("username", &cleaned.username, "Username is required");
    validator.required("first", &cleaned.first, "First name is required");
    validator.required("last", &cleaned.last, "Last name is required");
    validator.email("email", &cleaned.email, "Please enter a valid email address");
    validator.password_strength("password", &cleaned.password);

    if let Err(errors) = validator.finish() {
        return register_page(&state, &session, StatusCode::BAD_REQUEST, &errors, &cleaned);
    }

    let new_user = NewUser {
        username: cleaned.username.clone(),
        first: cleaned.first.clone(),
        last: cleaned.last.clone(),
        email: cleaned.email.clone(),
        password: cleaned.password.clone(),
    };

    match state.auth().register(new_user).await {
        Ok(_) => {
            let page = state.views().render(
                "registered.html",
                session.username(),
                context! { username => &cleaned.username, first => &cleaned.first },
            )?;
            Ok(page.into_response())
        }
        Err(AuthError::UsernameTaken) => {
            let errors = [FieldError {
                field: "username",
                message: AuthError::UsernameTaken.to_string(),
            }];
            register_page(&state, &session, StatusCode::BAD_REQUEST, &errors, &cleaned)
        }
        Err(e) => Err(e.into()),
    }
}

/// GET /users/login
pub async fn login_form(
    State(state): State<Arc<AppState>>,
    session: SessionContext,
) -> Result<Response, AppError> {
    login_page(&state, &session, StatusCode::OK, None, "")
}

/// POST /users/login
pub async fn login(
    State(state): State<Arc<AppState>>,
    mut session: SessionContext,
    ClientIp(ip): ClientIp,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    let identifier = sanitize(&form.identifier);

    let mut validator = Validator::new();
    validator.required("identifier", &identifier, "Please enter your username");
    validator.required("password", &form.password, "Please enter your password");

    if let Err(errors) = validator.finish() {
        let first = errors.first().map(|e| e.message.as_str());
        return login_page(&state, &session, StatusCode::BAD_REQUEST, first, &identifier);
    }

    match state.auth().login(&identifier, &form.password, &ip).await {
        Ok(user) => {
            session
                .login(&user, state.config().server.session_ttl())
                .await?;
            Ok(Redirect::to("/").into_response())
        }
        Err(AuthError::InvalidCredentials) => login_page(
            &state,
            &session,
            StatusCode::UNAUTHORIZED,
            Some(INVALID_CREDENTIALS),
            &identifier,
        ),
        Err(e) => Err(e.into()),
    }
}

/// GET /users/logout
pub async fn logout(
    State(state): State<Arc<AppState>>,
    mut session: SessionContext,
) -> Result<Html<String>, AppError> {
    session.logout().await?;
    Ok(state.views().render("loggedout.html", None, ())?)
}

/// GET /users/list
pub async fn list(
    State(state): State<Arc<AppState>>,
    session: SessionContext,
) -> Result<Html<String>, AppError> {
    let users = state.auth().list_users().await?;
    Ok(state
        .views()
        .render("users_list.html", session.username(), context! { users })?)
}

/// GET /users/audit
pub async fn audit(
    State(state): State<Arc<AppState>>,
    session: SessionContext,
) -> Result<Html<String>, AppError> {
    let records = state.auth().list_audit().await?;
    Ok(state
        .views()
        .render("users_audit.html", session.username(), context! { records })?)
}
