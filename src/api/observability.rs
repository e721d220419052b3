use axum::{
    extract::{ConnectInfo, MatchedPath, Request, State},
    http::{HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tower_sessions::Session;
use tracing::{Instrument, info, info_span};
use uuid::Uuid;

use super::AppState;
use super::session::signed_in_username;

/// GET /metrics
pub async fn get_metrics(State(state): State<Arc<AppState>>) -> Response {
    match state.prometheus_handle.as_ref() {
        Some(handle) => {
            metrics::gauge!("process_uptime_seconds").set(state.start_time.elapsed().as_secs_f64());
            handle.render().into_response()
        }
        None => (StatusCode::NOT_FOUND, "Metrics not enabled").into_response(),
    }
}

/// Emits one `request_completed` event per request, tagged with the signed-in user, and
/// records request metrics by route.
///
/// Runs inside the session layer so it can read who the request belongs to.
pub async fn logging_middleware(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().clone();

    // Unmatched paths share one label to keep metric cardinality bounded
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| "unmatched".to_string(), |p| p.as_str().to_string());

    let client_ip = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_default();

    let session = req.extensions().get::<Session>().cloned();

    let span = info_span!(
        "request",
        request_id = %Uuid::new_v4(),
        method = %method,
        route = %route,
        user_id = tracing::field::Empty,
    );

    async move {
        let response = next.run(req).await;
        let status = response.status();
        let elapsed = start.elapsed();

        // Read afterwards so a login is attributed to the user it signed in
        let username = match &session {
            Some(session) => signed_in_username(session).await,
            None => None,
        };

        let labels = [
            ("method", method.to_string()),
            ("route", route.clone()),
            ("status", status.as_u16().to_string()),
        ];
        metrics::counter!("http_requests_total", &labels).increment(1);
        metrics::histogram!("http_request_duration_seconds", &labels)
            .record(elapsed.as_secs_f64());

        info!(
            event = "request_completed",
            status = status.as_u16(),
            outcome = outcome(status),
            elapsed_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
            username = username.as_deref().unwrap_or("-"),
            client_ip = %client_ip,
            "{method} {route} -> {}",
            status.as_u16()
        );

        response
    }
    .instrument(span)
    .await
}

fn outcome(status: StatusCode) -> &'static str {
    if status.is_server_error() {
        "error"
    } else if status.is_client_error() {
        "client_error"
    } else if status.is_redirection() {
        "redirect"
    } else {
        "success"
    }
}

pub async fn security_headers_middleware(req: Request, next: Next) -> Response {
    let mut response = next.run(req).await;
    let headers = response.headers_mut();

    headers.insert(
        "x-content-type-options",
        HeaderValue::from_static("nosniff"),
    );
    headers.insert("x-frame-options", HeaderValue::from_static("DENY"));
    headers.insert(
        "referrer-policy",
        HeaderValue::from_static("strict-origin-when-cross-origin"),
    );

    response
}
