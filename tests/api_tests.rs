use axum::{
    Router,
    body::Body,
    http::{Request, Response, StatusCode, header},
};
use chrono::NaiveDate;
use fittrack::api::AppState;
use fittrack::config::Config;
use fittrack::db::WorkoutFilter;
use fittrack::domain::Intensity;
use fittrack::models::workout::NewWorkout;
use http_body_util::BodyExt;
use sea_orm::ConnectionTrait;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

const STRONG_PASSWORD: &str = "Str0ng!pass";

/// Removes the test database and its journal files when the test ends.
struct TempDb(PathBuf);

impl Drop for TempDb {
    fn drop(&mut self) {
        for suffix in ["", "-wal", "-shm", "-journal"] {
            let mut path = self.0.clone().into_os_string();
            path.push(suffix);
            let _ = std::fs::remove_file(path);
        }
    }
}

async fn spawn_app() -> (Arc<AppState>, Router, TempDb) {
    spawn_app_with(|_| {}).await
}

async fn spawn_app_with(configure: impl FnOnce(&mut Config)) -> (Arc<AppState>, Router, TempDb) {
    let db_path =
        std::env::temp_dir().join(format!("fittrack-api-test-{}.db", uuid::Uuid::new_v4()));

    let mut config = Config::default();
    config.general.database_path = format!("sqlite:{}", db_path.display());
    config.security.argon2_memory_cost_kib = 1024;
    config.security.argon2_time_cost = 1;
    configure(&mut config);

    let state = fittrack::api::create_app_state_from_config(config, None)
        .await
        .expect("failed to create app state");
    let router = fittrack::api::router(state.clone());
    (state, router, TempDb(db_path))
}

fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

fn post_form(uri: &str, body: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone().oneshot(request).await.unwrap()
}

async fn body_text(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn location(response: &Response<Body>) -> Option<&str> {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
}

fn session_cookie(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(ToString::to_string)
}

async fn register(app: &Router, username: &str) {
    let body = format!(
        "username={username}&first=Alice&last=Smith&email={username}%40example.com&password=Str0ng%21pass"
    );
    let response = send(app, post_form("/users/registered", &body, None)).await;
    assert_eq!(response.status(), StatusCode::OK);
}

async fn login(app: &Router, username: &str) -> String {
    let body = format!("identifier={username}&password=Str0ng%21pass");
    let response = send(app, post_form("/users/login", &body, None)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/"));
    session_cookie(&response).expect("login should set a session cookie")
}

#[tokio::test]
async fn test_public_pages_render() {
    let (_state, app, _db) = spawn_app().await;

    for uri in [
        "/",
        "/about",
        "/users/register",
        "/users/login",
        "/workouts/list",
        "/workouts/search",
        "/workouts/shortworkouts",
        "/achievements/list",
        "/achievements/report",
    ] {
        let response = send(&app, get(uri, None)).await;
        assert_eq!(response.status(), StatusCode::OK, "{uri}");
        let body = body_text(response).await;
        assert!(body.contains("Health &amp; Fitness Workout Tracker"), "{uri}");
    }

    let response = send(&app, get("/workouts", None)).await;
    assert_eq!(location(&response), Some("/workouts/list"));

    let response = send(&app, get("/achievements", None)).await;
    assert_eq!(location(&response), Some("/achievements/list"));
}

#[tokio::test]
async fn test_invalid_registration_writes_nothing() {
    let (state, app, _db) = spawn_app().await;

    let response = send(
        &app,
        post_form(
            "/users/registered",
            "username=bob&last=Jones&email=not-an-email&password=weakpass",
            None,
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_text(response).await;
    assert!(body.contains("First name is required"));
    assert!(body.contains("Please enter a valid email address"));
    assert!(body.contains("Password must contain an uppercase letter"));
    assert!(body.contains("Password must contain a number"));
    assert!(body.contains("Password must contain a special character"));

    assert_eq!(state.store().count_users().await.unwrap(), 0);
}

#[tokio::test]
async fn test_duplicate_username_is_rejected() {
    let (state, app, _db) = spawn_app().await;

    register(&app, "alice").await;

    let response = send(
        &app,
        post_form(
            "/users/registered",
            "username=alice&first=Other&last=Person&email=other%40example.com&password=Str0ng%21pass",
            None,
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_text(response).await.contains("Username is already taken"));
    assert_eq!(state.store().count_users().await.unwrap(), 1);
}

#[tokio::test]
async fn test_stored_password_is_hashed() {
    let (state, app, _db) = spawn_app().await;

    register(&app, "alice").await;

    let credentials = state
        .store()
        .get_user_credentials("alice")
        .await
        .unwrap()
        .unwrap();
    assert!(credentials.password_hash.starts_with("$argon2id$"));
    assert_ne!(credentials.password_hash, STRONG_PASSWORD);
}

#[tokio::test]
async fn test_every_login_attempt_is_audited() {
    let (state, app, _db) = spawn_app().await;
    register(&app, "alice").await;

    let response = send(
        &app,
        post_form("/users/login", "identifier=alice&password=Wr0ng%21pass", None),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(body_text(response).await.contains("Invalid username or password"));

    let audit = state.store().list_login_audit().await.unwrap();
    assert_eq!(audit.len(), 1);
    assert!(!audit[0].success);
    assert_eq!(audit[0].reason, "wrong password");
    assert_eq!(audit[0].identifier, "alice");

    let response = send(
        &app,
        post_form("/users/login", "identifier=nobody&password=Str0ng%21pass", None),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let audit = state.store().list_login_audit().await.unwrap();
    assert_eq!(audit.len(), 2);
    assert!(
        audit
            .iter()
            .any(|r| r.identifier == "nobody" && !r.success && r.reason == "unknown username")
    );

    login(&app, "alice").await;

    let audit = state.store().list_login_audit().await.unwrap();
    assert_eq!(audit.len(), 3);
    let successes: Vec<_> = audit.iter().filter(|r| r.success).collect();
    assert_eq!(successes.len(), 1);
    assert_eq!(successes[0].reason, "login ok");
}

#[tokio::test]
async fn test_login_validation_shows_first_message_only() {
    let (state, app, _db) = spawn_app().await;

    let response = send(&app, post_form("/users/login", "identifier=&password=", None)).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_text(response).await;
    assert!(body.contains("Please enter your username"));
    assert!(!body.contains("Please enter your password"));

    assert!(state.store().list_login_audit().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_protected_routes_redirect_anonymous_requests() {
    let (state, app, _db) = spawn_app().await;

    let response = send(
        &app,
        post_form(
            "/workouts/workoutadded",
            "title=Run&duration_minutes=30",
            None,
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/users/login"));

    let response = send(
        &app,
        post_form("/achievements/add", "title=Marathon", None),
    )
    .await;
    assert_eq!(location(&response), Some("/users/login"));

    for uri in ["/users/list", "/users/audit", "/workouts/addworkout", "/workouts/stats"] {
        let response = send(&app, get(uri, None)).await;
        assert_eq!(location(&response), Some("/users/login"), "{uri}");
    }

    assert!(
        state
            .store()
            .find_workouts(&WorkoutFilter::new())
            .await
            .unwrap()
            .is_empty()
    );
    assert!(state.store().list_achievements().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_session_lifecycle() {
    let (_state, app, _db) = spawn_app().await;
    register(&app, "alice").await;
    let cookie = login(&app, "alice").await;

    let response = send(&app, get("/users/list", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("Signed in as alice"));
    assert!(body.contains("alice@example.com"));
    assert!(!body.contains("argon2"));

    let response = send(&app, get("/users/logout", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(&app, get("/users/list", Some(&cookie))).await;
    assert_eq!(location(&response), Some("/users/login"));
}

#[tokio::test]
async fn test_add_workout_strips_markup() {
    let (state, app, _db) = spawn_app().await;
    register(&app, "alice").await;
    let cookie = login(&app, "alice").await;

    let response = send(
        &app,
        post_form(
            "/workouts/workoutadded",
            "title=%3Cscript%3Ealert(1)%3C%2Fscript%3EMorning+Run&activity_type=%3Cb%3ERunning%3C%2Fb%3E\
             &duration_minutes=25&intensity=High&notes=&performed_at=2025-03-09",
            Some(&cookie),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("Workout added"));

    let workouts = state
        .store()
        .find_workouts(&WorkoutFilter::new())
        .await
        .unwrap();
    assert_eq!(workouts.len(), 1);
    assert_eq!(workouts[0].title, "Morning Run");
    assert_eq!(workouts[0].activity_type, "Running");
    assert_eq!(workouts[0].intensity, "high");
    assert_eq!(workouts[0].performed_at, "2025-03-09");
    assert_eq!(workouts[0].created_by.as_deref(), Some("alice"));

    let response = send(&app, get("/workouts/shortworkouts", None)).await;
    assert!(body_text(response).await.contains("Morning Run"));
}

#[tokio::test]
async fn test_add_workout_validation() {
    let (state, app, _db) = spawn_app().await;
    register(&app, "alice").await;
    let cookie = login(&app, "alice").await;

    let response = send(
        &app,
        post_form(
            "/workouts/workoutadded",
            "title=%3Cscript%3Ex%3C%2Fscript%3E&duration_minutes=0&intensity=extreme&performed_at=yesterday",
            Some(&cookie),
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_text(response).await;
    assert!(body.contains("Title is required"));
    assert!(body.contains("Duration must be a positive number"));
    assert!(body.contains("Intensity must be low, medium or high"));
    assert!(body.contains("Date must be valid"));

    assert!(
        state
            .store()
            .find_workouts(&WorkoutFilter::new())
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn test_search_results() {
    let (_state, app, _db) = spawn_app().await;
    register(&app, "alice").await;
    let cookie = login(&app, "alice").await;

    for body in [
        "title=Hill+sprints&activity_type=Running&duration_minutes=20",
        "title=Evening+swim&activity_type=Swimming&duration_minutes=45",
    ] {
        let response = send(&app, post_form("/workouts/workoutadded", body, Some(&cookie))).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = send(&app, get("/workouts/search_result?search_text=RUN", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("Hill sprints"));
    assert!(!body.contains("Evening swim"));

    let response = send(&app, get("/workouts/search_result?search_text=+", None)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_stats_empty() {
    let (_state, app, _db) = spawn_app().await;

    let response = send(&app, get("/api/workouts/stats", None)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(
        body,
        serde_json::json!({ "byMonth": [], "byType": [], "byIntensity": [] })
    );
}

#[tokio::test]
async fn test_api_workouts_rejects_bad_numbers() {
    let (_state, app, _db) = spawn_app().await;

    let response = send(&app, get("/api/workouts?min_duration=abc", None)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(body["error"], "min_duration must be an integer");
}

#[tokio::test]
async fn test_add_achievement_and_report() {
    let (state, app, _db) = spawn_app().await;
    register(&app, "alice").await;
    let cookie = login(&app, "alice").await;

    let response = send(
        &app,
        post_form(
            "/achievements/add",
            "title=First+5k&category=Running&metric_value=25&metric_unit=minutes&achieved_at=2025-01-05",
            Some(&cookie),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/achievements/list"));

    let response = send(
        &app,
        post_form("/achievements/add", "title=Showed+up", Some(&cookie)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let response = send(
        &app,
        post_form(
            "/achievements/add",
            "title=Bad&metric_value=-1",
            Some(&cookie),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(
        body_text(response)
            .await
            .contains("Metric value must be a positive number")
    );

    let achievements = state.store().list_achievements().await.unwrap();
    assert_eq!(achievements.len(), 2);
    assert!(achievements.iter().all(|a| a.created_by.as_deref() == Some("alice")));

    let response = send(&app, get("/achievements/report", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("Total achievements: <strong>2</strong>"));
    assert!(body.contains("Uncategorized: 1"));
    assert!(body.contains("Running: 1"));
    assert!(body.contains("First 5k"));
}

async fn seed_workout(
    state: &AppState,
    title: &str,
    activity_type: &str,
    duration_minutes: i32,
    intensity: Option<Intensity>,
    performed_at: &str,
) {
    state
        .store()
        .add_workout(NewWorkout {
            title: title.to_string(),
            activity_type: activity_type.to_string(),
            duration_minutes,
            intensity,
            notes: String::new(),
            performed_at: NaiveDate::parse_from_str(performed_at, "%Y-%m-%d").unwrap(),
            created_by: None,
        })
        .await
        .unwrap();
}

#[tokio::test]
async fn test_stats_grouping() {
    let (state, app, _db) = spawn_app().await;
    seed_workout(&state, "Jog", "Running", 30, Some(Intensity::Low), "2025-01-03").await;
    seed_workout(&state, "Tempo", "Running", 45, Some(Intensity::High), "2025-01-20").await;
    seed_workout(&state, "Laps", "", 40, None, "2025-02-11").await;

    let response = send(&app, get("/api/workouts/stats", None)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(
        body["byMonth"],
        serde_json::json!([
            { "month": "2025-01", "total": 2 },
            { "month": "2025-02", "total": 1 }
        ])
    );
    assert_eq!(
        body["byType"],
        serde_json::json!([
            { "activity_type": "Running", "total": 2 },
            { "activity_type": "Unknown", "total": 1 }
        ])
    );
    assert_eq!(
        body["byIntensity"],
        serde_json::json!([
            { "intensity": "high", "total": 1 },
            { "intensity": "low", "total": 1 },
            { "intensity": "unspecified", "total": 1 }
        ])
    );
}

#[tokio::test]
async fn test_api_workouts_filters_and_sort() {
    let (state, app, _db) = spawn_app().await;
    seed_workout(&state, "Stretch", "Yoga", 5, Some(Intensity::Low), "2025-03-01").await;
    seed_workout(&state, "Intervals", "Running", 25, Some(Intensity::High), "2025-03-02").await;
    seed_workout(&state, "Long ride", "Cycling", 90, Some(Intensity::High), "2025-03-03").await;
    seed_workout(&state, "Rowing", "Rowing", 40, Some(Intensity::High), "2025-03-04").await;

    let titles = |body: &serde_json::Value| -> Vec<String> {
        body.as_array()
            .unwrap()
            .iter()
            .map(|w| w["title"].as_str().unwrap().to_string())
            .collect()
    };

    let response = send(
        &app,
        get(
            "/api/workouts?min_duration=10&max_duration=60&intensity=high&sort=duration_minutes&order=desc",
            None,
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(titles(&body), vec!["Rowing", "Intervals"]);

    let response = send(&app, get("/api/workouts?search=yoga", None)).await;
    let body: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(titles(&body), vec!["Stretch"]);

    let response = send(&app, get("/api/workouts?sort=password_hash", None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(body.as_array().unwrap().len(), 4);

    let response = send(&app, get("/api/workouts?search=%25", None)).await;
    let body: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert!(body.as_array().unwrap().is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_registrations_of_one_username() {
    let (state, app, _db) = spawn_app().await;
    let body = "username=racer&first=Rae&last=Cer&email=racer%40example.com&password=Str0ng%21pass";

    let attempts: Vec<_> = (0..6)
        .map(|_| {
            let app = app.clone();
            tokio::spawn(async move {
                send(&app, post_form("/users/registered", body, None))
                    .await
                    .status()
            })
        })
        .collect();

    let mut statuses = Vec::new();
    for attempt in attempts {
        statuses.push(attempt.await.unwrap());
    }

    assert_eq!(
        statuses.iter().filter(|s| **s == StatusCode::OK).count(),
        1,
        "{statuses:?}"
    );
    assert!(
        statuses
            .iter()
            .all(|s| *s == StatusCode::OK || *s == StatusCode::BAD_REQUEST),
        "{statuses:?}"
    );
    assert_eq!(state.store().count_users().await.unwrap(), 1);
}

#[tokio::test]
async fn test_login_succeeds_when_audit_write_fails() {
    let (state, app, _db) = spawn_app().await;
    register(&app, "alice").await;

    state
        .store()
        .conn
        .execute_unprepared("DROP TABLE login_audit")
        .await
        .unwrap();

    let cookie = login(&app, "alice").await;

    let response = send(&app, get("/users/list", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_session_expires_after_ttl() {
    let (_state, app, _db) =
        spawn_app_with(|config| config.server.session_ttl_seconds = 2).await;
    register(&app, "alice").await;
    let cookie = login(&app, "alice").await;

    let response = send(&app, get("/users/list", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::OK);

    tokio::time::sleep(Duration::from_millis(2100)).await;

    let response = send(&app, get("/users/list", Some(&cookie))).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/users/login"));
}

#[tokio::test]
async fn test_login_cookie_carries_session_lifetime() {
    let (_state, app, _db) = spawn_app().await;
    register(&app, "alice").await;

    let response = send(
        &app,
        post_form("/users/login", "identifier=alice&password=Str0ng%21pass", None),
    )
    .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap()
        .to_string();
    let max_age: i64 = set_cookie
        .split(';')
        .map(str::trim)
        .find_map(|attr| attr.strip_prefix("Max-Age="))
        .unwrap()
        .parse()
        .unwrap();
    assert!((590..=600).contains(&max_age), "{set_cookie}");
}
