//! HTTP API behaviour against the router, without binding a socket

use std::sync::{Arc, Mutex};
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use countdown::{
    create_router,
    services::{LogNotifications, Notification, NotificationSink},
    AppState,
};

fn app() -> (Router, Arc<AppState>) {
    let state = Arc::new(AppState::new(0, "127.0.0.1".to_string(), Arc::new(LogNotifications)));
    (create_router(Arc::clone(&state)), state)
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => request
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => request.body(Body::empty()),
    }
    .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

#[tokio::test]
async fn health_reports_ok() {
    let (app, _) = app();
    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn timer_commands_follow_the_countdown() {
    let (app, _) = app();

    let (status, body) = send(&app, Method::POST, "/timer/start", Some(json!({ "digits": [1, 3, 0] }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "running");
    assert_eq!(body["timer"]["remaining_seconds"], 90);
    assert_eq!(body["clock"], "00:01:30");

    let (status, body) = send(&app, Method::POST, "/timer/pause", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "paused");
    let paused_at = body["timer"]["remaining_seconds"].as_u64().unwrap();
    assert!((88..=90).contains(&paused_at));

    let (status, body) = send(&app, Method::POST, "/timer/add", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["timer"]["remaining_seconds"].as_u64().unwrap(), paused_at + 60);

    let (status, body) = send(&app, Method::POST, "/timer/add", Some(json!({ "seconds": 15 }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["timer"]["remaining_seconds"].as_u64().unwrap(), paused_at + 75);

    let (status, body) = send(&app, Method::POST, "/timer/resume", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["timer"]["is_paused"], false);

    let (status, body) = send(&app, Method::POST, "/timer/cancel", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "idle");
    assert_eq!(body["timer"]["remaining_seconds"], 0);

    for command in ["/timer/cancel", "/timer/add", "/timer/pause", "/timer/resume"] {
        let (status, _) = send(&app, Method::POST, command, None).await;
        assert_eq!(status, StatusCode::CONFLICT, "{} on an idle timer", command);
    }
}

#[tokio::test]
async fn start_requires_a_positive_duration() {
    let (app, _) = app();

    let (status, _) = send(&app, Method::POST, "/timer/start", Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, Method::POST, "/timer/start", Some(json!({ "seconds": 0 }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &app,
        Method::POST,
        "/timer/start",
        Some(json!({ "seconds": 45, "start_immediately": false })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "paused");
    assert_eq!(body["timer"]["remaining_seconds"], 45);
}

#[tokio::test]
async fn editor_builds_and_commits_a_duration() {
    let (app, _) = app();

    let (status, body) = send(&app, Method::POST, "/editor", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["digits"], json!([]));

    let (_, body) = send(&app, Method::POST, "/editor/digits", Some(json!({ "digit": 0 }))).await;
    assert_eq!(body["accepted"], false);

    for digit in [1, 3, 5] {
        send(&app, Method::POST, "/editor/digits", Some(json!({ "digit": digit }))).await;
    }
    let (status, body) = send(&app, Method::DELETE, "/editor/digits", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["digits"], json!([1, 3]));

    let (_, body) = send(&app, Method::POST, "/editor/digits", Some(json!({ "digit": 0 }))).await;
    assert_eq!(body["accepted"], true);
    assert_eq!(body["display"], "00h 01m 30s");
    assert_eq!(body["seconds"], 90);

    let (_, status_body) = send(&app, Method::GET, "/status", None).await;
    assert_eq!(status_body["screen"], "editing");

    let (status, body) = send(&app, Method::POST, "/editor/commit", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["timer"]["remaining_seconds"], 90);

    let (_, status_body) = send(&app, Method::GET, "/status", None).await;
    assert_eq!(status_body["screen"], "running");
    assert_eq!(status_body["editor"], Value::Null);
    assert_eq!(status_body["last_action"], "commit");

    let (status, _) = send(&app, Method::POST, "/editor", None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    send(&app, Method::POST, "/timer/cancel", None).await;
    let (status, body) = send(&app, Method::POST, "/timer/reset", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "paused");
    assert_eq!(body["timer"]["remaining_seconds"], 90);
}

#[tokio::test]
async fn editor_refuses_out_of_order_requests() {
    let (app, _) = app();

    let (status, _) = send(&app, Method::POST, "/editor/digits", Some(json!({ "digit": 4 }))).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = send(&app, Method::POST, "/editor/commit", None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = send(&app, Method::POST, "/timer/reset", None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    send(&app, Method::POST, "/editor", None).await;
    let (status, _) = send(&app, Method::POST, "/editor/commit", None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = send(&app, Method::DELETE, "/editor", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, Method::DELETE, "/editor", None).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn theme_preference_is_updated_in_memory() {
    let (app, state) = app();

    let (status, body) = send(&app, Method::GET, "/settings/theme", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["preference"], json!({ "use_system_setting": false, "dark_mode_forced": false }));
    assert_eq!(body["dark"], false);

    let (status, _) = send(&app, Method::PUT, "/settings/theme", Some(json!({ "use_system_setting": true }))).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, Method::PUT, "/settings/theme", Some(json!({ "dark_mode_forced": true }))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["accepted"], false);

    let (_, body) = send(&app, Method::GET, "/settings/theme?system_dark=true", None).await;
    assert_eq!(body["dark"], true);
    assert!(state.bridge.theme().use_system_setting);
}

#[tokio::test]
async fn event_stream_attaches_a_presenter() {
    let (app, state) = app();

    let request = Request::builder().uri("/timer/events").body(Body::empty()).unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "text/event-stream");
    assert_eq!(state.presenter_count(), 1);

    drop(response);
    assert_eq!(state.presenter_count(), 0);
}

#[derive(Debug, Default)]
struct CountingSink {
    shown: Mutex<usize>,
    dismissed: Mutex<usize>,
}

impl NotificationSink for CountingSink {
    fn show(&self, _notification: &Notification) {
        *self.shown.lock().unwrap() += 1;
    }

    fn dismiss(&self) {
        *self.dismissed.lock().unwrap() += 1;
    }
}

#[tokio::test]
async fn last_presenter_leaving_promotes_a_running_countdown() {
    let sink = Arc::new(CountingSink::default());
    let state = Arc::new(AppState::new(0, "127.0.0.1".to_string(), sink.clone()));

    let first = state.attach_presenter();
    let second = state.attach_presenter();
    state.start_timer(600, true).unwrap();
    assert!(!state.engine.foreground().is_promoted());

    drop(first);
    assert!(!state.engine.foreground().is_promoted());

    drop(second);
    assert!(state.engine.foreground().is_promoted());
    assert_eq!(*sink.shown.lock().unwrap(), 1);

    let _back = state.attach_presenter();
    assert!(!state.engine.foreground().is_promoted());
    assert_eq!(*sink.dismissed.lock().unwrap(), 1);

    state.cancel_timer().unwrap();
}

#[tokio::test]
async fn unwatched_start_is_promoted() {
    let (app, state) = app();

    let (status, _) = send(&app, Method::POST, "/timer/start", Some(json!({ "seconds": 30 }))).await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(&app, Method::GET, "/status", None).await;
    assert_eq!(body["presenters"], 0);
    assert_eq!(body["foreground"], true);

    send(&app, Method::POST, "/timer/cancel", None).await;
    assert!(!state.engine.foreground().is_promoted());
}

#[tokio::test(start_paused = true)]
async fn detaching_after_the_countdown_ends_does_not_promote() {
    let sink = Arc::new(CountingSink::default());
    let state = Arc::new(AppState::new(0, "127.0.0.1".to_string(), sink.clone()));

    let guard = state.attach_presenter();
    state.start_timer(2, true).unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(2500)).await;
    assert!(!state.engine.is_active());

    drop(guard);
    assert!(!state.engine.foreground().is_promoted());
    assert_eq!(*sink.shown.lock().unwrap(), 0);
}
