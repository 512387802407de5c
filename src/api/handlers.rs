//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{
        sse::{Event, KeepAlive, Sse},
        Json,
    },
};
use futures::stream::{self, Stream, StreamExt};
use tracing::{error, info, warn};

use crate::{
    state::{AppState, EditorError, ThemeUpdate},
    utils::format::seconds_to_clock,
};
use super::responses::{
    AddTimeRequest, CommitRequest, DigitRequest, EditorResponse, HealthResponse, StartRequest,
    StatusResponse, ThemeQuery, ThemeResponse, TimerResponse,
};

type ApiResult<T> = Result<Json<T>, StatusCode>;

fn internal(context: &str, e: impl std::fmt::Display) -> StatusCode {
    error!("{}: {}", context, e);
    StatusCode::INTERNAL_SERVER_ERROR
}

fn editor_status(e: EditorError) -> StatusCode {
    match e {
        EditorError::Lock(e) => internal("Editor state unavailable", e),
        other => {
            warn!("Editor request refused: {}", other);
            StatusCode::CONFLICT
        }
    }
}

/// Answer with the current countdown, or 409 when the command found nothing to act on
fn command_response(state: &AppState, applied: bool, message: &str) -> ApiResult<TimerResponse> {
    if applied {
        Ok(Json(TimerResponse::new(message, state.engine.snapshot())))
    } else {
        info!("{} ignored, no countdown is running", message);
        Err(StatusCode::CONFLICT)
    }
}

/// Handle POST /timer/start - Start a countdown, superseding any running one
pub async fn start_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<StartRequest>,
) -> ApiResult<TimerResponse> {
    let seconds = match request.duration() {
        Some(seconds) if seconds > 0 => seconds,
        _ => {
            warn!("Start request without a positive duration");
            return Err(StatusCode::BAD_REQUEST);
        }
    };

    match state.start_timer(seconds, request.start_immediately) {
        Ok(timer) => Ok(Json(TimerResponse::new("Countdown started", timer))),
        Err(e) => Err(internal("Failed to start countdown", e)),
    }
}

/// Handle POST /timer/pause - Pause the running countdown
pub async fn pause_handler(State(state): State<Arc<AppState>>) -> ApiResult<TimerResponse> {
    let paused = state.pause_timer().map_err(|e| internal("Failed to pause countdown", e))?;
    command_response(&state, paused, "Countdown paused")
}

/// Handle POST /timer/resume - Resume a paused countdown
pub async fn resume_handler(State(state): State<Arc<AppState>>) -> ApiResult<TimerResponse> {
    let resumed = state.resume_timer().map_err(|e| internal("Failed to resume countdown", e))?;
    command_response(&state, resumed, "Countdown resumed")
}

/// Handle POST /timer/add - Add time (a minute by default) to the running countdown
pub async fn add_time_handler(
    State(state): State<Arc<AppState>>,
    request: Option<Json<AddTimeRequest>>,
) -> ApiResult<TimerResponse> {
    let request = request.map(|Json(request)| request).unwrap_or_default();
    let added = state
        .add_time(request.seconds)
        .map_err(|e| internal("Failed to add time", e))?;
    command_response(&state, added, "Time added")
}

/// Handle POST /timer/cancel - Cancel the countdown and reset it to zero
pub async fn cancel_handler(State(state): State<Arc<AppState>>) -> ApiResult<TimerResponse> {
    let cancelled = state.cancel_timer().map_err(|e| internal("Failed to cancel countdown", e))?;
    command_response(&state, cancelled, "Countdown cancelled")
}

/// Handle POST /timer/reset - Restart from the last committed duration, paused
pub async fn reset_handler(State(state): State<Arc<AppState>>) -> ApiResult<TimerResponse> {
    let timer = state.reset_timer().map_err(editor_status)?;
    Ok(Json(TimerResponse::new("Countdown reset", timer)))
}

/// Handle GET /timer/events - Stream countdown updates while attached as a presenter
pub async fn events_handler(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, axum::Error>>> {
    let guard = state.attach_presenter();
    let mut watch = state.bridge.subscribe();
    let initial = watch.current();

    // The guard lives in the stream state and detaches when the client goes away
    let updates = stream::unfold((watch, guard), |(mut watch, guard)| async move {
        let timer = watch.changed().await?;
        Some((timer, (watch, guard)))
    });

    let events = stream::once(async move { initial })
        .chain(updates)
        .map(|timer| {
            Event::default()
                .event("countdown")
                .json_data(TimerResponse::new("Countdown update", timer))
        });

    Sse::new(events).keep_alive(KeepAlive::default())
}

/// Handle POST /editor - Open the duration editor
pub async fn editor_open_handler(State(state): State<Arc<AppState>>) -> ApiResult<EditorResponse> {
    let digits = state.open_editor().map_err(editor_status)?;
    Ok(Json(EditorResponse::new(digits, true)))
}

/// Handle DELETE /editor - Close the editor without starting
pub async fn editor_discard_handler(State(state): State<Arc<AppState>>) -> StatusCode {
    match state.discard_editor() {
        Ok(true) => StatusCode::NO_CONTENT,
        Ok(false) => StatusCode::CONFLICT,
        Err(e) => editor_status(e),
    }
}

/// Handle POST /editor/digits - Enter a digit
pub async fn push_digit_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<DigitRequest>,
) -> ApiResult<EditorResponse> {
    let (digits, accepted) = state.push_digit(request.digit).map_err(editor_status)?;
    Ok(Json(EditorResponse::new(digits, accepted)))
}

/// Handle DELETE /editor/digits - Clear the last entered digit
pub async fn pop_digit_handler(State(state): State<Arc<AppState>>) -> ApiResult<EditorResponse> {
    let digits = state.pop_digit().map_err(editor_status)?;
    Ok(Json(EditorResponse::new(digits, true)))
}

/// Handle POST /editor/commit - Start the countdown from the entered digits
pub async fn commit_handler(
    State(state): State<Arc<AppState>>,
    request: Option<Json<CommitRequest>>,
) -> ApiResult<TimerResponse> {
    let request = request.map(|Json(request)| request).unwrap_or_default();
    let timer = state
        .commit_editor(request.start_immediately)
        .map_err(editor_status)?;
    Ok(Json(TimerResponse::new("Countdown started", timer)))
}

/// Handle GET /settings/theme - Current theme preference
pub async fn theme_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ThemeQuery>,
) -> Json<ThemeResponse> {
    let preference = state.bridge.theme();
    Json(ThemeResponse {
        preference,
        dark: preference.is_dark(query.system_dark),
        accepted: true,
    })
}

/// Handle PUT /settings/theme - Update the theme preference
pub async fn update_theme_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ThemeQuery>,
    Json(update): Json<ThemeUpdate>,
) -> (StatusCode, Json<ThemeResponse>) {
    let (preference, accepted) = state.update_theme(update);
    let status = if accepted { StatusCode::OK } else { StatusCode::CONFLICT };

    (
        status,
        Json(ThemeResponse {
            preference,
            dark: preference.is_dark(query.system_dark),
            accepted,
        }),
    )
}

/// Handle GET /status - Return current countdown and server status
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let timer = state.engine.snapshot();
    let (last_action, last_action_time) = state.get_last_action();

    Json(StatusResponse {
        timer,
        clock: seconds_to_clock(timer.remaining_seconds),
        screen: state.screen(),
        timer_active: timer.is_active(),
        foreground: state.engine.foreground().is_promoted(),
        presenters: state.presenter_count(),
        editor: state.editor_digits(),
        theme: state.bridge.theme(),
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    })
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
