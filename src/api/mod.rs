//! HTTP API module
//! 
//! This module contains all HTTP endpoint handlers and response structures.

pub mod handlers;
pub mod responses;

use std::sync::Arc;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use handlers::*;

/// Create the HTTP router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/timer/start", post(start_handler))
        .route("/timer/pause", post(pause_handler))
        .route("/timer/resume", post(resume_handler))
        .route("/timer/add", post(add_time_handler))
        .route("/timer/cancel", post(cancel_handler))
        .route("/timer/reset", post(reset_handler))
        .route("/timer/events", get(events_handler))
        .route("/editor", post(editor_open_handler).delete(editor_discard_handler))
        .route("/editor/digits", post(push_digit_handler).delete(pop_digit_handler))
        .route("/editor/commit", post(commit_handler))
        .route("/settings/theme", get(theme_handler).put(update_theme_handler))
        .route("/status", get(status_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
