//! HTTP API module
//!
//! This module contains all HTTP endpoint handlers and response structures.

pub mod handlers;
pub mod responses;

use std::sync::Arc;
use axum::{
    routing::{get, post, put},
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
        .route("/timer/reset", post(reset_handler))
        .route("/timer/break", post(break_handler))
        .route("/timer/work", post(work_handler))
        .route("/timer/task", put(set_task_handler))
        .route("/tasks/complete", post(complete_task_handler))
        .route("/tasks/history", get(task_history_handler))
        .route("/settings", get(get_settings_handler).put(update_settings_handler))
        .route("/status", get(status_handler))
        .route("/notifications", get(notifications_handler))
        .route("/events", get(events_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
