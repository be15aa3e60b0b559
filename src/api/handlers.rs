//! HTTP endpoint handlers

use std::{convert::Infallible, sync::Arc};
use axum::{
    extract::State,
    http::StatusCode,
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse, Json, Response,
    },
};
use futures::stream::{self, Stream};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast::error::RecvError;
use tracing::{error, info, warn};

use crate::{
    error::{Result, TimerError},
    state::{AppState, SettingsUpdate, TimerState},
};
use super::responses::{
    ApiResponse, HealthResponse, NotificationsResponse, SettingsResponse, StatusResponse,
    TaskCompletedResponse, TaskHistoryResponse,
};

/// Body of PUT /timer/task
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskRequest {
    pub task: String,
}

/// Turn a failed operation into a response: 422 for validation, 500 otherwise
fn rejection(state: &AppState, err: TimerError) -> Response {
    match err {
        TimerError::Validation(message) => {
            warn!("Request rejected: {}", message);
            match state.get_timer_state() {
                Ok(timer) => (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    Json(ApiResponse::error(message, timer)),
                )
                    .into_response(),
                Err(e) => {
                    error!("Failed to get timer state: {}", e);
                    StatusCode::INTERNAL_SERVER_ERROR.into_response()
                }
            }
        }
        TimerError::Lock(message) => {
            error!("Failed to access state: {}", message);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

fn timer_response(
    state: &AppState,
    result: Result<TimerState>,
    message: &str,
) -> std::result::Result<Json<ApiResponse>, Response> {
    match result {
        Ok(timer) => {
            info!("{}", message);
            Ok(Json(ApiResponse::ok(message.to_string(), timer)))
        }
        Err(e) => Err(rejection(state, e)),
    }
}

/// Handle POST /timer/start - Start or resume the timer
pub async fn start_handler(
    State(state): State<Arc<AppState>>,
) -> std::result::Result<Json<ApiResponse>, Response> {
    timer_response(&state, state.start_timer(), "Timer started")
}

/// Handle POST /timer/pause - Pause the timer
pub async fn pause_handler(
    State(state): State<Arc<AppState>>,
) -> std::result::Result<Json<ApiResponse>, Response> {
    timer_response(&state, state.pause_timer(), "Timer paused")
}

/// Handle POST /timer/reset - Return to idle
pub async fn reset_handler(
    State(state): State<Arc<AppState>>,
) -> std::result::Result<Json<ApiResponse>, Response> {
    timer_response(&state, state.reset_timer(), "Timer reset")
}

/// Handle POST /timer/break - Switch from work to break
pub async fn break_handler(
    State(state): State<Arc<AppState>>,
) -> std::result::Result<Json<ApiResponse>, Response> {
    timer_response(&state, state.switch_to_break(), "Switched to break")
}

/// Handle POST /timer/work - Start a fresh work session
pub async fn work_handler(
    State(state): State<Arc<AppState>>,
) -> std::result::Result<Json<ApiResponse>, Response> {
    timer_response(&state, state.switch_to_work(), "Switched to work")
}

/// Handle PUT /timer/task - Set the current task label
pub async fn set_task_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<TaskRequest>,
) -> std::result::Result<Json<ApiResponse>, Response> {
    timer_response(&state, state.set_current_task(request.task), "Current task updated")
}

/// Handle POST /tasks/complete - Move the current task into history
pub async fn complete_task_handler(
    State(state): State<Arc<AppState>>,
) -> std::result::Result<Json<TaskCompletedResponse>, Response> {
    let completed = state.complete_task().map_err(|e| rejection(&state, e))?;
    let timer = state.get_timer_state().map_err(|e| rejection(&state, e))?;

    Ok(Json(TaskCompletedResponse {
        status: "completed".to_string(),
        completed,
        timer: timer.into(),
    }))
}

/// Handle GET /tasks/history - Completed tasks, newest first
pub async fn task_history_handler(
    State(state): State<Arc<AppState>>,
) -> std::result::Result<Json<TaskHistoryResponse>, Response> {
    let tasks = state.get_task_history().map_err(|e| rejection(&state, e))?;
    Ok(Json(TaskHistoryResponse { tasks }))
}

fn settings_response(
    state: &AppState,
    message: &str,
) -> std::result::Result<Json<SettingsResponse>, Response> {
    let settings = state.get_settings().map_err(|e| rejection(state, e))?;
    let timer = state.get_timer_state().map_err(|e| rejection(state, e))?;

    Ok(Json(SettingsResponse {
        status: "ok".to_string(),
        message: message.to_string(),
        divisor: timer.divisor,
        settings,
    }))
}

/// Handle GET /settings - Current settings
pub async fn get_settings_handler(
    State(state): State<Arc<AppState>>,
) -> std::result::Result<Json<SettingsResponse>, Response> {
    settings_response(&state, "Current settings")
}

/// Handle PUT /settings - Validate and apply a settings change
pub async fn update_settings_handler(
    State(state): State<Arc<AppState>>,
    Json(update): Json<SettingsUpdate>,
) -> std::result::Result<Json<SettingsResponse>, Response> {
    state.update_settings(update).map_err(|e| rejection(&state, e))?;
    settings_response(&state, "Settings saved")
}

/// Handle GET /status - Return current timer status
pub async fn status_handler(
    State(state): State<Arc<AppState>>,
) -> std::result::Result<Json<StatusResponse>, StatusCode> {
    let timer = match state.get_timer_state() {
        Ok(t) => t,
        Err(e) => {
            error!("Failed to get timer state: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let settings = match state.get_settings() {
        Ok(s) => s,
        Err(e) => {
            error!("Failed to get settings: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    let completed_tasks = state.completed_task_count().unwrap_or_default();
    let (last_action, last_action_time) = state.get_last_action();

    Ok(Json(StatusResponse {
        timer: timer.into(),
        settings,
        completed_tasks,
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    }))
}

/// Handle GET /notifications - Recent notifications, newest first
pub async fn notifications_handler(State(state): State<Arc<AppState>>) -> Json<NotificationsResponse> {
    Json(NotificationsResponse {
        notifications: state.events.recent_notifications(),
    })
}

/// Handle GET /events - Server-sent stream of notifications and audio cues
pub async fn events_handler(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = std::result::Result<Event, Infallible>>> {
    info!("Event stream subscriber connected");
    let rx = state.events.subscribe();

    let events = stream::unfold(rx, |mut rx| async move {
        loop {
            match rx.recv().await {
                Ok(event) => {
                    let data = match serde_json::to_string(&event) {
                        Ok(data) => data,
                        Err(e) => {
                            error!("Failed to serialize event: {}", e);
                            continue;
                        }
                    };
                    let sse = Event::default().event(event.name()).data(data);
                    return Some((Ok::<Event, Infallible>(sse), rx));
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!("Event stream lagged, skipped {} events", skipped);
                }
                Err(RecvError::Closed) => return None,
            }
        }
    });

    Sse::new(events).keep_alive(KeepAlive::default())
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
