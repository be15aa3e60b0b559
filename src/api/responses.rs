//! API response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    services::Notification,
    state::{CompletedTask, Settings, TimerMode, TimerState},
};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Timer snapshot plus the values the UI derives from it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerView {
    #[serde(flatten)]
    pub state: TimerState,
    pub remaining_break_seconds: Option<u64>,
    pub work_elapsed_seconds: Option<u64>,
    pub break_progress_percent: Option<f64>,
}

impl From<TimerState> for TimerView {
    fn from(state: TimerState) -> Self {
        Self {
            remaining_break_seconds: state.remaining_break_seconds(),
            work_elapsed_seconds: state.work_elapsed_seconds(),
            break_progress_percent: state.break_progress_percent(),
            state,
        }
    }
}

/// API response structure for state change endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub timer: TimerView,
}

impl ApiResponse {
    /// Create a new API response
    pub fn new(status: String, message: String, timer: TimerState) -> Self {
        Self {
            status,
            message,
            timestamp: Utc::now(),
            timer: timer.into(),
        }
    }

    /// Create a response whose status mirrors the timer mode
    pub fn ok(message: String, timer: TimerState) -> Self {
        let status = match timer.mode {
            TimerMode::Idle => "idle",
            TimerMode::Working if timer.is_running => "working",
            TimerMode::OnBreak if timer.is_running => "on_break",
            _ => "paused",
        };
        Self::new(status.to_string(), message, timer)
    }

    /// Create an error response
    pub fn error(message: String, timer: TimerState) -> Self {
        Self::new("error".to_string(), message, timer)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettingsResponse {
    pub status: String,
    pub message: String,
    pub divisor: u64,
    pub settings: Settings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskCompletedResponse {
    pub status: String,
    pub completed: CompletedTask,
    pub timer: TimerView,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskHistoryResponse {
    pub tasks: Vec<CompletedTask>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationsResponse {
    pub notifications: Vec<Notification>,
}

/// Enhanced status response with timer information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub timer: TimerView,
    pub settings: Settings,
    pub completed_tasks: usize,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: VERSION.to_string(),
        }
    }
}
