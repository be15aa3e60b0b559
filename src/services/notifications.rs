//! User-facing notifications raised by the timer

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Severity of a notification, used by the UI to pick a toast style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Info,
    Error,
}

/// A single notification: "fire event E with message M"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl Notification {
    pub fn new(kind: NotificationKind, title: &str, message: &str) -> Self {
        Self {
            kind,
            title: title.to_string(),
            message: message.to_string(),
            timestamp: Utc::now(),
        }
    }

    pub fn info(title: &str, message: &str) -> Self {
        Self::new(NotificationKind::Info, title, message)
    }

    pub fn error(title: &str, message: &str) -> Self {
        Self::new(NotificationKind::Error, title, message)
    }
}

/// Receives notifications from the timer. Presentation is up to the implementor.
pub trait NotificationSink: Send + Sync {
    fn notify(&self, notification: Notification);
}
