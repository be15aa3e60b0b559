//! Broadcast fan-out for notifications and audio cues

use std::{
    collections::VecDeque,
    sync::Mutex,
};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use super::{AudioCue, AudioSink, Notification, NotificationKind, NotificationSink};

/// How many notifications are kept for GET /notifications
pub const RECENT_NOTIFICATION_LIMIT: usize = 50;

/// Event delivered to subscribers of the bus
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TimerEvent {
    Notification(Notification),
    Audio { cue: AudioCue, url: String },
}

impl TimerEvent {
    /// Name used for the SSE `event:` field
    pub fn name(&self) -> &'static str {
        match self {
            TimerEvent::Notification(_) => "notification",
            TimerEvent::Audio { .. } => "audio",
        }
    }
}

/// Concrete notification and audio collaborator used by the server
#[derive(Debug)]
pub struct EventBus {
    event_tx: broadcast::Sender<TimerEvent>,
    recent: Mutex<VecDeque<Notification>>,
}

impl EventBus {
    pub fn new() -> Self {
        let (event_tx, _) = broadcast::channel(100);
        Self {
            event_tx,
            recent: Mutex::new(VecDeque::with_capacity(RECENT_NOTIFICATION_LIMIT)),
        }
    }

    /// Subscribe to every event published after this call
    pub fn subscribe(&self) -> broadcast::Receiver<TimerEvent> {
        self.event_tx.subscribe()
    }

    /// Recent notifications, newest first
    pub fn recent_notifications(&self) -> Vec<Notification> {
        match self.recent.lock() {
            Ok(recent) => recent.iter().cloned().collect(),
            Err(e) => {
                warn!("Failed to lock notification log: {}", e);
                Vec::new()
            }
        }
    }

    fn publish(&self, event: TimerEvent) {
        // No subscribers is the normal case when no UI is attached
        if self.event_tx.send(event).is_err() {
            debug!("No event subscribers connected");
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationSink for EventBus {
    fn notify(&self, notification: Notification) {
        match notification.kind {
            NotificationKind::Info => info!("{}: {}", notification.title, notification.message),
            NotificationKind::Error => warn!("{}: {}", notification.title, notification.message),
        }

        if let Ok(mut recent) = self.recent.lock() {
            recent.push_front(notification.clone());
            recent.truncate(RECENT_NOTIFICATION_LIMIT);
        }

        self.publish(TimerEvent::Notification(notification));
    }
}

impl AudioSink for EventBus {
    fn play(&self, cue: AudioCue) {
        debug!("Requesting audio cue: {}", cue.as_str());
        self.publish(TimerEvent::Audio {
            cue,
            url: cue.track_url(),
        });
    }
}
