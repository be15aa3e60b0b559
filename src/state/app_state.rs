//! Main application state management

use std::{
    sync::{Arc, Mutex},
    time::Instant,
};
use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tracing::info;

use crate::{
    error::{Result, TimerError},
    services::{EventBus, Notification, NotificationSink},
};
use super::{
    CompletedTask, Settings, SettingsUpdate, TaskHistory, TickOutcome, TimerEngine, TimerState,
};

/// Main application state: the timer engine plus everything around it
#[derive(Debug)]
pub struct AppState {
    /// Timer engine; every timer mutation goes through this lock
    pub engine: Arc<Mutex<TimerEngine>>,
    /// Music and cosmetic settings
    pub settings: Arc<Mutex<Settings>>,
    /// Completed tasks
    pub history: Arc<Mutex<TaskHistory>>,
    /// Notification and audio fan-out
    pub events: Arc<EventBus>,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: Arc<Mutex<Option<String>>>,
    pub last_action_time: Arc<Mutex<Option<DateTime<Utc>>>>,
    /// Channel for timer updates
    pub timer_update_tx: watch::Sender<TimerState>,
    /// Keep the receiver alive to prevent channel closure
    pub _timer_update_rx: watch::Receiver<TimerState>,
}

impl AppState {
    /// Create a new AppState with an idle timer
    pub fn new(port: u16, host: String, divisor: u64, settings: Settings) -> Self {
        let events = Arc::new(EventBus::new());
        let initial = TimerState::with_divisor(divisor);
        let engine = TimerEngine::new(initial.clone(), events.clone(), events.clone());
        let (timer_update_tx, timer_update_rx) = watch::channel(initial);

        Self {
            engine: Arc::new(Mutex::new(engine)),
            settings: Arc::new(Mutex::new(settings)),
            history: Arc::new(Mutex::new(TaskHistory::new())),
            events,
            start_time: Instant::now(),
            port,
            host,
            last_action: Arc::new(Mutex::new(None)),
            last_action_time: Arc::new(Mutex::new(None)),
            timer_update_tx,
            _timer_update_rx: timer_update_rx,
        }
    }

    /// Apply an engine operation, then publish the new snapshot and record the action
    pub fn update_timer<F>(&self, action: &str, op: F) -> Result<TimerState>
    where
        F: FnOnce(&mut TimerEngine) -> Result<()>,
    {
        let mut engine = self.engine.lock()
            .map_err(|e| TimerError::Lock(format!("Failed to lock timer engine: {}", e)))?;

        op(&mut *engine)?;
        let snapshot = engine.state().clone();
        drop(engine); // Release the lock early

        self.record_action(action);
        self.publish(snapshot.clone());
        Ok(snapshot)
    }

    fn record_action(&self, action: &str) {
        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }
    }

    /// Notify timer watchers, skipping snapshots identical to the current one
    fn publish(&self, snapshot: TimerState) {
        self.timer_update_tx.send_if_modified(|current| {
            if *current == snapshot {
                false
            } else {
                *current = snapshot;
                true
            }
        });
    }

    pub fn start_timer(&self) -> Result<TimerState> {
        self.update_timer("start", |engine| engine.start())
    }

    pub fn pause_timer(&self) -> Result<TimerState> {
        self.update_timer("pause", |engine| {
            engine.pause();
            Ok(())
        })
    }

    pub fn reset_timer(&self) -> Result<TimerState> {
        self.update_timer("reset", |engine| {
            engine.reset();
            Ok(())
        })
    }

    pub fn switch_to_break(&self) -> Result<TimerState> {
        self.update_timer("break", |engine| engine.switch_to_break())
    }

    pub fn switch_to_work(&self) -> Result<TimerState> {
        self.update_timer("work", |engine| engine.switch_to_work())
    }

    pub fn set_current_task(&self, label: String) -> Result<TimerState> {
        self.update_timer("task", |engine| {
            engine.set_current_task(label);
            Ok(())
        })
    }

    /// Advance the timer by one second. Driven by the tick task.
    pub fn tick(&self) -> Result<TickOutcome> {
        let mut engine = self.engine.lock()
            .map_err(|e| TimerError::Lock(format!("Failed to lock timer engine: {}", e)))?;

        let outcome = engine.tick();
        let snapshot = engine.state().clone();
        drop(engine);

        if outcome != TickOutcome::Skipped {
            self.publish(snapshot);
        }
        Ok(outcome)
    }

    /// Validate every field first; nothing changes unless all of them pass
    pub fn update_settings(&self, update: SettingsUpdate) -> Result<Settings> {
        let divisor = match update.divisor.map(TimerEngine::validate_divisor).transpose() {
            Ok(divisor) => divisor,
            Err(e) => return Err(self.reject_settings("Invalid divisor", e)),
        };
        let darkness = match update
            .background_darkness
            .map(Settings::validate_background_darkness)
            .transpose()
        {
            Ok(darkness) => darkness,
            Err(e) => return Err(self.reject_settings("Invalid background darkness", e)),
        };

        // Hold the settings lock before touching the divisor so a lock
        // failure leaves every setting unchanged
        let mut settings = self.settings.lock()
            .map_err(|e| TimerError::Lock(format!("Failed to lock settings: {}", e)))?;

        if let Some(divisor) = divisor {
            self.update_timer("settings", |engine| engine.set_divisor(divisor as i64))?;
        }

        if let Some(music_url) = update.music_url {
            settings.music_url = music_url;
        }
        if let Some(darkness) = darkness {
            settings.background_darkness = darkness;
        }
        let saved = settings.clone();
        drop(settings);

        self.record_action("settings");
        self.events.notify(Notification::info(
            "Settings saved",
            "Your changes have been applied",
        ));
        Ok(saved)
    }

    fn reject_settings(&self, title: &str, error: TimerError) -> TimerError {
        self.events.notify(Notification::error(title, error.message()));
        error
    }

    /// Move the current task into history and clear it
    pub fn complete_task(&self) -> Result<CompletedTask> {
        let mut engine = self.engine.lock()
            .map_err(|e| TimerError::Lock(format!("Failed to lock timer engine: {}", e)))?;

        if !engine.state().has_task() {
            drop(engine);
            let message = "Add a task to complete first";
            self.events.notify(Notification::error("No active task", message));
            return Err(TimerError::validation(message));
        }

        let completed = {
            let mut history = self.history.lock()
                .map_err(|e| TimerError::Lock(format!("Failed to lock task history: {}", e)))?;
            history.record(&engine.state().current_task)
        };
        engine.set_current_task(String::new());
        let snapshot = engine.state().clone();
        drop(engine);

        info!("Task completed: {}", completed.task);
        self.record_action("complete");
        self.publish(snapshot);
        self.events.notify(Notification::info(
            "Task completed",
            &format!("\"{}\" has been completed", completed.task),
        ));
        Ok(completed)
    }

    /// Get current timer state
    pub fn get_timer_state(&self) -> Result<TimerState> {
        self.engine.lock()
            .map(|engine| engine.state().clone())
            .map_err(|e| TimerError::Lock(format!("Failed to lock timer engine: {}", e)))
    }

    pub fn get_settings(&self) -> Result<Settings> {
        self.settings.lock()
            .map(|settings| settings.clone())
            .map_err(|e| TimerError::Lock(format!("Failed to lock settings: {}", e)))
    }

    pub fn get_task_history(&self) -> Result<Vec<CompletedTask>> {
        self.history.lock()
            .map(|history| history.tasks().to_vec())
            .map_err(|e| TimerError::Lock(format!("Failed to lock task history: {}", e)))
    }

    /// Number of completed tasks
    pub fn completed_task_count(&self) -> Result<usize> {
        self.history.lock()
            .map(|history| history.len())
            .map_err(|e| TimerError::Lock(format!("Failed to lock task history: {}", e)))
    }

    /// Subscribe to timer snapshots
    pub fn subscribe_timer(&self) -> watch::Receiver<TimerState> {
        self.timer_update_tx.subscribe()
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }
}
