//! Timer engine: mode transitions, tick handling and break calculation
//!
//! The engine does no I/O. Everything observable outside of `TimerState`
//! goes through the injected [`NotificationSink`] and [`AudioSink`].

use std::sync::Arc;
use tracing::{debug, info};

use crate::{
    error::{Result, TimerError},
    services::{AudioCue, AudioSink, Notification, NotificationSink},
};
use super::timer_state::{TimerMode, TimerState, MIN_WORK_SECONDS};

const INVALID_DIVISOR: &str = "Divisor must be 1 or greater";

/// What a single tick did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Timer not running, nothing changed
    Skipped,
    /// Counters advanced
    Advanced,
    /// The break allowance ran out and the timer stopped
    BreakComplete,
}

pub struct TimerEngine {
    state: TimerState,
    notifier: Arc<dyn NotificationSink>,
    audio: Arc<dyn AudioSink>,
}

impl std::fmt::Debug for TimerEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimerEngine")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl TimerEngine {
    pub fn new(
        state: TimerState,
        notifier: Arc<dyn NotificationSink>,
        audio: Arc<dyn AudioSink>,
    ) -> Self {
        Self { state, notifier, audio }
    }

    pub fn state(&self) -> &TimerState {
        &self.state
    }

    /// Report a failed precondition and hand back the error
    fn reject(&self, title: &str, message: &str) -> TimerError {
        self.notifier.notify(Notification::error(title, message));
        TimerError::validation(message)
    }

    fn require_task(&self) -> Result<()> {
        if self.state.has_task() {
            Ok(())
        } else {
            Err(self.reject("Task required", "Enter a task before starting the timer"))
        }
    }

    /// Start or resume ticking. Leaving Idle requires a task.
    pub fn start(&mut self) -> Result<()> {
        if self.state.mode == TimerMode::Idle {
            self.require_task()?;
            self.state.mode = TimerMode::Working;
            self.audio.play(AudioCue::WorkStart);
        }
        self.state.is_running = true;
        info!("Timer started in {} mode", self.state.mode.as_str());
        Ok(())
    }

    pub fn pause(&mut self) {
        if self.state.is_running {
            info!("Timer paused");
        }
        self.state.is_running = false;
    }

    /// Stop and return to Idle with every counter cleared
    pub fn reset(&mut self) {
        self.state.is_running = false;
        self.state.mode = TimerMode::Idle;
        self.state.elapsed_seconds = 0;
        self.state.total_work_seconds = 0;
        self.state.break_allowance_seconds = 0;
        self.audio.play(AudioCue::Refresh);
        info!("Timer reset");
    }

    /// Working → OnBreak, earning `floor(total_work / divisor)` seconds of break
    pub fn switch_to_break(&mut self) -> Result<()> {
        self.require_task()?;
        if self.state.mode != TimerMode::Working {
            return Err(self.reject(
                "Not working",
                "A break can only be taken from a work session",
            ));
        }
        if self.state.total_work_seconds < MIN_WORK_SECONDS {
            return Err(self.reject(
                "Work a bit longer",
                "You should work for at least 1 minute before taking a break",
            ));
        }

        self.state.break_allowance_seconds = self.state.total_work_seconds / self.state.divisor;
        self.state.elapsed_seconds = 0;
        self.state.mode = TimerMode::OnBreak;

        info!(
            "Switched to break: {}s earned from {}s of work",
            self.state.break_allowance_seconds, self.state.total_work_seconds
        );
        self.notifier.notify(Notification::info(
            "Break time",
            &format!("You earned {} seconds of break", self.state.break_allowance_seconds),
        ));
        self.audio.play(AudioCue::BreakStart);
        Ok(())
    }

    /// Begin a fresh work session, discarding the previous cycle's counters
    pub fn switch_to_work(&mut self) -> Result<()> {
        self.require_task()?;

        self.state.elapsed_seconds = 0;
        self.state.total_work_seconds = 0;
        self.state.break_allowance_seconds = 0;
        self.state.mode = TimerMode::Working;

        info!("Switched to work on '{}'", self.state.current_task);
        self.notifier.notify(Notification::info(
            "Back to work",
            &format!("Focusing on \"{}\"", self.state.current_task),
        ));
        self.audio.play(AudioCue::WorkStart);
        Ok(())
    }

    pub fn set_divisor(&mut self, divisor: i64) -> Result<()> {
        if divisor < 1 {
            return Err(self.reject("Invalid divisor", INVALID_DIVISOR));
        }
        self.state.divisor = divisor as u64;
        info!("Divisor set to {}", divisor);
        Ok(())
    }

    /// Check a divisor without touching any state
    pub fn validate_divisor(divisor: i64) -> Result<u64> {
        if divisor < 1 {
            return Err(TimerError::validation(INVALID_DIVISOR));
        }
        Ok(divisor as u64)
    }

    pub fn set_current_task(&mut self, label: impl Into<String>) {
        self.state.current_task = label.into();
        debug!("Current task set to '{}'", self.state.current_task);
    }

    /// Advance one second. Called by the scheduler while running.
    pub fn tick(&mut self) -> TickOutcome {
        if !self.state.is_running || self.state.mode == TimerMode::Idle {
            return TickOutcome::Skipped;
        }

        self.state.elapsed_seconds += 1;
        if self.state.mode == TimerMode::Working {
            self.state.total_work_seconds += 1;
        }

        if self.state.is_break_complete() {
            self.state.is_running = false;
            self.state.elapsed_seconds = self.state.break_allowance_seconds;
            info!("Break complete after {}s", self.state.break_allowance_seconds);
            self.notifier.notify(Notification::info(
                "Break complete!",
                "Your break time is over. Ready to start working again?",
            ));
            return TickOutcome::BreakComplete;
        }

        debug!(
            "Tick: mode={}, elapsed={}s, total_work={}s",
            self.state.mode.as_str(),
            self.state.elapsed_seconds,
            self.state.total_work_seconds
        );
        TickOutcome::Advanced
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingSink {
        notifications: Mutex<Vec<Notification>>,
        cues: Mutex<Vec<AudioCue>>,
    }

    impl NotificationSink for RecordingSink {
        fn notify(&self, notification: Notification) {
            self.notifications.lock().unwrap().push(notification);
        }
    }

    impl AudioSink for RecordingSink {
        fn play(&self, cue: AudioCue) {
            self.cues.lock().unwrap().push(cue);
        }
    }

    impl RecordingSink {
        fn titles(&self) -> Vec<String> {
            self.notifications
                .lock()
                .unwrap()
                .iter()
                .map(|n| n.title.clone())
                .collect()
        }

        fn cues(&self) -> Vec<AudioCue> {
            self.cues.lock().unwrap().clone()
        }
    }

    fn engine() -> (TimerEngine, Arc<RecordingSink>) {
        let sink = Arc::new(RecordingSink::default());
        let engine = TimerEngine::new(TimerState::new(), sink.clone(), sink.clone());
        (engine, sink)
    }

    fn working_for(seconds: u64) -> (TimerEngine, Arc<RecordingSink>) {
        let (mut engine, sink) = engine();
        engine.set_current_task("write report");
        engine.start().unwrap();
        for _ in 0..seconds {
            engine.tick();
        }
        (engine, sink)
    }

    #[test]
    fn test_start_without_task_fails() {
        let (mut engine, sink) = engine();
        let before = engine.state().clone();

        let err = engine.start().unwrap_err();

        assert!(err.is_validation());
        assert_eq!(engine.state(), &before);
        assert_eq!(engine.state().mode, TimerMode::Idle);
        assert!(!engine.state().is_running);
        assert_eq!(sink.titles(), vec!["Task required"]);
    }

    #[test]
    fn test_start_from_idle_enters_work() {
        let (mut engine, sink) = engine();
        engine.set_current_task("write report");

        engine.start().unwrap();

        assert_eq!(engine.state().mode, TimerMode::Working);
        assert!(engine.state().is_running);
        assert_eq!(sink.cues(), vec![AudioCue::WorkStart]);
    }

    #[test]
    fn test_resume_on_break_does_not_need_task() {
        let (mut engine, _) = working_for(60);
        engine.switch_to_break().unwrap();
        engine.pause();
        engine.set_current_task("");

        engine.start().unwrap();
        assert_eq!(engine.state().mode, TimerMode::OnBreak);
        assert!(engine.state().is_running);
    }

    #[test]
    fn test_pause_is_idempotent() {
        let (mut engine, _) = working_for(10);
        engine.pause();
        let once = engine.state().clone();
        engine.pause();
        assert_eq!(engine.state(), &once);
        assert!(!engine.state().is_running);
    }

    #[test]
    fn test_ticks_while_paused_are_ignored() {
        let (mut engine, _) = working_for(10);
        engine.pause();
        assert_eq!(engine.tick(), TickOutcome::Skipped);
        assert_eq!(engine.state().elapsed_seconds, 10);
        assert_eq!(engine.state().total_work_seconds, 10);
    }

    #[test]
    fn test_reset_from_any_state() {
        let (mut working, _) = working_for(90);
        let (mut on_break, _) = working_for(120);
        on_break.switch_to_break().unwrap();
        on_break.tick();
        let (mut idle, _) = engine();

        for engine in [&mut working, &mut on_break, &mut idle] {
            engine.reset();
            let state = engine.state();
            assert_eq!(state.mode, TimerMode::Idle);
            assert_eq!(state.elapsed_seconds, 0);
            assert_eq!(state.total_work_seconds, 0);
            assert_eq!(state.break_allowance_seconds, 0);
            assert!(!state.is_running);
        }
    }

    #[test]
    fn test_reset_keeps_divisor_and_task() {
        let (mut engine, _) = working_for(5);
        engine.set_divisor(3).unwrap();
        engine.reset();
        assert_eq!(engine.state().divisor, 3);
        assert_eq!(engine.state().current_task, "write report");
    }

    #[test]
    fn test_work_then_break_scenario() {
        let (mut engine, sink) = working_for(120);
        assert_eq!(engine.state().total_work_seconds, 120);

        engine.switch_to_break().unwrap();
        assert_eq!(engine.state().break_allowance_seconds, 24);
        assert_eq!(engine.state().mode, TimerMode::OnBreak);
        assert_eq!(engine.state().elapsed_seconds, 0);
        assert!(engine.state().is_running);

        for _ in 0..23 {
            assert_eq!(engine.tick(), TickOutcome::Advanced);
        }
        assert_eq!(engine.state().remaining_break_seconds(), Some(1));
        assert_eq!(engine.tick(), TickOutcome::BreakComplete);

        let state = engine.state();
        assert!(!state.is_running);
        assert_eq!(state.mode, TimerMode::OnBreak);
        assert_eq!(state.remaining_break_seconds(), Some(0));
        assert_eq!(state.total_work_seconds, 120);
        assert!(sink.titles().contains(&"Break complete!".to_string()));
        assert_eq!(
            sink.cues(),
            vec![AudioCue::WorkStart, AudioCue::BreakStart]
        );
    }

    #[test]
    fn test_break_allowance_uses_floor_for_any_divisor() {
        for divisor in 1..=13i64 {
            let (mut engine, _) = working_for(127);
            engine.set_divisor(divisor).unwrap();
            engine.switch_to_break().unwrap();
            assert_eq!(engine.state().break_allowance_seconds, 127 / divisor as u64);
        }
    }

    #[test]
    fn test_break_allowance_fixed_during_break() {
        let (mut engine, _) = working_for(100);
        engine.switch_to_break().unwrap();
        engine.set_divisor(1).unwrap();
        engine.tick();
        assert_eq!(engine.state().break_allowance_seconds, 20);
    }

    #[test]
    fn test_break_needs_one_minute_of_work() {
        let (mut engine, sink) = working_for(30);
        let before = engine.state().clone();

        let err = engine.switch_to_break().unwrap_err();

        assert!(err.is_validation());
        assert_eq!(engine.state(), &before);
        assert_eq!(sink.titles(), vec!["Work a bit longer"]);
    }

    #[test]
    fn test_break_needs_task() {
        let (mut engine, _) = working_for(90);
        engine.set_current_task("");
        let before = engine.state().clone();

        assert!(engine.switch_to_break().is_err());
        assert_eq!(engine.state(), &before);
    }

    #[test]
    fn test_break_only_from_work() {
        let (mut engine, _) = working_for(90);
        engine.switch_to_break().unwrap();
        let before = engine.state().clone();

        assert!(engine.switch_to_break().is_err());
        assert_eq!(engine.state(), &before);
    }

    #[test]
    fn test_break_from_idle_fails() {
        let (mut engine, _) = engine();
        engine.set_current_task("x");
        assert!(engine.switch_to_break().is_err());
        assert_eq!(engine.state().mode, TimerMode::Idle);
    }

    #[test]
    fn test_switch_to_work_zeroes_counters() {
        let (mut engine, sink) = working_for(300);
        engine.switch_to_break().unwrap();
        engine.tick();
        engine.tick();

        engine.switch_to_work().unwrap();

        let state = engine.state();
        assert_eq!(state.mode, TimerMode::Working);
        assert_eq!(state.elapsed_seconds, 0);
        assert_eq!(state.total_work_seconds, 0);
        assert_eq!(state.break_allowance_seconds, 0);
        assert!(sink.titles().contains(&"Back to work".to_string()));
    }

    #[test]
    fn test_switch_to_work_while_working_restarts_session() {
        let (mut engine, _) = working_for(45);
        engine.switch_to_work().unwrap();
        assert_eq!(engine.state().total_work_seconds, 0);
        assert_eq!(engine.state().mode, TimerMode::Working);
        assert!(engine.state().is_running);
    }

    #[test]
    fn test_switch_to_work_needs_task() {
        let (mut engine, _) = engine();
        assert!(engine.switch_to_work().is_err());
        assert_eq!(engine.state().mode, TimerMode::Idle);
    }

    #[test]
    fn test_set_divisor_rejects_below_one() {
        let (mut engine, sink) = engine();
        for bad in [0, -1, -100] {
            assert!(engine.set_divisor(bad).is_err());
            assert_eq!(engine.state().divisor, 5);
        }
        assert!(sink.titles().iter().all(|t| t == "Invalid divisor"));
    }

    #[test]
    fn test_zero_allowance_break_never_completes() {
        let (mut engine, sink) = working_for(60);
        engine.set_divisor(61).unwrap();
        engine.switch_to_break().unwrap();
        assert_eq!(engine.state().break_allowance_seconds, 0);

        for _ in 0..10 {
            assert_eq!(engine.tick(), TickOutcome::Advanced);
        }
        assert!(engine.state().is_running);
        assert!(!sink.titles().contains(&"Break complete!".to_string()));
    }

    #[test]
    fn test_total_work_does_not_grow_on_break() {
        let (mut engine, _) = working_for(60);
        engine.switch_to_break().unwrap();
        engine.tick();
        assert_eq!(engine.state().total_work_seconds, 60);
        assert_eq!(engine.state().elapsed_seconds, 1);
    }
}
