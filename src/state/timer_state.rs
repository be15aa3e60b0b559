//! Timer state structure and derived values

use serde::{Deserialize, Serialize};

/// Default work/break divisor
pub const DEFAULT_DIVISOR: u64 = 5;

/// Minimum work time before a break may be taken
pub const MIN_WORK_SECONDS: u64 = 60;

/// Timer mode. Idle → Working → OnBreak → Working ..., reset returns to Idle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerMode {
    Idle,
    Working,
    OnBreak,
}

impl TimerMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimerMode::Idle => "idle",
            TimerMode::Working => "working",
            TimerMode::OnBreak => "on_break",
        }
    }
}

/// Timer state owned by the engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerState {
    pub mode: TimerMode,
    /// Seconds since the last mode switch or reset
    pub elapsed_seconds: u64,
    /// Work seconds accumulated in the current cycle
    pub total_work_seconds: u64,
    /// Break length earned, fixed when the break starts
    pub break_allowance_seconds: u64,
    pub is_running: bool,
    pub divisor: u64,
    pub current_task: String,
}

impl TimerState {
    /// Create an idle timer with the default divisor
    pub fn new() -> Self {
        Self::with_divisor(DEFAULT_DIVISOR)
    }

    /// Create an idle timer with the given divisor. Callers validate `divisor >= 1`.
    pub fn with_divisor(divisor: u64) -> Self {
        Self {
            mode: TimerMode::Idle,
            elapsed_seconds: 0,
            total_work_seconds: 0,
            break_allowance_seconds: 0,
            is_running: false,
            divisor,
            current_task: String::new(),
        }
    }

    pub fn has_task(&self) -> bool {
        !self.current_task.trim().is_empty()
    }

    /// Seconds of break left, floored at zero. `None` outside a break.
    pub fn remaining_break_seconds(&self) -> Option<u64> {
        match self.mode {
            TimerMode::OnBreak => Some(
                self.break_allowance_seconds
                    .saturating_sub(self.elapsed_seconds),
            ),
            _ => None,
        }
    }

    /// Seconds of the current work session. `None` outside work.
    pub fn work_elapsed_seconds(&self) -> Option<u64> {
        match self.mode {
            TimerMode::Working => Some(self.elapsed_seconds),
            _ => None,
        }
    }

    /// Break progress in percent, capped at 100
    pub fn break_progress_percent(&self) -> Option<f64> {
        if self.mode != TimerMode::OnBreak || self.break_allowance_seconds == 0 {
            return None;
        }
        let progress = self.elapsed_seconds as f64 / self.break_allowance_seconds as f64 * 100.0;
        Some(progress.min(100.0))
    }

    /// Whether the earned break has been used up
    pub fn is_break_complete(&self) -> bool {
        self.mode == TimerMode::OnBreak
            && self.break_allowance_seconds > 0
            && self.elapsed_seconds >= self.break_allowance_seconds
    }
}

impl Default for TimerState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn on_break(allowance: u64, elapsed: u64) -> TimerState {
        TimerState {
            mode: TimerMode::OnBreak,
            elapsed_seconds: elapsed,
            break_allowance_seconds: allowance,
            ..TimerState::new()
        }
    }

    #[test]
    fn test_defaults() {
        let state = TimerState::new();
        assert_eq!(state.mode, TimerMode::Idle);
        assert_eq!(state.divisor, 5);
        assert!(!state.is_running);
        assert!(!state.has_task());
    }

    #[test]
    fn test_remaining_break_never_negative() {
        assert_eq!(on_break(24, 10).remaining_break_seconds(), Some(14));
        assert_eq!(on_break(24, 24).remaining_break_seconds(), Some(0));
        assert_eq!(on_break(24, 30).remaining_break_seconds(), Some(0));
        assert_eq!(TimerState::new().remaining_break_seconds(), None);
    }

    #[test]
    fn test_break_progress() {
        assert_eq!(on_break(20, 5).break_progress_percent(), Some(25.0));
        assert_eq!(on_break(20, 40).break_progress_percent(), Some(100.0));
        assert_eq!(on_break(0, 5).break_progress_percent(), None);
    }

    #[test]
    fn test_whitespace_task_is_not_a_task() {
        let state = TimerState {
            current_task: "   ".to_string(),
            ..TimerState::new()
        };
        assert!(!state.has_task());
    }

    #[test]
    fn test_break_complete_requires_positive_allowance() {
        assert!(!on_break(0, 0).is_break_complete());
        assert!(on_break(3, 3).is_break_complete());
        assert!(!on_break(3, 2).is_break_complete());
    }
}
