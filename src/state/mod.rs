//! State management module
//!
//! This module contains the timer engine and the state that surrounds it.

pub mod app_state;
pub mod engine;
pub mod settings;
pub mod task_history;
pub mod timer_state;

// Re-export main types
pub use app_state::AppState;
pub use engine::{TickOutcome, TimerEngine};
pub use settings::{Settings, SettingsUpdate};
pub use task_history::{CompletedTask, TaskHistory};
pub use timer_state::{TimerMode, TimerState};
