//! Focus Timer - A state-managed HTTP server for a work/break focus timer
//!
//! The timer engine tracks work time and earns a break of
//! `work time / divisor`. Browser panels are thin consumers of the
//! state and operations exposed over HTTP.

pub mod api;
pub mod config;
pub mod error;
pub mod services;
pub mod state;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use api::create_router;
pub use config::Config;
pub use error::TimerError;
pub use state::{AppState, TimerEngine, TimerMode, TimerState};
pub use utils::signals::shutdown_signal;
