//! Process-level helpers used by the server binary

pub mod signals;

pub use signals::shutdown_signal;
