//! External collaborator module
//!
//! The timer only knows the `NotificationSink` and `AudioSink` traits;
//! `EventBus` is the implementation the server wires in.

pub mod audio;
pub mod event_bus;
pub mod notifications;

// Re-export main types
pub use audio::{AudioCue, AudioSink};
pub use event_bus::{EventBus, TimerEvent};
pub use notifications::{Notification, NotificationKind, NotificationSink};
