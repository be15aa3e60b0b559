//! Audio cues played by an external player

use serde::{Deserialize, Serialize};

const TRACK_BASE_URL: &str = "https://whyp.it/tracks";

/// Sound cues the timer can request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AudioCue {
    WorkStart,
    BreakStart,
    Refresh,
}

impl AudioCue {
    pub fn as_str(&self) -> &'static str {
        match self {
            AudioCue::WorkStart => "work",
            AudioCue::BreakStart => "break",
            AudioCue::Refresh => "refresh",
        }
    }

    /// URL of the track the player should fetch for this cue
    pub fn track_url(&self) -> String {
        let track_id = match self {
            AudioCue::WorkStart => 269053,
            AudioCue::BreakStart => 269054,
            AudioCue::Refresh => 269055,
        };
        format!("{}/{}/{}", TRACK_BASE_URL, track_id, self.as_str())
    }
}

/// Fire-and-forget audio hook. Implementations must not fail the caller.
pub trait AudioSink: Send + Sync {
    fn play(&self, cue: AudioCue);
}
