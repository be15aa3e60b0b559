//! User settings that live outside the timer state

use serde::{Deserialize, Serialize};

use crate::error::{Result, TimerError};

pub const DEFAULT_BACKGROUND_DARKNESS: u8 = 10;
pub const MAX_BACKGROUND_DARKNESS: i64 = 100;

/// Cosmetic and music settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Opaque URL handed to the external music player
    pub music_url: String,
    /// Background darkness in percent (0-100)
    pub background_darkness: u8,
}

impl Settings {
    pub fn new(music_url: String, background_darkness: u8) -> Self {
        Self {
            music_url,
            background_darkness,
        }
    }

    pub fn validate_background_darkness(value: i64) -> Result<u8> {
        if !(0..=MAX_BACKGROUND_DARKNESS).contains(&value) {
            return Err(TimerError::validation(
                "Background darkness must be between 0 and 100",
            ));
        }
        Ok(value as u8)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::new(String::new(), DEFAULT_BACKGROUND_DARKNESS)
    }
}

/// Partial settings change, as submitted by the settings dialog
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SettingsUpdate {
    pub divisor: Option<i64>,
    pub music_url: Option<String>,
    pub background_darkness: Option<i64>,
}
