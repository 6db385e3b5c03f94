/// User settings and the focus timer's countdown state

use serde::{Deserialize, Serialize};

use crate::domain::{DomainError, Theme, TimerMode};

/// Per-user preferences; the durations seed the focus timer countdowns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppSettings {
    pub theme: Theme,
    /// Seeds the timer's sound toggle
    pub notifications: bool,
    /// Minutes
    pub focus_time: u32,
    /// Minutes
    pub short_break: u32,
    /// Minutes
    pub long_break: u32,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            theme: Theme::Light,
            notifications: true,
            focus_time: 25,
            short_break: 5,
            long_break: 15,
        }
    }
}

impl AppSettings {
    /// Configured countdown length for a timer mode, in minutes
    pub fn minutes_for(&self, mode: TimerMode) -> u32 {
        match mode {
            TimerMode::Focus => self.focus_time,
            TimerMode::ShortBreak => self.short_break,
            TimerMode::LongBreak => self.long_break,
        }
    }

    /// All durations must be positive and at most a day
    pub fn validate(&self) -> Result<(), DomainError> {
        for (label, minutes) in [
            ("Focus time", self.focus_time),
            ("Short break", self.short_break),
            ("Long break", self.long_break),
        ] {
            if minutes == 0 {
                return Err(DomainError::Validation {
                    message: format!("{} must be at least 1 minute", label),
                });
            }
            if minutes > 24 * 60 {
                return Err(DomainError::Validation {
                    message: format!("{} cannot exceed 24 hours", label),
                });
            }
        }
        Ok(())
    }
}

/// Countdown state of the focus timer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerState {
    /// Whole minutes left in the current phase
    pub minutes: u32,
    /// 0..=59
    pub seconds: u32,
    /// Whether the countdown is running
    pub is_active: bool,
    /// Phase being counted down
    pub mode: TimerMode,
    /// Completed focus phases; only a finished focus countdown moves it
    pub session_count: u32,
    /// Whether a finished phase requests the completion sound
    pub sound_on: bool,
}

impl TimerState {
    /// Idle focus countdown seeded from the settings
    pub fn initial(settings: &AppSettings) -> Self {
        Self {
            minutes: settings.focus_time,
            seconds: 0,
            is_active: false,
            mode: TimerMode::Focus,
            session_count: 0,
            sound_on: settings.notifications,
        }
    }

    /// Seconds left before the phase completes
    pub fn remaining_secs(&self) -> u64 {
        u64::from(self.minutes) * 60 + u64::from(self.seconds)
    }

    /// `MM:SS` rendering of the countdown
    pub fn display(&self) -> String {
        format!("{:02}:{:02}", self.minutes, self.seconds)
    }
}

impl Default for TimerState {
    fn default() -> Self {
        Self::initial(&AppSettings::default())
    }
}
