/// Gamification engine
///
/// Points and leveling live in [`points`]; badge scans, metric-driven
/// progress and claims live in [`evaluator`]. Both operate on `UserStats`
/// in place and report what happened through [`Notification`]s.

pub mod evaluator;
pub mod points;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use evaluator::{ClaimRejected, Payout};
pub use points::{add_points, LevelUp, FOCUS_SESSION_POINTS};

/// User-facing message produced by a state transition
///
/// The surface decides how to show these; the core only queues them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Notification {
    LevelUp { level: i64 },
    BadgeEarned { badge_id: i64, name: String },
    AchievementCompleted { achievement_id: i64, name: String },
    ChallengeCompleted { challenge_id: i64, name: String },
    FocusCompleted { points: i64 },
    BreakOver,
    /// Request to play the completion sound; best effort
    Chime,
    Info { message: String },
    Warning { message: String },
    Error { message: String },
}

impl Notification {
    pub fn info(message: impl Into<String>) -> Self {
        Notification::Info { message: message.into() }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Notification::Warning { message: message.into() }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Notification::Error { message: message.into() }
    }
}

impl From<LevelUp> for Notification {
    fn from(level_up: LevelUp) -> Self {
        Notification::LevelUp { level: level_up.level }
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notification::LevelUp { level } => write!(f, "🎉 Level up! You reached level {}", level),
            Notification::BadgeEarned { name, .. } => write!(f, "🏅 Badge earned: {}", name),
            Notification::AchievementCompleted { name, .. } => {
                write!(f, "🏆 Achievement completed: {} (ready to claim)", name)
            }
            Notification::ChallengeCompleted { name, .. } => {
                write!(f, "🎯 Challenge completed: {} (ready to claim)", name)
            }
            Notification::FocusCompleted { points } => {
                write!(f, "✅ Focus session complete! +{} points", points)
            }
            Notification::BreakOver => write!(f, "⏰ Break is over, time to focus"),
            Notification::Chime => write!(f, "🔔"),
            Notification::Info { message } => write!(f, "{}", message),
            Notification::Warning { message } => write!(f, "⚠️ {}", message),
            Notification::Error { message } => write!(f, "❌ {}", message),
        }
    }
}
