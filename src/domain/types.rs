/// Core types and enums used throughout the domain layer
///
/// This module defines the id wrappers and the small closed enums (priority,
/// timer mode, theme, badge requirement, progress metric) shared by tasks,
/// habits and the gamification records.

use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::DomainError;

/// Identifier of a task, unique per user
///
/// Task ids are small integers assigned locally as `max + 1`, so the wrapper
/// keeps them from being mixed up with habit ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct TaskId(pub i64);

/// Identifier of a habit, unique per user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct HabitId(pub i64);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for HabitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Next free id: one past the largest existing id, or 1 for an empty collection
pub fn next_id(existing: impl IntoIterator<Item = i64>) -> i64 {
    existing.into_iter().max().map_or(1, |max| max + 1)
}

/// Identifier of the signed-in user owning every entity in a session
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl UserId {
    /// Generate a fresh anonymous user id
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Raw id as stored in the database
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&str> for UserId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Task priority, which also decides how many points a task is worth
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Worth 10 points
    Low,
    /// Worth 15 points
    Medium,
    /// Worth 20 points
    High,
}

impl Priority {
    /// Points awarded for completing a task with the given (optional) priority
    pub fn points(priority: Option<Priority>) -> i64 {
        match priority {
            Some(Priority::High) => 20,
            Some(Priority::Medium) => 15,
            Some(Priority::Low) | None => 10,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

impl FromStr for Priority {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            other => Err(DomainError::InvalidValue {
                message: format!("Invalid priority '{}'. Valid options: low, medium, high", other),
            }),
        }
    }
}

/// The three phases of the focus timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum TimerMode {
    Focus,
    #[serde(alias = "shortBreak")]
    ShortBreak,
    #[serde(alias = "longBreak")]
    LongBreak,
}

impl TimerMode {
    /// Lowercase name used in status lines
    pub fn label(&self) -> &'static str {
        match self {
            TimerMode::Focus => "focus",
            TimerMode::ShortBreak => "short break",
            TimerMode::LongBreak => "long break",
        }
    }
}

impl FromStr for TimerMode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['-', ' '], "_").as_str() {
            "focus" => Ok(TimerMode::Focus),
            "short_break" | "shortbreak" => Ok(TimerMode::ShortBreak),
            "long_break" | "longbreak" => Ok(TimerMode::LongBreak),
            other => Err(DomainError::InvalidValue {
                message: format!("Invalid timer mode '{}'. Valid options: focus, short_break, long_break", other),
            }),
        }
    }
}

/// Colour theme preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    /// Needs the custom themes feature or the Dark Theme reward
    Dark,
    /// Follow the host preference
    System,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
            Theme::System => "system",
        }
    }
}

impl FromStr for Theme {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            "system" => Ok(Theme::System),
            other => Err(DomainError::InvalidValue {
                message: format!("Invalid theme '{}'. Valid options: light, dark, system", other),
            }),
        }
    }
}

/// Which stats counter a badge requirement is compared against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequirementKind {
    /// `tasks_completed`
    Tasks,
    /// `longest_streak`
    Habits,
    /// `focus_sessions_completed`
    Focus,
    /// `level`
    Level,
}

impl RequirementKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequirementKind::Tasks => "tasks",
            RequirementKind::Habits => "habits",
            RequirementKind::Focus => "focus",
            RequirementKind::Level => "level",
        }
    }
}

impl FromStr for RequirementKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tasks" => Ok(RequirementKind::Tasks),
            "habits" => Ok(RequirementKind::Habits),
            "focus" => Ok(RequirementKind::Focus),
            "level" => Ok(RequirementKind::Level),
            other => Err(DomainError::InvalidValue {
                message: format!("Unknown badge requirement '{}'", other),
            }),
        }
    }
}

/// Grouping shown next to an achievement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AchievementCategory {
    /// Day-scoped goals
    Daily,
    /// Week-scoped goals
    Weekly,
    /// One-off events such as early starts
    Special,
    /// Long-running totals
    Milestone,
}

/// The activity that moves an achievement's or challenge's progress
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    /// One step per completed task
    TasksCompleted,
    /// Tracks habit streak length
    HabitStreak,
    /// One step per completed focus session
    FocusSessions,
    /// A task completed before 09:00 local time
    EarlyTask,
    /// Only moved by an explicit claim or external bookkeeping
    Manual,
}
