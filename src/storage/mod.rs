/// Persistence gateway
///
/// The session mirrors every local change through [`ProductivityStorage`].
/// Two implementations ship: SQLite for real use and an in-memory store
/// holding the demo dataset (also used by tests).

pub mod memory;
pub mod migrations;
pub mod sqlite;

pub use memory::MemoryStorage;
pub use sqlite::SqliteStorage;

use chrono::{DateTime, NaiveDate, Utc};
use thiserror::Error;

use crate::domain::{AppSettings, Badge, Habit, HabitId, Task, TaskId, UserId, UserStats};

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database connection error: {0}")]
    Connection(String),

    #[error("Database query error: {0}")]
    Query(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Migration error: {0}")]
    Migration(String),

    #[error("Storage is offline")]
    Offline,
}

/// A badge a user has earned, as stored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EarnedBadge {
    pub badge_id: i64,
    pub earned_at: DateTime<Utc>,
}

/// CRUD interface the session mirrors changes through
///
/// Every row belongs to exactly one user. Ids are assigned by the caller.
/// `load_stats` returns stats without badges; badges are assembled from
/// [`badge_catalog`](Self::badge_catalog) and the user's earned rows.
pub trait ProductivityStorage {
    fn list_tasks(&self, user: &UserId) -> Result<Vec<Task>, StorageError>;

    fn insert_task(&self, user: &UserId, task: &Task) -> Result<(), StorageError>;

    fn update_task(&self, user: &UserId, task: &Task) -> Result<(), StorageError>;

    fn delete_task(&self, user: &UserId, id: TaskId) -> Result<(), StorageError>;

    /// Habits with their completion dates filled in
    fn list_habits(&self, user: &UserId) -> Result<Vec<Habit>, StorageError>;

    fn insert_habit(&self, user: &UserId, habit: &Habit) -> Result<(), StorageError>;

    fn update_habit(&self, user: &UserId, habit: &Habit) -> Result<(), StorageError>;

    /// Remove a habit together with its completion rows
    fn delete_habit(&self, user: &UserId, id: HabitId) -> Result<(), StorageError>;

    fn insert_completion(&self, user: &UserId, habit: HabitId, date: NaiveDate) -> Result<(), StorageError>;

    fn delete_completion(&self, user: &UserId, habit: HabitId, date: NaiveDate) -> Result<(), StorageError>;

    /// `None` for a user with no stats row yet
    fn load_stats(&self, user: &UserId) -> Result<Option<UserStats>, StorageError>;

    fn save_stats(&self, user: &UserId, stats: &UserStats) -> Result<(), StorageError>;

    /// Read-only badge catalog, none marked earned
    fn badge_catalog(&self) -> Result<Vec<Badge>, StorageError>;

    fn list_user_badges(&self, user: &UserId) -> Result<Vec<EarnedBadge>, StorageError>;

    fn insert_user_badge(&self, user: &UserId, earned: EarnedBadge) -> Result<(), StorageError>;

    /// `None` for a user who never saved settings
    fn load_settings(&self, user: &UserId) -> Result<Option<AppSettings>, StorageError>;

    fn save_settings(&self, user: &UserId, settings: &AppSettings) -> Result<(), StorageError>;
}

/// Merge the catalog with a user's earned rows
pub fn assemble_badges(catalog: Vec<Badge>, earned: &[EarnedBadge]) -> Vec<Badge> {
    catalog
        .into_iter()
        .map(|mut badge| {
            if let Some(row) = earned.iter().find(|e| e.badge_id == badge.id) {
                badge.earned = true;
                badge.earned_at = Some(row.earned_at);
            }
            badge
        })
        .collect()
}
