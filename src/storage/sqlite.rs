/// SQLite implementation of the persistence gateway
///
/// Every table is keyed by user id. Achievements, challenges and rewards
/// are stored as JSON columns on the stats row since they are always read
/// and written as a whole.

use std::path::PathBuf;

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use crate::domain::{
    AppSettings, Badge, BadgeRequirement, Habit, HabitId, Priority, Task, TaskId, Theme, UserId, UserStats,
    EXPERIENCE_PER_LEVEL,
};
use crate::storage::{migrations, EarnedBadge, ProductivityStorage, StorageError};

/// SQLite-based storage implementation
///
/// Holds one connection to the database file and implements every
/// operation of the [`ProductivityStorage`] gateway against it.
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Open (or create) the database file and bring the schema up to date
    pub fn new(db_path: PathBuf) -> Result<Self, StorageError> {
        let conn = Connection::open(&db_path)
            .map_err(|e| StorageError::Connection(format!("Failed to open database: {}", e)))?;

        Self::prepare(conn, &format!("{:?}", db_path))
    }

    /// Private in-memory database, handy for tests
    pub fn in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| StorageError::Connection(format!("Failed to open in-memory database: {}", e)))?;

        Self::prepare(conn, ":memory:")
    }

    /// Turn on foreign keys and run the migrations on a fresh connection
    fn prepare(conn: Connection, label: &str) -> Result<Self, StorageError> {
        conn.execute("PRAGMA foreign_keys = ON", [])
            .map_err(|e| StorageError::Connection(format!("Failed to enable foreign keys: {}", e)))?;

        migrations::initialize_database(&conn)?;

        tracing::info!("SQLite storage initialized at: {}", label);
        Ok(Self { conn })
    }

    /// Conversion error for a text column holding an unknown value
    fn text_error(index: usize, message: &str) -> rusqlite::Error {
        rusqlite::Error::InvalidColumnType(index, message.to_string(), rusqlite::types::Type::Text)
    }

    /// Every day `habit` was checked off
    fn completions_for(&self, user: &UserId, habit: HabitId) -> Result<Vec<NaiveDate>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT completed_on FROM habit_completions
             WHERE user_id = ?1 AND habit_id = ?2",
        )?;
        let dates = stmt
            .query_map(params![user.as_str(), habit.0], |row| row.get::<_, NaiveDate>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(dates)
    }

    /// Error for an update or delete that matched no row
    fn not_found(entity: &'static str, id: impl ToString) -> StorageError {
        StorageError::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}

impl ProductivityStorage for SqliteStorage {
    /// All of the user's tasks in id order
    fn list_tasks(&self, user: &UserId) -> Result<Vec<Task>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, text, completed, due_date, priority, notes, category
             FROM tasks WHERE user_id = ?1 ORDER BY id",
        )?;

        let task_iter = stmt.query_map(params![user.as_str()], |row| {
            let priority = match row.get::<_, Option<String>>(4)? {
                Some(value) => Some(
                    value
                        .parse::<Priority>()
                        .map_err(|_| Self::text_error(4, "Invalid priority"))?,
                ),
                None => None,
            };

            Ok(Task::from_existing(
                TaskId(row.get(0)?),
                row.get(1)?, // text
                row.get(2)?, // completed
                row.get(3)?, // due_date
                priority,
                row.get(5)?, // notes
                row.get(6)?, // category
            ))
        })?;

        let mut tasks = Vec::new();
        for task in task_iter {
            tasks.push(task?);
        }
        Ok(tasks)
    }

    /// Create a new task row
    fn insert_task(&self, user: &UserId, task: &Task) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT INTO tasks (user_id, id, text, completed, due_date, priority, notes, category)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                user.as_str(),
                task.id.0,
                task.text,
                task.completed,
                task.due_date,
                task.priority.map(|p| p.as_str()),
                task.notes,
                task.category
            ],
        )?;

        tracing::debug!("Inserted task {} for {}", task.id, user);
        Ok(())
    }

    /// Update an existing task; fails if the row is gone
    fn update_task(&self, user: &UserId, task: &Task) -> Result<(), StorageError> {
        let rows_affected = self.conn.execute(
            "UPDATE tasks SET
                text = ?3,
                completed = ?4,
                due_date = ?5,
                priority = ?6,
                notes = ?7,
                category = ?8
             WHERE user_id = ?1 AND id = ?2",
            params![
                user.as_str(),
                task.id.0,
                task.text,
                task.completed,
                task.due_date,
                task.priority.map(|p| p.as_str()),
                task.notes,
                task.category
            ],
        )?;

        if rows_affected == 0 {
            return Err(Self::not_found("Task", task.id));
        }

        tracing::debug!("Updated task {} for {}", task.id, user);
        Ok(())
    }

    /// Delete a task
    fn delete_task(&self, user: &UserId, id: TaskId) -> Result<(), StorageError> {
        let rows_affected = self.conn.execute(
            "DELETE FROM tasks WHERE user_id = ?1 AND id = ?2",
            params![user.as_str(), id.0],
        )?;

        if rows_affected == 0 {
            return Err(Self::not_found("Task", id));
        }

        tracing::debug!("Deleted task {} for {}", id, user);
        Ok(())
    }

    /// All of the user's habits with their completion days
    fn list_habits(&self, user: &UserId) -> Result<Vec<Habit>, StorageError> {
        let rows = {
            let mut stmt = self.conn.prepare(
                "SELECT id, name, streak FROM habits WHERE user_id = ?1 ORDER BY id",
            )?;
            let rows = stmt
                .query_map(params![user.as_str()], |row| {
                    Ok((HabitId(row.get(0)?), row.get::<_, String>(1)?, row.get::<_, u32>(2)?))
                })?
                .collect::<Result<Vec<_>, _>>()?;
            rows
        };

        let mut habits = Vec::with_capacity(rows.len());
        for (id, name, streak) in rows {
            let dates = self.completions_for(user, id)?;
            habits.push(Habit::from_existing(id, name, streak, dates));
        }
        Ok(habits)
    }

    /// Create a new habit row
    fn insert_habit(&self, user: &UserId, habit: &Habit) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT INTO habits (user_id, id, name, streak) VALUES (?1, ?2, ?3, ?4)",
            params![user.as_str(), habit.id.0, habit.name, habit.streak],
        )?;

        for date in &habit.completed_dates {
            self.insert_completion(user, habit.id, *date)?;
        }

        tracing::debug!("Inserted habit {} ({}) for {}", habit.id, habit.name, user);
        Ok(())
    }

    /// Update a habit's name and streak; completions are written separately
    fn update_habit(&self, user: &UserId, habit: &Habit) -> Result<(), StorageError> {
        let rows_affected = self.conn.execute(
            "UPDATE habits SET name = ?3, streak = ?4 WHERE user_id = ?1 AND id = ?2",
            params![user.as_str(), habit.id.0, habit.name, habit.streak],
        )?;

        if rows_affected == 0 {
            return Err(Self::not_found("Habit", habit.id));
        }

        tracing::debug!("Updated habit {} for {}", habit.id, user);
        Ok(())
    }

    /// Delete a habit together with its completions
    fn delete_habit(&self, user: &UserId, id: HabitId) -> Result<(), StorageError> {
        self.conn.execute(
            "DELETE FROM habit_completions WHERE user_id = ?1 AND habit_id = ?2",
            params![user.as_str(), id.0],
        )?;
        let rows_affected = self.conn.execute(
            "DELETE FROM habits WHERE user_id = ?1 AND id = ?2",
            params![user.as_str(), id.0],
        )?;

        if rows_affected == 0 {
            return Err(Self::not_found("Habit", id));
        }

        tracing::debug!("Deleted habit {} for {}", id, user);
        Ok(())
    }

    /// Record a check-off; recording the same day twice is a no-op
    fn insert_completion(&self, user: &UserId, habit: HabitId, date: NaiveDate) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT OR IGNORE INTO habit_completions (user_id, habit_id, completed_on) VALUES (?1, ?2, ?3)",
            params![user.as_str(), habit.0, date],
        )?;
        Ok(())
    }

    /// Remove a check-off
    fn delete_completion(&self, user: &UserId, habit: HabitId, date: NaiveDate) -> Result<(), StorageError> {
        self.conn.execute(
            "DELETE FROM habit_completions WHERE user_id = ?1 AND habit_id = ?2 AND completed_on = ?3",
            params![user.as_str(), habit.0, date],
        )?;
        Ok(())
    }

    /// Read the stats row, decoding the JSON columns
    fn load_stats(&self, user: &UserId) -> Result<Option<UserStats>, StorageError> {
        let row = self
            .conn
            .query_row(
                "SELECT points, level, experience, tasks_completed, habits_completed,
                        focus_sessions_completed, longest_streak, streak, last_active,
                        achievements, challenges, rewards
                 FROM user_stats WHERE user_id = ?1",
                params![user.as_str()],
                |row| {
                    Ok((
                        (
                            row.get::<_, i64>(0)?,
                            row.get::<_, i64>(1)?,
                            row.get::<_, i64>(2)?,
                        ),
                        (
                            row.get::<_, u32>(3)?,
                            row.get::<_, u32>(4)?,
                            row.get::<_, u32>(5)?,
                            row.get::<_, u32>(6)?,
                            row.get::<_, u32>(7)?,
                        ),
                        row.get::<_, Option<NaiveDate>>(8)?,
                        (
                            row.get::<_, String>(9)?,
                            row.get::<_, String>(10)?,
                            row.get::<_, String>(11)?,
                        ),
                    ))
                },
            )
            .optional()?;

        let Some(((points, level, experience), counters, last_active, (achievements, challenges, rewards))) = row
        else {
            return Ok(None);
        };
        let (tasks_completed, habits_completed, focus_sessions_completed, longest_streak, streak) = counters;

        Ok(Some(UserStats {
            points,
            level,
            experience,
            experience_to_next_level: EXPERIENCE_PER_LEVEL,
            tasks_completed,
            habits_completed,
            focus_sessions_completed,
            longest_streak,
            streak,
            last_active,
            badges: Vec::new(),
            achievements: serde_json::from_str(&achievements)?,
            challenges: serde_json::from_str(&challenges)?,
            rewards: serde_json::from_str(&rewards)?,
        }))
    }

    /// Insert or replace the stats row
    fn save_stats(&self, user: &UserId, stats: &UserStats) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO user_stats (
                user_id, points, level, experience, tasks_completed, habits_completed,
                focus_sessions_completed, longest_streak, streak, last_active,
                achievements, challenges, rewards, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
            params![
                user.as_str(),
                stats.points,
                stats.level,
                stats.experience,
                stats.tasks_completed,
                stats.habits_completed,
                stats.focus_sessions_completed,
                stats.longest_streak,
                stats.streak,
                stats.last_active,
                serde_json::to_string(&stats.achievements)?,
                serde_json::to_string(&stats.challenges)?,
                serde_json::to_string(&stats.rewards)?,
                Utc::now().to_rfc3339()
            ],
        )?;

        tracing::debug!("Saved stats for {} ({} points)", user, stats.points);
        Ok(())
    }

    /// Badges seeded by the migrations, in id order
    fn badge_catalog(&self) -> Result<Vec<Badge>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, description, icon, requirement_type, requirement_count
             FROM badges ORDER BY id",
        )?;

        let badges = stmt
            .query_map([], |row| {
                let kind: String = row.get(4)?;
                Ok(Badge {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    description: row.get(2)?,
                    icon: row.get(3)?,
                    earned: false,
                    earned_at: None,
                    requirement: BadgeRequirement {
                        kind: kind.parse().map_err(|_| Self::text_error(4, "Invalid requirement type"))?,
                        count: row.get(5)?,
                    },
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(badges)
    }

    /// Badges the user has earned and when
    fn list_user_badges(&self, user: &UserId) -> Result<Vec<EarnedBadge>, StorageError> {
        let mut stmt = self
            .conn
            .prepare("SELECT badge_id, earned_at FROM user_badges WHERE user_id = ?1")?;

        let earned = stmt
            .query_map(params![user.as_str()], |row| {
                Ok(EarnedBadge {
                    badge_id: row.get(0)?,
                    earned_at: row.get::<_, DateTime<Utc>>(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(earned)
    }

    /// Record an earned badge; earning it again keeps the first timestamp
    fn insert_user_badge(&self, user: &UserId, earned: EarnedBadge) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT OR IGNORE INTO user_badges (user_id, badge_id, earned_at) VALUES (?1, ?2, ?3)",
            params![user.as_str(), earned.badge_id, earned.earned_at],
        )?;

        tracing::debug!("Recorded badge {} for {}", earned.badge_id, user);
        Ok(())
    }

    /// Read the user's settings row
    fn load_settings(&self, user: &UserId) -> Result<Option<AppSettings>, StorageError> {
        let settings = self
            .conn
            .query_row(
                "SELECT theme, notifications, focus_time, short_break, long_break
                 FROM user_settings WHERE user_id = ?1",
                params![user.as_str()],
                |row| {
                    let theme: String = row.get(0)?;
                    Ok(AppSettings {
                        theme: theme
                            .parse::<Theme>()
                            .map_err(|_| Self::text_error(0, "Invalid theme"))?,
                        notifications: row.get(1)?,
                        focus_time: row.get(2)?,
                        short_break: row.get(3)?,
                        long_break: row.get(4)?,
                    })
                },
            )
            .optional()?;
        Ok(settings)
    }

    /// Insert or replace the user's settings row
    fn save_settings(&self, user: &UserId, settings: &AppSettings) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO user_settings (user_id, theme, notifications, focus_time, short_break, long_break)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                user.as_str(),
                settings.theme.as_str(),
                settings.notifications,
                settings.focus_time,
                settings.short_break,
                settings.long_break
            ],
        )?;

        tracing::debug!("Saved settings for {}", user);
        Ok(())
    }
}
