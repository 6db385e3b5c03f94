/// Database migration management
///
/// Creates and upgrades the SQLite schema. Version 1 holds per-user tasks,
/// habits with their completion days, stats, settings and earned badges,
/// plus the shared badge catalog.

use rusqlite::{params, Connection};

use crate::domain::catalog;
use crate::storage::StorageError;

/// Current database schema version
const CURRENT_VERSION: i32 = 1;

/// Initialize the database schema, running any pending migrations
pub fn initialize_database(conn: &Connection) -> Result<(), StorageError> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY
        )",
        [],
    )?;

    let current_version = get_current_version(conn)?;

    if current_version < CURRENT_VERSION {
        run_migrations(conn, current_version)?;
        set_version(conn, CURRENT_VERSION)?;
    }

    Ok(())
}

fn get_current_version(conn: &Connection) -> Result<i32, StorageError> {
    match conn.query_row("SELECT version FROM schema_version LIMIT 1", [], |row| row.get::<_, i32>(0)) {
        Ok(version) => Ok(version),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(0),
        Err(e) => Err(StorageError::Migration(format!("Failed to read schema version: {}", e))),
    }
}

fn set_version(conn: &Connection, version: i32) -> Result<(), StorageError> {
    conn.execute("DELETE FROM schema_version", [])?;
    conn.execute("INSERT INTO schema_version (version) VALUES (?1)", [version])?;
    Ok(())
}

fn run_migrations(conn: &Connection, from_version: i32) -> Result<(), StorageError> {
    if from_version < 1 {
        migration_v1(conn)?;
    }
    Ok(())
}

/// Migration to version 1: initial tables and the badge catalog
fn migration_v1(conn: &Connection) -> Result<(), StorageError> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS tasks (
            user_id TEXT NOT NULL,
            id INTEGER NOT NULL,
            text TEXT NOT NULL,
            completed BOOLEAN NOT NULL DEFAULT FALSE,
            due_date TEXT,
            priority TEXT,
            notes TEXT,
            category TEXT,
            PRIMARY KEY (user_id, id)
        );

        CREATE TABLE IF NOT EXISTS habits (
            user_id TEXT NOT NULL,
            id INTEGER NOT NULL,
            name TEXT NOT NULL,
            streak INTEGER NOT NULL DEFAULT 0,
            PRIMARY KEY (user_id, id)
        );

        CREATE TABLE IF NOT EXISTS habit_completions (
            user_id TEXT NOT NULL,
            habit_id INTEGER NOT NULL,
            completed_on TEXT NOT NULL,
            PRIMARY KEY (user_id, habit_id, completed_on)
        );

        CREATE TABLE IF NOT EXISTS user_stats (
            user_id TEXT PRIMARY KEY,
            points INTEGER NOT NULL DEFAULT 0,
            level INTEGER NOT NULL DEFAULT 1,
            experience INTEGER NOT NULL DEFAULT 0,
            tasks_completed INTEGER NOT NULL DEFAULT 0,
            habits_completed INTEGER NOT NULL DEFAULT 0,
            focus_sessions_completed INTEGER NOT NULL DEFAULT 0,
            longest_streak INTEGER NOT NULL DEFAULT 0,
            streak INTEGER NOT NULL DEFAULT 0,
            last_active TEXT,
            achievements TEXT NOT NULL,
            challenges TEXT NOT NULL,
            rewards TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS badges (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            description TEXT NOT NULL,
            icon TEXT NOT NULL,
            requirement_type TEXT NOT NULL,
            requirement_count INTEGER NOT NULL
        );

        CREATE TABLE IF NOT EXISTS user_badges (
            user_id TEXT NOT NULL,
            badge_id INTEGER NOT NULL,
            earned_at TEXT NOT NULL,
            PRIMARY KEY (user_id, badge_id),
            FOREIGN KEY (badge_id) REFERENCES badges (id)
        );

        CREATE TABLE IF NOT EXISTS user_settings (
            user_id TEXT PRIMARY KEY,
            theme TEXT NOT NULL,
            notifications BOOLEAN NOT NULL,
            focus_time INTEGER NOT NULL,
            short_break INTEGER NOT NULL,
            long_break INTEGER NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_habit_completions_habit
            ON habit_completions (user_id, habit_id);",
    )?;

    seed_badges(conn)?;

    tracing::info!("Applied migration v1: Created initial database schema");
    Ok(())
}

fn seed_badges(conn: &Connection) -> Result<(), StorageError> {
    for badge in catalog::default_badges() {
        conn.execute(
            "INSERT OR IGNORE INTO badges (id, name, description, icon, requirement_type, requirement_count)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                badge.id,
                badge.name,
                badge.description,
                badge.icon,
                badge.requirement.kind.as_str(),
                badge.requirement.count
            ],
        )?;
    }
    tracing::debug!("Seeded badge catalog");
    Ok(())
}
