/// In-memory persistence gateway
///
/// Serves the demo dataset when no database is configured and backs the
/// session tests. Clones share the same underlying maps, so a test can keep
/// a handle, flip the store offline and inspect what was mirrored.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Local, NaiveDate, Utc};

use crate::domain::{catalog, AppSettings, Badge, Habit, HabitId, Task, TaskId, UserId, UserStats};
use crate::storage::{EarnedBadge, ProductivityStorage, StorageError};

#[derive(Debug, Default)]
struct Tables {
    tasks: HashMap<UserId, Vec<Task>>,
    habits: HashMap<UserId, Vec<Habit>>,
    stats: HashMap<UserId, UserStats>,
    user_badges: HashMap<UserId, Vec<EarnedBadge>>,
    settings: HashMap<UserId, AppSettings>,
    badges: Vec<Badge>,
    offline: bool,
}

/// Mutex-guarded maps keyed by user
#[derive(Debug, Clone)]
pub struct MemoryStorage {
    tables: Arc<Mutex<Tables>>,
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStorage {
    /// Empty store with the default badge catalog
    pub fn new() -> Self {
        let tables = Tables {
            badges: catalog::default_badges(),
            ..Tables::default()
        };
        Self {
            tables: Arc::new(Mutex::new(tables)),
        }
    }

    /// Store pre-filled with the demo dataset for `user`
    pub fn demo(user: &UserId) -> Self {
        let now = Local::now();
        Self::demo_at(user, now.date_naive(), now.with_timezone(&Utc))
    }

    pub fn demo_at(user: &UserId, today: NaiveDate, now: DateTime<Utc>) -> Self {
        let storage = Self::new();
        let demo = catalog::demo_dataset(today, now);
        {
            let mut tables = storage.lock();
            let earned = demo
                .stats
                .badges
                .iter()
                .filter_map(|b| b.earned_at.map(|earned_at| EarnedBadge { badge_id: b.id, earned_at }))
                .collect();
            tables.user_badges.insert(user.clone(), earned);
            tables.tasks.insert(user.clone(), demo.tasks);
            tables.habits.insert(user.clone(), demo.habits);
            tables.stats.insert(
                user.clone(),
                UserStats {
                    badges: Vec::new(),
                    ..demo.stats
                },
            );
        }
        tracing::info!("Seeded demo dataset for {}", user);
        storage
    }

    /// Make every call fail with [`StorageError::Offline`] until switched back
    pub fn set_offline(&self, offline: bool) {
        self.lock().offline = offline;
    }

    fn lock(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn online(&self) -> Result<MutexGuard<'_, Tables>, StorageError> {
        let tables = self.lock();
        if tables.offline {
            return Err(StorageError::Offline);
        }
        Ok(tables)
    }
}

fn not_found(entity: &'static str, id: impl ToString) -> StorageError {
    StorageError::NotFound {
        entity,
        id: id.to_string(),
    }
}

impl ProductivityStorage for MemoryStorage {
    fn list_tasks(&self, user: &UserId) -> Result<Vec<Task>, StorageError> {
        Ok(self.online()?.tasks.get(user).cloned().unwrap_or_default())
    }

    fn insert_task(&self, user: &UserId, task: &Task) -> Result<(), StorageError> {
        self.online()?.tasks.entry(user.clone()).or_default().push(task.clone());
        Ok(())
    }

    fn update_task(&self, user: &UserId, task: &Task) -> Result<(), StorageError> {
        let mut tables = self.online()?;
        let slot = tables
            .tasks
            .get_mut(user)
            .and_then(|tasks| tasks.iter_mut().find(|t| t.id == task.id))
            .ok_or_else(|| not_found("Task", task.id))?;
        *slot = task.clone();
        Ok(())
    }

    fn delete_task(&self, user: &UserId, id: TaskId) -> Result<(), StorageError> {
        let mut tables = self.online()?;
        let tasks = tables.tasks.entry(user.clone()).or_default();
        let before = tasks.len();
        tasks.retain(|t| t.id != id);
        if tasks.len() == before {
            return Err(not_found("Task", id));
        }
        Ok(())
    }

    fn list_habits(&self, user: &UserId) -> Result<Vec<Habit>, StorageError> {
        Ok(self.online()?.habits.get(user).cloned().unwrap_or_default())
    }

    fn insert_habit(&self, user: &UserId, habit: &Habit) -> Result<(), StorageError> {
        self.online()?.habits.entry(user.clone()).or_default().push(habit.clone());
        Ok(())
    }

    fn update_habit(&self, user: &UserId, habit: &Habit) -> Result<(), StorageError> {
        let mut tables = self.online()?;
        let slot = tables
            .habits
            .get_mut(user)
            .and_then(|habits| habits.iter_mut().find(|h| h.id == habit.id))
            .ok_or_else(|| not_found("Habit", habit.id))?;
        // Completion rows are owned by insert/delete_completion
        slot.name = habit.name.clone();
        slot.streak = habit.streak;
        Ok(())
    }

    fn delete_habit(&self, user: &UserId, id: HabitId) -> Result<(), StorageError> {
        let mut tables = self.online()?;
        let habits = tables.habits.entry(user.clone()).or_default();
        let before = habits.len();
        habits.retain(|h| h.id != id);
        if habits.len() == before {
            return Err(not_found("Habit", id));
        }
        Ok(())
    }

    fn insert_completion(&self, user: &UserId, habit: HabitId, date: NaiveDate) -> Result<(), StorageError> {
        let mut tables = self.online()?;
        let slot = tables
            .habits
            .get_mut(user)
            .and_then(|habits| habits.iter_mut().find(|h| h.id == habit))
            .ok_or_else(|| not_found("Habit", habit))?;
        slot.completed_dates.insert(date);
        Ok(())
    }

    fn delete_completion(&self, user: &UserId, habit: HabitId, date: NaiveDate) -> Result<(), StorageError> {
        let mut tables = self.online()?;
        if let Some(slot) = tables
            .habits
            .get_mut(user)
            .and_then(|habits| habits.iter_mut().find(|h| h.id == habit))
        {
            slot.completed_dates.remove(&date);
        }
        Ok(())
    }

    fn load_stats(&self, user: &UserId) -> Result<Option<UserStats>, StorageError> {
        Ok(self.online()?.stats.get(user).cloned())
    }

    fn save_stats(&self, user: &UserId, stats: &UserStats) -> Result<(), StorageError> {
        let stored = UserStats {
            badges: Vec::new(),
            ..stats.clone()
        };
        self.online()?.stats.insert(user.clone(), stored);
        Ok(())
    }

    fn badge_catalog(&self) -> Result<Vec<Badge>, StorageError> {
        Ok(self.online()?.badges.clone())
    }

    fn list_user_badges(&self, user: &UserId) -> Result<Vec<EarnedBadge>, StorageError> {
        Ok(self.online()?.user_badges.get(user).cloned().unwrap_or_default())
    }

    fn insert_user_badge(&self, user: &UserId, earned: EarnedBadge) -> Result<(), StorageError> {
        let mut tables = self.online()?;
        let rows = tables.user_badges.entry(user.clone()).or_default();
        if !rows.iter().any(|r| r.badge_id == earned.badge_id) {
            rows.push(earned);
        }
        Ok(())
    }

    fn load_settings(&self, user: &UserId) -> Result<Option<AppSettings>, StorageError> {
        Ok(self.online()?.settings.get(user).cloned())
    }

    fn save_settings(&self, user: &UserId, settings: &AppSettings) -> Result<(), StorageError> {
        self.online()?.settings.insert(user.clone(), settings.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_seed() {
        let user = UserId::from("demo");
        let today = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();
        let storage = MemoryStorage::demo_at(&user, today, Utc::now());

        assert_eq!(storage.list_tasks(&user).unwrap().len(), 5);
        assert_eq!(storage.list_habits(&user).unwrap().len(), 3);
        assert_eq!(storage.load_stats(&user).unwrap().unwrap().points, 175);
        assert_eq!(storage.list_user_badges(&user).unwrap().len(), 2);
        assert!(storage.list_tasks(&UserId::from("other")).unwrap().is_empty());
    }

    #[test]
    fn test_offline_fails_every_call() {
        let storage = MemoryStorage::new();
        let user = UserId::from("u");
        let handle = storage.clone();
        handle.set_offline(true);

        assert!(matches!(storage.list_tasks(&user), Err(StorageError::Offline)));
        assert!(matches!(storage.badge_catalog(), Err(StorageError::Offline)));

        handle.set_offline(false);
        assert!(storage.list_tasks(&user).is_ok());
    }
}
