/// The signed-in session
///
/// A [`Session`] owns the current user, their [`AppState`], the storage
/// gateway and the notification outbox. Every operation computes a
/// transition from the current state, swaps the new state in, then mirrors
/// the transition's writes to storage. A failed mirror write is logged and
/// surfaced as an error notification; local state is not rolled back.
///
/// While nobody is signed in every operation is a no-op.

use std::sync::{Arc, Mutex};

use chrono::{Duration, Local, NaiveDateTime};

use crate::domain::{catalog, AppSettings, DomainError, HabitId, TaskDraft, TaskId, TimerMode, UserId};
use crate::engine::Notification;
use crate::quota::{Feature, Plan, QuotaExceeded};
use crate::state::{self, focus, habits, rewards, tasks, AppState, Moment, Transition, Write};
use crate::storage::{assemble_badges, EarnedBadge, ProductivityStorage, StorageError};

/// Source of the current instant
pub trait Clock: Send {
    fn now(&self) -> Moment;
}

/// Wall clock in the local time zone
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Moment {
        Moment::from_local(Local::now())
    }
}

/// Settable clock for tests and replays; clones share the same reading
#[derive(Debug, Clone)]
pub struct FixedClock {
    at: Arc<Mutex<NaiveDateTime>>,
}

impl FixedClock {
    pub fn new(at: NaiveDateTime) -> Self {
        Self {
            at: Arc::new(Mutex::new(at)),
        }
    }

    pub fn set(&self, at: NaiveDateTime) {
        *self.at.lock().unwrap_or_else(|p| p.into_inner()) = at;
    }

    pub fn advance(&self, by: Duration) {
        let mut at = self.at.lock().unwrap_or_else(|p| p.into_inner());
        *at += by;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> Moment {
        Moment::at(*self.at.lock().unwrap_or_else(|p| p.into_inner()))
    }
}

pub struct Session {
    storage: Box<dyn ProductivityStorage + Send>,
    clock: Box<dyn Clock>,
    plan: Plan,
    user: Option<UserId>,
    state: AppState,
    outbox: Vec<Notification>,
}

impl Session {
    pub fn new(storage: impl ProductivityStorage + Send + 'static, clock: impl Clock + 'static, plan: Plan) -> Self {
        Self {
            storage: Box::new(storage),
            clock: Box::new(clock),
            plan,
            user: None,
            state: AppState::default(),
            outbox: Vec::new(),
        }
    }

    /// Load `user`'s data, creating starter stats and default settings on first use
    pub fn sign_in(&mut self, user: UserId) -> Result<(), StorageError> {
        let at = self.clock.now();

        let tasks = self.storage.list_tasks(&user)?;
        let habits = self.storage.list_habits(&user)?;

        let mut stats = match self.storage.load_stats(&user)? {
            Some(stats) => stats,
            None => {
                tracing::info!("First sign-in for {}, creating starter stats", user);
                let stats = catalog::starter_stats(at.today);
                self.storage.save_stats(&user, &stats)?;
                stats
            }
        };
        let earned = self.storage.list_user_badges(&user)?;
        stats.badges = assemble_badges(self.storage.badge_catalog()?, &earned);

        let settings = match self.storage.load_settings(&user)? {
            Some(settings) => settings,
            None => {
                let settings = AppSettings::default();
                self.storage.save_settings(&user, &settings)?;
                settings
            }
        };

        tracing::info!(
            "Signed in {}: {} tasks, {} habits, {} points",
            user,
            tasks.len(),
            habits.len(),
            stats.points
        );
        self.state = AppState::new(tasks, habits, stats, settings);
        self.user = Some(user);
        self.outbox.clear();
        Ok(())
    }

    /// Drop the user and everything loaded for them
    pub fn sign_out(&mut self) {
        if let Some(user) = self.user.take() {
            tracing::info!("Signed out {}", user);
        }
        self.state = AppState::default();
        self.outbox.clear();
    }

    pub fn user(&self) -> Option<&UserId> {
        self.user.as_ref()
    }

    pub fn is_signed_in(&self) -> bool {
        self.user.is_some()
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn plan(&self) -> Plan {
        self.plan
    }

    pub fn now(&self) -> Moment {
        self.clock.now()
    }

    /// Whether the plan still allows one more use of `feature`
    pub fn check_quota(&self, feature: Feature) -> Result<(), QuotaExceeded> {
        let current = match feature {
            Feature::Tasks => self.state.tasks.len(),
            Feature::Habits => self.state.habits.len(),
            Feature::FocusSessions => self.state.timer.session_count as usize,
            Feature::Challenges => self
                .state
                .stats
                .challenges
                .iter()
                .filter(|c| c.joined && !c.claimed)
                .count(),
            Feature::AiAssistant | Feature::CustomThemes => 0,
        };

        if self.plan.has_reached_limit(feature, current) {
            tracing::debug!("Quota reached for {:?} at {}", feature, current);
            return Err(QuotaExceeded {
                feature,
                plan: self.plan,
            });
        }
        Ok(())
    }

    /// Take every notification queued since the last drain
    pub fn drain_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.outbox)
    }

    pub fn add_task(&mut self, draft: TaskDraft) -> Result<Option<TaskId>, DomainError> {
        let Some(at) = self.moment() else { return Ok(None) };
        let transition = tasks::add_task(&self.state, draft, at)?;
        let id = transition.state.tasks.last().map(|t| t.id);
        self.apply(transition);
        Ok(id)
    }

    pub fn toggle_task(&mut self, id: TaskId) -> bool {
        self.run(|state, at| tasks::toggle_task(state, id, at))
    }

    pub fn edit_task(&mut self, id: TaskId, draft: TaskDraft) -> Result<bool, DomainError> {
        let Some(at) = self.moment() else { return Ok(false) };
        match tasks::edit_task(&self.state, id, draft, at)? {
            Some(transition) => {
                self.apply(transition);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn delete_task(&mut self, id: TaskId) -> bool {
        self.run(|state, at| tasks::delete_task(state, id, at))
    }

    pub fn add_habit(&mut self, name: &str) -> Result<Option<HabitId>, DomainError> {
        let Some(at) = self.moment() else { return Ok(None) };
        let transition = habits::add_habit(&self.state, name, at)?;
        let id = transition.state.habits.last().map(|h| h.id);
        self.apply(transition);
        Ok(id)
    }

    pub fn toggle_habit(&mut self, id: HabitId) -> bool {
        self.run(|state, at| habits::toggle_habit(state, id, at))
    }

    pub fn delete_habit(&mut self, id: HabitId) -> bool {
        self.run(|state, at| habits::delete_habit(state, id, at))
    }

    /// Apply one timer tick; false while paused or signed out
    pub fn tick(&mut self) -> bool {
        self.run(focus::tick)
    }

    pub fn toggle_timer(&mut self) -> bool {
        self.run(|state, at| Some(focus::toggle(state, at)))
    }

    pub fn start_timer(&mut self) -> bool {
        self.run(|state, at| Some(focus::start(state, at)))
    }

    pub fn pause_timer(&mut self) -> bool {
        self.run(|state, at| Some(focus::pause(state, at)))
    }

    pub fn reset_timer(&mut self) -> bool {
        self.run(|state, at| Some(focus::reset(state, at)))
    }

    pub fn switch_mode(&mut self, mode: TimerMode) -> bool {
        self.run(|state, at| Some(focus::switch_mode(state, mode, at)))
    }

    pub fn toggle_sound(&mut self) -> bool {
        self.run(|state, at| Some(focus::toggle_sound(state, at)))
    }

    /// True when the claim paid out; refusals only queue a warning
    pub fn claim_achievement(&mut self, id: i64) -> bool {
        self.run_claim(|state, at| rewards::claim_achievement(state, id, at))
    }

    pub fn join_challenge(&mut self, id: i64) -> bool {
        self.run_claim(|state, at| rewards::join_challenge(state, id, at))
    }

    pub fn claim_challenge(&mut self, id: i64) -> bool {
        self.run_claim(|state, at| rewards::claim_challenge(state, id, at))
    }

    pub fn claim_reward(&mut self, id: i64) -> bool {
        self.run_claim(|state, at| rewards::claim_reward(state, id, at))
    }

    pub fn update_settings(&mut self, settings: AppSettings) -> Result<bool, DomainError> {
        let Some(at) = self.moment() else { return Ok(false) };
        let transition = state::settings::update_settings(&self.state, settings, at)?;
        self.apply(transition);
        Ok(true)
    }

    fn moment(&self) -> Option<Moment> {
        self.user.as_ref().map(|_| self.clock.now())
    }

    fn run(&mut self, mutate: impl FnOnce(&AppState, Moment) -> Option<Transition>) -> bool {
        let Some(at) = self.moment() else { return false };
        match mutate(&self.state, at) {
            Some(transition) => {
                self.apply(transition);
                true
            }
            None => false,
        }
    }

    fn run_claim(&mut self, mutate: impl FnOnce(&AppState, Moment) -> Option<Transition>) -> bool {
        let Some(at) = self.moment() else { return false };
        match mutate(&self.state, at) {
            Some(transition) => {
                let changed = !transition.writes.is_empty();
                self.apply(transition);
                changed
            }
            None => false,
        }
    }

    /// Swap the new state in, queue its notifications, then mirror its writes
    fn apply(&mut self, transition: Transition) {
        let Transition {
            state,
            notifications,
            writes,
        } = transition;

        self.state = state;
        self.outbox.extend(notifications);

        let Some(user) = self.user.clone() else { return };
        let mut failures = 0;
        for write in &writes {
            if let Err(e) = self.mirror(&user, write) {
                tracing::error!("Failed to persist change for {}: {}", user, e);
                failures += 1;
            }
        }

        if failures > 0 {
            self.outbox.push(Notification::error(format!(
                "Could not save {} of {} changes; they are kept locally",
                failures,
                writes.len()
            )));
        }
    }

    fn mirror(&self, user: &UserId, write: &Write) -> Result<(), StorageError> {
        let storage = &self.storage;
        match write {
            Write::InsertTask(task) => storage.insert_task(user, task),
            Write::UpdateTask(task) => storage.update_task(user, task),
            Write::DeleteTask(id) => storage.delete_task(user, *id),
            Write::InsertHabit(habit) => storage.insert_habit(user, habit),
            Write::UpdateHabit(habit) => storage.update_habit(user, habit),
            Write::DeleteHabit(id) => storage.delete_habit(user, *id),
            Write::InsertCompletion { habit_id, date } => storage.insert_completion(user, *habit_id, *date),
            Write::DeleteCompletion { habit_id, date } => storage.delete_completion(user, *habit_id, *date),
            Write::Stats(stats) => storage.save_stats(user, stats),
            Write::EarnBadge { badge_id, earned_at } => storage.insert_user_badge(
                user,
                EarnedBadge {
                    badge_id: *badge_id,
                    earned_at: *earned_at,
                },
            ),
            Write::Settings(settings) => storage.save_settings(user, settings),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Priority;
    use crate::storage::MemoryStorage;
    use chrono::NaiveDate;

    fn clock() -> FixedClock {
        FixedClock::new(
            NaiveDate::from_ymd_opt(2025, 6, 15)
                .unwrap()
                .and_hms_opt(10, 0, 0)
                .unwrap(),
        )
    }

    fn signed_in(storage: &MemoryStorage, plan: Plan) -> Session {
        let mut session = Session::new(storage.clone(), clock(), plan);
        session.sign_in(UserId::from("alice")).unwrap();
        session
    }

    #[test]
    fn test_signed_out_session_is_inert() {
        let mut session = Session::new(MemoryStorage::new(), clock(), Plan::Free);
        assert_eq!(session.add_task(TaskDraft::new("x")).unwrap(), None);
        assert!(!session.toggle_task(TaskId(1)));
        assert!(!session.toggle_timer());
        assert!(session.state().tasks.is_empty());
    }

    #[test]
    fn test_first_sign_in_creates_defaults() {
        let storage = MemoryStorage::new();
        let session = signed_in(&storage, Plan::Free);
        let user = UserId::from("alice");

        assert_eq!(session.state().stats.badges.len(), 5);
        assert_eq!(session.state().timer.display(), "25:00");
        assert!(storage.load_stats(&user).unwrap().is_some());
        assert_eq!(storage.load_settings(&user).unwrap(), Some(AppSettings::default()));
    }

    #[test]
    fn test_changes_are_mirrored() {
        let storage = MemoryStorage::new();
        let mut session = signed_in(&storage, Plan::Free);
        let user = UserId::from("alice");

        let id = session
            .add_task(TaskDraft::new("Write report").priority(Priority::High))
            .unwrap()
            .unwrap();
        assert!(session.toggle_task(id));

        let stored = storage.list_tasks(&user).unwrap();
        assert!(stored[0].completed);
        assert_eq!(storage.load_stats(&user).unwrap().unwrap().points, 20);
        assert_eq!(storage.list_user_badges(&user).unwrap().len(), 1);
    }

    #[test]
    fn test_failed_mirror_keeps_local_state() {
        let storage = MemoryStorage::new();
        let mut session = signed_in(&storage, Plan::Free);
        storage.set_offline(true);

        let id = session.add_task(TaskDraft::new("Offline task")).unwrap();
        assert!(id.is_some());
        assert_eq!(session.state().tasks.len(), 1);

        let notes = session.drain_notifications();
        assert!(notes.iter().any(|n| matches!(n, Notification::Error { .. })));
        assert!(session.drain_notifications().is_empty());
    }

    #[test]
    fn test_quota_checks() {
        let storage = MemoryStorage::new();
        let mut free = signed_in(&storage, Plan::Free);
        for i in 0..5 {
            free.check_quota(Feature::Habits).unwrap();
            free.add_habit(&format!("Habit {}", i)).unwrap();
        }
        assert!(free.check_quota(Feature::Habits).is_err());
        assert!(free.check_quota(Feature::AiAssistant).is_err());

        let pro = signed_in(&MemoryStorage::new(), Plan::Pro);
        assert!(pro.check_quota(Feature::AiAssistant).is_ok());
    }

    #[test]
    fn test_sign_out_clears_state() {
        let storage = MemoryStorage::new();
        let mut session = signed_in(&storage, Plan::Free);
        session.add_task(TaskDraft::new("Keep me")).unwrap();
        session.sign_out();

        assert!(!session.is_signed_in());
        assert!(session.state().tasks.is_empty());

        session.sign_in(UserId::from("alice")).unwrap();
        assert_eq!(session.state().tasks.len(), 1);
    }
}
