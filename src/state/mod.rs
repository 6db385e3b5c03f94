/// Application state and the pure transitions over it
///
/// Every mutator takes the current [`AppState`] by reference and returns a
/// [`Transition`]: the complete next state, the notifications to show and
/// the writes to mirror to storage. Nothing here touches storage or the
/// clock; the session swaps the new state in with a single assignment.

pub mod focus;
pub mod habits;
pub mod rewards;
pub mod settings;
pub mod tasks;

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime, Utc};

use crate::domain::{
    AppSettings, Habit, HabitId, Metric, Task, TaskId, TimerState, UserStats,
};
use crate::engine::{evaluator, points, Notification};

/// Everything one signed-in user sees and edits
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppState {
    pub tasks: Vec<Task>,
    pub habits: Vec<Habit>,
    pub stats: UserStats,
    pub settings: AppSettings,
    pub timer: TimerState,
}

impl AppState {
    /// State for a freshly loaded user, with an idle timer seeded from settings
    pub fn new(tasks: Vec<Task>, habits: Vec<Habit>, stats: UserStats, settings: AppSettings) -> Self {
        let timer = TimerState::initial(&settings);
        Self {
            tasks,
            habits,
            stats,
            settings,
            timer,
        }
    }

    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn habit(&self, id: HabitId) -> Option<&Habit> {
        self.habits.iter().find(|h| h.id == id)
    }

    /// Sum of point values over completed tasks
    pub fn completed_task_points(&self) -> i64 {
        self.tasks.iter().filter(|t| t.completed).map(Task::points).sum()
    }
}

/// The instant a mutation happens, in the two forms the rules need
///
/// Day-based rules (habit toggles, challenge windows) use the local
/// calendar date; stamps such as `earned_at` use UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Moment {
    pub today: NaiveDate,
    pub local_time: NaiveTime,
    pub utc: DateTime<Utc>,
}

impl Moment {
    pub fn from_local(at: DateTime<Local>) -> Self {
        Self {
            today: at.date_naive(),
            local_time: at.time(),
            utc: at.with_timezone(&Utc),
        }
    }

    /// Moment for a wall-clock reading, treating it as UTC for stamps
    pub fn at(local: NaiveDateTime) -> Self {
        Self {
            today: local.date(),
            local_time: local.time(),
            utc: local.and_utc(),
        }
    }
}

/// A change to mirror to the persistence gateway
#[derive(Debug, Clone, PartialEq)]
pub enum Write {
    InsertTask(Task),
    UpdateTask(Task),
    DeleteTask(TaskId),
    InsertHabit(Habit),
    UpdateHabit(Habit),
    DeleteHabit(HabitId),
    InsertCompletion { habit_id: HabitId, date: NaiveDate },
    DeleteCompletion { habit_id: HabitId, date: NaiveDate },
    Stats(UserStats),
    EarnBadge { badge_id: i64, earned_at: DateTime<Utc> },
    Settings(AppSettings),
}

/// Result of a mutator: next state plus its side effects
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub state: AppState,
    pub notifications: Vec<Notification>,
    pub writes: Vec<Write>,
}

/// In-progress transition
///
/// Mutators clone the current state into a `Change`, edit it through the
/// helpers below, then `settle` it, which runs the badge scan and appends
/// the stats write when anything in the stats moved.
pub(crate) struct Change {
    state: AppState,
    notifications: Vec<Notification>,
    writes: Vec<Write>,
    stats_dirty: bool,
}

impl Change {
    pub(crate) fn begin(state: &AppState) -> Self {
        Self {
            state: state.clone(),
            notifications: Vec::new(),
            writes: Vec::new(),
            stats_dirty: false,
        }
    }

    pub(crate) fn state(&mut self) -> &mut AppState {
        &mut self.state
    }

    /// Mutable stats; marks them for the stats write
    pub(crate) fn stats(&mut self) -> &mut UserStats {
        self.stats_dirty = true;
        &mut self.state.stats
    }

    pub(crate) fn notify(&mut self, notification: Notification) {
        self.notifications.push(notification);
    }

    pub(crate) fn write(&mut self, write: Write) {
        self.writes.push(write);
    }

    /// Route a point delta through the points engine
    pub(crate) fn credit(&mut self, delta: i64) {
        if let Some(level_up) = points::apply_points(self.stats(), delta) {
            self.notify(level_up.into());
        }
    }

    pub(crate) fn advance(&mut self, metric: Metric, today: NaiveDate, by: u32) {
        let achievements = evaluator::advance_achievements(self.stats(), metric, by);
        let challenges = evaluator::advance_challenges(self.stats(), metric, today, by);
        self.announce(achievements, challenges);
    }

    pub(crate) fn regress(&mut self, metric: Metric, today: NaiveDate, by: u32) {
        evaluator::regress_achievements(self.stats(), metric, by);
        evaluator::regress_challenges(self.stats(), metric, today, by);
    }

    pub(crate) fn announce(
        &mut self,
        achievements: Vec<crate::domain::Achievement>,
        challenges: Vec<crate::domain::Challenge>,
    ) {
        for a in achievements {
            self.notify(Notification::AchievementCompleted {
                achievement_id: a.id,
                name: a.name,
            });
        }
        for c in challenges {
            self.notify(Notification::ChallengeCompleted {
                challenge_id: c.id,
                name: c.name,
            });
        }
    }

    /// Recompute the current streak as the largest streak across habits
    pub(crate) fn refresh_streak(&mut self) {
        let current = self.state.habits.iter().map(|h| h.streak).max().unwrap_or(0);
        self.stats().streak = current;
    }

    pub(crate) fn settle(mut self, at: Moment) -> Transition {
        if self.stats_dirty {
            self.state.stats.last_active = Some(at.today);
            for badge in evaluator::evaluate_badges(&mut self.state.stats, at.utc) {
                self.writes.push(Write::EarnBadge {
                    badge_id: badge.id,
                    earned_at: at.utc,
                });
                self.notifications.push(Notification::BadgeEarned {
                    badge_id: badge.id,
                    name: badge.name,
                });
            }
            self.writes.push(Write::Stats(self.state.stats.clone()));
        }

        Transition {
            state: self.state,
            notifications: self.notifications,
            writes: self.writes,
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use chrono::NaiveDate;

    use super::*;
    use crate::domain::catalog;

    pub fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, d).unwrap()
    }

    pub fn at(d: u32, hour: u32) -> Moment {
        Moment::at(day(d).and_hms_opt(hour, 0, 0).unwrap())
    }

    pub fn empty_state() -> AppState {
        AppState::new(Vec::new(), Vec::new(), catalog::starter_stats(day(15)), AppSettings::default())
    }
}
