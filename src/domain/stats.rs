/// Aggregate user statistics and the gamification records hanging off them
///
/// `UserStats` is derived state: every counter here is moved by a mutator,
/// and `level`/`experience` are only ever written by the points engine.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{AchievementCategory, Metric, RequirementKind};

/// Points needed to go from one level to the next
pub const EXPERIENCE_PER_LEVEL: i64 = 100;

/// Lifetime totals and gamification state for one user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserStats {
    /// Lifetime points; debited by un-completions and reward claims
    pub points: i64,
    pub level: i64,
    pub experience: i64,
    pub experience_to_next_level: i64,
    pub tasks_completed: u32,
    pub habits_completed: u32,
    pub focus_sessions_completed: u32,
    /// Largest habit streak ever observed
    pub longest_streak: u32,
    /// Largest current habit streak
    pub streak: u32,
    pub last_active: Option<NaiveDate>,
    pub badges: Vec<Badge>,
    pub achievements: Vec<Achievement>,
    pub challenges: Vec<Challenge>,
    pub rewards: Vec<Reward>,
}

impl Default for UserStats {
    fn default() -> Self {
        Self {
            points: 0,
            level: 1,
            experience: 0,
            experience_to_next_level: EXPERIENCE_PER_LEVEL,
            tasks_completed: 0,
            habits_completed: 0,
            focus_sessions_completed: 0,
            longest_streak: 0,
            streak: 0,
            last_active: None,
            badges: Vec::new(),
            achievements: Vec::new(),
            challenges: Vec::new(),
            rewards: Vec::new(),
        }
    }
}

impl UserStats {
    /// Value of the counter a badge requirement refers to
    pub fn counter(&self, kind: RequirementKind) -> i64 {
        match kind {
            RequirementKind::Tasks => i64::from(self.tasks_completed),
            RequirementKind::Habits => i64::from(self.longest_streak),
            RequirementKind::Focus => i64::from(self.focus_sessions_completed),
            RequirementKind::Level => self.level,
        }
    }

    pub fn achievement(&self, id: i64) -> Option<&Achievement> {
        self.achievements.iter().find(|a| a.id == id)
    }

    pub fn challenge(&self, id: i64) -> Option<&Challenge> {
        self.challenges.iter().find(|c| c.id == id)
    }

    pub fn reward(&self, id: i64) -> Option<&Reward> {
        self.rewards.iter().find(|r| r.id == id)
    }

    pub fn badge(&self, id: i64) -> Option<&Badge> {
        self.badges.iter().find(|b| b.id == id)
    }
}

/// Threshold a badge is earned at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BadgeRequirement {
    /// Which counter is compared
    pub kind: RequirementKind,
    /// Value the counter must reach
    pub count: i64,
}

/// A catalog badge plus whether this user has earned it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Badge {
    pub id: i64,
    pub name: String,
    pub description: String,
    /// Icon name for the client (e.g., "award")
    pub icon: String,
    /// One-way: never reset once true
    pub earned: bool,
    /// When the badge was first earned
    pub earned_at: Option<DateTime<Utc>>,
    pub requirement: BadgeRequirement,
}

impl Badge {
    pub fn is_satisfied_by(&self, stats: &UserStats) -> bool {
        stats.counter(self.requirement.kind) >= self.requirement.count
    }
}

/// A progress-tracked goal that pays out points when claimed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Achievement {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub category: AchievementCategory,
    /// Counter that moves the progress
    pub metric: Metric,
    /// 0..=max_progress
    pub progress: u32,
    pub max_progress: u32,
    /// Derived: `progress >= max_progress`
    pub completed: bool,
    /// Stamped by the claim action, not by completion
    pub completed_at: Option<DateTime<Utc>>,
    /// Points paid on claim
    pub reward: i64,
}

impl Achievement {
    /// Set progress, clamped to `0..=max_progress`, and re-derive `completed`
    pub fn set_progress(&mut self, progress: u32) {
        self.progress = progress.min(self.max_progress);
        self.completed = self.progress >= self.max_progress;
    }

    pub fn is_claimed(&self) -> bool {
        self.completed_at.is_some()
    }

    pub fn is_claimable(&self) -> bool {
        self.completed && !self.is_claimed()
    }
}

/// A time-boxed goal the user can join and claim once completed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Challenge {
    pub id: i64,
    pub name: String,
    pub description: String,
    /// First day the challenge counts progress
    pub start_date: NaiveDate,
    /// Last day, inclusive
    pub end_date: NaiveDate,
    /// Counter that moves the progress
    pub metric: Metric,
    pub goal: u32,
    /// 0..=goal; only moves while the challenge is active
    pub progress: u32,
    /// Derived: `progress >= goal`
    pub completed: bool,
    /// Whether the user signed up; counts toward the plan's challenge limit
    #[serde(default)]
    pub joined: bool,
    /// One-way; a claimed challenge no longer moves
    #[serde(default)]
    pub claimed: bool,
    /// Points paid on claim
    pub reward: i64,
}

impl Challenge {
    /// Whether `today` falls inside `[start_date, end_date]`
    pub fn is_active(&self, today: NaiveDate) -> bool {
        self.start_date <= today && today <= self.end_date
    }

    /// Set progress, clamped to `0..=goal`, and re-derive `completed`
    pub fn set_progress(&mut self, progress: u32) {
        self.progress = progress.min(self.goal);
        self.completed = self.progress >= self.goal;
    }

    pub fn days_left(&self, today: NaiveDate) -> i64 {
        (self.end_date - today).num_days().max(0)
    }
}

/// Something the user can spend points on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reward {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub icon: String,
    /// Points debited on claim
    pub cost: i64,
    /// Controlled outside this core
    pub unlocked: bool,
    /// One-way
    pub claimed: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn achievement(max: u32) -> Achievement {
        Achievement {
            id: 1,
            name: "Task Master".to_string(),
            description: "Complete 10 tasks".to_string(),
            icon: "check".to_string(),
            category: AchievementCategory::Milestone,
            metric: Metric::TasksCompleted,
            progress: 0,
            max_progress: max,
            completed: false,
            completed_at: None,
            reward: 50,
        }
    }

    #[test]
    fn test_achievement_progress_is_clamped() {
        let mut a = achievement(3);
        a.set_progress(5);
        assert_eq!(a.progress, 3);
        assert!(a.completed);
        a.set_progress(2);
        assert!(!a.completed);
    }

    #[test]
    fn test_challenge_window() {
        let challenge = Challenge {
            id: 1,
            name: "Sprint".to_string(),
            description: String::new(),
            start_date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2025, 6, 30).unwrap(),
            metric: Metric::TasksCompleted,
            goal: 30,
            progress: 0,
            completed: false,
            joined: false,
            claimed: false,
            reward: 300,
        };
        assert!(challenge.is_active(NaiveDate::from_ymd_opt(2025, 6, 30).unwrap()));
        assert!(!challenge.is_active(NaiveDate::from_ymd_opt(2025, 7, 1).unwrap()));
        assert_eq!(challenge.days_left(NaiveDate::from_ymd_opt(2025, 6, 20).unwrap()), 10);
    }

    #[test]
    fn test_badge_counter_for_habits_uses_longest_streak() {
        let stats = UserStats {
            longest_streak: 7,
            streak: 2,
            ..UserStats::default()
        };
        assert_eq!(stats.counter(RequirementKind::Habits), 7);
    }
}
