/// Static catalogs and the demo dataset
///
/// New users start from these badge, achievement, challenge and reward
/// lists. The demo dataset is what the in-memory gateway serves when no
/// database is configured.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};

use crate::domain::{
    Achievement, AchievementCategory, Badge, BadgeRequirement, Challenge, Habit, HabitId, Metric,
    Priority, RequirementKind, Reward, Task, TaskId, UserStats,
};
use crate::engine::points;

pub const TASK_MASTER: i64 = 1;
pub const HABIT_FORMER: i64 = 2;
pub const FOCUS_CHAMPION: i64 = 3;
pub const EARLY_BIRD: i64 = 4;
pub const PRODUCTIVITY_GURU: i64 = 5;

/// Reward that opens the dark theme to free-plan users
pub const DARK_THEME_REWARD: i64 = 1;

fn badge(id: i64, name: &str, description: &str, icon: &str, kind: RequirementKind, count: i64) -> Badge {
    Badge {
        id,
        name: name.to_string(),
        description: description.to_string(),
        icon: icon.to_string(),
        earned: false,
        earned_at: None,
        requirement: BadgeRequirement { kind, count },
    }
}

/// Badge catalog, none earned
pub fn default_badges() -> Vec<Badge> {
    vec![
        badge(1, "First Step", "Complete your first task", "check-circle", RequirementKind::Tasks, 1),
        badge(2, "On a Roll", "Complete 5 tasks", "zap", RequirementKind::Tasks, 5),
        badge(3, "Habit Master", "Maintain a 7-day habit streak", "award", RequirementKind::Habits, 7),
        badge(4, "Focus Champion", "Complete 10 focus sessions", "clock", RequirementKind::Focus, 10),
        badge(5, "Productivity Guru", "Reach level 5", "star", RequirementKind::Level, 5),
    ]
}

#[allow(clippy::too_many_arguments)]
fn achievement(
    id: i64,
    name: &str,
    description: &str,
    icon: &str,
    category: AchievementCategory,
    metric: Metric,
    max_progress: u32,
    reward: i64,
) -> Achievement {
    Achievement {
        id,
        name: name.to_string(),
        description: description.to_string(),
        icon: icon.to_string(),
        category,
        metric,
        progress: 0,
        max_progress,
        completed: false,
        completed_at: None,
        reward,
    }
}

/// Achievement catalog with zero progress
pub fn default_achievements() -> Vec<Achievement> {
    use AchievementCategory::*;
    vec![
        achievement(TASK_MASTER, "Task Master", "Complete 10 tasks", "check", Milestone, Metric::TasksCompleted, 10, 50),
        achievement(HABIT_FORMER, "Habit Former", "Maintain a 7-day streak", "award", Milestone, Metric::HabitStreak, 7, 100),
        achievement(FOCUS_CHAMPION, "Focus Champion", "Complete 5 focus sessions", "clock", Milestone, Metric::FocusSessions, 5, 75),
        achievement(EARLY_BIRD, "Early Bird", "Complete a task before 9 AM", "star", Daily, Metric::EarlyTask, 1, 25),
        achievement(PRODUCTIVITY_GURU, "Productivity Guru", "Complete all daily habits for a week", "trophy", Weekly, Metric::Manual, 7, 150),
    ]
}

fn challenge(
    id: i64,
    name: &str,
    description: &str,
    window: (NaiveDate, NaiveDate),
    metric: Metric,
    goal: u32,
    reward: i64,
) -> Challenge {
    Challenge {
        id,
        name: name.to_string(),
        description: description.to_string(),
        start_date: window.0,
        end_date: window.1,
        metric,
        goal,
        progress: 0,
        completed: false,
        joined: false,
        claimed: false,
        reward,
    }
}

/// Challenge catalog with windows placed around `today`
pub fn default_challenges(today: NaiveDate) -> Vec<Challenge> {
    let month_start = today.with_day(1).unwrap_or(today);
    vec![
        challenge(
            1,
            "Monthly Productivity Sprint",
            "Complete 30 tasks in 30 days",
            (month_start, month_start + Duration::days(29)),
            Metric::TasksCompleted,
            30,
            300,
        ),
        challenge(
            2,
            "Focus Week Challenge",
            "Complete 10 focus sessions in a week",
            (today - Duration::days(2), today + Duration::days(5)),
            Metric::FocusSessions,
            10,
            200,
        ),
        challenge(
            3,
            "Habit Streak Challenge",
            "Maintain all habits for 14 days straight",
            (today - Duration::days(1), today + Duration::days(13)),
            Metric::HabitStreak,
            14,
            250,
        ),
    ]
}

fn reward(id: i64, name: &str, description: &str, icon: &str, cost: i64, unlocked: bool) -> Reward {
    Reward {
        id,
        name: name.to_string(),
        description: description.to_string(),
        icon: icon.to_string(),
        cost,
        unlocked,
        claimed: false,
    }
}

/// Reward catalog; the cheaper two start unlocked
pub fn default_rewards() -> Vec<Reward> {
    vec![
        reward(DARK_THEME_REWARD, "Dark Theme", "Unlock the dark theme for the app", "star", 100, true),
        reward(2, "Custom Task Categories", "Create custom categories for your tasks", "trophy", 200, true),
        reward(3, "Advanced Analytics", "Unlock detailed productivity analytics", "award", 500, false),
        reward(4, "Custom Themes", "Choose from a variety of app themes", "gift", 300, false),
        reward(5, "Priority Support", "Get priority support from our team", "crown", 1000, false),
    ]
}

/// Fresh stats for a user who has never played
pub fn starter_stats(today: NaiveDate) -> UserStats {
    UserStats {
        badges: default_badges(),
        achievements: default_achievements(),
        challenges: default_challenges(today),
        rewards: default_rewards(),
        last_active: Some(today),
        ..UserStats::default()
    }
}

/// Sample tasks, habits and stats served when running without a backend
#[derive(Debug, Clone)]
pub struct DemoDataset {
    pub tasks: Vec<Task>,
    pub habits: Vec<Habit>,
    pub stats: UserStats,
}

pub fn demo_dataset(today: NaiveDate, now: DateTime<Utc>) -> DemoDataset {
    let day = |offset: i64| today + Duration::days(offset);
    let task = |id: i64, text: &str, completed: bool, due: Option<NaiveDate>, priority: Option<Priority>, notes: &str| {
        Task::from_existing(
            TaskId(id),
            text.to_string(),
            completed,
            due,
            priority,
            Some(notes.to_string()).filter(|n| !n.is_empty()),
            None,
        )
    };

    let tasks = vec![
        task(1, "Complete project proposal", false, Some(day(1)), Some(Priority::High), "Include budget estimates and timeline"),
        task(2, "Schedule team meeting", true, Some(today), Some(Priority::Medium), "Discuss quarterly goals"),
        task(3, "Review client feedback", false, Some(day(2)), Some(Priority::Medium), ""),
        task(4, "Update portfolio website", false, None, Some(Priority::Low), "Add recent projects"),
        task(5, "Read chapter 5 of productivity book", true, None, None, "Take notes on key concepts"),
    ];

    let habits = vec![
        Habit::from_existing(HabitId(1), "Morning meditation".to_string(), 3, vec![today, day(-1), day(-2)]),
        Habit::from_existing(HabitId(2), "Read for 30 minutes".to_string(), 2, vec![today, day(-1)]),
        Habit::from_existing(HabitId(3), "Exercise".to_string(), 0, Vec::new()),
    ];

    let mut badges = default_badges();
    for badge in badges.iter_mut().filter(|b| b.id == 1 || b.id == 2) {
        badge.earned = true;
        badge.earned_at = Some(now - Duration::days(if badge.id == 1 { 7 } else { 2 }));
    }

    let mut achievements = default_achievements();
    for (id, progress) in [(TASK_MASTER, 7), (HABIT_FORMER, 3), (FOCUS_CHAMPION, 3), (EARLY_BIRD, 1), (PRODUCTIVITY_GURU, 3)] {
        if let Some(a) = achievements.iter_mut().find(|a| a.id == id) {
            a.set_progress(progress);
        }
    }

    let mut challenges = default_challenges(today);
    for (id, progress) in [(1, 12), (2, 4), (3, 2)] {
        if let Some(c) = challenges.iter_mut().find(|c| c.id == id) {
            c.joined = true;
            c.set_progress(progress);
        }
    }

    let mut rewards = default_rewards();
    if let Some(dark) = rewards.iter_mut().find(|r| r.id == 1) {
        dark.claimed = true;
    }

    let base = UserStats {
        tasks_completed: 7,
        habits_completed: 12,
        focus_sessions_completed: 3,
        longest_streak: 3,
        streak: 3,
        last_active: Some(today),
        badges,
        achievements,
        challenges,
        rewards,
        ..UserStats::default()
    };
    let (stats, _) = points::add_points(&base, 175);

    DemoDataset { tasks, habits, stats }
}
