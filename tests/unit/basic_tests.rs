/// Basic unit tests to verify core functionality
use chrono::NaiveDate;
use productivity_quest::analytics;
use productivity_quest::engine::points;
use productivity_quest::suggest::keyword::{self, RequestKind};
use productivity_quest::*;

#[cfg(test)]
mod basic_unit_tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()
    }

    #[test]
    fn test_task_creation() {
        let task = Task::new(TaskId(1), TaskDraft::new("  Write report  ").priority(Priority::High));

        assert!(task.is_ok());
        let task = task.unwrap();
        assert_eq!(task.text, "Write report");
        assert_eq!(task.points(), 20);
        assert!(!task.completed);
    }

    #[test]
    fn test_task_validation() {
        assert!(Task::new(TaskId(1), TaskDraft::new("   ")).is_err());
        assert!(Task::new(TaskId(1), TaskDraft::new("x".repeat(501))).is_err());
        assert!(Task::new(TaskId(1), TaskDraft::new("ok").notes("n".repeat(2001))).is_err());
    }

    #[test]
    fn test_points_follow_priority() {
        assert_eq!(Priority::points(Some(Priority::High)), 20);
        assert_eq!(Priority::points(Some(Priority::Medium)), 15);
        assert_eq!(Priority::points(Some(Priority::Low)), 10);
        assert_eq!(Priority::points(None), 10);
    }

    #[test]
    fn test_category_lifted_from_notes() {
        let task = Task::new(TaskId(1), TaskDraft::new("Buy milk").notes("Category: Errands\nbefore noon")).unwrap();
        assert_eq!(task.category.as_deref(), Some("Errands"));

        let explicit = Task::new(
            TaskId(2),
            TaskDraft::new("Buy milk").notes("Category: Errands").category("Shopping"),
        )
        .unwrap();
        assert_eq!(explicit.category.as_deref(), Some("Shopping"));
    }

    #[test]
    fn test_habit_creation() {
        let habit = Habit::new(HabitId(1), "Meditate").unwrap();
        assert_eq!(habit.streak, 0);
        assert_eq!(habit.points, HABIT_POINTS);
        assert!(!habit.is_done_on(today()));
        assert!(Habit::new(HabitId(2), "").is_err());
    }

    #[test]
    fn test_level_math() {
        for pts in [-250, -1, 0, 1, 99, 100, 175, 999, 1000] {
            let level = points::level_for(pts);
            let experience = points::experience_for(pts);
            assert_eq!(level, pts.div_euclid(100) + 1);
            assert!((0..100).contains(&experience));
            assert_eq!((level - 1) * 100 + experience, pts);
        }
    }

    #[test]
    fn test_plan_parsing() {
        assert_eq!("free".parse::<Plan>().unwrap(), Plan::Free);
        assert_eq!(" PRO ".parse::<Plan>().unwrap(), Plan::Pro);
        assert!("enterprise".parse::<Plan>().is_err());
    }

    #[test]
    fn test_free_plan_limits() {
        assert!(!Plan::Free.has_reached_limit(Feature::FocusSessions, 4));
        assert!(Plan::Free.has_reached_limit(Feature::FocusSessions, 5));
        assert!(Plan::Free.has_reached_limit(Feature::Challenges, 1));
        assert!(Plan::Free.has_reached_limit(Feature::CustomThemes, 0));
        assert!(!Plan::Pro.has_reached_limit(Feature::Challenges, 3));
    }

    #[test]
    fn test_completion_rates() {
        let mut tasks = vec![
            Task::new(TaskId(1), TaskDraft::new("a")).unwrap(),
            Task::new(TaskId(2), TaskDraft::new("b")).unwrap(),
            Task::new(TaskId(3), TaskDraft::new("c")).unwrap(),
            Task::new(TaskId(4), TaskDraft::new("d")).unwrap(),
        ];
        tasks[0].completed = true;
        let habits = vec![Habit::from_existing(HabitId(1), "Read".to_string(), 1, vec![today()])];

        let rates = analytics::completion_rates(&tasks, &habits, today());
        assert_eq!(rates.tasks, 25);
        assert_eq!(rates.habits_today, 100);

        let empty = analytics::completion_rates(&[], &[], today());
        assert_eq!(empty.tasks, 0);
        assert_eq!(empty.habits_today, 0);
    }

    #[test]
    fn test_keyword_routing() {
        assert_eq!(KeywordGenerator::classify("Make me a grocery list"), RequestKind::Grocery);
        assert_eq!(
            KeywordGenerator::classify("Task completion rate: 80% Habit completion rate today: 90%"),
            RequestKind::Productivity
        );
        assert_eq!(keyword::extract_topic("ideas for my garden"), "my garden");
    }

    #[test]
    fn test_productivity_analysis_thresholds() {
        let strong = keyword::productivity_analysis("Task completion rate: 80% Habit completion rate today: 90%");
        let weak = keyword::productivity_analysis("Task completion rate: 10% Habit completion rate today: 20%");
        assert_ne!(strong, weak);
    }
}
