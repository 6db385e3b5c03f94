/// Invariants of the gamified core, driven through a signed-in session
use chrono::{Duration, NaiveDate, NaiveDateTime};
use productivity_quest::*;

#[cfg(test)]
mod property_tests {
    use super::*;

    fn ten_am(day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 6, day)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap()
    }

    fn session_with(clock: &FixedClock) -> Session {
        let mut session = Session::new(MemoryStorage::new(), clock.clone(), Plan::Pro);
        session.sign_in(UserId::from("tester")).unwrap();
        session
    }

    fn session() -> Session {
        session_with(&FixedClock::new(ten_am(15)))
    }

    fn assert_level_invariant(stats: &UserStats) {
        assert_eq!(stats.level, stats.points.div_euclid(100) + 1);
        assert!((0..100).contains(&stats.experience), "experience {}", stats.experience);
    }

    fn earned_badges(session: &Session) -> Vec<i64> {
        session
            .state()
            .stats
            .badges
            .iter()
            .filter(|b| b.earned)
            .map(|b| b.id)
            .collect()
    }

    /// Small deterministic generator so the sequences are reproducible
    struct Lcg(u64);

    impl Lcg {
        fn next(&mut self, bound: usize) -> usize {
            self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            ((self.0 >> 33) as usize) % bound
        }
    }

    #[test]
    fn test_toggle_sequences_keep_counters_consistent() {
        let priorities = [Some(Priority::High), Some(Priority::Medium), Some(Priority::Low), None];

        for seed in 1..=20u64 {
            let mut session = session();
            let mut rng = Lcg(seed);
            let mut ids = Vec::new();
            for i in 0..6 {
                let mut draft = TaskDraft::new(format!("Task {}", i));
                draft.priority = priorities[i % priorities.len()];
                ids.push(session.add_task(draft).unwrap().unwrap());
            }

            let mut earned: Vec<i64> = Vec::new();
            for _ in 0..60 {
                let id = ids[rng.next(ids.len())];
                assert!(session.toggle_task(id));

                let state = session.state();
                let completed = state.tasks.iter().filter(|t| t.completed).count() as u32;
                assert_eq!(state.stats.tasks_completed, completed);
                assert_eq!(state.stats.points, state.completed_task_points());
                assert_level_invariant(&state.stats);

                let now_earned = earned_badges(&session);
                assert!(earned.iter().all(|id| now_earned.contains(id)));
                earned = now_earned;
            }
        }
    }

    #[test]
    fn test_double_habit_toggle_round_trips() {
        let mut session = session();
        let id = session.add_habit("Read for 30 minutes").unwrap().unwrap();
        let before_habit = session.state().habit(id).unwrap().clone();
        let before_points = session.state().stats.points;

        assert!(session.toggle_habit(id));
        assert_eq!(session.state().stats.points, before_points + HABIT_POINTS);
        assert!(session.toggle_habit(id));

        let after = session.state().habit(id).unwrap();
        assert_eq!(after.streak, before_habit.streak);
        assert_eq!(after.completed_dates, before_habit.completed_dates);
        assert_eq!(session.state().stats.points, before_points);
        assert_eq!(session.state().stats.habits_completed, 0);
    }

    #[test]
    fn test_level_invariant_over_mixed_operations() {
        let clock = FixedClock::new(ten_am(1));
        let mut session = session_with(&clock);
        let habit = session.add_habit("Stretch").unwrap().unwrap();

        for day in 1..=12 {
            clock.set(ten_am(day));
            let task = session
                .add_task(TaskDraft::new(format!("Day {} task", day)).priority(Priority::High))
                .unwrap()
                .unwrap();
            session.toggle_task(task);
            session.toggle_habit(habit);
            assert_level_invariant(&session.state().stats);

            if day % 3 == 0 {
                session.delete_task(task);
                assert_level_invariant(&session.state().stats);
            }
        }

        // 8 surviving tasks at 20 plus 12 check-offs at 15
        assert_eq!(session.state().stats.points, 8 * 20 + 12 * 15);
        assert_eq!(session.state().stats.level, 4);
    }

    #[test]
    fn test_badges_stay_earned() {
        let mut session = session();
        let id = session.add_task(TaskDraft::new("First")).unwrap().unwrap();
        session.toggle_task(id);
        assert_eq!(earned_badges(&session), vec![1]);

        session.toggle_task(id);
        session.delete_task(id);
        assert_eq!(session.state().stats.tasks_completed, 0);
        assert_eq!(earned_badges(&session), vec![1]);
    }

    #[test]
    fn test_focus_phase_then_short_break() {
        let mut session = session();
        let timer = &session.state().timer;
        assert_eq!((timer.mode, timer.minutes, timer.seconds, timer.session_count), (TimerMode::Focus, 25, 0, 0));
        assert!(!timer.is_active);

        session.start_timer();
        for _ in 0..1500 {
            assert!(session.tick());
        }

        let timer = session.state().timer.clone();
        assert_eq!(timer.mode, TimerMode::ShortBreak);
        assert_eq!(timer.session_count, 1);
        assert_eq!(timer.display(), "05:00");
        assert!(!timer.is_active);
        assert!(!session.tick());
        assert_eq!(session.state().stats.focus_sessions_completed, 1);
        assert_eq!(session.state().stats.points, 20);

        session.start_timer();
        for _ in 0..300 {
            session.tick();
        }
        let timer = &session.state().timer;
        assert_eq!(timer.mode, TimerMode::Focus);
        assert_eq!(timer.session_count, 1);
        assert_eq!(session.state().stats.points, 20);
    }

    #[test]
    fn test_fourth_focus_phase_earns_long_break() {
        let mut session = session();

        for completed in 1..=4u32 {
            session.switch_mode(TimerMode::Focus);
            session.start_timer();
            for _ in 0..1500 {
                session.tick();
            }

            let timer = &session.state().timer;
            assert_eq!(timer.session_count, completed);
            let expected = if completed == 4 {
                TimerMode::LongBreak
            } else {
                TimerMode::ShortBreak
            };
            assert_eq!(timer.mode, expected);
        }

        assert_eq!(session.state().timer.display(), "15:00");
        assert_eq!(session.state().stats.focus_sessions_completed, 4);
    }

    #[test]
    fn test_deleting_completed_task_reverses_its_completion() {
        let mut session = session();
        let keep = session.add_task(TaskDraft::new("Keep")).unwrap().unwrap();
        session.toggle_task(keep);
        let id = session
            .add_task(TaskDraft::new("Throwaway").priority(Priority::Medium))
            .unwrap()
            .unwrap();
        let before = session.state().stats.clone();

        session.toggle_task(id);
        assert_ne!(session.state().stats.points, before.points);
        assert!(session.delete_task(id));

        let after = &session.state().stats;
        assert_eq!(after.tasks_completed, before.tasks_completed);
        assert_eq!(after.points, before.points);
        assert_eq!(after.level, before.level);
        assert_eq!(after.experience, before.experience);
        assert_eq!(after.achievement(1).unwrap().progress, before.achievement(1).unwrap().progress);
        assert_eq!(after.challenge(1).unwrap().progress, before.challenge(1).unwrap().progress);
    }

    #[test]
    fn test_write_report_scenario() {
        let mut session = session();
        let id = session
            .add_task(TaskDraft::new("Write report").priority(Priority::High))
            .unwrap()
            .unwrap();
        assert_eq!(session.state().task(id).unwrap().points(), 20);
        let before = session.state().stats.clone();

        session.toggle_task(id);
        assert_eq!(session.state().stats.points, before.points + 20);
        assert_eq!(session.state().stats.tasks_completed, before.tasks_completed + 1);

        session.toggle_task(id);
        assert_eq!(session.state().stats.points, before.points);
        assert_eq!(session.state().stats.tasks_completed, before.tasks_completed);
    }

    #[test]
    fn test_meditate_scenario() {
        let clock = FixedClock::new(ten_am(1));
        let mut session = session_with(&clock);
        let id = session.add_habit("Meditate").unwrap().unwrap();

        for _ in 0..3 {
            assert!(session.toggle_habit(id));
            clock.advance(Duration::days(1));
        }
        assert_eq!(session.state().habit(id).unwrap().streak, 3);
        assert_eq!(session.state().stats.longest_streak, 3);
        assert_eq!(session.state().stats.streak, 3);

        clock.set(ten_am(3));
        assert!(session.toggle_habit(id));
        assert_eq!(session.state().habit(id).unwrap().streak, 2);
        assert_eq!(session.state().stats.longest_streak, 3);
        assert_eq!(session.state().stats.streak, 2);
    }

    #[test]
    fn test_unknown_ids_are_silent() {
        let mut session = session();
        assert!(!session.toggle_task(TaskId(99)));
        assert!(!session.delete_habit(HabitId(99)));
        assert!(!session.claim_reward(99));
        assert!(session.drain_notifications().is_empty());
    }
}
