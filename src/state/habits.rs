/// Habit mutators
///
/// Habits are toggled for the current local day only. Checking a habit off
/// pays [`HABIT_POINTS`], extends its streak and moves the streak-linked
/// achievements and challenges; un-checking it reverses the points and
/// counters.

use crate::domain::{next_id, DomainError, Habit, HabitId, Metric, HABIT_POINTS};
use crate::engine::evaluator;
use crate::state::{AppState, Change, Moment, Transition, Write};

/// Create a habit with the next free id
pub fn add_habit(state: &AppState, name: &str, at: Moment) -> Result<Transition, DomainError> {
    let id = HabitId(next_id(state.habits.iter().map(|h| h.id.0)));
    let habit = Habit::new(id, name)?;

    tracing::debug!("Adding habit {} ({})", habit.id, habit.name);

    let mut change = Change::begin(state);
    change.write(Write::InsertHabit(habit.clone()));
    change.state().habits.push(habit);
    Ok(change.settle(at))
}

/// Check a habit off for today, or un-check it if already done
///
/// `None` when the id is unknown.
pub fn toggle_habit(state: &AppState, id: HabitId, at: Moment) -> Option<Transition> {
    let index = state.habits.iter().position(|h| h.id == id)?;
    let today = at.today;
    let mut change = Change::begin(state);

    let (habit, checked) = {
        let habit = &mut change.state().habits[index];
        let checked = if habit.completed_dates.remove(&today) {
            habit.streak = habit.streak.saturating_sub(1);
            false
        } else {
            habit.completed_dates.insert(today);
            habit.streak = habit.streak.saturating_add(1);
            true
        };
        (habit.clone(), checked)
    };
    change.refresh_streak();

    if checked {
        tracing::debug!("Habit {} checked off, streak {}", habit.id, habit.streak);
        change.credit(habit.points);
        let stats = change.stats();
        stats.habits_completed = stats.habits_completed.saturating_add(1);
        stats.longest_streak = stats.longest_streak.max(habit.streak);
        let longest = stats.longest_streak;

        let achievements = evaluator::set_achievement_progress(change.stats(), Metric::HabitStreak, longest);
        let challenges = evaluator::advance_challenges(change.stats(), Metric::HabitStreak, today, 1);
        change.announce(achievements, challenges);
        change.write(Write::InsertCompletion { habit_id: id, date: today });
    } else {
        tracing::debug!("Habit {} un-checked, streak {}", habit.id, habit.streak);
        change.credit(-habit.points);
        let stats = change.stats();
        stats.habits_completed = stats.habits_completed.saturating_sub(1);
        let current = stats.streak;

        evaluator::set_achievement_progress(change.stats(), Metric::HabitStreak, current);
        evaluator::regress_challenges(change.stats(), Metric::HabitStreak, today, 1);
        change.write(Write::DeleteCompletion { habit_id: id, date: today });
    }

    change.write(Write::UpdateHabit(habit));
    Some(change.settle(at))
}

/// Remove a habit; if it was checked off today, take back today's points
///
/// Streak bookkeeping is not rewound beyond dropping the habit.
pub fn delete_habit(state: &AppState, id: HabitId, at: Moment) -> Option<Transition> {
    let index = state.habits.iter().position(|h| h.id == id)?;
    let mut change = Change::begin(state);

    let habit = change.state().habits.remove(index);
    if habit.is_done_on(at.today) {
        tracing::debug!("Deleting habit {} checked off today (-{})", habit.id, HABIT_POINTS);
        change.credit(-habit.points);
        let stats = change.stats();
        stats.habits_completed = stats.habits_completed.saturating_sub(1);
    }
    change.refresh_streak();

    change.write(Write::DeleteHabit(id));
    Some(change.settle(at))
}
