/// Task and habit analytics
///
/// Scores open tasks for prioritization and summarizes completion rates
/// into the prompt the suggestion generator analyzes.

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::{Habit, Priority, Task};

/// Days ahead at which a due date stops adding urgency
const DUE_HORIZON_DAYS: f64 = 14.0;

const WEIGHT_DUE: f64 = 0.4;
const WEIGHT_PRIORITY: f64 = 0.3;
const WEIGHT_COMPLEXITY: f64 = 0.2;
const WEIGHT_DEPENDENCIES: f64 = 0.1;

/// Share of tasks done overall and of habits checked off today, in whole percent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CompletionRates {
    pub tasks: u32,
    pub habits_today: u32,
}

pub fn completion_rates(tasks: &[Task], habits: &[Habit], today: NaiveDate) -> CompletionRates {
    let done_tasks = tasks.iter().filter(|t| t.completed).count();
    let done_habits = habits.iter().filter(|h| h.is_done_on(today)).count();
    CompletionRates {
        tasks: percent(done_tasks, tasks.len()),
        habits_today: percent(done_habits, habits.len()),
    }
}

fn percent(part: usize, whole: usize) -> u32 {
    if whole == 0 {
        return 0;
    }
    (part as f64 / whole as f64 * 100.0).round() as u32
}

/// Context handed to the generator for a productivity analysis
pub fn productivity_prompt(tasks: &[Task], habits: &[Habit], today: NaiveDate) -> String {
    let rates = completion_rates(tasks, habits, today);
    format!(
        "Task completion rate: {}% Habit completion rate today: {}%",
        rates.tasks, rates.habits_today
    )
}

/// Urgency in `[0, 1]`, rounded to two decimals
///
/// Overdue tasks can score above the due-date weight since the number of
/// days left goes negative.
pub fn priority_score(task: &Task, today: NaiveDate) -> f64 {
    let mut score = 0.0;

    if let Some(due) = task.due_date {
        let days_left = (due - today).num_days() as f64;
        score += WEIGHT_DUE * (1.0 - (days_left / DUE_HORIZON_DAYS).min(1.0));
    }

    let priority = match task.priority.unwrap_or(Priority::Medium) {
        Priority::High => 1.0,
        Priority::Medium => 0.6,
        Priority::Low => 0.3,
    };
    score += WEIGHT_PRIORITY * priority;
    score += WEIGHT_COMPLEXITY * complexity_score(task);
    score += WEIGHT_DEPENDENCIES * dependency_score(task);

    (score * 100.0).round() / 100.0
}

/// Longer text and notes read as more involved work
fn complexity_score(task: &Task) -> f64 {
    let mut score = (task.text.chars().count() as f64 / 100.0).min(0.5);
    if let Some(notes) = &task.notes {
        score += (notes.chars().count() as f64 / 200.0).min(0.3);
    }
    score.min(1.0)
}

fn dependency_score(task: &Task) -> f64 {
    let notes = if task.notes.is_some() { 0.2 } else { 0.0 };
    let due = if task.due_date.is_some() { 0.3 } else { 0.0 };
    f64::min(notes + due, 1.0)
}

/// Open tasks, most urgent first
pub fn prioritized(tasks: &[Task], today: NaiveDate) -> Vec<(&Task, f64)> {
    let mut scored: Vec<(&Task, f64)> = tasks
        .iter()
        .filter(|t| !t.completed)
        .map(|t| (t, priority_score(t, today)))
        .collect();
    scored.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.id.cmp(&b.0.id)));
    scored
}
