/// Task mutators
///
/// Completing a task pays its points, bumps `tasks_completed` and advances
/// the task-tracking achievements and challenges. Un-completing or deleting
/// a completed task applies the exact inverse.

use chrono::NaiveTime;

use crate::domain::{next_id, DomainError, Metric, Task, TaskDraft, TaskId};
use crate::state::{AppState, Change, Moment, Transition, Write};

/// Local time before which a completion counts toward early-bird achievements
fn early_cutoff() -> NaiveTime {
    NaiveTime::from_hms_opt(9, 0, 0).unwrap_or(NaiveTime::MIN)
}

/// Create a task with the next free id
pub fn add_task(state: &AppState, draft: TaskDraft, at: Moment) -> Result<Transition, DomainError> {
    let id = TaskId(next_id(state.tasks.iter().map(|t| t.id.0)));
    let task = Task::new(id, draft)?;

    tracing::debug!("Adding task {} ({} points)", task.id, task.points());

    let mut change = Change::begin(state);
    change.write(Write::InsertTask(task.clone()));
    change.state().tasks.push(task);
    Ok(change.settle(at))
}

/// Flip a task's completion; `None` when the id is unknown
pub fn toggle_task(state: &AppState, id: TaskId, at: Moment) -> Option<Transition> {
    let index = state.tasks.iter().position(|t| t.id == id)?;
    let mut change = Change::begin(state);

    let task = {
        let task = &mut change.state().tasks[index];
        task.completed = !task.completed;
        task.clone()
    };

    if task.completed {
        complete(&mut change, &task, at);
    } else {
        uncomplete(&mut change, &task, at);
    }

    change.write(Write::UpdateTask(task));
    Some(change.settle(at))
}

fn complete(change: &mut Change, task: &Task, at: Moment) {
    tracing::debug!("Task {} completed (+{})", task.id, task.points());
    change.credit(task.points());
    let stats = change.stats();
    stats.tasks_completed = stats.tasks_completed.saturating_add(1);
    change.advance(Metric::TasksCompleted, at.today, 1);
    if at.local_time < early_cutoff() {
        change.advance(Metric::EarlyTask, at.today, 1);
    }
}

/// Inverse of `complete`; early-bird progress is a one-shot trophy and stays
fn uncomplete(change: &mut Change, task: &Task, at: Moment) {
    tracing::debug!("Task {} reopened (-{})", task.id, task.points());
    change.credit(-task.points());
    let stats = change.stats();
    stats.tasks_completed = stats.tasks_completed.saturating_sub(1);
    change.regress(Metric::TasksCompleted, at.today, 1);
}

/// Replace a task's editable fields
///
/// Unknown ids are a silent no-op (`Ok(None)`). When a completed task's
/// point value changes, the difference is settled immediately so stats keep
/// matching the sum over completed tasks.
pub fn edit_task(
    state: &AppState,
    id: TaskId,
    draft: TaskDraft,
    at: Moment,
) -> Result<Option<Transition>, DomainError> {
    let Some(index) = state.tasks.iter().position(|t| t.id == id) else {
        return Ok(None);
    };
    let mut change = Change::begin(state);

    let (before, task) = {
        let task = &mut change.state().tasks[index];
        let before = task.points();
        task.apply_edit(draft)?;
        (before, task.clone())
    };

    if task.completed && task.points() != before {
        tracing::debug!("Task {} re-priced {} -> {}", task.id, before, task.points());
        change.credit(task.points() - before);
    }

    change.write(Write::UpdateTask(task));
    Ok(Some(change.settle(at)))
}

/// Remove a task, reversing its contribution if it was completed
pub fn delete_task(state: &AppState, id: TaskId, at: Moment) -> Option<Transition> {
    let index = state.tasks.iter().position(|t| t.id == id)?;
    let mut change = Change::begin(state);

    let task = change.state().tasks.remove(index);
    if task.completed {
        uncomplete(&mut change, &task, at);
    }

    change.write(Write::DeleteTask(id));
    Some(change.settle(at))
}
