/// Task tools: add, toggle, edit, delete and list

use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::Deserialize;

use crate::analytics;
use crate::domain::{Priority, Task, TaskDraft, TaskId};
use crate::quota::Feature;
use crate::session::Session;
use crate::tools::ToolError;

#[derive(Debug, Deserialize, JsonSchema)]
pub struct TaskAddParams {
    /// What needs doing
    pub text: String,
    /// YYYY-MM-DD
    pub due_date: Option<NaiveDate>,
    /// low (10 points), medium (15) or high (20); low when omitted
    pub priority: Option<Priority>,
    pub notes: Option<String>,
    pub category: Option<String>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct TaskIdParams {
    pub id: TaskId,
}

/// Replaces every field of the task; omitted optional fields are cleared
#[derive(Debug, Deserialize, JsonSchema)]
pub struct TaskEditParams {
    pub id: TaskId,
    pub text: String,
    pub due_date: Option<NaiveDate>,
    pub priority: Option<Priority>,
    pub notes: Option<String>,
    pub category: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum TaskFilter {
    #[default]
    All,
    Open,
    Completed,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum TaskSort {
    /// Creation order
    #[default]
    Id,
    /// Most urgent open tasks first
    Urgency,
    DueDate,
}

#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct TaskListParams {
    #[serde(default)]
    pub filter: TaskFilter,
    #[serde(default)]
    pub sort: TaskSort,
    /// Only tasks in this category
    pub category: Option<String>,
}

fn draft(text: String, due: Option<NaiveDate>, priority: Option<Priority>, notes: Option<String>, category: Option<String>) -> TaskDraft {
    TaskDraft {
        text,
        due_date: due,
        priority,
        notes,
        category,
    }
}

pub fn add(session: &mut Session, params: TaskAddParams) -> Result<String, ToolError> {
    session.check_quota(Feature::Tasks)?;

    let draft = draft(params.text, params.due_date, params.priority, params.notes, params.category);
    let Some(id) = session.add_task(draft)? else {
        return Err(ToolError::SignedOut);
    };

    let task = session.state().task(id).map(describe).unwrap_or_default();
    Ok(format!("✅ Added task {}", task))
}

pub fn toggle(session: &mut Session, params: TaskIdParams) -> String {
    if !session.toggle_task(params.id) {
        return format!("No task with id {}", params.id);
    }
    match session.state().task(params.id) {
        Some(task) if task.completed => format!("✅ Completed: {} (+{} points)", task.text, task.points()),
        Some(task) => format!("↩️ Reopened: {} (-{} points)", task.text, task.points()),
        None => format!("No task with id {}", params.id),
    }
}

pub fn edit(session: &mut Session, params: TaskEditParams) -> Result<String, ToolError> {
    let draft = draft(params.text, params.due_date, params.priority, params.notes, params.category);
    if !session.edit_task(params.id, draft)? {
        return Ok(format!("No task with id {}", params.id));
    }
    let task = session.state().task(params.id).map(describe).unwrap_or_default();
    Ok(format!("✏️ Updated task {}", task))
}

pub fn delete(session: &mut Session, params: TaskIdParams) -> String {
    let text = session.state().task(params.id).map(|t| t.text.clone());
    match text {
        Some(text) if session.delete_task(params.id) => format!("🗑️ Deleted task: {}", text),
        _ => format!("No task with id {}", params.id),
    }
}

pub fn list(session: &Session, params: TaskListParams) -> String {
    let state = session.state();
    let today = session.now().today;

    let mut scored: Vec<(&Task, f64)> = state
        .tasks
        .iter()
        .filter(|t| match params.filter {
            TaskFilter::All => true,
            TaskFilter::Open => !t.completed,
            TaskFilter::Completed => t.completed,
        })
        .filter(|t| match &params.category {
            Some(category) => t.category.as_deref().is_some_and(|c| c.eq_ignore_ascii_case(category)),
            None => true,
        })
        .map(|t| (t, analytics::priority_score(t, today)))
        .collect();

    match params.sort {
        TaskSort::Id => scored.sort_by_key(|(t, _)| t.id),
        TaskSort::Urgency => scored.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.id.cmp(&b.0.id))),
        // Undated tasks last
        TaskSort::DueDate => scored.sort_by_key(|(t, _)| (t.due_date.is_none(), t.due_date, t.id)),
    }

    if scored.is_empty() {
        return "No tasks found. Add one with task_add!".to_string();
    }

    let done = state.tasks.iter().filter(|t| t.completed).count();
    let header = format!("📋 **Tasks** ({} of {} completed)\n", done, state.tasks.len());
    let lines = scored
        .iter()
        .map(|(task, score)| format!("{} | urgency {:.2}", describe(task), score))
        .collect::<Vec<_>>()
        .join("\n");
    format!("{}\n{}", header, lines)
}

fn describe(task: &Task) -> String {
    let mut line = format!(
        "[{}] #{} {}",
        if task.completed { "x" } else { " " },
        task.id,
        task.text
    );
    if let Some(priority) = task.priority {
        line.push_str(&format!(" | {}", priority.as_str()));
    }
    if let Some(due) = task.due_date {
        line.push_str(&format!(" | due {}", due));
    }
    if let Some(category) = &task.category {
        line.push_str(&format!(" | {}", category));
    }
    line.push_str(&format!(" | {} pts", task.points()));
    line
}
