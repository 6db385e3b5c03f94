/// Task entity and related functionality
///
/// A task is a one-off to-do item. Its point value is derived from its
/// priority and is recomputed whenever the priority changes.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{DomainError, Priority, TaskId};

/// Everything a caller supplies when creating or editing a task
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskDraft {
    pub text: String,
    pub due_date: Option<NaiveDate>,
    pub priority: Option<Priority>,
    pub notes: Option<String>,
    pub category: Option<String>,
}

impl TaskDraft {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn due(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }

    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }
}

/// A to-do item owned by the signed-in user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Unique per user, assigned as one past the largest existing id
    pub id: TaskId,
    /// What needs doing (trimmed, 1-500 characters)
    pub text: String,
    pub completed: bool,
    /// Optional deadline, used by the urgency score
    pub due_date: Option<NaiveDate>,
    /// Decides the point value; low when absent
    pub priority: Option<Priority>,
    /// Free-form notes (up to 2000 characters)
    pub notes: Option<String>,
    /// User-chosen grouping, e.g. "Work"
    pub category: Option<String>,
    /// Derived from `priority`, never set directly
    points: i64,
}

impl Task {
    /// Create a new, not yet completed task with validation
    pub fn new(id: TaskId, draft: TaskDraft) -> Result<Self, DomainError> {
        let text = Self::validate_text(&draft.text)?;
        Self::validate_notes(&draft.notes)?;

        let category = draft
            .category
            .and_then(non_blank)
            .or_else(|| draft.notes.as_deref().and_then(legacy_category));

        Ok(Self {
            id,
            text,
            completed: false,
            due_date: draft.due_date,
            priority: draft.priority,
            notes: draft.notes,
            category,
            points: Priority::points(draft.priority),
        })
    }

    /// Create a task from existing data (used when loading from storage)
    ///
    /// Points are recomputed from the priority rather than trusted, and a
    /// missing category is lifted out of a `Category: X` line in the notes.
    pub fn from_existing(
        id: TaskId,
        text: String,
        completed: bool,
        due_date: Option<NaiveDate>,
        priority: Option<Priority>,
        notes: Option<String>,
        category: Option<String>,
    ) -> Self {
        let category = category
            .and_then(non_blank)
            .or_else(|| notes.as_deref().and_then(legacy_category));
        Self {
            id,
            text,
            completed,
            due_date,
            priority,
            notes,
            category,
            points: Priority::points(priority),
        }
    }

    /// Point value awarded when this task is completed
    pub fn points(&self) -> i64 {
        self.points
    }

    /// Replace the editable fields, recomputing points from the new priority
    pub fn apply_edit(&mut self, draft: TaskDraft) -> Result<(), DomainError> {
        let text = Self::validate_text(&draft.text)?;
        Self::validate_notes(&draft.notes)?;

        self.category = draft
            .category
            .and_then(non_blank)
            .or_else(|| draft.notes.as_deref().and_then(legacy_category));
        self.text = text;
        self.due_date = draft.due_date;
        self.priority = draft.priority;
        self.notes = draft.notes;
        self.points = Priority::points(draft.priority);
        Ok(())
    }

    fn validate_text(text: &str) -> Result<String, DomainError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(DomainError::Validation {
                message: "Task text cannot be empty".to_string(),
            });
        }
        if trimmed.chars().count() > 500 {
            return Err(DomainError::Validation {
                message: "Task text cannot be longer than 500 characters".to_string(),
            });
        }
        Ok(trimmed.to_string())
    }

    fn validate_notes(notes: &Option<String>) -> Result<(), DomainError> {
        if let Some(text) = notes {
            if text.chars().count() > 2000 {
                return Err(DomainError::Validation {
                    message: "Notes cannot be longer than 2000 characters".to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Pull `X` out of a `Category: X` line in free-text notes
pub fn legacy_category(notes: &str) -> Option<String> {
    notes.lines().find_map(|line| {
        let rest = line.trim().strip_prefix("Category:")?;
        non_blank(rest.to_string())
    })
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
