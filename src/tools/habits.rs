/// Habit tools: add, toggle, delete and list

use schemars::JsonSchema;
use serde::Deserialize;

use crate::domain::{Habit, HabitId};
use crate::quota::Feature;
use crate::session::Session;
use crate::tools::ToolError;

#[derive(Debug, Deserialize, JsonSchema)]
pub struct HabitAddParams {
    pub name: String,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct HabitIdParams {
    pub id: HabitId,
}

#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct HabitListParams {}

pub fn add(session: &mut Session, params: HabitAddParams) -> Result<String, ToolError> {
    session.check_quota(Feature::Habits)?;

    let Some(id) = session.add_habit(&params.name)? else {
        return Err(ToolError::SignedOut);
    };
    let name = session.state().habit(id).map(|h| h.name.clone()).unwrap_or_default();
    Ok(format!("✅ Now tracking habit #{}: {}. Check it off daily to build a streak!", id, name))
}

pub fn toggle(session: &mut Session, params: HabitIdParams) -> String {
    if !session.toggle_habit(params.id) {
        return format!("No habit with id {}", params.id);
    }
    let today = session.now().today;
    match session.state().habit(params.id) {
        Some(habit) if habit.is_done_on(today) => format!(
            "✅ {} done for today (+{} points) | 🔥 Streak: {} days",
            habit.name, habit.points, habit.streak
        ),
        Some(habit) => format!("↩️ Unchecked {} for today (-{} points)", habit.name, habit.points),
        None => format!("No habit with id {}", params.id),
    }
}

pub fn delete(session: &mut Session, params: HabitIdParams) -> String {
    let name = session.state().habit(params.id).map(|h| h.name.clone());
    match name {
        Some(name) if session.delete_habit(params.id) => format!("🗑️ Stopped tracking {}", name),
        _ => format!("No habit with id {}", params.id),
    }
}

pub fn list(session: &Session) -> String {
    let habits = &session.state().habits;
    if habits.is_empty() {
        return "No habits yet. Start one with habit_add!".to_string();
    }

    let today = session.now().today;
    let done_today = habits.iter().filter(|h| h.is_done_on(today)).count();
    let lines = habits
        .iter()
        .map(|h| describe(h, h.is_done_on(today)))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "🎯 **Habits** ({} of {} done today)\n\n{}",
        done_today,
        habits.len(),
        lines
    )
}

fn describe(habit: &Habit, done_today: bool) -> String {
    format!(
        "{} #{} {} | 🔥 {} days | {} check-offs",
        if done_today { "✅" } else { "⬜" },
        habit.id,
        habit.name,
        habit.streak,
        habit.completed_dates.len()
    )
}
