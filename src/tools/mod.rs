/// MCP tools for the productivity core
///
/// Each submodule holds the parameter types and handlers for one area.
/// Handlers run against the signed-in [`Session`] and return the text shown
/// to the client; notifications raised along the way are appended by the
/// server.

pub mod focus;
pub mod habits;
pub mod rewards;
pub mod settings;
pub mod suggest;
pub mod tasks;

use schemars::{schema_for, JsonSchema};
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use crate::domain::DomainError;
use crate::mcp::protocol::ToolDefinition;
use crate::quota::QuotaExceeded;
use crate::session::Session;
use crate::suggest::{SuggestionProvider, Suggestions};

/// Why a tool call could not be carried out
#[derive(Error, Debug)]
pub enum ToolError {
    #[error("No user is signed in")]
    SignedOut,

    #[error("Invalid arguments: {0}")]
    InvalidArguments(#[from] serde_json::Error),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Quota(#[from] QuotaExceeded),

    #[error("Unknown tool: {0}")]
    UnknownTool(String),
}

/// Route a `tools/call` to its handler
pub async fn call<P: SuggestionProvider>(
    session: &mut Session,
    suggestions: &Suggestions<P>,
    name: &str,
    args: Value,
) -> Result<String, ToolError> {
    if !session.is_signed_in() {
        return Err(ToolError::SignedOut);
    }

    match name {
        "task_add" => tasks::add(session, parse(args)?),
        "task_toggle" => Ok(tasks::toggle(session, parse(args)?)),
        "task_edit" => tasks::edit(session, parse(args)?),
        "task_delete" => Ok(tasks::delete(session, parse(args)?)),
        "task_list" => Ok(tasks::list(session, parse(args)?)),
        "habit_add" => habits::add(session, parse(args)?),
        "habit_toggle" => Ok(habits::toggle(session, parse(args)?)),
        "habit_delete" => Ok(habits::delete(session, parse(args)?)),
        "habit_list" => Ok(habits::list(session)),
        "stats_get" => Ok(rewards::stats(session)),
        "focus_control" => focus::control(session, parse(args)?),
        "focus_status" => Ok(focus::status(session)),
        "achievement_claim" => Ok(rewards::claim_achievement(session, parse(args)?)),
        "challenge_join" => rewards::join_challenge(session, parse(args)?),
        "challenge_claim" => Ok(rewards::claim_challenge(session, parse(args)?)),
        "reward_claim" => Ok(rewards::claim_reward(session, parse(args)?)),
        "settings_update" => settings::update(session, parse(args)?),
        "suggest" => suggest::suggest(session, suggestions, parse(args)?).await,
        other => Err(ToolError::UnknownTool(other.to_string())),
    }
}

/// Every tool this server offers, with schemas derived from the parameter types
pub fn definitions() -> Vec<ToolDefinition> {
    vec![
        tool::<tasks::TaskAddParams>("task_add", "Add a task; completing it later earns points by priority"),
        tool::<tasks::TaskIdParams>("task_toggle", "Mark a task completed or not completed"),
        tool::<tasks::TaskEditParams>("task_edit", "Change a task's text, due date, priority, notes or category"),
        tool::<tasks::TaskIdParams>("task_delete", "Delete a task; points for a completed task are taken back"),
        tool::<tasks::TaskListParams>("task_list", "List tasks, optionally filtered and sorted by urgency"),
        tool::<habits::HabitAddParams>("habit_add", "Start tracking a daily habit"),
        tool::<habits::HabitIdParams>("habit_toggle", "Check a habit off for today, or undo today's check-off"),
        tool::<habits::HabitIdParams>("habit_delete", "Stop tracking a habit"),
        tool::<habits::HabitListParams>("habit_list", "List habits with streaks and today's status"),
        tool::<rewards::StatsParams>("stats_get", "Show level, points, badges, achievements, challenges and rewards"),
        tool::<focus::FocusControlParams>("focus_control", "Start, pause, reset or switch the focus timer"),
        tool::<focus::FocusStatusParams>("focus_status", "Show the focus timer"),
        tool::<rewards::ClaimParams>("achievement_claim", "Claim the points for a completed achievement"),
        tool::<rewards::ClaimParams>("challenge_join", "Join an active challenge"),
        tool::<rewards::ClaimParams>("challenge_claim", "Claim the reward for a completed challenge"),
        tool::<rewards::ClaimParams>("reward_claim", "Spend points on an unlocked reward"),
        tool::<settings::SettingsParams>("settings_update", "Change theme, notifications or timer durations"),
        tool::<suggest::SuggestParams>("suggest", "Get task ideas, habit ideas, a focus tip or a productivity insight"),
    ]
}

fn tool<P: JsonSchema>(name: &str, description: &str) -> ToolDefinition {
    ToolDefinition {
        name: name.to_string(),
        description: description.to_string(),
        input_schema: serde_json::to_value(schema_for!(P)).unwrap_or_default(),
    }
}

fn parse<T: DeserializeOwned>(args: Value) -> Result<T, ToolError> {
    let args = if args.is_null() {
        Value::Object(Default::default())
    } else {
        args
    };
    Ok(serde_json::from_value(args)?)
}
