/// Suggestion tool, gated by the AI assistant feature of the plan

use schemars::JsonSchema;
use serde::Deserialize;

use crate::quota::Feature;
use crate::session::Session;
use crate::suggest::{SuggestionProvider, Suggestions};
use crate::tools::ToolError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SuggestKind {
    /// Three task ideas
    Tasks,
    /// Three habit ideas
    Habits,
    FocusTip,
    /// Analysis of today's completion rates
    Insight,
    /// Free-form answer to `prompt`, e.g. a checklist or grocery list
    Generate,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct SuggestParams {
    pub kind: SuggestKind,
    pub prompt: Option<String>,
}

pub async fn suggest<P: SuggestionProvider>(
    session: &Session,
    suggestions: &Suggestions<P>,
    params: SuggestParams,
) -> Result<String, ToolError> {
    session.check_quota(Feature::AiAssistant)?;
    let state = session.state();

    let text = match params.kind {
        SuggestKind::Tasks => {
            let open: Vec<&str> = state
                .tasks
                .iter()
                .filter(|t| !t.completed)
                .map(|t| t.text.as_str())
                .collect();
            bullets("💡 Task ideas", suggestions.tasks(&open.join("; ")).await)
        }
        SuggestKind::Habits => {
            let names: Vec<&str> = state.habits.iter().map(|h| h.name.as_str()).collect();
            bullets("🌱 Habit ideas", suggestions.habits(&names.join("; ")).await)
        }
        SuggestKind::FocusTip => format!("🧠 {}", suggestions.focus_tip().await),
        SuggestKind::Insight => {
            let today = session.now().today;
            format!("📈 {}", suggestions.insight(&state.tasks, &state.habits, today).await)
        }
        SuggestKind::Generate => {
            let prompt = params.prompt.unwrap_or_default();
            if prompt.trim().is_empty() {
                return Err(crate::domain::DomainError::Validation {
                    message: "generate needs a prompt".to_string(),
                }
                .into());
            }
            suggestions.generate(&prompt).await
        }
    };
    Ok(text)
}

fn bullets(title: &str, items: Vec<String>) -> String {
    let lines = items.iter().map(|i| format!("- {}", i)).collect::<Vec<_>>().join("\n");
    format!("{}\n{}", title, lines)
}
