/// Suggestion and insight generation
///
/// [`SuggestionProvider`] is the boundary to whatever produces free-text
/// advice. [`Suggestions`] wraps a provider with a deadline and static
/// fallbacks so callers always get an answer.

pub mod canned;
pub mod keyword;

pub use keyword::KeywordGenerator;

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;

use crate::analytics;
use crate::domain::{Habit, Task};

/// How long a provider call may take before the fallback is used
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(3);

/// Number of items every list suggestion carries
pub const LIST_LEN: usize = 3;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SuggestError {
    #[error("Suggestion provider unavailable: {0}")]
    Unavailable(String),

    #[error("Suggestion request timed out after {0:?}")]
    Timeout(Duration),
}

#[async_trait]
pub trait SuggestionProvider: Send + Sync {
    /// Free-form answer to a prompt
    async fn generate(&self, prompt: &str) -> Result<String, SuggestError>;

    async fn suggest_tasks(&self, context: &str) -> Result<Vec<String>, SuggestError>;

    async fn suggest_habits(&self, context: &str) -> Result<Vec<String>, SuggestError>;

    async fn focus_tip(&self) -> Result<String, SuggestError>;
}

/// Provider wrapper that never fails
pub struct Suggestions<P> {
    provider: P,
    timeout: Duration,
}

impl<P: SuggestionProvider> Suggestions<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub async fn generate(&self, prompt: &str) -> String {
        self.bounded(self.provider.generate(prompt))
            .await
            .unwrap_or_else(|_| canned::GENERATE_FALLBACK.to_string())
    }

    pub async fn tasks(&self, context: &str) -> Vec<String> {
        let items = self.bounded(self.provider.suggest_tasks(context)).await;
        exactly_three(items, &canned::TASK_FALLBACK)
    }

    pub async fn habits(&self, context: &str) -> Vec<String> {
        let items = self.bounded(self.provider.suggest_habits(context)).await;
        exactly_three(items, &canned::HABIT_FALLBACK)
    }

    pub async fn focus_tip(&self) -> String {
        self.bounded(self.provider.focus_tip())
            .await
            .unwrap_or_else(|_| canned::FOCUS_TIP_FALLBACK.to_string())
    }

    /// Short analysis of how the user is doing today
    pub async fn insight(&self, tasks: &[Task], habits: &[Habit], today: NaiveDate) -> String {
        let prompt = analytics::productivity_prompt(tasks, habits, today);
        self.bounded(self.provider.generate(&prompt))
            .await
            .unwrap_or_else(|_| canned::INSIGHT_FALLBACK.to_string())
    }

    /// Task ideas, habit ideas and a focus tip, requested concurrently
    pub async fn dashboard(&self, context: &str) -> (Vec<String>, Vec<String>, String) {
        futures::join!(self.tasks(context), self.habits(context), self.focus_tip())
    }

    async fn bounded<T>(
        &self,
        call: impl std::future::Future<Output = Result<T, SuggestError>>,
    ) -> Result<T, SuggestError> {
        let result = match tokio::time::timeout(self.timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(SuggestError::Timeout(self.timeout)),
        };
        if let Err(e) = &result {
            tracing::warn!("Using fallback suggestion: {}", e);
        }
        result
    }
}

/// Trim or pad to exactly [`LIST_LEN`] items, padding from the fallback
fn exactly_three(items: Result<Vec<String>, SuggestError>, fallback: &[&str]) -> Vec<String> {
    let mut items: Vec<String> = items
        .unwrap_or_default()
        .into_iter()
        .filter(|s| !s.trim().is_empty())
        .take(LIST_LEN)
        .collect();

    for extra in fallback {
        if items.len() == LIST_LEN {
            break;
        }
        if !items.iter().any(|s| s == extra) {
            items.push(extra.to_string());
        }
    }
    items
}
