/// Deterministic suggestion provider
///
/// Routes a prompt by keyword to a canned response: grocery lists, task
/// checklists, a productivity analysis, or a generic topic list. Useful
/// offline and in tests where a real model is not available.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::suggest::{canned, SuggestError, SuggestionProvider, LIST_LEN};

/// Above this percentage a completion rate counts as strong
const STRONG_RATE: u32 = 70;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    Grocery,
    TaskList,
    Productivity,
    Generic,
}

#[derive(Debug, Default)]
pub struct KeywordGenerator {
    next_tip: AtomicUsize,
}

impl KeywordGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decide which kind of answer a prompt asks for
    pub fn classify(prompt: &str) -> RequestKind {
        let lower = prompt.to_lowercase();
        if contains_any(&lower, &["grocery", "shopping list", "food list"]) {
            RequestKind::Grocery
        } else if contains_any(&lower, &["task list", "to-do list", "checklist", "plan for"]) {
            RequestKind::TaskList
        } else if contains_any(&lower, &["productivity", "analyze my performance", "completion rate:"]) {
            RequestKind::Productivity
        } else {
            RequestKind::Generic
        }
    }

    pub fn respond(prompt: &str) -> String {
        let kind = Self::classify(prompt);
        tracing::debug!("Routing prompt as {:?}", kind);
        match kind {
            RequestKind::Grocery => grocery_list(prompt),
            RequestKind::TaskList => task_list(prompt),
            RequestKind::Productivity => productivity_analysis(prompt).to_string(),
            RequestKind::Generic => generic_list(prompt),
        }
    }
}

#[async_trait]
impl SuggestionProvider for KeywordGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, SuggestError> {
        Ok(Self::respond(prompt))
    }

    async fn suggest_tasks(&self, _context: &str) -> Result<Vec<String>, SuggestError> {
        Ok(canned::TASK_IDEAS.iter().take(LIST_LEN).map(|s| s.to_string()).collect())
    }

    async fn suggest_habits(&self, _context: &str) -> Result<Vec<String>, SuggestError> {
        Ok(canned::HABIT_IDEAS.iter().take(LIST_LEN).map(|s| s.to_string()).collect())
    }

    async fn focus_tip(&self) -> Result<String, SuggestError> {
        let n = self.next_tip.fetch_add(1, Ordering::Relaxed);
        Ok(canned::FOCUS_TIPS[n % canned::FOCUS_TIPS.len()].to_string())
    }
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}

fn grocery_list(prompt: &str) -> String {
    let lower = prompt.to_lowercase();
    let list = if lower.contains("healthy") {
        canned::GROCERY_HEALTHY
    } else if lower.contains("vegan") {
        canned::GROCERY_VEGAN
    } else if lower.contains("keto") {
        canned::GROCERY_KETO
    } else if contains_any(&lower, &["gluten-free", "gluten free"]) {
        canned::GROCERY_GLUTEN_FREE
    } else {
        canned::GROCERY_BASIC
    };
    list.to_string()
}

fn task_list(prompt: &str) -> String {
    let topic = extract_topic(prompt);
    let lower = topic.to_lowercase();

    if lower.contains("move") || lower.contains("moving") {
        return canned::MOVING_CHECKLIST.to_string();
    }
    if lower.contains("web") {
        return canned::WEBSITE_PLAN.to_string();
    }

    format!(
        "# {topic} Task List

## Planning Phase
- Define goals and objectives for {topic} (high priority)
- Research best practices for {topic}
- Create a timeline with milestones (due: next week)
- Identify necessary resources and budget

## Implementation Phase
- Start with high-priority tasks first (high priority)
- Schedule regular check-ins to monitor progress
- Document processes and decisions
- Adjust timeline as needed

## Review Phase
- Evaluate results against initial goals
- Document lessons learned
- Celebrate successes"
    )
}

fn generic_list(prompt: &str) -> String {
    let lower = prompt.to_lowercase();

    let text = if contains_any(&lower, &["meal", "recipe", "food"]) {
        canned::MEAL_PLAN
    } else if contains_any(&lower, &["exercise", "workout", "fitness"]) {
        canned::WORKOUT_PLAN
    } else if contains_any(&lower, &["travel", "vacation", "trip"]) {
        canned::TRAVEL_CHECKLIST
    } else if contains_any(&lower, &["book", "read"]) {
        canned::READING_LIST
    } else {
        let topic = extract_topic(prompt);
        return format!(
            "# {topic} List

## Essential Items
- Item 1 (high priority)
- Item 2
- Item 3 (due: next week)

## Secondary Items
- Item 4
- Item 5

## Optional Items
- Item 6"
        );
    };
    text.to_string()
}

/// Pick one of the canned analyses from the two completion rates in the prompt
pub fn productivity_analysis(prompt: &str) -> &'static str {
    let tasks = percent_after(prompt, "Task completion rate:");
    let habits = percent_after(prompt, "Habit completion rate today:");

    match (tasks, habits) {
        (Some(t), Some(h)) if t > STRONG_RATE && h > STRONG_RATE => canned::ANALYSIS_BOTH_STRONG,
        (Some(t), Some(_)) if t > STRONG_RATE => canned::ANALYSIS_TASKS_STRONG,
        (Some(_), Some(h)) if h > STRONG_RATE => canned::ANALYSIS_HABITS_STRONG,
        (Some(_), Some(_)) => canned::ANALYSIS_BOTH_WEAK,
        _ => canned::ANALYSIS_NO_METRICS,
    }
}

/// `N` from `"<label> N%"`
fn percent_after(text: &str, label: &str) -> Option<u32> {
    let start = text.find(label)? + label.len();
    let rest = text[start..].trim_start();
    let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() || !rest[digits.len()..].starts_with('%') {
        return None;
    }
    digits.parse().ok()
}

/// Subject of a request: the text after "for", "about" or "on", else the
/// words after "create a"/"make a"/..., else "Project"
pub fn extract_topic(prompt: &str) -> String {
    let lower = prompt.to_ascii_lowercase();

    for keyword in ["for", "about", "on"] {
        if let Some(start) = find_keyword(&lower, keyword) {
            let topic = cut_at_punctuation(&prompt[start..]).trim();
            if !topic.is_empty() {
                return topic.to_string();
            }
        }
    }

    const PHRASES: [&str; 5] = ["create a", "make a", "generate a", "give me a", "i need a"];
    const SKIP: [&str; 7] = ["list", "checklist", "to-do", "todo", "plan", "for", "of"];
    for phrase in PHRASES {
        let Some(pos) = lower.find(phrase) else { continue };
        let words: Vec<&str> = lower[pos + phrase.len()..]
            .split_whitespace()
            .skip_while(|w| SKIP.contains(w))
            .collect();
        let topic = cut_at_punctuation(&words.join(" ")).trim().to_string();
        if !topic.is_empty() {
            return topic;
        }
    }

    "Project".to_string()
}

/// Byte offset of the text following `keyword` as a whole word plus whitespace
fn find_keyword(lower: &str, keyword: &str) -> Option<usize> {
    lower.match_indices(keyword).find_map(|(i, _)| {
        let starts_word = lower[..i].chars().next_back().map_or(true, |c| !c.is_alphanumeric());
        let rest = &lower[i + keyword.len()..];
        let gap = rest.len() - rest.trim_start().len();
        (starts_word && gap > 0).then_some(i + keyword.len() + gap)
    })
}

fn cut_at_punctuation(text: &str) -> &str {
    text.find(&['.', ',', '?', '!'][..]).map_or(text, |end| &text[..end])
}
