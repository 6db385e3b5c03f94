/// Plan-tier feature limits
///
/// Quotas are checked by the caller before a mutator runs; the mutators
/// themselves never consult the plan.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::DomainError;

/// Subscription tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Plan {
    #[default]
    Free,
    Pro,
}

impl FromStr for Plan {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "free" => Ok(Plan::Free),
            "pro" => Ok(Plan::Pro),
            other => Err(DomainError::InvalidValue {
                message: format!("Invalid plan '{}'. Valid options: free, pro", other),
            }),
        }
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Plan::Free => "free",
            Plan::Pro => "pro",
        })
    }
}

/// Something a plan can cap or withhold
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feature {
    Tasks,
    Habits,
    /// Focus phases completed in the current timer run
    FocusSessions,
    /// Challenges joined at once
    Challenges,
    AiAssistant,
    CustomThemes,
}

impl Feature {
    pub fn label(&self) -> &'static str {
        match self {
            Feature::Tasks => "Task Management",
            Feature::Habits => "Habit Tracking",
            Feature::FocusSessions => "Focus Sessions",
            Feature::Challenges => "Challenges",
            Feature::AiAssistant => "AI Assistant",
            Feature::CustomThemes => "Custom Themes",
        }
    }
}

/// How much of a feature a plan allows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Limit {
    Count(usize),
    Unlimited,
    Unavailable,
}

impl Plan {
    pub fn limit(&self, feature: Feature) -> Limit {
        match (self, feature) {
            (Plan::Pro, _) => Limit::Unlimited,
            (Plan::Free, Feature::Tasks) => Limit::Count(20),
            (Plan::Free, Feature::Habits) => Limit::Count(5),
            (Plan::Free, Feature::FocusSessions) => Limit::Count(5),
            (Plan::Free, Feature::Challenges) => Limit::Count(1),
            (Plan::Free, Feature::AiAssistant | Feature::CustomThemes) => Limit::Unavailable,
        }
    }

    /// Whether `current` existing items already use up the allowance
    pub fn has_reached_limit(&self, feature: Feature, current: usize) -> bool {
        match self.limit(feature) {
            Limit::Count(max) => current >= max,
            Limit::Unlimited => false,
            Limit::Unavailable => true,
        }
    }
}

/// Signalled to the caller instead of running a mutator
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{} is limited on the {plan} plan; upgrade to pro for more", .feature.label())]
pub struct QuotaExceeded {
    pub feature: Feature,
    pub plan: Plan,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_free_limits() {
        let plan = Plan::Free;
        assert!(!plan.has_reached_limit(Feature::Tasks, 19));
        assert!(plan.has_reached_limit(Feature::Tasks, 20));
        assert!(plan.has_reached_limit(Feature::Habits, 5));
        assert!(plan.has_reached_limit(Feature::AiAssistant, 0));
    }

    #[test]
    fn test_pro_is_unlimited() {
        assert!(!Plan::Pro.has_reached_limit(Feature::Tasks, 10_000));
        assert!(!Plan::Pro.has_reached_limit(Feature::AiAssistant, 0));
    }

    #[test]
    fn test_error_message() {
        let err = QuotaExceeded {
            feature: Feature::Habits,
            plan: Plan::Free,
        };
        assert_eq!(err.to_string(), "Habit Tracking is limited on the free plan; upgrade to pro for more");
    }
}
