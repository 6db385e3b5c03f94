/// Habit entity and related functionality
///
/// A habit is something the user checks off once per day. Each day it is
/// checked off earns a fixed number of points and extends its streak.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{DomainError, HabitId};

/// Points earned each time a habit is checked off for a day
pub const HABIT_POINTS: i64 = 15;

/// A daily habit the user wants to keep up
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Habit {
    /// Unique identifier for the habit
    pub id: HabitId,
    /// Human-readable name, 1 to 100 characters
    pub name: String,
    /// Consecutive days completed
    pub streak: u32,
    /// Days this habit was checked off; a set, so a day can appear only once
    pub completed_dates: BTreeSet<NaiveDate>,
    /// Points credited per check-off, always [`HABIT_POINTS`]
    pub points: i64,
}

impl Habit {
    /// Create a new habit with validation
    pub fn new(id: HabitId, name: &str) -> Result<Self, DomainError> {
        let name = Self::validate_name(name)?;
        Ok(Self {
            id,
            name,
            streak: 0,
            completed_dates: BTreeSet::new(),
            points: HABIT_POINTS,
        })
    }

    /// Create a habit from existing data (used when loading from storage)
    pub fn from_existing(
        id: HabitId,
        name: String,
        streak: u32,
        completed_dates: impl IntoIterator<Item = NaiveDate>,
    ) -> Self {
        Self {
            id,
            name,
            streak,
            completed_dates: completed_dates.into_iter().collect(),
            points: HABIT_POINTS,
        }
    }

    /// Whether the habit was checked off on `date`
    pub fn is_done_on(&self, date: NaiveDate) -> bool {
        self.completed_dates.contains(&date)
    }

    /// Most recent day the habit was checked off
    pub fn last_completed(&self) -> Option<NaiveDate> {
        self.completed_dates.iter().next_back().copied()
    }

    /// Validate habit name according to business rules
    fn validate_name(name: &str) -> Result<String, DomainError> {
        let trimmed = name.trim();

        if trimmed.is_empty() {
            return Err(DomainError::Validation {
                message: "Habit name cannot be empty".to_string(),
            });
        }

        if trimmed.chars().count() > 100 {
            return Err(DomainError::Validation {
                message: "Habit name cannot be longer than 100 characters".to_string(),
            });
        }

        Ok(trimmed.to_string())
    }
}
