/// Domain module containing the core entities and their validation rules
///
/// This module defines tasks, habits, user statistics with their badges,
/// achievements, challenges and rewards, the settings that drive the focus
/// timer, and the static catalogs new users start from.

pub mod catalog;
pub mod habit;
pub mod settings;
pub mod stats;
pub mod task;
pub mod types;

// Re-export public types for easy access
pub use habit::*;
pub use settings::*;
pub use stats::*;
pub use task::*;
pub use types::*;

use thiserror::Error;

/// Errors that can occur during domain operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid value: {message}")]
    InvalidValue { message: String },
}
