//! Partial updates built from raw user input.

use std::fmt;

use ticklist_core::{DueDate, InvalidDate, Priority, Task, due};
use tracing::warn;

/// Reserved edit input that removes an existing due date.
pub const DEFAULT_CLEAR_DUE_TOKEN: &str = "none";

/// Patch for the due date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuePatch {
    /// Leave the current value untouched.
    #[default]
    Keep,
    /// Remove the due date.
    Clear,
    /// Replace with a validated date.
    Set(DueDate),
}

impl DuePatch {
    /// Interpret edit input: blank keeps, `clear_token` clears, anything else
    /// must be a valid date.
    ///
    /// # Errors
    /// Returns [`InvalidDate`] when the input is neither blank, the clear
    /// token, nor a valid `YYYY-MM-DD` date.
    pub fn parse(input: &str, clear_token: &str) -> Result<Self, InvalidDate> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Ok(Self::Keep);
        }
        if trimmed.eq_ignore_ascii_case(clear_token.trim()) {
            return Ok(Self::Clear);
        }
        match due::validate(trimmed)? {
            Some(date) => Ok(Self::Set(date)),
            None => Ok(Self::Keep),
        }
    }

    fn apply(self, current: Option<DueDate>) -> Option<DueDate> {
        match self {
            Self::Keep => current,
            Self::Clear => None,
            Self::Set(date) => Some(date),
        }
    }
}

/// Recoverable input problems reported alongside a successful operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskWarning {
    /// A priority token was not recognised and `fallback` was used instead.
    InvalidPriority {
        /// Offending token.
        token: String,
        /// Priority that was applied.
        fallback: Priority,
    },
}

impl fmt::Display for TaskWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidPriority { token, fallback } => {
                write!(f, "invalid priority `{token}`; using `{fallback}`")
            }
        }
    }
}

/// Resolve a priority token for a new task: blank means `med`, invalid input
/// falls back to `med` with a warning.
pub fn priority_or_default(input: &str, warnings: &mut Vec<TaskWarning>) -> Priority {
    priority_or(input, Priority::default(), warnings).unwrap_or_default()
}

/// Resolve a priority token for an edit: blank keeps the current value
/// (`None`), invalid input keeps it too and records a warning.
pub fn priority_patch(
    input: &str,
    current: Priority,
    warnings: &mut Vec<TaskWarning>,
) -> Option<Priority> {
    priority_or(input, current, warnings)
}

fn priority_or(
    input: &str,
    fallback: Priority,
    warnings: &mut Vec<TaskWarning>,
) -> Option<Priority> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }
    match trimmed.parse::<Priority>() {
        Ok(priority) => Some(priority),
        Err(err) => {
            warn!(token = %err.token, %fallback, "Ignoring invalid priority");
            warnings.push(TaskWarning::InvalidPriority {
                token: err.token,
                fallback,
            });
            None
        }
    }
}

/// Field changes applied by an edit; `None`/`Keep` leave a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    /// Replacement title.
    pub title: Option<String>,
    /// Replacement priority.
    pub priority: Option<Priority>,
    /// Due date change.
    pub due: DuePatch,
}

impl TaskPatch {
    /// Apply the patch in place. Title, id, completion and creation time are
    /// only touched through the fields above.
    pub fn apply(self, task: &mut Task) {
        if let Some(title) = self.title {
            task.title = title;
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
        task.due = self.due.apply(task.due);
    }
}

/// Blank title input keeps the current title.
#[must_use]
pub fn title_patch(input: &str) -> Option<String> {
    let trimmed = input.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}
