//! Domain types, date validation and ordering rules for ticklist tasks.

/// Due date parsing and validation.
pub mod due;
/// Identifier types.
pub mod id;
/// Task priorities.
pub mod priority;
/// Filtering and ordering.
pub mod query;

pub use crate::due::{DueDate, InvalidDate};
pub use crate::id::{InvalidTaskId, TaskId};
pub use crate::priority::{InvalidPriority, Priority};
pub use crate::query::{StatusFilter, TaskQuery, compare_tasks, sort_tasks};

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;
use time::OffsetDateTime;

/// A single to-do item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Identifier, unique within a collection.
    pub id: TaskId,
    /// Non-empty title.
    pub title: String,
    /// Importance.
    #[serde(default)]
    pub priority: Priority,
    /// Optional due date.
    #[serde(default)]
    pub due: Option<DueDate>,
    /// Completion flag.
    #[serde(default)]
    pub completed: bool,
    /// Creation timestamp.
    #[serde(with = "time::serde::rfc3339")]
    pub created: OffsetDateTime,
}

impl Task {
    /// Build an open task.
    #[must_use]
    pub fn new(
        id: TaskId,
        title: impl Into<String>,
        priority: Priority,
        due: Option<DueDate>,
        created: OffsetDateTime,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            priority,
            due,
            completed: false,
            created,
        }
    }
}

/// Violations of collection-level invariants, detected when loading persisted state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CollectionError {
    /// Two tasks share an id.
    #[error("duplicate task id {0}")]
    DuplicateId(TaskId),
    /// A task has a blank title.
    #[error("task {0} has an empty title")]
    EmptyTitle(TaskId),
}

/// Next id for `tasks`: highest id plus one, or `1` for an empty collection.
#[must_use]
pub fn next_id(tasks: &[Task]) -> TaskId {
    TaskId::next_after(tasks.iter().map(|task| task.id))
}

/// Check that ids are unique and titles non-empty.
///
/// # Errors
/// Returns the first violation found in collection order.
pub fn validate_collection(tasks: &[Task]) -> Result<(), CollectionError> {
    let mut seen = HashSet::with_capacity(tasks.len());
    for task in tasks {
        if !seen.insert(task.id) {
            return Err(CollectionError::DuplicateId(task.id));
        }
        if task.title.trim().is_empty() {
            return Err(CollectionError::EmptyTitle(task.id));
        }
    }
    Ok(())
}

/// Current UTC time truncated to whole seconds.
#[must_use]
pub fn timestamp_now() -> OffsetDateTime {
    let now = OffsetDateTime::now_utc();
    now.replace_nanosecond(0).unwrap_or(now)
}
