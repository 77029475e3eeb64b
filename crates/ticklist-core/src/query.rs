//! Filtering and ordering of task collections.

use std::cmp::Ordering;
use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Task;
use crate::due::DueDate;
use crate::priority::Priority;

/// Completion-state filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusFilter {
    /// Every task.
    #[default]
    All,
    /// Only tasks not yet completed.
    Open,
    /// Only completed tasks.
    Done,
}

/// Raised when a status filter token is unknown.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid status filter `{token}`: expected all, open or done")]
pub struct InvalidStatusFilter {
    /// Offending token.
    pub token: String,
}

impl StatusFilter {
    /// Token accepted on the command line.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Open => "open",
            Self::Done => "done",
        }
    }

    /// Whether a task with the given completion flag passes.
    #[must_use]
    pub const fn accepts(self, completed: bool) -> bool {
        match self {
            Self::All => true,
            Self::Open => !completed,
            Self::Done => completed,
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatusFilter {
    type Err = InvalidStatusFilter;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "open" => Ok(Self::Open),
            "done" => Ok(Self::Done),
            _ => Err(InvalidStatusFilter {
                token: s.trim().to_owned(),
            }),
        }
    }
}

/// Combined status and priority filter; both clauses must match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TaskQuery {
    /// Completion-state clause.
    pub status: StatusFilter,
    /// Priority clause (`None` matches every priority).
    pub priority: Option<Priority>,
}

impl TaskQuery {
    /// Query matching every task.
    #[must_use]
    pub const fn all() -> Self {
        Self {
            status: StatusFilter::All,
            priority: None,
        }
    }

    /// Returns true when the query does not restrict anything.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self.status, StatusFilter::All) && self.priority.is_none()
    }

    /// Check whether a task passes both clauses.
    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        self.status.accepts(task.completed) && self.priority.is_none_or(|p| p == task.priority)
    }

    /// Filter `tasks` and return the matches in display order.
    #[must_use]
    pub fn apply<'a, I>(&self, tasks: I) -> Vec<Task>
    where
        I: IntoIterator<Item = &'a Task>,
    {
        let mut selected: Vec<Task> = tasks
            .into_iter()
            .filter(|task| self.matches(task))
            .cloned()
            .collect();
        sort_tasks(&mut selected);
        selected
    }
}

/// Total display order: open before done, then high/med/low, then dated
/// before undated with earlier dates first, then ascending id.
#[must_use]
pub fn compare_tasks(a: &Task, b: &Task) -> Ordering {
    a.completed
        .cmp(&b.completed)
        .then_with(|| a.priority.rank().cmp(&b.priority.rank()))
        .then_with(|| compare_due(a.due, b.due))
        .then_with(|| a.id.cmp(&b.id))
}

/// Sort in place using [`compare_tasks`].
pub fn sort_tasks(tasks: &mut [Task]) {
    tasks.sort_by(compare_tasks);
}

fn compare_due(a: Option<DueDate>, b: Option<DueDate>) -> Ordering {
    match (a, b) {
        (Some(left), Some(right)) => left.cmp(&right),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::TaskId;
    use time::OffsetDateTime;

    fn task(id: u64, priority: Priority, due: Option<&str>, completed: bool) -> Task {
        let id = TaskId::new(id).unwrap_or_else(|| panic!("test ids are positive"));
        let due = due.map(|raw| {
            raw.parse::<DueDate>()
                .unwrap_or_else(|err| panic!("test dates are valid: {err}"))
        });
        let mut task = Task::new(
            id,
            format!("task {id}"),
            priority,
            due,
            OffsetDateTime::UNIX_EPOCH,
        );
        task.completed = completed;
        task
    }

    fn ids(tasks: &[Task]) -> Vec<u64> {
        tasks.iter().map(|task| task.id.get()).collect()
    }

    #[test]
    fn example_collection_orders_open_high_first() {
        let tasks = vec![
            task(1, Priority::High, Some("2024-01-10"), false),
            task(2, Priority::Low, None, false),
            task(3, Priority::High, Some("2024-01-05"), true),
        ];
        assert_eq!(ids(&TaskQuery::all().apply(&tasks)), vec![1, 2, 3]);
    }

    #[test]
    fn full_key_ordering() {
        let tasks = vec![
            task(1, Priority::Low, None, false),
            task(2, Priority::High, None, true),
            task(3, Priority::Med, Some("2024-02-01"), false),
            task(4, Priority::High, None, false),
            task(5, Priority::High, Some("2024-03-01"), false),
            task(6, Priority::High, Some("2024-01-01"), false),
            task(7, Priority::Med, Some("2024-02-01"), false),
            task(8, Priority::High, None, false),
            task(9, Priority::Low, Some("2023-12-31"), true),
        ];
        let sorted = TaskQuery::all().apply(&tasks);
        assert_eq!(ids(&sorted), vec![6, 5, 4, 8, 3, 7, 1, 2, 9]);
    }

    #[test]
    fn ordering_ignores_input_order() {
        let mut forward = vec![
            task(1, Priority::Med, None, false),
            task(2, Priority::Med, None, false),
            task(3, Priority::Med, Some("2030-01-01"), false),
        ];
        let mut backward: Vec<Task> = forward.iter().rev().cloned().collect();
        sort_tasks(&mut forward);
        sort_tasks(&mut backward);
        assert_eq!(ids(&forward), vec![3, 1, 2]);
        assert_eq!(ids(&forward), ids(&backward));
    }

    #[test]
    fn compare_is_total_on_distinct_ids() {
        let a = task(1, Priority::Med, None, false);
        let b = task(2, Priority::Med, None, false);
        assert_eq!(compare_tasks(&a, &b), Ordering::Less);
        assert_eq!(compare_tasks(&b, &a), Ordering::Greater);
        assert_eq!(compare_tasks(&a, &a), Ordering::Equal);
    }

    #[test]
    fn filters_intersect() {
        let tasks = vec![
            task(1, Priority::High, None, false),
            task(2, Priority::High, None, true),
            task(3, Priority::Low, None, false),
        ];
        let open_high = TaskQuery {
            status: StatusFilter::Open,
            priority: Some(Priority::High),
        };
        assert_eq!(ids(&open_high.apply(&tasks)), vec![1]);

        let done = TaskQuery {
            status: StatusFilter::Done,
            priority: None,
        };
        assert_eq!(ids(&done.apply(&tasks)), vec![2]);

        let done_low = TaskQuery {
            status: StatusFilter::Done,
            priority: Some(Priority::Low),
        };
        assert!(done_low.apply(&tasks).is_empty());
    }

    #[test]
    fn empty_query_is_identity_filter() {
        let tasks = vec![
            task(2, Priority::Low, None, true),
            task(1, Priority::High, None, false),
        ];
        let query = TaskQuery::default();
        assert!(query.is_empty());
        assert_eq!(query.apply(&tasks).len(), tasks.len());
    }

    #[test]
    fn status_filter_tokens() {
        assert_eq!("OPEN".parse::<StatusFilter>().ok(), Some(StatusFilter::Open));
        assert_eq!(" done".parse::<StatusFilter>().ok(), Some(StatusFilter::Done));
        assert!("closed".parse::<StatusFilter>().is_err());
    }
}
