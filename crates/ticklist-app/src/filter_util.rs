use thiserror::Error;
use ticklist_core::query::InvalidStatusFilter;
use ticklist_core::{InvalidPriority, Priority, StatusFilter, TaskQuery};

/// Error type returned while constructing task queries from user-facing inputs.
#[derive(Debug, Error)]
pub enum FilterBuildError {
    /// Unknown status token.
    #[error(transparent)]
    InvalidStatus(#[from] InvalidStatusFilter),
    /// Unknown priority token.
    #[error(transparent)]
    InvalidPriority(#[from] InvalidPriority),
}

/// Result alias for filter construction helpers.
pub type FilterBuildResult<T> = Result<T, FilterBuildError>;

/// Builder that accepts user-facing strings and normalizes them into a [`TaskQuery`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TaskFilterBuilder {
    query: TaskQuery,
}

impl TaskFilterBuilder {
    /// Create a builder matching every task.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing query (e.g. configured defaults).
    #[must_use]
    pub const fn from_query(query: TaskQuery) -> Self {
        Self { query }
    }

    /// Configure the status clause. `None` or blank keeps the current clause.
    ///
    /// # Errors
    /// Returns an error if the token is not `all`, `open` or `done`.
    pub fn with_status(mut self, token: Option<&str>) -> FilterBuildResult<Self> {
        if let Some(token) = non_blank(token) {
            self.query.status = token.parse::<StatusFilter>()?;
        }
        Ok(self)
    }

    /// Configure the priority clause. `any`/`none` removes it; `None` or blank
    /// keeps the current clause.
    ///
    /// # Errors
    /// Returns an error if the token is not a priority or `any`/`none`.
    pub fn with_priority(mut self, token: Option<&str>) -> FilterBuildResult<Self> {
        if let Some(token) = non_blank(token) {
            self.query.priority = parse_priority_filter(token)?;
        }
        Ok(self)
    }

    /// Build the final [`TaskQuery`].
    #[must_use]
    pub const fn build(self) -> TaskQuery {
        self.query
    }
}

/// Parse a priority filter token: `any`/`none` mean "every priority".
///
/// # Errors
/// Returns an error if the token is not a priority or `any`/`none`.
pub fn parse_priority_filter(token: &str) -> Result<Option<Priority>, InvalidPriority> {
    match token.trim().to_ascii_lowercase().as_str() {
        "any" | "none" | "all" => Ok(None),
        _ => token.parse().map(Some),
    }
}

fn non_blank(token: Option<&str>) -> Option<&str> {
    token.map(str::trim).filter(|t| !t.is_empty())
}

impl FilterBuildError {
    /// Convert the error into a message that is friendly for end-users.
    #[must_use]
    pub fn describe_user_facing(&self) -> String {
        match self {
            Self::InvalidStatus(err) => {
                format!("unknown status `{}` (use all, open or done)", err.token)
            }
            Self::InvalidPriority(err) => {
                format!("unknown priority `{}` (use any, low, med or high)", err.token)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok<T, E: std::fmt::Display>(result: Result<T, E>, context: &str) -> T {
        result.unwrap_or_else(|err| panic!("{context}: {err}"))
    }

    #[test]
    fn empty_builder_matches_everything() {
        assert!(TaskFilterBuilder::new().build().is_empty());
    }

    #[test]
    fn builder_parses_tokens() {
        let builder = ok(TaskFilterBuilder::new().with_status(Some(" Open ")), "status");
        let query = ok(builder.with_priority(Some("HIGH")), "priority").build();
        assert_eq!(query.status, StatusFilter::Open);
        assert_eq!(query.priority, Some(Priority::High));
    }

    #[test]
    fn blank_or_missing_tokens_keep_defaults() {
        let defaults = TaskQuery {
            status: StatusFilter::Done,
            priority: Some(Priority::Low),
        };
        let builder = ok(TaskFilterBuilder::from_query(defaults).with_status(None), "status");
        let query = ok(builder.with_priority(Some("  ")), "priority").build();
        assert_eq!(query, defaults);
    }

    #[test]
    fn any_clears_priority_clause() {
        let defaults = TaskQuery {
            status: StatusFilter::All,
            priority: Some(Priority::Low),
        };
        let builder = TaskFilterBuilder::from_query(defaults).with_priority(Some("any"));
        let query = ok(builder, "priority").build();
        assert_eq!(query.priority, None);
        assert_eq!(parse_priority_filter("none"), Ok(None));
    }

    #[test]
    fn unknown_tokens_are_rejected() {
        let Err(err) = TaskFilterBuilder::new().with_status(Some("closed")) else {
            panic!("closed is not a status");
        };
        assert_eq!(
            err.describe_user_facing(),
            "unknown status `closed` (use all, open or done)"
        );

        let Err(err) = TaskFilterBuilder::new().with_priority(Some("urgent")) else {
            panic!("urgent is not a priority");
        };
        assert!(matches!(err, FilterBuildError::InvalidPriority(_)));
    }
}
