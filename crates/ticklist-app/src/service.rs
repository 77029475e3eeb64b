use std::error::Error as StdError;

use thiserror::Error;
use ticklist_core::due::validate as validate_due;
use ticklist_core::{InvalidDate, Task, TaskId, TaskQuery, next_id, timestamp_now};
use tracing::{debug, info};

use crate::task_patch::{
    DEFAULT_CLEAR_DUE_TOKEN, DuePatch, TaskPatch, TaskWarning, priority_or_default, priority_patch,
    title_patch,
};
use crate::task_store::TaskStore;

/// Failures reported by task operations.
#[derive(Debug, Error)]
pub enum TaskError {
    /// A new task needs a title.
    #[error("title must not be empty")]
    EmptyTitle,
    /// Due date input was not a valid date.
    #[error(transparent)]
    InvalidDate(#[from] InvalidDate),
    /// No task carries the requested id.
    #[error("task {0} not found")]
    NotFound(TaskId),
    /// Loading or saving the collection failed.
    #[error("task storage unavailable")]
    PersistenceUnavailable {
        /// Store-specific cause.
        #[source]
        source: Box<dyn StdError + Send + Sync + 'static>,
    },
}

impl TaskError {
    fn persistence<E>(err: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self::PersistenceUnavailable {
            source: Box::new(err),
        }
    }
}

/// Service façade that owns the task collection and its store.
///
/// The collection is loaded once by [`TaskService::open`]. Every mutation is
/// staged on a copy, saved in full, and only then becomes visible.
pub struct TaskService<S> {
    store: S,
    tasks: Vec<Task>,
    clear_due_token: String,
}

impl<S> TaskService<S> {
    /// Every task in storage order.
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Look up a task by id.
    #[must_use]
    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    /// Filtered tasks in display order.
    #[must_use]
    pub fn list(&self, query: &TaskQuery) -> Vec<Task> {
        query.apply(&self.tasks)
    }

    /// Id the next added task will receive.
    #[must_use]
    pub fn next_id(&self) -> TaskId {
        next_id(&self.tasks)
    }

    /// Token that clears a due date when editing.
    #[must_use]
    pub fn clear_due_token(&self) -> &str {
        &self.clear_due_token
    }

    /// Replace the clear token (blank input keeps the current one).
    #[must_use]
    pub fn with_clear_due_token(mut self, token: impl Into<String>) -> Self {
        let token = token.into();
        if !token.trim().is_empty() {
            self.clear_due_token = token.trim().to_owned();
        }
        self
    }

    fn position(&self, id: TaskId) -> Result<usize, TaskError> {
        self.tasks
            .iter()
            .position(|task| task.id == id)
            .ok_or(TaskError::NotFound(id))
    }
}

impl<S: TaskStore> TaskService<S> {
    /// Load the collection from `store`.
    ///
    /// # Errors
    /// Returns [`TaskError::PersistenceUnavailable`] when existing state cannot be read.
    pub fn open(store: S) -> Result<Self, TaskError> {
        let tasks = store.load().map_err(TaskError::persistence)?;
        debug!(count = tasks.len(), "Opened task collection");
        Ok(Self {
            store,
            tasks,
            clear_due_token: DEFAULT_CLEAR_DUE_TOKEN.to_owned(),
        })
    }

    /// Create a task.
    ///
    /// # Errors
    /// Returns [`TaskError::EmptyTitle`] or [`TaskError::InvalidDate`] without
    /// touching state, or [`TaskError::PersistenceUnavailable`] if saving fails.
    pub fn add(&mut self, input: AddTaskInput) -> Result<AddTaskOutput, TaskError> {
        let AddTaskInput {
            title,
            priority,
            due,
        } = input;

        let title = title_patch(&title).ok_or(TaskError::EmptyTitle)?;
        let due = validate_due(&due)?;
        let mut warnings = Vec::new();
        let priority = priority_or_default(&priority, &mut warnings);

        let task = Task::new(self.next_id(), title, priority, due, timestamp_now());
        let mut next = self.tasks.clone();
        next.push(task.clone());
        self.commit(next)?;

        info!(id = %task.id, priority = %task.priority, "Added task");
        Ok(AddTaskOutput { task, warnings })
    }

    /// Update title, priority and due date of an existing task.
    ///
    /// Blank fields keep their current value; the clear token removes the due date.
    ///
    /// # Errors
    /// Returns [`TaskError::NotFound`] or [`TaskError::InvalidDate`] without
    /// touching state, or [`TaskError::PersistenceUnavailable`] if saving fails.
    pub fn edit(&mut self, input: EditTaskInput) -> Result<EditTaskOutput, TaskError> {
        let EditTaskInput {
            id,
            title,
            priority,
            due,
        } = input;

        let index = self.position(id)?;
        let current = &self.tasks[index];

        let mut warnings = Vec::new();
        let patch = TaskPatch {
            due: DuePatch::parse(&due, &self.clear_due_token)?,
            title: title_patch(&title),
            priority: priority_patch(&priority, current.priority, &mut warnings),
        };

        let mut next = self.tasks.clone();
        patch.apply(&mut next[index]);
        let task = next[index].clone();
        self.commit(next)?;

        info!(%id, "Updated task");
        Ok(EditTaskOutput { task, warnings })
    }

    /// Mark a task as completed. Completing a done task is not an error.
    ///
    /// # Errors
    /// Returns [`TaskError::NotFound`] without touching state, or
    /// [`TaskError::PersistenceUnavailable`] if saving fails.
    pub fn complete(&mut self, id: TaskId) -> Result<CompleteTaskOutput, TaskError> {
        let index = self.position(id)?;
        let already_done = self.tasks[index].completed;

        let mut next = self.tasks.clone();
        next[index].completed = true;
        let task = next[index].clone();
        self.commit(next)?;

        info!(%id, already_done, "Completed task");
        Ok(CompleteTaskOutput { task, already_done })
    }

    /// Delete a task, keeping the order of the rest.
    ///
    /// # Errors
    /// Returns [`TaskError::NotFound`] without touching state, or
    /// [`TaskError::PersistenceUnavailable`] if saving fails.
    pub fn remove(&mut self, id: TaskId) -> Result<Task, TaskError> {
        let index = self.position(id)?;

        let mut next = self.tasks.clone();
        let removed = next.remove(index);
        self.commit(next)?;

        info!(%id, "Removed task");
        Ok(removed)
    }

    fn commit(&mut self, next: Vec<Task>) -> Result<(), TaskError> {
        self.store.save(&next).map_err(TaskError::persistence)?;
        self.tasks = next;
        Ok(())
    }
}

/// Raw fields for a new task, as typed by the user.
#[derive(Debug, Clone, Default)]
pub struct AddTaskInput {
    /// Title (must not be blank).
    pub title: String,
    /// Priority token; blank means `med`.
    pub priority: String,
    /// Due date text; blank means no due date.
    pub due: String,
}

/// Result of [`TaskService::add`].
#[derive(Debug, Clone)]
pub struct AddTaskOutput {
    /// The stored task, including its new id.
    pub task: Task,
    /// Input that was corrected rather than rejected.
    pub warnings: Vec<TaskWarning>,
}

/// Raw edit fields; blank values keep the current field.
#[derive(Debug, Clone)]
pub struct EditTaskInput {
    /// Task to edit.
    pub id: TaskId,
    /// New title or blank.
    pub title: String,
    /// New priority token or blank.
    pub priority: String,
    /// New due date, the clear token, or blank.
    pub due: String,
}

impl EditTaskInput {
    /// Edit that keeps every field; set the fields to change afterwards.
    #[must_use]
    pub const fn keep_all(id: TaskId) -> Self {
        Self {
            id,
            title: String::new(),
            priority: String::new(),
            due: String::new(),
        }
    }
}

/// Result of [`TaskService::edit`].
#[derive(Debug, Clone)]
pub struct EditTaskOutput {
    /// The task after the edit.
    pub task: Task,
    /// Input that was ignored rather than rejected.
    pub warnings: Vec<TaskWarning>,
}

/// Result of [`TaskService::complete`].
#[derive(Debug, Clone)]
pub struct CompleteTaskOutput {
    /// The completed task.
    pub task: Task,
    /// Whether the task was already done before the call.
    pub already_done: bool,
}
