//! Storage seam used by [`TaskService`](crate::service::TaskService).

use ticklist_core::Task;
use ticklist_store_json::{JsonStore, JsonStoreError};

/// Minimal storage abstraction required by the task operations.
pub trait TaskStore {
    /// Error type bubbled up from the backing store.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Read the persisted collection. Absent state is an empty collection.
    ///
    /// # Errors
    /// Returns a store-specific error when existing state cannot be read.
    fn load(&self) -> Result<Vec<Task>, Self::Error>;

    /// Replace the persisted collection with `tasks`.
    ///
    /// # Errors
    /// Returns a store-specific error when persisting fails.
    fn save(&self, tasks: &[Task]) -> Result<(), Self::Error>;
}

impl TaskStore for JsonStore {
    type Error = JsonStoreError;

    fn load(&self) -> Result<Vec<Task>, Self::Error> {
        Self::load(self)
    }

    fn save(&self, tasks: &[Task]) -> Result<(), Self::Error> {
        Self::save(self, tasks)
    }
}

impl<S: TaskStore + ?Sized> TaskStore for &S {
    type Error = S::Error;

    fn load(&self) -> Result<Vec<Task>, Self::Error> {
        (**self).load()
    }

    fn save(&self, tasks: &[Task]) -> Result<(), Self::Error> {
        (**self).save(tasks)
    }
}
