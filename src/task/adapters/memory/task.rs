//! In-memory persistence gateway.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::task::{
    domain::{Task, TaskId},
    ports::{TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};

/// Thread-safe in-memory task repository.
///
/// Clones share the same underlying map, so a test can keep one clone to
/// inspect what the store persisted.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskRepository {
    tasks: Arc<RwLock<HashMap<TaskId, Task>>>,
}

impl InMemoryTaskRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a repository pre-populated with `tasks`.
    #[must_use]
    pub fn with_tasks(tasks: impl IntoIterator<Item = Task>) -> Self {
        let map = tasks.into_iter().map(|task| (task.id(), task)).collect();
        Self {
            tasks: Arc::new(RwLock::new(map)),
        }
    }

    /// Returns the stored record for `id`, if any.
    ///
    /// Returns `None` if the internal lock is poisoned.
    #[must_use]
    pub fn get(&self, id: TaskId) -> Option<Task> {
        self.tasks
            .read()
            .ok()
            .and_then(|guard| guard.get(&id).cloned())
    }

    /// Returns the number of stored records.
    ///
    /// Returns `0` if the internal lock is poisoned.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.read().map(|guard| guard.len()).unwrap_or(0)
    }

    /// Returns `true` if no records are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned(message: String) -> TaskRepositoryError {
    TaskRepositoryError::persistence(std::io::Error::other(message))
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn save(&self, task: &Task) -> TaskRepositoryResult<()> {
        let mut tasks = self
            .tasks
            .write()
            .map_err(|e| poisoned(format!("lock poisoned: {e}")))?;
        tasks.insert(task.id(), task.clone());
        Ok(())
    }

    async fn delete(&self, task: &Task) -> TaskRepositoryResult<()> {
        let mut tasks = self
            .tasks
            .write()
            .map_err(|e| poisoned(format!("lock poisoned: {e}")))?;
        tasks
            .remove(&task.id())
            .map(|_| ())
            .ok_or(TaskRepositoryError::NotFound(task.id()))
    }

    async fn load_all(&self) -> TaskRepositoryResult<Vec<Task>> {
        let tasks = self
            .tasks
            .read()
            .map_err(|e| poisoned(format!("lock poisoned: {e}")))?;
        Ok(tasks.values().cloned().collect())
    }
}
