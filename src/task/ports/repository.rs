//! Persistence gateway port: durable key-value storage of task records.

use crate::task::domain::{Task, TaskId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for task repository operations.
pub type TaskRepositoryResult<T> = Result<T, TaskRepositoryError>;

/// Task persistence contract, keyed by [`TaskId`].
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Inserts or replaces the record stored under the task's identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::Persistence`] when the record cannot be
    /// written.
    async fn save(&self, task: &Task) -> TaskRepositoryResult<()>;

    /// Removes the record stored under the task's identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when nothing is stored under
    /// the identifier, or [`TaskRepositoryError::Persistence`] on I/O failure.
    async fn delete(&self, task: &Task) -> TaskRepositoryResult<()>;

    /// Returns every stored record. Order is unspecified.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::Persistence`] when records cannot be
    /// read or decoded.
    async fn load_all(&self) -> TaskRepositoryResult<Vec<Task>>;
}

/// Errors returned by task repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskRepositoryError {
    /// No record is stored under the identifier.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
