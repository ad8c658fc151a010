//! Task store port: persistence and lookup of board tasks.

use crate::board::domain::{BoardTask, ColumnId, TaskDelta, TaskId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Result type for task store operations.
pub type TaskStoreResult<T> = Result<T, TaskStoreError>;

/// Task persistence contract.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Stores a new task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::DuplicateTask`] when the task ID already
    /// exists.
    async fn store(&self, task: &BoardTask) -> TaskStoreResult<()>;

    /// Replaces an existing task with `task`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::NotFound`] when the task does not exist.
    async fn update(&self, task: &BoardTask) -> TaskStoreResult<()>;

    /// Finds a task by identifier.
    ///
    /// Returns `None` when the task does not exist.
    async fn find_by_id(&self, id: TaskId) -> TaskStoreResult<Option<BoardTask>>;

    /// Returns the tasks of a column ordered by `sort_order`.
    async fn list_by_column(&self, column_id: &ColumnId) -> TaskStoreResult<Vec<BoardTask>>;

    /// Applies a batch of move deltas as one unit.
    ///
    /// Either every delta is applied or none is. Only tasks a delta actually
    /// changes get `updated_at = at`, so applying the same batch twice
    /// leaves the store as the first application did.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::NotFound`] when a delta targets an unknown
    /// task; nothing is written in that case.
    async fn apply_delta(&self, deltas: &[TaskDelta], at: DateTime<Utc>) -> TaskStoreResult<()>;

    /// Removes a task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::NotFound`] when the task does not exist.
    async fn remove(&self, id: TaskId) -> TaskStoreResult<()>;

    /// Removes a task and applies the deltas that renumber its column, as
    /// one unit.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::NotFound`] when the task or a delta target
    /// does not exist; the task stays in place and nothing is renumbered.
    async fn remove_and_apply(
        &self,
        id: TaskId,
        deltas: &[TaskDelta],
        at: DateTime<Utc>,
    ) -> TaskStoreResult<()>;
}

/// Errors returned by task store implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskStoreError {
    /// A task with the same identifier already exists.
    #[error("duplicate task identifier: {0}")]
    DuplicateTask(TaskId),

    /// The task was not found.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskStoreError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
