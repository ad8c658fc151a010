//! In-memory task store for tests and embedding.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::board::{
    domain::{BoardTask, ColumnId, TaskDelta, TaskId},
    ports::{TaskStore, TaskStoreError, TaskStoreResult},
};

/// Thread-safe in-memory task store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskStore {
    state: Arc<RwLock<HashMap<TaskId, BoardTask>>>,
}

impl InMemoryTaskStore {
    /// Creates an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(err: impl ToString) -> TaskStoreError {
    TaskStoreError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl TaskStore for InMemoryTaskStore {
    async fn store(&self, task: &BoardTask) -> TaskStoreResult<()> {
        let mut tasks = self.state.write().map_err(lock_error)?;
        if tasks.contains_key(&task.id()) {
            return Err(TaskStoreError::DuplicateTask(task.id()));
        }
        tasks.insert(task.id(), task.clone());
        Ok(())
    }

    async fn update(&self, task: &BoardTask) -> TaskStoreResult<()> {
        let mut tasks = self.state.write().map_err(lock_error)?;
        let slot = tasks
            .get_mut(&task.id())
            .ok_or(TaskStoreError::NotFound(task.id()))?;
        *slot = task.clone();
        Ok(())
    }

    async fn find_by_id(&self, id: TaskId) -> TaskStoreResult<Option<BoardTask>> {
        let tasks = self.state.read().map_err(lock_error)?;
        Ok(tasks.get(&id).cloned())
    }

    async fn list_by_column(&self, column_id: &ColumnId) -> TaskStoreResult<Vec<BoardTask>> {
        let tasks = self.state.read().map_err(lock_error)?;
        let mut lane: Vec<BoardTask> = tasks
            .values()
            .filter(|task| task.column_id() == column_id)
            .cloned()
            .collect();
        // Ties: newest first.
        lane.sort_by(|a, b| {
            a.sort_order()
                .cmp(&b.sort_order())
                .then_with(|| b.created_at().cmp(&a.created_at()))
                .then_with(|| a.id().cmp(&b.id()))
        });
        Ok(lane)
    }

    async fn apply_delta(&self, deltas: &[TaskDelta], at: DateTime<Utc>) -> TaskStoreResult<()> {
        let mut tasks = self.state.write().map_err(lock_error)?;
        check_targets(&tasks, deltas)?;
        apply_all(&mut tasks, deltas, at);
        Ok(())
    }

    async fn remove(&self, id: TaskId) -> TaskStoreResult<()> {
        let mut tasks = self.state.write().map_err(lock_error)?;
        tasks
            .remove(&id)
            .map(|_| ())
            .ok_or(TaskStoreError::NotFound(id))
    }

    async fn remove_and_apply(
        &self,
        id: TaskId,
        deltas: &[TaskDelta],
        at: DateTime<Utc>,
    ) -> TaskStoreResult<()> {
        let mut tasks = self.state.write().map_err(lock_error)?;
        if !tasks.contains_key(&id) {
            return Err(TaskStoreError::NotFound(id));
        }
        if let Some(removed) = deltas.iter().find(|delta| delta.id() == id) {
            return Err(TaskStoreError::NotFound(removed.id()));
        }
        check_targets(&tasks, deltas)?;
        tasks.remove(&id);
        apply_all(&mut tasks, deltas, at);
        Ok(())
    }
}

/// Fails when any delta targets an unknown task, before anything is written.
fn check_targets(
    tasks: &HashMap<TaskId, BoardTask>,
    deltas: &[TaskDelta],
) -> TaskStoreResult<()> {
    deltas
        .iter()
        .find(|delta| !tasks.contains_key(&delta.id()))
        .map_or(Ok(()), |missing| Err(TaskStoreError::NotFound(missing.id())))
}

fn apply_all(tasks: &mut HashMap<TaskId, BoardTask>, deltas: &[TaskDelta], at: DateTime<Utc>) {
    for delta in deltas {
        if let Some(task) = tasks.get_mut(&delta.id()) {
            task.apply_delta(delta, at);
        }
    }
}
