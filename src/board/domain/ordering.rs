//! Kanban ordering engine.
//!
//! Turns a single move intent into the minimal set of per-task deltas that
//! keeps every touched column numbered `0..len` without gaps or duplicates.
//! The engine is pure: it reads a task slice and returns deltas, leaving the
//! slice untouched.

use super::{BoardDomainError, BoardTask, ColumnId, TaskId, TaskStatus, WipBreach};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Request to move one task to a column position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveIntent {
    /// Task being moved.
    pub task_id: TaskId,
    /// Column receiving the task.
    pub destination: ColumnId,
    /// Requested position in the destination; clamped to the column length.
    pub index: usize,
}

impl MoveIntent {
    /// Creates a move intent.
    #[must_use]
    pub const fn new(task_id: TaskId, destination: ColumnId, index: usize) -> Self {
        Self {
            task_id,
            destination,
            index,
        }
    }
}

/// Partial update for a single task produced by a move.
///
/// Fields hold absolute values, so applying the same delta twice leaves the
/// task unchanged the second time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDelta {
    id: TaskId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    column_id: Option<ColumnId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    status: Option<TaskStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    sort_order: Option<u32>,
}

impl TaskDelta {
    /// Creates an empty delta for a task.
    #[must_use]
    pub const fn new(id: TaskId) -> Self {
        Self {
            id,
            column_id: None,
            status: None,
            sort_order: None,
        }
    }

    /// Sets the destination column.
    #[must_use]
    pub fn with_column(mut self, column_id: ColumnId) -> Self {
        self.column_id = Some(column_id);
        self
    }

    /// Sets the resulting status.
    #[must_use]
    pub const fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Sets the resulting position.
    #[must_use]
    pub const fn with_sort_order(mut self, sort_order: u32) -> Self {
        self.sort_order = Some(sort_order);
        self
    }

    /// Returns the target task.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the new column, if it changes.
    #[must_use]
    pub const fn column_id(&self) -> Option<&ColumnId> {
        self.column_id.as_ref()
    }

    /// Returns the new status, if it changes.
    #[must_use]
    pub const fn status(&self) -> Option<TaskStatus> {
        self.status
    }

    /// Returns the new position, if it changes.
    #[must_use]
    pub const fn sort_order(&self) -> Option<u32> {
        self.sort_order
    }

    /// Returns whether the delta changes nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.column_id.is_none() && self.status.is_none() && self.sort_order.is_none()
    }

    /// Applies the delta to `task`, stamping it with `at` when it changes.
    ///
    /// Deltas hold absolute values, so applying one twice changes nothing
    /// the second time. Returns whether the task changed.
    pub fn apply_to(&self, task: &mut BoardTask, at: DateTime<Utc>) -> bool {
        task.apply_delta(self, at)
    }
}

/// Result of planning a move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovePlan {
    moved: TaskId,
    origin: ColumnId,
    destination: ColumnId,
    index: usize,
    destination_count: usize,
    deltas: Vec<TaskDelta>,
    wip_breach: Option<WipBreach>,
}

impl MovePlan {
    /// Returns the moved task.
    #[must_use]
    pub const fn moved(&self) -> TaskId {
        self.moved
    }

    /// Returns the column the task left.
    #[must_use]
    pub const fn origin(&self) -> &ColumnId {
        &self.origin
    }

    /// Returns the column the task lands in.
    #[must_use]
    pub const fn destination(&self) -> &ColumnId {
        &self.destination
    }

    /// Returns the clamped destination index.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Returns the destination column size after the move.
    #[must_use]
    pub const fn destination_count(&self) -> usize {
        self.destination_count
    }

    /// Returns whether the task changes column.
    #[must_use]
    pub fn is_cross_column(&self) -> bool {
        self.origin != self.destination
    }

    /// Returns the per-task deltas: origin column first, then destination,
    /// each in column order.
    #[must_use]
    pub fn deltas(&self) -> &[TaskDelta] {
        &self.deltas
    }

    /// Consumes the plan, returning its deltas.
    #[must_use]
    pub fn into_deltas(self) -> Vec<TaskDelta> {
        self.deltas
    }

    /// Returns whether the move changes nothing.
    #[must_use]
    pub const fn is_noop(&self) -> bool {
        self.deltas.is_empty()
    }

    /// Returns the destination WIP breach flagged by the board policy.
    #[must_use]
    pub const fn wip_breach(&self) -> Option<&WipBreach> {
        self.wip_breach.as_ref()
    }

    /// Returns the delta for the moved task, if it changes.
    #[must_use]
    pub fn moved_delta(&self) -> Option<&TaskDelta> {
        self.deltas.iter().find(|delta| delta.id == self.moved)
    }

    /// Returns updated copies of `tasks` with every delta applied.
    ///
    /// Tasks without a delta are copied unchanged, in input order.
    #[must_use]
    pub fn apply_to(&self, tasks: &[BoardTask], at: DateTime<Utc>) -> Vec<BoardTask> {
        tasks
            .iter()
            .map(|task| {
                let mut updated = task.clone();
                if let Some(delta) = self.deltas.iter().find(|delta| delta.id == task.id()) {
                    updated.apply_delta(delta, at);
                }
                updated
            })
            .collect()
    }

    pub(super) fn record_status(&mut self, status: TaskStatus) {
        if let Some(delta) = self.deltas.iter_mut().find(|delta| delta.id == self.moved) {
            delta.status = Some(status);
            return;
        }
        self.deltas.push(TaskDelta::new(self.moved).with_status(status));
    }

    pub(super) fn record_wip_breach(&mut self, breach: WipBreach) {
        self.wip_breach = Some(breach);
    }
}

/// Computes the deltas for moving `moved` to `destination` at
/// `destination_index`.
///
/// Columns are read in `sort_order`; tasks sharing an order keep their input
/// order. The index is clamped to the destination length after the moved
/// task is taken out. Only tasks whose column or order changes get a delta.
///
/// # Errors
///
/// Returns [`BoardDomainError::InvalidTaskReference`] when `moved` is not in
/// `tasks`.
pub fn reorder(
    tasks: &[BoardTask],
    moved: TaskId,
    destination: &ColumnId,
    destination_index: usize,
) -> Result<MovePlan, BoardDomainError> {
    let moved_task = tasks
        .iter()
        .find(|task| task.id() == moved)
        .ok_or(BoardDomainError::InvalidTaskReference(moved))?;
    let origin = moved_task.column_id().clone();

    let mut destination_lane = column_lane(tasks, destination, moved);
    let index = destination_index.min(destination_lane.len());
    destination_lane.insert(index, moved_task);

    let mut deltas = Vec::new();
    if origin != *destination {
        let origin_lane = column_lane(tasks, &origin, moved);
        deltas.extend(renumber(&origin_lane, &origin));
    }
    deltas.extend(renumber(&destination_lane, destination));

    Ok(MovePlan {
        moved,
        origin,
        destination: destination.clone(),
        index,
        destination_count: destination_lane.len(),
        deltas,
        wip_breach: None,
    })
}

/// Returns the tasks of `column` in display order, without `excluded`.
fn column_lane<'a>(
    tasks: &'a [BoardTask],
    column: &ColumnId,
    excluded: TaskId,
) -> Vec<&'a BoardTask> {
    let mut lane: Vec<&BoardTask> = tasks
        .iter()
        .filter(|task| task.column_id() == column && task.id() != excluded)
        .collect();
    // Stable: equal orders keep input order.
    lane.sort_by_key(|task| task.sort_order());
    lane
}

fn renumber(lane: &[&BoardTask], column: &ColumnId) -> Vec<TaskDelta> {
    lane.iter()
        .zip(0_u32..)
        .filter_map(|(task, position)| {
            let mut delta = TaskDelta::new(task.id());
            if task.column_id() != column {
                delta.column_id = Some(column.clone());
            }
            if task.sort_order() != position {
                delta.sort_order = Some(position);
            }
            (!delta.is_empty()).then_some(delta)
        })
        .collect()
}

/// Computes the deltas that close the gap left by removing `removed` from
/// its column.
///
/// # Errors
///
/// Returns [`BoardDomainError::InvalidTaskReference`] when `removed` is not
/// in `tasks`.
pub fn close_gap(
    tasks: &[BoardTask],
    removed: TaskId,
) -> Result<Vec<TaskDelta>, BoardDomainError> {
    let removed_task = tasks
        .iter()
        .find(|task| task.id() == removed)
        .ok_or(BoardDomainError::InvalidTaskReference(removed))?;
    let column = removed_task.column_id();
    Ok(renumber(&column_lane(tasks, column, removed), column))
}
