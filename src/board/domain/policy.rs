//! Column/status policy and board configuration.
//!
//! A board is configured as data: each column optionally maps to a task
//! status and optionally carries a work-in-progress limit. The same engine
//! serves a four-lane `todo / in_progress / review / done` board and a
//! three-lane `active / processing / completed` board without code branches.

use super::{
    BoardDomainError, BoardTask, ColumnDefinition, ColumnId, MoveIntent, MovePlan, TaskStatus,
    WipLimit, reorder,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// How work-in-progress limits are treated when planning moves.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WipEnforcement {
    /// Breaches are flagged on the plan; moves are never rejected.
    #[default]
    Advisory,
    /// Cross-column moves that would overrun a limit are rejected.
    Strict,
}

/// A column holding more tasks than its limit allows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WipBreach {
    /// Overrun column.
    pub column: ColumnId,
    /// Configured limit.
    pub limit: WipLimit,
    /// Task count in the column.
    pub count: usize,
}

/// Errors returned while loading a board configuration.
#[derive(Debug, Error)]
pub enum BoardConfigError {
    /// The document is not valid configuration JSON.
    #[error("failed to parse board configuration: {0}")]
    Parse(#[from] serde_json::Error),

    /// The document parsed but describes an invalid board.
    #[error("invalid board configuration: {0}")]
    Invalid(#[from] BoardDomainError),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawBoardConfiguration {
    columns: Vec<ColumnDefinition>,
    #[serde(default)]
    wip_enforcement: WipEnforcement,
}

/// Static column layout, status mapping and WIP policy of one board.
///
/// # Examples
///
/// ```
/// use mondrian::board::domain::{BoardConfiguration, ColumnId, TaskStatus};
///
/// let board = BoardConfiguration::three_lane();
/// let processing = ColumnId::new("processing").expect("valid column id");
/// assert_eq!(board.derive_status(&processing), Some(TaskStatus::InProgress));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawBoardConfiguration", into = "RawBoardConfiguration")]
pub struct BoardConfiguration {
    columns: Vec<ColumnDefinition>,
    wip_enforcement: WipEnforcement,
}

impl BoardConfiguration {
    /// Creates a validated advisory board from its columns.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::EmptyBoard`] for an empty column list and
    /// [`BoardDomainError::DuplicateColumn`] when two columns share an id.
    pub fn new(columns: Vec<ColumnDefinition>) -> Result<Self, BoardDomainError> {
        if columns.is_empty() {
            return Err(BoardDomainError::EmptyBoard);
        }
        let mut seen = HashSet::with_capacity(columns.len());
        for column in &columns {
            if !seen.insert(column.id()) {
                return Err(BoardDomainError::DuplicateColumn(column.id().clone()));
            }
        }
        Ok(Self {
            columns,
            wip_enforcement: WipEnforcement::Advisory,
        })
    }

    /// Sets how WIP limits are enforced.
    #[must_use]
    pub const fn with_wip_enforcement(mut self, enforcement: WipEnforcement) -> Self {
        self.wip_enforcement = enforcement;
        self
    }

    /// Loads a board from a JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`BoardConfigError::Parse`] for malformed JSON and
    /// [`BoardConfigError::Invalid`] when the columns fail validation.
    pub fn from_json_str(document: &str) -> Result<Self, BoardConfigError> {
        let raw: RawBoardConfiguration = serde_json::from_str(document)?;
        Ok(Self::try_from(raw)?)
    }

    /// Four-lane software board: `todo`, `in_progress` (limit 3), `review`
    /// (limit 2) and `done`.
    #[must_use]
    pub fn four_lane() -> Self {
        Self {
            columns: vec![
                preset_column("todo", "To Do", 1, TaskStatus::Todo, None),
                preset_column("in_progress", "In Progress", 2, TaskStatus::InProgress, Some(3)),
                preset_column("review", "Review", 3, TaskStatus::Review, Some(2)),
                preset_column("done", "Done", 4, TaskStatus::Done, None),
            ],
            wip_enforcement: WipEnforcement::Advisory,
        }
    }

    /// Three-lane task board: `active`, `processing` (limit 5) and
    /// `completed`, mapped to todo, in progress and done.
    #[must_use]
    pub fn three_lane() -> Self {
        Self {
            columns: vec![
                preset_column("active", "Active Tasks", 1, TaskStatus::Todo, None),
                preset_column(
                    "processing",
                    "Processing Tasks",
                    2,
                    TaskStatus::InProgress,
                    Some(5),
                ),
                preset_column("completed", "Completed Tasks", 3, TaskStatus::Done, None),
            ],
            wip_enforcement: WipEnforcement::Advisory,
        }
    }

    /// Returns the columns in configuration order.
    #[must_use]
    pub fn columns(&self) -> &[ColumnDefinition] {
        &self.columns
    }

    /// Returns the columns in display order.
    #[must_use]
    pub fn ordered_columns(&self) -> Vec<&ColumnDefinition> {
        let mut ordered: Vec<&ColumnDefinition> = self.columns.iter().collect();
        ordered.sort_by_key(|column| column.sort_order());
        ordered
    }

    /// Returns the WIP enforcement mode.
    #[must_use]
    pub const fn wip_enforcement(&self) -> WipEnforcement {
        self.wip_enforcement
    }

    /// Looks up a column by identifier.
    #[must_use]
    pub fn column(&self, id: &ColumnId) -> Option<&ColumnDefinition> {
        self.columns.iter().find(|column| column.id() == id)
    }

    /// Returns whether the board has a column with this identifier.
    #[must_use]
    pub fn contains_column(&self, id: &ColumnId) -> bool {
        self.column(id).is_some()
    }

    /// Returns the status mapped to a column.
    ///
    /// Unmapped and unknown columns are status-neutral and return `None`.
    #[must_use]
    pub fn derive_status(&self, id: &ColumnId) -> Option<TaskStatus> {
        self.column(id).and_then(ColumnDefinition::status)
    }

    /// Returns whether `count_after_move` tasks overrun the column's limit.
    ///
    /// Columns without a limit, and unknown columns, are never exceeded.
    #[must_use]
    pub fn is_wip_exceeded(&self, id: &ColumnId, count_after_move: usize) -> bool {
        self.column(id)
            .and_then(ColumnDefinition::wip_limit)
            .is_some_and(|limit| limit.is_exceeded_by(count_after_move))
    }

    /// Plans a move: orders the affected columns, derives the moved task's
    /// status for cross-column moves and checks the destination limit.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::InvalidColumnReference`] when the
    /// destination is not on this board,
    /// [`BoardDomainError::InvalidTaskReference`] when the task is not in
    /// `tasks`, and [`BoardDomainError::WipLimitExceeded`] on a strict board
    /// when a cross-column move would overrun the destination.
    pub fn plan_move(
        &self,
        tasks: &[BoardTask],
        intent: &MoveIntent,
    ) -> Result<MovePlan, BoardDomainError> {
        let destination = self
            .column(&intent.destination)
            .ok_or_else(|| BoardDomainError::InvalidColumnReference(intent.destination.clone()))?;
        let mut plan = reorder(tasks, intent.task_id, destination.id(), intent.index)?;

        if plan.is_cross_column() {
            let current = tasks
                .iter()
                .find(|task| task.id() == intent.task_id)
                .map(BoardTask::status);
            if let Some(status) = destination.status()
                && current != Some(status)
            {
                plan.record_status(status);
            }
        }

        if let Some(limit) = destination.wip_limit()
            && limit.is_exceeded_by(plan.destination_count())
        {
            if plan.is_cross_column() && self.wip_enforcement == WipEnforcement::Strict {
                return Err(BoardDomainError::WipLimitExceeded {
                    column: destination.id().clone(),
                    limit: limit.value(),
                    count: plan.destination_count(),
                });
            }
            plan.record_wip_breach(WipBreach {
                column: destination.id().clone(),
                limit,
                count: plan.destination_count(),
            });
        }

        Ok(plan)
    }
}

impl TryFrom<RawBoardConfiguration> for BoardConfiguration {
    type Error = BoardDomainError;

    fn try_from(raw: RawBoardConfiguration) -> Result<Self, Self::Error> {
        Ok(Self::new(raw.columns)?.with_wip_enforcement(raw.wip_enforcement))
    }
}

impl From<BoardConfiguration> for RawBoardConfiguration {
    fn from(board: BoardConfiguration) -> Self {
        Self {
            columns: board.columns,
            wip_enforcement: board.wip_enforcement,
        }
    }
}

fn preset_column(
    id: &'static str,
    name: &str,
    sort_order: u32,
    status: TaskStatus,
    wip_limit: Option<u32>,
) -> ColumnDefinition {
    let column = ColumnDefinition::new(ColumnId::preset(id), name, sort_order).with_status(status);
    match wip_limit.map(WipLimit::new) {
        Some(Ok(limit)) => column.with_wip_limit(limit),
        _ => column,
    }
}
