//! Error types for board domain validation and parsing.

use super::{ColumnId, TaskId};
use thiserror::Error;

/// Errors returned by board domain operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BoardDomainError {
    /// The moved task is not part of the supplied task set.
    #[error("task {0} is not on the board")]
    InvalidTaskReference(TaskId),

    /// The destination column is not part of the board configuration.
    #[error("column {0} is not configured on the board")]
    InvalidColumnReference(ColumnId),

    /// A strict board rejected a move that would overrun a column limit.
    #[error("column {column} allows {limit} tasks, move would leave {count}")]
    WipLimitExceeded {
        /// Destination column.
        column: ColumnId,
        /// Configured work-in-progress limit.
        limit: u32,
        /// Task count the move would have produced.
        count: usize,
    },

    /// A column identifier was empty after trimming.
    #[error("column identifier must not be empty")]
    EmptyColumnId,

    /// A user reference was empty after trimming.
    #[error("user identifier must not be empty")]
    EmptyUserId,

    /// A task title was empty after trimming.
    #[error("task title must not be empty")]
    EmptyTaskTitle,

    /// A work-in-progress limit of zero was configured.
    #[error("work-in-progress limit must be a positive integer")]
    InvalidWipLimit,

    /// Two columns share an identifier.
    #[error("column {0} is configured more than once")]
    DuplicateColumn(ColumnId),

    /// A board configuration contained no columns.
    #[error("board configuration must define at least one column")]
    EmptyBoard,
}

/// Error returned while parsing task statuses from persistence or input.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status: {0}")]
pub struct ParseTaskStatusError(pub String);

/// Error returned while parsing task priorities from persistence or input.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task priority: {0}")]
pub struct ParseTaskPriorityError(pub String);
