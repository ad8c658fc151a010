//! Domain model for kanban boards.
//!
//! Holds the ordering engine, the column/status policy and the side-effect
//! dispatcher. Everything here is pure; persistence and delivery live behind
//! the ports.

mod column;
mod error;
mod events;
mod ids;
mod ordering;
mod policy;
mod records;
mod status;
mod task;

pub use column::{ColumnDefinition, WipLimit};
pub use error::{BoardDomainError, ParseTaskPriorityError, ParseTaskStatusError};
pub use events::{
    ActivityAction, ActivityEntry, BoardEvent, EntityType, FieldChange, Notification,
    NotificationKind, TaskField, compute_events, creation_events, deletion_events, field_changes,
};
pub use ids::{ColumnId, NotificationId, TaskId, UserId};
pub use ordering::{MoveIntent, MovePlan, TaskDelta, close_gap, reorder};
pub use policy::{BoardConfigError, BoardConfiguration, WipBreach, WipEnforcement};
pub use records::{ActivityLogRecord, NotificationRecord};
pub use status::{TaskPriority, TaskStatus};
pub use task::{BoardTask, PersistedBoardTaskData, TaskDetails, TaskPlacement};
