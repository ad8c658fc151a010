//! Conversions between board domain values and Diesel rows.

use super::models::{ActivityLogRow, NotificationRow, TaskRow};
use crate::board::domain::{
    ActivityEntry, ActivityLogRecord, BoardTask, ColumnId, Notification, NotificationId,
    NotificationRecord, PersistedBoardTaskData, TaskDetails, TaskId, TaskPlacement, TaskPriority,
    TaskStatus, UserId,
};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Failure converting between rows and domain values.
#[derive(Debug, thiserror::Error)]
pub enum RowConversionError {
    /// A stored value failed domain validation.
    #[error(transparent)]
    Domain(#[from] crate::board::domain::BoardDomainError),
    /// A stored status could not be parsed.
    #[error(transparent)]
    Status(#[from] crate::board::domain::ParseTaskStatusError),
    /// A stored priority could not be parsed.
    #[error(transparent)]
    Priority(#[from] crate::board::domain::ParseTaskPriorityError),
    /// A stored enumeration label is unknown.
    #[error("unknown stored label: {0}")]
    Label(#[from] serde_json::Error),
    /// A position does not fit the storage column.
    #[error("sort order {0} does not fit the sort_order column")]
    SortOrder(i64),
}

pub(super) fn task_to_row(task: &BoardTask) -> Result<TaskRow, RowConversionError> {
    let details = task.details();
    Ok(TaskRow {
        id: task.id().into_inner(),
        column_id: task.column_id().as_str().to_owned(),
        status: task.status().as_str().to_owned(),
        sort_order: to_db_order(task.sort_order())?,
        assignee_id: task.assignee_id().map(|id| id.as_str().to_owned()),
        created_by: task.created_by().as_str().to_owned(),
        title: details.title().to_owned(),
        description: details.description().map(str::to_owned),
        priority: details.priority().as_str().to_owned(),
        due_date: details.due_date(),
        created_at: task.created_at(),
        updated_at: task.updated_at(),
    })
}

pub(super) fn row_to_task(row: TaskRow) -> Result<BoardTask, RowConversionError> {
    let TaskRow {
        id,
        column_id,
        status,
        sort_order,
        assignee_id,
        created_by,
        title,
        description,
        priority,
        due_date,
        created_at,
        updated_at,
    } = row;

    let mut details =
        TaskDetails::new(title)?.with_priority(TaskPriority::try_from(priority.as_str())?);
    details.set_description(description);
    details.set_due_date(due_date);

    let placement = TaskPlacement {
        column_id: ColumnId::new(column_id)?,
        status: TaskStatus::try_from(status.as_str())?,
        sort_order: u32::try_from(sort_order)
            .map_err(|_| RowConversionError::SortOrder(i64::from(sort_order)))?,
    };

    Ok(BoardTask::from_persisted(PersistedBoardTaskData {
        id: TaskId::from_uuid(id),
        placement,
        assignee_id: assignee_id.map(UserId::new).transpose()?,
        created_by: UserId::new(created_by)?,
        details,
        created_at,
        updated_at,
    }))
}

pub(super) fn notification_to_row(record: &NotificationRecord) -> NotificationRow {
    let notification = record.notification();
    NotificationRow {
        id: record.id().into_inner(),
        user_id: notification.target_user_id.as_str().to_owned(),
        kind: notification.kind.as_str().to_owned(),
        title: notification.title.clone(),
        message: notification.message.clone(),
        related_entity_type: notification.related_entity_type.as_str().to_owned(),
        related_entity_id: notification.related_entity_id.into_inner(),
        is_read: record.is_read(),
        created_at: record.created_at(),
    }
}

pub(super) fn row_to_notification(
    row: NotificationRow,
) -> Result<NotificationRecord, RowConversionError> {
    let notification = Notification {
        target_user_id: UserId::new(row.user_id)?,
        kind: parse_label(row.kind)?,
        title: row.title,
        message: row.message,
        related_entity_type: parse_label(row.related_entity_type)?,
        related_entity_id: TaskId::from_uuid(row.related_entity_id),
    };
    Ok(NotificationRecord::from_persisted(
        NotificationId::from_uuid(row.id),
        notification,
        row.is_read,
        row.created_at,
    ))
}

pub(super) fn activity_to_row(record: &ActivityLogRecord) -> ActivityLogRow {
    let entry = record.entry();
    ActivityLogRow {
        id: record.id(),
        user_id: entry.acting_user_id.as_str().to_owned(),
        entity_type: entry.entity_type.as_str().to_owned(),
        entity_id: entry.entity_id.into_inner(),
        action: entry.action.as_str().to_owned(),
        changes: entry.changes.clone(),
        created_at: record.created_at(),
    }
}

pub(super) fn row_to_activity(
    row: ActivityLogRow,
) -> Result<ActivityLogRecord, RowConversionError> {
    let entry = ActivityEntry {
        acting_user_id: UserId::new(row.user_id)?,
        entity_type: parse_label(row.entity_type)?,
        entity_id: TaskId::from_uuid(row.entity_id),
        action: parse_label(row.action)?,
        changes: row.changes,
    };
    Ok(ActivityLogRecord::from_persisted(row.id, entry, row.created_at))
}

fn to_db_order(sort_order: u32) -> Result<i32, RowConversionError> {
    i32::try_from(sort_order).map_err(|_| RowConversionError::SortOrder(i64::from(sort_order)))
}

/// Parses a snake_case label through the enum's serde representation.
fn parse_label<T: DeserializeOwned>(label: String) -> Result<T, RowConversionError> {
    Ok(serde_json::from_value(Value::String(label))?)
}
