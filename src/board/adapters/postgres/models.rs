//! Diesel row models for board persistence.

use super::schema::{activity_logs, board_tasks, notifications};
use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use serde_json::Value;

/// Row model for task records, used for reads, inserts and full updates.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = board_tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(treat_none_as_null = true)]
pub struct TaskRow {
    /// Task identifier.
    pub id: uuid::Uuid,
    /// Column holding the task.
    pub column_id: String,
    /// Workflow status.
    pub status: String,
    /// Position within the column.
    pub sort_order: i32,
    /// Assigned user.
    pub assignee_id: Option<String>,
    /// Creating user.
    pub created_by: String,
    /// Title.
    pub title: String,
    /// Description.
    pub description: Option<String>,
    /// Priority.
    pub priority: String,
    /// Due date.
    pub due_date: Option<NaiveDate>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Row model for notifications.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Insertable)]
#[diesel(table_name = notifications)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NotificationRow {
    /// Notification identifier.
    pub id: uuid::Uuid,
    /// Recipient.
    pub user_id: String,
    /// Category.
    pub kind: String,
    /// Heading.
    pub title: String,
    /// Body.
    pub message: String,
    /// Related entity kind.
    pub related_entity_type: String,
    /// Related entity identifier.
    pub related_entity_id: uuid::Uuid,
    /// Read flag.
    pub is_read: bool,
    /// Delivery timestamp.
    pub created_at: DateTime<Utc>,
}

/// Row model for activity log entries.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Insertable)]
#[diesel(table_name = activity_logs)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ActivityLogRow {
    /// Entry identifier.
    pub id: uuid::Uuid,
    /// Acting user.
    pub user_id: String,
    /// Entity kind.
    pub entity_type: String,
    /// Entity identifier.
    pub entity_id: uuid::Uuid,
    /// Action.
    pub action: String,
    /// Change payload.
    pub changes: Value,
    /// Recording timestamp.
    pub created_at: DateTime<Utc>,
}
