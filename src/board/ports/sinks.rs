//! Sink ports receiving notifications and activity log entries.

use crate::board::domain::{
    ActivityLogRecord, NotificationId, NotificationRecord, TaskId, UserId,
};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for sink operations.
pub type SinkResult<T> = Result<T, SinkError>;

/// Destination for user notifications.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Delivers a notification to its recipient.
    async fn deliver(&self, record: &NotificationRecord) -> SinkResult<()>;

    /// Returns a user's notifications, newest first.
    async fn list_for_user(&self, user_id: &UserId) -> SinkResult<Vec<NotificationRecord>>;

    /// Marks one of a user's notifications as read and returns it.
    ///
    /// # Errors
    ///
    /// Returns [`SinkError::NotificationNotFound`] when the notification does
    /// not exist or belongs to another user.
    async fn mark_read(
        &self,
        id: NotificationId,
        user_id: &UserId,
    ) -> SinkResult<NotificationRecord>;
}

/// Destination for activity log entries.
#[async_trait]
pub trait ActivityLogSink: Send + Sync {
    /// Appends an entry to the log.
    async fn record(&self, record: &ActivityLogRecord) -> SinkResult<()>;

    /// Returns the entries for a task, oldest first.
    async fn list_for_entity(&self, entity_id: TaskId) -> SinkResult<Vec<ActivityLogRecord>>;
}

/// Errors returned by sink implementations.
#[derive(Debug, Clone, Error)]
pub enum SinkError {
    /// The notification does not exist for the requesting user.
    #[error("notification not found: {0}")]
    NotificationNotFound(NotificationId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl SinkError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
