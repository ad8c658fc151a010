//! In-memory notification and activity log sinks.

use async_trait::async_trait;
use std::sync::{Arc, RwLock};

use crate::board::{
    domain::{ActivityLogRecord, NotificationId, NotificationRecord, TaskId, UserId},
    ports::{ActivityLogSink, NotificationSink, SinkError, SinkResult},
};

fn lock_error(err: impl ToString) -> SinkError {
    SinkError::persistence(std::io::Error::other(err.to_string()))
}

/// Thread-safe in-memory notification inbox.
#[derive(Debug, Clone, Default)]
pub struct InMemoryNotificationSink {
    records: Arc<RwLock<Vec<NotificationRecord>>>,
}

impl InMemoryNotificationSink {
    /// Creates an empty inbox.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every delivered notification in delivery order.
    ///
    /// # Errors
    ///
    /// Returns [`SinkError::Persistence`] when the lock is poisoned.
    pub fn delivered(&self) -> SinkResult<Vec<NotificationRecord>> {
        Ok(self.records.read().map_err(lock_error)?.clone())
    }
}

#[async_trait]
impl NotificationSink for InMemoryNotificationSink {
    async fn deliver(&self, record: &NotificationRecord) -> SinkResult<()> {
        self.records.write().map_err(lock_error)?.push(record.clone());
        Ok(())
    }

    async fn list_for_user(&self, user_id: &UserId) -> SinkResult<Vec<NotificationRecord>> {
        let records = self.records.read().map_err(lock_error)?;
        // Later deliveries first; delivery order breaks timestamp ties.
        let mut inbox: Vec<NotificationRecord> = records
            .iter()
            .rev()
            .filter(|record| record.notification().target_user_id == *user_id)
            .cloned()
            .collect();
        inbox.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        Ok(inbox)
    }

    async fn mark_read(
        &self,
        id: NotificationId,
        user_id: &UserId,
    ) -> SinkResult<NotificationRecord> {
        let mut records = self.records.write().map_err(lock_error)?;
        let record = records
            .iter_mut()
            .find(|record| record.id() == id && record.notification().target_user_id == *user_id)
            .ok_or(SinkError::NotificationNotFound(id))?;
        record.mark_read();
        Ok(record.clone())
    }
}

/// Thread-safe in-memory activity log.
#[derive(Debug, Clone, Default)]
pub struct InMemoryActivityLogSink {
    records: Arc<RwLock<Vec<ActivityLogRecord>>>,
}

impl InMemoryActivityLogSink {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every recorded entry in recording order.
    ///
    /// # Errors
    ///
    /// Returns [`SinkError::Persistence`] when the lock is poisoned.
    pub fn recorded(&self) -> SinkResult<Vec<ActivityLogRecord>> {
        Ok(self.records.read().map_err(lock_error)?.clone())
    }
}

#[async_trait]
impl ActivityLogSink for InMemoryActivityLogSink {
    async fn record(&self, record: &ActivityLogRecord) -> SinkResult<()> {
        self.records.write().map_err(lock_error)?.push(record.clone());
        Ok(())
    }

    async fn list_for_entity(&self, entity_id: TaskId) -> SinkResult<Vec<ActivityLogRecord>> {
        let records = self.records.read().map_err(lock_error)?;
        Ok(records
            .iter()
            .filter(|record| record.entry().entity_id == entity_id)
            .cloned()
            .collect())
    }
}
