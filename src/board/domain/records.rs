//! Stored forms of notifications and activity entries.

use super::{ActivityEntry, Notification, NotificationId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A notification as delivered to a user's inbox.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationRecord {
    id: NotificationId,
    notification: Notification,
    is_read: bool,
    created_at: DateTime<Utc>,
}

impl NotificationRecord {
    /// Stamps an unread notification with a new id and the current time.
    #[must_use]
    pub fn new(notification: Notification, clock: &impl Clock) -> Self {
        Self {
            id: NotificationId::new(),
            notification,
            is_read: false,
            created_at: clock.utc(),
        }
    }

    /// Reconstructs a notification from persisted storage.
    #[must_use]
    pub const fn from_persisted(
        id: NotificationId,
        notification: Notification,
        is_read: bool,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            notification,
            is_read,
            created_at,
        }
    }

    /// Returns the notification identifier.
    #[must_use]
    pub const fn id(&self) -> NotificationId {
        self.id
    }

    /// Returns the notification content.
    #[must_use]
    pub const fn notification(&self) -> &Notification {
        &self.notification
    }

    /// Returns whether the recipient has read the notification.
    #[must_use]
    pub const fn is_read(&self) -> bool {
        self.is_read
    }

    /// Returns the delivery timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Marks the notification as read.
    #[expect(
        clippy::missing_const_for_fn,
        reason = "&mut self methods cannot be const in stable Rust"
    )]
    pub fn mark_read(&mut self) {
        self.is_read = true;
    }
}

/// An activity entry as written to the audit log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityLogRecord {
    id: Uuid,
    entry: ActivityEntry,
    created_at: DateTime<Utc>,
}

impl ActivityLogRecord {
    /// Stamps an entry with a new id and the current time.
    #[must_use]
    pub fn new(entry: ActivityEntry, clock: &impl Clock) -> Self {
        Self {
            id: Uuid::new_v4(),
            entry,
            created_at: clock.utc(),
        }
    }

    /// Reconstructs an entry from persisted storage.
    #[must_use]
    pub const fn from_persisted(id: Uuid, entry: ActivityEntry, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            entry,
            created_at,
        }
    }

    /// Returns the record identifier.
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// Returns the recorded entry.
    #[must_use]
    pub const fn entry(&self) -> &ActivityEntry {
        &self.entry
    }

    /// Returns the recording timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
