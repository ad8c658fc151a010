//! Column definitions and work-in-progress limits.

use super::{BoardDomainError, ColumnId, TaskStatus};
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;

/// Positive cap on the number of tasks a column should hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct WipLimit(NonZeroU32);

impl WipLimit {
    /// Creates a validated limit.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::InvalidWipLimit`] for zero.
    pub const fn new(value: u32) -> Result<Self, BoardDomainError> {
        match NonZeroU32::new(value) {
            Some(limit) => Ok(Self(limit)),
            None => Err(BoardDomainError::InvalidWipLimit),
        }
    }

    /// Returns the limit as a plain integer.
    #[must_use]
    pub const fn value(self) -> u32 {
        self.0.get()
    }

    /// Returns whether `count` tasks overrun this limit.
    #[must_use]
    pub fn is_exceeded_by(self, count: usize) -> bool {
        usize::try_from(self.value()).is_ok_and(|limit| count > limit)
    }
}

impl TryFrom<u32> for WipLimit {
    type Error = BoardDomainError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<WipLimit> for u32 {
    fn from(value: WipLimit) -> Self {
        value.value()
    }
}

/// One lane of a board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDefinition {
    id: ColumnId,
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    wip_limit: Option<WipLimit>,
    #[serde(default)]
    sort_order: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    status: Option<TaskStatus>,
}

impl ColumnDefinition {
    /// Creates a status-neutral column without a limit.
    #[must_use]
    pub fn new(id: ColumnId, name: impl Into<String>, sort_order: u32) -> Self {
        Self {
            id,
            name: name.into(),
            wip_limit: None,
            sort_order,
            status: None,
        }
    }

    /// Maps the column to a task status.
    #[must_use]
    pub const fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Sets a work-in-progress limit.
    #[must_use]
    pub const fn with_wip_limit(mut self, limit: WipLimit) -> Self {
        self.wip_limit = Some(limit);
        self
    }

    /// Returns the column identifier.
    #[must_use]
    pub const fn id(&self) -> &ColumnId {
        &self.id
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the work-in-progress limit, if any.
    #[must_use]
    pub const fn wip_limit(&self) -> Option<WipLimit> {
        self.wip_limit
    }

    /// Returns the display order of the column.
    #[must_use]
    pub const fn sort_order(&self) -> u32 {
        self.sort_order
    }

    /// Returns the status mapped to this column, if any.
    #[must_use]
    pub const fn status(&self) -> Option<TaskStatus> {
        self.status
    }
}
