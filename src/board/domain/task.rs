//! Board task aggregate and its descriptive payload.

use super::{BoardDomainError, ColumnId, TaskDelta, TaskId, TaskPriority, TaskStatus, UserId};
use chrono::{DateTime, NaiveDate, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Descriptive task payload. The ordering engine never reads it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TaskDetailsFields")]
pub struct TaskDetails {
    title: String,
    description: Option<String>,
    priority: TaskPriority,
    due_date: Option<NaiveDate>,
}

/// Unvalidated wire shape of [`TaskDetails`].
#[derive(Deserialize)]
struct TaskDetailsFields {
    title: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    priority: TaskPriority,
    #[serde(default)]
    due_date: Option<NaiveDate>,
}

impl TryFrom<TaskDetailsFields> for TaskDetails {
    type Error = BoardDomainError;

    fn try_from(fields: TaskDetailsFields) -> Result<Self, Self::Error> {
        Ok(Self {
            title: validate_title(fields.title)?,
            description: fields.description,
            priority: fields.priority,
            due_date: fields.due_date,
        })
    }
}

impl TaskDetails {
    /// Creates task details with a validated title and default priority.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::EmptyTaskTitle`] when the trimmed title is
    /// empty.
    pub fn new(title: impl Into<String>) -> Result<Self, BoardDomainError> {
        Ok(Self {
            title: validate_title(title.into())?,
            description: None,
            priority: TaskPriority::default(),
            due_date: None,
        })
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = priority;
        self
    }

    /// Sets the due date.
    #[must_use]
    pub const fn with_due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the priority.
    #[must_use]
    pub const fn priority(&self) -> TaskPriority {
        self.priority
    }

    /// Returns the due date, if any.
    #[must_use]
    pub const fn due_date(&self) -> Option<NaiveDate> {
        self.due_date
    }

    /// Replaces the title.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::EmptyTaskTitle`] when the trimmed title is
    /// empty.
    pub fn set_title(&mut self, title: impl Into<String>) -> Result<(), BoardDomainError> {
        self.title = validate_title(title.into())?;
        Ok(())
    }

    /// Replaces the description.
    pub fn set_description(&mut self, description: Option<String>) {
        self.description = description;
    }

    /// Replaces the priority.
    #[expect(
        clippy::missing_const_for_fn,
        reason = "&mut self methods cannot be const in stable Rust"
    )]
    pub fn set_priority(&mut self, priority: TaskPriority) {
        self.priority = priority;
    }

    /// Replaces the due date.
    #[expect(
        clippy::missing_const_for_fn,
        reason = "&mut self methods cannot be const in stable Rust"
    )]
    pub fn set_due_date(&mut self, due_date: Option<NaiveDate>) {
        self.due_date = due_date;
    }
}

fn validate_title(raw: String) -> Result<String, BoardDomainError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(BoardDomainError::EmptyTaskTitle);
    }
    Ok(trimmed.to_owned())
}

/// Where a task sits on the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskPlacement {
    /// Column holding the task.
    pub column_id: ColumnId,
    /// Status of the task.
    pub status: TaskStatus,
    /// Position within the column, starting at zero.
    pub sort_order: u32,
}

/// Task aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardTask {
    id: TaskId,
    column_id: ColumnId,
    status: TaskStatus,
    sort_order: u32,
    assignee_id: Option<UserId>,
    created_by: UserId,
    details: TaskDetails,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedBoardTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted placement.
    pub placement: TaskPlacement,
    /// Persisted assignee, if any.
    pub assignee_id: Option<UserId>,
    /// Persisted creator.
    pub created_by: UserId,
    /// Persisted descriptive payload.
    pub details: TaskDetails,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl BoardTask {
    /// Creates a new task at the given placement.
    #[must_use]
    pub fn new(
        placement: TaskPlacement,
        created_by: UserId,
        details: TaskDetails,
        clock: &impl Clock,
    ) -> Self {
        let timestamp = clock.utc();
        let TaskPlacement {
            column_id,
            status,
            sort_order,
        } = placement;
        Self {
            id: TaskId::new(),
            column_id,
            status,
            sort_order,
            assignee_id: None,
            created_by,
            details,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Sets the initial assignee of a freshly built task.
    #[must_use]
    pub fn with_assignee(mut self, assignee_id: UserId) -> Self {
        self.assignee_id = Some(assignee_id);
        self
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedBoardTaskData) -> Self {
        Self {
            id: data.id,
            column_id: data.placement.column_id,
            status: data.placement.status,
            sort_order: data.placement.sort_order,
            assignee_id: data.assignee_id,
            created_by: data.created_by,
            details: data.details,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the column holding the task.
    #[must_use]
    pub const fn column_id(&self) -> &ColumnId {
        &self.column_id
    }

    /// Returns the task status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the position of the task within its column.
    #[must_use]
    pub const fn sort_order(&self) -> u32 {
        self.sort_order
    }

    /// Returns the assignee, if any.
    #[must_use]
    pub const fn assignee_id(&self) -> Option<&UserId> {
        self.assignee_id.as_ref()
    }

    /// Returns the user who created the task.
    #[must_use]
    pub const fn created_by(&self) -> &UserId {
        &self.created_by
    }

    /// Returns the descriptive payload.
    #[must_use]
    pub const fn details(&self) -> &TaskDetails {
        &self.details
    }

    /// Returns the task title.
    #[must_use]
    pub fn title(&self) -> &str {
        self.details.title()
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Assigns the task to a user, or clears the assignment.
    pub fn assign(&mut self, assignee_id: Option<UserId>, clock: &impl Clock) {
        self.assignee_id = assignee_id;
        self.touch(clock);
    }

    /// Sets the status directly.
    ///
    /// This is the manual edit path; moves derive status from the board
    /// configuration instead.
    pub fn set_status(&mut self, status: TaskStatus, clock: &impl Clock) {
        self.status = status;
        self.touch(clock);
    }

    /// Replaces the descriptive payload.
    pub fn set_details(&mut self, details: TaskDetails, clock: &impl Clock) {
        self.details = details;
        self.touch(clock);
    }

    /// Applies a move delta computed for this task.
    ///
    /// Returns `false` without touching the task when the delta targets a
    /// different task or changes nothing.
    pub fn apply_delta(&mut self, delta: &TaskDelta, at: DateTime<Utc>) -> bool {
        if delta.id() != self.id {
            return false;
        }
        let mut changed = false;
        if let Some(column_id) = delta.column_id()
            && *column_id != self.column_id
        {
            self.column_id = column_id.clone();
            changed = true;
        }
        if let Some(status) = delta.status()
            && status != self.status
        {
            self.status = status;
            changed = true;
        }
        if let Some(sort_order) = delta.sort_order()
            && sort_order != self.sort_order
        {
            self.sort_order = sort_order;
            changed = true;
        }
        if changed {
            self.updated_at = at;
        }
        changed
    }

    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}
