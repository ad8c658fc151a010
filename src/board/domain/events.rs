//! Task side effects: notifications and activity log entries.
//!
//! Event computation is pure. Given the same inputs it returns the same
//! events in the same order: assignment, then completion, then activity.
//! Delivering the events is left to the sinks behind the board ports.

use super::{BoardTask, TaskId, UserId};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Kind of entity an event refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    /// A board task.
    Task,
}

impl EntityType {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Task => "task",
        }
    }
}

/// Notification categories raised by task changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// A user was given a task.
    TaskAssigned,
    /// A task someone created was finished.
    TaskCompleted,
}

impl NotificationKind {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TaskAssigned => "task_assigned",
            Self::TaskCompleted => "task_completed",
        }
    }
}

/// Actions recorded in the activity log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityAction {
    /// The entity was created.
    Created,
    /// One or more fields changed.
    Updated,
    /// The entity was removed.
    Deleted,
}

impl ActivityAction {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Updated => "updated",
            Self::Deleted => "deleted",
        }
    }
}

/// Task fields tracked in activity changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskField {
    /// Column holding the task.
    ColumnId,
    /// Workflow status.
    Status,
    /// Position within the column.
    SortOrder,
    /// Assigned user.
    AssigneeId,
    /// Title.
    Title,
    /// Description.
    Description,
    /// Priority.
    Priority,
    /// Due date.
    DueDate,
}

impl TaskField {
    /// Returns the field name used in change payloads.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ColumnId => "column_id",
            Self::Status => "status",
            Self::SortOrder => "sort_order",
            Self::AssigneeId => "assignee_id",
            Self::Title => "title",
            Self::Description => "description",
            Self::Priority => "priority",
            Self::DueDate => "due_date",
        }
    }
}

impl fmt::Display for TaskField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One field-level difference between two task states.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldChange {
    /// Changed field.
    pub field: TaskField,
    /// Value before the change, `null` when unset.
    pub from: Value,
    /// Value after the change, `null` when unset.
    pub to: Value,
}

/// Message addressed to a single user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Recipient.
    pub target_user_id: UserId,
    /// Category.
    pub kind: NotificationKind,
    /// Short heading.
    pub title: String,
    /// Human-readable body.
    pub message: String,
    /// Kind of the related entity.
    pub related_entity_type: EntityType,
    /// Related entity.
    pub related_entity_id: TaskId,
}

/// Audit record of a change made by a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityEntry {
    /// User who made the change.
    pub acting_user_id: UserId,
    /// Kind of the changed entity.
    pub entity_type: EntityType,
    /// Changed entity.
    pub entity_id: TaskId,
    /// What happened.
    pub action: ActivityAction,
    /// JSON payload describing the change.
    pub changes: Value,
}

/// Domain event raised by a task change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum BoardEvent {
    /// The task was assigned to someone other than the actor.
    TaskAssigned(Notification),
    /// The task was finished by someone other than its creator.
    TaskCompleted(Notification),
    /// The change was recorded in the activity log.
    ActivityLogged(ActivityEntry),
}

impl BoardEvent {
    /// Returns the event name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::TaskAssigned(_) => "TaskAssigned",
            Self::TaskCompleted(_) => "TaskCompleted",
            Self::ActivityLogged(_) => "ActivityLogged",
        }
    }

    /// Returns the notification carried by the event, if any.
    #[must_use]
    pub const fn notification(&self) -> Option<&Notification> {
        match self {
            Self::TaskAssigned(notification) | Self::TaskCompleted(notification) => {
                Some(notification)
            }
            Self::ActivityLogged(_) => None,
        }
    }

    /// Returns the activity entry carried by the event, if any.
    #[must_use]
    pub const fn activity(&self) -> Option<&ActivityEntry> {
        match self {
            Self::ActivityLogged(entry) => Some(entry),
            Self::TaskAssigned(_) | Self::TaskCompleted(_) => None,
        }
    }
}

/// Computes the events raised by changing a task from `before` to `after`.
///
/// - `TaskAssigned` when the assignee is set, changed, and not the actor.
/// - `TaskCompleted` when the task became done and the creator is not the
///   actor.
/// - `ActivityLogged` when at least one tracked field changed.
#[must_use]
pub fn compute_events(before: &BoardTask, after: &BoardTask, actor: &UserId) -> Vec<BoardEvent> {
    let mut events = Vec::new();

    if let Some(assignee) = after.assignee_id()
        && before.assignee_id() != Some(assignee)
        && assignee != actor
    {
        events.push(BoardEvent::TaskAssigned(assignment_notice(
            after,
            assignee,
            "Task Assigned",
        )));
    }

    if after.status().is_done() && !before.status().is_done() && before.created_by() != actor {
        events.push(BoardEvent::TaskCompleted(Notification {
            target_user_id: before.created_by().clone(),
            kind: NotificationKind::TaskCompleted,
            title: "Task Completed".to_owned(),
            message: format!("Task \"{}\" has been completed", after.title()),
            related_entity_type: EntityType::Task,
            related_entity_id: after.id(),
        }));
    }

    let changes = field_changes(before, after);
    if !changes.is_empty() {
        events.push(BoardEvent::ActivityLogged(ActivityEntry {
            acting_user_id: actor.clone(),
            entity_type: EntityType::Task,
            entity_id: after.id(),
            action: ActivityAction::Updated,
            changes: changes_payload(&changes),
        }));
    }

    events
}

/// Computes the events raised by creating `task`.
#[must_use]
pub fn creation_events(task: &BoardTask, actor: &UserId) -> Vec<BoardEvent> {
    let mut events = Vec::new();
    if let Some(assignee) = task.assignee_id()
        && assignee != actor
    {
        events.push(BoardEvent::TaskAssigned(assignment_notice(
            task,
            assignee,
            "New Task Assigned",
        )));
    }
    events.push(BoardEvent::ActivityLogged(title_entry(
        task,
        actor,
        ActivityAction::Created,
    )));
    events
}

/// Computes the events raised by deleting `task`.
#[must_use]
pub fn deletion_events(task: &BoardTask, actor: &UserId) -> Vec<BoardEvent> {
    vec![BoardEvent::ActivityLogged(title_entry(
        task,
        actor,
        ActivityAction::Deleted,
    ))]
}

/// Lists the tracked fields that differ between `before` and `after`, in
/// declaration order of [`TaskField`].
#[must_use]
pub fn field_changes(before: &BoardTask, after: &BoardTask) -> Vec<FieldChange> {
    let old = before.details();
    let new = after.details();
    let candidates = [
        (
            TaskField::ColumnId,
            text(before.column_id().as_str()),
            text(after.column_id().as_str()),
        ),
        (
            TaskField::Status,
            text(before.status().as_str()),
            text(after.status().as_str()),
        ),
        (
            TaskField::SortOrder,
            Value::from(before.sort_order()),
            Value::from(after.sort_order()),
        ),
        (
            TaskField::AssigneeId,
            optional_text(before.assignee_id().map(UserId::as_str)),
            optional_text(after.assignee_id().map(UserId::as_str)),
        ),
        (TaskField::Title, text(old.title()), text(new.title())),
        (
            TaskField::Description,
            optional_text(old.description()),
            optional_text(new.description()),
        ),
        (
            TaskField::Priority,
            text(old.priority().as_str()),
            text(new.priority().as_str()),
        ),
        (
            TaskField::DueDate,
            optional_text(old.due_date().map(|date| date.to_string()).as_deref()),
            optional_text(new.due_date().map(|date| date.to_string()).as_deref()),
        ),
    ];

    candidates
        .into_iter()
        .filter(|(_, from, to)| from != to)
        .map(|(field, from, to)| FieldChange { field, from, to })
        .collect()
}

fn assignment_notice(task: &BoardTask, assignee: &UserId, title: &str) -> Notification {
    Notification {
        target_user_id: assignee.clone(),
        kind: NotificationKind::TaskAssigned,
        title: title.to_owned(),
        message: format!("You have been assigned to task: {}", task.title()),
        related_entity_type: EntityType::Task,
        related_entity_id: task.id(),
    }
}

fn title_entry(task: &BoardTask, actor: &UserId, action: ActivityAction) -> ActivityEntry {
    let mut changes = Map::new();
    changes.insert("task_title".to_owned(), text(task.title()));
    ActivityEntry {
        acting_user_id: actor.clone(),
        entity_type: EntityType::Task,
        entity_id: task.id(),
        action,
        changes: Value::Object(changes),
    }
}

/// Renders changes as `{ "<field>": { "from": .., "to": .. } }`.
fn changes_payload(changes: &[FieldChange]) -> Value {
    let mut payload = Map::new();
    for change in changes {
        let mut pair = Map::new();
        pair.insert("from".to_owned(), change.from.clone());
        pair.insert("to".to_owned(), change.to.clone());
        payload.insert(change.field.as_str().to_owned(), Value::Object(pair));
    }
    Value::Object(payload)
}

fn text(value: &str) -> Value {
    Value::String(value.to_owned())
}

fn optional_text(value: Option<&str>) -> Value {
    value.map_or(Value::Null, text)
}
