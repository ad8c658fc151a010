//! Board orchestration: task creation, moves, edits and deletion.

use crate::board::{
    domain::{
        ActivityLogRecord, BoardConfiguration, BoardDomainError, BoardEvent, BoardTask,
        ColumnDefinition, ColumnId, MoveIntent, MovePlan, NotificationId, NotificationRecord,
        TaskDetails, TaskId, TaskPlacement, TaskPriority, TaskStatus, UserId, WipBreach,
        close_gap, compute_events, creation_events, deletion_events, field_changes,
    },
    ports::{ActivityLogSink, NotificationSink, SinkError, TaskStore, TaskStoreError},
};
use chrono::NaiveDate;
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Request payload for creating a task at the end of a column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateBoardTaskRequest {
    column_id: ColumnId,
    title: String,
    created_by: UserId,
    description: Option<String>,
    priority: TaskPriority,
    due_date: Option<NaiveDate>,
    assignee_id: Option<UserId>,
}

impl CreateBoardTaskRequest {
    /// Creates a request with the required fields.
    #[must_use]
    pub fn new(column_id: ColumnId, title: impl Into<String>, created_by: UserId) -> Self {
        Self {
            column_id,
            title: title.into(),
            created_by,
            description: None,
            priority: TaskPriority::default(),
            due_date: None,
            assignee_id: None,
        }
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

    /// Sets the assignee.
    #[must_use]
    pub fn with_assignee(mut self, assignee_id: UserId) -> Self {
        self.assignee_id = Some(assignee_id);
        self
    }
}

/// Request payload for moving a task within or across columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveTaskRequest {
    intent: MoveIntent,
    actor: UserId,
}

impl MoveTaskRequest {
    /// Creates a move request.
    #[must_use]
    pub const fn new(task_id: TaskId, destination: ColumnId, index: usize, actor: UserId) -> Self {
        Self {
            intent: MoveIntent::new(task_id, destination, index),
            actor,
        }
    }

    /// Returns the requested move.
    #[must_use]
    pub const fn intent(&self) -> &MoveIntent {
        &self.intent
    }
}

/// Request payload for the generic edit path.
///
/// Unset fields are left alone. Status edits here ignore the column mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateBoardTaskRequest {
    task_id: TaskId,
    actor: UserId,
    title: Option<String>,
    description: Option<Option<String>>,
    priority: Option<TaskPriority>,
    due_date: Option<Option<NaiveDate>>,
    status: Option<TaskStatus>,
    assignee_id: Option<Option<UserId>>,
}

impl UpdateBoardTaskRequest {
    /// Creates an empty edit of `task_id` made by `actor`.
    #[must_use]
    pub const fn new(task_id: TaskId, actor: UserId) -> Self {
        Self {
            task_id,
            actor,
            title: None,
            description: None,
            priority: None,
            due_date: None,
            status: None,
            assignee_id: None,
        }
    }

    /// Replaces the title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Replaces or clears the description.
    #[must_use]
    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = Some(description);
        self
    }

    /// Replaces the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Replaces or clears the due date.
    #[must_use]
    pub const fn with_due_date(mut self, due_date: Option<NaiveDate>) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Sets the status directly.
    #[must_use]
    pub const fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Assigns the task, or clears the assignment with `None`.
    #[must_use]
    pub fn with_assignee(mut self, assignee_id: Option<UserId>) -> Self {
        self.assignee_id = Some(assignee_id);
        self
    }
}

/// A task after a lifecycle operation, with the events it raised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskOutcome {
    task: BoardTask,
    events: Vec<BoardEvent>,
}

impl TaskOutcome {
    /// Returns the task. For deletions this is the removed task.
    #[must_use]
    pub const fn task(&self) -> &BoardTask {
        &self.task
    }

    /// Returns the dispatched events in order.
    #[must_use]
    pub fn events(&self) -> &[BoardEvent] {
        &self.events
    }

    /// Consumes the outcome, returning the task.
    #[must_use]
    pub fn into_task(self) -> BoardTask {
        self.task
    }
}

/// Result of a move: the moved task, the applied plan and its events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveOutcome {
    task: BoardTask,
    plan: MovePlan,
    events: Vec<BoardEvent>,
}

impl MoveOutcome {
    /// Returns the moved task as stored after the move.
    #[must_use]
    pub const fn task(&self) -> &BoardTask {
        &self.task
    }

    /// Returns the applied plan.
    #[must_use]
    pub const fn plan(&self) -> &MovePlan {
        &self.plan
    }

    /// Returns the dispatched events in order.
    #[must_use]
    pub fn events(&self) -> &[BoardEvent] {
        &self.events
    }

    /// Returns the advisory WIP breach, if the move caused one.
    #[must_use]
    pub const fn wip_breach(&self) -> Option<&WipBreach> {
        self.plan.wip_breach()
    }
}

/// One column of a rendered board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnView {
    column: ColumnDefinition,
    tasks: Vec<BoardTask>,
    wip_exceeded: bool,
}

impl ColumnView {
    /// Returns the column definition.
    #[must_use]
    pub const fn column(&self) -> &ColumnDefinition {
        &self.column
    }

    /// Returns the column's tasks in order.
    #[must_use]
    pub fn tasks(&self) -> &[BoardTask] {
        &self.tasks
    }

    /// Returns whether the column holds more tasks than its limit.
    #[must_use]
    pub const fn wip_exceeded(&self) -> bool {
        self.wip_exceeded
    }
}

/// Snapshot of every configured column, in board order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardView {
    columns: Vec<ColumnView>,
}

impl BoardView {
    /// Returns the columns in board order.
    #[must_use]
    pub fn columns(&self) -> &[ColumnView] {
        &self.columns
    }

    /// Returns the view of one column.
    #[must_use]
    pub fn column(&self, id: &ColumnId) -> Option<&ColumnView> {
        self.columns.iter().find(|view| view.column.id() == id)
    }
}

/// Service-level errors for board operations.
#[derive(Debug, Error)]
pub enum BoardServiceError {
    /// Domain validation or planning failed.
    #[error(transparent)]
    Domain(#[from] BoardDomainError),
    /// Task store operation failed.
    #[error(transparent)]
    Store(#[from] TaskStoreError),
    /// The task does not exist.
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),
    /// An explicit notification or activity query failed.
    #[error(transparent)]
    Sink(#[from] SinkError),
}

/// Result type for board service operations.
pub type BoardServiceResult<T> = Result<T, BoardServiceError>;

/// Board orchestration service.
#[derive(Clone)]
pub struct BoardService<S, N, A, C>
where
    S: TaskStore,
    N: NotificationSink,
    A: ActivityLogSink,
    C: Clock + Send + Sync,
{
    store: Arc<S>,
    notifications: Arc<N>,
    activity: Arc<A>,
    configuration: Arc<BoardConfiguration>,
    clock: Arc<C>,
}

impl<S, N, A, C> BoardService<S, N, A, C>
where
    S: TaskStore,
    N: NotificationSink,
    A: ActivityLogSink,
    C: Clock + Send + Sync,
{
    /// Creates a board service.
    #[must_use]
    pub const fn new(
        store: Arc<S>,
        notifications: Arc<N>,
        activity: Arc<A>,
        configuration: Arc<BoardConfiguration>,
        clock: Arc<C>,
    ) -> Self {
        Self {
            store,
            notifications,
            activity,
            configuration,
            clock,
        }
    }

    /// Returns the board configuration.
    #[must_use]
    pub fn configuration(&self) -> &BoardConfiguration {
        &self.configuration
    }

    /// Creates a task at the end of its column.
    ///
    /// The status comes from the column mapping, or `todo` for unmapped
    /// columns.
    ///
    /// # Errors
    ///
    /// Returns [`BoardServiceError::Domain`] when the column is not on the
    /// board or the title is blank, and [`BoardServiceError::Store`] when
    /// persistence fails.
    pub async fn create_task(
        &self,
        request: CreateBoardTaskRequest,
    ) -> BoardServiceResult<TaskOutcome> {
        let CreateBoardTaskRequest {
            column_id,
            title,
            created_by,
            description,
            priority,
            due_date,
            assignee_id,
        } = request;

        if !self.configuration.contains_column(&column_id) {
            return Err(BoardDomainError::InvalidColumnReference(column_id).into());
        }

        let mut details = TaskDetails::new(title)?.with_priority(priority);
        details.set_description(description);
        details.set_due_date(due_date);

        let lane = self.store.list_by_column(&column_id).await?;
        let placement = TaskPlacement {
            status: self
                .configuration
                .derive_status(&column_id)
                .unwrap_or_default(),
            sort_order: u32::try_from(lane.len()).unwrap_or(u32::MAX),
            column_id,
        };
        let mut task = BoardTask::new(placement, created_by.clone(), details, &*self.clock);
        if let Some(assignee) = assignee_id {
            task = task.with_assignee(assignee);
        }

        self.store.store(&task).await?;
        info!(
            task_id = %task.id(),
            column_id = %task.column_id(),
            sort_order = task.sort_order(),
            "task created"
        );

        let events = creation_events(&task, &created_by);
        self.dispatch(&events).await;
        Ok(TaskOutcome { task, events })
    }

    /// Moves a task to `index` in the destination column.
    ///
    /// The origin and destination columns are renumbered in one atomic delta
    /// batch. A move that changes nothing writes nothing and raises no
    /// events.
    ///
    /// # Errors
    ///
    /// Returns [`BoardServiceError::TaskNotFound`] when the task does not
    /// exist, [`BoardServiceError::Domain`] when the destination is not on
    /// the board or a strict WIP limit rejects the move, and
    /// [`BoardServiceError::Store`] when persistence fails.
    pub async fn move_task(&self, request: MoveTaskRequest) -> BoardServiceResult<MoveOutcome> {
        let MoveTaskRequest { intent, actor } = request;
        let before = self.load_task(intent.task_id).await?;

        let mut tasks = self.store.list_by_column(before.column_id()).await?;
        if *before.column_id() != intent.destination {
            tasks.extend(self.store.list_by_column(&intent.destination).await?);
        }
        let plan = self.configuration.plan_move(&tasks, &intent)?;
        debug!(
            task_id = %intent.task_id,
            origin = %plan.origin(),
            destination = %plan.destination(),
            index = plan.index(),
            deltas = plan.deltas().len(),
            "move planned"
        );

        if let Some(breach) = plan.wip_breach() {
            warn!(
                column_id = %breach.column,
                limit = breach.limit.value(),
                count = breach.count,
                "column is over its WIP limit"
            );
        }

        if plan.is_noop() {
            return Ok(MoveOutcome {
                task: before,
                plan,
                events: Vec::new(),
            });
        }

        self.store.apply_delta(plan.deltas(), self.clock.utc()).await?;
        let after = self.load_task(intent.task_id).await?;
        info!(
            task_id = %after.id(),
            column_id = %after.column_id(),
            sort_order = after.sort_order(),
            status = after.status().as_str(),
            "task moved"
        );

        let events = compute_events(&before, &after, &actor);
        self.dispatch(&events).await;
        Ok(MoveOutcome {
            task: after,
            plan,
            events,
        })
    }

    /// Applies a generic edit to a task.
    ///
    /// An edit that changes no tracked field is not persisted and raises no
    /// events.
    ///
    /// # Errors
    ///
    /// Returns [`BoardServiceError::TaskNotFound`] when the task does not
    /// exist, [`BoardServiceError::Domain`] for a blank title, and
    /// [`BoardServiceError::Store`] when persistence fails.
    pub async fn update_task(
        &self,
        request: UpdateBoardTaskRequest,
    ) -> BoardServiceResult<TaskOutcome> {
        let UpdateBoardTaskRequest {
            task_id,
            actor,
            title: new_title,
            description: new_description,
            priority: new_priority,
            due_date: new_due_date,
            status: new_status,
            assignee_id: new_assignee,
        } = request;
        let before = self.load_task(task_id).await?;
        let mut after = before.clone();

        let mut details = after.details().clone();
        if let Some(title) = new_title {
            details.set_title(title)?;
        }
        if let Some(description) = new_description {
            details.set_description(description);
        }
        if let Some(priority) = new_priority {
            details.set_priority(priority);
        }
        if let Some(due_date) = new_due_date {
            details.set_due_date(due_date);
        }
        if details != *after.details() {
            after.set_details(details, &*self.clock);
        }
        if let Some(status) = new_status
            && status != after.status()
        {
            after.set_status(status, &*self.clock);
        }
        if let Some(assignee) = new_assignee
            && assignee.as_ref() != after.assignee_id()
        {
            after.assign(assignee, &*self.clock);
        }

        if field_changes(&before, &after).is_empty() {
            return Ok(TaskOutcome {
                task: before,
                events: Vec::new(),
            });
        }

        self.store.update(&after).await?;
        info!(task_id = %after.id(), "task updated");

        let events = compute_events(&before, &after, &actor);
        self.dispatch(&events).await;
        Ok(TaskOutcome {
            task: after,
            events,
        })
    }

    /// Deletes a task and closes the gap it leaves in its column.
    ///
    /// The removal and the renumbering are written together; when the store
    /// rejects them the task stays where it was and no events are raised.
    ///
    /// # Errors
    ///
    /// Returns [`BoardServiceError::TaskNotFound`] when the task does not
    /// exist and [`BoardServiceError::Store`] when persistence fails.
    pub async fn delete_task(
        &self,
        task_id: TaskId,
        actor: &UserId,
    ) -> BoardServiceResult<TaskOutcome> {
        let task = self.load_task(task_id).await?;
        let lane = self.store.list_by_column(task.column_id()).await?;
        let deltas = close_gap(&lane, task_id)?;

        self.store
            .remove_and_apply(task_id, &deltas, self.clock.utc())
            .await?;
        info!(
            task_id = %task_id,
            column_id = %task.column_id(),
            renumbered = deltas.len(),
            "task deleted"
        );

        let events = deletion_events(&task, actor);
        self.dispatch(&events).await;
        Ok(TaskOutcome { task, events })
    }

    /// Returns a task by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`BoardServiceError::Store`] when the lookup fails.
    pub async fn find_task(&self, task_id: TaskId) -> BoardServiceResult<Option<BoardTask>> {
        Ok(self.store.find_by_id(task_id).await?)
    }

    /// Renders every configured column with its tasks.
    ///
    /// # Errors
    ///
    /// Returns [`BoardServiceError::Store`] when a column cannot be listed.
    pub async fn board_view(&self) -> BoardServiceResult<BoardView> {
        let mut columns = Vec::new();
        for column in self.configuration.ordered_columns() {
            let tasks = self.store.list_by_column(column.id()).await?;
            let wip_exceeded = self.configuration.is_wip_exceeded(column.id(), tasks.len());
            columns.push(ColumnView {
                column: column.clone(),
                tasks,
                wip_exceeded,
            });
        }
        Ok(BoardView { columns })
    }

    /// Lists a user's notifications, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`BoardServiceError::Sink`] when the inbox cannot be read.
    pub async fn notifications_for(
        &self,
        user_id: &UserId,
    ) -> BoardServiceResult<Vec<NotificationRecord>> {
        Ok(self.notifications.list_for_user(user_id).await?)
    }

    /// Marks one of the user's notifications as read.
    ///
    /// # Errors
    ///
    /// Returns [`BoardServiceError::Sink`] when the notification does not
    /// exist, belongs to another user, or cannot be updated.
    pub async fn mark_notification_read(
        &self,
        id: NotificationId,
        user_id: &UserId,
    ) -> BoardServiceResult<NotificationRecord> {
        Ok(self.notifications.mark_read(id, user_id).await?)
    }

    /// Lists the activity recorded for a task, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`BoardServiceError::Sink`] when the log cannot be read.
    pub async fn activity_for_task(
        &self,
        task_id: TaskId,
    ) -> BoardServiceResult<Vec<ActivityLogRecord>> {
        Ok(self.activity.list_for_entity(task_id).await?)
    }

    async fn load_task(&self, task_id: TaskId) -> BoardServiceResult<BoardTask> {
        self.store
            .find_by_id(task_id)
            .await?
            .ok_or(BoardServiceError::TaskNotFound(task_id))
    }

    /// Hands each event to its sink. Failures are logged and dropped.
    async fn dispatch(&self, events: &[BoardEvent]) {
        for event in events {
            let delivered = match event {
                BoardEvent::TaskAssigned(notification)
                | BoardEvent::TaskCompleted(notification) => {
                    let record = NotificationRecord::new(notification.clone(), &*self.clock);
                    self.notifications.deliver(&record).await
                }
                BoardEvent::ActivityLogged(entry) => {
                    let record = ActivityLogRecord::new(entry.clone(), &*self.clock);
                    self.activity.record(&record).await
                }
            };
            if let Err(err) = delivered {
                warn!(event = event.name(), error = %err, "board event delivery failed");
            }
        }
    }
}
