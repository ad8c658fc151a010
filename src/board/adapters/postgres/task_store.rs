//! `PostgreSQL` task store.

use super::{
    BoardPgPool,
    conversion::{RowConversionError, row_to_task, task_to_row},
    models::TaskRow,
    schema::board_tasks,
};
use crate::board::{
    domain::{BoardTask, ColumnId, TaskDelta, TaskId},
    ports::{TaskStore, TaskStoreError, TaskStoreResult},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL`-backed task store.
#[derive(Debug, Clone)]
pub struct PostgresTaskStore {
    pool: BoardPgPool,
}

/// Failure inside a delta transaction; any variant rolls the batch back.
#[derive(Debug)]
enum DeltaTxError {
    Missing(TaskId),
    Conversion(RowConversionError),
    Diesel(DieselError),
}

impl From<DieselError> for DeltaTxError {
    fn from(err: DieselError) -> Self {
        Self::Diesel(err)
    }
}

impl From<RowConversionError> for DeltaTxError {
    fn from(err: RowConversionError) -> Self {
        Self::Conversion(err)
    }
}

impl From<DeltaTxError> for TaskStoreError {
    fn from(err: DeltaTxError) -> Self {
        match err {
            DeltaTxError::Missing(id) => Self::NotFound(id),
            DeltaTxError::Conversion(inner) => Self::persistence(inner),
            DeltaTxError::Diesel(inner) => Self::persistence(inner),
        }
    }
}

/// Applies each delta to its locked row, rewriting only rows that change.
///
/// The (column_id, sort_order) constraint is deferred to commit, so rows
/// may pass through transient duplicates here.
fn apply_in_transaction(
    tx: &mut PgConnection,
    deltas: &[TaskDelta],
    at: DateTime<Utc>,
) -> Result<(), DeltaTxError> {
    for delta in deltas {
        let key = delta.id().into_inner();
        let row = board_tasks::table
            .find(key)
            .select(TaskRow::as_select())
            .for_update()
            .first::<TaskRow>(tx)
            .optional()?
            .ok_or(DeltaTxError::Missing(delta.id()))?;
        let mut task = row_to_task(row)?;
        if task.apply_delta(delta, at) {
            let changed = task_to_row(&task)?;
            diesel::update(board_tasks::table.find(key))
                .set(&changed)
                .execute(tx)?;
        }
    }
    Ok(())
}

impl PostgresTaskStore {
    /// Creates a store from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: BoardPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> TaskStoreResult<T>
    where
        F: FnOnce(&mut PgConnection) -> TaskStoreResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(TaskStoreError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(TaskStoreError::persistence)?
    }
}

#[async_trait]
impl TaskStore for PostgresTaskStore {
    async fn store(&self, task: &BoardTask) -> TaskStoreResult<()> {
        let task_id = task.id();
        let row = task_to_row(task).map_err(TaskStoreError::persistence)?;
        self.run_blocking(move |connection| {
            diesel::insert_into(board_tasks::table)
                .values(&row)
                .execute(connection)
                .map_err(|err| match err {
                    DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info)
                        if info.constraint_name() == Some("board_tasks_pkey") =>
                    {
                        TaskStoreError::DuplicateTask(task_id)
                    }
                    _ => TaskStoreError::persistence(err),
                })?;
            Ok(())
        })
        .await
    }

    async fn update(&self, task: &BoardTask) -> TaskStoreResult<()> {
        let task_id = task.id();
        let row = task_to_row(task).map_err(TaskStoreError::persistence)?;
        self.run_blocking(move |connection| {
            let updated = diesel::update(board_tasks::table.find(task_id.into_inner()))
                .set(&row)
                .execute(connection)
                .map_err(TaskStoreError::persistence)?;
            if updated == 0 {
                return Err(TaskStoreError::NotFound(task_id));
            }
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: TaskId) -> TaskStoreResult<Option<BoardTask>> {
        self.run_blocking(move |connection| {
            let row = board_tasks::table
                .find(id.into_inner())
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()
                .map_err(TaskStoreError::persistence)?;
            row.map(row_to_task)
                .transpose()
                .map_err(TaskStoreError::persistence)
        })
        .await
    }

    async fn list_by_column(&self, column_id: &ColumnId) -> TaskStoreResult<Vec<BoardTask>> {
        let column = column_id.as_str().to_owned();
        self.run_blocking(move |connection| {
            let rows = board_tasks::table
                .filter(board_tasks::column_id.eq(column))
                .order((
                    board_tasks::sort_order.asc(),
                    board_tasks::created_at.desc(),
                    board_tasks::id.asc(),
                ))
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)
                .map_err(TaskStoreError::persistence)?;
            rows.into_iter()
                .map(row_to_task)
                .collect::<Result<Vec<_>, _>>()
                .map_err(TaskStoreError::persistence)
        })
        .await
    }

    async fn apply_delta(&self, deltas: &[TaskDelta], at: DateTime<Utc>) -> TaskStoreResult<()> {
        let batch = deltas.to_vec();
        self.run_blocking(move |connection| {
            connection
                .transaction::<(), DeltaTxError, _>(|tx| apply_in_transaction(tx, &batch, at))
                .map_err(TaskStoreError::from)
        })
        .await
    }

    async fn remove(&self, id: TaskId) -> TaskStoreResult<()> {
        self.run_blocking(move |connection| {
            let deleted = diesel::delete(board_tasks::table.find(id.into_inner()))
                .execute(connection)
                .map_err(TaskStoreError::persistence)?;
            if deleted == 0 {
                return Err(TaskStoreError::NotFound(id));
            }
            Ok(())
        })
        .await
    }

    async fn remove_and_apply(
        &self,
        id: TaskId,
        deltas: &[TaskDelta],
        at: DateTime<Utc>,
    ) -> TaskStoreResult<()> {
        let batch = deltas.to_vec();
        self.run_blocking(move |connection| {
            connection
                .transaction::<(), DeltaTxError, _>(|tx| {
                    let deleted =
                        diesel::delete(board_tasks::table.find(id.into_inner())).execute(tx)?;
                    if deleted == 0 {
                        return Err(DeltaTxError::Missing(id));
                    }
                    apply_in_transaction(tx, &batch, at)
                })
                .map_err(TaskStoreError::from)
        })
        .await
    }
}
