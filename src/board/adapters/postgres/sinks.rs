//! `PostgreSQL` notification and activity log sinks.

use super::{
    BoardPgPool,
    conversion::{activity_to_row, notification_to_row, row_to_activity, row_to_notification},
    models::{ActivityLogRow, NotificationRow},
    schema::{activity_logs, notifications},
};
use crate::board::{
    domain::{ActivityLogRecord, NotificationId, NotificationRecord, TaskId, UserId},
    ports::{ActivityLogSink, NotificationSink, SinkError, SinkResult},
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;

async fn run_blocking<F, T>(pool: &BoardPgPool, f: F) -> SinkResult<T>
where
    F: FnOnce(&mut PgConnection) -> SinkResult<T> + Send + 'static,
    T: Send + 'static,
{
    let pool = pool.clone();
    tokio::task::spawn_blocking(move || {
        let mut connection = pool.get().map_err(SinkError::persistence)?;
        f(&mut connection)
    })
    .await
    .map_err(SinkError::persistence)?
}

/// `PostgreSQL`-backed notification inbox.
#[derive(Debug, Clone)]
pub struct PostgresNotificationSink {
    pool: BoardPgPool,
}

impl PostgresNotificationSink {
    /// Creates a sink from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: BoardPgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NotificationSink for PostgresNotificationSink {
    async fn deliver(&self, record: &NotificationRecord) -> SinkResult<()> {
        let row = notification_to_row(record);
        run_blocking(&self.pool, move |connection| {
            diesel::insert_into(notifications::table)
                .values(&row)
                .execute(connection)
                .map_err(SinkError::persistence)?;
            Ok(())
        })
        .await
    }

    async fn list_for_user(&self, user_id: &UserId) -> SinkResult<Vec<NotificationRecord>> {
        let user = user_id.as_str().to_owned();
        run_blocking(&self.pool, move |connection| {
            notifications::table
                .filter(notifications::user_id.eq(user))
                .order(notifications::created_at.desc())
                .select(NotificationRow::as_select())
                .load::<NotificationRow>(connection)
                .map_err(SinkError::persistence)?
                .into_iter()
                .map(|row| row_to_notification(row).map_err(SinkError::persistence))
                .collect()
        })
        .await
    }

    async fn mark_read(
        &self,
        id: NotificationId,
        user_id: &UserId,
    ) -> SinkResult<NotificationRecord> {
        let user = user_id.as_str().to_owned();
        run_blocking(&self.pool, move |connection| {
            let row = diesel::update(
                notifications::table
                    .filter(notifications::id.eq(id.into_inner()))
                    .filter(notifications::user_id.eq(user)),
            )
            .set(notifications::is_read.eq(true))
            .returning(NotificationRow::as_returning())
            .get_result::<NotificationRow>(connection)
            .optional()
            .map_err(SinkError::persistence)?
            .ok_or(SinkError::NotificationNotFound(id))?;
            row_to_notification(row).map_err(SinkError::persistence)
        })
        .await
    }
}

/// `PostgreSQL`-backed activity log.
#[derive(Debug, Clone)]
pub struct PostgresActivityLogSink {
    pool: BoardPgPool,
}

impl PostgresActivityLogSink {
    /// Creates a sink from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: BoardPgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ActivityLogSink for PostgresActivityLogSink {
    async fn record(&self, record: &ActivityLogRecord) -> SinkResult<()> {
        let row = activity_to_row(record);
        run_blocking(&self.pool, move |connection| {
            diesel::insert_into(activity_logs::table)
                .values(&row)
                .execute(connection)
                .map_err(SinkError::persistence)?;
            Ok(())
        })
        .await
    }

    async fn list_for_entity(&self, entity_id: TaskId) -> SinkResult<Vec<ActivityLogRecord>> {
        run_blocking(&self.pool, move |connection| {
            activity_logs::table
                .filter(activity_logs::entity_id.eq(entity_id.into_inner()))
                .order(activity_logs::created_at.asc())
                .select(ActivityLogRow::as_select())
                .load::<ActivityLogRow>(connection)
                .map_err(SinkError::persistence)?
                .into_iter()
                .map(|row| row_to_activity(row).map_err(SinkError::persistence))
                .collect()
        })
        .await
    }
}
