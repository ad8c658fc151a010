//! Shared helpers for `PostgreSQL` board adapter integration tests.

use chrono::{DateTime, Utc};
use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use eyre::eyre;
use mondrian::board::{
    adapters::postgres::{
        BoardPgPool, PostgresActivityLogSink, PostgresNotificationSink, PostgresTaskStore,
    },
    domain::{
        BoardTask, ColumnId, PersistedBoardTaskData, TaskDetails, TaskId, TaskPlacement,
        TaskStatus, UserId,
    },
};
use pg_embedded_setup_unpriv::TestCluster;
use std::io;
use tokio::runtime::Runtime;
use uuid::Uuid;

/// SQL creating the board tables.
pub const CREATE_BOARD_TABLES_SQL: &str =
    include_str!("../../migrations/2026-10-01-000000_create_board_tables/up.sql");

/// Template database name for the pre-migrated schema.
pub const TEMPLATE_DB: &str = "mondrian_test_template";

/// Creates a tokio runtime for async operations in tests.
///
/// # Errors
///
/// Returns an error if the runtime cannot be created.
pub fn test_runtime() -> io::Result<Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
}

/// Ensures the template database exists with the board schema applied.
///
/// # Errors
///
/// Returns an error if template creation or migration fails.
pub fn ensure_template(cluster: &TestCluster) -> eyre::Result<()> {
    cluster
        .ensure_template_exists(TEMPLATE_DB, |db_name| {
            let url = cluster.connection().database_url(db_name);
            let mut conn = PgConnection::establish(&url).map_err(|e| eyre!("{e}"))?;
            conn.batch_execute(CREATE_BOARD_TABLES_SQL)
                .map_err(|e| eyre!("board schema: {e}"))?;
            Ok(())
        })
        .map_err(|e| eyre!("template setup: {e}"))
}

/// Temporary database cloned from the template, dropped with the guard.
///
/// Adapters built from it must be dropped first so the pool can close.
pub struct BoardDatabase {
    cluster: &'static TestCluster,
    name: String,
    pool: Option<BoardPgPool>,
}

impl BoardDatabase {
    /// Creates a fresh database from the migrated template.
    ///
    /// # Errors
    ///
    /// Returns an error if the template, database or pool cannot be set up.
    pub fn create(cluster: &'static TestCluster) -> eyre::Result<Self> {
        ensure_template(cluster)?;
        let name = format!("board_test_{}", Uuid::new_v4().simple());
        cluster
            .create_database_from_template(name.as_str(), TEMPLATE_DB)
            .map_err(|e| eyre!("create {name}: {e}"))?;
        let url = cluster.connection().database_url(&name);
        let pool = Pool::builder()
            .max_size(2)
            .build(ConnectionManager::<PgConnection>::new(url))?;
        Ok(Self {
            cluster,
            name,
            pool: Some(pool),
        })
    }

    fn pool(&self) -> eyre::Result<BoardPgPool> {
        self.pool
            .clone()
            .ok_or_else(|| eyre!("database {} already released", self.name))
    }

    /// Returns a task store over this database.
    ///
    /// # Errors
    ///
    /// Returns an error if the pool was released.
    pub fn task_store(&self) -> eyre::Result<PostgresTaskStore> {
        Ok(PostgresTaskStore::new(self.pool()?))
    }

    /// Returns a notification sink over this database.
    ///
    /// # Errors
    ///
    /// Returns an error if the pool was released.
    pub fn notification_sink(&self) -> eyre::Result<PostgresNotificationSink> {
        Ok(PostgresNotificationSink::new(self.pool()?))
    }

    /// Returns an activity log sink over this database.
    ///
    /// # Errors
    ///
    /// Returns an error if the pool was released.
    pub fn activity_sink(&self) -> eyre::Result<PostgresActivityLogSink> {
        Ok(PostgresActivityLogSink::new(self.pool()?))
    }
}

impl Drop for BoardDatabase {
    fn drop(&mut self) {
        drop(self.pool.take());
        drop(self.cluster.drop_database(self.name.as_str()));
    }
}

/// Builds a todo task in `column_id` at `sort_order`, created at `created_at`.
///
/// Timestamps are whole seconds so they survive the round trip through
/// `TIMESTAMPTZ` unchanged.
///
/// # Errors
///
/// Returns an error if an identifier or the title is blank.
pub fn board_task(
    title: &str,
    column_id: &str,
    sort_order: u32,
    created_at: DateTime<Utc>,
) -> eyre::Result<BoardTask> {
    Ok(BoardTask::from_persisted(PersistedBoardTaskData {
        id: TaskId::new(),
        placement: TaskPlacement {
            column_id: ColumnId::new(column_id)?,
            status: TaskStatus::Todo,
            sort_order,
        },
        assignee_id: None,
        created_by: UserId::new("u1")?,
        details: TaskDetails::new(title)?,
        created_at,
        updated_at: created_at,
    }))
}

/// Returns a fixed, whole-second base timestamp for test records.
///
/// # Errors
///
/// Returns an error if the timestamp is out of range.
pub fn base_time() -> eyre::Result<DateTime<Utc>> {
    DateTime::from_timestamp(1_790_000_000, 0).ok_or_else(|| eyre!("timestamp out of range"))
}
