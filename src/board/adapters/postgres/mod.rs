//! `PostgreSQL` adapters for board persistence.
//!
//! Table definitions live in `migrations/`. Diesel work runs on the blocking
//! thread pool so callers stay on the async executor.

mod conversion;
mod models;
mod schema;
mod sinks;
mod task_store;

use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool};

/// `PostgreSQL` connection pool type shared by board adapters.
pub type BoardPgPool = Pool<ConnectionManager<PgConnection>>;

pub use conversion::RowConversionError;
pub use sinks::{PostgresActivityLogSink, PostgresNotificationSink};
pub use task_store::PostgresTaskStore;
