//! Port contracts for board persistence and event delivery.
//!
//! Ports define infrastructure-agnostic interfaces used by board services.

pub mod sinks;
pub mod task_store;

pub use sinks::{ActivityLogSink, NotificationSink, SinkError, SinkResult};
pub use task_store::{TaskStore, TaskStoreError, TaskStoreResult};
