//! In-memory adapters for board ports.

mod sinks;
mod task_store;

pub use sinks::{InMemoryActivityLogSink, InMemoryNotificationSink};
pub use task_store::InMemoryTaskStore;
