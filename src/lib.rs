//! Mondrian: kanban ordering and column-transition engine.
//!
//! This crate keeps tasks on a kanban board in a stable, contiguous order,
//! maps columns to workflow statuses, flags work-in-progress overruns, and
//! turns task changes into notifications and activity-log entries.
//!
//! # Architecture
//!
//! Mondrian follows hexagonal architecture principles:
//!
//! - **Domain**: Pure ordering, policy and event logic with no
//!   infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for task storage and event sinks
//! - **Adapters**: In-memory and `PostgreSQL` implementations of the ports
//!
//! # Modules
//!
//! - [`board`]: Board configuration, task moves and side-effect dispatch

pub mod board;
