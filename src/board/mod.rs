//! Kanban board ordering and column transitions.
//!
//! Tasks live in ordered columns. Moving a task renumbers its origin and
//! destination columns so positions stay contiguous from zero, derives the
//! task's status from the destination column, checks the column's WIP limit
//! and raises notification and activity-log events for the change. The module
//! follows hexagonal architecture:
//!
//! - Domain types, the ordering engine, the column policy and event
//!   computation in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
