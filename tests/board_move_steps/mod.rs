//! Step definitions for board move BDD scenarios.

pub mod given;
pub mod when;
