//! Port traits defining external boundaries.
//!
//! Each trait represents a boundary between the issue updater and an
//! external collaborator (the tracker transport, the failure sink).
//! Implementations live in `src/adapters/`.

pub mod failure;
pub mod issues;

pub use failure::FailureReporter;
pub use issues::{IssueApi, IssueFuture};
