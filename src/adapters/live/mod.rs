//! Live adapters for real external interactions.

pub mod failure;
pub mod issues;

pub use failure::ConsoleFailureReporter;
pub use issues::LiveIssueApi;
