//! Cassettes: recorded tracker traffic for deterministic replay.

pub mod format;
pub mod recorder;
pub mod replayer;
