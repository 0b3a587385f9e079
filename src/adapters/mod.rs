//! Adapter implementations for port traits.
//!
//! - `live`: real tracker traffic and console reporting
//! - `recording`: wraps a live adapter and captures traffic into a cassette
//! - `replaying`: serves previously captured traffic from a cassette

pub mod live;
pub mod recording;
pub mod replaying;
