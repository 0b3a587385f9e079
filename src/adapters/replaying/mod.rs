//! Replaying adapters that serve recorded interactions.

pub mod issues;

pub use issues::ReplayingIssueApi;

use std::sync::Mutex;

use serde::de::DeserializeOwned;

use crate::cassette::replayer::CassetteReplayer;
use crate::error::IssueError;

/// Takes the next recorded output for `port`/`method`.
///
/// Mirror of `recording::record_result` - reads instead of writing.
pub(crate) fn next_output(
    replayer: &Mutex<CassetteReplayer>,
    port: &str,
    method: &str,
) -> Result<serde_json::Value, IssueError> {
    let mut guard = replayer
        .lock()
        .map_err(|e| IssueError::Replayed(format!("cassette replayer lock poisoned: {e}")))?;
    guard
        .next_interaction(port, method)
        .map(|interaction| interaction.output.clone())
        .map_err(IssueError::Replayed)
}

/// Decodes a recorded `Result` using the Ok/Err JSON convention.
///
/// - `{"Ok": v}` deserializes `v` into `T`
/// - `{"Err": "message"}` becomes [`IssueError::Replayed`]
pub(crate) fn replay_result<T: DeserializeOwned>(output: &serde_json::Value) -> Result<T, IssueError> {
    if let Some(value) = output.get("Ok") {
        return Ok(serde_json::from_value(value.clone())?);
    }
    if let Some(message) = output.get("Err") {
        let message = message.as_str().map_or_else(|| message.to_string(), str::to_string);
        return Err(IssueError::Replayed(message));
    }
    Err(IssueError::Decode(format!("recorded output is neither Ok nor Err: {output}")))
}
