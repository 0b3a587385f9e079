//! Recording adapters that capture interactions to cassettes.

pub mod issues;

pub use issues::RecordingIssueApi;

use std::sync::{Arc, Mutex};

use serde::Serialize;
use tracing::warn;

use crate::cassette::recorder::CassetteRecorder;

/// Records a `Result<T, E>` interaction using the Ok/Err JSON convention.
///
/// Mirror of `replaying::replay_result` - serializes the result for recording:
/// - `Ok(v)` is serialized as `{"Ok": v}`
/// - `Err(e)` is serialized as `{"Err": e.to_string()}`
///
/// Recording problems are logged and never surface to the caller.
pub(crate) fn record_result<T, E, I>(
    recorder: &Arc<Mutex<CassetteRecorder>>,
    port: &str,
    method: &str,
    input: &I,
    result: &Result<T, E>,
) where
    T: Serialize,
    E: std::fmt::Display,
    I: Serialize,
{
    let encoded = serde_json::to_value(input).and_then(|input| {
        let output = match result {
            Ok(v) => {
                let value = serde_json::to_value(v)?;
                serde_json::json!({ "Ok": value })
            }
            Err(e) => serde_json::json!({ "Err": e.to_string() }),
        };
        Ok((input, output))
    });
    let (input, output) = match encoded {
        Ok(pair) => pair,
        Err(e) => {
            warn!(port, method, error = %e, "failed to encode interaction; not recorded");
            return;
        }
    };

    match recorder.lock() {
        Ok(mut guard) => guard.record(port, method, input, output),
        Err(e) => warn!(port, method, error = %e, "cassette recorder lock poisoned; not recorded"),
    }
}
