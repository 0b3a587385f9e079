//! Service context bundling the port trait objects.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tracing::info;

use crate::adapters::live::{ConsoleFailureReporter, LiveIssueApi};
use crate::adapters::recording::RecordingIssueApi;
use crate::adapters::replaying::ReplayingIssueApi;
use crate::cassette::format::Cassette;
use crate::cassette::recorder::CassetteRecorder;
use crate::config::ClientConfig;
use crate::ports::{FailureReporter, IssueApi};

/// Bundles the ports used by commands.
///
/// Constructors wire up different adapter implementations (live, recording,
/// replaying). A recording context must be closed with
/// [`finish`](Self::finish) to write its cassette.
pub struct ServiceContext {
    /// Tracker transport.
    pub issues: Box<dyn IssueApi>,
    /// Sink for failed operations.
    pub reporter: Box<dyn FailureReporter>,
    recorder: Option<Arc<Mutex<CassetteRecorder>>>,
}

impl ServiceContext {
    /// Creates a context from explicit ports, without recording.
    #[must_use]
    pub fn with_ports(issues: Box<dyn IssueApi>, reporter: Box<dyn FailureReporter>) -> Self {
        Self { issues, reporter, recorder: None }
    }

    /// Creates a context talking to the configured tracker.
    #[must_use]
    pub fn live(config: &ClientConfig) -> Self {
        Self::with_ports(Box::new(LiveIssueApi::new(config)), Box::new(ConsoleFailureReporter))
    }

    /// Creates a live context that also records tracker traffic to `path`.
    #[must_use]
    pub fn recording(config: &ClientConfig, path: &Path) -> Self {
        let name = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or("issuesync-session")
            .trim_end_matches(".cassette")
            .to_string();
        let recorder = Arc::new(Mutex::new(CassetteRecorder::new(path, name, &config.base_url)));
        let issues = RecordingIssueApi::new(Box::new(LiveIssueApi::new(config)), Arc::clone(&recorder));

        Self {
            issues: Box::new(issues),
            reporter: Box::new(ConsoleFailureReporter),
            recorder: Some(recorder),
        }
    }

    /// Creates a context serving tracker traffic from a cassette file.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette file cannot be read or parsed.
    pub fn replaying(path: &Path) -> Result<Self, String> {
        let cassette = Cassette::load(path)?;
        info!(cassette = %path.display(), interactions = cassette.interactions.len(), "replaying tracker traffic");
        Ok(Self::with_ports(Box::new(ReplayingIssueApi::new(&cassette)), Box::new(ConsoleFailureReporter)))
    }

    /// Picks the live, recording or replaying context the configuration asks for.
    ///
    /// # Errors
    ///
    /// Returns an error if a replay cassette cannot be loaded.
    pub fn from_config(config: &ClientConfig) -> Result<Self, String> {
        match (&config.replay_path, &config.record_path) {
            (Some(path), _) => Self::replaying(path),
            (None, Some(path)) => Ok(Self::recording(config, path)),
            (None, None) => Ok(Self::live(config)),
        }
    }

    /// Closes the context, writing the cassette if recording.
    ///
    /// Returns the cassette path when one was written.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette cannot be written.
    pub fn finish(self) -> Result<Option<PathBuf>, String> {
        let Self { issues, reporter, recorder } = self;
        // The recording adapter holds the other reference to the recorder.
        drop(issues);
        drop(reporter);

        let Some(recorder) = recorder else {
            return Ok(None);
        };
        let recorder = Arc::try_unwrap(recorder)
            .map_err(|_| "Recording adapter for issues still has references".to_string())?
            .into_inner()
            .map_err(|e| format!("Recorder lock for issues poisoned: {e}"))?;
        let path = recorder.finish().map_err(|e| format!("Failed to write issues cassette: {e}"))?;
        Ok(Some(path))
    }
}
