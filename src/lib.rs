//! Optimistic issue-state synchronization for code-quality issue trackers.
//!
//! The heart of the crate is [`update::update_issue`], which shows the
//! expected result of an issue change right away and reverts it if the
//! tracker rejects the change. The remaining modules provide what it works
//! with: the issue model and response parser, the tracker ports and their
//! live/recording/replaying adapters, and the `issuesync` CLI.

pub mod adapters;
pub mod cassette;
pub mod cli;
pub mod commands;
pub mod config;
pub mod context;
pub mod error;
pub mod issue;
pub mod ports;
pub mod update;
pub mod view;

use clap::Parser;

/// Run the CLI with the provided arguments.
///
/// # Errors
///
/// Returns an error string when argument parsing fails or command execution fails.
pub fn run<I, T>(args: I) -> Result<(), String>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = match cli::Cli::try_parse_from(args) {
        Ok(cli) => cli,
        // --help and --version are not failures.
        Err(err) if !err.use_stderr() => {
            print!("{err}");
            return Ok(());
        }
        Err(err) => return Err(err.to_string()),
    };

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("Failed to start async runtime: {e}"))?;
    runtime.block_on(commands::dispatch(&cli))
}
