//! Command dispatch and handlers.

pub mod show;
pub mod update;

use crate::cli::{Cli, Command};
use crate::config::ClientConfig;
use crate::context::ServiceContext;

/// Dispatch a parsed command line to its handler.
///
/// When `ISSUESYNC_RECORD` is set, tracker traffic is recorded to that
/// cassette file; when `ISSUESYNC_REPLAY` is set, it is served from one.
///
/// # Errors
///
/// Returns an error string if configuration fails or the command fails.
pub async fn dispatch(cli: &Cli) -> Result<(), String> {
    let config = ClientConfig::from_env()?;
    let ctx = ServiceContext::from_config(&config)?;

    let result = dispatch_with_context(cli, &ctx).await;

    // Finish recording after the command completes (even on error).
    if let Some(path) = ctx.finish()? {
        eprintln!("Recording saved to: {}", path.display());
    }

    result
}

/// Dispatch a command line with the given service context.
///
/// # Errors
///
/// Returns an error string if the selected command fails.
pub async fn dispatch_with_context(cli: &Cli, ctx: &ServiceContext) -> Result<(), String> {
    match &cli.command {
        Command::Show { key } => show::run(ctx, key).await,
        command => match command.change() {
            Some((key, change)) => update::run(ctx, key, &change, cli.deferred).await,
            None => Ok(()),
        },
    }
}
