//! CLI command dispatch and handlers.
//!
//! Routes parsed CLI arguments to the appropriate command handler.

pub mod completions;
pub mod serve;
pub mod timer;
pub mod version;

use tokio_util::sync::CancellationToken;

use crate::cli::args::{Cli, Commands, TimerSubcommand};
use crate::error::PomodError;

/// Dispatch a parsed CLI invocation to the appropriate command handler.
///
/// Long-running commands watch `cancel` for cooperative shutdown.
///
/// # Errors
///
/// Returns an error if the dispatched command handler fails.
pub async fn dispatch(cli: Cli, cancel: CancellationToken) -> Result<(), PomodError> {
    match cli.command {
        Commands::Serve(args) => serve::run(&args, cancel).await,
        Commands::Timer(cmd) => match cmd.subcommand {
            TimerSubcommand::Run(args) => timer::run(&args, cancel).await,
            TimerSubcommand::Watch(args) => timer::watch(&args, cancel).await,
        },
        Commands::Completions(args) => {
            completions::run(&args);
            Ok(())
        }
        Commands::Version(args) => {
            version::run(&args);
            Ok(())
        }
    }
}
