//! Command dispatch: bridges CLI args -> engine calls -> output formatting.

pub mod config_cmd;
pub mod connect;
pub mod devices;
pub mod exec;
pub mod providers;
pub mod state;
pub mod util;
pub mod watch;

use std::sync::Arc;

use homeweave_core::Provider;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a controller-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    provider: &Arc<dyn Provider>,
    url: &str,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Connect => connect::handle(provider.as_ref(), url, global).await,
        Command::Devices(args) => devices::handle(provider.as_ref(), args, global).await,
        Command::State(args) => state::handle(provider, &args, global).await,
        Command::Exec(args) => exec::handle(provider, &args, global).await,
        Command::Watch(args) => watch::handle(provider.as_ref(), &args, global).await,
        // Handled before a provider is built
        Command::Providers | Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
