//! Command handlers, one module per subcommand.

pub mod config_cmd;
pub mod list;
pub mod show;
pub mod stats;
pub mod status;
pub mod util;
pub mod watch;

use userdeck_core::DirectoryConfig;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Route a parsed command to its handler.
pub async fn dispatch(
    command: Command,
    config: DirectoryConfig,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match command {
        Command::List(args) => list::handle(config, &args, global).await,
        Command::Show { user } => show::handle(config, &user, global).await,
        Command::Stats => stats::handle(config, global).await,
        Command::Status => status::handle(config, global).await,
        Command::Watch(args) => watch::handle(config, &args, global).await,
        // Config and Completions are handled before dispatch.
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
