//! Command handlers, one module per top-level subcommand.

pub mod admin;
pub mod analytics;
pub mod auth;
pub mod clients;
pub mod config_cmd;
pub mod shelters;
pub mod tasks;
pub mod util;

use shelterly_core::Console;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Route a backend-bound command to its handler.
///
/// Local commands (config, login, completions) are handled in `main`
/// before a console is built.
pub async fn dispatch(cmd: Command, console: &Console, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Shelters(args) => shelters::handle(console, args, global).await,
        Command::Clients(args) => clients::handle(console, args, global).await,
        Command::Tasks(args) => tasks::handle(console, args, global).await,
        Command::Admin(args) => admin::handle(console, args, global).await,
        Command::Analytics(args) => analytics::handle(console, args, global).await,
        Command::Login(_)
        | Command::Logout
        | Command::Whoami
        | Command::Config(_)
        | Command::Completions(_) => Err(CliError::Validation {
            field: "command".into(),
            reason: "handled before connecting".into(),
        }),
    }
}
