mod cli;
mod commands;
mod config;
mod error;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use shelterly_core::Console;

use crate::cli::{Cli, Command};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.global.verbose);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // Local commands: no backend connection
        Command::Config(args) => commands::config_cmd::handle(args, &cli.global),
        Command::Login(args) => commands::auth::login(args, &cli.global),
        Command::Logout => commands::auth::logout(&cli.global),
        Command::Whoami => commands::auth::whoami(&cli.global),

        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "shelterly", &mut std::io::stdout());
            Ok(())
        }

        // Everything else talks to the backend
        cmd => {
            let console_config = config::resolve_console_config(&cli.global)?;
            let console = Console::new(console_config, config::stored_session());
            console.connect().await?;

            tracing::debug!(command = ?cmd, "dispatching command");
            let logged_in = console.session().is_some();
            let result = commands::dispatch(cmd, &console, &cli.global).await;
            console.disconnect().await;

            // A 401 mid-reservation surfaces as a reservation failure; the
            // console dropping its session still means the login is gone.
            let expired = result.as_ref().is_err_and(CliError::is_session_expired)
                || (logged_in && console.session().is_none());
            if expired {
                forget_session(&result, cli.global.quiet);
            }
            result
        }
    }
}

fn forget_session(result: &Result<(), CliError>, quiet: bool) {
    if let Err(e) = shelterly_config::clear_session() {
        tracing::warn!(error = %e, "failed to remove expired session");
    }
    if !quiet && !result.as_ref().is_err_and(CliError::is_session_expired) {
        eprintln!("Session expired. Run `shelterly login` again.");
    }
}
