//! `shelterly-tui`: terminal console for the shelter directory.
//!
//! Built on [ratatui](https://ratatui.rs) with reactive data from
//! `shelterly-core`'s [`DirectoryStream`](shelterly_core::DirectoryStream).
//! Screens are navigable via number keys (1-3): Shelters, Clients, Tasks.
//!
//! Logs are written to a file (default under the platform data directory)
//! so they never corrupt the terminal. A background data bridge task
//! forwards directory, session, and connection changes into the TUI action
//! loop.

mod action;
mod app;
mod component;
mod data_bridge;
mod event;
mod modals;
mod screen;
mod screens;
mod theme;
mod tui;
mod widgets;

use std::path::PathBuf;
use std::str::FromStr;

use clap::Parser;
use color_eyre::eyre::Result;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use shelterly_core::{Console, Role};

use crate::app::App;
use crate::modals::LoginDefaults;

/// Terminal console for finding shelter beds and reserving them.
#[derive(Parser, Debug)]
#[command(name = "shelterly-tui", version, about)]
struct Cli {
    /// Config profile to use
    #[arg(short = 'p', long, env = "SHELTERLY_PROFILE")]
    profile: Option<String>,

    /// Backend URL, overriding the profile (e.g., http://localhost:8081)
    #[arg(short = 'u', long, env = "SHELTERLY_API_URL")]
    api_url: Option<String>,

    /// Log file path (defaults to shelterly-tui.log in the data directory)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Set up file-based tracing. Nothing may log to stdout/stderr while the
/// TUI owns the terminal. The returned guard must be held for the lifetime
/// of the application so logs are flushed.
fn setup_tracing(cli: &Cli) -> Result<WorkerGuard> {
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "shelterly_tui={log_level},shelterly_core={log_level}"
        ))
    });

    let log_file = cli
        .log_file
        .clone()
        .unwrap_or_else(|| shelterly_config::data_dir().join("shelterly-tui.log"));
    let log_dir = log_file
        .parent()
        .map_or_else(|| PathBuf::from("."), PathBuf::from);
    let log_filename = log_file
        .file_name()
        .unwrap_or(std::ffi::OsStr::new("shelterly-tui.log"));
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = tracing_appender::rolling::never(&log_dir, log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true),
        )
        .init();

    Ok(guard)
}

/// Build the [`Console`] from the active profile plus CLI overrides, and
/// collect the login form defaults from the same profile.
fn build_console(cli: &Cli) -> Result<(Console, LoginDefaults)> {
    let cfg = shelterly_config::load_config_or_default();
    let profile_name = cfg.active_profile_name(cli.profile.as_deref());
    let mut profile = cfg.profiles.get(&profile_name).cloned().unwrap_or_default();
    if let Some(ref url) = cli.api_url {
        profile.api_url = Some(url.clone());
    }

    let config = shelterly_config::profile_to_console_config(&profile)?;

    // An unreadable session file counts as logged out.
    let session = shelterly_config::load_session().unwrap_or_else(|e| {
        warn!(error = %e, "ignoring unreadable session file");
        None
    });

    let defaults = LoginDefaults {
        email: profile.email.clone().unwrap_or_default(),
        role: profile
            .role
            .as_deref()
            .and_then(|r| Role::from_str(r).ok())
            .unwrap_or(Role::Caseworker),
    };

    Ok((Console::new(config, session), defaults))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Hooks go in BEFORE the terminal is entered
    tui::install_hooks()?;

    let _log_guard = setup_tracing(&cli)?;

    let (console, login_defaults) = build_console(&cli)?;
    info!(url = %console.config().api_url, "starting shelterly-tui");

    let mut app = App::new(console, login_defaults);
    app.run().await?;

    Ok(())
}
