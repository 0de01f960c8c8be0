//! Login, logout, and whoami.
//!
//! Authentication is local against the demo accounts; the resulting
//! session is stored in the data directory and picked up by every later
//! command.

use std::io::{BufRead, IsTerminal};
use std::str::FromStr;

use dialoguer::{Input, Select};
use secrecy::SecretString;

use shelterly_config::ConfigError;
use shelterly_core::session::{self, DEMO_HINT, LoginCredentials, User};
use shelterly_core::Role;

use crate::cli::{GlobalOpts, LoginArgs};
use crate::config;
use crate::error::CliError;
use crate::output;

use super::util;

fn parse_role(raw: &str) -> Result<Role, CliError> {
    Role::from_str(raw.trim()).map_err(|_| CliError::Validation {
        field: "role".into(),
        reason: format!("expected 'caseworker' or 'admin', got '{raw}'"),
    })
}

fn prompt_role() -> Result<Role, CliError> {
    let choices = ["caseworker", "admin"];
    let selection = Select::new()
        .with_prompt("Role")
        .items(&choices)
        .default(0)
        .interact()
        .map_err(util::prompt_err)?;
    Ok(if selection == 1 {
        Role::Admin
    } else {
        Role::Caseworker
    })
}

fn read_password_stdin() -> Result<SecretString, CliError> {
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(SecretString::from(line.trim_end_matches(['\r', '\n']).to_owned()))
}

// ── Handlers ────────────────────────────────────────────────────────

pub fn login(args: LoginArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let cfg = config::load_config_or_default();
    let (profile_name, profile) = config::active_profile(global, &cfg)?;
    let interactive = std::io::stdin().is_terminal();

    // 1. Email (flag > profile > prompt)
    let email = match args.email.or_else(|| profile.email.clone()) {
        Some(email) => email,
        None if interactive => Input::new()
            .with_prompt("Email")
            .interact_text()
            .map_err(util::prompt_err)?,
        None => {
            return Err(CliError::Validation {
                field: "email".into(),
                reason: "pass --email or set email on the profile".into(),
            });
        }
    };

    // 2. Role (flag > profile > prompt > caseworker)
    let role = match args.role.or_else(|| profile.role.clone()) {
        Some(raw) => parse_role(&raw)?,
        None if interactive => prompt_role()?,
        None => Role::Caseworker,
    };

    // 3. Password (stdin > env > keyring > profile > prompt)
    let password = if args.password_stdin {
        read_password_stdin()?
    } else {
        match shelterly_config::resolve_password(&profile, &profile_name) {
            Ok(password) => password,
            Err(ConfigError::NoCredentials { .. }) if interactive => {
                eprintln!("{DEMO_HINT}");
                SecretString::from(
                    rpassword::prompt_password("Password: ").map_err(util::prompt_err)?,
                )
            }
            Err(e) => return Err(e.into()),
        }
    };

    let session = session::login(&LoginCredentials {
        email,
        password,
        role,
    })?;
    shelterly_config::save_session(&session)?;

    if !global.quiet {
        eprintln!("Logged in as {} ({})", session.user.name, session.user.role);
    }
    Ok(())
}

pub fn logout(global: &GlobalOpts) -> Result<(), CliError> {
    shelterly_config::clear_session()?;
    if !global.quiet {
        eprintln!("Logged out");
    }
    Ok(())
}

pub fn whoami(global: &GlobalOpts) -> Result<(), CliError> {
    let session = config::stored_session().ok_or_else(|| CliError::LoginRequired {
        action: "show the current user".into(),
    })?;
    let started = session.started_at;
    let out = output::render_single(
        &global.output,
        &session.user,
        |u: &User| {
            [
                format!("Name:    {}", u.name),
                format!("Email:   {}", u.email),
                format!("Role:    {}", u.role),
                format!("Since:   {}", started.format("%Y-%m-%d %H:%M UTC")),
            ]
            .join("\n")
        },
        |u| u.email.clone(),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn role_parsing_ignores_case() {
        assert_eq!(parse_role("Admin").unwrap(), Role::Admin);
        assert_eq!(parse_role(" caseworker ").unwrap(), Role::Caseworker);
        assert!(parse_role("volunteer").is_err());
    }
}
