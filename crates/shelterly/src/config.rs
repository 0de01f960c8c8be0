//! CLI configuration: thin wrapper around `shelterly_config` shared types.
//!
//! Re-exports the shared types and adds resolution that respects
//! `GlobalOpts` flag overrides (--api-url, --insecure, --timeout).

use std::time::Duration;

use tracing::warn;

use shelterly_core::{ConsoleConfig, Session, TlsVerification};

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use shelterly_config::{Config, Defaults, Profile, config_path, load_config_or_default, save_config};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    config.active_profile_name(global.profile.as_deref())
}

/// The active profile. An explicitly requested profile must exist; the
/// implicit default may be absent, in which case built-in defaults apply.
pub fn active_profile(global: &GlobalOpts, config: &Config) -> Result<(String, Profile), CliError> {
    let name = active_profile_name(global, config);
    match config.profiles.get(&name) {
        Some(profile) => Ok((name, profile.clone())),
        None if global.profile.is_some() => {
            let mut available: Vec<_> = config.profiles.keys().cloned().collect();
            available.sort();
            Err(CliError::ProfileNotFound {
                name,
                available: if available.is_empty() {
                    "(none)".into()
                } else {
                    available.join(", ")
                },
            })
        }
        None => Ok((name, Profile::default())),
    }
}

/// Translate the active profile + global flags into a `ConsoleConfig`.
///
/// CLI flag overrides take priority over profile values, which take
/// priority over `[defaults]`.
pub fn resolve_console_config(global: &GlobalOpts) -> Result<ConsoleConfig, CliError> {
    let cfg = load_config_or_default();
    let (_, profile) = active_profile(global, &cfg)?;

    // 1. Backend URL (flag > env > profile > built-in)
    let url_str = global.api_url.as_deref().unwrap_or_else(|| profile.api_url());
    let api_url: url::Url = url_str.parse().map_err(|_| CliError::Validation {
        field: "api_url".into(),
        reason: format!("invalid URL: {url_str}"),
    })?;

    // 2. TLS verification
    let insecure = global.insecure || profile.insecure.unwrap_or(cfg.defaults.insecure);
    let tls = if insecure {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsVerification::CustomCa(ca_path.clone())
    } else {
        TlsVerification::SystemDefaults
    };

    // 3. Timeout
    let timeout = global
        .timeout
        .or(profile.timeout)
        .unwrap_or(cfg.defaults.timeout);

    Ok(ConsoleConfig {
        api_url,
        tls,
        timeout: Duration::from_secs(timeout),
    })
}

/// The stored session, if any. A corrupt session file counts as logged out.
pub fn stored_session() -> Option<Session> {
    match shelterly_config::load_session() {
        Ok(session) => session,
        Err(e) => {
            warn!(error = %e, "ignoring unreadable session file");
            None
        }
    }
}
