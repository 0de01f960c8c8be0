//! Shared helpers for command handlers.

use shelterly_core::{CoreError, RecordId, ShelterType};

use crate::error::CliError;

/// Parse a shelter type given as `tiny_home`, `TINY-HOME`, `Tiny Home`, ...
pub fn parse_shelter_type(raw: &str) -> Result<ShelterType, CliError> {
    let normalized = raw.trim().replace(['-', ' '], "_");
    normalized.parse().map_err(|_| CliError::Validation {
        field: "type".into(),
        reason: format!(
            "unknown shelter type '{raw}'. Valid types: congregate, tiny_home, safe_parking, \
             motel_conversion, navigation_center, other"
        ),
    })
}

/// Turn a backend 404 into a `NotFound` naming the resource and its list
/// command. Other errors pass through.
pub fn or_not_found(err: CoreError, resource_type: &str, id: &RecordId) -> CliError {
    match err {
        CoreError::NotFound { .. } => CliError::NotFound {
            resource_type: resource_type.into(),
            identifier: id.to_string(),
            list_command: format!("{resource_type}s list"),
        },
        other => other.into(),
    }
}

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}

/// Map a dialoguer / interactive I/O failure into CliError.
pub fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

/// `Some(value)` rendered, or `-`.
pub fn or_dash(value: Option<&str>) -> &str {
    value.filter(|v| !v.is_empty()).unwrap_or("-")
}
