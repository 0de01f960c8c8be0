//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and distinct exit codes.

use miette::Diagnostic;
use thiserror::Error;

use shelterly_config::ConfigError;
use shelterly_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const PERMISSION: i32 = 5;
    pub const CONFLICT: i32 = 6;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────

    #[error("Could not reach the backend at {url}")]
    #[diagnostic(
        code(shelterly::connection_failed),
        help(
            "Check that the backend is running and accessible.\n\
             URL: {url}\n\
             Override with --api-url or: shelterly config set api_url <URL>"
        )
    )]
    ConnectionFailed {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Request timed out")]
    #[diagnostic(
        code(shelterly::timeout),
        help("Increase timeout with --timeout or check backend responsiveness.")
    )]
    Timeout,

    // ── Session ──────────────────────────────────────────────────────

    #[error("Your session has expired")]
    #[diagnostic(
        code(shelterly::session_expired),
        help("The stored session was discarded. Run: shelterly login")
    )]
    SessionExpired,

    #[error("Invalid email, password, or role")]
    #[diagnostic(
        code(shelterly::invalid_credentials),
        help(
            "Demo accounts:\n\
             {hint}"
        )
    )]
    InvalidCredentials { hint: String },

    #[error("You must be logged in to {action}")]
    #[diagnostic(code(shelterly::login_required), help("Run: shelterly login"))]
    LoginRequired { action: String },

    #[error("No password configured for profile '{profile}'")]
    #[diagnostic(
        code(shelterly::no_credentials),
        help(
            "Store one with: shelterly config set-password --profile {profile}\n\
             Or set the SHELTERLY_PASSWORD environment variable."
        )
    )]
    NoCredentials { profile: String },

    // ── Permission ───────────────────────────────────────────────────

    #[error("You do not have permission to perform this action.")]
    #[diagnostic(code(shelterly::forbidden))]
    Forbidden,

    #[error("This action requires the {required} role")]
    #[diagnostic(
        code(shelterly::role_required),
        help("Log in with an {required} account: shelterly login --role {required}")
    )]
    RoleRequired { required: String },

    // ── Resources ────────────────────────────────────────────────────

    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(shelterly::not_found),
        help("Run: shelterly {list_command} to see available {resource_type}s")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    // ── Reservation ──────────────────────────────────────────────────

    #[error("{shelter} has no available beds")]
    #[diagnostic(
        code(shelterly::no_availability),
        help("Run: shelterly shelters search --active to find open beds")
    )]
    NoAvailability { shelter: String },

    #[error("{message}")]
    #[diagnostic(code(shelterly::reservation_failed), help("{recovery}"))]
    ReservationFailed { message: String, recovery: String },

    // ── API ──────────────────────────────────────────────────────────

    #[error("{message}")]
    #[diagnostic(code(shelterly::api_error))]
    ApiError {
        status: Option<u16>,
        message: String,
    },

    // ── Validation ───────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(shelterly::validation))]
    Validation { field: String, reason: String },

    #[error("The form has errors:\n{details}")]
    #[diagnostic(code(shelterly::invalid_form), help("Fix the fields above and try again."))]
    InvalidForm { details: String },

    // ── Configuration ────────────────────────────────────────────────

    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(shelterly::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: shelterly config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error(transparent)]
    #[diagnostic(
        code(shelterly::config),
        help("Check the config file with: shelterly config show")
    )]
    Config(Box<ConfigError>),

    // ── Interactive ──────────────────────────────────────────────────

    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(shelterly::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── IO ───────────────────────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::NoCredentials { profile } => Self::NoCredentials { profile },
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            other => Self::Config(Box::new(other)),
        }
    }
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout => exit_code::TIMEOUT,
            Self::SessionExpired
            | Self::InvalidCredentials { .. }
            | Self::LoginRequired { .. }
            | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::Forbidden | Self::RoleRequired { .. } => exit_code::PERMISSION,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::NoAvailability { .. } => exit_code::CONFLICT,
            Self::Validation { .. }
            | Self::InvalidForm { .. }
            | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }

    pub fn is_session_expired(&self) -> bool {
        matches!(self, Self::SessionExpired)
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => CliError::ConnectionFailed {
                url,
                source: reason.into(),
            },

            CoreError::Disconnected => CliError::ConnectionFailed {
                url: "(disconnected)".into(),
                source: "Console is not connected".into(),
            },

            CoreError::Timeout => CliError::Timeout,

            CoreError::SessionExpired => CliError::SessionExpired,

            CoreError::Forbidden => CliError::Forbidden,

            CoreError::InvalidCredentials => CliError::InvalidCredentials {
                hint: shelterly_core::session::DEMO_HINT.into(),
            },

            CoreError::LoginRequired { action } => CliError::LoginRequired { action },

            CoreError::RoleRequired { required } => CliError::RoleRequired { required },

            CoreError::NotFound {
                entity_type,
                identifier,
            } => CliError::NotFound {
                list_command: format!("{}s list", entity_type.to_lowercase()),
                resource_type: entity_type.to_lowercase(),
                identifier,
            },

            CoreError::ValidationFailed { message } => CliError::Validation {
                field: "input".into(),
                reason: message,
            },

            CoreError::NoAvailability { shelter } => CliError::NoAvailability { shelter },

            CoreError::ReservationInProgress => CliError::ApiError {
                status: None,
                message: "A reservation is already being submitted".into(),
            },

            CoreError::Api { message, status } => CliError::ApiError { status, message },

            CoreError::Config { message } => CliError::Validation {
                field: "config".into(),
                reason: message,
            },

            CoreError::Internal(message) => CliError::ApiError {
                status: None,
                message,
            },
        }
    }
}
