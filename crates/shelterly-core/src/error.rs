// ── Core error types ──
//
// User-facing errors from shelterly-core. Consumers never see raw HTTP
// plumbing: the `From<shelterly_api::Error>` impl translates transport-layer
// errors into the console's error taxonomy (transport, session expired,
// forbidden, validation, server).

use thiserror::Error;

use shelterly_api::error::{FALLBACK_MESSAGE, FORBIDDEN_MESSAGE};

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot reach backend at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Backend request timed out")]
    Timeout,

    #[error("Console is not connected")]
    Disconnected,

    // ── Session errors ───────────────────────────────────────────────
    /// The backend answered 401; the local session has been cleared.
    #[error("Session expired -- log in again")]
    SessionExpired,

    /// The backend answered 403; the session is kept.
    #[error("{}", FORBIDDEN_MESSAGE)]
    Forbidden,

    #[error("Invalid email, password, or role")]
    InvalidCredentials,

    #[error("You must be logged in to {action}")]
    LoginRequired { action: String },

    #[error("This action requires the {required} role")]
    RoleRequired { required: String },

    // ── Data errors ──────────────────────────────────────────────────
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: String,
        identifier: String,
    },

    // ── Operation errors ─────────────────────────────────────────────
    #[error("Validation failed: {message}")]
    ValidationFailed { message: String },

    /// Reservation refused locally because the shelter shows no free bed.
    #[error("{shelter} has no available beds")]
    NoAvailability { shelter: String },

    #[error("A reservation is already being submitted")]
    ReservationInProgress,

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("{message}")]
    Api {
        message: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Returns `true` if the stored session must be discarded.
    pub fn is_session_expired(&self) -> bool {
        matches!(self, Self::SessionExpired)
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<shelterly_api::Error> for CoreError {
    fn from(err: shelterly_api::Error) -> Self {
        match err {
            shelterly_api::Error::Unauthorized => CoreError::SessionExpired,
            shelterly_api::Error::Forbidden => CoreError::Forbidden,
            shelterly_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            shelterly_api::Error::Api { status, message } => {
                if status == 404 {
                    CoreError::NotFound {
                        entity_type: "Record".into(),
                        identifier: message,
                    }
                } else {
                    CoreError::Api {
                        message,
                        status: Some(status),
                    }
                }
            }
            shelterly_api::Error::Deserialization { message, body: _ } => CoreError::Api {
                message: format!("{FALLBACK_MESSAGE}: unexpected response ({message})"),
                status: None,
            },
            shelterly_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("invalid backend URL: {e}"),
            },
            shelterly_api::Error::Tls(message) => CoreError::Config { message },
            shelterly_api::Error::InvalidHeader { name, reason } => CoreError::Config {
                message: format!("cannot send {name}: {reason}"),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unauthorized_becomes_session_expired() {
        let err = CoreError::from(shelterly_api::Error::Unauthorized);
        assert!(err.is_session_expired());
    }

    #[test]
    fn server_message_passes_through() {
        let err = CoreError::from(shelterly_api::Error::Api {
            status: 400,
            message: "Reservation failed".into(),
        });
        assert_eq!(err.to_string(), "Reservation failed");
    }

    #[test]
    fn not_found_status_maps_to_not_found() {
        let err = CoreError::from(shelterly_api::Error::Api {
            status: 404,
            message: "An error occurred".into(),
        });
        assert!(matches!(err, CoreError::NotFound { .. }));
    }
}
