use thiserror::Error;

/// Fixed message surfaced for HTTP 403 responses.
pub const FORBIDDEN_MESSAGE: &str = "You do not have permission to perform this action.";

/// Fallback message when an error response carries no `message` field.
pub const FALLBACK_MESSAGE: &str = "An error occurred";

/// Top-level error type for the `shelterly-api` crate.
///
/// Covers every failure mode of the REST surface: transport, HTTP status
/// classes the console treats specially (401, 403), generic server errors,
/// and undecodable bodies. `shelterly-core` maps these into domain errors.
#[derive(Debug, Error)]
pub enum Error {
    // ── Session ─────────────────────────────────────────────────────
    /// HTTP 401: the backend considers the session invalid.
    #[error("Session is no longer valid -- log in again")]
    Unauthorized,

    /// HTTP 403: the caller's role may not perform this action.
    #[error("{}", FORBIDDEN_MESSAGE)]
    Forbidden,

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS setup or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    /// A header value could not be encoded (e.g. a role with control characters).
    #[error("Invalid header value for {name}: {reason}")]
    InvalidHeader { name: &'static str, reason: String },

    // ── Backend ─────────────────────────────────────────────────────
    /// Non-2xx response other than 401/403.
    ///
    /// `message` is the body's `message` field when present, otherwise
    /// [`FALLBACK_MESSAGE`].
    #[error("{message} (HTTP {status})")]
    Api { status: u16, message: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if the backend rejected the session (HTTP 401).
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }

    /// Returns `true` if the backend refused the action for this role (HTTP 403).
    pub fn is_forbidden(&self) -> bool {
        matches!(self, Self::Forbidden)
    }

    /// Returns `true` if this is a transient transport failure.
    ///
    /// Nothing in the console retries automatically; this only drives
    /// how errors are worded to the user.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Transport(e) => e.status() == Some(reqwest::StatusCode::NOT_FOUND),
            Self::Api { status: 404, .. } => true,
            _ => false,
        }
    }

    /// HTTP status associated with this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized => Some(401),
            Self::Forbidden => Some(403),
            Self::Api { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forbidden_renders_fixed_message() {
        assert_eq!(Error::Forbidden.to_string(), FORBIDDEN_MESSAGE);
    }

    #[test]
    fn api_error_reports_status() {
        let err = Error::Api {
            status: 404,
            message: "Shelter not found with id 9".into(),
        };
        assert!(err.is_not_found());
        assert_eq!(err.status(), Some(404));
        assert!(!err.is_unauthorized());
    }
}
