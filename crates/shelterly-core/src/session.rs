// ── Session & authentication ──
//
// The session is an explicit value handed to the console, never ambient
// state. Its role is sent as the `X-User-Role` header: a UX hint for the
// backend, not a credential.

use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::error::CoreError;

/// Role claimed by the logged-in user.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Role {
    Caseworker,
    Admin,
}

impl Role {
    /// Value for the `X-User-Role` header.
    pub fn as_header(self) -> &'static str {
        match self {
            Self::Caseworker => "caseworker",
            Self::Admin => "admin",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: Role,
}

/// An authenticated session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user: User,
    pub started_at: DateTime<Utc>,
}

impl Session {
    pub fn role(&self) -> Role {
        self.user.role
    }

    pub fn is_admin(&self) -> bool {
        self.user.role == Role::Admin
    }

    /// Local gate for admin-only surfaces; the backend stays the authority.
    pub fn require_admin(&self) -> Result<(), CoreError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(CoreError::RoleRequired {
                required: Role::Admin.to_string(),
            })
        }
    }
}

/// Login form input.
#[derive(Debug, Clone)]
pub struct LoginCredentials {
    pub email: String,
    pub password: SecretString,
    pub role: Role,
}

// ── Demo directory ─────────────────────────────────────────────────

struct DemoAccount {
    email: &'static str,
    password: &'static str,
    role: Role,
    name: &'static str,
}

const DEMO_ACCOUNTS: &[DemoAccount] = &[
    DemoAccount {
        email: "demo@example.com",
        password: "password",
        role: Role::Caseworker,
        name: "Case Worker",
    },
    DemoAccount {
        email: "admin@example.com",
        password: "admin123",
        role: Role::Admin,
        name: "Admin User",
    },
];

/// Shown on the login surfaces.
pub const DEMO_HINT: &str =
    "Caseworker: demo@example.com / password    Admin: admin@example.com / admin123";

/// Authenticate against the built-in demo accounts.
///
/// Email, password, and role must all match one account.
pub fn login(credentials: &LoginCredentials) -> Result<Session, CoreError> {
    let email = credentials.email.trim();
    let account = DEMO_ACCOUNTS
        .iter()
        .find(|a| {
            a.role == credentials.role
                && a.email.eq_ignore_ascii_case(email)
                && a.password == credentials.password.expose_secret()
        })
        .ok_or(CoreError::InvalidCredentials)?;

    Ok(Session {
        user: User {
            id: "1".into(),
            email: account.email.to_owned(),
            name: account.name.to_owned(),
            role: account.role,
        },
        started_at: Utc::now(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn creds(email: &str, password: &str, role: Role) -> LoginCredentials {
        LoginCredentials {
            email: email.into(),
            password: SecretString::from(password.to_owned()),
            role,
        }
    }

    #[test]
    fn caseworker_demo_login() {
        let session = login(&creds("demo@example.com", "password", Role::Caseworker)).unwrap();
        assert_eq!(session.user.name, "Case Worker");
        assert_eq!(session.role().as_header(), "caseworker");
        assert!(session.require_admin().is_err());
    }

    #[test]
    fn admin_demo_login() {
        let session = login(&creds("admin@example.com", "admin123", Role::Admin)).unwrap();
        assert_eq!(session.user.name, "Admin User");
        assert!(session.require_admin().is_ok());
    }

    #[test]
    fn role_must_match_account() {
        let err = login(&creds("demo@example.com", "password", Role::Admin)).unwrap_err();
        assert!(matches!(err, CoreError::InvalidCredentials));
        let err = login(&creds("demo@example.com", "wrong", Role::Caseworker)).unwrap_err();
        assert!(matches!(err, CoreError::InvalidCredentials));
    }

    #[test]
    fn role_parses_case_insensitively() {
        assert_eq!(Role::from_str("Admin").unwrap(), Role::Admin);
        assert_eq!(serde_json::to_string(&Role::Caseworker).unwrap(), "\"caseworker\"");
    }
}
