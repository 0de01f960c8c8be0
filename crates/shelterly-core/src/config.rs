// ── Runtime console configuration ──
//
// These types describe *how* to reach the backend. They never touch disk:
// the CLI/TUI constructs a `ConsoleConfig` and hands it to `Console`.

use std::time::Duration;

use url::Url;

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict). Default.
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(std::path::PathBuf),
    /// Skip verification (local development backends).
    DangerAcceptInvalid,
}

/// Configuration for one backend.
///
/// Built by CLI/TUI, passed to `Console` -- core never reads config files.
#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    /// Backend base URL (e.g., `http://localhost:8081`).
    pub api_url: Url,
    /// TLS verification strategy.
    pub tls: TlsVerification,
    /// Request timeout. The only timeout applied to any request.
    pub timeout: Duration,
}

impl ConsoleConfig {
    /// Config for `api_url` with system TLS and a 30s timeout.
    pub fn new(api_url: Url) -> Self {
        Self {
            api_url,
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
        }
    }
}
