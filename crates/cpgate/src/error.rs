//! CLI error types with miette diagnostics.
//!
//! Maps config, console, and server failures into user-facing errors with
//! actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use cpgate_config::ConfigError;
use cpgate_core::{ConsoleError, RemoteError};

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────

    #[error("Could not reach the cpgate proxy at {url}: {reason}")]
    #[diagnostic(
        code(cpgate::connection_failed),
        help(
            "Start the proxy with: cpgate serve\n\
             Or point at a running one with --proxy <URL>."
        )
    )]
    ConnectionFailed { url: String, reason: String },

    #[error("Could not listen on {addr}")]
    #[diagnostic(code(cpgate::bind_failed), help("Choose another address with --bind."))]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    // ── Authentication ───────────────────────────────────────────────

    #[error("Authentication failed: {message}")]
    #[diagnostic(
        code(cpgate::auth_failed),
        help("Verify the API key and domain for the management server.")
    )]
    AuthFailed { message: String },

    #[error("No API key configured for domain '{domain}'")]
    #[diagnostic(
        code(cpgate::no_credentials),
        help(
            "Pass --api-key, set CPGATE_API_KEY, or store one with:\n\
             cpgate config set-key {domain}"
        )
    )]
    NoCredentials { domain: String },

    #[error("No management domain given")]
    #[diagnostic(
        code(cpgate::no_domain),
        help("Pass --domain, set CPGATE_DOMAIN, or add `domain` under [console] in the config.")
    )]
    NoDomain,

    // ── Resources ────────────────────────────────────────────────────

    #[error("gateway '{uid}' not found")]
    #[diagnostic(
        code(cpgate::not_found),
        help("Run: cpgate gateways list to see available gateways")
    )]
    NotFound { uid: String },

    // ── Proxy ────────────────────────────────────────────────────────

    #[error("Proxy error ({status}): {message}")]
    #[diagnostic(code(cpgate::proxy_error))]
    Proxy { status: u16, message: String },

    #[error("{0}")]
    #[diagnostic(code(cpgate::console))]
    Console(String),

    // ── Validation / configuration ───────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(cpgate::validation))]
    Validation { field: String, reason: String },

    #[error(transparent)]
    #[diagnostic(code(cpgate::config))]
    Config(ConfigError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } | Self::Bind { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Validation { .. } | Self::NoDomain => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }

    /// Interpret a failed login: vendor rejections are auth failures.
    pub fn from_login(err: ConsoleError, proxy_url: &str) -> Self {
        match err {
            ConsoleError::Remote(RemoteError {
                status: Some(status),
                message,
            }) if status < 500 => Self::AuthFailed { message },
            other => Self::from_console(other, proxy_url),
        }
    }

    pub fn from_console(err: ConsoleError, proxy_url: &str) -> Self {
        match err {
            ConsoleError::Remote(RemoteError {
                status: None,
                message,
            }) => Self::ConnectionFailed {
                url: proxy_url.to_owned(),
                reason: message,
            },
            ConsoleError::Remote(RemoteError {
                status: Some(401),
                message,
            }) => Self::AuthFailed { message },
            ConsoleError::Remote(RemoteError {
                status: Some(status),
                message,
            }) => Self::Proxy { status, message },
            ConsoleError::UnknownGateway { uid } => Self::NotFound { uid },
            other => Self::Console(other.to_string()),
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::NoCredentials { domain } => Self::NoCredentials { domain },
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            other => Self::Config(other),
        }
    }
}
