//! Configuration for the cpgate proxy server and console.
//!
//! One TOML file layered under `CPGATE_` environment variables, API key
//! resolution (env var, keyring, plaintext), and translation to
//! `cpgate_core::ProxyConfig`. The binary adds flag-aware wrappers on top.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use cpgate_core::{DEFAULT_MANAGEMENT_URL, ProxyConfig, TlsVerification};

/// Keyring service name for stored API keys.
pub const KEYRING_SERVICE: &str = "cpgate";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no API key configured for domain '{domain}'")]
    NoCredentials { domain: String },

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub management: Management,

    #[serde(default)]
    pub server: Server,

    #[serde(default)]
    pub console: Console,
}

/// Where and how to reach the management server.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Management {
    #[serde(default = "default_management_url")]
    pub url: String,

    /// Accept self-signed management certificates.
    #[serde(default)]
    pub insecure: bool,

    /// Path to a custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Management {
    fn default() -> Self {
        Self {
            url: default_management_url(),
            insecure: false,
            ca_cert: None,
            timeout: default_timeout(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Server {
    /// Listen address of the proxy server.
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for Server {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

/// Settings for the console commands.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Console {
    /// Base URL of a running proxy server.
    #[serde(default = "default_proxy_url")]
    pub proxy_url: String,

    /// Default management domain.
    pub domain: Option<String>,

    /// API key (plaintext; prefer keyring or env var).
    pub api_key: Option<String>,

    /// Environment variable name containing the API key.
    pub api_key_env: Option<String>,
}

impl Default for Console {
    fn default() -> Self {
        Self {
            proxy_url: default_proxy_url(),
            domain: None,
            api_key: None,
            api_key_env: None,
        }
    }
}

fn default_management_url() -> String {
    DEFAULT_MANAGEMENT_URL.into()
}
fn default_timeout() -> u64 {
    30
}
fn default_bind() -> String {
    "127.0.0.1:3000".into()
}
fn default_proxy_url() -> String {
    "http://127.0.0.1:3000".into()
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "cpgate", "cpgate").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("cpgate");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load from `path` layered with `CPGATE_` environment variables.
///
/// Nested keys use a double underscore: `CPGATE_MANAGEMENT__URL`.
/// A missing file is not an error.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("CPGATE_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

// ── Credential resolution (without CLI flags) ───────────────────────

fn keyring_account(domain: &str) -> String {
    format!("{domain}/api-key")
}

/// Resolve the console's API key for `domain` (no CLI flag step).
pub fn resolve_api_key(console: &Console, domain: &str) -> Result<SecretString, ConfigError> {
    // 1. Configured env var
    if let Some(ref env_name) = console.api_key_env {
        if let Ok(val) = std::env::var(env_name) {
            return Ok(SecretString::from(val));
        }
    }

    // 2. System keyring
    if let Ok(entry) = keyring::Entry::new(KEYRING_SERVICE, &keyring_account(domain)) {
        if let Ok(secret) = entry.get_password() {
            return Ok(SecretString::from(secret));
        }
    }

    // 3. Plaintext in config
    if let Some(ref key) = console.api_key {
        return Ok(SecretString::from(key.clone()));
    }

    Err(ConfigError::NoCredentials {
        domain: domain.into(),
    })
}

/// Store an API key for `domain` in the system keyring.
pub fn store_api_key(domain: &str, api_key: &str) -> Result<(), ConfigError> {
    keyring::Entry::new(KEYRING_SERVICE, &keyring_account(domain))
        .and_then(|entry| entry.set_password(api_key))
        .map_err(|e| ConfigError::Validation {
            field: "keyring".into(),
            reason: e.to_string(),
        })
}

// ── Translation ─────────────────────────────────────────────────────

/// Build a `ProxyConfig` from the management section.
///
/// `insecure` wins over `ca_cert`; with neither, certificates are verified
/// against the system store.
pub fn to_proxy_config(management: &Management) -> Result<ProxyConfig, ConfigError> {
    let url: url::Url = management
        .url
        .parse()
        .map_err(|_| ConfigError::Validation {
            field: "management.url".into(),
            reason: format!("invalid URL: {}", management.url),
        })?;

    let tls = if management.insecure {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ref ca_path) = management.ca_cert {
        TlsVerification::CustomCa(ca_path.clone())
    } else {
        TlsVerification::SystemDefaults
    };

    Ok(ProxyConfig {
        management_url: url,
        tls,
        timeout: Duration::from_secs(management.timeout),
    })
}
