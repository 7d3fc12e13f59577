//! Flag-aware configuration: the config file plus CLI overrides.
//!
//! Resolution order everywhere: CLI flag / its env var, then the
//! `CPGATE_`-layered config file, then built-in defaults.

use std::time::Duration;

use secrecy::SecretString;
use url::Url;

use cpgate_config::Config;
use cpgate_core::{ProxyConfig, TlsVerification};

use crate::cli::{GlobalOpts, ServeArgs};
use crate::error::CliError;

pub use cpgate_config::{config_path, load_config};

/// Everything `cpgate serve` needs.
#[derive(Debug)]
pub struct ServeSettings {
    pub bind: String,
    pub proxy: ProxyConfig,
}

/// Everything a console command needs to reach the proxy.
#[derive(Debug)]
pub struct ConsoleSettings {
    pub proxy_url: Url,
    pub domain: String,
    pub api_key: SecretString,
    pub timeout: Duration,
}

pub fn serve_settings(
    cfg: &Config,
    args: &ServeArgs,
    global: &GlobalOpts,
) -> Result<ServeSettings, CliError> {
    let mut management = cfg.management.clone();
    if let Some(ref url) = args.management_url {
        management.url.clone_from(url);
    }
    if let Some(timeout) = global.timeout {
        management.timeout = timeout;
    }
    if let Some(ref ca) = args.ca_cert {
        management.ca_cert = Some(ca.clone());
    }

    let mut proxy = cpgate_config::to_proxy_config(&management)?;
    if args.insecure {
        proxy.tls = TlsVerification::DangerAcceptInvalid;
    }

    Ok(ServeSettings {
        bind: args.bind.clone().unwrap_or_else(|| cfg.server.bind.clone()),
        proxy,
    })
}

pub fn console_settings(cfg: &Config, global: &GlobalOpts) -> Result<ConsoleSettings, CliError> {
    let raw_url = global
        .proxy
        .as_deref()
        .unwrap_or(cfg.console.proxy_url.as_str());
    let proxy_url: Url = raw_url.parse().map_err(|_| CliError::Validation {
        field: "proxy".into(),
        reason: format!("invalid URL: {raw_url}"),
    })?;

    let domain = global
        .domain
        .clone()
        .or_else(|| cfg.console.domain.clone())
        .filter(|d| !d.is_empty())
        .ok_or(CliError::NoDomain)?;

    let api_key = match global.api_key {
        Some(ref key) if !key.is_empty() => SecretString::from(key.clone()),
        _ => cpgate_config::resolve_api_key(&cfg.console, &domain)?,
    };

    Ok(ConsoleSettings {
        proxy_url,
        domain,
        api_key,
        timeout: Duration::from_secs(global.timeout.unwrap_or(cfg.management.timeout)),
    })
}
