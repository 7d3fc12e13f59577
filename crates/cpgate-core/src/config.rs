// ── Runtime connection configuration ──
//
// Describes *how* to reach the management server. Never touches disk:
// the binary resolves files/env/flags and hands a `ProxyConfig` in.

use std::path::PathBuf;
use std::time::Duration;

use url::Url;

use cpgate_api::transport::{TlsMode, TransportConfig};
use cpgate_api::ManagementClient;

/// Management endpoint used when nothing else is configured.
pub const DEFAULT_MANAGEMENT_URL: &str = "https://90.226.248.6:443";

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification (self-signed management certificates).
    DangerAcceptInvalid,
}

/// Everything the proxy needs to talk to one management server.
#[derive(Debug, Clone)]
pub struct ProxyConfig {
    pub management_url: Url,
    pub tls: TlsVerification,
    pub timeout: Duration,
}

impl ProxyConfig {
    pub fn new(management_url: Url) -> Self {
        Self {
            management_url,
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Translate into the api crate's transport settings.
    pub fn transport(&self) -> TransportConfig {
        let tls = match &self.tls {
            TlsVerification::SystemDefaults => TlsMode::System,
            TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
            TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
        };
        TransportConfig {
            tls,
            timeout: self.timeout,
        }
    }

    /// Build the management client for this configuration.
    pub fn build_client(&self) -> Result<ManagementClient, cpgate_api::Error> {
        ManagementClient::new(self.management_url.clone(), &self.transport())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_management_url_parses() {
        assert!(Url::parse(DEFAULT_MANAGEMENT_URL).is_ok());
    }

    #[test]
    fn tls_modes_translate() {
        let Ok(url) = Url::parse("https://mgmt.example.net") else {
            panic!("url should parse");
        };
        let mut config = ProxyConfig::new(url);
        assert!(matches!(config.transport().tls, TlsMode::System));

        config.tls = TlsVerification::DangerAcceptInvalid;
        assert!(matches!(config.transport().tls, TlsMode::DangerAcceptInvalid));

        config.tls = TlsVerification::CustomCa(PathBuf::from("/etc/ca.pem"));
        match config.transport().tls {
            TlsMode::CustomCa(p) => assert_eq!(p, PathBuf::from("/etc/ca.pem")),
            other => panic!("unexpected tls mode: {other:?}"),
        }
    }
}
