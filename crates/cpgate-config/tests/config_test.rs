#![allow(clippy::unwrap_used)]
// Config file layering and translation tests.

use std::path::PathBuf;
use std::time::Duration;

use pretty_assertions::assert_eq;
use secrecy::ExposeSecret;
use tempfile::TempDir;

use cpgate_config::{
    Config, ConfigError, Console, Management, load_config_from, resolve_api_key, to_proxy_config,
};
use cpgate_core::{DEFAULT_MANAGEMENT_URL, TlsVerification};

fn write_config(dir: &TempDir, contents: &str) -> PathBuf {
    let path = dir.path().join("config.toml");
    std::fs::write(&path, contents).unwrap();
    path
}

#[test]
fn missing_file_yields_defaults() {
    let dir = TempDir::new().unwrap();
    let config = load_config_from(&dir.path().join("absent.toml")).unwrap();

    assert_eq!(config.management.url, DEFAULT_MANAGEMENT_URL);
    assert!(!config.management.insecure);
    assert_eq!(config.management.timeout, 30);
    assert_eq!(config.server.bind, "127.0.0.1:3000");
    assert_eq!(config.console.proxy_url, "http://127.0.0.1:3000");
}

#[test]
fn file_values_override_defaults() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r#"
[management]
url = "https://mgmt.example.net"
insecure = true
timeout = 5

[server]
bind = "0.0.0.0:8080"

[console]
domain = "SMC User"
"#,
    );

    let config = load_config_from(&path).unwrap();

    assert_eq!(config.management.url, "https://mgmt.example.net");
    assert!(config.management.insecure);
    assert_eq!(config.management.timeout, 5);
    assert_eq!(config.server.bind, "0.0.0.0:8080");
    assert_eq!(config.console.domain.as_deref(), Some("SMC User"));
    // Untouched keys keep their defaults.
    assert_eq!(config.console.proxy_url, "http://127.0.0.1:3000");
}

#[test]
fn malformed_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "[management\nurl = ");

    assert!(matches!(
        load_config_from(&path),
        Err(ConfigError::Figment(_))
    ));
}

#[test]
fn proxy_config_tls_precedence() {
    let mut management = Management::default();
    let proxy = to_proxy_config(&management).unwrap();
    assert_eq!(proxy.tls, TlsVerification::SystemDefaults);
    assert_eq!(proxy.timeout, Duration::from_secs(30));

    management.ca_cert = Some("/etc/cpgate/ca.pem".into());
    let proxy = to_proxy_config(&management).unwrap();
    assert_eq!(
        proxy.tls,
        TlsVerification::CustomCa("/etc/cpgate/ca.pem".into())
    );

    management.insecure = true;
    let proxy = to_proxy_config(&management).unwrap();
    assert_eq!(proxy.tls, TlsVerification::DangerAcceptInvalid);
}

#[test]
fn invalid_management_url_is_rejected() {
    let management = Management {
        url: "not a url".into(),
        ..Management::default()
    };
    assert!(matches!(
        to_proxy_config(&management),
        Err(ConfigError::Validation { .. })
    ));
}

#[test]
fn plaintext_key_is_last_resort() {
    let console = Console {
        api_key: Some("plain-key".into()),
        api_key_env: Some("CPGATE_TEST_UNSET_KEY_VAR".into()),
        ..Console::default()
    };

    let key = resolve_api_key(&console, "cpgate-test-domain-without-keyring-entry").unwrap();
    assert_eq!(key.expose_secret(), "plain-key");
}

#[test]
fn no_key_anywhere_is_an_error() {
    let console = Console::default();
    assert!(matches!(
        resolve_api_key(&console, "cpgate-test-domain-without-keyring-entry"),
        Err(ConfigError::NoCredentials { .. })
    ));
}
