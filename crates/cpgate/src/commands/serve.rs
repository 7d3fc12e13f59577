//! `cpgate serve`: run the proxy server.

use tokio::net::TcpListener;
use tracing::info;

use cpgate_core::ProxyService;

use crate::cli::{GlobalOpts, ServeArgs};
use crate::config;
use crate::error::CliError;

pub async fn handle(args: &ServeArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let cfg = config::load_config()?;
    let settings = config::serve_settings(&cfg, args, global)?;

    let client = settings
        .proxy
        .build_client()
        .map_err(|e| CliError::Validation {
            field: "management".into(),
            reason: e.to_string(),
        })?;
    info!(
        management = %settings.proxy.management_url,
        tls = ?settings.proxy.tls,
        "proxying management API"
    );

    let listener = TcpListener::bind(&settings.bind)
        .await
        .map_err(|source| CliError::Bind {
            addr: settings.bind.clone(),
            source,
        })?;

    cpgate::serve(listener, ProxyService::new(client)).await?;
    Ok(())
}
